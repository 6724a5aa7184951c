//! Polyline Track Library - Core Engine for Encoded Path Comparison and Editing
//!
//! This library provides the geometric core for tools that convert between compact
//! encoded polyline strings and geographic coordinate sequences, compare two paths
//! geometrically, and edit a path interactively on a host-supplied map surface.
//!
//! # Architecture
//!
//! - **[`codec`]**: Delta/zigzag/base-63 varint codec between paths and strings
//! - **[`geometry`]**: Great-circle distance and axis-aligned bounds over a path
//! - **[`compare`]**: Divergence sampling, bounded intersection detection and
//!   similarity scoring between two paths
//! - **[`editor`]**: Interactive editing state machine with snapshot undo/redo,
//!   vertex dragging and snap-to-point
//! - **[`schedule`]**: Cancellable last-write-wins debounce for codec invocations
//!
//! # Degradation over errors
//!
//! The engine never raises for malformed or extreme input: decoding returns the
//! longest clean prefix, out-of-range coordinates are dropped, analysis truncates
//! at its cost caps, and editor operations on stale indices are no-ops. The only
//! fallible construction in the public API is [`Precision::try_from`].

pub mod codec;
pub mod compare;
pub mod editor;
pub mod geometry;
pub mod schedule;

// Public API exports
pub use codec::{Precision, decode, encode};
pub use compare::{
    AnalysisOptions, AnalysisReport, AutoAlignRequest, DivergencePoint, IntersectionPoint, analyze,
    auto_align,
};
pub use editor::{EditAction, MarkerId, PathEditor, ScreenPos, ScreenProjection};
pub use geometry::{bounds, path_distance};
pub use schedule::Debounce;

/// Error types for the path engine
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("unsupported codec precision: {0} (expected 4..=7)")]
    UnsupportedPrecision(u8),
}

pub type Result<T> = std::result::Result<T, PathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that all public types are accessible
        let _: fn(&str, Precision) -> Vec<geo::Point<f64>> = decode;
        let _: fn() -> AnalysisOptions = AnalysisOptions::default;
        let _: fn(Vec<geo::Point<f64>>) -> PathEditor = PathEditor::new;
    }
}
