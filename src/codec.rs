//! Polyline codec - delta/zigzag/base-63 varint encoding of coordinate paths
//!
//! Each point is scaled by 10^precision, rounded, delta-encoded against the
//! previous point (origin 0,0 for the first), zigzag-transformed and emitted
//! as 5-bit groups, least-significant first, with continuation bit 0x20 and a
//! +63 offset into printable ASCII. Latitude is encoded before longitude.
//!
//! The encoded string carries no precision marker, so the precision used to
//! encode must be supplied to decode for a lossless round-trip.

use crate::{PathError, Result, geometry};
use geo::Point;

/// Decimal scale factor exponent used by the codec
///
/// Precision is owned by the caller and passed per operation, never global.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Precision {
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
}

impl Precision {
    /// The coordinate scale factor 10^precision
    #[inline]
    pub fn scale(self) -> f64 {
        10f64.powi(self as i32)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Precision::Five
    }
}

impl TryFrom<u8> for Precision {
    type Error = PathError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            4 => Ok(Precision::Four),
            5 => Ok(Precision::Five),
            6 => Ok(Precision::Six),
            7 => Ok(Precision::Seven),
            other => Err(PathError::UnsupportedPrecision(other)),
        }
    }
}

/// Continuation bit marking all but the last 5-bit group of a value
const CONTINUATION_BIT: u64 = 0x20;

/// Offset shifting every emitted group into printable ASCII
const ASCII_OFFSET: u8 = 63;

/// Encode a path into a compact polyline string
///
/// An empty path encodes to an empty string.
pub fn encode(path: &[Point<f64>], precision: Precision) -> String {
    #[cfg(feature = "profiling")]
    profiling::scope!("codec::encode");

    let scale = precision.scale();
    let mut encoded = String::with_capacity(path.len() * 10);
    let mut prev_lat: i64 = 0;
    let mut prev_lon: i64 = 0;

    for point in path {
        let lat = (point.y() * scale).round() as i64;
        let lon = (point.x() * scale).round() as i64;
        write_value(&mut encoded, lat - prev_lat);
        write_value(&mut encoded, lon - prev_lon);
        prev_lat = lat;
        prev_lon = lon;
    }

    encoded
}

/// Decode a polyline string into a path
///
/// Decoding fails softly: a malformed or truncated chunk ends the scan and the
/// cleanly decoded prefix is returned (possibly empty). Points violating the
/// coordinate range invariant are dropped, not substituted.
///
/// Because the string carries no precision marker, a decode that yields zero
/// points at the requested precision is retried at precision 5, then 6, before
/// giving up.
pub fn decode(encoded: &str, precision: Precision) -> Vec<Point<f64>> {
    #[cfg(feature = "profiling")]
    profiling::scope!("codec::decode");

    let path = decode_at(encoded, precision);
    if !path.is_empty() || encoded.is_empty() {
        return path;
    }

    for fallback in [Precision::Five, Precision::Six] {
        if fallback == precision {
            continue;
        }
        let retry = decode_at(encoded, fallback);
        if !retry.is_empty() {
            tracing::debug!(
                "Decoded {} points at fallback precision {:?} (requested {:?})",
                retry.len(),
                fallback,
                precision
            );
            return retry;
        }
    }

    path
}

/// Zigzag-transform a signed delta and emit its 5-bit groups
fn write_value(out: &mut String, value: i64) {
    let mut v = ((value << 1) ^ (value >> 63)) as u64;
    while v >= CONTINUATION_BIT {
        let group = (v & 0x1f) | CONTINUATION_BIT;
        out.push((group as u8 + ASCII_OFFSET) as char);
        v >>= 5;
    }
    out.push((v as u8 + ASCII_OFFSET) as char);
}

/// Read one zigzag varint starting at byte offset `i`
///
/// Returns the signed value and the offset past it, or `None` when the chunk
/// is truncated, contains a byte outside the codec alphabet, or overflows.
fn read_value(bytes: &[u8], mut i: usize) -> Option<(i64, usize)> {
    let mut value: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        let &byte = bytes.get(i)?;
        if !(ASCII_OFFSET..=127).contains(&byte) {
            return None;
        }
        let group = (byte - ASCII_OFFSET) as u64;
        value |= (group & 0x1f) << shift;
        i += 1;
        if group & CONTINUATION_BIT == 0 {
            break;
        }
        shift += 5;
        if shift > 63 {
            return None;
        }
    }

    let signed = ((value >> 1) as i64) ^ -((value & 1) as i64);
    Some((signed, i))
}

/// Decode at exactly one precision, without fallback
fn decode_at(encoded: &str, precision: Precision) -> Vec<Point<f64>> {
    let scale = precision.scale();
    let bytes = encoded.as_bytes();
    let mut path = Vec::new();
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;
    let mut i = 0;

    while i < bytes.len() {
        let Some((delta_lat, after_lat)) = read_value(bytes, i) else {
            break;
        };
        let Some((delta_lon, after_lon)) = read_value(bytes, after_lat) else {
            break;
        };
        lat += delta_lat;
        lon += delta_lon;
        i = after_lon;

        let point = Point::new(lon as f64 / scale, lat as f64 / scale);
        if geometry::is_valid_position(&point) {
            path.push(point);
        } else {
            tracing::trace!(
                "Dropping out-of-range decoded point: ({}, {})",
                point.y(),
                point.x()
            );
        }
    }

    path
}
