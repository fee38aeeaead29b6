//! Encoded polyline codec (precision 5)
//!
//! Implements the Google encoded polyline algorithm used by OSRM for
//! `geometries=polyline`. Coordinates are `(latitude, longitude)` pairs,
//! each value stored as a zig-zag varint delta from the previous point.

use thiserror::Error;

const PRECISION: f64 = 1e5;
const CHUNK_BITS: u32 = 5;
const CHUNK_MASK: i64 = 0x1f;
const CONTINUATION: i64 = 0x20;
const ASCII_OFFSET: u8 = 63;

/// Errors raised while decoding a polyline string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    /// A byte outside the polyline alphabet (`?`..=`~`)
    #[error("invalid polyline character {character:?} at byte {index}")]
    InvalidCharacter { character: char, index: usize },

    /// The string ended in the middle of a value or of a coordinate pair
    #[error("polyline truncated at byte {0}")]
    Truncated(usize),

    /// A value used more bits than fit in 64
    #[error("polyline value overflows at byte {0}")]
    Overflow(usize),
}

/// Decode a polyline into `(latitude, longitude)` pairs
///
/// # Errors
///
/// Returns a [`PolylineError`] if the string is not a well-formed polyline.
pub fn decode(encoded: &str) -> Result<Vec<(f64, f64)>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut latitude: i64 = 0;
    let mut longitude: i64 = 0;
    let mut coordinates = Vec::new();

    while index < bytes.len() {
        latitude = latitude
            .checked_add(next_delta(bytes, &mut index)?)
            .ok_or(PolylineError::Overflow(index))?;
        if index >= bytes.len() {
            return Err(PolylineError::Truncated(index));
        }
        longitude = longitude
            .checked_add(next_delta(bytes, &mut index)?)
            .ok_or(PolylineError::Overflow(index))?;

        #[allow(clippy::cast_precision_loss)]
        coordinates.push((latitude as f64 / PRECISION, longitude as f64 / PRECISION));
    }

    Ok(coordinates)
}

/// Read one zig-zag encoded delta starting at `index`
fn next_delta(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(PolylineError::Truncated(*index));
        };
        if !(ASCII_OFFSET..=ASCII_OFFSET + 63).contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                character: char::from(byte),
                index: *index,
            });
        }
        if shift > 60 {
            return Err(PolylineError::Overflow(*index));
        }

        let chunk = i64::from(byte - ASCII_OFFSET);
        result |= (chunk & CHUNK_MASK) << shift;
        shift += CHUNK_BITS;
        *index += 1;

        if chunk & CONTINUATION == 0 {
            break;
        }
    }

    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Encode `(latitude, longitude)` pairs as a polyline
#[must_use]
pub fn encode(coordinates: &[(f64, f64)]) -> String {
    let mut output = String::new();
    let mut previous = (0_i64, 0_i64);

    for &(latitude, longitude) in coordinates {
        let current = (scale(latitude), scale(longitude));
        push_value(&mut output, current.0 - previous.0);
        push_value(&mut output, current.1 - previous.1);
        previous = current;
    }

    output
}

#[allow(clippy::cast_possible_truncation)]
fn scale(value: f64) -> i64 {
    (value * PRECISION).round() as i64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn push_value(output: &mut String, delta: i64) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };
    while value >= CONTINUATION {
        push_chunk(output, (CONTINUATION | (value & CHUNK_MASK)) as u8);
        value >>= CHUNK_BITS;
    }
    push_chunk(output, value as u8);
}

fn push_chunk(output: &mut String, chunk: u8) {
    output.push(char::from(chunk + ASCII_OFFSET));
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference example from the polyline algorithm documentation
    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn reference_points() -> Vec<(f64, f64)> {
        vec![(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)]
    }

    #[test]
    fn decodes_reference_polyline() {
        let decoded = decode(REFERENCE).unwrap();
        assert_eq!(decoded.len(), 3);
        for (got, want) in decoded.iter().zip(reference_points()) {
            assert!((got.0 - want.0).abs() < 1e-9);
            assert!((got.1 - want.1).abs() < 1e-9);
        }
    }

    #[test]
    fn encodes_reference_polyline() {
        assert_eq!(encode(&reference_points()), REFERENCE);
    }

    #[test]
    fn empty_string_decodes_to_no_points() {
        assert!(decode("").unwrap().is_empty());
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn rejects_characters_outside_alphabet() {
        let err = decode("_p~iF ps|U").unwrap_err();
        assert_eq!(
            err,
            PolylineError::InvalidCharacter {
                character: ' ',
                index: 5
            }
        );
    }

    #[test]
    fn rejects_latitude_without_longitude() {
        // "_p~iF" is a complete latitude with nothing after it
        assert_eq!(decode("_p~iF").unwrap_err(), PolylineError::Truncated(5));
    }

    #[test]
    fn rejects_unterminated_value() {
        // '|' has the continuation bit set
        assert!(matches!(
            decode("_p~iF~ps|"),
            Err(PolylineError::Truncated(_))
        ));
    }

    #[test]
    fn rejects_overlong_value() {
        let overlong = "~".repeat(20);
        assert!(matches!(decode(&overlong), Err(PolylineError::Overflow(_))));
    }
}
