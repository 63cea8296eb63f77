//! # Pose report strings
//!
//! Pose sources and destination requests describe a point as a comma separated `"x,y,z"` string.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use thiserror::Error;

use crate::telemetry::Position3;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PoseParseError {
    #[error("Expected 3 comma separated values (x,y,z), found {0}")]
    WrongFieldCount(usize),

    #[error("Could not parse {0:?} as a number")]
    InvalidNumber(String),

    #[error("Value {0:?} is not finite")]
    NotFinite(String),
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Parse an `"x,y,z"` string into a position.
///
/// Whitespace around each value is allowed. Non-finite values are rejected.
pub fn parse_xyz(s: &str) -> Result<Position3, PoseParseError> {
    let fields: Vec<&str> = s.split(',').map(str::trim).collect();

    if fields.len() != 3 {
        return Err(PoseParseError::WrongFieldCount(fields.len()));
    }

    let mut vals = [0f64; 3];
    for (v, f) in vals.iter_mut().zip(fields.iter()) {
        *v = f
            .parse()
            .map_err(|_| PoseParseError::InvalidNumber(f.to_string()))?;

        if !v.is_finite() {
            return Err(PoseParseError::NotFinite(f.to_string()));
        }
    }

    Ok(Position3::new(vals[0], vals[1], vals[2]))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_xyz() {
        assert_eq!(parse_xyz("1.5,0,-2").unwrap(), Position3::new(1.5, 0.0, -2.0));
        assert_eq!(parse_xyz(" 10 , 2.0 ,30 ").unwrap(), Position3::new(10.0, 2.0, 30.0));

        assert_eq!(parse_xyz("1,2"), Err(PoseParseError::WrongFieldCount(2)));
        assert_eq!(parse_xyz(""), Err(PoseParseError::WrongFieldCount(1)));
        assert_eq!(parse_xyz("1,2,3,4"), Err(PoseParseError::WrongFieldCount(4)));
        assert_eq!(
            parse_xyz("1,two,3"),
            Err(PoseParseError::InvalidNumber("two".into()))
        );
        assert_eq!(parse_xyz("1,NaN,3"), Err(PoseParseError::NotFinite("NaN".into())));
        assert_eq!(parse_xyz("inf,0,3"), Err(PoseParseError::NotFinite("inf".into())));
    }
}
