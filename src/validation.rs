//! Validation of submitted training payloads.
//!
//! Pure checks, applied in a fixed order so clients get deterministic
//! error reporting: missing -> empty -> type -> length. Nothing here
//! touches the database; a payload that fails validation is rejected
//! before any mutation happens.

use serde_json::Value;

use crate::error::{Error, Result};

/// Maximum number of data points accepted in a single audio payload.
/// The boundary is inclusive: a payload of exactly this length is stored.
pub const MAX_AUDIO_POINTS: usize = 20_000;

/// Validate a submitted audio payload and return the parsed samples.
pub fn validate_audio(data: Option<&Value>) -> Result<Vec<f64>> {
    let items = require_sequence(require_present(data)?)?;
    require_non_empty(items)?;
    let samples = require_numeric(items)?;
    require_within_max(&samples)?;
    Ok(samples)
}

fn require_present(data: Option<&Value>) -> Result<&Value> {
    match data {
        None | Some(Value::Null) => Err(Error::MissingData),
        Some(value) => Ok(value),
    }
}

fn require_sequence(data: &Value) -> Result<&[Value]> {
    data.as_array()
        .map(Vec::as_slice)
        .ok_or(Error::InvalidData)
}

fn require_non_empty(items: &[Value]) -> Result<()> {
    if items.is_empty() {
        return Err(Error::EmptyData);
    }
    Ok(())
}

/// Strict numeric type check: string numerals and any other non-number
/// JSON value are rejected, never coerced.
fn require_numeric(items: &[Value]) -> Result<Vec<f64>> {
    items
        .iter()
        .map(|item| {
            item.as_f64()
                .filter(|n| n.is_finite())
                .ok_or(Error::InvalidData)
        })
        .collect()
}

fn require_within_max(samples: &[f64]) -> Result<()> {
    if samples.len() > MAX_AUDIO_POINTS {
        return Err(Error::TooLong);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn accepts_a_plain_payload() {
        let data = json!([0.25, -1.5, 3.0, 42]);
        let samples = validate_audio(Some(&data)).unwrap();
        assert_eq!(samples, vec![0.25, -1.5, 3.0, 42.0]);
    }

    #[test]
    fn missing_data_is_reported_first() {
        assert!(matches!(validate_audio(None), Err(Error::MissingData)));
        assert!(matches!(
            validate_audio(Some(&Value::Null)),
            Err(Error::MissingData)
        ));
    }

    #[test]
    fn empty_payload_is_rejected() {
        let data = json!([]);
        assert!(matches!(
            validate_audio(Some(&data)),
            Err(Error::EmptyData)
        ));
    }

    #[rstest]
    #[case(json!([1, 2, " "]))]
    #[case(json!(["abc"]))]
    #[case(json!([1, null, 3]))]
    #[case(json!([[1, 2], 3]))]
    #[case(json!([1, "2", 3]))]
    #[case(json!("not-an-array"))]
    #[case(json!({"0": 1.0}))]
    fn non_numeric_content_is_rejected(#[case] data: Value) {
        assert!(matches!(
            validate_audio(Some(&data)),
            Err(Error::InvalidData)
        ));
    }

    #[test]
    fn length_boundary_is_inclusive() {
        let at_max = Value::Array(vec![json!(0.5); MAX_AUDIO_POINTS]);
        assert_eq!(validate_audio(Some(&at_max)).unwrap().len(), MAX_AUDIO_POINTS);

        let over_max = Value::Array(vec![json!(0.5); MAX_AUDIO_POINTS + 1]);
        assert!(matches!(
            validate_audio(Some(&over_max)),
            Err(Error::TooLong)
        ));
    }

    #[test]
    fn type_check_runs_before_length_check() {
        let mut items = vec![json!("oops")];
        items.extend(std::iter::repeat(json!(1.0)).take(MAX_AUDIO_POINTS + 10));
        let data = Value::Array(items);
        assert!(matches!(
            validate_audio(Some(&data)),
            Err(Error::InvalidData)
        ));
    }
}
