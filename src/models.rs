use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AttendanceError;
use crate::model::attendance::{MAX_NAME_LEN, MAX_STATUS_LEN, MAX_TIME_LEN};

/// Confidence as sent by clients: the browser client posts `"0.93"`, others a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfidenceInput {
    Number(f64),
    Text(String),
}

impl ConfidenceInput {
    fn value(&self) -> Option<f64> {
        match self {
            ConfidenceInput::Number(n) => Some(*n),
            ConfidenceInput::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MarkAttendanceReq {
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,

    #[schema(example = "Present")]
    pub status: Option<String>,

    #[schema(example = 0.93, value_type = f64)]
    pub confidence: Option<ConfidenceInput>,

    #[schema(example = "9:02:11 AM")]
    pub time: Option<String>,
}

/// Submission fields after validation; the date is assigned by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidMark {
    pub name: String,
    pub status: String,
    pub confidence: f64,
    pub time: String,
}

impl MarkAttendanceReq {
    pub fn validate(self, min_confidence: f64) -> Result<ValidMark, AttendanceError> {
        let (Some(name), Some(status), Some(confidence), Some(time)) = (
            non_blank(self.name),
            non_blank(self.status),
            self.confidence,
            non_blank(self.time),
        ) else {
            return Err(AttendanceError::MissingFields);
        };

        within("name", &name, MAX_NAME_LEN)?;
        within("status", &status, MAX_STATUS_LEN)?;
        within("time", &time, MAX_TIME_LEN)?;

        let confidence = confidence
            .value()
            .filter(|c| (0.0..=1.0).contains(c))
            .ok_or(AttendanceError::InvalidConfidence)?;

        if confidence < min_confidence {
            return Err(AttendanceError::LowConfidence);
        }

        Ok(ValidMark {
            name,
            status,
            confidence,
            time,
        })
    }
}

/// Limits count characters, as MySQL `VARCHAR` does.
fn within(field: &'static str, value: &str, max: usize) -> Result<(), AttendanceError> {
    if value.chars().count() > max {
        return Err(AttendanceError::FieldTooLong(field, max));
    }
    Ok(())
}

fn non_blank(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn req(confidence: serde_json::Value) -> MarkAttendanceReq {
        serde_json::from_value(json!({
            "name": "Ada",
            "status": "Present",
            "confidence": confidence,
            "time": "9:00:00 AM"
        }))
        .unwrap()
    }

    #[test]
    fn confidence_boundary() {
        assert!(matches!(
            req(json!(0.79)).validate(0.8),
            Err(AttendanceError::LowConfidence)
        ));
        assert_eq!(req(json!(0.80)).validate(0.8).unwrap().confidence, 0.8);
    }

    #[test]
    fn accepts_confidence_as_string() {
        let valid = req(json!("0.93")).validate(0.8).unwrap();
        assert_eq!(valid.confidence, 0.93);

        assert!(matches!(
            req(json!("0.79")).validate(0.8),
            Err(AttendanceError::LowConfidence)
        ));
    }

    #[test]
    fn rejects_confidence_outside_unit_range_or_unparseable() {
        for bad in [json!(1.2), json!(-0.1), json!("very sure")] {
            assert!(matches!(
                req(bad).validate(0.8),
                Err(AttendanceError::InvalidConfidence)
            ));
        }
    }

    #[test]
    fn missing_or_blank_fields_are_rejected() {
        let missing_time: MarkAttendanceReq = serde_json::from_value(json!({
            "name": "Ada", "status": "Present", "confidence": 0.9
        }))
        .unwrap();
        assert!(matches!(
            missing_time.validate(0.8),
            Err(AttendanceError::MissingFields)
        ));

        let blank_name: MarkAttendanceReq = serde_json::from_value(json!({
            "name": "   ", "status": "Present", "confidence": 0.9, "time": "9:00:00 AM"
        }))
        .unwrap();
        assert!(matches!(
            blank_name.validate(0.8),
            Err(AttendanceError::MissingFields)
        ));

        let no_confidence: MarkAttendanceReq = serde_json::from_value(json!({
            "name": "Ada", "status": "Present", "time": "9:00:00 AM"
        }))
        .unwrap();
        assert!(matches!(
            no_confidence.validate(0.8),
            Err(AttendanceError::MissingFields)
        ));
    }

    #[test]
    fn fields_longer_than_their_columns_are_rejected() {
        let long_status: MarkAttendanceReq = serde_json::from_value(json!({
            "name": "Ada",
            "status": "P".repeat(MAX_STATUS_LEN + 1),
            "confidence": 0.9,
            "time": "9:00:00 AM"
        }))
        .unwrap();
        assert!(matches!(
            long_status.validate(0.8),
            Err(AttendanceError::FieldTooLong("status", MAX_STATUS_LEN))
        ));

        let long_time: MarkAttendanceReq = serde_json::from_value(json!({
            "name": "Ada", "status": "Present", "confidence": 0.9, "time": "9".repeat(MAX_TIME_LEN + 1)
        }))
        .unwrap();
        assert!(matches!(
            long_time.validate(0.8),
            Err(AttendanceError::FieldTooLong("time", MAX_TIME_LEN))
        ));

        // Multi-byte names are measured in characters, not bytes.
        let widest: MarkAttendanceReq = serde_json::from_value(json!({
            "name": "é".repeat(MAX_NAME_LEN), "status": "Present", "confidence": 0.9, "time": "9:00:00 AM"
        }))
        .unwrap();
        assert!(widest.validate(0.8).is_ok());

        let too_wide: MarkAttendanceReq = serde_json::from_value(json!({
            "name": "é".repeat(MAX_NAME_LEN + 1), "status": "Present", "confidence": 0.9, "time": "9:00:00 AM"
        }))
        .unwrap();
        assert!(matches!(
            too_wide.validate(0.8),
            Err(AttendanceError::FieldTooLong("name", MAX_NAME_LEN))
        ));
    }

    #[test]
    fn trims_names() {
        let valid: MarkAttendanceReq = serde_json::from_value(json!({
            "name": " Ada ", "status": "Present", "confidence": 0.9, "time": "9:00:00 AM"
        }))
        .unwrap();
        assert_eq!(valid.validate(0.8).unwrap().name, "Ada");
    }
}
