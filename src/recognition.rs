//! Client-side gating between an image classifier and `POST /mark-attendance`.
//!
//! The classifier itself is a black box: anything that turns a frame into
//! labelled probabilities can implement [`Classifier`].

use chrono::{Local, NaiveTime};
use derive_more::Display;

use crate::model::attendance::STATUS_PRESENT;
use crate::models::{ConfidenceInput, MarkAttendanceReq};

/// Label the classifier emits when no known face is in frame.
pub const NO_FACE_LABEL: &str = "No face";

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub probability: f32,
}

pub trait Classifier {
    type Frame;
    type Error;

    fn predict(&self, frame: &Self::Frame) -> Result<Vec<Prediction>, Self::Error>;
}

#[derive(Debug, Display, PartialEq)]
pub enum Rejection {
    #[display(fmt = "classifier returned no predictions")]
    NoPrediction,

    #[display(fmt = "No valid face detected.")]
    NoFace,

    #[display(fmt = "{} recognised with confidence {:.2}, below {:.2}", label, probability, threshold)]
    LowConfidence {
        label: String,
        probability: f32,
        threshold: f32,
    },
}

/// Highest-probability prediction; the last wins a tie.
pub fn best_prediction(predictions: &[Prediction]) -> Option<&Prediction> {
    predictions
        .iter()
        .reduce(|best, p| if p.probability >= best.probability { p } else { best })
}

/// Turns classifier output into a submission, or explains why nothing should be sent.
pub fn candidate_from(
    predictions: &[Prediction],
    threshold: f32,
    time: NaiveTime,
) -> Result<MarkAttendanceReq, Rejection> {
    let best = best_prediction(predictions).ok_or(Rejection::NoPrediction)?;

    if best.label == NO_FACE_LABEL {
        return Err(Rejection::NoFace);
    }
    if best.probability < threshold {
        return Err(Rejection::LowConfidence {
            label: best.label.clone(),
            probability: best.probability,
            threshold,
        });
    }

    // Two decimals, matching what the server shows and exports.
    let confidence = (f64::from(best.probability) * 100.0).round() / 100.0;

    Ok(MarkAttendanceReq {
        name: Some(best.label.clone()),
        status: Some(STATUS_PRESENT.to_string()),
        confidence: Some(ConfidenceInput::Number(confidence)),
        time: Some(time.format("%-I:%M:%S %p").to_string()),
    })
}

/// Classifies one frame and builds a submission stamped with the local time.
pub fn recognize<C: Classifier>(
    classifier: &C,
    frame: &C::Frame,
    threshold: f32,
) -> Result<Result<MarkAttendanceReq, Rejection>, C::Error> {
    let predictions = classifier.predict(frame)?;
    Ok(candidate_from(&predictions, threshold, Local::now().time()))
}
