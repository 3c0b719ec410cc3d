//! EAR / MAR signal extraction
//!
//! Both ratios divide by a reference width. A zero or non-finite width means the
//! landmarks are degenerate for this tick and no value is produced.

use crate::geometry::distance;
use crate::landmarks::{EyePoints, LandmarkLayout, LandmarkSnapshot, MouthPoints};
use crate::DmsError;

fn guarded_ratio(numerator: f64, reference: f64, signal: &'static str) -> Result<f64, DmsError> {
    if !(reference.is_finite() && reference > 0.0) {
        return Err(DmsError::DegenerateGeometry(signal));
    }
    let value = numerator / reference;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DmsError::DegenerateGeometry(signal))
    }
}

/// Eye aspect ratio: (|p1-p5| + |p2-p4|) / (2 |p0-p3|)
pub fn eye_aspect_ratio(eye: &EyePoints) -> Result<f64, DmsError> {
    let vertical = distance(eye[1], eye[5]) + distance(eye[2], eye[4]);
    let horizontal = distance(eye[0], eye[3]);
    guarded_ratio(vertical, 2.0 * horizontal, "ear")
}

/// Mouth aspect ratio: inner lip gap |q2-q3| over corner width |q0-q1|
pub fn mouth_aspect_ratio(mouth: &MouthPoints) -> Result<f64, DmsError> {
    guarded_ratio(distance(mouth[2], mouth[3]), distance(mouth[0], mouth[1]), "mar")
}

/// Mean EAR of both eyes. Unavailable if either eye is degenerate.
pub fn combined_ear(left_eye: &EyePoints, right_eye: &EyePoints) -> Result<f64, DmsError> {
    let left = eye_aspect_ratio(left_eye)?;
    let right = eye_aspect_ratio(right_eye)?;
    Ok((left + right) / 2.0)
}

/// Reads EAR and MAR out of landmark snapshots using a fixed layout
#[derive(Debug, Clone, Default)]
pub struct SignalExtractor {
    layout: LandmarkLayout,
}

impl SignalExtractor {
    pub fn new(layout: LandmarkLayout) -> Self {
        Self { layout }
    }

    pub fn ear(&self, snapshot: &LandmarkSnapshot) -> Result<f64, DmsError> {
        let left = self.layout.left_eye(snapshot)?;
        let right = self.layout.right_eye(snapshot)?;
        combined_ear(&left, &right)
    }

    pub fn mar(&self, snapshot: &LandmarkSnapshot) -> Result<f64, DmsError> {
        mouth_aspect_ratio(&self.layout.mouth(snapshot)?)
    }
}
