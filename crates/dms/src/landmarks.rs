//! Facial landmark snapshots and the index layout used to pick eye and mouth points

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Point2;
use crate::DmsError;

/// Six eye contour points: p0/p3 corners, p1/p5 and p2/p4 lid pairs
pub type EyePoints = [Point2; 6];

/// Four mouth points: q0/q1 corners, q2/q3 inner lip pair
pub type MouthPoints = [Point2; 4];

/// One tick's worth of landmark coordinates, keyed by landmark index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSnapshot {
    points: BTreeMap<u32, Point2>,
}

impl LandmarkSnapshot {
    pub fn new(points: BTreeMap<u32, Point2>) -> Self {
        Self { points }
    }

    pub fn get(&self, index: u32) -> Option<Point2> {
        self.points.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, Point2)> + '_ {
        self.points.iter().map(|(&index, &point)| (index, point))
    }

    /// Pick the points named by `indices`, in order
    pub fn select<const N: usize>(&self, indices: &[u32; N]) -> Result<[Point2; N], DmsError> {
        let mut points = [Point2::default(); N];
        for (slot, &index) in points.iter_mut().zip(indices.iter()) {
            *slot = self.get(index).ok_or(DmsError::LandmarkMissing(index))?;
        }
        Ok(points)
    }
}

impl FromIterator<(u32, Point2)> for LandmarkSnapshot {
    fn from_iter<I: IntoIterator<Item = (u32, Point2)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Landmark indices for both eyes and the mouth
///
/// Defaults follow the MediaPipe FaceMesh (468 point) index space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkLayout {
    pub left_eye: [u32; 6],
    pub right_eye: [u32; 6],
    pub mouth: [u32; 4],
}

impl Default for LandmarkLayout {
    fn default() -> Self {
        Self {
            left_eye: [33, 160, 158, 133, 153, 144],
            right_eye: [263, 387, 385, 362, 380, 373],
            mouth: [61, 291, 13, 14],
        }
    }
}

impl LandmarkLayout {
    pub fn left_eye(&self, snapshot: &LandmarkSnapshot) -> Result<EyePoints, DmsError> {
        snapshot.select(&self.left_eye)
    }

    pub fn right_eye(&self, snapshot: &LandmarkSnapshot) -> Result<EyePoints, DmsError> {
        snapshot.select(&self.right_eye)
    }

    pub fn mouth(&self, snapshot: &LandmarkSnapshot) -> Result<MouthPoints, DmsError> {
        snapshot.select(&self.mouth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_preserves_order() {
        let snapshot: LandmarkSnapshot = [
            (13, Point2::new(1.0, 1.0)),
            (14, Point2::new(2.0, 2.0)),
            (61, Point2::new(3.0, 3.0)),
            (291, Point2::new(4.0, 4.0)),
        ]
        .into_iter()
        .collect();

        let mouth = LandmarkLayout::default().mouth(&snapshot).unwrap();
        assert_eq!(mouth[0], Point2::new(3.0, 3.0));
        assert_eq!(mouth[1], Point2::new(4.0, 4.0));
        assert_eq!(mouth[2], Point2::new(1.0, 1.0));
        assert_eq!(mouth[3], Point2::new(2.0, 2.0));
    }

    #[test]
    fn test_select_reports_missing_index() {
        let snapshot: LandmarkSnapshot = [(33, Point2::new(0.0, 0.0))].into_iter().collect();
        let err = LandmarkLayout::default().left_eye(&snapshot).unwrap_err();
        assert!(matches!(err, DmsError::LandmarkMissing(160)));
    }
}
