//! Fixed-step distance sampling of contour paths
//!
//! Every segment is cut into `ceil(length / step)` equal parameter steps and
//! sampled at `steps + 1` points, so both endpoints are always emitted. The
//! join point of consecutive segments therefore appears twice. A segment
//! needing more than [`MAX_STEPS_PER_SEGMENT`] steps is rejected.

use serde::{Deserialize, Serialize};
use tracing::debug;

use mpfview_core::constants::MAX_STEPS_PER_SEGMENT;
use mpfview_core::{PathSegment, Point2D, SegmentationError};

/// Phase of a contour a sampled point belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathType {
    Piercing,
    LeadIn,
    Approach,
    Cutting,
}

impl PathType {
    /// Whether the laser fires while traversing this phase
    pub fn laser_on(&self) -> bool {
        !matches!(self, PathType::Piercing | PathType::Approach)
    }
}

/// Caller-supplied labels copied onto every sampled point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathLabel {
    pub part_index: usize,
    pub contour_index: usize,
    pub laser_on: bool,
    pub path_type: PathType,
}

impl PathLabel {
    /// Label with the laser state implied by the path type
    pub fn new(part_index: usize, contour_index: usize, path_type: PathType) -> Self {
        Self {
            part_index,
            contour_index,
            laser_on: path_type.laser_on(),
            path_type,
        }
    }
}

/// One sampled playback position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathPoint {
    /// Part-local position
    pub position: Point2D,
    /// Sheet position after the part placement transform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_position: Option<Point2D>,
    pub part_index: usize,
    pub contour_index: usize,
    /// Index of the source segment in the sampled list
    pub segment_index: usize,
    /// Index of the point within its segment
    pub step_index: usize,
    /// Parameter along the segment, `0.0..=1.0`
    pub progress: f64,
    pub laser_on: bool,
    pub path_type: PathType,
}

/// Total length of a segment list in millimeters
pub fn path_length(segments: &[PathSegment]) -> f64 {
    segments.iter().map(PathSegment::length).sum()
}

/// Distance sampler with a validated step size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSampler {
    step_size: f64,
}

impl PathSampler {
    /// Create a sampler; the step must be a positive, finite number of millimeters
    pub fn new(step_size: f64) -> Result<Self, SegmentationError> {
        if step_size.is_finite() && step_size > 0.0 {
            Ok(Self { step_size })
        } else {
            Err(SegmentationError::InvalidStepSize { step_size })
        }
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Number of parameter steps for one segment (0 for a zero-length segment)
    pub fn steps_for(&self, segment: &PathSegment) -> Result<usize, SegmentationError> {
        let length = segment.length();
        if !length.is_finite() || length <= 0.0 {
            return Ok(0);
        }
        let steps = (length / self.step_size).ceil();
        if !(steps <= MAX_STEPS_PER_SEGMENT as f64) {
            return Err(SegmentationError::TooManySteps {
                length,
                step_size: self.step_size,
                limit: MAX_STEPS_PER_SEGMENT,
            });
        }
        Ok(steps as usize)
    }

    /// Sample one segment, appending its points to `out`
    pub fn sample_segment(
        &self,
        segment: &PathSegment,
        segment_index: usize,
        label: PathLabel,
        out: &mut Vec<PathPoint>,
    ) -> Result<(), SegmentationError> {
        let steps = self.steps_for(segment)?;
        out.reserve(steps + 1);
        for step_index in 0..=steps {
            let progress = if steps > 0 {
                step_index as f64 / steps as f64
            } else {
                0.0
            };
            out.push(PathPoint {
                position: segment.point_at(progress),
                world_position: None,
                part_index: label.part_index,
                contour_index: label.contour_index,
                segment_index,
                step_index,
                progress,
                laser_on: label.laser_on,
                path_type: label.path_type,
            });
        }
        Ok(())
    }

    /// Sample a segment list in order, concatenating the per-segment points
    pub fn segment(
        &self,
        segments: &[PathSegment],
        label: PathLabel,
    ) -> Result<Vec<PathPoint>, SegmentationError> {
        let mut points = Vec::new();
        for (index, segment) in segments.iter().enumerate() {
            self.sample_segment(segment, index, label, &mut points)?;
        }
        Ok(points)
    }
}

/// Sample `segments` at `step_size` millimeters
///
/// Fails with [`SegmentationError::InvalidStepSize`] when the step is not a
/// positive finite number, and with [`SegmentationError::TooManySteps`] when
/// it is too small for one of the segments.
pub fn segment_path(
    segments: &[PathSegment],
    step_size: f64,
    label: PathLabel,
) -> Result<Vec<PathPoint>, SegmentationError> {
    let sampler = PathSampler::new(step_size)?;
    let points = sampler.segment(segments, label)?;
    debug!(
        "Sampled {} segments into {} points at {} mm",
        segments.len(),
        points.len(),
        step_size
    );
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn cutting() -> PathLabel {
        PathLabel::new(0, 0, PathType::Cutting)
    }

    #[test]
    fn test_invalid_step_sizes() {
        for step in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(PathSampler::new(step).is_err());
        }
        let err = segment_path(&[], 0.0, cutting()).unwrap_err();
        assert!(matches!(err, SegmentationError::InvalidStepSize { .. }));
    }

    #[test]
    fn test_tiny_step_is_rejected_not_looped() {
        let line = PathSegment::line(Point2D::ORIGIN, Point2D::new(1.0, 0.0));
        let err = segment_path(&[line], 1e-300, cutting()).unwrap_err();
        assert!(matches!(
            err,
            SegmentationError::TooManySteps { limit: MAX_STEPS_PER_SEGMENT, .. }
        ));

        // Half the limit is still accepted
        let sampler = PathSampler::new(2.0 / MAX_STEPS_PER_SEGMENT as f64).unwrap();
        let steps = sampler.steps_for(&line).unwrap();
        assert!(steps <= MAX_STEPS_PER_SEGMENT / 2 + 1);
    }

    #[test]
    fn test_closed_arc_emits_one_point() {
        let start = Point2D::new(10.0, 0.0);
        let arc = PathSegment::arc(start, start, Point2D::ORIGIN, false);
        let points = segment_path(&[arc], 1.0, cutting()).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].progress, 0.0);
    }

    #[test]
    fn test_empty_list_yields_no_points() {
        let points = segment_path(&[], 1.0, cutting()).unwrap();
        assert!(points.is_empty());
        assert_eq!(path_length(&[]), 0.0);
    }

    #[test]
    fn test_line_point_count_rounds_up() {
        let line = PathSegment::line(Point2D::ORIGIN, Point2D::new(2.5, 0.0));
        let points = segment_path(&[line], 1.0, cutting()).unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0].position, Point2D::ORIGIN);
        assert_eq!(points[3].position, Point2D::new(2.5, 0.0));
        assert_eq!(points[3].progress, 1.0);
        assert_eq!(points[3].step_index, 3);
    }

    #[test]
    fn test_zero_length_segment_emits_one_point() {
        let p = Point2D::new(4.0, 4.0);
        let degenerate_arc = PathSegment::arc(p, p, p, true);
        let points = segment_path(&[degenerate_arc], 1.0, cutting()).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].position, p);
        assert_eq!(points[0].progress, 0.0);
    }

    #[test]
    fn test_join_points_are_not_deduplicated() {
        let a = PathSegment::line(Point2D::ORIGIN, Point2D::new(1.0, 0.0));
        let b = PathSegment::line(Point2D::new(1.0, 0.0), Point2D::new(1.0, 1.0));
        let points = segment_path(&[a, b], 1.0, cutting()).unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[1].position, points[2].position);
        assert_eq!(points[1].segment_index, 0);
        assert_eq!(points[2].segment_index, 1);
    }

    #[test]
    fn test_half_circle_samples_stay_on_circle() {
        let center = Point2D::new(5.0, 0.0);
        let arc = PathSegment::arc(Point2D::ORIGIN, Point2D::new(10.0, 0.0), center, true);
        assert!((path_length(&[arc]) - 5.0 * PI).abs() < 1e-9);

        let points = segment_path(&[arc], 1.0, cutting()).unwrap();
        assert_eq!(points.len(), 17);
        for point in &points {
            assert!((point.position.distance_to(&center) - 5.0).abs() < 1e-9);
        }
        let last = points.last().unwrap().position;
        assert!(last.distance_to(&Point2D::new(10.0, 0.0)) < 1e-9);
    }

    #[test]
    fn test_labels_are_copied() {
        let line = PathSegment::line(Point2D::ORIGIN, Point2D::new(1.0, 0.0));
        let label = PathLabel::new(3, 7, PathType::Approach);
        assert!(!label.laser_on);
        let points = segment_path(&[line], 0.5, label).unwrap();
        assert!(points.iter().all(|p| p.part_index == 3
            && p.contour_index == 7
            && !p.laser_on
            && p.path_type == PathType::Approach));
    }

    #[test]
    fn test_path_type_serializes_camel_case() {
        let json = serde_json::to_string(&PathType::LeadIn).unwrap();
        assert_eq!(json, "\"leadIn\"");
    }
}
