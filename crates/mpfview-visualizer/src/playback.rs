//! Program-level playback sampling
//!
//! Walks every contour in traversal order: pierce point, lead-in, approach,
//! cutting. Each point also carries its sheet position.

use tracing::debug;

use mpfview_core::{Contour, Part, PathSegment, Program, SegmentationError};

use crate::segmentation::{PathLabel, PathPoint, PathSampler, PathType};

/// Sample one contour of a placed part
///
/// Segment indices refer to the contour's `all_segments`. Contours share no
/// state, so each one can be sampled as an independent batch.
pub fn sample_contour(
    sampler: &PathSampler,
    part: &Part,
    part_index: usize,
    contour_index: usize,
    contour: &Contour,
) -> Result<Vec<PathPoint>, SegmentationError> {
    let mut points = Vec::new();

    if contour.piercing_type.pierces() {
        points.push(PathPoint {
            position: contour.piercing_position,
            world_position: None,
            part_index,
            contour_index,
            segment_index: 0,
            step_index: 0,
            progress: 0.0,
            laser_on: false,
            path_type: PathType::Piercing,
        });
    }

    let phases: [(&[PathSegment], PathType); 3] = [
        (contour.lead_in_segments(), PathType::LeadIn),
        (contour.approach_path.as_slice(), PathType::Approach),
        (contour.cutting_path.as_slice(), PathType::Cutting),
    ];
    let mut first_index = 0;
    for (segments, path_type) in phases {
        let label = PathLabel::new(part_index, contour_index, path_type);
        for (offset, segment) in segments.iter().enumerate() {
            sampler.sample_segment(segment, first_index + offset, label, &mut points)?;
        }
        first_index += segments.len();
    }

    for point in &mut points {
        point.world_position = Some(part.to_world(point.position));
    }
    Ok(points)
}

/// Sample every contour of every part, in program order
pub fn sample_program(
    program: &Program,
    sampler: &PathSampler,
) -> Result<Vec<PathPoint>, SegmentationError> {
    let mut points = Vec::new();
    for (part_index, part) in program.parts.iter().enumerate() {
        for (contour_index, contour) in part.contours.iter().enumerate() {
            points.extend(sample_contour(
                sampler,
                part,
                part_index,
                contour_index,
                contour,
            )?);
        }
    }
    debug!(
        "Sampled {} parts into {} playback points at {} mm",
        program.parts.len(),
        points.len(),
        sampler.step_size()
    );
    Ok(points)
}
