//! Summary statistics over a reconstructed program

use serde::{Deserialize, Serialize};
use std::fmt;

use mpfview_core::{Bounds, Point2D, Program};

use crate::segmentation::path_length;

/// Counts and path lengths for a whole program
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramStats {
    pub part_count: usize,
    pub skipped_part_count: usize,
    pub contour_count: usize,
    pub remnant_count: usize,
    pub pierce_count: usize,
    pub segment_count: usize,
    pub arc_count: usize,
    /// Millimeters, laser on
    pub lead_in_length: f64,
    /// Millimeters, laser off
    pub approach_length: f64,
    /// Millimeters, laser on
    pub cutting_length: f64,
}

impl ProgramStats {
    pub fn from_program(program: &Program) -> Self {
        let mut stats = Self {
            part_count: program.parts.len(),
            skipped_part_count: program.skipped_parts.len(),
            ..Self::default()
        };

        for contour in program.parts.iter().flat_map(|part| &part.contours) {
            stats.contour_count += 1;
            if contour.remnant {
                stats.remnant_count += 1;
            }
            if contour.piercing_type.pierces() {
                stats.pierce_count += 1;
            }
            stats.segment_count += contour.all_segments.len();
            stats.arc_count += contour.all_segments.iter().filter(|s| s.is_arc()).count();
            stats.lead_in_length += path_length(contour.lead_in_segments());
            stats.approach_length += path_length(&contour.approach_path);
            stats.cutting_length += path_length(&contour.cutting_path);
        }

        stats
    }

    /// Travel with the laser firing
    pub fn laser_on_length(&self) -> f64 {
        self.lead_in_length + self.cutting_length
    }

    pub fn total_length(&self) -> f64 {
        self.laser_on_length() + self.approach_length
    }
}

impl fmt::Display for ProgramStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Parts: {} ({} skipped)",
            self.part_count, self.skipped_part_count
        )?;
        writeln!(
            f,
            "Contours: {} ({} remnant, {} pierces)",
            self.contour_count, self.remnant_count, self.pierce_count
        )?;
        writeln!(
            f,
            "Segments: {} ({} arcs)",
            self.segment_count, self.arc_count
        )?;
        write!(
            f,
            "Length: {:.2} mm cut, {:.2} mm lead-in, {:.2} mm approach",
            self.cutting_length, self.lead_in_length, self.approach_length
        )
    }
}

/// Sheet-space bounds of every placed part
///
/// Corners of each part's local bounds are mapped through the placement
/// transform, so rotated parts are boxed conservatively.
pub fn sheet_bounds(program: &Program) -> Option<Bounds> {
    let mut bounds = Bounds::new();
    for part in &program.parts {
        let Some(local) = part.bounds() else {
            continue;
        };
        let corners = [
            local.min,
            local.max,
            Point2D::new(local.min.x, local.max.y),
            Point2D::new(local.max.x, local.min.y),
        ];
        for corner in corners {
            bounds.update(part.to_world(corner));
        }
    }
    bounds.is_valid().then_some(bounds)
}
