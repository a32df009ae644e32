//! Reconstructed program model: sheet, nesting, parts and contours
//!
//! Everything here is produced by a single parse call and is read-only
//! afterwards. Re-parsing the same text yields an equal tree.

use serde::{Deserialize, Serialize};

use crate::codes::{AssistGas, CuttingType, MaterialType, PiercingType};
use crate::command::Command;
use crate::geometry::{Bounds, PathSegment, Point2D};

/// Width/height pair in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Technology database selection (`HKLDB`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDescriptor {
    pub material: MaterialType,
    pub db_name: String,
    pub assist_gas: AssistGas,
}

/// Sheet setup (`HKINI`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetSetup {
    /// Declared number of placed parts
    pub total_parts: u32,
    pub width: f64,
    pub height: f64,
}

/// One placement from the nesting section (`HKOST`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestingEntry {
    /// Block number active where the placement was declared
    pub origin_block_number: u32,
    pub origin: Point2D,
    /// Degrees, applied about the origin before translation
    pub rotation: f64,
    /// Block number where the part's contour code begins
    pub part_code_block: u32,
    pub contour_count: u32,
}

impl NestingEntry {
    /// Identifier of the part built from this placement
    ///
    /// Uses the placement's block number so that repeated placements of the
    /// same part code get distinct ids.
    pub fn part_id(&self) -> String {
        format!("part-{}", self.origin_block_number)
    }
}

/// Optional entry cut of a contour (`HKLEA`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadIn {
    /// Motion code of the lead-in (1 line, 2/3 arc)
    pub code: i32,
    pub segment: PathSegment,
}

/// One continuous cut or mark path of a part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contour {
    pub id: String,
    /// Block number active at the contour start
    pub block_number: u32,
    pub piercing_type: PiercingType,
    pub cutting_type: CuttingType,
    pub piercing_position: Point2D,
    pub tool_compensation: i32,
    /// Width/height declared by the contour start
    pub declared_size: Dimensions,
    /// Opened by a remnant-cut marker instead of a contour start
    pub remnant: bool,
    pub lead_in: Option<LeadIn>,
    /// Laser-off travel recorded before cutting starts
    pub approach_path: Vec<PathSegment>,
    /// Laser-on path recorded after cutting starts
    pub cutting_path: Vec<PathSegment>,
    pub end_code: i32,
    pub end_position: Point2D,
    /// Web flag of the contour end, carried through unchanged
    pub web: i32,
    /// Lead-in, approach and cutting segments in traversal order
    pub all_segments: Vec<PathSegment>,
}

impl Contour {
    /// Lead-in segments (zero or one)
    pub fn lead_in_segments(&self) -> &[PathSegment] {
        match &self.lead_in {
            Some(lead_in) => std::slice::from_ref(&lead_in.segment),
            None => &[],
        }
    }

    /// Geometric extent of the contour, arcs included with their sweep
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::of_segments(&self.all_segments);
        bounds.update(self.piercing_position);
        if !self.all_segments.is_empty() {
            bounds.update(self.end_position);
        }
        bounds
    }

    /// Total length of all segments in millimeters
    pub fn path_length(&self) -> f64 {
        self.all_segments.iter().map(PathSegment::length).sum()
    }
}

/// A placed part with its contours in part-local coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: String,
    /// Block number where the part's contour code begins
    pub block_number: u32,
    /// Block number of the placement that produced this part
    pub origin_block_number: u32,
    pub origin: Point2D,
    /// Degrees, applied about the origin before translation
    pub rotation: f64,
    pub contours: Vec<Contour>,
}

impl Part {
    /// Nominal on-screen extent: the last contour's declared size
    ///
    /// Only meant for a placement box. Use [`Part::bounds`] for geometry.
    pub fn nominal_extent(&self) -> Option<Dimensions> {
        self.contours.last().map(|contour| contour.declared_size)
    }

    /// Part-local geometric bounds over every contour
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds = Bounds::new();
        for contour in &self.contours {
            bounds.merge(&contour.bounds());
        }
        bounds.is_valid().then_some(bounds)
    }

    /// Map a part-local point onto the sheet: rotate, then translate by the origin
    pub fn to_world(&self, point: Point2D) -> Point2D {
        let rotated = point.rotated(self.rotation);
        rotated.offset(self.origin.x, self.origin.y)
    }
}

/// A nesting entry whose part code could not be located
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedPart {
    pub part_id: String,
    pub part_code_block: u32,
}

/// A fully reconstructed MPF program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub version: String,
    pub material: MaterialDescriptor,
    pub setup: SheetSetup,
    pub workpiece: Dimensions,
    pub nesting: Vec<NestingEntry>,
    pub parts: Vec<Part>,
    /// Placements dropped because their part code was missing
    pub skipped_parts: Vec<SkippedPart>,
    /// Tokenized input, kept for debugging views
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub raw_commands: Vec<Command>,
}

impl Program {
    pub fn contour_count(&self) -> usize {
        self.parts.iter().map(|part| part.contours.len()).sum()
    }

    /// Whether every nesting entry produced a part
    pub fn is_complete(&self) -> bool {
        self.skipped_parts.is_empty()
    }

    pub fn part(&self, id: &str) -> Option<&Part> {
        self.parts.iter().find(|part| part.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contour(declared: Dimensions, segments: Vec<PathSegment>) -> Contour {
        Contour {
            id: "contour-1".to_string(),
            block_number: 1,
            piercing_type: PiercingType(1),
            cutting_type: CuttingType(1),
            piercing_position: segments
                .first()
                .map(PathSegment::start)
                .unwrap_or_default(),
            tool_compensation: 0,
            declared_size: declared,
            remnant: false,
            lead_in: None,
            approach_path: Vec::new(),
            cutting_path: segments.clone(),
            end_code: 0,
            end_position: segments.last().map(PathSegment::end).unwrap_or_default(),
            web: 0,
            all_segments: segments,
        }
    }

    fn part(contours: Vec<Contour>) -> Part {
        Part {
            id: "part-10".to_string(),
            block_number: 1000,
            origin_block_number: 10,
            origin: Point2D::new(100.0, 50.0),
            rotation: 90.0,
            contours,
        }
    }

    #[test]
    fn test_nominal_extent_uses_last_contour() {
        let inner = contour(
            Dimensions::new(5.0, 5.0),
            vec![PathSegment::line(Point2D::ORIGIN, Point2D::new(5.0, 0.0))],
        );
        let outer = contour(
            Dimensions::new(40.0, 20.0),
            vec![PathSegment::line(Point2D::ORIGIN, Point2D::new(1.0, 0.0))],
        );
        let part = part(vec![inner, outer]);
        assert_eq!(part.nominal_extent(), Some(Dimensions::new(40.0, 20.0)));

        // Geometry does not follow the declared size
        let bounds = part.bounds().unwrap();
        assert_eq!(bounds.max.x, 5.0);
    }

    #[test]
    fn test_part_without_contours_has_no_extent() {
        let part = part(Vec::new());
        assert_eq!(part.nominal_extent(), None);
        assert_eq!(part.bounds(), None);
    }

    #[test]
    fn test_to_world_rotates_then_translates() {
        let part = part(Vec::new());
        let world = part.to_world(Point2D::new(10.0, 0.0));
        assert!((world.x - 100.0).abs() < 1e-9);
        assert!((world.y - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_nesting_part_id_uses_origin_block() {
        let entry = NestingEntry {
            origin_block_number: 30,
            origin: Point2D::ORIGIN,
            rotation: 0.0,
            part_code_block: 10000,
            contour_count: 2,
        };
        assert_eq!(entry.part_id(), "part-30");
    }

    #[test]
    fn test_contour_path_length() {
        let c = contour(
            Dimensions::default(),
            vec![
                PathSegment::line(Point2D::ORIGIN, Point2D::new(3.0, 4.0)),
                PathSegment::line(Point2D::new(3.0, 4.0), Point2D::new(3.0, 10.0)),
            ],
        );
        assert!((c.path_length() - 11.0).abs() < 1e-9);
        assert_eq!(c.lead_in_segments().len(), 0);
    }
}
