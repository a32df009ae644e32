//! Contour state machine for one part's command window
//!
//! The scan state (active block number, pen position, open contour) is a
//! plain value passed into [`step`] and handed back in the returned
//! [`Step`]. Nothing is kept between calls, so a single contour can be
//! driven through the machine in isolation.

use tracing::{debug, trace};

use mpfview_core::constants::{REMNANT_PHASE_CUT, REMNANT_PHASE_END};
use mpfview_core::{
    Command, Contour, CuttingType, Dimensions, LeadIn, MacroCall, MotionCommand, PathSegment,
    PiercingType, Point2D,
};

use crate::builder::build_segment;

/// A contour between its start marker and its terminator
#[derive(Debug, Clone, PartialEq)]
pub struct OpenContour {
    id: String,
    block_number: u32,
    piercing_type: PiercingType,
    cutting_type: CuttingType,
    piercing_position: Point2D,
    tool_compensation: i32,
    declared_size: Dimensions,
    remnant: bool,
    lead_in: Option<LeadIn>,
    approach_path: Vec<PathSegment>,
    cutting_path: Vec<PathSegment>,
    /// Laser on: motions go to the cutting path instead of the approach path
    cutting: bool,
}

impl OpenContour {
    fn new(block_number: u32, piercing_type: PiercingType, cutting_type: CuttingType) -> Self {
        Self {
            id: format!("contour-{}", block_number),
            block_number,
            piercing_type,
            cutting_type,
            piercing_position: Point2D::ORIGIN,
            tool_compensation: 0,
            declared_size: Dimensions::default(),
            remnant: false,
            lead_in: None,
            approach_path: Vec::new(),
            cutting_path: Vec::new(),
            cutting: false,
        }
    }

    pub fn is_cutting(&self) -> bool {
        self.cutting
    }

    fn push(&mut self, segment: PathSegment) {
        if self.cutting {
            self.cutting_path.push(segment);
        } else {
            self.approach_path.push(segment);
        }
    }

    fn finish(self, end_code: i32, end_position: Point2D, web: i32) -> Contour {
        let mut all_segments =
            Vec::with_capacity(1 + self.approach_path.len() + self.cutting_path.len());
        if let Some(lead_in) = &self.lead_in {
            all_segments.push(lead_in.segment);
        }
        all_segments.extend_from_slice(&self.approach_path);
        all_segments.extend_from_slice(&self.cutting_path);

        Contour {
            id: self.id,
            block_number: self.block_number,
            piercing_type: self.piercing_type,
            cutting_type: self.cutting_type,
            piercing_position: self.piercing_position,
            tool_compensation: self.tool_compensation,
            declared_size: self.declared_size,
            remnant: self.remnant,
            lead_in: self.lead_in,
            approach_path: self.approach_path,
            cutting_path: self.cutting_path,
            end_code,
            end_position,
            web,
            all_segments,
        }
    }
}

/// Scan state threaded through a part's command window
#[derive(Debug, Clone, PartialEq)]
pub struct ScanState {
    /// Most recent block number seen
    pub block_number: u32,
    /// Running pen position in part-local coordinates
    pub pen: Point2D,
    /// The contour being recorded, if any
    pub contour: Option<OpenContour>,
}

impl ScanState {
    /// Idle state at the start of a part's code block
    pub fn new(block_number: u32) -> Self {
        Self {
            block_number,
            pen: Point2D::ORIGIN,
            contour: None,
        }
    }
}

/// Outcome of feeding one command to the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Keep scanning with the updated state
    Continue(ScanState),
    /// A contour was closed; keep scanning with the updated state
    Closed(ScanState, Contour),
    /// Part end reached; any open contour has been discarded
    PartEnd,
}

/// Advance the contour state machine by one command
pub fn step(mut state: ScanState, command: &Command) -> Step {
    match command {
        Command::BlockMarker(number) => state.block_number = *number,
        Command::Motion(motion) => state = record_motion(state, motion),
        Command::Macro(call) => return apply_macro(state, call),
        Command::Comment(_) => {}
    }
    Step::Continue(state)
}

fn apply_macro(mut state: ScanState, call: &MacroCall) -> Step {
    match *call {
        MacroCall::ContourStart {
            piercing_type,
            cutting_type,
            x,
            y,
            tool_compensation,
            width,
            height,
        } => {
            discard_open(&state, "contour start");
            let position = Point2D::new(x, y);
            let mut contour = OpenContour::new(state.block_number, piercing_type, cutting_type);
            contour.piercing_position = position;
            contour.tool_compensation = tool_compensation;
            contour.declared_size = Dimensions::new(width, height);
            trace!("Contour {} opened at {}", contour.id, position);
            state.pen = position;
            state.contour = Some(contour);
        }
        MacroCall::RemnantStart {
            cutting_type, x, y, ..
        } => {
            discard_open(&state, "remnant start");
            let position = Point2D::new(x, y);
            let mut contour =
                OpenContour::new(state.block_number, PiercingType::NONE, cutting_type);
            contour.piercing_position = position;
            contour.remnant = true;
            contour.cutting = true;
            trace!("Remnant contour {} opened at {}", contour.id, position);
            state.pen = position;
            state.contour = Some(contour);
        }
        MacroCall::LeadIn { code, x, y, i, j } => {
            if let Some(contour) = state.contour.as_mut() {
                if code != 0 {
                    let end = Point2D::new(x, y);
                    match build_segment(code, state.pen, end, i, j) {
                        Some(segment) => {
                            contour.lead_in = Some(LeadIn { code, segment });
                            state.pen = end;
                        }
                        None => trace!("Lead-in code {} builds no segment", code),
                    }
                }
            }
        }
        MacroCall::StartCut => {
            if let Some(contour) = state.contour.as_mut() {
                contour.cutting = true;
            }
        }
        MacroCall::RemnantPhase { phase } => match phase {
            REMNANT_PHASE_CUT => {
                if let Some(contour) = state.contour.as_mut() {
                    contour.cutting = true;
                }
            }
            REMNANT_PHASE_END => {
                if let Some(contour) = state.contour.take() {
                    trace!("Remnant contour {} closed at {}", contour.id, state.pen);
                    let closed = contour.finish(0, state.pen, 0);
                    return Step::Closed(state, closed);
                }
            }
            other => trace!("Ignoring remnant phase {}", other),
        },
        MacroCall::ContourEnd {
            code,
            x,
            y,
            i,
            j,
            web,
        } => {
            if let Some(mut contour) = state.contour.take() {
                let end = Point2D::new(x, y);
                if code != 0 && !end.approx_eq(&state.pen) {
                    if let Some(segment) = build_segment(code, state.pen, end, i, j) {
                        contour.cutting_path.push(segment);
                        state.pen = end;
                    }
                }
                trace!("Contour {} closed at {}", contour.id, end);
                let closed = contour.finish(code, end, web);
                return Step::Closed(state, closed);
            }
        }
        MacroCall::PartEnd => {
            discard_open(&state, "part end");
            return Step::PartEnd;
        }
        MacroCall::LoadDatabase { .. }
        | MacroCall::Init { .. }
        | MacroCall::PartOrigin { .. }
        | MacroCall::PartProgram
        | MacroCall::Pierce
        | MacroCall::ProgramEnd => {}
    }
    Step::Continue(state)
}

fn record_motion(mut state: ScanState, motion: &MotionCommand) -> ScanState {
    let Some(contour) = state.contour.as_mut() else {
        return state;
    };
    let (Some(code), Some((x, y))) = (motion.geometry_code(), motion.target()) else {
        return state;
    };
    let end = Point2D::new(x, y);
    let i = motion.i.unwrap_or(0.0);
    let j = motion.j.unwrap_or(0.0);
    match build_segment(code, state.pen, end, i, j) {
        Some(segment) => {
            contour.push(segment);
            state.pen = end;
        }
        None => trace!("Motion {} builds no segment", motion),
    }
    state
}

fn discard_open(state: &ScanState, reason: &str) {
    if let Some(contour) = &state.contour {
        debug!(
            "Discarding unterminated contour {} at {}",
            contour.id, reason
        );
    }
}
