//! Tokenized MPF command types
//!
//! One [`Command`] is produced per recognized input line (two when a block
//! number and a macro call share a line). Commands are immutable once
//! produced and are consumed by the program reconstructor by index.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codes::{AssistGas, CuttingType, MaterialType, PiercingType};

/// A single tokenized line of an MPF program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Command {
    /// `;` comment, marker stripped and trimmed
    Comment(String),
    /// `N<digits>` block number used as a jump anchor
    BlockMarker(u32),
    /// `HK...(...)` vendor macro call
    Macro(MacroCall),
    /// G/M code or bare coordinate line
    Motion(MotionCommand),
}

impl Command {
    pub fn as_macro(&self) -> Option<&MacroCall> {
        match self {
            Command::Macro(call) => Some(call),
            _ => None,
        }
    }

    pub fn block_number(&self) -> Option<u32> {
        match self {
            Command::BlockMarker(number) => Some(*number),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Comment(text) => write!(f, ";{}", text),
            Command::BlockMarker(number) => write!(f, "N{}", number),
            Command::Macro(call) => write!(f, "{}", call.name()),
            Command::Motion(motion) => write!(f, "{}", motion),
        }
    }
}

/// A recognized HK macro call with its positional fields resolved
///
/// The remnant-cut marker `HKSCRC` is resolved by argument count at
/// tokenization time: four arguments open a remnant contour, a single
/// argument is a phase marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MacroCall {
    /// `HKLDB(material, "db", gas)`: technology database selection
    LoadDatabase {
        material: MaterialType,
        db_name: String,
        assist_gas: AssistGas,
    },
    /// `HKINI(parts, width, height)`: sheet setup
    Init {
        total_parts: u32,
        width: f64,
        height: f64,
    },
    /// `HKOST(x, y, rotation, part_block, contours)`: part placement
    PartOrigin {
        x: f64,
        y: f64,
        rotation: f64,
        part_code_block: u32,
        contour_count: u32,
    },
    /// `HKPPP`: start of the part programs
    PartProgram,
    /// `HKSTR(pierce, cut, x, y, comp, width, height)`: contour start
    ContourStart {
        piercing_type: PiercingType,
        cutting_type: CuttingType,
        x: f64,
        y: f64,
        tool_compensation: i32,
        width: f64,
        height: f64,
    },
    /// `HKPIE`: pierce at the current position
    Pierce,
    /// `HKLEA(code, x, y, i, j)`: lead-in motion
    LeadIn {
        code: i32,
        x: f64,
        y: f64,
        i: f64,
        j: f64,
    },
    /// `HKCUT`: laser on, approach ends and cutting begins
    StartCut,
    /// `HKSTO(code, x, y, i, j, web)`: contour end
    ContourEnd {
        code: i32,
        x: f64,
        y: f64,
        i: f64,
        j: f64,
        web: i32,
    },
    /// `HKPED`: part end
    PartEnd,
    /// `HKEND`: end of the nesting section
    ProgramEnd,
    /// `HKSCRC(cut, kind, x, y)`: remnant cut contour start
    RemnantStart {
        cutting_type: CuttingType,
        cutting_kind: i32,
        x: f64,
        y: f64,
    },
    /// `HKSCRC(phase)`: remnant cut phase marker
    RemnantPhase { phase: i32 },
}

impl MacroCall {
    /// The macro name as written in the program
    pub fn name(&self) -> &'static str {
        match self {
            MacroCall::LoadDatabase { .. } => "HKLDB",
            MacroCall::Init { .. } => "HKINI",
            MacroCall::PartOrigin { .. } => "HKOST",
            MacroCall::PartProgram => "HKPPP",
            MacroCall::ContourStart { .. } => "HKSTR",
            MacroCall::Pierce => "HKPIE",
            MacroCall::LeadIn { .. } => "HKLEA",
            MacroCall::StartCut => "HKCUT",
            MacroCall::ContourEnd { .. } => "HKSTO",
            MacroCall::PartEnd => "HKPED",
            MacroCall::ProgramEnd => "HKEND",
            MacroCall::RemnantStart { .. } | MacroCall::RemnantPhase { .. } => "HKSCRC",
        }
    }
}

/// A motion line: mnemonic plus optional axis words
///
/// Absent words stay `None` so that "not specified" is distinguishable from
/// "specified as zero".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionCommand {
    /// Leading `G<n>`/`M<n>` word, empty for bare coordinate lines
    pub mnemonic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub i: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub j: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f: Option<f64>,
}

impl MotionCommand {
    /// Motion code used to build geometry
    ///
    /// `G<n>` yields `n`; a bare coordinate line yields `0`. M-codes are
    /// machine functions and yield `None`, as does a G number outside `i32`.
    pub fn geometry_code(&self) -> Option<i32> {
        let mut chars = self.mnemonic.chars();
        match chars.next() {
            None => Some(0),
            Some('G') => chars.as_str().parse::<i32>().ok(),
            Some(_) => None,
        }
    }

    /// Target position when both X and Y are present
    pub fn target(&self) -> Option<(f64, f64)> {
        self.x.zip(self.y)
    }
}

impl fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic)?;
        let words = [
            ('X', self.x),
            ('Y', self.y),
            ('Z', self.z),
            ('I', self.i),
            ('J', self.j),
            ('F', self.f),
        ];
        for (letter, value) in words {
            if let Some(value) = value {
                write!(f, " {}{}", letter, value)?;
            }
        }
        Ok(())
    }
}
