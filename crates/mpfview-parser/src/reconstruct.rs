//! Program reconstruction from the flat command list
//!
//! Header sections are looked up by first occurrence, the nesting table is
//! read up to the program-end marker, and each placement's part code is
//! replayed through the contour state machine.

use tracing::{debug, trace, warn};

use mpfview_core::constants::{UNKNOWN_VERSION, VERSION_PREFIX};
use mpfview_core::{
    Command, Dimensions, MacroCall, MaterialDescriptor, NestingEntry, ParseError, Part, Point2D,
    Program, SheetSetup, SkippedPart,
};

use crate::contour::{step, ScanState, Step};

/// Version text from the first `!V` comment, or `"Unknown"`
pub fn extract_version(commands: &[Command]) -> String {
    commands
        .iter()
        .find_map(|command| match command {
            Command::Comment(text) if text.starts_with(VERSION_PREFIX) => Some(text.clone()),
            _ => None,
        })
        .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
}

/// First `HKLDB` record
pub fn extract_material(commands: &[Command]) -> Result<MaterialDescriptor, ParseError> {
    commands
        .iter()
        .find_map(|command| match command.as_macro()? {
            MacroCall::LoadDatabase {
                material,
                db_name,
                assist_gas,
            } => Some(MaterialDescriptor {
                material: *material,
                db_name: db_name.clone(),
                assist_gas: *assist_gas,
            }),
            _ => None,
        })
        .ok_or_else(|| ParseError::missing_section("HKLDB"))
}

/// First `HKINI` record
pub fn extract_setup(commands: &[Command]) -> Result<SheetSetup, ParseError> {
    commands
        .iter()
        .find_map(|command| match command.as_macro()? {
            MacroCall::Init {
                total_parts,
                width,
                height,
            } => Some(SheetSetup {
                total_parts: *total_parts,
                width: *width,
                height: *height,
            }),
            _ => None,
        })
        .ok_or_else(|| ParseError::missing_section("HKINI"))
}

/// Placements declared before the program-end marker
pub fn extract_nesting(commands: &[Command]) -> Vec<NestingEntry> {
    let mut nesting = Vec::new();
    let mut block_number = 0;

    for command in commands {
        match command {
            Command::BlockMarker(number) => block_number = *number,
            Command::Macro(MacroCall::PartOrigin {
                x,
                y,
                rotation,
                part_code_block,
                contour_count,
            }) => nesting.push(NestingEntry {
                origin_block_number: block_number,
                origin: Point2D::new(*x, *y),
                rotation: *rotation,
                part_code_block: *part_code_block,
                contour_count: *contour_count,
            }),
            Command::Macro(MacroCall::ProgramEnd) => break,
            _ => {}
        }
    }

    nesting
}

/// Replay the part code a placement points at
///
/// Scans from the first block marker equal to the placement's code block up
/// to the part-end marker (or the end of the program).
pub fn extract_part(commands: &[Command], entry: &NestingEntry) -> Result<Part, ParseError> {
    let part_id = entry.part_id();
    let start = commands
        .iter()
        .position(|command| command.block_number() == Some(entry.part_code_block))
        .ok_or_else(|| ParseError::PartCodeNotFound {
            part_id: part_id.clone(),
            part_code_block: entry.part_code_block,
        })?;

    let mut contours = Vec::new();
    let mut state = ScanState::new(entry.part_code_block);
    for command in &commands[start..] {
        match step(state, command) {
            Step::Continue(next) => state = next,
            Step::Closed(next, contour) => {
                contours.push(contour);
                state = next;
            }
            Step::PartEnd => break,
        }
    }

    if contours.len() != entry.contour_count as usize {
        debug!(
            "Part {} declares {} contours, found {}",
            part_id,
            entry.contour_count,
            contours.len()
        );
    }
    trace!("Part {} built with {} contours", part_id, contours.len());

    Ok(Part {
        id: part_id,
        block_number: entry.part_code_block,
        origin_block_number: entry.origin_block_number,
        origin: entry.origin,
        rotation: entry.rotation,
        contours,
    })
}

/// Build the program tree from a tokenized command list
///
/// Fails only when a mandatory header section is missing. Placements whose
/// part code cannot be found are listed in [`Program::skipped_parts`].
pub fn reconstruct(
    commands: Vec<Command>,
    keep_raw_commands: bool,
) -> Result<Program, ParseError> {
    let version = extract_version(&commands);
    let material = extract_material(&commands)?;
    let setup = extract_setup(&commands)?;
    let nesting = extract_nesting(&commands);

    let mut parts = Vec::with_capacity(nesting.len());
    let mut skipped_parts = Vec::new();
    for entry in &nesting {
        match extract_part(&commands, entry) {
            Ok(part) => parts.push(part),
            Err(ParseError::PartCodeNotFound {
                part_id,
                part_code_block,
            }) => {
                warn!(
                    "Skipping part {}: code block N{} not found",
                    part_id, part_code_block
                );
                skipped_parts.push(SkippedPart {
                    part_id,
                    part_code_block,
                });
            }
            Err(err) => return Err(err),
        }
    }

    debug!(
        "Reconstructed program {}: {} placements, {} parts, {} skipped",
        version,
        nesting.len(),
        parts.len(),
        skipped_parts.len()
    );

    Ok(Program {
        version,
        material,
        workpiece: Dimensions::new(setup.width, setup.height),
        setup,
        nesting,
        parts,
        skipped_parts,
        raw_commands: if keep_raw_commands {
            commands
        } else {
            Vec::new()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    #[test]
    fn test_version_defaults_to_unknown() {
        let commands = tokenize(";plain comment\n;V1.0");
        assert_eq!(extract_version(&commands), "Unknown");

        let commands = tokenize(";plain comment\n;!V3.2\n;!V9.9");
        assert_eq!(extract_version(&commands), "!V3.2");
    }

    #[test]
    fn test_missing_material_is_reported_first() {
        let commands = tokenize("HKINI(1,100,50)");
        assert_eq!(
            reconstruct(commands, false),
            Err(ParseError::missing_section("HKLDB"))
        );

        let commands = tokenize(r#"HKLDB(1,"DB1",1)"#);
        assert_eq!(
            reconstruct(commands, false),
            Err(ParseError::missing_section("HKINI"))
        );
    }

    #[test]
    fn test_nesting_stops_at_program_end() {
        let commands = tokenize(
            "N10 HKOST(1,2,0,100,1)\nN20 HKOST(3,4,45,200,1)\nN30 HKEND\nN40 HKOST(5,6,0,300,1)",
        );
        let nesting = extract_nesting(&commands);
        assert_eq!(nesting.len(), 2);
        assert_eq!(nesting[1].origin_block_number, 20);
        assert_eq!(nesting[1].origin, Point2D::new(3.0, 4.0));
        assert_eq!(nesting[1].rotation, 45.0);
        assert_eq!(nesting[1].part_code_block, 200);
    }

    #[test]
    fn test_part_scan_runs_to_end_without_part_end() {
        let commands = tokenize(
            "N100\nHKSTR(1,1,0,0,0,5,5)\nHKCUT\nG1 X5 Y0\nHKSTO(0,5,0,0,0,0)\nHKSTR(1,1,9,9,0,1,1)",
        );
        let entry = NestingEntry {
            origin_block_number: 7,
            origin: Point2D::ORIGIN,
            rotation: 0.0,
            part_code_block: 100,
            contour_count: 1,
        };
        let part = extract_part(&commands, &entry).unwrap();
        assert_eq!(part.id, "part-7");
        assert_eq!(part.block_number, 100);
        assert_eq!(part.contours.len(), 1);
    }

    #[test]
    fn test_missing_part_code() {
        let entry = NestingEntry {
            origin_block_number: 7,
            origin: Point2D::ORIGIN,
            rotation: 0.0,
            part_code_block: 555,
            contour_count: 1,
        };
        assert_eq!(
            extract_part(&tokenize("N100\nHKPED"), &entry),
            Err(ParseError::PartCodeNotFound {
                part_id: "part-7".to_string(),
                part_code_block: 555,
            })
        );
    }
}
