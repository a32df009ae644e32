//! Line tokenizer for HK MPF programs
//!
//! Turns program text into a flat list of [`Command`]s. The tokenizer has no
//! knowledge of parts or contours. Lines it does not recognize are dropped,
//! and numeric fields that do not parse read as zero.

use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, trace};

use mpfview_core::codes::{AssistGas, CuttingType, MaterialType, PiercingType};
use mpfview_core::{Command, MacroCall, MotionCommand};

fn block_regex() -> &'static Regex {
    static BLOCK_REGEX: OnceLock<Regex> = OnceLock::new();
    BLOCK_REGEX.get_or_init(|| Regex::new(r"^N(\d+)").expect("invalid regex pattern"))
}

fn macro_name_regex() -> &'static Regex {
    static MACRO_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    MACRO_NAME_REGEX.get_or_init(|| Regex::new(r"^(HK[A-Z]+)").expect("invalid regex pattern"))
}

fn macro_args_regex() -> &'static Regex {
    static MACRO_ARGS_REGEX: OnceLock<Regex> = OnceLock::new();
    MACRO_ARGS_REGEX.get_or_init(|| Regex::new(r"\(([^)]*)\)").expect("invalid regex pattern"))
}

fn motion_regex() -> &'static Regex {
    static MOTION_REGEX: OnceLock<Regex> = OnceLock::new();
    MOTION_REGEX.get_or_init(|| Regex::new(r"^([GM]\d+)").expect("invalid regex pattern"))
}

fn axis_regex(letter: char) -> &'static Regex {
    static AXIS_REGEXES: OnceLock<[Regex; 6]> = OnceLock::new();
    let regexes = AXIS_REGEXES.get_or_init(|| {
        ['X', 'Y', 'Z', 'I', 'J', 'F']
            .map(|l| Regex::new(&format!(r"{}([-+]?[\d.]+)", l)).expect("invalid regex pattern"))
    });
    let index = match letter {
        'X' => 0,
        'Y' => 1,
        'Z' => 2,
        'I' => 3,
        'J' => 4,
        _ => 5,
    };
    &regexes[index]
}

fn float_prefix_regex() -> &'static Regex {
    static FLOAT_PREFIX_REGEX: OnceLock<Regex> = OnceLock::new();
    FLOAT_PREFIX_REGEX.get_or_init(|| {
        Regex::new(r"^[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?").expect("invalid regex pattern")
    })
}

/// Read the longest leading decimal number of `text`, or `0.0`
///
/// Elided optional arguments read as zero. Trailing garbage after the
/// number is ignored (`"12.5mm"` reads as `12.5`).
pub fn lenient_number(text: &str) -> f64 {
    float_prefix_regex()
        .find(text.trim())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Tokenize a whole program, one entry per recognized non-empty line
pub fn tokenize(text: &str) -> Vec<Command> {
    let mut commands = Vec::new();
    let mut lines = 0usize;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        lines += 1;
        tokenize_line(line, &mut commands);
    }
    debug!(
        "Tokenized {} commands from {} non-empty lines",
        commands.len(),
        lines
    );
    commands
}

/// Tokenize one trimmed line, appending zero, one or two commands
///
/// A block number sharing its line with other content yields the marker
/// followed by the tokenized remainder.
pub fn tokenize_line(line: &str, out: &mut Vec<Command>) {
    if let Some(text) = line.strip_prefix(';') {
        out.push(Command::Comment(text.trim().to_string()));
        return;
    }

    if let Some(captures) = block_regex().captures(line) {
        let (Some(whole), Some(digits)) = (captures.get(0), captures.get(1)) else {
            return;
        };
        match digits.as_str().parse::<u32>() {
            Ok(number) => out.push(Command::BlockMarker(number)),
            Err(_) => {
                trace!("Dropping block marker out of range: {}", line);
                return;
            }
        }
        let rest = line[whole.end()..].trim();
        if !rest.is_empty() {
            tokenize_line(rest, out);
        }
        return;
    }

    if line.starts_with("HK") {
        match parse_macro(line) {
            Some(call) => out.push(Command::Macro(call)),
            None => trace!("Dropping unrecognized macro line: {}", line),
        }
        return;
    }

    if motion_regex().is_match(line) || line.starts_with(['X', 'Y', 'Z']) {
        out.push(Command::Motion(parse_motion(line)));
        return;
    }

    trace!("Dropping unrecognized line: {}", line);
}

/// Positional arguments of a macro call, quotes kept
fn macro_args(line: &str) -> Vec<&str> {
    match macro_args_regex().captures(line).and_then(|c| c.get(1)) {
        Some(group) => group.as_str().split(',').map(str::trim).collect(),
        None => Vec::new(),
    }
}

fn number_arg(args: &[&str], index: usize) -> f64 {
    args.get(index).map_or(0.0, |arg| lenient_number(arg))
}

fn int_arg(args: &[&str], index: usize) -> i32 {
    number_arg(args, index) as i32
}

fn count_arg(args: &[&str], index: usize) -> u32 {
    number_arg(args, index) as u32
}

fn string_arg(args: &[&str], index: usize) -> String {
    args.get(index)
        .map(|arg| arg.replace('"', ""))
        .unwrap_or_default()
}

/// Resolve a macro call into its fixed field layout
///
/// Returns `None` for unknown macro names and for remnant-cut markers with
/// an argument count other than one or four or more.
fn parse_macro(line: &str) -> Option<MacroCall> {
    let name = macro_name_regex().captures(line)?.get(1)?.as_str();
    let args = macro_args(line);

    let call = match name {
        "HKLDB" => MacroCall::LoadDatabase {
            material: MaterialType::from(number_arg(&args, 0)),
            db_name: string_arg(&args, 1),
            assist_gas: AssistGas::from(number_arg(&args, 2)),
        },
        "HKINI" => MacroCall::Init {
            total_parts: count_arg(&args, 0),
            width: number_arg(&args, 1),
            height: number_arg(&args, 2),
        },
        "HKOST" => MacroCall::PartOrigin {
            x: number_arg(&args, 0),
            y: number_arg(&args, 1),
            rotation: number_arg(&args, 2),
            part_code_block: count_arg(&args, 3),
            contour_count: count_arg(&args, 4),
        },
        "HKPPP" => MacroCall::PartProgram,
        "HKSTR" => MacroCall::ContourStart {
            piercing_type: PiercingType::from(number_arg(&args, 0)),
            cutting_type: CuttingType::from(number_arg(&args, 1)),
            x: number_arg(&args, 2),
            y: number_arg(&args, 3),
            tool_compensation: int_arg(&args, 4),
            width: number_arg(&args, 5),
            height: number_arg(&args, 6),
        },
        "HKPIE" => MacroCall::Pierce,
        "HKLEA" => MacroCall::LeadIn {
            code: int_arg(&args, 0),
            x: number_arg(&args, 1),
            y: number_arg(&args, 2),
            i: number_arg(&args, 3),
            j: number_arg(&args, 4),
        },
        "HKCUT" => MacroCall::StartCut,
        "HKSTO" => MacroCall::ContourEnd {
            code: int_arg(&args, 0),
            x: number_arg(&args, 1),
            y: number_arg(&args, 2),
            i: number_arg(&args, 3),
            j: number_arg(&args, 4),
            web: int_arg(&args, 5),
        },
        "HKPED" => MacroCall::PartEnd,
        "HKEND" => MacroCall::ProgramEnd,
        "HKSCRC" => match args.len() {
            n if n >= 4 => MacroCall::RemnantStart {
                cutting_type: CuttingType::from(number_arg(&args, 0)),
                cutting_kind: int_arg(&args, 1),
                x: number_arg(&args, 2),
                y: number_arg(&args, 3),
            },
            1 => MacroCall::RemnantPhase {
                phase: int_arg(&args, 0),
            },
            n => {
                trace!("Dropping HKSCRC with {} arguments", n);
                return None;
            }
        },
        _ => return None,
    };
    Some(call)
}

/// Parse a G/M code or bare coordinate line
fn parse_motion(line: &str) -> MotionCommand {
    let axis = |letter: char| {
        axis_regex(letter)
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|value| lenient_number(value.as_str()))
    };

    MotionCommand {
        mnemonic: motion_regex()
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
        x: axis('X'),
        y: axis('Y'),
        z: axis('Z'),
        i: axis('I'),
        j: axis('J'),
        f: axis('F'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(line: &str) -> Vec<Command> {
        let mut out = Vec::new();
        tokenize_line(line, &mut out);
        out
    }

    #[test]
    fn test_lenient_number() {
        assert_eq!(lenient_number("12.5"), 12.5);
        assert_eq!(lenient_number(" -3 "), -3.0);
        assert_eq!(lenient_number("+2."), 2.0);
        assert_eq!(lenient_number(".5"), 0.5);
        assert_eq!(lenient_number("1e3"), 1000.0);
        assert_eq!(lenient_number("12.5mm"), 12.5);
        assert_eq!(lenient_number("1.2.3"), 1.2);
        assert_eq!(lenient_number("abc"), 0.0);
        assert_eq!(lenient_number(""), 0.0);
        assert_eq!(lenient_number("-"), 0.0);
    }

    #[test]
    fn test_comment() {
        assert_eq!(
            single(";  !V3.2  "),
            vec![Command::Comment("!V3.2".to_string())]
        );
    }

    #[test]
    fn test_block_marker_with_payload() {
        let commands = single("N20 HKOST(400.0,200.0,90.0,10000,2)");
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0], Command::BlockMarker(20));
        assert_eq!(
            commands[1],
            Command::Macro(MacroCall::PartOrigin {
                x: 400.0,
                y: 200.0,
                rotation: 90.0,
                part_code_block: 10000,
                contour_count: 2,
            })
        );
    }

    #[test]
    fn test_block_marker_alone() {
        assert_eq!(single("N10000"), vec![Command::BlockMarker(10000)]);
        assert!(single("N99999999999").is_empty());
    }

    #[test]
    fn test_load_database_strips_quotes() {
        let commands = single(r#"HKLDB(2,"STS_2T_N2",2)"#);
        assert_eq!(
            commands,
            vec![Command::Macro(MacroCall::LoadDatabase {
                material: MaterialType(2),
                db_name: "STS_2T_N2".to_string(),
                assist_gas: AssistGas(2),
            })]
        );
    }

    #[test]
    fn test_macro_without_parentheses() {
        assert_eq!(single("HKCUT"), vec![Command::Macro(MacroCall::StartCut)]);
        assert_eq!(single("HKPED"), vec![Command::Macro(MacroCall::PartEnd)]);
    }

    #[test]
    fn test_missing_arguments_read_as_zero() {
        let commands = single("HKSTO(1,10.0)");
        assert_eq!(
            commands,
            vec![Command::Macro(MacroCall::ContourEnd {
                code: 1,
                x: 10.0,
                y: 0.0,
                i: 0.0,
                j: 0.0,
                web: 0,
            })]
        );
    }

    #[test]
    fn test_remnant_marker_resolved_by_arity() {
        assert_eq!(
            single("HKSCRC(1,0,30.0,5.0)"),
            vec![Command::Macro(MacroCall::RemnantStart {
                cutting_type: CuttingType(1),
                cutting_kind: 0,
                x: 30.0,
                y: 5.0,
            })]
        );
        assert_eq!(
            single("HKSCRC(2)"),
            vec![Command::Macro(MacroCall::RemnantPhase { phase: 2 })]
        );
        assert!(single("HKSCRC(1,2)").is_empty());
        assert!(single("HKSCRC").is_empty());
    }

    #[test]
    fn test_unknown_lines_are_dropped() {
        assert!(single("HKFOO(1,2,3)").is_empty());
        assert!(single("%").is_empty());
        assert!(single("T1").is_empty());
    }

    #[test]
    fn test_motion_fields() {
        let commands = single("G2 X10.5 Y-3 I5 J0 F1200");
        let Command::Motion(motion) = &commands[0] else {
            panic!("expected a motion command");
        };
        assert_eq!(motion.mnemonic, "G2");
        assert_eq!(motion.x, Some(10.5));
        assert_eq!(motion.y, Some(-3.0));
        assert_eq!(motion.z, None);
        assert_eq!(motion.i, Some(5.0));
        assert_eq!(motion.j, Some(0.0));
        assert_eq!(motion.f, Some(1200.0));
    }

    #[test]
    fn test_bare_coordinate_line() {
        let commands = single("X5 Y6");
        let Command::Motion(motion) = &commands[0] else {
            panic!("expected a motion command");
        };
        assert_eq!(motion.mnemonic, "");
        assert_eq!(motion.target(), Some((5.0, 6.0)));
    }

    #[test]
    fn test_tokenize_skips_blank_lines_and_keeps_order() {
        let text = "\n;!V1\n\n   HKPPP  \r\nM30\n";
        let commands = tokenize(text);
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], Command::Comment("!V1".to_string()));
        assert_eq!(commands[1], Command::Macro(MacroCall::PartProgram));
        assert!(matches!(&commands[2], Command::Motion(m) if m.mnemonic == "M30"));
    }
}
