use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, warn};

use mpfview::{
    init_logging, sample_file, sheet_bounds, Config, MpfParser, PathPoint, Program, ProgramStats,
};

use crate::opts::{ModeCommand, Opts};

mod opts;

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    let config = match &opts.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_or_default().context("Failed to load config")?,
    };

    let mut logging = config.logging.clone();
    if let Some(level) = opts.log_level_override() {
        logging.level = level;
    }
    init_logging(&logging)?;
    debug!("mpfview {} built {}", mpfview::VERSION, mpfview::BUILD_DATE);

    match &opts.command {
        ModeCommand::Info { file, json } => {
            let program = load_program(file)?;
            print_info(&program, *json)
        }
        ModeCommand::Sample {
            file,
            step_size,
            json,
        } => {
            let requested = step_size.unwrap_or(config.segmentation.step_size_mm);
            let step = config.segmentation.clamp(requested);
            if step != requested {
                warn!("Step size {} mm clamped to {} mm", requested, step);
            }
            let points = sample_file(file, step)
                .with_context(|| format!("Failed to sample {}", file.display()))?;
            print_samples(&points, *json)
        }
    }
}

fn load_program(path: &Path) -> anyhow::Result<Program> {
    MpfParser::new()
        .without_raw_commands()
        .parse_file(path)
        .with_context(|| format!("Failed to load {}", path.display()))
}

fn print_info(program: &Program, json: bool) -> anyhow::Result<()> {
    let stats = ProgramStats::from_program(program);
    let mut out = BufWriter::new(io::stdout().lock());

    if json {
        let report = serde_json::json!({
            "program": program,
            "stats": stats,
            "sheetBounds": sheet_bounds(program),
        });
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
        return Ok(out.flush()?);
    }

    writeln!(out, "Version:   {}", program.version)?;
    writeln!(
        out,
        "Material:  {} / {} ({})",
        program.material.material, program.material.assist_gas, program.material.db_name
    )?;
    writeln!(
        out,
        "Sheet:     {} x {} mm, {} parts declared",
        program.workpiece.width, program.workpiece.height, program.setup.total_parts
    )?;
    writeln!(out)?;

    for part in &program.parts {
        let extent = part
            .nominal_extent()
            .map(|d| format!("{} x {}", d.width, d.height))
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "{:<12} N{:<7} at {} rot {:>6.1}  {} contours, {}",
            part.id,
            part.block_number,
            part.origin,
            part.rotation,
            part.contours.len(),
            extent
        )?;
        for contour in &part.contours {
            writeln!(
                out,
                "  {:<16} {} / {}{}  {:.2} mm",
                contour.id,
                contour.piercing_type,
                contour.cutting_type,
                if contour.remnant { " (remnant)" } else { "" },
                contour.path_length()
            )?;
        }
    }
    for skipped in &program.skipped_parts {
        writeln!(
            out,
            "{:<12} skipped: code block N{} not found",
            skipped.part_id, skipped.part_code_block
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{}", stats)?;
    if let Some(bounds) = sheet_bounds(program) {
        writeln!(out, "Extent:    {} to {}", bounds.min, bounds.max)?;
    }
    Ok(out.flush()?)
}

fn print_samples(points: &[PathPoint], json: bool) -> anyhow::Result<()> {
    let mut out = BufWriter::new(io::stdout().lock());

    if json {
        serde_json::to_writer(&mut out, points)?;
        writeln!(out)?;
        return Ok(out.flush()?);
    }

    for point in points {
        let world = point.world_position.unwrap_or(point.position);
        writeln!(
            out,
            "{}\t{}\t{}\t{:?}\t{}\t{:.3}\t{:.3}",
            point.part_index,
            point.contour_index,
            point.segment_index,
            point.path_type,
            u8::from(point.laser_on),
            world.x,
            world.y
        )?;
    }
    Ok(out.flush()?)
}
