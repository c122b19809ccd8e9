use anyhow::{Context, Result};
use std::path::Path;

use ani2sprite::pipeline::CursorFormat;
use ani2sprite::pipeline::ani::{AniParser, AnimatedCursor, TICK_SECONDS};
use ani2sprite::pipeline::cur::CurParser;
use ani2sprite::pipeline::timing::normalize;

use super::command::InfoArgs;

pub fn cmd_info(args: &InfoArgs) -> Result<()> {
    let data = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    match CursorFormat::resolve(&args.input, &data)? {
        CursorFormat::Ani => {
            let ani = AniParser::parse(&data)?;
            print_container(&args.input, &ani)
        }
        CursorFormat::Cur => print_resource(&args.input, &data),
    }
}

fn print_container(path: &Path, ani: &AnimatedCursor) -> Result<()> {
    let header = &ani.header;
    println!("File: {}", path.display());
    println!("Kind: animated cursor (RIFF/ACON)");
    println!(
        "Header: {} frames, {} steps, default rate {} ticks, flags {:#x}{}",
        header.frame_count,
        header.step_count,
        header.display_rate,
        header.flags,
        if header.has_sequence() { " (sequence)" } else { "" }
    );

    if ani.rates.is_empty() {
        println!("Rates: none, default rate applies");
    } else {
        let seconds: Vec<String> = ani
            .rates
            .iter()
            .map(|&r| format!("{:.4}", r as f64 * TICK_SECONDS))
            .collect();
        println!("Rates: {:?} ticks ({} s)", ani.rates, seconds.join(", "));
    }

    if ani.sequence.is_empty() {
        println!("Sequence: none");
    } else {
        println!("Sequence: {:?}", ani.sequence);
    }

    println!("Frames found: {}", ani.frames.len());
    for (idx, blob) in ani.frames.iter().enumerate() {
        let (x, y) = CurParser::read_hotspot(blob);
        match CurParser::read_directory(blob) {
            Ok(entries) => {
                let sizes: Vec<String> = entries
                    .iter()
                    .map(|e| format!("{}x{}", e.real_width(), e.real_height()))
                    .collect();
                println!(
                    "  #{}: {} bytes, variants [{}], hotspot {{{}, {}}}",
                    idx,
                    blob.len(),
                    sizes.join(", "),
                    x,
                    y
                );
            }
            Err(e) => println!("  #{}: {} bytes, {}", idx, blob.len(), e),
        }
    }

    match normalize(&ani.frame_rates(), TICK_SECONDS) {
        Ok(schedule) => println!(
            "Schedule: unit {:.4} s, multipliers {:?}, {} expanded frames",
            schedule.unit_duration_secs,
            schedule.multipliers,
            schedule.total_frames()
        ),
        Err(e) => println!("Schedule: {}", e),
    }

    Ok(())
}

fn print_resource(path: &Path, data: &[u8]) -> Result<()> {
    let entries = CurParser::read_directory(data)?;
    let (x, y) = CurParser::read_hotspot(data);

    println!("File: {}", path.display());
    println!("Kind: single-frame cursor/icon");
    println!("Hot Spot: {{{}, {}}}", x, y);
    println!("Variants: {}", entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        println!(
            "  #{}: {}x{}, {} bytes at offset {}",
            idx,
            entry.real_width(),
            entry.real_height(),
            entry.size_bytes,
            entry.offset
        );
    }
    if let Some(best) = CurParser::select_largest(&entries) {
        println!("Selected: #{}", best);
    }

    Ok(())
}
