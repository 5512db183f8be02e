//! CLI argument parsing with clap.

use clap::{ArgAction, Parser, Subcommand};
use std::num::NonZeroU32;
use std::path::PathBuf;

use super::enums::{CharacterSet, SamplingMode};
use crate::ascii::{GlyphRamp, MAX_FILTER_STRENGTH};
use crate::source::Resolution;

/// Parse and validate resolution (WIDTHxHEIGHT format)
pub fn parse_resolution(s: &str) -> Result<Resolution, String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid resolution format '{}'. Use WIDTHxHEIGHT (e.g., 640x480)",
            s
        ));
    }
    let width: u32 = parts[0]
        .parse()
        .map_err(|_| format!("Invalid width '{}' in resolution", parts[0]))?;
    let height: u32 = parts[1]
        .parse()
        .map_err(|_| format!("Invalid height '{}' in resolution", parts[1]))?;
    if width == 0 || height == 0 {
        return Err("Resolution width and height must be greater than 0".to_string());
    }
    if width > 7680 || height > 4320 {
        return Err("Resolution exceeds maximum supported (7680x4320)".to_string());
    }
    Ok(Resolution { width, height })
}

/// Parse and validate capture rate (1-120 fps)
pub fn parse_fps(s: &str) -> Result<u32, String> {
    let fps: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid frame rate", s))?;
    if !(1..=120).contains(&fps) {
        return Err(format!("Frame rate must be between 1 and 120 fps, got {}", fps));
    }
    Ok(fps)
}

/// Parse and validate filter strength (1-64)
pub fn parse_filter_strength(s: &str) -> Result<NonZeroU32, String> {
    let strength: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid filter strength", s))?;
    if !(1..=MAX_FILTER_STRENGTH).contains(&strength) {
        return Err(format!(
            "Filter strength must be between 1 and {}, got {}",
            MAX_FILTER_STRENGTH, strength
        ));
    }
    NonZeroU32::new(strength).ok_or_else(|| "Filter strength must be at least 1".to_string())
}

/// Parse and validate a custom ramp (non-empty, printable)
pub fn parse_custom_ramp(s: &str) -> Result<String, String> {
    GlyphRamp::new(s)
        .map(|_| s.to_string())
        .map_err(|e| e.to_string())
}

/// Preview a video file, image or camera as ASCII art in the terminal
#[derive(Parser, Debug)]
#[command(name = "ascii-preview")]
#[command(version, about = "Preview video as live ASCII art in the terminal", long_about = None)]
#[command(subcommand_negates_reqs = true, args_conflicts_with_subcommands = true)]
#[command(after_help = "EXAMPLES:
    ascii-preview movie.mp4                  # Play a video file
    ascii-preview photo.png --ramp blocks    # Show an image with block glyphs
    ascii-preview 0 --mirror                 # Camera 0, selfie mode
    ascii-preview clip.mkv -f 2 --sampling average

Press Space to pause, q, Esc or Ctrl+C to quit.")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Video file, image file or camera index
    #[arg(required = true)]
    pub input: Option<String>,

    /// Target capture rate (1-120); defaults to the media's own rate
    #[arg(long, value_parser = parse_fps)]
    pub fps: Option<u32>,

    /// Pixels per glyph column; rows use twice as many (1-64)
    #[arg(long, short = 'f', value_parser = parse_filter_strength)]
    pub filter_strength: Option<NonZeroU32>,

    /// Built-in glyph ramp
    #[arg(long, short)]
    pub ramp: Option<CharacterSet>,

    /// Custom glyph ramp, sparsest to densest (overrides --ramp)
    #[arg(long, value_parser = parse_custom_ramp)]
    pub custom_ramp: Option<String>,

    /// Cell sampling mode
    #[arg(long)]
    pub sampling: Option<SamplingMode>,

    /// Invert brightness (for light terminals)
    #[arg(long)]
    pub invert: bool,

    /// Decode at WIDTHxHEIGHT instead of the native size
    #[arg(long, value_parser = parse_resolution)]
    pub resolution: Option<Resolution>,

    /// Mirror horizontally
    #[arg(long)]
    pub mirror: bool,

    /// Exit when a file source runs out of frames
    #[arg(long)]
    pub exit_on_end: bool,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available cameras
    ListCameras,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
