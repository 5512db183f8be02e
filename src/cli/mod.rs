//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, settings resolution
//! and subcommand handlers.

mod args;
mod commands;
mod enums;
mod settings;

pub use args::{
    parse_custom_ramp, parse_filter_strength, parse_fps, parse_resolution, Args, Command,
    ConfigAction,
};
pub use commands::{handle_config_action, list_cameras};
pub use enums::{CharacterSet, SamplingMode};
pub use settings::Settings;
