//! Subcommand handlers for list-cameras and config actions.

use std::path::{Path, PathBuf};

use super::args::ConfigAction;
use crate::config::{self, Config, ConfigError};
use crate::source::SourceError;

/// List available cameras and print them to stdout.
#[cfg(feature = "camera")]
pub fn list_cameras() -> Result<(), SourceError> {
    let devices = crate::source::list_devices()?;
    if devices.is_empty() {
        println!("No cameras found.");
        println!();
        println!("Make sure your camera is connected and permissions are granted.");
    } else {
        println!("Available cameras:");
        for device in devices {
            println!("  {}", device);
        }
        println!();
        println!("Pass the index as <INPUT> to preview a camera.");
    }
    Ok(())
}

/// List available cameras and print them to stdout.
#[cfg(not(feature = "camera"))]
pub fn list_cameras() -> Result<(), SourceError> {
    println!("Camera support is not compiled in.");
    println!("Rebuild with `--features camera` to capture from webcams.");
    Ok(())
}

/// Handle config subcommand actions.
///
/// `path` is the `--config` override; the platform default is used otherwise.
pub fn handle_config_action(action: ConfigAction, path: Option<&Path>) -> Result<(), ConfigError> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(config::default_path);

    match action {
        ConfigAction::Show => {
            let config = Config::load(Some(&config_path))?;
            if config_path.exists() {
                println!("# Config file: {} (exists)", config_path.display());
            } else {
                println!("# Config file: {} (not found, using defaults)", config_path.display());
            }
            println!();
            match config.to_toml() {
                Ok(text) => print!("{}", text),
                Err(e) => eprintln!("Error serializing config: {}", e),
            }
        }
        ConfigAction::Init => {
            config::write_default(&config_path)?;
            println!("Created config file: {}", config_path.display());
        }
    }
    Ok(())
}
