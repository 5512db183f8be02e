//! Effective runtime settings: command-line flags layered over the config file.

use std::path::PathBuf;

use super::args::Args;
use crate::ascii::{CharSet, GlyphRamp, RenderConfig, Sampling};
use crate::config::{Config, ConfigError};
use crate::producer::ProducerOptions;

/// Everything `main` needs to start a preview.
#[derive(Debug, Clone)]
pub struct Settings {
    pub input: String,
    pub producer: ProducerOptions,
    /// Render settings; the target size is filled in per tick
    pub render: RenderConfig,
    pub ramp: GlyphRamp,
    pub exit_on_end: bool,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Merge flags over the file config. A flag always wins; boolean flags
    /// can only switch a setting on.
    pub fn resolve(input: &str, args: &Args, config: &Config) -> Result<Self, ConfigError> {
        let ramp = match (&args.custom_ramp, args.ramp) {
            (Some(custom), _) => {
                GlyphRamp::new(custom).map_err(|_| ConfigError::InvalidValue {
                    key: "--custom-ramp",
                    value: custom.clone(),
                })?
            }
            (None, Some(named)) => CharSet::from(named).ramp(),
            (None, None) => config.glyph_ramp()?,
        };

        let sampling = match args.sampling {
            Some(mode) => Sampling::from(mode),
            None => config.sampling()?,
        };

        let filter_strength = match args.filter_strength {
            Some(strength) => strength,
            None => config.filter_strength()?,
        };

        let mut render = RenderConfig::new(0, 0);
        render.filter_strength = filter_strength;
        render.sampling = sampling;
        render.invert = args.invert || config.render.invert;

        let mut schedule = config.schedule();
        if let Some(fps) = args.fps {
            schedule = schedule.with_fps(fps);
        }

        let resolution = match args.resolution {
            Some(resolution) => Some(resolution),
            None => config.resolution()?,
        };

        let log_level = match args.verbose {
            0 => config.log.level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        };

        Ok(Self {
            input: input.to_string(),
            producer: ProducerOptions {
                resolution,
                mirror: args.mirror || config.source.mirror,
                schedule,
                // An explicit rate wins over the media's own
                follow_source_rate: args.fps.is_none() && config.source.fps.is_none(),
            },
            render,
            ramp,
            exit_on_end: args.exit_on_end,
            log_level,
            log_file: args.log_file.clone().or_else(|| config.log.file.clone()),
        })
    }
}
