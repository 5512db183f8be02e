//! CLI enum types for ramp and sampling options.

use clap::ValueEnum;

use crate::ascii;

/// Built-in glyph ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CharacterSet {
    #[default]
    Standard,
    Blocks,
    Detailed,
    Dense,
}

impl From<CharacterSet> for ascii::CharSet {
    fn from(c: CharacterSet) -> Self {
        match c {
            CharacterSet::Standard => ascii::CharSet::Standard,
            CharacterSet::Blocks => ascii::CharSet::Blocks,
            CharacterSet::Detailed => ascii::CharSet::Detailed,
            CharacterSet::Dense => ascii::CharSet::Dense,
        }
    }
}

/// How each glyph cell is reduced to one brightness value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SamplingMode {
    /// Single pixel per cell (fast, crisp)
    #[default]
    Point,
    /// Mean over the cell (smoother)
    Average,
}

impl From<SamplingMode> for ascii::Sampling {
    fn from(s: SamplingMode) -> Self {
        match s {
            SamplingMode::Point => ascii::Sampling::Point,
            SamplingMode::Average => ascii::Sampling::Average,
        }
    }
}
