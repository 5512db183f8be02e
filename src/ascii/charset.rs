//! Glyph ramps for ASCII rendering.

use std::fmt;

use unicode_width::UnicodeWidthChar;

/// Standard ASCII density ramp (10 levels).
/// Characters ordered from darkest (space) to brightest (@).
/// Works well on dark terminals.
pub const STANDARD_RAMP: &str = " .:-=+*#%@";

/// Block character ramp (5 levels).
/// Full-cell shades only; each glyph still covers exactly one cell.
pub const BLOCKS_RAMP: &str = " ░▒▓█";

/// Detailed ASCII ramp (67 levels).
pub const DETAILED_RAMP: &str =
    " .'`^\",:;Il!i~+_-?][}{1)(|/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Dense ASCII ramp (92 levels), ordered by measured glyph coverage.
pub const DENSE_RAMP: &str =
    " `.-':_,^=;><+!rc*/z?sLTv)J7(|Fi{C}fI31tlu[neoZ5Yxjya]2ESwqkP6h9d4VpOGbUAKXHm8RD#$Bg0MNWQ%&@";

/// Errors building a glyph ramp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RampError {
    /// A ramp needs at least one glyph
    #[error("glyph ramp must contain at least one character")]
    Empty,
    /// Control characters would corrupt the terminal grid
    #[error("glyph ramp contains control character {0:?}")]
    ControlCharacter(char),
    /// Every glyph must occupy exactly one terminal column
    #[error("glyph {glyph:?} is {width} columns wide; ramp glyphs must be one column")]
    NotSingleWidth { glyph: char, width: usize },
}

/// Ordered glyphs from visually sparsest to densest.
///
/// Fixed for the lifetime of a render; never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRamp {
    glyphs: Vec<char>,
}

impl GlyphRamp {
    /// Build a ramp from a string of glyphs, sparsest first.
    ///
    /// # Errors
    /// * `RampError::Empty` - if `glyphs` is empty
    /// * `RampError::ControlCharacter` - if any glyph is a control character
    /// * `RampError::NotSingleWidth` - if any glyph is wide (emoji, CJK) or
    ///   zero-width (combining marks); one glyph must fill one cell
    pub fn new(glyphs: &str) -> Result<Self, RampError> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.is_empty() {
            return Err(RampError::Empty);
        }
        for &glyph in &glyphs {
            if glyph.is_control() {
                return Err(RampError::ControlCharacter(glyph));
            }
            let width = glyph.width().unwrap_or(0);
            if width != 1 {
                return Err(RampError::NotSingleWidth { glyph, width });
            }
        }
        Ok(Self { glyphs })
    }

    /// The standard 10-level ramp.
    pub fn standard() -> Self {
        CharSet::Standard.ramp()
    }

    /// Number of intensity levels.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyphs, sparsest first.
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    /// Sparsest glyph (lowest intensity).
    pub fn first(&self) -> char {
        self.glyphs[0]
    }

    /// Densest glyph (highest intensity).
    pub fn last(&self) -> char {
        self.glyphs[self.glyphs.len() - 1]
    }

    /// Glyph at `index`, clamped to the ramp bounds.
    pub fn glyph(&self, index: usize) -> char {
        self.glyphs[index.min(self.glyphs.len() - 1)]
    }
}

impl Default for GlyphRamp {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for GlyphRamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.glyphs.iter().try_for_each(|c| write!(f, "{}", c))
    }
}

/// Built-in ramp selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    /// Standard ASCII density ramp (10 levels)
    #[default]
    Standard,
    /// Block shades (5 levels)
    Blocks,
    /// Detailed ASCII ramp (67 levels)
    Detailed,
    /// Dense ASCII ramp (92 levels)
    Dense,
}

impl CharSet {
    /// Get the glyph string for this charset.
    pub fn glyphs(&self) -> &'static str {
        match self {
            CharSet::Standard => STANDARD_RAMP,
            CharSet::Blocks => BLOCKS_RAMP,
            CharSet::Detailed => DETAILED_RAMP,
            CharSet::Dense => DENSE_RAMP,
        }
    }

    /// Build the ramp for this charset.
    pub fn ramp(&self) -> GlyphRamp {
        GlyphRamp {
            glyphs: self.glyphs().chars().collect(),
        }
    }

    /// Get a human-readable name for the charset.
    pub fn name(&self) -> &'static str {
        match self {
            CharSet::Standard => "standard",
            CharSet::Blocks => "blocks",
            CharSet::Detailed => "detailed",
            CharSet::Dense => "dense",
        }
    }
}
