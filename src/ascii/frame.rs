//! Rasterized glyph block.

use std::fmt;

/// A block of glyphs ready to paint, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AsciiFrame {
    pub chars: Vec<char>,
    /// Width in characters
    pub width: u16,
    /// Height in characters
    pub height: u16,
}

impl AsciiFrame {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Glyphs of one row.
    pub fn row(&self, index: u16) -> Option<&[char]> {
        if index >= self.height {
            return None;
        }
        let start = index as usize * self.width as usize;
        self.chars.get(start..start + self.width as usize)
    }

    /// Rows as strings.
    pub fn lines(&self) -> Vec<String> {
        (0..self.height)
            .filter_map(|r| self.row(r))
            .map(|row| row.iter().collect())
            .collect()
    }

    /// Rows joined with `\n`, no trailing newline.
    pub fn to_text(&self) -> String {
        self.lines().join("\n")
    }
}

impl fmt::Display for AsciiFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_split_by_width() {
        let frame = AsciiFrame {
            chars: "abcdef".chars().collect(),
            width: 3,
            height: 2,
        };
        assert_eq!(frame.lines(), vec!["abc", "def"]);
        assert_eq!(frame.to_text(), "abc\ndef");
        assert_eq!(frame.row(1), Some(&['d', 'e', 'f'][..]));
        assert_eq!(frame.row(2), None);
    }

    #[test]
    fn test_empty() {
        assert!(AsciiFrame::default().is_empty());
        assert_eq!(AsciiFrame::default().to_text(), "");
        let no_columns = AsciiFrame {
            chars: Vec::new(),
            width: 0,
            height: 5,
        };
        assert!(no_columns.is_empty());
    }
}
