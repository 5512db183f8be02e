//! Minimal screen abstraction the renderer paints through.

use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::widgets::Paragraph;
use ratatui::Terminal;
use std::io;

/// A character-cell screen.
///
/// `clear` and `write_text` only stage content; nothing becomes visible
/// until `refresh`.
pub trait Screen {
    /// Current size as `(rows, cols)`.
    fn size(&mut self) -> io::Result<(u16, u16)>;

    /// Discard all staged content.
    fn clear(&mut self);

    /// Stage a block of text with its top-left corner at `(row, col)`.
    /// Lines are separated by `\n`; anything past the screen edge is clipped.
    fn write_text(&mut self, row: u16, col: u16, text: &str);

    /// Paint the staged content.
    fn refresh(&mut self) -> io::Result<()>;
}

impl<S: Screen + ?Sized> Screen for &mut S {
    fn size(&mut self) -> io::Result<(u16, u16)> {
        (**self).size()
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn write_text(&mut self, row: u16, col: u16, text: &str) {
        (**self).write_text(row, col, text)
    }

    fn refresh(&mut self) -> io::Result<()> {
        (**self).refresh()
    }
}

#[derive(Debug, Clone)]
struct Placement {
    row: u16,
    col: u16,
    text: String,
}

/// [`Screen`] over a ratatui terminal.
///
/// Staged text is painted in a single `draw` call, so a refresh never shows
/// a half-written frame.
pub struct TerminalScreen<B: Backend> {
    terminal: Terminal<B>,
    staged: Vec<Placement>,
}

impl<B: Backend> TerminalScreen<B> {
    /// Wrap a ratatui terminal.
    ///
    /// # Arguments
    /// * `terminal` - A crossterm terminal for real output, or a
    ///   `TestBackend` terminal in tests. Raw mode and the alternate screen
    ///   are the caller's concern (see `Tui`).
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            staged: Vec::new(),
        }
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    pub fn backend_mut(&mut self) -> &mut B {
        self.terminal.backend_mut()
    }
}

impl<B: Backend> Screen for TerminalScreen<B> {
    fn size(&mut self) -> io::Result<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.height, size.width))
    }

    fn clear(&mut self) {
        self.staged.clear();
    }

    fn write_text(&mut self, row: u16, col: u16, text: &str) {
        self.staged.push(Placement {
            row,
            col,
            text: text.to_owned(),
        });
    }

    fn refresh(&mut self) -> io::Result<()> {
        let staged = &self.staged;
        self.terminal.draw(|frame| {
            let area = frame.area();
            for placement in staged {
                if placement.row >= area.height || placement.col >= area.width {
                    continue;
                }
                let rect = Rect::new(
                    area.x + placement.col,
                    area.y + placement.row,
                    area.width - placement.col,
                    area.height - placement.row,
                );
                frame.render_widget(Paragraph::new(placement.text.as_str()), rect);
            }
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn screen(cols: u16, rows: u16) -> TerminalScreen<TestBackend> {
        TerminalScreen::new(Terminal::new(TestBackend::new(cols, rows)).unwrap())
    }

    fn row_text(screen: &TerminalScreen<TestBackend>, row: u16) -> String {
        let buffer = screen.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, row)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_size_is_rows_then_cols() {
        let mut screen = screen(20, 5);
        assert_eq!(screen.size().unwrap(), (5, 20));
    }

    #[test]
    fn test_nothing_visible_before_refresh() {
        let mut screen = screen(6, 2);
        screen.write_text(0, 0, "abc");
        assert_eq!(row_text(&screen, 0), "      ");
        screen.refresh().unwrap();
        assert_eq!(row_text(&screen, 0), "abc   ");
    }

    #[test]
    fn test_write_multiline_at_offset() {
        let mut screen = screen(6, 3);
        screen.write_text(1, 2, "ab\ncd");
        screen.refresh().unwrap();
        assert_eq!(row_text(&screen, 0), "      ");
        assert_eq!(row_text(&screen, 1), "  ab  ");
        assert_eq!(row_text(&screen, 2), "  cd  ");
    }

    #[test]
    fn test_clear_drops_previous_content() {
        let mut screen = screen(4, 1);
        screen.write_text(0, 0, "@@@@");
        screen.refresh().unwrap();
        screen.clear();
        screen.write_text(0, 0, "..");
        screen.refresh().unwrap();
        assert_eq!(row_text(&screen, 0), "..  ");
    }

    #[test]
    fn test_offscreen_write_is_clipped() {
        let mut screen = screen(4, 1);
        screen.write_text(3, 0, "hidden");
        screen.write_text(0, 2, "abcdef");
        screen.refresh().unwrap();
        assert_eq!(row_text(&screen, 0), "  ab");
    }
}
