//! Frame rendering
//!
//! Rendering builds a [`Frame`] from browser state without touching the
//! terminal; writing the frame out is a separate step.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{ContentStyle, Print, PrintStyledContent};
use crossterm::terminal::{Clear, ClearType};

use crate::store::{DisplayFields, Entry};
use crate::tui::app::BrowserState;
use crate::tui::theme::Theme;

/// How a frame line is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Header,
    Cursor,
    Selected,
    Normal,
    Muted,
    Success,
    Notice,
    Error,
    Warning,
}

impl LineStyle {
    fn content_style(self) -> ContentStyle {
        match self {
            LineStyle::Header => Theme::header(),
            LineStyle::Cursor => Theme::cursor(),
            LineStyle::Selected => Theme::selected(),
            LineStyle::Normal => Theme::normal(),
            LineStyle::Muted => Theme::muted(),
            LineStyle::Success => Theme::success(),
            LineStyle::Notice => Theme::notice(),
            LineStyle::Error => Theme::error(),
            LineStyle::Warning => Theme::warning(),
        }
    }
}

/// Outcome of the last action, shown below the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Success(String),
    Notice(String),
    Error(String),
}

impl Status {
    pub fn text(&self) -> &str {
        match self {
            Status::Success(text) | Status::Notice(text) | Status::Error(text) => text,
        }
    }

    pub fn style(&self) -> LineStyle {
        match self {
            Status::Success(_) => LineStyle::Success,
            Status::Notice(_) => LineStyle::Notice,
            Status::Error(_) => LineStyle::Error,
        }
    }
}

/// One full screen of output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    lines: Vec<(LineStyle, String)>,
}

impl Frame {
    pub fn push(&mut self, style: LineStyle, text: impl Into<String>) {
        self.lines.push((style, text.into()));
    }

    pub fn lines(&self) -> &[(LineStyle, String)] {
        &self.lines
    }

    /// Plain text of the frame, one line per row
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Clear the screen and draw the frame from the top-left corner.
    ///
    /// Lines end in `\r\n`: raw mode does not translate `\n`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        for (style, text) in &self.lines {
            queue!(
                out,
                PrintStyledContent(style.content_style().apply(text.as_str())),
                Print("\r\n")
            )?;
        }
        out.flush()
    }
}

/// Render the browser screen
pub fn render(
    app_name: &str,
    state: &BrowserState,
    display: &DisplayFields,
    status: Option<&Status>,
) -> Frame {
    let mut frame = Frame::default();
    let selected = state.selected_indices().len();

    frame.push(LineStyle::Header, format!("◆ {} Database Browser", app_name));
    frame.push(
        LineStyle::Muted,
        format!(
            "│ Page {} of {} | {} selected",
            state.current_page() + 1,
            state.page_count(),
            selected
        ),
    );
    frame.push(LineStyle::Muted, "│");

    let offset = state.page_offset();
    for (row, entry) in state.page_entries().iter().enumerate() {
        let is_cursor = row == state.cursor_pos();
        let is_selected = state.selected_indices().contains(&(offset + row));

        let prefix = if is_cursor { "│ >" } else { "│  " };
        let marker = if is_selected { "●" } else { "○" };
        let style = if is_cursor {
            LineStyle::Cursor
        } else if is_selected {
            LineStyle::Selected
        } else {
            LineStyle::Normal
        };

        frame.push(
            style,
            format!("{} {} {}", prefix, marker, entry.display_name_with(display)),
        );
    }

    frame.push(LineStyle::Muted, "│");
    if selected > 0 {
        frame.push(
            LineStyle::Warning,
            format!("│ Press 'd' to delete {} selected entries", selected),
        );
    }
    frame.push(LineStyle::Muted, "│ Press 'q' to quit");

    if let Some(status) = status {
        frame.push(status.style(), format!("│ {}", status.text()));
    }

    frame
}

/// Render the deletion confirmation screen (prompt line excluded)
pub fn render_confirmation(entries: &[&Entry], display: &DisplayFields) -> Frame {
    let mut frame = Frame::default();
    frame.push(
        LineStyle::Warning,
        format!("🗑️  Delete {} entries?", entries.len()),
    );
    frame.push(LineStyle::Normal, "");
    for entry in entries {
        frame.push(
            LineStyle::Normal,
            format!("  • {}", entry.display_name_with(display)),
        );
    }
    frame.push(LineStyle::Normal, "");
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::input::Key;
    use chrono::NaiveDate;

    fn entries(n: usize) -> Vec<Entry> {
        let created_at = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        (0..n)
            .map(|i| {
                Entry::new(
                    (n - i) as i64,
                    created_at,
                    format!(r#"{{"name": "item {}"}}"#, i),
                )
            })
            .collect()
    }

    #[test]
    fn test_header_and_rows() {
        let state = BrowserState::new(entries(3), 10);
        let frame = render("food-logger", &state, &DisplayFields::default(), None);
        let lines: Vec<&str> = frame.lines().iter().map(|(_, t)| t.as_str()).collect();

        assert_eq!(lines[0], "◆ food-logger Database Browser");
        assert_eq!(lines[1], "│ Page 1 of 1 | 0 selected");
        assert_eq!(lines[3], "│ > ○ \"item 0\"");
        assert_eq!(lines[4], "│   ○ \"item 1\"");
        assert_eq!(lines[5], "│   ○ \"item 2\"");
        assert_eq!(frame.lines()[3].0, LineStyle::Cursor);
        assert!(!frame.text().contains("Press 'd'"));
        assert!(frame.text().ends_with("│ Press 'q' to quit"));
    }

    #[test]
    fn test_selection_marker_and_delete_hint() {
        let mut state = BrowserState::new(entries(3), 10);
        state.handle_key(Key::Down);
        state.handle_key(Key::Space);
        state.handle_key(Key::Down);

        let frame = render("food-logger", &state, &DisplayFields::default(), None);
        let text = frame.text();
        assert!(text.contains("│   ● \"item 1\""));
        assert!(text.contains("│ > ○ \"item 2\""));
        assert!(text.contains("| 1 selected"));
        assert!(text.contains("│ Press 'd' to delete 1 selected entries"));
    }

    #[test]
    fn test_only_current_page_is_shown() {
        let mut state = BrowserState::new(entries(23), 10);
        for _ in 0..20 {
            state.handle_key(Key::Down);
        }

        let frame = render("food-logger", &state, &DisplayFields::default(), None);
        let text = frame.text();
        assert!(text.contains("│ Page 3 of 3 | 0 selected"));
        assert!(text.contains("│ > ○ \"item 20\""));
        assert!(text.contains("\"item 22\""));
        assert!(!text.contains("\"item 19\""));
    }

    #[test]
    fn test_status_line_style_follows_outcome() {
        let state = BrowserState::new(entries(1), 10);
        let cases = [
            (Status::Success("✅ Deleted 1 entries".to_string()), LineStyle::Success),
            (Status::Notice("❌ Deletion cancelled".to_string()), LineStyle::Notice),
            (Status::Error("❌ Delete failed: locked".to_string()), LineStyle::Error),
        ];

        for (status, style) in cases {
            let frame = render("food-logger", &state, &DisplayFields::default(), Some(&status));
            assert_eq!(
                frame.lines().last().unwrap(),
                &(style, format!("│ {}", status.text()))
            );
        }
    }

    #[test]
    fn test_confirmation_lists_entries() {
        let all = entries(2);
        let selected: Vec<&Entry> = all.iter().collect();
        let frame = render_confirmation(&selected, &DisplayFields::default());
        let text = frame.text();
        assert!(text.starts_with("🗑️  Delete 2 entries?"));
        assert!(text.contains("  • \"item 0\""));
        assert!(text.contains("  • \"item 1\""));
    }

    #[test]
    fn test_write_to_uses_crlf() {
        let state = BrowserState::new(entries(1), 10);
        let frame = render("food-logger", &state, &DisplayFields::default(), None);
        let mut out = Vec::new();
        frame.write_to(&mut out).unwrap();

        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("Database Browser"));
        assert_eq!(written.matches("\r\n").count(), frame.lines().len());
    }
}
