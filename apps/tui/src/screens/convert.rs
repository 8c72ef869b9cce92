//! "转换" screen: pseudo-XML input editor and Tavo JSON output pane.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Lines moved per PageUp/PageDown in the output pane.
const PAGE: u16 = 10;

/// Which pane has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Input,
    Output,
}

pub(crate) struct ConvertScreen {
    input: String,
    output: String,
    scroll: u16,
    focused: Pane,
}

impl ConvertScreen {
    pub(crate) fn new() -> Self {
        Self {
            input: String::new(),
            output: String::new(),
            scroll: 0,
            focused: Pane::Input,
        }
    }

    /// Typing goes to the input pane while it has focus.
    pub(crate) fn is_editing(&self) -> bool {
        self.focused == Pane::Input
    }

    pub(crate) fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn output(&self) -> &str {
        &self.output
    }

    pub(crate) fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.focused = Pane::Input;
    }

    pub(crate) fn set_output(&mut self, json: String) {
        self.output = json;
        self.scroll = 0;
    }

    pub(crate) fn clear(&mut self) {
        self.input.clear();
        self.output.clear();
        self.scroll = 0;
        self.focused = Pane::Input;
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Percentage(45), // Input
                Constraint::Length(1),      // Action hint
                Constraint::Min(1),         // Output
            ])
            .split(area);

        let input_style = if self.focused == Pane::Input {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let input_block = Block::default()
            .borders(Borders::ALL)
            .title(" 输入伪XML内容 ")
            .border_style(input_style);
        let input_text = if self.input.is_empty() {
            Paragraph::new("粘贴伪XML内容...\n示例: <startl><comment>条目</comment><position>Char↑</position>...<endl>")
                .style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(self.input.as_str())
        };
        f.render_widget(
            input_text.wrap(Wrap { trim: false }).block(input_block),
            chunks[0],
        );

        let hint = if self.focused == Pane::Input {
            "Ctrl-R convert · Ctrl-E example · Ctrl-L clear · Tab to output"
        } else {
            "↑/↓ PgUp/PgDn scroll · Enter to edit input · Tab next screen"
        };
        let hint_p = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint_p, chunks[1]);

        let output_style = if self.focused == Pane::Output {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let output_block = Block::default()
            .borders(Borders::ALL)
            .title(" Tavo格式JSON输出 ")
            .border_style(output_style);
        let output_text = Paragraph::new(self.output.as_str())
            .scroll((self.scroll, 0))
            .block(output_block);
        f.render_widget(output_text, chunks[2]);
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match self.focused {
            Pane::Input => match code {
                KeyCode::Tab | KeyCode::Esc => self.focused = Pane::Output,
                KeyCode::Enter => self.input.push('\n'),
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                    self.input.push(c);
                }
                _ => {}
            },
            Pane::Output => match code {
                KeyCode::Enter | KeyCode::Char('i') => self.focused = Pane::Input,
                KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
                KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
                KeyCode::PageUp => self.scroll_by(-i32::from(PAGE)),
                KeyCode::PageDown => self.scroll_by(i32::from(PAGE)),
                KeyCode::Home => self.scroll = 0,
                _ => {}
            },
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        let max = u16::try_from(self.output.lines().count().saturating_sub(1)).unwrap_or(u16::MAX);
        let next = (i32::from(self.scroll) + delta).clamp(0, i32::from(max));
        self.scroll = u16::try_from(next).unwrap_or(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(screen: &mut ConvertScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[test]
    fn typing_edits_input() {
        let mut screen = ConvertScreen::new();
        type_text(&mut screen, "<startl>");
        screen.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        type_text(&mut screen, "<endl>x");
        screen.handle_key(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(screen.input(), "<startl>\n<endl>");

        screen.handle_key(KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert_eq!(screen.input(), "<startl>\n<endl>");
    }

    #[test]
    fn output_focus_scrolls_within_bounds() {
        let mut screen = ConvertScreen::new();
        screen.set_output("a\nb\nc".into());
        screen.handle_key(KeyCode::Tab, KeyModifiers::NONE);
        assert!(!screen.is_editing());

        screen.handle_key(KeyCode::PageDown, KeyModifiers::NONE);
        assert_eq!(screen.scroll, 2);
        screen.handle_key(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(screen.scroll, 1);
        screen.handle_key(KeyCode::PageUp, KeyModifiers::NONE);
        assert_eq!(screen.scroll, 0);

        // Typed characters do not leak into the input while the output has focus.
        screen.handle_key(KeyCode::Char('x'), KeyModifiers::NONE);
        assert!(screen.input().is_empty());
    }

    #[test]
    fn clear_resets_everything() {
        let mut screen = ConvertScreen::new();
        screen.set_input("abc");
        screen.set_output("{}".into());
        screen.clear();
        assert!(screen.input().is_empty());
        assert!(screen.output().is_empty());
        assert!(screen.is_editing());
    }
}
