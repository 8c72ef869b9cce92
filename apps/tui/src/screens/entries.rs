//! "条目" screen: browse the entries and statistics of the last conversion.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use worldbook_shared::{NormalizedEntry, Statistics, TavoEnvelope};

pub(crate) struct EntriesScreen {
    entries: Vec<NormalizedEntry>,
    statistics: Statistics,
    selected: usize,
    status: String,
}

impl EntriesScreen {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            statistics: Statistics::default(),
            selected: 0,
            status: "No conversion yet.".to_string(),
        }
    }

    /// Replace the listing with the entries of a freshly converted document.
    pub(crate) fn load(&mut self, json: &str) {
        match serde_json::from_str::<TavoEnvelope>(json) {
            Ok(envelope) => {
                let doc = envelope.tavo_format;
                self.status = format!(
                    "{} entries · {}",
                    doc.statistics.total_entries,
                    doc.timestamp.format("%Y-%m-%d %H:%M:%S")
                );
                self.entries = doc.entries;
                self.statistics = doc.statistics;
            }
            Err(e) => {
                self.entries.clear();
                self.statistics = Statistics::default();
                self.status = format!("Failed to read conversion result: {e}");
            }
        }
        self.selected = 0;
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::new();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Min(1),    // List + detail
                Constraint::Length(3), // Statistics
            ])
            .split(area);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Min(1)])
            .split(rows[0]);

        if self.entries.is_empty() {
            let empty = Paragraph::new("No entries.\n\nConvert some input on the first tab.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(" Entries "));
            f.render_widget(empty, rows[0]);
        } else {
            let items: Vec<ListItem> = self
                .entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    let style = if i == self.selected {
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    let prefix = if i == self.selected { "▸ " } else { "  " };
                    ListItem::new(format!(
                        "{prefix}{:>3} {}  [{}]",
                        entry.id, entry.metadata.name, entry.metadata.entry_type
                    ))
                    .style(style)
                })
                .collect();

            let list = List::new(items).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Entries ({}) ", self.entries.len())),
            );
            f.render_widget(list, cols[0]);

            let detail = Paragraph::new(detail_lines(&self.entries[self.selected]))
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title(" Detail "));
            f.render_widget(detail, cols[1]);
        }

        let types = self
            .statistics
            .entry_types
            .iter()
            .map(|(t, n)| format!("{t}: {n}"))
            .collect::<Vec<_>>()
            .join(" · ");
        let stats = Paragraph::new(format!("{}    {types}", self.status))
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Statistics "));
        f.render_widget(stats, rows[1]);
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode, _modifiers: KeyModifiers) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.entries.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.entries.len().saturating_sub(1),
            _ => {}
        }
    }
}

fn detail_lines(entry: &NormalizedEntry) -> Vec<Line<'static>> {
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let field = |label: &'static str, value: &str| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{label:<18}"), Style::default().fg(Color::DarkGray)),
            Span::raw(value.to_string()),
        ])
    };

    let meta = &entry.metadata;
    let content = &entry.content;
    vec![
        Line::from("metadata").style(heading),
        field("name", &meta.name),
        field("position", &meta.position),
        field("type", &meta.entry_type),
        field("scan_depth", &meta.scan_depth),
        field("sticky", &meta.sticky),
        field("cooldown", &meta.cooldown),
        field("delay", &meta.delay),
        Line::from(""),
        Line::from("content").style(heading),
        field("keywords", &content.keywords),
        field("negative_keywords", &content.negative_keywords),
        field("main_content", &content.main_content),
        field("annotation", &content.annotation),
        field("development", &content.development),
    ]
}
