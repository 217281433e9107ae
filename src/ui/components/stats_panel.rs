use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use kanadrill::engine::{SignStatsStore, StatSide};
use kanadrill::kana::Script;

use crate::ui::theme::Theme;

const HARDEST_SHOWN: usize = 10;

pub struct StatsPanel<'a> {
    pub stats: &'a SignStatsStore,
    pub theme: &'a Theme,
}

impl<'a> StatsPanel<'a> {
    pub fn new(stats: &'a SignStatsStore, theme: &'a Theme) -> Self {
        Self { stats, theme }
    }

    fn side_lines(&self, side: StatSide) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let summary = self.stats.summary();
        let (correct, wrong, script) = match side {
            StatSide::Hiragana => (summary.correct_hiragana, summary.wrong_hiragana, Script::Hiragana),
            StatSide::Katakana => (summary.correct_katakana, summary.wrong_katakana, Script::Katakana),
        };

        let mut lines = vec![
            Line::from(Span::styled(
                format!(" Correct {correct}  Wrong {wrong}  Accuracy {:.1}%", summary.accuracy(side)),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                " Most missed",
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            )),
        ];

        let hardest = self.stats.hardest(side, HARDEST_SHOWN);
        if hardest.is_empty() {
            lines.push(Line::from(Span::styled(
                "  nothing yet",
                Style::default().fg(colors.muted()),
            )));
        }
        for record in hardest {
            let avg = record.average_answer_time(side);
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<4} {:<5}", record.sign.text(script), record.sign.roomaji),
                    Style::default().fg(colors.fg()),
                ),
                Span::styled(
                    format!(" wrong {:>3}  avg {:>5.2}s", record.wrong_count(side), avg.as_secs_f64()),
                    Style::default().fg(colors.answer_wrong()),
                ),
            ]));
        }
        lines
    }
}

impl Widget for StatsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(
                " Statistics | {} of {} signs practiced ",
                self.stats.summary().practiced_signs,
                self.stats.len()
            ))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(inner);

        for (column, side, title) in [
            (columns[0], StatSide::Hiragana, " Hiragana "),
            (columns[1], StatSide::Katakana, " Katakana "),
        ] {
            let block = Block::bordered()
                .title(title)
                .border_style(Style::default().fg(colors.border()));
            let content = block.inner(column);
            block.render(column, buf);
            Paragraph::new(self.side_lines(side)).render(content, buf);
        }
    }
}
