use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use kanadrill::engine::Hint;
use kanadrill::kana::{Script, Sign};

use crate::ui::theme::Theme;

/// What the grid knows about the round's outcome.
pub struct Outcome<'a> {
    pub question: &'a Sign,
    pub submitted: Option<&'a Sign>,
}

pub struct AnswerGrid<'a> {
    pub answers: &'a [Sign],
    pub script: Script,
    pub hints: &'a [Hint],
    pub marked: &'a [bool],
    pub outcome: Option<Outcome<'a>>,
    pub theme: &'a Theme,
}

impl<'a> AnswerGrid<'a> {
    pub fn new(answers: &'a [Sign], script: Script, theme: &'a Theme) -> Self {
        Self {
            answers,
            script,
            hints: &[],
            marked: &[],
            outcome: None,
            theme,
        }
    }

    pub fn hints(mut self, hints: &'a [Hint]) -> Self {
        self.hints = hints;
        self
    }

    pub fn marked(mut self, marked: &'a [bool]) -> Self {
        self.marked = marked;
        self
    }

    pub fn outcome(mut self, outcome: Option<Outcome<'a>>) -> Self {
        self.outcome = outcome;
        self
    }

    fn slot_style(&self, slot: usize, sign: &Sign) -> Style {
        let colors = &self.theme.colors;
        if let Some(outcome) = &self.outcome {
            if sign == outcome.question {
                return Style::default()
                    .fg(colors.answer_correct())
                    .add_modifier(Modifier::BOLD);
            }
            if outcome.submitted == Some(sign) {
                return Style::default()
                    .fg(colors.answer_wrong())
                    .add_modifier(Modifier::BOLD);
            }
        }
        if self.marked.get(slot).copied().unwrap_or(false) {
            return Style::default().fg(colors.marked());
        }
        Style::default().fg(colors.fg())
    }
}

impl Widget for AnswerGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Answers ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = self
            .answers
            .iter()
            .enumerate()
            .map(|(slot, sign)| {
                let mark = if self.marked.get(slot).copied().unwrap_or(false) {
                    "*"
                } else {
                    " "
                };
                let mut spans = vec![
                    Span::styled(
                        format!(" {mark}[{}] ", slot + 1),
                        Style::default().fg(colors.muted()),
                    ),
                    Span::styled(
                        format!("{:<6}", sign.text(self.script)),
                        self.slot_style(slot, sign),
                    ),
                ];
                if let Some(Hint::Visible(text)) = self.hints.get(slot) {
                    spans.push(Span::styled(
                        format!("  {text}"),
                        Style::default().fg(colors.hint()),
                    ));
                }
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
