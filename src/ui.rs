use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use rand::Rng;
use unicode_width::UnicodeWidthStr;

use crate::diff::{display_glyph, CharClass};
use crate::lifecycle::{Phase, View};
use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;

/// Terminal stand-in for the selected font
pub fn font_modifier(font: &str) -> Modifier {
    match font {
        "cinzel" => Modifier::BOLD,
        "creepster" => Modifier::ITALIC,
        "nosifer" => Modifier::BOLD | Modifier::ITALIC,
        _ => Modifier::empty(),
    }
}

fn status_text(view: &View) -> &'static str {
    match view.phase {
        Phase::Idle => "start typing to begin",
        Phase::Running => "",
        Phase::Completed => "passage complete! summoning the next one...",
        Phase::Expired if view.retry_prompt => "time's up! try again? (y/n)",
        Phase::Expired => "time's up!",
    }
}

fn passage_spans<'a>(view: &View<'a>, font: Modifier) -> Vec<Span<'a>> {
    let base = Style::default().add_modifier(font);
    let correct = base.fg(Color::Green);
    let incorrect = base.fg(Color::Red).add_modifier(Modifier::BOLD);
    let pending = base.add_modifier(Modifier::DIM);
    let cursor = pending.add_modifier(Modifier::UNDERLINED | Modifier::REVERSED);

    view.passage
        .chars()
        .zip(view.classes.iter())
        .map(|(c, class)| match class {
            CharClass::Correct => Span::styled(display_glyph(c).to_string(), correct),
            // a missed space would be invisible
            CharClass::Incorrect if c.is_whitespace() => Span::styled("·", incorrect),
            CharClass::Incorrect => Span::styled(c.to_string(), incorrect),
            CharClass::Cursor => Span::styled(display_glyph(c).to_string(), cursor),
            CharClass::Pending => Span::styled(display_glyph(c).to_string(), pending),
        })
        .collect()
}

impl<R: Rng> Widget for &App<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = self.lifecycle.view();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let low_time_style = Style::default()
            .patch(bold_style)
            .fg(Color::Red)
            .add_modifier(Modifier::SLOW_BLINK);

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let prompt_occupied_lines =
            ((view.passage.width() as f64 / max_chars_per_line as f64).ceil() as u16).max(1);
        let padding = area.height.saturating_sub(prompt_occupied_lines + 6) / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Length(padding),
                Constraint::Length(1), // stats
                Constraint::Length(1),
                Constraint::Length(prompt_occupied_lines),
                Constraint::Length(1),
                Constraint::Length(1), // status
                Constraint::Min(0),
                Constraint::Length(1), // legend
            ])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled("ghosttype", bold_style.fg(Color::Green)),
            Span::styled(
                format!("   tier: {}   font: {}", view.tier, view.font),
                dim_style,
            ),
        ]))
        .alignment(Alignment::Center);
        header.render(chunks[0], buf);

        let time_style = if view.low_time {
            low_time_style
        } else {
            bold_style
        };
        let stats = Paragraph::new(Line::from(vec![
            Span::styled(
                format!(
                    "WPM: {}   Accuracy: {}%   ",
                    view.stats.wpm, view.stats.accuracy
                ),
                bold_style,
            ),
            Span::styled(format!("Time: {}s", view.remaining_secs), time_style),
        ]))
        .alignment(Alignment::Center);
        stats.render(chunks[2], buf);

        let spans = passage_spans(&view, font_modifier(view.font.as_str()));
        let passage = Paragraph::new(Line::from(spans))
            .alignment(if prompt_occupied_lines == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: false });
        passage.render(chunks[4], buf);

        let status_style = match view.phase {
            Phase::Completed => bold_style.fg(Color::Green),
            Phase::Expired => bold_style.fg(Color::Red),
            _ => italic_style,
        };
        Paragraph::new(Span::styled(status_text(&view), status_style))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);

        let legend = Paragraph::new(Span::styled(
            "(esc) reset / (tab) tier / (ctrl+n) new text / (ctrl+f) font / (ctrl+c) quit",
            italic_style,
        ))
        .alignment(Alignment::Center);
        legend.render(chunks[8], buf);
    }
}
