use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::config::Theme;

const SEPARATOR: &str = " │ ";

/// Values shown in the status row above the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct HudInfo {
    pub score: u32,
    pub length: usize,
    pub stones: usize,
    pub gold_apples: usize,
}

/// Renders the one-line HUD and returns the remaining area below it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, info: HudInfo, theme: &Theme) -> Rect {
    let [hud_area, play_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    frame.render_widget(
        Paragraph::new(hud_line(info, theme))
            .alignment(Alignment::Center)
            .style(Style::default().bg(theme.board_bg)),
        hud_area,
    );

    play_area
}

fn hud_line(info: HudInfo, theme: &Theme) -> Line<'static> {
    let label = Style::default().fg(theme.score_text);
    let value = Style::default()
        .fg(theme.score_text)
        .add_modifier(Modifier::BOLD);

    Line::from(vec![
        Span::styled("Score: ", label),
        Span::styled(info.score.to_string(), value),
        Span::styled(SEPARATOR, label),
        Span::styled("Length: ", label),
        Span::styled(info.length.to_string(), value),
        Span::styled(SEPARATOR, label),
        Span::styled("Stones: ", Style::default().fg(theme.stone)),
        Span::styled(info.stones.to_string(), value),
        Span::styled(SEPARATOR, label),
        Span::styled("Gold: ", Style::default().fg(theme.gold_apple)),
        Span::styled(info.gold_apples.to_string(), value),
    ])
}

#[cfg(test)]
mod tests {
    use crate::config::THEME_CLASSIC;

    use super::{hud_line, HudInfo};

    #[test]
    fn hud_line_lists_every_counter() {
        let line = hud_line(
            HudInfo {
                score: 12,
                length: 9,
                stones: 2,
                gold_apples: 1,
            },
            &THEME_CLASSIC,
        );

        let text: String = line
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();
        assert_eq!(text, "Score: 12 │ Length: 9 │ Stones: 2 │ Gold: 1");
    }
}
