use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::config::Theme;
use crate::game::GameOverReason;

const DIALOG_WIDTH: u16 = 34;
const DIALOG_HEIGHT: u16 = 9;

/// Draws the game-over dialog centered over `area`.
pub fn render_game_over_dialog(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    reason: Option<GameOverReason>,
    theme: &Theme,
) {
    let popup = centered_rect(area, DIALOG_WIDTH, DIALOG_HEIGHT);
    frame.render_widget(Clear, popup);

    let text = Style::default().fg(theme.score_text);
    let lines = vec![
        Line::from("GAME OVER").style(
            Style::default()
                .fg(theme.apple)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(reason_text(reason)).style(text),
        Line::from(format!("Score: {score}")).style(text),
        Line::from(""),
        Line::from("[Enter]/[R] Restart").style(
            Style::default()
                .fg(theme.border)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from("[Q]/[Esc] Quit").style(text),
    ];

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::bordered()
                .title(" game over ")
                .border_style(Style::default().fg(theme.border))
                .style(Style::default().bg(theme.dialog_bg)),
        ),
        popup,
    );
}

fn reason_text(reason: Option<GameOverReason>) -> &'static str {
    match reason {
        Some(GameOverReason::StoneCollision) => "You hit a stone",
        Some(GameOverReason::SelfCollision) => "You bit yourself",
        Some(GameOverReason::BoardFull) => "No room left on the board",
        None => "",
    }
}

/// Fixed-size rectangle centered in `area`, shrunk to fit when `area` is smaller.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [center] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);

    center
}
