use rand::Rng;
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Block;

use crate::config::{CELL_COLUMNS, GLYPH_CELL, GridSize, Theme};
use crate::entity::Entity;
use crate::game::{GameState, GameStatus};
use crate::snake::Cell;
use crate::ui::dialog::render_game_over_dialog;
use crate::ui::hud::{HudInfo, render_hud};

/// Renders the full game frame from immutable state.
pub fn render<R: Rng>(frame: &mut Frame<'_>, state: &GameState<R>, theme: &Theme) {
    let hud_info = HudInfo {
        score: state.score(),
        length: state.snake().len(),
        stones: state.stones().len(),
        gold_apples: state.gold_apples().len(),
    };
    let play_area = render_hud(frame, frame.area(), hud_info, theme);

    let board_area = board_rect(play_area, state.rules().grid);
    let block = Block::bordered()
        .border_style(Style::new().fg(theme.border))
        .style(Style::new().bg(theme.board_bg));
    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    for entity in state.entities() {
        render_entity(frame, inner, state.rules().grid, entity, theme);
    }

    if state.status() == GameStatus::GameOver {
        render_game_over_dialog(
            frame,
            board_area,
            state.score(),
            state.game_over_reason(),
            theme,
        );
    }
}

fn render_entity(
    frame: &mut Frame<'_>,
    inner: Rect,
    bounds: GridSize,
    entity: Entity<'_>,
    theme: &Theme,
) {
    let style = Style::new().fg(entity_color(&entity, theme));
    let buffer = frame.buffer_mut();

    for cell in entity.cells() {
        let Some((x, y)) = cell_to_terminal(inner, bounds, cell) else {
            continue;
        };
        buffer.set_string(x, y, GLYPH_CELL, style);
    }
}

fn entity_color(entity: &Entity<'_>, theme: &Theme) -> Color {
    match entity {
        Entity::Apple(_) => theme.apple,
        Entity::Stone(_) => theme.stone,
        Entity::GoldApple(_) => theme.gold_apple,
        Entity::Snake(_) => theme.snake,
    }
}

/// Bordered board rectangle, centered in `area` and clipped to it.
fn board_rect(area: Rect, bounds: GridSize) -> Rect {
    let width = bounds.width.saturating_mul(CELL_COLUMNS).saturating_add(2);
    let height = bounds.height.saturating_add(2);

    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Start)
        .areas(area);
    let [board] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);

    board
}

/// Maps a board cell to the terminal column/row of its left half, or `None`
/// when any part of it would fall outside `inner`.
fn cell_to_terminal(inner: Rect, bounds: GridSize, cell: Cell) -> Option<(u16, u16)> {
    if !cell.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(cell.x).ok()?.checked_mul(CELL_COLUMNS)?;
    let y_offset = u16::try_from(cell.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_COLUMNS) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use ratatui::style::Color;

    use crate::config::{GridSize, Rules, THEME_CLASSIC};
    use crate::game::GameState;
    use crate::input::Direction;
    use crate::snake::{Cell, Snake};

    use super::{board_rect, cell_to_terminal, render};

    const BOARD: GridSize = GridSize {
        width: 32,
        height: 24,
    };

    fn draw(state: &GameState, width: u16, height: u16) -> Buffer {
        let mut terminal =
            Terminal::new(TestBackend::new(width, height)).expect("test terminal should build");
        terminal
            .draw(|frame| render(frame, state, &THEME_CLASSIC))
            .expect("test draw should succeed");
        terminal.backend().buffer().clone()
    }

    fn text(buffer: &Buffer) -> String {
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn count_fg(buffer: &Buffer, color: Color) -> usize {
        buffer
            .content()
            .iter()
            .filter(|cell| cell.fg == color && cell.symbol() == "█")
            .count()
    }

    #[test]
    fn board_fits_default_grid_with_border() {
        let board = board_rect(Rect::new(0, 1, 80, 29), BOARD);

        assert_eq!(board, Rect::new(7, 1, 66, 26));
    }

    #[test]
    fn cells_map_to_double_width_columns() {
        let inner = Rect::new(1, 2, 64, 24);

        assert_eq!(cell_to_terminal(inner, BOARD, Cell::new(0, 0)), Some((1, 2)));
        assert_eq!(
            cell_to_terminal(inner, BOARD, Cell::new(31, 23)),
            Some((63, 25))
        );
        assert_eq!(cell_to_terminal(inner, BOARD, Cell::new(32, 0)), None);
    }

    #[test]
    fn clipped_cells_are_skipped() {
        let inner = Rect::new(0, 0, 10, 4);

        assert_eq!(cell_to_terminal(inner, BOARD, Cell::new(4, 3)), Some((8, 3)));
        assert_eq!(cell_to_terminal(inner, BOARD, Cell::new(5, 0)), None);
        assert_eq!(cell_to_terminal(inner, BOARD, Cell::new(0, 4)), None);
    }

    #[test]
    fn playing_frame_shows_hud_and_entities() {
        let mut state = GameState::new_with_seed(Rules::default(), 5).expect("valid rules");
        state.snake = Snake::from_segments(
            vec![Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)],
            Direction::Right,
        );
        state.apple = Cell::new(20, 20);
        state.stones = vec![Cell::new(1, 1), Cell::new(2, 2)];
        state.gold_apples = vec![Cell::new(30, 3)];

        let buffer = draw(&state, 80, 30);

        assert!(text(&buffer).contains("Score: 0"));
        assert!(!text(&buffer).contains("GAME OVER"));
        assert_eq!(count_fg(&buffer, THEME_CLASSIC.apple), 2);
        assert_eq!(count_fg(&buffer, THEME_CLASSIC.snake), 6);
        assert_eq!(count_fg(&buffer, THEME_CLASSIC.stone), 4);
        assert_eq!(count_fg(&buffer, THEME_CLASSIC.gold_apple), 2);
    }

    #[test]
    fn game_over_frame_shows_dialog() {
        let mut state = GameState::new_with_seed(Rules::default(), 6).expect("valid rules");
        state.snake = Snake::new(Cell::new(5, 5), Direction::Right);
        state.stones = vec![Cell::new(6, 5)];
        state.apple = Cell::new(20, 20);
        state.advance_tick();

        let rendered = text(&draw(&state, 80, 30));

        assert!(rendered.contains("GAME OVER"));
        assert!(rendered.contains("You hit a stone"));
        assert!(rendered.contains("Restart"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let state = GameState::new_with_seed(Rules::default(), 7).expect("valid rules");

        let _ = draw(&state, 12, 5);
    }
}
