use crate::snake::{Cell, Snake};

/// One drawable thing on the board, tagged by kind.
///
/// Renderers match on the variant instead of asking the entity to draw itself.
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Apple(Cell),
    Stone(Cell),
    GoldApple(Cell),
    Snake(&'a Snake),
}

impl Entity<'_> {
    /// Iterates over every cell the entity covers.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let (single, snake) = match self {
            Entity::Apple(cell) | Entity::Stone(cell) | Entity::GoldApple(cell) => {
                (Some(*cell), None)
            }
            Entity::Snake(snake) => (None, Some(snake.segments().copied())),
        };

        single.into_iter().chain(snake.into_iter().flatten())
    }
}
