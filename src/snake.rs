use std::collections::VecDeque;

use crate::config::GridSize;
use crate::input::{direction_change_is_valid, Direction};

/// Board cell in logical (column, row) coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the cell lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns this cell wrapped into bounds on both axes.
    #[must_use]
    pub fn wrapped(self, bounds: GridSize) -> Self {
        Self {
            x: self.x.rem_euclid(i32::from(bounds.width)),
            y: self.y.rem_euclid(i32::from(bounds.height)),
        }
    }

    /// Returns the neighbouring cell one step in `direction`, wrapped onto the torus.
    #[must_use]
    pub fn step(self, direction: Direction, bounds: GridSize) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
        .wrapped(bounds)
    }

    /// Center cell of the board.
    #[must_use]
    pub fn center_of(bounds: GridSize) -> Self {
        Self {
            x: i32::from(bounds.width / 2),
            y: i32::from(bounds.height / 2),
        }
    }
}

/// Snake body, its target length and the buffered turn.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Cell>,
    length: usize,
    direction: Direction,
    next_direction: Option<Direction>,
}

impl Snake {
    /// Creates a one-cell snake at `start` heading in `direction`.
    #[must_use]
    pub fn new(start: Cell, direction: Direction) -> Self {
        Self::from_segments(vec![start], direction)
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// The target length equals the number of segments.
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Cell>, direction: Direction) -> Self {
        assert!(!segments.is_empty(), "a snake needs at least one segment");

        Self {
            length: segments.len(),
            body: VecDeque::from(segments),
            direction,
            next_direction: None,
        }
    }

    /// Buffers a turn for the next move. Reversals of the current heading are
    /// ignored and return `false`. Within one tick the last accepted turn wins.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.direction, direction) {
            return false;
        }

        self.next_direction = Some(direction);
        true
    }

    /// Raises the target length; the tail stops shrinking until the body catches up.
    pub fn grow(&mut self, segments: usize) {
        self.length += segments;
    }

    /// Applies the buffered turn and moves one cell.
    ///
    /// Returns the tail cell released by this move, or `None` while growing.
    pub fn advance(&mut self, bounds: GridSize) -> Option<Cell> {
        debug_assert!(bounds.width > 0 && bounds.height > 0);

        if let Some(next) = self.next_direction.take() {
            self.direction = next;
        }

        let next_head = self.head().step(self.direction, bounds);
        self.body.push_front(next_head);

        if self.body.len() > self.length {
            self.body.pop_back()
        } else {
            None
        }
    }

    /// Returns the current head cell.
    #[must_use]
    pub fn head(&self) -> Cell {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `cell`.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Returns true if the head sits on a segment at index `skip` or later.
    #[must_use]
    pub fn head_hits_body(&self, skip: usize) -> bool {
        let head = self.head();
        self.body.iter().skip(skip).any(|segment| *segment == head)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the length the body grows towards.
    #[must_use]
    pub fn target_length(&self) -> usize {
        self.length
    }

    /// Returns the current movement direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the turn that the next move will apply, if any.
    #[must_use]
    pub fn next_direction(&self) -> Option<Direction> {
        self.next_direction
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }
}
