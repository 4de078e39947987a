//! Mirror grid representation.
//!
//! A grid is a list of text rows. Rows may have different lengths; any cell
//! past the end of its row, or outside the grid, counts as blank.

use std::fmt;
use std::ops::Add;

use serde::Serialize;

/// Mirror cell kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mirror {
    /// `+` passes rays straight through
    Cross,
    /// `/`
    Slash,
    /// `\`
    Backslash,
}

impl Mirror {
    pub fn from_char(c: char) -> Option<Mirror> {
        match c {
            '+' => Some(Mirror::Cross),
            '/' => Some(Mirror::Slash),
            '\\' => Some(Mirror::Backslash),
            _ => None,
        }
    }

    /// Reflection matrix, row-major
    pub fn matrix(self) -> [[i32; 2]; 2] {
        match self {
            Mirror::Cross => [[1, 0], [0, 1]],
            Mirror::Slash => [[0, -1], [-1, 0]],
            Mirror::Backslash => [[0, 1], [1, 0]],
        }
    }

    /// Outgoing direction for a ray arriving with `incoming`
    pub fn reflect(self, incoming: Direction) -> Direction {
        let [[a, b], [c, d]] = self.matrix();
        Direction::new(a * incoming.dx + b * incoming.dy, c * incoming.dx + d * incoming.dy)
    }
}

/// Direction vector (x grows right, y grows down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Direction {
    pub dx: i32,
    pub dy: i32,
}

impl Direction {
    pub const DOWN: Direction = Direction::new(0, 1);
    pub const UP: Direction = Direction::new(0, -1);
    pub const RIGHT: Direction = Direction::new(1, 0);
    pub const LEFT: Direction = Direction::new(-1, 0);

    /// The four cardinal directions in tracing order
    pub const CARDINAL: [Direction; 4] =
        [Direction::DOWN, Direction::UP, Direction::RIGHT, Direction::LEFT];

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.dx, self.dy)
    }
}

/// Cell coordinate (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Dot product with a direction
    pub fn along(self, direction: Direction) -> i64 {
        i64::from(self.x) * i64::from(direction.dx) + i64::from(self.y) * i64::from(direction.dy)
    }
}

impl Add<Direction> for Position {
    type Output = Position;

    fn add(self, direction: Direction) -> Position {
        Position::new(self.x + direction.dx, self.y + direction.dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Immutable mirror grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<char>>,
    width: usize,
}

impl Grid {
    /// Build a grid from text, one row per line, trailing whitespace removed.
    pub fn parse(text: &str) -> Grid {
        let rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.trim_end().chars().collect())
            .collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Grid { rows, width }
    }

    /// Length of the longest row
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of row `y`
    pub fn row_len(&self, y: usize) -> usize {
        self.rows.get(y).map_or(0, Vec::len)
    }

    /// `(width, height)` as a position, the far corner of the grid
    pub fn extent(&self) -> Position {
        Position::new(self.width as i32, self.rows.len() as i32)
    }

    /// Mirror at `position`, if the cell exists and holds one
    pub fn mirror_at(&self, position: Position) -> Option<Mirror> {
        if position.x < 0 || position.y < 0 {
            return None;
        }
        self.rows
            .get(position.y as usize)
            .and_then(|row| row.get(position.x as usize))
            .and_then(|&c| Mirror::from_char(c))
    }

    /// Advance a ray one cell.
    ///
    /// The cell at `position` reflects `direction` and the ray moves one
    /// cell along the reflected direction. Returns `None` when the cell holds
    /// no mirror.
    pub fn step(&self, position: Position, direction: Direction) -> Option<(Position, Direction)> {
        let outgoing = self.mirror_at(position)?.reflect(direction);
        Some((position + outgoing, outgoing))
    }
}
