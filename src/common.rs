use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid coordinate `(x, y)`; `(0, 0)` is the bottom-left cell and `y` grows upward.
pub type Position = (i32, i32);

/// Where every game starts and where the gold has to be brought back.
pub const ORIGIN: Position = (0, 0);

/// Contents of a square in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Pit,
    Wumpus,
    Gold,
    Wall,
}

/// The values the robot reasons about; walls are never part of a configuration.
pub const CELL_DOMAIN: [Cell; 4] = [Cell::Empty, Cell::Pit, Cell::Wumpus, Cell::Gold];

impl Cell {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'E' => Some(Cell::Empty),
            'P' => Some(Cell::Pit),
            'W' => Some(Cell::Wumpus),
            'G' => Some(Cell::Gold),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => 'E',
            Cell::Pit => 'P',
            Cell::Wumpus => 'W',
            Cell::Gold => 'G',
            Cell::Wall => '#',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Cell::Empty => " ",
            Cell::Pit => "Pit",
            Cell::Wumpus => "Wumpus",
            Cell::Gold => "Gold",
            Cell::Wall => "Wall",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Right,
    Left,
}

/// Expansion order used by path search; shortest-path ties follow it.
pub const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Right,
    Direction::Left,
];

impl Direction {
    pub fn apply(self, (x, y): Position) -> Position {
        match self {
            Direction::Up => (x, y + 1),
            Direction::Down => (x, y - 1),
            Direction::Right => (x + 1, y),
            Direction::Left => (x - 1, y),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Right => "right",
            Direction::Left => "left",
        };
        f.write_str(name)
    }
}

/// One action per step. The arrow (`Shoot`) can be used once per game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Walk(Direction),
    Shoot(Direction),
}

impl Move {
    pub fn direction(self) -> Direction {
        match self {
            Move::Walk(direction) | Move::Shoot(direction) => direction,
        }
    }

    pub fn is_shot(self) -> bool {
        matches!(self, Move::Shoot(_))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Walk(direction) => write!(f, "walk {direction}"),
            Move::Shoot(direction) => write!(f, "shoot {direction}"),
        }
    }
}

/// What the robot perceives after each move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sense {
    /// Gold in a neighboring cell.
    pub glitter: bool,
    /// Pit in a neighboring cell.
    pub breeze: bool,
    /// Wumpus in a neighboring cell.
    pub stench: bool,
    pub just_found_gold: bool,
    pub just_killed_wumpus: bool,
}
