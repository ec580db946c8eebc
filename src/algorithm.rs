mod bfs;

pub use bfs::find_path;

use std::collections::HashMap;

use crate::common::{Direction, Move, Position};

// Maps a reached position to the position and direction it was entered from.
type Trace = HashMap<Position, (Position, Direction)>;

fn construct_path(trace: &Trace, mut current: Position) -> Vec<Move> {
    let mut path = Vec::new();
    while let Some(&(previous, direction)) = trace.get(&current) {
        path.push(Move::Walk(direction));
        current = previous;
    }
    path.reverse();
    path
}
