use super::{construct_path, Trace};
use crate::common::{Move, Position, DIRECTIONS};
use crate::stat::Stats;

use std::collections::{HashSet, VecDeque};
use tracing::{debug, instrument, trace};

/// Breadth-first search from `start` through cells accepted by `is_passable`.
///
/// Neighbors are visited in [`DIRECTIONS`] order and tested against
/// `is_target` before passability, so the target itself may be impassable.
/// The start cell is never a target. Returns the walk to the first matching
/// neighbor, which is a shortest one.
#[instrument(skip_all, name = "bfs", fields(start = format!("{start:?}")), level = "debug")]
pub fn find_path(
    start: Position,
    is_passable: impl Fn(Position) -> bool,
    is_target: impl Fn(Position) -> bool,
    stats: &mut Stats,
) -> Option<Vec<Move>> {
    let mut open_list = VecDeque::from([start]);
    let mut closed_list = HashSet::from([start]);
    let mut trace = Trace::new();

    while let Some(current) = open_list.pop_front() {
        trace!("expand node: {current:?}");
        stats.search_expanded_nodes += 1;

        for direction in DIRECTIONS {
            let neighbor = direction.apply(current);
            if is_target(neighbor) {
                let mut path = construct_path(&trace, current);
                path.push(Move::Walk(direction));
                debug!("path to {neighbor:?}: {path:?}");
                return Some(path);
            }

            if closed_list.contains(&neighbor) || !is_passable(neighbor) {
                continue;
            }
            closed_list.insert(neighbor);
            trace.insert(neighbor, (current, direction));
            open_list.push_back(neighbor);
        }
    }

    debug!("cannot find path");
    None
}
