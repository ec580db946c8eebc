use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, instrument};

use crate::agent::{RobotAgent, Step};
use crate::common::{Cell, Move, Position, Sense, ORIGIN};
use crate::map::Map;
use crate::render::render_board;
use crate::stat::Stats;

/// What a single move did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Continue,
    Won,
    Lost,
    OutOfSteps,
}

/// The true state of a game in progress.
#[derive(Debug, Clone)]
pub struct World {
    map: Map,
    position: Position,
    used_arrow: bool,
    found_gold: bool,
    just_found_gold: bool,
    just_killed_wumpus: bool,
}

impl World {
    pub fn new(map: Map) -> Self {
        World {
            map,
            position: ORIGIN,
            used_arrow: false,
            found_gold: false,
            just_found_gold: false,
            just_killed_wumpus: false,
        }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn found_gold(&self) -> bool {
        self.found_gold
    }

    pub fn sense(&self) -> Sense {
        Sense {
            glitter: self.map.find(self.position, Cell::Gold),
            breeze: self.map.find(self.position, Cell::Pit),
            stench: self.map.find(self.position, Cell::Wumpus),
            just_found_gold: self.just_found_gold,
            just_killed_wumpus: self.just_killed_wumpus,
        }
    }

    pub fn apply(&mut self, the_move: Move) -> Outcome {
        self.just_found_gold = false;
        self.just_killed_wumpus = false;

        match the_move {
            Move::Shoot(direction) => {
                if self.used_arrow {
                    info!("the arrow was already used");
                    return Outcome::Lost;
                }
                self.used_arrow = true;
                let target = direction.apply(self.position);
                if self.map.get(target) == Cell::Wumpus {
                    self.map.set(target, Cell::Empty);
                    self.just_killed_wumpus = true;
                    info!("killed the wumpus at {target:?}");
                } else {
                    info!("missed the shot at {target:?}");
                }
                Outcome::Continue
            }
            Move::Walk(direction) => {
                self.position = direction.apply(self.position);
                if self.found_gold && self.position == ORIGIN {
                    info!("back home with the gold");
                    return Outcome::Won;
                }
                match self.map.get(self.position) {
                    Cell::Empty => Outcome::Continue,
                    Cell::Gold => {
                        info!("found the gold at {:?}", self.position);
                        self.found_gold = true;
                        self.just_found_gold = true;
                        self.map.set(self.position, Cell::Empty);
                        Outcome::Continue
                    }
                    cell => {
                        info!("walked into {cell:?} at {:?}", self.position);
                        Outcome::Lost
                    }
                }
            }
        }
    }
}

/// Plays one robot agent against `map` for at most `max_steps` moves.
///
/// A step without a viable plan aborts the game with an error, as does any
/// inconsistency reported by the agent.
#[instrument(skip_all, name = "run_game", fields(width = map.width, height = map.height))]
pub fn run_game(
    map: Map,
    max_steps: usize,
    show_board: bool,
    stats: &mut Stats,
) -> anyhow::Result<Outcome> {
    let start_time = Instant::now();
    let mut world = World::new(map);
    let mut agent = RobotAgent::new(world.map().width, world.map().height);
    let mut outcome = Outcome::OutOfSteps;

    for move_num in 1..=max_steps {
        let sense = world.sense();
        debug!("sense: {sense:?}");
        let step = agent
            .step(world.position(), &sense, stats)
            .with_context(|| format!("agent failed at move {move_num}"))?;
        if show_board {
            println!("{}", render_board(world.map(), &agent, false));
        }

        let the_move = match step {
            Step::Act(the_move) => the_move,
            Step::NoViablePlan => {
                bail!("no viable plan at {:?} after {} moves", world.position(), stats.moves)
            }
        };
        info!("move {move_num}: {the_move}");
        stats.moves += 1;
        if the_move.is_shot() {
            stats.shots += 1;
        }

        match world.apply(the_move) {
            Outcome::Continue => {}
            end => {
                agent.conclude(end == Outcome::Won);
                outcome = end;
                break;
            }
        }
    }

    if show_board {
        println!("{}", render_board(world.map(), &agent, true));
    }
    stats.time_us = start_time.elapsed().as_micros() as usize;
    stats.outcome = Some(outcome);
    Ok(outcome)
}
