use std::collections::{BTreeSet, VecDeque};
use tracing::{debug, info, instrument, warn};

use crate::algorithm::find_path;
use crate::common::{Cell, Move, Position, Sense, CELL_DOMAIN, DIRECTIONS, ORIGIN};
use crate::engine::{EngineError, Likelihood, LogicEngine};
use crate::stat::Stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Idle,
    Planning,
    Executing,
    Won,
    Lost,
}

/// Result of one agent step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Act(Move),
    /// Every cell left is known to be deadly or unreachable.
    NoViablePlan,
}

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("the game is already over ({0:?})")]
    Finished(AgentState),
}

/// Autonomous wumpus hunter: folds each percept into the logic engine and
/// replays a planned route one move per step.
#[derive(Debug, Clone)]
pub struct RobotAgent {
    width: usize,
    height: usize,
    position: Position,
    has_arrow: bool,
    visited: BTreeSet<Position>,
    path: VecDeque<Move>,
    logic: LogicEngine<Position, Cell>,
    state: AgentState,
}

impl RobotAgent {
    pub fn new(width: usize, height: usize) -> Self {
        RobotAgent {
            width,
            height,
            position: ORIGIN,
            has_arrow: true,
            visited: BTreeSet::new(),
            path: VecDeque::new(),
            logic: LogicEngine::new(&CELL_DOMAIN),
            state: AgentState::Idle,
        }
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn has_arrow(&self) -> bool {
        self.has_arrow
    }

    pub fn logic(&self) -> &LogicEngine<Position, Cell> {
        &self.logic
    }

    /// Queued moves not yet emitted.
    pub fn path(&self) -> impl Iterator<Item = &Move> {
        self.path.iter()
    }

    pub fn most_likely(&self, pos: Position) -> Likelihood<Cell> {
        self.logic.most_likely(&pos)
    }

    pub fn is_valid_cell(&self, (x, y): Position) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Processes the percept received at `position` and picks the next move.
    #[instrument(skip_all, name = "agent_step", fields(position = format!("{position:?}")), level = "debug")]
    pub fn step(
        &mut self,
        position: Position,
        sense: &Sense,
        stats: &mut Stats,
    ) -> Result<Step, AgentError> {
        if matches!(self.state, AgentState::Won | AgentState::Lost) {
            return Err(AgentError::Finished(self.state));
        }
        self.position = position;
        self.update_info(sense, stats)?;

        if self.path.is_empty() {
            self.state = AgentState::Planning;
            stats.plans += 1;
            if !self.choose_target(sense, stats) {
                warn!("no viable plan from {position:?}");
                return Ok(Step::NoViablePlan);
            }
        }

        self.state = AgentState::Executing;
        match self.choose_move()? {
            Some(the_move) => Ok(Step::Act(the_move)),
            None => Ok(Step::NoViablePlan),
        }
    }

    /// Moves the state machine to its terminal state once the world says so.
    pub fn conclude(&mut self, won: bool) {
        self.state = if won { AgentState::Won } else { AgentState::Lost };
        self.path.clear();
        info!("agent finished: {:?}", self.state);
    }

    fn update_info(&mut self, sense: &Sense, stats: &mut Stats) -> Result<(), AgentError> {
        let here = self.position;
        if sense.just_found_gold {
            self.logic.update_known(&here, Cell::Empty)?;
            self.path.clear();
        }
        if sense.just_killed_wumpus {
            debug!("wumpus is dead");
        }

        self.visited.insert(here);
        self.logic.constrain_all_of(&[here], Cell::Empty)?;

        let neighbors: Vec<Position> = DIRECTIONS
            .iter()
            .map(|direction| direction.apply(here))
            .filter(|&pos| self.is_valid_cell(pos))
            .collect();

        if sense.stench {
            self.logic.constrain_exactly_one_of(&neighbors, Cell::Wumpus)?;
        } else {
            self.logic.constrain_none_of(&neighbors, Cell::Wumpus)?;
        }
        if sense.glitter {
            self.logic.constrain_exactly_one_of(&neighbors, Cell::Gold)?;
        } else {
            self.logic.constrain_none_of(&neighbors, Cell::Gold)?;
        }
        if sense.breeze {
            self.logic.constrain_at_least_one_of(&neighbors, Cell::Pit)?;
        } else {
            self.logic.constrain_none_of(&neighbors, Cell::Pit)?;
        }
        self.logic.constrain_at_most_one_of(Cell::Gold)?;
        self.logic.constrain_at_most_one_of(Cell::Wumpus)?;

        let deduced = self.logic.deduce();
        stats.deductions += deduced;
        debug!(
            "{deduced} deduced, {} pending, {} configurations",
            self.logic.pending().len(),
            self.logic.num_configurations()
        );
        Ok(())
    }

    /// Fills `path` with the first reachable target among: home after picking up
    /// the gold, known gold, known wumpus (while the arrow lasts), an unvisited
    /// safe cell, and finally the pending cell most likely to be harmless.
    /// False if none is reachable.
    fn choose_target(&mut self, sense: &Sense, stats: &mut Stats) -> bool {
        self.path.clear();

        if sense.just_found_gold && self.find_path_to(ORIGIN, stats) {
            debug!("heading home");
            return true;
        }

        if let Some(gold) = self.logic.find_by_value(Cell::Gold) {
            if self.find_path_to(gold, stats) {
                debug!("heading to gold at {gold:?}");
                return true;
            }
        }

        if self.has_arrow {
            if let Some(wumpus) = self.logic.find_by_value(Cell::Wumpus) {
                if self.find_path_to(wumpus, stats) {
                    debug!("hunting wumpus at {wumpus:?}");
                    if let Some(last) = self.path.pop_back() {
                        self.path.push_back(Move::Shoot(last.direction()));
                        self.path.push_back(last);
                    }
                    return true;
                }
            }
        }

        let visited = &self.visited;
        let logic = &self.logic;
        let is_safe = |pos: Position| logic.is_certain(&pos, Cell::Empty);
        let is_new_safe = |pos: Position| !visited.contains(&pos) && is_safe(pos);
        if let Some(route) = find_path(self.position, &is_safe, is_new_safe, stats) {
            self.path = route.into();
            return true;
        }

        if let Some(risk) = self.logic.highest_expected(&[Cell::Gold, Cell::Empty]) {
            debug!(
                "taking a risk on {risk:?} ({:.0}% empty)",
                self.logic.probability(&risk, Cell::Empty) * 100.0
            );
            return self.find_path_to(risk, stats);
        }

        false
    }

    fn find_path_to(&mut self, target: Position, stats: &mut Stats) -> bool {
        let logic = &self.logic;
        let is_safe = |pos: Position| logic.is_certain(&pos, Cell::Empty);
        match find_path(self.position, is_safe, |pos| pos == target, stats) {
            Some(route) => {
                self.path = route.into();
                true
            }
            None => false,
        }
    }

    /// Pops the next queued move. A shot clears the target cell in the model.
    fn choose_move(&mut self) -> Result<Option<Move>, AgentError> {
        let Some(the_move) = self.path.pop_front() else {
            return Ok(None);
        };
        if let Move::Shoot(direction) = the_move {
            let target = direction.apply(self.position);
            self.logic.update_known(&target, Cell::Empty)?;
            self.has_arrow = false;
        }
        debug!("move: {the_move}");
        Ok(Some(the_move))
    }
}
