mod tree;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use tracing::{debug, trace};

use tree::ConfigTree;

/// Fatal misuse of the engine. After `UnsatisfiableConstraint` the engine has no
/// model left and further answers are meaningless.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("value {value} is not part of the engine domain")]
    InvalidValue { value: String },

    #[error("unsatisfiable constraint: {reason}")]
    UnsatisfiableConstraint { reason: String },
}

/// Answer of [`LogicEngine::most_likely`]: every value tied for the highest
/// probability, in domain order.
#[derive(Debug, Clone, PartialEq)]
pub struct Likelihood<S> {
    pub values: Vec<S>,
    pub probability: f64,
}

/// Incremental reasoning over the hidden value of each location.
///
/// Locations are either *known* (value certain) or *pending* (one level of the
/// configuration tree). Constraints prune the tree; [`LogicEngine::deduce`]
/// promotes pending locations on which every configuration agrees.
///
/// The engine is a plain single-owner value: it has no interior locking and
/// must not be mutated from several callers concurrently.
#[derive(Debug, Clone)]
pub struct LogicEngine<K, S> {
    domain: Vec<S>,
    known: BTreeMap<K, S>,
    tree: ConfigTree<K, S>,
}

impl<K, S> LogicEngine<K, S>
where
    K: Ord + Clone + Debug,
    S: Copy + PartialEq + Debug,
{
    pub fn new(domain: &[S]) -> Self {
        assert!(!domain.is_empty(), "engine domain must not be empty");
        let mut values: Vec<S> = Vec::with_capacity(domain.len());
        for &value in domain {
            if !values.contains(&value) {
                values.push(value);
            }
        }
        LogicEngine {
            domain: values,
            known: BTreeMap::new(),
            tree: ConfigTree::new(),
        }
    }

    pub fn domain(&self) -> &[S] {
        &self.domain
    }

    /// Starts tracking `key`. No-op when it is already known or pending.
    pub fn add(&mut self, key: &K) {
        if self.contains(key) {
            return;
        }
        self.tree.add_level(key.clone(), &self.domain);
        trace!("add {key:?}, {} configurations", self.tree.total());
    }

    pub fn contains(&self, key: &K) -> bool {
        self.is_known(key) || self.is_pending(key)
    }

    pub fn is_known(&self, key: &K) -> bool {
        self.known.contains_key(key)
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.tree.is_pending(key)
    }

    pub fn known_value(&self, key: &K) -> Option<S> {
        self.known.get(key).copied()
    }

    /// Pending locations in the order they were added.
    pub fn pending(&self) -> &[K] {
        self.tree.pending()
    }

    pub fn known(&self) -> impl Iterator<Item = (&K, &S)> {
        self.known.iter()
    }

    /// Number of configurations of the pending locations still possible.
    pub fn num_configurations(&self) -> usize {
        self.tree.total()
    }

    /// Records `key = value` as a fact. Not checked against earlier pruning:
    /// only assert facts that hold regardless of it.
    pub fn assert_known(&mut self, key: &K, value: S) -> Result<(), EngineError> {
        self.check_value(value)?;
        match self.known.get(key) {
            Some(&current) if current == value => return Ok(()),
            Some(&current) => {
                return Err(unsatisfiable(format!(
                    "{key:?} is known to be {current:?}, cannot also be {value:?}"
                )))
            }
            None => {}
        }
        self.tree.remove_level(key);
        self.known.insert(key.clone(), value);
        debug!("assert {key:?} = {value:?}");
        Ok(())
    }

    /// Records that the world itself changed at `key` (for instance an item was
    /// removed). Unlike [`LogicEngine::assert_known`] this replaces a previous fact.
    pub fn update_known(&mut self, key: &K, value: S) -> Result<(), EngineError> {
        self.check_value(value)?;
        self.tree.remove_level(key);
        if let Some(previous) = self.known.insert(key.clone(), value) {
            debug!("update {key:?}: {previous:?} -> {value:?}");
        }
        Ok(())
    }

    /// Every listed location holds `value`.
    pub fn constrain_all_of(&mut self, keys: &[K], value: S) -> Result<(), EngineError> {
        self.check_value(value)?;
        let (knowns, pending) = self.separate_knowns(keys);
        for (key, known) in knowns {
            if known != value {
                return Err(unsatisfiable(format!(
                    "all of {keys:?} must be {value:?} but {key:?} is {known:?}"
                )));
            }
        }
        for key in &pending {
            self.tree.prune_level(key, |candidate| candidate != value);
        }
        self.ensure_model(|| format!("all of {keys:?} = {value:?}"))
    }

    /// No listed location holds `value`.
    pub fn constrain_none_of(&mut self, keys: &[K], value: S) -> Result<(), EngineError> {
        self.check_value(value)?;
        let (knowns, pending) = self.separate_knowns(keys);
        if let Some((key, _)) = knowns.iter().find(|(_, known)| *known == value) {
            return Err(unsatisfiable(format!(
                "none of {keys:?} may be {value:?} but {key:?} is"
            )));
        }
        self.prune_none_of(&pending, value);
        self.ensure_model(|| format!("none of {keys:?} = {value:?}"))
    }

    /// Exactly one listed location holds `value`.
    pub fn constrain_exactly_one_of(&mut self, keys: &[K], value: S) -> Result<(), EngineError> {
        self.check_value(value)?;
        let (knowns, pending) = self.separate_knowns(keys);
        let hits = knowns.iter().filter(|(_, known)| *known == value).count();
        let context = || format!("exactly one of {keys:?} = {value:?}");

        match hits {
            0 => self.prune_count(&pending, value, 1, 1, context),
            1 => {
                self.prune_none_of(&pending, value);
                self.ensure_model(context)
            }
            _ => Err(unsatisfiable(format!("{} ({hits} known)", context()))),
        }
    }

    /// At least one listed location holds `value`.
    pub fn constrain_at_least_one_of(&mut self, keys: &[K], value: S) -> Result<(), EngineError> {
        self.check_value(value)?;
        let (knowns, pending) = self.separate_knowns(keys);
        if knowns.iter().any(|(_, known)| *known == value) {
            return Ok(());
        }
        self.prune_count(&pending, value, 1, usize::MAX, || {
            format!("at least one of {keys:?} = {value:?}")
        })
    }

    /// Exactly one location, among everything known or pending, holds `value`.
    pub fn constrain_one_of(&mut self, value: S) -> Result<(), EngineError> {
        self.constrain_overall(value, 1, || format!("exactly one {value:?} overall"))
    }

    /// At most one location, among everything known or pending, holds `value`.
    pub fn constrain_at_most_one_of(&mut self, value: S) -> Result<(), EngineError> {
        self.constrain_overall(value, 0, || format!("at most one {value:?} overall"))
    }

    /// Promotes every pending location whose level agrees on a single value,
    /// repeating until nothing changes. Returns the number of promotions.
    pub fn deduce(&mut self) -> usize {
        let mut promoted = 0;
        loop {
            let uniform: Vec<(K, S)> = self
                .tree
                .pending()
                .iter()
                .filter_map(|key| self.tree.uniform_value(key).map(|value| (key.clone(), value)))
                .collect();
            if uniform.is_empty() {
                break;
            }
            for (key, value) in uniform {
                self.tree.remove_level(&key);
                debug!("deduce {key:?} = {value:?}");
                self.known.insert(key, value);
                promoted += 1;
            }
        }
        promoted
    }

    /// A known location holding `value`; the smallest one when several match.
    pub fn find_by_value(&self, value: S) -> Option<K> {
        self.known
            .iter()
            .find(|(_, known)| **known == value)
            .map(|(key, _)| key.clone())
    }

    /// True only for a known fact. Pending locations answer false even when all
    /// configurations agree; run [`LogicEngine::deduce`] first.
    pub fn is_certain(&self, key: &K, value: S) -> bool {
        self.known.get(key) == Some(&value)
    }

    /// Probability of `key = value` over the remaining configurations.
    pub fn probability(&self, key: &K, value: S) -> f64 {
        if let Some(&known) = self.known.get(key) {
            return if known == value { 1.0 } else { 0.0 };
        }
        if !self.tree.is_pending(key) {
            return if self.domain.contains(&value) {
                1.0 / self.domain.len() as f64
            } else {
                0.0
            };
        }
        match self.tree.total() {
            0 => 0.0,
            total => self.tree.count(key, value) as f64 / total as f64,
        }
    }

    pub fn most_likely(&self, key: &K) -> Likelihood<S> {
        if let Some(&known) = self.known.get(key) {
            return Likelihood {
                values: vec![known],
                probability: 1.0,
            };
        }
        if !self.tree.is_pending(key) {
            return Likelihood {
                values: self.domain.clone(),
                probability: 1.0 / self.domain.len() as f64,
            };
        }

        let counts: Vec<(S, usize)> = self
            .domain
            .iter()
            .map(|&value| (value, self.tree.count(key, value)))
            .collect();
        let best = counts.iter().map(|&(_, count)| count).max().unwrap_or(0);
        Likelihood {
            values: counts
                .iter()
                .filter(|&&(_, count)| count == best)
                .map(|&(value, _)| value)
                .collect(),
            probability: best as f64 / self.tree.total().max(1) as f64,
        }
    }

    /// Pending location with the most configurations assigning it one of
    /// `values`. Ties go to the location added first.
    pub fn highest_expected(&self, values: &[S]) -> Option<K> {
        let mut best: Option<(&K, usize)> = None;
        for key in self.tree.pending() {
            let count: usize = values.iter().map(|&value| self.tree.count(key, value)).sum();
            if count > best.map_or(0, |(_, best_count)| best_count) {
                best = Some((key, count));
            }
        }
        best.map(|(key, _)| key.clone())
    }

    fn check_value(&self, value: S) -> Result<(), EngineError> {
        if self.domain.contains(&value) {
            Ok(())
        } else {
            Err(EngineError::InvalidValue {
                value: format!("{value:?}"),
            })
        }
    }

    /// Adds unseen keys and splits the (deduplicated) list into known facts and
    /// pending locations.
    fn separate_knowns(&mut self, keys: &[K]) -> (Vec<(K, S)>, BTreeSet<K>) {
        let mut knowns = Vec::new();
        let mut pending = BTreeSet::new();
        for key in keys {
            self.add(key);
            match self.known.get(key) {
                Some(&value) => {
                    if !knowns.iter().any(|(known, _)| known == key) {
                        knowns.push((key.clone(), value));
                    }
                }
                None => {
                    pending.insert(key.clone());
                }
            }
        }
        (knowns, pending)
    }

    fn prune_none_of<'a>(&mut self, keys: impl IntoIterator<Item = &'a K>, value: S)
    where
        K: 'a,
    {
        for key in keys {
            self.tree.prune_level(key, |candidate| candidate == value);
        }
    }

    fn prune_count(
        &mut self,
        keys: &BTreeSet<K>,
        value: S,
        min: usize,
        max: usize,
        context: impl Fn() -> String,
    ) -> Result<(), EngineError> {
        if keys.is_empty() && min > 0 {
            return Err(unsatisfiable(format!("{}: no candidate location", context())));
        }
        if !self.tree.prune_paths(|key| keys.contains(key), value, min, max) {
            return Err(unsatisfiable(context()));
        }
        self.ensure_model(context)
    }

    fn constrain_overall(
        &mut self,
        value: S,
        min: usize,
        context: impl Fn() -> String,
    ) -> Result<(), EngineError> {
        self.check_value(value)?;
        let hits = self.known.values().filter(|&&known| known == value).count();
        match hits {
            0 => {
                if min > 0 && self.tree.pending().is_empty() {
                    return Err(unsatisfiable(format!("{}: no candidate location", context())));
                }
                if !self.tree.prune_paths(|_| true, value, min, 1) {
                    return Err(unsatisfiable(context()));
                }
                self.ensure_model(context)
            }
            1 => {
                let pending = self.tree.pending().to_vec();
                self.prune_none_of(&pending, value);
                self.ensure_model(context)
            }
            _ => Err(unsatisfiable(format!("{} ({hits} known)", context()))),
        }
    }

    fn ensure_model(&self, context: impl Fn() -> String) -> Result<(), EngineError> {
        if self.tree.is_exhausted() {
            return Err(unsatisfiable(context()));
        }
        trace!("{}: {} configurations", context(), self.tree.total());
        Ok(())
    }
}

fn unsatisfiable(reason: String) -> EngineError {
    EngineError::UnsatisfiableConstraint { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Cell, Position, CELL_DOMAIN};
    use tracing_subscriber;

    // Helper function to setup tracing
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("trace")
            .try_init();
    }

    fn engine_with(keys: &[Position]) -> LogicEngine<Position, Cell> {
        let mut logic = LogicEngine::new(&CELL_DOMAIN);
        for key in keys {
            logic.add(key);
        }
        logic
    }

    // Every assignment of the domain to `keys`, filtered by `keep`.
    fn brute_force(
        keys: &[Position],
        keep: impl Fn(&BTreeMap<Position, Cell>) -> bool,
    ) -> BTreeSet<Vec<(Position, Cell)>> {
        let mut all = vec![BTreeMap::new()];
        for &key in keys {
            all = all
                .into_iter()
                .flat_map(|partial: BTreeMap<Position, Cell>| {
                    CELL_DOMAIN.into_iter().map(move |value| {
                        let mut next = partial.clone();
                        next.insert(key, value);
                        next
                    })
                })
                .collect();
        }
        all.into_iter()
            .filter(|assignment| keep(assignment))
            .map(|assignment| assignment.into_iter().collect())
            .collect()
    }

    fn surviving(logic: &LogicEngine<Position, Cell>) -> BTreeSet<Vec<(Position, Cell)>> {
        logic
            .tree
            .configurations()
            .into_iter()
            .map(|mut assignment| {
                assignment.sort();
                assignment
            })
            .collect()
    }

    fn assert_disjoint(logic: &LogicEngine<Position, Cell>) {
        for key in logic.pending() {
            assert!(!logic.is_known(key), "{key:?} both known and pending");
        }
    }

    const A: Position = (0, 0);
    const B: Position = (0, 1);
    const C: Position = (1, 0);

    #[test]
    fn test_add_is_idempotent() {
        init_tracing();
        let mut logic = engine_with(&[A]);
        logic.add(&A);
        assert_eq!(logic.num_configurations(), 4);
        assert_eq!(logic.pending(), &[A]);

        logic.assert_known(&B, Cell::Empty).unwrap();
        logic.add(&B);
        assert_eq!(logic.pending(), &[A]);
        assert_eq!(logic.num_configurations(), 4);
        logic.tree.check_invariants();
    }

    #[test]
    fn test_constraints_match_brute_force() {
        init_tracing();
        let keys = [A, B, C];
        let mut logic = engine_with(&keys);

        logic.constrain_exactly_one_of(&[A, B], Cell::Pit).unwrap();
        logic.tree.check_invariants();
        logic.constrain_at_least_one_of(&[B, C], Cell::Gold).unwrap();
        logic.tree.check_invariants();
        logic.constrain_none_of(&[C], Cell::Wumpus).unwrap();
        logic.tree.check_invariants();

        let expected = brute_force(&keys, |assignment| {
            let pits = [A, B].iter().filter(|&&k| assignment[&k] == Cell::Pit).count();
            let gold = [B, C].iter().any(|k| assignment[k] == Cell::Gold);
            pits == 1 && gold && assignment[&C] != Cell::Wumpus
        });
        assert_eq!(logic.num_configurations(), expected.len());
        assert_eq!(surviving(&logic), expected);
    }

    #[test]
    fn test_all_of_prunes_other_values() {
        init_tracing();
        let mut logic = engine_with(&[A, B]);
        logic.constrain_all_of(&[A], Cell::Empty).unwrap();
        logic.tree.check_invariants();
        assert_eq!(logic.num_configurations(), 4);
        assert!(!logic.is_certain(&A, Cell::Empty));

        assert_eq!(logic.deduce(), 1);
        assert!(logic.is_certain(&A, Cell::Empty));
        assert_eq!(logic.deduce(), 0);
        assert_disjoint(&logic);
        logic.tree.check_invariants();
    }

    #[test]
    fn test_exactly_one_overall_is_sound() {
        init_tracing();
        let keys = [A, B, C];
        let mut logic = engine_with(&keys);
        logic.constrain_one_of(Cell::Wumpus).unwrap();
        logic.constrain_one_of(Cell::Gold).unwrap();
        logic.tree.check_invariants();

        // Wumpus in 3 places, gold in the remaining 2, last cell empty or pit.
        assert_eq!(logic.num_configurations(), 12);
        for configuration in surviving(&logic) {
            let count = |value: Cell| configuration.iter().filter(|(_, v)| *v == value).count();
            assert_eq!(count(Cell::Wumpus), 1);
            assert_eq!(count(Cell::Gold), 1);
        }
    }

    #[test]
    fn test_one_of_counts_known_facts() {
        init_tracing();
        let mut logic = engine_with(&[A, B]);
        logic.assert_known(&C, Cell::Gold).unwrap();
        logic.constrain_one_of(Cell::Gold).unwrap();
        assert_eq!(logic.num_configurations(), 9);
        assert_eq!(logic.probability(&A, Cell::Gold), 0.0);

        let mut logic = engine_with(&[A]);
        logic.assert_known(&B, Cell::Gold).unwrap();
        logic.assert_known(&C, Cell::Gold).unwrap();
        assert!(matches!(
            logic.constrain_one_of(Cell::Gold),
            Err(EngineError::UnsatisfiableConstraint { .. })
        ));
    }

    #[test]
    fn test_at_most_one_overall() {
        init_tracing();
        let mut logic = engine_with(&[A, B]);
        logic.constrain_at_most_one_of(Cell::Gold).unwrap();
        logic.tree.check_invariants();
        assert_eq!(logic.num_configurations(), 15);

        // Nothing pending: at most one is trivially true, exactly one is not.
        let mut logic: LogicEngine<Position, Cell> = LogicEngine::new(&CELL_DOMAIN);
        logic.constrain_at_most_one_of(Cell::Gold).unwrap();
        assert!(logic.constrain_one_of(Cell::Gold).is_err());
    }

    #[test]
    fn test_exactly_one_of_with_known_match() {
        init_tracing();
        let mut logic = engine_with(&[B]);
        logic.assert_known(&A, Cell::Wumpus).unwrap();
        logic.constrain_exactly_one_of(&[A, B], Cell::Wumpus).unwrap();
        assert_eq!(logic.num_configurations(), 3);
        assert_eq!(logic.probability(&B, Cell::Wumpus), 0.0);
        logic.tree.check_invariants();
    }

    #[test]
    fn test_constraints_add_unseen_locations() {
        init_tracing();
        let mut logic: LogicEngine<Position, Cell> = LogicEngine::new(&CELL_DOMAIN);
        logic.constrain_none_of(&[A, B], Cell::Pit).unwrap();
        assert_eq!(logic.pending(), &[A, B]);
        assert_eq!(logic.num_configurations(), 9);
    }

    #[test]
    fn test_pit_scenario() {
        init_tracing();
        let mut logic = engine_with(&[A, B, C]);
        logic.assert_known(&A, Cell::Empty).unwrap();
        logic.constrain_at_least_one_of(&[B, C], Cell::Pit).unwrap();
        logic.constrain_none_of(&[B, C], Cell::Wumpus).unwrap();
        logic.deduce();
        logic.tree.check_invariants();

        // (P,E) (P,P) (P,G) (E,P) (G,P)
        assert_eq!(logic.num_configurations(), 5);
        let b = logic.most_likely(&B);
        let c = logic.most_likely(&C);
        assert_eq!(b, c);
        assert_eq!(b.values, vec![Cell::Pit]);
        assert!((b.probability - 0.6).abs() < 1e-9);
        for key in [B, C] {
            assert!(!logic.is_certain(&key, Cell::Pit));
            assert_eq!(logic.probability(&key, Cell::Wumpus), 0.0);
            assert!(logic.probability(&key, Cell::Empty) > 0.0);
            assert!(logic.probability(&key, Cell::Gold) > 0.0);
        }

        logic.constrain_none_of(&[C], Cell::Pit).unwrap();
        logic.deduce();
        assert!(logic.is_certain(&B, Cell::Pit));
        assert!(!logic.is_certain(&C, Cell::Pit));
        assert_disjoint(&logic);
    }

    #[test]
    fn test_contradicting_known_fact() {
        init_tracing();
        let mut logic: LogicEngine<Position, Cell> = LogicEngine::new(&CELL_DOMAIN);
        logic.assert_known(&A, Cell::Empty).unwrap();
        logic.assert_known(&A, Cell::Empty).unwrap();
        assert!(matches!(
            logic.assert_known(&A, Cell::Pit),
            Err(EngineError::UnsatisfiableConstraint { .. })
        ));

        logic.update_known(&A, Cell::Pit).unwrap();
        assert!(logic.is_certain(&A, Cell::Pit));
    }

    #[test]
    fn test_invalid_value() {
        init_tracing();
        let mut logic = engine_with(&[A]);
        assert!(matches!(
            logic.assert_known(&A, Cell::Wall),
            Err(EngineError::InvalidValue { .. })
        ));
        assert!(matches!(
            logic.constrain_none_of(&[A], Cell::Wall),
            Err(EngineError::InvalidValue { .. })
        ));
        assert_eq!(logic.num_configurations(), 4);
    }

    #[test]
    fn test_unsatisfiable_pruning() {
        init_tracing();
        let mut logic = engine_with(&[A, B]);
        logic.constrain_all_of(&[A], Cell::Pit).unwrap();
        assert!(matches!(
            logic.constrain_none_of(&[A], Cell::Pit),
            Err(EngineError::UnsatisfiableConstraint { .. })
        ));

        let mut logic = engine_with(&[A]);
        logic.assert_known(&B, Cell::Empty).unwrap();
        assert!(logic.constrain_all_of(&[B], Cell::Pit).is_err());
        assert!(logic.constrain_at_least_one_of(&[B], Cell::Pit).is_err());
    }

    #[test]
    fn test_assert_known_merges_configurations() {
        init_tracing();
        let mut logic = engine_with(&[A, B]);
        logic.constrain_exactly_one_of(&[A, B], Cell::Gold).unwrap();
        assert_eq!(logic.num_configurations(), 6);

        // Forgetting A keeps every value B could still take.
        logic.assert_known(&A, Cell::Empty).unwrap();
        logic.tree.check_invariants();
        assert_disjoint(&logic);
        assert_eq!(logic.num_configurations(), 4);
        assert_eq!(logic.most_likely(&B).values, CELL_DOMAIN.to_vec());
    }

    #[test]
    fn test_most_likely_known_and_unseen() {
        init_tracing();
        let mut logic: LogicEngine<Position, Cell> = LogicEngine::new(&CELL_DOMAIN);
        let unseen = logic.most_likely(&A);
        assert_eq!(unseen.values, CELL_DOMAIN.to_vec());
        assert!((unseen.probability - 0.25).abs() < 1e-9);

        logic.assert_known(&A, Cell::Gold).unwrap();
        let known = logic.most_likely(&A);
        assert_eq!(known.values, vec![Cell::Gold]);
        assert_eq!(known.probability, 1.0);
        assert_eq!(logic.find_by_value(Cell::Gold), Some(A));
        assert_eq!(logic.find_by_value(Cell::Pit), None);
    }

    #[test]
    fn test_highest_expected() {
        init_tracing();
        let mut logic = engine_with(&[A, B]);
        // Ties go to the first location added.
        assert_eq!(logic.highest_expected(&[Cell::Pit]), Some(A));

        logic.constrain_none_of(&[A], Cell::Empty).unwrap();
        // A: gold in 1 of its 3 values; B: gold or empty in 2 of 4.
        assert_eq!(logic.highest_expected(&[Cell::Gold, Cell::Empty]), Some(B));

        logic.constrain_all_of(&[A, B], Cell::Pit).unwrap();
        assert_eq!(logic.highest_expected(&[Cell::Gold, Cell::Empty]), None);
        logic.deduce();
        assert_eq!(logic.highest_expected(&[Cell::Pit]), None);
    }

    #[test]
    fn test_deduce_reaches_fixed_point() {
        init_tracing();
        let mut logic = engine_with(&[A, B, C]);
        logic.constrain_none_of(&[A, B, C], Cell::Wumpus).unwrap();
        logic.constrain_none_of(&[A, B], Cell::Gold).unwrap();
        logic.constrain_none_of(&[A], Cell::Pit).unwrap();
        logic.constrain_exactly_one_of(&[B, C], Cell::Pit).unwrap();
        logic.constrain_all_of(&[B], Cell::Empty).unwrap();

        assert_eq!(logic.deduce(), 3);
        assert!(logic.is_certain(&A, Cell::Empty));
        assert!(logic.is_certain(&B, Cell::Empty));
        assert!(logic.is_certain(&C, Cell::Pit));
        assert_eq!(logic.num_configurations(), 1);
        assert_eq!(logic.deduce(), 0);
        assert_disjoint(&logic);
        logic.tree.check_invariants();
    }
}
