use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use tracing::trace;

pub(crate) type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
struct TreeNode<K, S> {
    // Root is the only node without a key/value.
    key: Option<K>,
    value: Option<S>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    leaf_count: usize,
    alive: bool,
}

impl<K, S> TreeNode<K, S> {
    fn root() -> Self {
        TreeNode {
            key: None,
            value: None,
            parent: None,
            children: Vec::new(),
            leaf_count: 1,
            alive: true,
        }
    }
}

/// Arena-backed tree of configurations.
///
/// Every pending location owns one uniform level of the tree, in insertion
/// order; a root-to-leaf path is one configuration. Nodes are addressed by
/// index and dead slots are recycled by `add_level`.
#[derive(Debug, Clone)]
pub(crate) struct ConfigTree<K, S> {
    nodes: Vec<TreeNode<K, S>>,
    free: Vec<NodeId>,
    order: Vec<K>,
    levels: BTreeMap<K, Vec<NodeId>>,
}

impl<K, S> ConfigTree<K, S>
where
    K: Ord + Clone + Debug,
    S: Copy + PartialEq + Debug,
{
    pub(crate) fn new() -> Self {
        ConfigTree {
            nodes: vec![TreeNode::root()],
            free: Vec::new(),
            order: Vec::new(),
            levels: BTreeMap::new(),
        }
    }

    /// Pending locations, root level first.
    pub(crate) fn pending(&self) -> &[K] {
        &self.order
    }

    pub(crate) fn is_pending(&self, key: &K) -> bool {
        self.levels.contains_key(key)
    }

    /// Number of configurations still possible.
    pub(crate) fn total(&self) -> usize {
        self.nodes[ROOT].leaf_count
    }

    /// True once pruning removed every branch while locations are still pending.
    pub(crate) fn is_exhausted(&self) -> bool {
        !self.order.is_empty() && self.nodes[ROOT].children.is_empty()
    }

    /// Number of configurations assigning `value` to `key`.
    pub(crate) fn count(&self, key: &K, value: S) -> usize {
        self.levels.get(key).map_or(0, |level| {
            level
                .iter()
                .map(|&id| &self.nodes[id])
                .filter(|node| node.value == Some(value))
                .map(|node| node.leaf_count)
                .sum()
        })
    }

    /// The value shared by every node of `key`'s level, if there is exactly one.
    pub(crate) fn uniform_value(&self, key: &K) -> Option<S> {
        let level = self.levels.get(key)?;
        let mut values = level.iter().map(|&id| self.nodes[id].value);
        let first = values.next()??;
        values.all(|value| value == Some(first)).then_some(first)
    }

    pub(crate) fn add_level(&mut self, key: K, domain: &[S]) {
        let leaves = match self.order.last() {
            Some(last) => self.levels[last].clone(),
            None => vec![ROOT],
        };

        let mut level = Vec::with_capacity(leaves.len() * domain.len());
        for &leaf in &leaves {
            for &value in domain {
                let child = self.alloc(TreeNode {
                    key: Some(key.clone()),
                    value: Some(value),
                    parent: Some(leaf),
                    children: Vec::new(),
                    leaf_count: 1,
                    alive: true,
                });
                self.nodes[leaf].children.push(child);
                level.push(child);
            }
        }

        trace!("add level {key:?} with {} nodes", level.len());
        self.order.push(key.clone());
        self.levels.insert(key, level);
        self.refresh_counts(leaves);
    }

    /// Drops `key`'s level, splicing each removed node's children into its parent.
    /// Children whose value already exists under the parent are merged into it.
    pub(crate) fn remove_level(&mut self, key: &K) {
        let Some(level) = self.levels.remove(key) else {
            return;
        };
        self.order.retain(|pending| pending != key);

        // Detach the whole level first so merges only ever see next-level siblings.
        let mut dirty = Vec::new();
        let mut orphans = Vec::new();
        for id in level {
            let Some(parent) = self.nodes[id].parent else {
                continue;
            };
            self.nodes[parent].children.retain(|&child| child != id);
            let children = std::mem::take(&mut self.nodes[id].children);
            self.release(id);
            dirty.push(parent);
            orphans.extend(children.into_iter().map(|child| (parent, child)));
        }
        for (parent, child) in orphans {
            self.merge_into(parent, child, &mut dirty);
        }

        trace!("removed level {key:?}, {} dirty nodes", dirty.len());
        self.clean_levels();
        self.refresh_counts(dirty);
    }

    /// Deletes every node of `key`'s level whose value is `doomed`.
    pub(crate) fn prune_level(&mut self, key: &K, doomed: impl Fn(S) -> bool) {
        let Some(level) = self.levels.get(key) else {
            return;
        };
        let targets: Vec<NodeId> = level
            .iter()
            .copied()
            .filter(|&id| self.nodes[id].value.is_some_and(&doomed))
            .collect();

        trace!("prune {} nodes from level {key:?}", targets.len());
        let dirty: Vec<NodeId> = targets
            .into_iter()
            .filter_map(|id| self.delete_branch(id))
            .collect();
        self.clean_levels();
        self.refresh_counts(dirty);
    }

    /// Keeps only the root-to-leaf paths on which the number of counted nodes
    /// holding `value` lies within `min..=max`. Returns false when no path survives.
    pub(crate) fn prune_paths(
        &mut self,
        counted: impl Fn(&K) -> bool,
        value: S,
        min: usize,
        max: usize,
    ) -> bool {
        if self.nodes[ROOT].children.is_empty() {
            return min == 0;
        }

        let mut doomed = Vec::new();
        let mut stack = vec![(ROOT, 0usize)];
        while let Some((id, count)) = stack.pop() {
            let node = &self.nodes[id];
            let hit = node.value == Some(value) && node.key.as_ref().is_some_and(&counted);
            let count = count + usize::from(hit);

            if count > max {
                doomed.push(id);
                continue;
            }
            if node.children.is_empty() {
                if count < min {
                    doomed.push(id);
                }
                continue;
            }
            stack.extend(node.children.iter().map(|&child| (child, count)));
        }

        trace!("prune {} paths on {value:?} ({min}..={max})", doomed.len());
        let dirty: Vec<NodeId> = doomed
            .into_iter()
            .filter_map(|id| self.delete_branch(id))
            .collect();
        self.clean_levels();
        self.refresh_counts(dirty);

        !self.is_exhausted()
    }

    fn alloc(&mut self, node: TreeNode<K, S>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        self.nodes[id].alive = false;
        self.nodes[id].children.clear();
        self.free.push(id);
    }

    fn merge_into(&mut self, parent: NodeId, child: NodeId, dirty: &mut Vec<NodeId>) {
        let mut work = vec![(parent, child)];
        while let Some((parent, child)) = work.pop() {
            let value = self.nodes[child].value;
            let twin = self.nodes[parent]
                .children
                .iter()
                .copied()
                .find(|&sibling| self.nodes[sibling].value == value);

            match twin {
                Some(twin) => {
                    let grandchildren = std::mem::take(&mut self.nodes[child].children);
                    self.release(child);
                    dirty.push(twin);
                    work.extend(grandchildren.into_iter().map(|grandchild| (twin, grandchild)));
                }
                None => {
                    self.nodes[child].parent = Some(parent);
                    self.nodes[parent].children.push(child);
                }
            }
        }
    }

    /// Removes the branch ending in `id`, climbing to the nearest ancestor that
    /// keeps other children. Returns that surviving ancestor.
    fn delete_branch(&mut self, mut id: NodeId) -> Option<NodeId> {
        if !self.nodes[id].alive || id == ROOT {
            return None;
        }
        while let Some(parent) = self.nodes[id].parent {
            if parent == ROOT || self.nodes[parent].children.len() > 1 {
                break;
            }
            id = parent;
        }

        let parent = self.nodes[id].parent?;
        self.nodes[parent].children.retain(|&child| child != id);

        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            stack.append(&mut self.nodes[id].children);
            self.release(id);
        }
        Some(parent)
    }

    fn clean_levels(&mut self) {
        let Self { nodes, levels, .. } = self;
        for level in levels.values_mut() {
            level.retain(|&id| nodes[id].alive);
        }
    }

    /// Recomputes leaf counts from `dirty` up to the root, one tree layer per round.
    fn refresh_counts(&mut self, dirty: impl IntoIterator<Item = NodeId>) {
        let mut current: BTreeSet<NodeId> = dirty
            .into_iter()
            .filter(|&id| self.nodes[id].alive)
            .collect();

        while !current.is_empty() {
            let mut parents = BTreeSet::new();
            for id in current {
                let node = &self.nodes[id];
                let leaf_count = if node.children.is_empty() {
                    1
                } else {
                    node.children
                        .iter()
                        .map(|&child| self.nodes[child].leaf_count)
                        .sum()
                };
                if let Some(parent) = node.parent {
                    parents.insert(parent);
                }
                self.nodes[id].leaf_count = leaf_count;
            }
            current = parents;
        }
    }

    /// Every configuration as `(key, value)` pairs in level order. Exponential; tests only.
    #[cfg(test)]
    pub(crate) fn configurations(&self) -> Vec<Vec<(K, S)>> {
        if self.is_exhausted() {
            return Vec::new();
        }
        let mut result = Vec::new();
        let mut stack = vec![(ROOT, Vec::new())];
        while let Some((id, assignment)) = stack.pop() {
            let node = &self.nodes[id];
            if node.children.is_empty() {
                result.push(assignment);
                continue;
            }
            for &child in &node.children {
                let child_node = &self.nodes[child];
                let mut next = assignment.clone();
                if let (Some(key), Some(value)) = (&child_node.key, child_node.value) {
                    next.push((key.clone(), value));
                }
                stack.push((child, next));
            }
        }
        result
    }

    /// Panics if the leaf-count invariant or the level index is broken.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let mut reachable = BTreeSet::new();
        let mut stack = vec![(ROOT, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id];
            assert!(node.alive, "dead node {id} reachable");
            reachable.insert(id);
            if node.children.is_empty() {
                assert_eq!(node.leaf_count, 1, "leaf {id} count");
                if id != ROOT {
                    assert_eq!(depth, self.order.len(), "leaf {id} not at the last level");
                }
            } else {
                let sum: usize = node.children.iter().map(|&c| self.nodes[c].leaf_count).sum();
                assert_eq!(node.leaf_count, sum, "node {id} count");
                let key = self.order.get(depth).expect("node below the last level");
                let mut seen = Vec::new();
                for &child in &node.children {
                    let child_node = &self.nodes[child];
                    assert_eq!(child_node.parent, Some(id));
                    assert_eq!(child_node.key.as_ref(), Some(key));
                    assert!(!seen.contains(&child_node.value), "duplicate sibling value");
                    seen.push(child_node.value);
                    stack.push((child, depth + 1));
                }
            }
        }

        let mut indexed = BTreeSet::from([ROOT]);
        assert_eq!(self.order.len(), self.levels.len());
        for key in &self.order {
            for &id in &self.levels[key] {
                assert_eq!(self.nodes[id].key.as_ref(), Some(key));
                indexed.insert(id);
            }
        }
        assert_eq!(reachable, indexed, "level index out of sync with the tree");
    }
}
