//! Location hierarchy built from flat location and item records.
//!
//! The builder never fails. Inconsistent input (duplicate ids, dangling or
//! cyclic parent references, items pointing at unknown locations) degrades into
//! a best-effort forest, and every such recovery is recorded in a [`TreeReport`].

use crate::records::{ItemRecord, LocationRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One location with its items and sub-locations.
///
/// `Clone`, `PartialEq` and `Drop` walk the subtree with an explicit stack, so
/// arbitrarily deep chains never exhaust the call stack. `Debug` stays derived.
#[derive(Debug)]
pub struct LocationNode {
    pub id: String,
    pub name: String,
    pub items: Vec<ItemRecord>,
    pub children: Vec<LocationNode>,
}

impl LocationNode {
    fn shell(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            items: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Pre-order traversal of this node and all of its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

impl Clone for LocationNode {
    fn clone(&self) -> Self {
        // Reverse pre-order finishes every child before its parent; the finished
        // siblings sit on top of the stack, first child topmost.
        let order: Vec<&LocationNode> = self.walk().collect();
        let mut finished: Vec<LocationNode> = Vec::with_capacity(order.len());
        for node in order.into_iter().rev() {
            let mut children = finished.split_off(finished.len() - node.children.len());
            children.reverse();
            finished.push(LocationNode {
                id: node.id.clone(),
                name: node.name.clone(),
                items: node.items.clone(),
                children,
            });
        }
        finished.pop().unwrap_or_else(|| LocationNode::shell(&self.id, &self.name))
    }
}

impl PartialEq for LocationNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((left, right)) = pending.pop() {
            if left.id != right.id
                || left.name != right.name
                || left.items != right.items
                || left.children.len() != right.children.len()
            {
                return false;
            }
            pending.extend(left.children.iter().zip(&right.children));
        }
        true
    }
}

impl Drop for LocationNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

pub struct Walk<'a> {
    stack: Vec<&'a LocationNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a LocationNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Pre-order traversal over every root of a forest in order.
pub fn forest_nodes(forest: &[LocationNode]) -> Walk<'_> {
    Walk {
        stack: forest.iter().rev().collect(),
    }
}

pub fn node_count(forest: &[LocationNode]) -> usize {
    forest_nodes(forest).count()
}

pub fn item_count(forest: &[LocationNode]) -> usize {
    forest_nodes(forest).map(|node| node.items.len()).sum()
}

pub fn find_node<'a>(forest: &'a [LocationNode], location_id: &str) -> Option<&'a LocationNode> {
    forest_nodes(forest).find(|node| node.id == location_id)
}

/// Path from a root down to `location_id`, both ends included.
pub fn trail_to<'a>(forest: &'a [LocationNode], location_id: &str) -> Option<Vec<&'a LocationNode>> {
    // (node, depth) pairs; the trail is truncated back to `depth` on every step.
    let mut stack: Vec<(&LocationNode, usize)> = forest.iter().rev().map(|node| (node, 0)).collect();
    let mut trail: Vec<&LocationNode> = Vec::new();
    while let Some((node, depth)) = stack.pop() {
        trail.truncate(depth);
        trail.push(node);
        if node.id == location_id {
            return Some(trail);
        }
        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }
    None
}

// ===== ANOMALIES =====

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum TreeAnomaly {
    /// A later record reused an id; its name and parent replaced the earlier ones.
    DuplicateLocation { location_id: String },
    /// Parent reference points at no known location; the node became a root.
    DanglingParent { location_id: String, parent_id: String },
    /// Following parents led back to this location; it became a root.
    CycleBroken { location_id: String },
    /// Item references no known location and is left out of the tree.
    OrphanItem { item_id: String, location_id: String },
}

impl std::fmt::Display for TreeAnomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeAnomaly::DuplicateLocation { location_id } => {
                write!(f, "duplicate location id '{}', last record wins", location_id)
            }
            TreeAnomaly::DanglingParent {
                location_id,
                parent_id,
            } => write!(
                f,
                "location '{}' references missing parent '{}', treated as root",
                location_id, parent_id
            ),
            TreeAnomaly::CycleBroken { location_id } => {
                write!(f, "parent cycle broken at location '{}', treated as root", location_id)
            }
            TreeAnomaly::OrphanItem {
                item_id,
                location_id,
            } => write!(
                f,
                "item '{}' references missing location '{}', hidden from tree",
                item_id, location_id
            ),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct TreeReport {
    pub anomalies: Vec<TreeAnomaly>,
}

impl TreeReport {
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }
}

// ===== BUILDER =====

#[derive(Clone, Copy, PartialEq)]
enum Resolution {
    Pending,
    OnPath,
    Resolved,
}

/// Builds the location forest. See [`build_tree_with_report`].
pub fn build_tree(locations: &[LocationRecord], items: &[ItemRecord]) -> Vec<LocationNode> {
    build_tree_with_report(locations, items).0
}

/// Builds the location forest and reports every recovered inconsistency.
///
/// Roots and siblings keep the order in which their ids first appeared in
/// `locations`; items keep their order from `items`. A duplicated id keeps
/// its first position but takes the name and parent of its last record.
///
/// Parent chains are resolved in location order. When a walk up the chain
/// reaches a location already on the current walk, that location is cut
/// loose and becomes a root, so `A -> B -> A` yields root `A` with child `B`.
pub fn build_tree_with_report(
    locations: &[LocationRecord],
    items: &[ItemRecord],
) -> (Vec<LocationNode>, TreeReport) {
    let mut report = TreeReport::default();

    // Dedup: slot per distinct id in first-appearance order, last record wins.
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut records: Vec<&LocationRecord> = Vec::new();
    for location in locations {
        match index.get(location.id.as_str()) {
            Some(&slot) => {
                records[slot] = location;
                report.anomalies.push(TreeAnomaly::DuplicateLocation {
                    location_id: location.id.clone(),
                });
            }
            None => {
                index.insert(location.id.as_str(), records.len());
                records.push(location);
            }
        }
    }

    let mut parents: Vec<Option<usize>> = vec![None; records.len()];
    let mut state = vec![Resolution::Pending; records.len()];
    for start in 0..records.len() {
        let mut path = Vec::new();
        let mut current = start;
        loop {
            match state[current] {
                Resolution::Resolved => break,
                Resolution::OnPath => {
                    parents[current] = None;
                    report.anomalies.push(TreeAnomaly::CycleBroken {
                        location_id: records[current].id.clone(),
                    });
                    break;
                }
                Resolution::Pending => {}
            }
            state[current] = Resolution::OnPath;
            path.push(current);

            let Some(parent_id) = records[current].parent_id.as_deref() else {
                break;
            };
            match index.get(parent_id) {
                Some(&parent) => {
                    parents[current] = Some(parent);
                    current = parent;
                }
                None => {
                    report.anomalies.push(TreeAnomaly::DanglingParent {
                        location_id: records[current].id.clone(),
                        parent_id: parent_id.to_string(),
                    });
                    break;
                }
            }
        }
        for slot in path {
            state[slot] = Resolution::Resolved;
        }
    }

    let mut nodes: Vec<Option<LocationNode>> = records
        .iter()
        .map(|record| Some(LocationNode::shell(&record.id, &record.name)))
        .collect();

    for item in items {
        match index.get(item.location_id.as_str()) {
            Some(&slot) => {
                if let Some(node) = nodes[slot].as_mut() {
                    node.items.push(item.clone());
                }
            }
            None => report.anomalies.push(TreeAnomaly::OrphanItem {
                item_id: item.id.clone(),
                location_id: item.location_id.clone(),
            }),
        }
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut roots = Vec::new();
    for (slot, parent) in parents.iter().enumerate() {
        match parent {
            Some(parent) => children[*parent].push(slot),
            None => roots.push(slot),
        }
    }

    // Pre-order listing, then assemble bottom-up so no recursion is needed.
    let mut order = Vec::with_capacity(records.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(slot) = stack.pop() {
        order.push(slot);
        stack.extend(children[slot].iter().rev());
    }
    for &slot in order.iter().rev() {
        let built: Vec<LocationNode> = children[slot]
            .iter()
            .filter_map(|&child| nodes[child].take())
            .collect();
        if let Some(node) = nodes[slot].as_mut() {
            node.children = built;
        }
    }

    let forest = roots.into_iter().filter_map(|slot| nodes[slot].take()).collect();
    (forest, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(id: &str, parent: Option<&str>) -> LocationRecord {
        LocationRecord {
            id: id.to_string(),
            name: format!("Location {}", id),
            parent_id: parent.map(str::to_string),
        }
    }

    fn item(id: &str, location_id: &str) -> ItemRecord {
        ItemRecord::new(id, format!("Item {}", id), "Tools", location_id)
    }

    fn ids(forest: &[LocationNode]) -> Vec<&str> {
        forest.iter().map(|node| node.id.as_str()).collect()
    }

    /// No node reachable from itself and every node listed once.
    fn assert_is_forest(forest: &[LocationNode]) {
        let mut seen = std::collections::HashSet::new();
        for node in forest_nodes(forest) {
            assert!(seen.insert(node.id.clone()), "node '{}' appears twice", node.id);
        }
    }

    #[test]
    fn nests_child_under_parent_with_items() {
        let locations = vec![location("A", None), location("B", Some("A"))];
        let items = vec![ItemRecord::new("i1", "Drill", "Tools", "B")];

        let forest = build_tree(&locations, &items);

        assert_eq!(ids(&forest), vec!["A"]);
        assert!(forest[0].items.is_empty());
        assert_eq!(ids(&forest[0].children), vec!["B"]);
        assert_eq!(forest[0].children[0].items[0].id, "i1");
    }

    #[test]
    fn orphan_item_is_left_out_and_reported() {
        let locations = vec![location("A", None)];
        let items = vec![item("i1", "A"), item("i2", "Z")];

        let (forest, report) = build_tree_with_report(&locations, &items);

        assert!(!report.is_clean());
        assert!(build_tree_with_report(&locations, &items[..1]).1.is_clean());
        assert_eq!(item_count(&forest), 1);
        assert_eq!(
            report.anomalies,
            vec![TreeAnomaly::OrphanItem {
                item_id: "i2".to_string(),
                location_id: "Z".to_string()
            }]
        );
    }

    #[test]
    fn duplicate_id_takes_last_name_and_first_position() {
        let locations = vec![
            LocationRecord::new("A", "Old hall"),
            LocationRecord::new("B", "Dock"),
            LocationRecord::new("A", "New hall"),
        ];

        let (forest, report) = build_tree_with_report(&locations, &[]);

        assert_eq!(ids(&forest), vec!["A", "B"]);
        assert_eq!(forest[0].name, "New hall");
        assert_eq!(node_count(&forest), 2);
        assert_eq!(
            report.anomalies,
            vec![TreeAnomaly::DuplicateLocation {
                location_id: "A".to_string()
            }]
        );
    }

    #[test]
    fn duplicate_id_takes_last_parent() {
        let locations = vec![
            location("A", None),
            location("B", None),
            location("C", Some("A")),
            location("C", Some("B")),
        ];

        let forest = build_tree(&locations, &[]);

        assert!(forest[0].children.is_empty());
        assert_eq!(ids(&forest[1].children), vec!["C"]);
    }

    #[test]
    fn dangling_parent_becomes_root() {
        let locations = vec![location("A", Some("missing")), location("B", None)];

        let (forest, report) = build_tree_with_report(&locations, &[]);

        assert_eq!(ids(&forest), vec!["A", "B"]);
        assert_eq!(
            report.anomalies,
            vec![TreeAnomaly::DanglingParent {
                location_id: "A".to_string(),
                parent_id: "missing".to_string()
            }]
        );
    }

    #[test]
    fn two_node_cycle_cuts_at_first_revisited_location() {
        let locations = vec![location("A", Some("B")), location("B", Some("A"))];
        let items = vec![item("i1", "A"), item("i2", "B")];

        let (forest, report) = build_tree_with_report(&locations, &items);

        assert_eq!(ids(&forest), vec!["A"]);
        assert_eq!(ids(&forest[0].children), vec!["B"]);
        assert_eq!(item_count(&forest), 2);
        assert_is_forest(&forest);
        assert_eq!(
            report.anomalies,
            vec![TreeAnomaly::CycleBroken {
                location_id: "A".to_string()
            }]
        );
    }

    #[test]
    fn self_parent_becomes_root() {
        let locations = vec![location("A", Some("A")), location("B", Some("A"))];

        let forest = build_tree(&locations, &[]);

        assert_eq!(ids(&forest), vec!["A"]);
        assert_eq!(ids(&forest[0].children), vec!["B"]);
    }

    #[test]
    fn cycle_entered_from_outside_keeps_the_tail_nested() {
        // C hangs off a cycle A <-> B; the walk from C revisits A first.
        let locations = vec![
            location("C", Some("A")),
            location("A", Some("B")),
            location("B", Some("A")),
        ];

        let forest = build_tree(&locations, &[]);

        assert_eq!(ids(&forest), vec!["A"]);
        assert_eq!(ids(&forest[0].children), vec!["C", "B"]);
        assert_eq!(node_count(&forest), 3);
        assert_is_forest(&forest);
    }

    #[test]
    fn roots_and_siblings_keep_input_order() {
        let locations = vec![
            location("child-2", Some("root-1")),
            location("root-2", None),
            location("root-1", None),
            location("child-1", Some("root-1")),
        ];

        let forest = build_tree(&locations, &[]);

        assert_eq!(ids(&forest), vec!["root-2", "root-1"]);
        assert_eq!(ids(&forest[1].children), vec!["child-2", "child-1"]);
    }

    #[test]
    fn item_total_matches_resolvable_items() {
        let locations = vec![
            location("A", None),
            location("B", Some("A")),
            location("C", Some("B")),
            location("D", Some("nowhere")),
        ];
        let items = vec![
            item("i1", "A"),
            item("i2", "C"),
            item("i3", "X"),
            item("i4", "D"),
            item("i5", "C"),
        ];

        let forest = build_tree(&locations, &items);
        let resolvable = items
            .iter()
            .filter(|item| locations.iter().any(|loc| loc.id == item.location_id))
            .count();

        assert_eq!(item_count(&forest), resolvable);
        assert_eq!(node_count(&forest), 4);
        let c = find_node(&forest, "C").unwrap();
        assert_eq!(c.items.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["i2", "i5"]);
    }

    #[test]
    fn building_twice_gives_identical_forests() {
        let locations = vec![
            location("A", Some("C")),
            location("B", Some("A")),
            location("C", Some("B")),
            location("D", None),
        ];
        let items = vec![item("i1", "B"), item("i2", "D")];

        assert_eq!(build_tree(&locations, &items), build_tree(&locations, &items));
    }

    #[test]
    fn long_parent_chain_builds_without_recursion() {
        let depth = 50_000;
        let locations: Vec<LocationRecord> = (0..depth)
            .map(|n| {
                let parent = (n > 0).then(|| format!("L{}", n - 1));
                LocationRecord {
                    id: format!("L{}", n),
                    name: format!("Level {}", n),
                    parent_id: parent,
                }
            })
            .collect();

        let forest = build_tree(&locations, &[]);

        assert_eq!(forest.len(), 1);
        assert_eq!(node_count(&forest), depth);

        let copy = forest.clone();
        assert!(copy == forest);
        drop(copy);
        drop(forest);
    }

    #[test]
    fn clone_keeps_child_order_and_items() {
        let locations = vec![
            location("A", None),
            location("B", Some("A")),
            location("C", Some("B")),
            location("D", Some("A")),
        ];
        let items = vec![item("i1", "C"), item("i2", "D"), item("i3", "A")];
        let forest = build_tree(&locations, &items);

        let copy = forest[0].clone();

        let order: Vec<&str> = copy.walk().map(|node| node.id.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C", "D"]);
        assert_eq!(copy.children[0].children[0].items[0].id, "i1");
        assert_eq!(copy, forest[0]);
        assert_ne!(copy, forest[0].children[0]);
    }

    #[test]
    fn trail_runs_from_root_to_target() {
        let locations = vec![
            location("A", None),
            location("B", Some("A")),
            location("C", Some("B")),
            location("D", Some("A")),
        ];
        let forest = build_tree(&locations, &[]);

        let trail: Vec<&str> = trail_to(&forest, "C")
            .unwrap()
            .iter()
            .map(|node| node.id.as_str())
            .collect();
        assert_eq!(trail, vec!["A", "B", "C"]);

        let trail: Vec<&str> = trail_to(&forest, "D")
            .unwrap()
            .iter()
            .map(|node| node.id.as_str())
            .collect();
        assert_eq!(trail, vec!["A", "D"]);
        assert!(trail_to(&forest, "missing").is_none());
    }

    #[test]
    fn walk_is_pre_order() {
        let locations = vec![
            location("A", None),
            location("B", Some("A")),
            location("C", Some("B")),
            location("D", Some("A")),
            location("E", None),
        ];
        let forest = build_tree(&locations, &[]);

        let order: Vec<&str> = forest_nodes(&forest).map(|node| node.id.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C", "D", "E"]);
    }

    // ===== INVARIANTS OVER ARBITRARY INPUT =====

    use proptest::prelude::*;
    use std::collections::HashSet;

    const POOL: [&str; 6] = ["L0", "L1", "L2", "L3", "L4", "L5"];

    /// Ids drawn from a small pool so duplicates, self-parents and cycles are
    /// common; "ghost" never names a location.
    fn location_strategy() -> impl Strategy<Value = LocationRecord> {
        (0..POOL.len(), prop::option::of(0..=POOL.len())).prop_map(|(id, parent)| {
            let parent = parent.map(|slot| POOL.get(slot).copied().unwrap_or("ghost"));
            location(POOL[id], parent)
        })
    }

    /// Location slot per item; the slot past the pool is an orphan.
    fn item_strategy() -> impl Strategy<Value = usize> {
        0..=POOL.len()
    }

    fn items_from(slots: &[usize]) -> Vec<ItemRecord> {
        slots
            .iter()
            .enumerate()
            .map(|(n, slot)| item(&format!("i{n}"), POOL.get(*slot).copied().unwrap_or("ghost")))
            .collect()
    }

    proptest! {
        #[test]
        fn every_distinct_location_appears_exactly_once(
            locations in prop::collection::vec(location_strategy(), 0..12),
        ) {
            let forest = build_tree(&locations, &[]);
            let distinct: HashSet<&str> = locations.iter().map(|loc| loc.id.as_str()).collect();

            let mut seen = HashSet::new();
            for node in forest_nodes(&forest) {
                prop_assert!(seen.insert(node.id.clone()), "node '{}' appears twice", node.id);
            }
            prop_assert_eq!(node_count(&forest), distinct.len());
        }

        #[test]
        fn item_total_counts_only_resolvable_items(
            locations in prop::collection::vec(location_strategy(), 0..12),
            picks in prop::collection::vec(item_strategy(), 0..20),
        ) {
            let items = items_from(&picks);
            let (forest, report) = build_tree_with_report(&locations, &items);
            let resolvable = items
                .iter()
                .filter(|item| locations.iter().any(|loc| loc.id == item.location_id))
                .count();
            let orphans = report
                .anomalies
                .iter()
                .filter(|anomaly| matches!(anomaly, TreeAnomaly::OrphanItem { .. }))
                .count();

            prop_assert_eq!(item_count(&forest), resolvable);
            prop_assert_eq!(resolvable + orphans, items.len());
        }

        #[test]
        fn building_is_deterministic(
            locations in prop::collection::vec(location_strategy(), 0..12),
            picks in prop::collection::vec(item_strategy(), 0..20),
        ) {
            let items = items_from(&picks);
            prop_assert_eq!(build_tree(&locations, &items), build_tree(&locations, &items));
        }
    }
}
