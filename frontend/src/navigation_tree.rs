//! Collapsible location tree in the side panel.

use crate::dataflow::{relay, Actor, Relay};
use crate::query_state::QueryEngine;
use futures::StreamExt;
use indexmap::IndexSet;
use shared::{ItemRecord, LocationNode};
use std::collections::HashSet;
use zoon::*;

const INDENT_PX: u32 = 16;

/// Locations whose open state the user flipped. Local to the panel, never
/// sent anywhere.
#[derive(Clone, Debug)]
pub struct NavigationTree {
    expanded: Actor<IndexSet<String>>,
    pub location_row_pressed_relay: Relay<String>,
}

impl NavigationTree {
    pub fn new() -> Self {
        let (location_row_pressed_relay, mut location_row_pressed) = relay::<String>();

        let expanded = Actor::new(IndexSet::new(), async move |state| {
            while let Some(location_id) = location_row_pressed.next().await {
                state.update_mut(|expanded: &mut IndexSet<String>| {
                    if !expanded.shift_remove(&location_id) {
                        expanded.insert(location_id);
                    }
                });
            }
        });

        Self {
            expanded,
            location_row_pressed_relay,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TreeRow {
    Location {
        id: String,
        name: String,
        depth: u32,
        expanded: bool,
        expandable: bool,
    },
    Item {
        id: String,
        name: String,
        depth: u32,
    },
}

enum Pending<'a> {
    Location(&'a LocationNode, u32),
    Item(&'a ItemRecord, u32),
}

/// Flattens the forest into display rows, pre-order. An open location lists
/// its sub-locations first, then its items.
///
/// A location is open when it is either revealed by the active query or was
/// toggled by the user, not both; pressing a revealed row closes it.
pub fn tree_rows(
    forest: &[LocationNode],
    expanded: &IndexSet<String>,
    revealed: &HashSet<String>,
) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    let mut stack: Vec<Pending> = forest
        .iter()
        .rev()
        .map(|node| Pending::Location(node, 0))
        .collect();

    while let Some(pending) = stack.pop() {
        match pending {
            Pending::Item(item, depth) => rows.push(TreeRow::Item {
                id: item.id.clone(),
                name: item.name.clone(),
                depth,
            }),
            Pending::Location(node, depth) => {
                let is_expanded = expanded.contains(&node.id) != revealed.contains(&node.id);
                rows.push(TreeRow::Location {
                    id: node.id.clone(),
                    name: node.name.clone(),
                    depth,
                    expanded: is_expanded,
                    expandable: node.has_children() || !node.items.is_empty(),
                });
                if is_expanded {
                    stack.extend(node.items.iter().rev().map(|item| Pending::Item(item, depth + 1)));
                    stack.extend(
                        node.children
                            .iter()
                            .rev()
                            .map(|child| Pending::Location(child, depth + 1)),
                    );
                }
            }
        }
    }
    rows
}

pub fn navigation_panel(query: &QueryEngine, tree: &NavigationTree) -> impl Element + use<> {
    let tree_item_pressed_relay = query.tree_item_pressed_relay.clone();
    let location_row_pressed_relay = tree.location_row_pressed_relay.clone();

    let rows_signal = map_ref! {
        let forest = query.navigation_tree_signal(),
        let expanded = tree.expanded.signal(),
        let revealed = query.revealed_locations_signal() =>
        tree_rows(forest, expanded, revealed)
    };

    Column::new()
        .s(Width::exact(280))
        .s(Height::fill())
        .s(Padding::all(8))
        .s(Scrollbars::both())
        .s(Background::new().color("oklch(97% 0.01 250)"))
        .s(Borders::new().right(Border::new().width(1).color("oklch(85% 0.02 250)")))
        .update_raw_el(|raw_el| raw_el.style("scrollbar-width", "thin"))
        .item_signal(rows_signal.map(move |rows| {
            if rows.is_empty() {
                return El::new()
                    .s(Padding::all(8))
                    .s(Font::new().italic().color("oklch(55% 0.02 250)"))
                    .child("No matching locations")
                    .unify();
            }
            Column::new()
                .s(Gap::new().y(2))
                .items(rows.into_iter().map(|row| {
                    tree_row(
                        row,
                        location_row_pressed_relay.clone(),
                        tree_item_pressed_relay.clone(),
                    )
                }))
                .unify()
        }))
}

fn tree_row(
    row: TreeRow,
    location_row_pressed_relay: Relay<String>,
    tree_item_pressed_relay: Relay<String>,
) -> impl Element {
    match row {
        TreeRow::Location {
            id,
            name,
            depth,
            expanded,
            expandable,
        } => {
            let marker = match (expandable, expanded) {
                (false, _) => "•",
                (true, true) => "▾",
                (true, false) => "▸",
            };
            Button::new()
                .s(Width::fill())
                .s(Padding::new().left(depth * INDENT_PX + 4).right(4).y(4))
                .s(RoundedCorners::all(4))
                .s(Font::new().weight(FontWeight::SemiBold).no_wrap())
                .label(
                    Row::new()
                        .s(Gap::new().x(6))
                        .item(El::new().s(Width::exact(12)).child(marker))
                        .item(name),
                )
                .on_press(move || location_row_pressed_relay.send(id.clone()))
                .unify()
        }
        TreeRow::Item { id, name, depth } => Button::new()
            .s(Width::fill())
            .s(Padding::new().left(depth * INDENT_PX + 22).right(4).y(4))
            .s(RoundedCorners::all(4))
            .s(Font::new().color("oklch(40% 0.12 250)").no_wrap())
            .label(name)
            .on_press(move || tree_item_pressed_relay.send(id.clone()))
            .unify(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{build_tree, LocationRecord};

    fn forest() -> Vec<LocationNode> {
        build_tree(
            &[
                LocationRecord::new("A", "Warehouse"),
                LocationRecord::new("B", "Aisle 1").with_parent("A"),
                LocationRecord::new("C", "Shelf 3").with_parent("B"),
                LocationRecord::new("E", "Yard"),
            ],
            &[
                ItemRecord::new("i1", "Drill", "Tools", "B"),
                ItemRecord::new("i2", "Saw", "Tools", "A"),
            ],
        )
    }

    fn labels(rows: &[TreeRow]) -> Vec<String> {
        rows.iter()
            .map(|row| match row {
                TreeRow::Location { name, depth, .. } => format!("{depth}:{name}"),
                TreeRow::Item { name, depth, .. } => format!("{depth}:-{name}"),
            })
            .collect()
    }

    #[test]
    fn collapsed_forest_shows_only_roots() {
        let rows = tree_rows(&forest(), &IndexSet::new(), &HashSet::new());
        assert_eq!(labels(&rows), vec!["0:Warehouse", "0:Yard"]);
        assert!(matches!(rows[1], TreeRow::Location { expandable: false, .. }));
    }

    #[test]
    fn expanded_location_lists_children_before_items() {
        let expanded: IndexSet<String> = ["A", "B"].into_iter().map(String::from).collect();
        let rows = tree_rows(&forest(), &expanded, &HashSet::new());
        assert_eq!(
            labels(&rows),
            vec!["0:Warehouse", "1:Aisle 1", "2:Shelf 3", "2:-Drill", "1:-Saw", "0:Yard"]
        );
    }

    #[test]
    fn collapsed_parent_hides_expanded_descendants() {
        let expanded: IndexSet<String> = ["B"].into_iter().map(String::from).collect();
        let rows = tree_rows(&forest(), &expanded, &HashSet::new());
        assert_eq!(labels(&rows), vec!["0:Warehouse", "0:Yard"]);
    }

    #[test]
    fn revealed_path_opens_without_a_press() {
        let revealed: HashSet<String> = ["A", "B"].into_iter().map(String::from).collect();
        let rows = tree_rows(&forest(), &IndexSet::new(), &revealed);
        assert_eq!(
            labels(&rows),
            vec!["0:Warehouse", "1:Aisle 1", "2:Shelf 3", "2:-Drill", "1:-Saw", "0:Yard"]
        );
    }

    #[test]
    fn pressing_a_revealed_location_closes_it() {
        let revealed: HashSet<String> = ["A", "B"].into_iter().map(String::from).collect();
        let toggled: IndexSet<String> = ["B"].into_iter().map(String::from).collect();
        let rows = tree_rows(&forest(), &toggled, &revealed);
        assert_eq!(labels(&rows), vec!["0:Warehouse", "1:Aisle 1", "1:-Saw", "0:Yard"]);
        assert!(matches!(rows[1], TreeRow::Location { expanded: false, .. }));
    }
}
