//! Search, category filter, selection and navigation state.
//!
//! [`QueryState`] is a plain value. Every user action is a [`Command`] applied
//! through [`QueryState::apply`], and everything the UI renders is derived from
//! (records, forest, state) by the free functions below.

use crate::records::{ItemRecord, LocationRecord};
use crate::tree::{build_tree, LocationNode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Widths at or below this many pixels are treated as a phone layout.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

pub const ALL_CATEGORIES: &str = "All";

// ===== STATE =====

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(wanted) => wanted == category,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Category(category) => category,
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(value)
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        CategoryFilter::from(value.to_string())
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => ALL_CATEGORIES.to_string(),
            CategoryFilter::Category(category) => category,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewportMode {
    #[default]
    Wide,
    Narrow,
}

impl ViewportMode {
    pub fn from_width(width_px: u32, breakpoint_px: u32) -> Self {
        if width_px <= breakpoint_px {
            ViewportMode::Narrow
        } else {
            ViewportMode::Wide
        }
    }

    pub fn is_narrow(&self) -> bool {
        matches!(self, ViewportMode::Narrow)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryState {
    pub search_text: String,
    pub category_filter: CategoryFilter,
    pub selected_item_id: Option<String>,
    pub nav_expanded: bool,
    pub viewport: ViewportMode,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetSearchText(String),
    SetCategoryFilter(CategoryFilter),
    SelectItem(String),
    ToggleNav,
    ViewportChanged(ViewportMode),
}

impl QueryState {
    /// Pure transition: returns the state after `command`.
    pub fn apply(mut self, command: Command) -> Self {
        self.dispatch(command);
        self
    }

    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::SetSearchText(text) => self.set_search_text(text),
            Command::SetCategoryFilter(filter) => self.set_category_filter(filter),
            Command::SelectItem(item_id) => self.select_item(item_id),
            Command::ToggleNav => self.toggle_nav(),
            Command::ViewportChanged(viewport) => self.viewport = viewport,
        }
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn set_category_filter(&mut self, filter: impl Into<CategoryFilter>) {
        self.category_filter = filter.into();
    }

    /// Selecting closes the result dropdown, and on phones also the nav panel.
    pub fn select_item(&mut self, item_id: impl Into<String>) {
        self.selected_item_id = Some(item_id.into());
        self.search_text.clear();
        if self.viewport.is_narrow() {
            self.nav_expanded = false;
        }
    }

    /// Collapsing the nav on phones also drops the selection.
    pub fn toggle_nav(&mut self) {
        let collapsing = self.nav_expanded;
        self.nav_expanded = !self.nav_expanded;
        if collapsing && self.viewport.is_narrow() {
            self.selected_item_id = None;
        }
    }

    /// True when the search text or the category filter narrows the item list.
    pub fn is_query_active(&self) -> bool {
        !self.search_text.is_empty() || self.category_filter != CategoryFilter::All
    }
}

// ===== DERIVATIONS =====

/// Lowercases one character at a time. Unlike `str::to_lowercase` there is no
/// word-final sigma rule, so a needle folds the same way as its extensions.
fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Items whose name contains the search text (case-insensitive) and whose
/// category passes the filter, in input order.
pub fn filtered_items<'a>(items: &'a [ItemRecord], state: &QueryState) -> Vec<&'a ItemRecord> {
    let needle = fold_case(&state.search_text);
    items
        .iter()
        .filter(|item| fold_case(&item.name).contains(&needle))
        .filter(|item| state.category_filter.matches(&item.category))
        .collect()
}

/// Ids of every location holding one of `filtered`, plus all of their ancestors.
pub fn locations_on_paths<'a>(forest: &'a [LocationNode], filtered: &[&ItemRecord]) -> HashSet<&'a str> {
    let wanted: HashSet<&str> = filtered.iter().map(|item| item.location_id.as_str()).collect();
    let mut kept: HashSet<&str> = HashSet::new();

    let mut trail: Vec<&LocationNode> = Vec::new();
    let mut stack: Vec<(&LocationNode, usize)> = forest.iter().rev().map(|node| (node, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        trail.truncate(depth);
        trail.push(node);
        if wanted.contains(node.id.as_str()) {
            // An already kept ancestor means the rest of the trail is kept too
            for &ancestor in trail.iter().rev() {
                if !kept.insert(ancestor.id.as_str()) {
                    break;
                }
            }
        }
        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }
    kept
}

/// Restricts the forest to locations holding a filtered item, keeping their
/// ancestors so every kept location still has a path from a root.
pub fn visible_tree(forest: &[LocationNode], filtered: &[&ItemRecord]) -> Vec<LocationNode> {
    let kept = locations_on_paths(forest, filtered);

    let mut records = Vec::new();
    let mut stack: Vec<(&LocationNode, Option<&str>)> = forest.iter().rev().map(|node| (node, None)).collect();
    while let Some((node, parent_id)) = stack.pop() {
        if !kept.contains(node.id.as_str()) {
            continue;
        }
        records.push(LocationRecord {
            id: node.id.clone(),
            name: node.name.clone(),
            parent_id: parent_id.map(str::to_string),
        });
        stack.extend(node.children.iter().rev().map(|child| (child, Some(node.id.as_str()))));
    }

    let items: Vec<ItemRecord> = filtered.iter().map(|item| (*item).clone()).collect();
    build_tree(&records, &items)
}

/// Locations the nav opens on its own while a query is active, so every
/// match is one glance away. Empty without an active query.
pub fn revealed_locations(
    forest: &[LocationNode],
    filtered: &[&ItemRecord],
    state: &QueryState,
) -> HashSet<String> {
    if !state.is_query_active() {
        return HashSet::new();
    }
    locations_on_paths(forest, filtered)
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TreeScope {
    /// Narrow the nav to locations matching the active query.
    #[default]
    Filtered,
    /// Always show every location, regardless of the query.
    Full,
}

/// What the navigation panel shows. An inactive query shows the full forest,
/// so empty locations stay browsable.
pub fn navigation_tree(
    forest: &[LocationNode],
    filtered: &[&ItemRecord],
    state: &QueryState,
    scope: TreeScope,
) -> Vec<LocationNode> {
    match scope {
        TreeScope::Filtered if state.is_query_active() => visible_tree(forest, filtered),
        _ => forest.to_vec(),
    }
}

/// The selected record, if its id is still present.
pub fn selected_item<'a>(items: &'a [ItemRecord], state: &QueryState) -> Option<&'a ItemRecord> {
    let selected_id = state.selected_item_id.as_deref()?;
    items.iter().find(|item| item.id == selected_id)
}

pub fn search_results_visible(state: &QueryState, filtered: &[&ItemRecord]) -> bool {
    !state.search_text.is_empty() && !filtered.is_empty()
}

/// On phones the open nav panel covers the item detail.
pub fn detail_hidden(state: &QueryState) -> bool {
    state.nav_expanded && state.viewport.is_narrow()
}

/// Distinct categories in order of first appearance.
pub fn categories(items: &[ItemRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(item.category.as_str()))
        .map(|item| item.category.clone())
        .collect()
}
