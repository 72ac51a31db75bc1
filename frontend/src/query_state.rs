//! The query actor: turns UI events into `Command`s applied to `QueryState`,
//! and exposes the derived views as signals.

use crate::config::UiConfig;
use crate::dataflow::{relay, Actor, Relay};
use crate::inventory::Inventory;
use futures::{select, StreamExt};
use shared::{
    detail_hidden, filtered_items, navigation_tree, revealed_locations, search_results_visible,
    selected_item, CategoryFilter, Command, ItemRecord, LocationNode, QueryState, ViewportMode,
    MOBILE_BREAKPOINT_PX,
};
use std::collections::HashSet;
use zoon::*;

#[derive(Clone, Debug)]
pub struct QueryEngine {
    state: Actor<QueryState>,
    inventory: Inventory,
    config: UiConfig,

    pub search_input_changed_relay: Relay<String>,
    pub category_chip_pressed_relay: Relay<CategoryFilter>,
    pub search_result_pressed_relay: Relay<String>,
    pub tree_item_pressed_relay: Relay<String>,
    pub nav_toggle_pressed_relay: Relay<()>,
    /// Root element width in pixels.
    pub viewport_resized_relay: Relay<u32>,
}

impl QueryEngine {
    pub fn new(inventory: &Inventory, config: &UiConfig) -> Self {
        let (search_input_changed_relay, mut search_input_changed) = relay();
        let (category_chip_pressed_relay, mut category_chip_pressed) = relay();
        let (search_result_pressed_relay, mut search_result_pressed) = relay();
        let (tree_item_pressed_relay, mut tree_item_pressed) = relay();
        let (nav_toggle_pressed_relay, mut nav_toggle_pressed) = relay();
        let (viewport_resized_relay, mut viewport_resized) = relay();
        let mut breakpoint_changed = config.breakpoint_signal().to_stream().fuse();

        let state = Actor::new(QueryState::default(), async move |state| {
            let mut width: Option<u32> = None;
            let mut breakpoint = MOBILE_BREAKPOINT_PX;
            loop {
                let command = select! {
                    text = search_input_changed.next() => text.map(Command::SetSearchText),
                    filter = category_chip_pressed.next() => filter.map(Command::SetCategoryFilter),
                    item_id = search_result_pressed.next() => item_id.map(Command::SelectItem),
                    item_id = tree_item_pressed.next() => item_id.map(Command::SelectItem),
                    toggle = nav_toggle_pressed.next() => toggle.map(|()| Command::ToggleNav),
                    new_width = viewport_resized.next() => {
                        width = new_width;
                        width.map(|width| Command::ViewportChanged(ViewportMode::from_width(width, breakpoint)))
                    }
                    new_breakpoint = breakpoint_changed.next() => {
                        if let Some(new_breakpoint) = new_breakpoint {
                            breakpoint = new_breakpoint;
                        }
                        width.map(|width| Command::ViewportChanged(ViewportMode::from_width(width, breakpoint)))
                    }
                    complete => break,
                };
                if let Some(command) = command {
                    state.update_mut(|query| query.dispatch(command));
                }
            }
        });

        Self {
            state,
            inventory: inventory.clone(),
            config: config.clone(),
            search_input_changed_relay,
            category_chip_pressed_relay,
            search_result_pressed_relay,
            tree_item_pressed_relay,
            nav_toggle_pressed_relay,
            viewport_resized_relay,
        }
    }

    pub fn search_text_signal(&self) -> impl Signal<Item = String> + use<> {
        self.state
            .signal_ref(|query| query.search_text.clone())
            .dedupe_cloned()
    }

    pub fn category_filter_signal(&self) -> impl Signal<Item = CategoryFilter> + use<> {
        self.state
            .signal_ref(|query| query.category_filter.clone())
            .dedupe_cloned()
    }

    pub fn nav_expanded_signal(&self) -> impl Signal<Item = bool> + use<> {
        self.state.signal_ref(|query| query.nav_expanded).dedupe()
    }

    pub fn detail_hidden_signal(&self) -> impl Signal<Item = bool> + use<> {
        self.state.signal_ref(detail_hidden).dedupe()
    }

    /// Rows for the result dropdown, `None` while it is closed.
    pub fn search_results_signal(&self) -> impl Signal<Item = Option<Vec<ItemRecord>>> + use<> {
        map_ref! {
            let data = self.inventory.data_signal(),
            let query = self.state.signal() => {
                let filtered = filtered_items(&data.items, query);
                search_results_visible(query, &filtered)
                    .then(|| filtered.into_iter().cloned().collect::<Vec<_>>())
            }
        }
    }

    pub fn navigation_tree_signal(&self) -> impl Signal<Item = Vec<LocationNode>> + use<> {
        map_ref! {
            let data = self.inventory.data_signal(),
            let query = self.state.signal(),
            let scope = self.config.tree_scope_signal() => {
                let filtered = filtered_items(&data.items, query);
                navigation_tree(&data.forest, &filtered, query, *scope)
            }
        }
    }

    /// Locations the tree opens on its own for the active query.
    pub fn revealed_locations_signal(&self) -> impl Signal<Item = HashSet<String>> + use<> {
        map_ref! {
            let data = self.inventory.data_signal(),
            let query = self.state.signal() => {
                let filtered = filtered_items(&data.items, query);
                revealed_locations(&data.forest, &filtered, query)
            }
        }
        .dedupe_cloned()
    }

    pub fn selected_item_signal(&self) -> impl Signal<Item = Option<ItemRecord>> + use<> {
        map_ref! {
            let data = self.inventory.data_signal(),
            let query = self.state.signal() =>
            selected_item(&data.items, query).cloned()
        }
        .dedupe_cloned()
    }
}
