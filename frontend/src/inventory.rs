//! Record sets and the location forest built from them.

use crate::dataflow::{relay, Actor, Relay};
use futures::{select, StreamExt};
use shared::{build_tree_with_report, categories, ItemRecord, LocationNode, LocationRecord};
use std::sync::Arc;
use zoon::*;

/// Both record sets plus the forest, replaced together on every load.
#[derive(Clone, Debug, Default)]
pub struct InventoryData {
    pub items: Arc<Vec<ItemRecord>>,
    pub forest: Arc<Vec<LocationNode>>,
}

#[derive(Clone, Debug, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready(InventoryData),
    Failed(String),
}

#[derive(Clone, Debug)]
pub struct Inventory {
    load_state: Actor<LoadState>,
    pub records_received_relay: Relay<(Vec<LocationRecord>, Vec<ItemRecord>)>,
    pub load_failed_relay: Relay<String>,
}

impl Inventory {
    pub fn new() -> Self {
        let (records_received_relay, mut records_received) = relay();
        let (load_failed_relay, mut load_failed) = relay();

        let load_state = Actor::new(LoadState::Loading, async move |state| {
            loop {
                select! {
                    records = records_received.next() => {
                        let Some((locations, items)) = records else { break };
                        state.set(LoadState::Ready(assemble(&locations, items)));
                    }
                    error = load_failed.next() => {
                        let Some(error) = error else { break };
                        zoon::println!("Inventory load failed: {error}");
                        state.set(LoadState::Failed(error));
                    }
                }
            }
        });

        Self {
            load_state,
            records_received_relay,
            load_failed_relay,
        }
    }

    pub fn load_state_signal(&self) -> impl Signal<Item = LoadState> + use<> {
        self.load_state.signal()
    }

    /// Empty until the first successful load.
    pub fn data_signal(&self) -> impl Signal<Item = InventoryData> + use<> {
        self.load_state.signal_ref(|load_state| match load_state {
            LoadState::Ready(data) => data.clone(),
            LoadState::Loading | LoadState::Failed(_) => InventoryData::default(),
        })
    }

    pub fn categories_signal(&self) -> impl Signal<Item = Vec<String>> + use<> {
        self.data_signal()
            .map(|data| categories(&data.items))
            .dedupe_cloned()
    }
}

fn assemble(locations: &[LocationRecord], items: Vec<ItemRecord>) -> InventoryData {
    let (forest, report) = build_tree_with_report(locations, &items);
    if !report.is_clean() {
        zoon::println!("Inventory records are inconsistent, showing a best-effort tree");
        for anomaly in &report.anomalies {
            zoon::println!("Inventory anomaly: {anomaly}");
        }
    }
    zoon::println!(
        "Inventory ready: {} locations, {} items, {} anomalies",
        locations.len(),
        items.len(),
        report.anomalies.len()
    );
    InventoryData {
        items: Arc::new(items),
        forest: Arc::new(forest),
    }
}
