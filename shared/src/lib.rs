use serde::{Deserialize, Serialize};

pub mod config;
pub mod error;
pub mod query;
pub mod records;
pub mod tree;

pub use config::{AppConfig, AppSection, DataSection, MigrationStrategy, UiSection};
pub use error::ConfigError;
pub use query::{
    categories, detail_hidden, filtered_items, navigation_tree, revealed_locations,
    search_results_visible, selected_item, visible_tree, CategoryFilter, Command, QueryState,
    TreeScope, ViewportMode, MOBILE_BREAKPOINT_PX,
};
pub use records::{ItemRecord, ItemStatus, LocationRecord};
pub use tree::{build_tree, build_tree_with_report, LocationNode, TreeAnomaly, TreeReport};

// ===== MESSAGE TYPES =====

#[derive(Serialize, Deserialize, Debug)]
pub enum UpMsg {
    LoadConfig,
    LoadInventory,
}

#[derive(Serialize, Deserialize, Debug)]
pub enum DownMsg {
    ConfigLoaded(UiSection),
    ConfigError(String),
    /// Both record sets arrive together so the tree is built once.
    InventoryLoaded {
        locations: Vec<LocationRecord>,
        items: Vec<ItemRecord>,
    },
    InventoryError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_message_carries_wire_field_names() {
        let msg = DownMsg::InventoryLoaded {
            locations: vec![LocationRecord::new("B", "Aisle").with_parent("A")],
            items: vec![ItemRecord::new("i1", "Drill", "Tools", "B")],
        };

        let json = serde_json::to_value(&msg).unwrap();
        let loaded = &json["InventoryLoaded"];

        assert_eq!(loaded["locations"][0]["parentId"], "A");
        assert_eq!(loaded["items"][0]["locationId"], "B");
        assert!(loaded["items"][0].get("imageUrl").is_none());
    }
}
