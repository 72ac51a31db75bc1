//! Smart Warehouse frontend entry point

use std::sync::OnceLock;
use zoon::*;

/// Keeps the app task (and with it every domain actor) alive.
static MAIN_TASK: OnceLock<TaskHandle> = OnceLock::new();

mod app;
mod config;
mod connection;
mod dataflow;
mod error_display;
mod inventory;
mod item_detail;
mod login;
mod navigation_tree;
mod query_state;
mod search_panel;

pub fn main() {
    let handle = Task::start_droppable(async {
        // Lives as long as the page; the connection and its handler go with it
        let app: &'static crate::app::SmartWarehouseApp =
            Box::leak(Box::new(crate::app::SmartWarehouseApp::new().await));
        start_app("app", move || app.root());
    });
    let _ = MAIN_TASK.set(handle);
}
