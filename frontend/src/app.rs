//! SmartWarehouseApp: owns every domain and lays out the screens.

use crate::config::UiConfig;
use crate::connection::{create_connection_message_handler, ConnectionAdapter};
use crate::dataflow::Actor;
use crate::error_display::error_screen;
use crate::inventory::{Inventory, LoadState};
use crate::item_detail::{detail_area, ItemCard};
use crate::login::{login_screen, Session};
use crate::navigation_tree::{navigation_panel, NavigationTree};
use crate::query_state::QueryEngine;
use crate::search_panel::{category_chips, search_panel};
use shared::UpMsg;
use std::sync::Arc;
use zoon::*;

#[derive(Clone, Debug, PartialEq)]
enum Screen {
    Login,
    Failed(String),
    Main,
}

pub struct SmartWarehouseApp {
    pub session: Session,
    pub config: UiConfig,
    pub inventory: Inventory,
    pub query: QueryEngine,

    // === LOCAL UI STATE ===
    pub navigation_tree: NavigationTree,
    pub item_card: ItemCard,

    pub connection: Arc<ConnectionAdapter>,
    _message_handler: Actor<()>,
}

impl SmartWarehouseApp {
    pub async fn new() -> Self {
        let session = Session::new();
        let config = UiConfig::new();
        let inventory = Inventory::new();
        let query = QueryEngine::new(&inventory, &config);

        let (connection, message_handler) = create_connection_message_handler(&inventory, &config);
        let connection = Arc::new(connection);

        // Config first so the breakpoint is known before the records land
        connection.send_up_msg(UpMsg::LoadConfig).await;
        connection.send_up_msg(UpMsg::LoadInventory).await;

        Self {
            session,
            config,
            inventory,
            query,
            navigation_tree: NavigationTree::new(),
            item_card: ItemCard::new(),
            connection,
            _message_handler: message_handler,
        }
    }

    pub fn root(&self) -> impl Element + use<> {
        let screen_signal = map_ref! {
            let entered = self.session.entered_signal(),
            let load_state = self.inventory.load_state_signal() =>
            match (entered, load_state) {
                (false, _) => Screen::Login,
                (true, LoadState::Failed(error)) => Screen::Failed(error.clone()),
                (true, _) => Screen::Main,
            }
        }
        .dedupe_cloned();

        let session = self.session.clone();
        let viewport_resized_relay = self.query.viewport_resized_relay.clone();
        let layout = MainLayout {
            config: self.config.clone(),
            inventory: self.inventory.clone(),
            query: self.query.clone(),
            navigation_tree: self.navigation_tree.clone(),
            item_card: self.item_card.clone(),
        };

        El::new()
            .s(Width::fill())
            .s(Height::screen())
            .on_viewport_size_change(move |width, _height| viewport_resized_relay.send(width))
            .child_signal(screen_signal.map(move |screen| match screen {
                Screen::Login => login_screen(&session).unify(),
                Screen::Failed(error) => error_screen(&error).unify(),
                Screen::Main => layout.render().unify(),
            }))
    }
}

/// Domains the main screen needs, cloned out of the app for the signal closure.
struct MainLayout {
    config: UiConfig,
    inventory: Inventory,
    query: QueryEngine,
    navigation_tree: NavigationTree,
    item_card: ItemCard,
}

impl MainLayout {
    fn render(&self) -> impl Element + use<> {
        let nav_panel = {
            let query = self.query.clone();
            let navigation_tree = self.navigation_tree.clone();
            self.query
                .nav_expanded_signal()
                .map(move |expanded| expanded.then(|| navigation_panel(&query, &navigation_tree)))
        };

        Column::new()
            .s(Width::fill())
            .s(Height::fill())
            .item(header(&self.query))
            .item(
                Row::new()
                    .s(Width::fill())
                    .s(Height::fill())
                    .s(Align::new().top())
                    .item_signal(nav_panel)
                    .item(
                        Column::new()
                            .s(Width::fill())
                            .s(Height::fill())
                            .s(Align::new().top())
                            .s(Padding::all(16))
                            .s(Gap::new().y(12))
                            .s(Scrollbars::y_and_clip_x())
                            .item(search_panel(&self.query))
                            .item(category_chips(&self.inventory, &self.query))
                            .item(detail_area(
                                &self.inventory,
                                &self.query,
                                &self.config,
                                &self.item_card,
                            )),
                    ),
            )
    }
}

fn header(query: &QueryEngine) -> impl Element + use<> {
    let nav_toggle_pressed_relay = query.nav_toggle_pressed_relay.clone();

    Row::new()
        .s(Width::fill())
        .s(Padding::new().x(16).y(10))
        .s(Gap::new().x(12))
        .s(Background::new().color("oklch(30% 0.06 250)"))
        .s(Font::new().color("white"))
        .item(
            Button::new()
                .s(Padding::new().x(10).y(6))
                .s(RoundedCorners::all(6))
                .s(Background::new().color("oklch(40% 0.08 250)"))
                .label_signal(
                    query
                        .nav_expanded_signal()
                        .map(|expanded| if expanded { "✕ Locations" } else { "☰ Locations" }),
                )
                .on_press(move || nav_toggle_pressed_relay.send(())),
        )
        .item(
            El::new()
                .s(Align::new().center_y())
                .s(Font::new().size(18).weight(FontWeight::SemiBold))
                .child("Smart Warehouse"),
        )
}
