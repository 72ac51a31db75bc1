use crate::config::UiConfig;
use crate::dataflow::Actor;
use crate::error_display::log_error_console_only;
use crate::inventory::Inventory;
use futures::stream::StreamExt;
use shared::{DownMsg, UpMsg};
use zoon::*;

/// Turns the callback-based `Connection` into a stream of `DownMsg`s.
pub struct ConnectionAdapter {
    connection: Connection<UpMsg, DownMsg>,
}

impl ConnectionAdapter {
    pub fn new() -> (Self, impl futures::stream::Stream<Item = DownMsg>) {
        let (message_sender, message_stream) = futures::channel::mpsc::unbounded();

        let connection = Connection::new(move |down_msg, _| {
            let _ = message_sender.unbounded_send(down_msg);
        });

        (ConnectionAdapter { connection }, message_stream)
    }

    pub async fn send_up_msg(&self, up_msg: UpMsg) {
        if let Err(error) = self.connection.send_up_msg(up_msg).await {
            log_error_console_only("Failed to send message", &format!("{error:?}"));
        }
    }
}

/// Routes every incoming `DownMsg` to the relay of the domain that owns it.
pub fn create_connection_message_handler(
    inventory: &Inventory,
    config: &UiConfig,
) -> (ConnectionAdapter, Actor<()>) {
    let (connection_adapter, mut down_msg_stream) = ConnectionAdapter::new();

    let records_received_relay = inventory.records_received_relay.clone();
    let load_failed_relay = inventory.load_failed_relay.clone();
    let config_loaded_relay = config.config_loaded_relay.clone();

    let message_handler = Actor::new((), async move |_state| {
        while let Some(down_msg) = down_msg_stream.next().await {
            match down_msg {
                DownMsg::ConfigLoaded(ui) => config_loaded_relay.send(ui),
                DownMsg::ConfigError(error) => {
                    log_error_console_only("Config error, keeping defaults", &error);
                }
                DownMsg::InventoryLoaded { locations, items } => {
                    records_received_relay.send((locations, items));
                }
                DownMsg::InventoryError(error) => load_failed_relay.send(error),
            }
        }
    });

    (connection_adapter, message_handler)
}
