use moon::*;
use shared::config::CONFIG_FILE_PATH;
use shared::{AppConfig, DownMsg, UpMsg};
use std::path::Path;

mod inventory;
mod settings;

async fn frontend() -> Frontend {
    Frontend::new()
        .title("Smart Warehouse")
        .index_by_robots(false)
}

async fn up_msg_handler(req: UpMsgRequest<UpMsg>) {
    let (session_id, cor_id) = (req.session_id, req.cor_id);
    log::debug!("Received {:?}", req.up_msg);

    match &req.up_msg {
        UpMsg::LoadConfig => {
            load_config(session_id, cor_id).await;
        }
        UpMsg::LoadInventory => {
            load_inventory(session_id, cor_id).await;
        }
    }
}

async fn load_config(session_id: SessionId, cor_id: CorId) {
    let down_msg = match settings::load_or_create(Path::new(CONFIG_FILE_PATH)).await {
        Ok(config) => DownMsg::ConfigLoaded(config.ui),
        Err(error) => {
            log::error!("{error:#}");
            DownMsg::ConfigError(format!("{error:#}"))
        }
    };
    send_down_msg(down_msg, session_id, cor_id).await;
}

async fn load_inventory(session_id: SessionId, cor_id: CorId) {
    // A broken config still lets the default data paths be tried
    let config = settings::load_or_create(Path::new(CONFIG_FILE_PATH))
        .await
        .unwrap_or_else(|error| {
            log::warn!("Using default data paths: {error:#}");
            AppConfig::default()
        });

    let down_msg = match inventory::load_inventory(&config.data).await {
        Ok(inventory) => DownMsg::InventoryLoaded {
            locations: inventory.locations,
            items: inventory.items,
        },
        Err(error) => {
            log::error!("{error}");
            DownMsg::InventoryError(error.to_string())
        }
    };
    send_down_msg(down_msg, session_id, cor_id).await;
}

async fn send_down_msg(msg: DownMsg, session_id: SessionId, cor_id: CorId) {
    if let Some(session) = sessions::by_session_id().wait_for(session_id).await {
        session.send_down_msg(&msg, cor_id).await;
    } else {
        log::warn!("Session disconnected before the reply");
    }
}

#[moon::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    start(frontend, up_msg_handler, |_| {}).await
}
