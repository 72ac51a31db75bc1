//! Display settings received from the backend config.

use crate::dataflow::{relay, Actor, Relay};
use futures::StreamExt;
use shared::{TreeScope, UiSection};
use zoon::*;

/// Starts from the built-in defaults; a `ConfigLoaded` replaces them.
#[derive(Clone, Debug)]
pub struct UiConfig {
    section: Actor<UiSection>,
    pub config_loaded_relay: Relay<UiSection>,
}

impl UiConfig {
    pub fn new() -> Self {
        let (config_loaded_relay, mut config_loaded) = relay();

        let section = Actor::new(UiSection::default(), async move |state| {
            while let Some(section) = config_loaded.next().await {
                state.set_neq(section);
            }
        });

        Self {
            section,
            config_loaded_relay,
        }
    }

    pub fn breakpoint_signal(&self) -> impl Signal<Item = u32> + use<> {
        self.section.signal_ref(|ui| ui.mobile_breakpoint_px).dedupe()
    }

    pub fn tree_scope_signal(&self) -> impl Signal<Item = TreeScope> + use<> {
        self.section.signal_ref(|ui| ui.tree_scope).dedupe()
    }

    pub fn fallback_image_signal(&self) -> impl Signal<Item = String> + use<> {
        self.section
            .signal_ref(|ui| ui.fallback_image_url.clone())
            .dedupe_cloned()
    }
}
