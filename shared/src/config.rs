use crate::error::ConfigError;
use crate::query::{TreeScope, MOBILE_BREAKPOINT_PX};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_PATH: &str = "smart_warehouse.toml";

pub const DEFAULT_FALLBACK_IMAGE_URL: &str = "https://m.media-amazon.com/images/I/41-T3GBGYUL.jpg";

/// Narrower than this is treated as a misconfiguration, not a phone.
const MIN_BREAKPOINT_PX: u32 = 320;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub data: DataSection,
    #[serde(default)]
    pub ui: UiSection,
}

// Version of the config file format, drives migration on load
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppSection {
    pub version: String,
}

impl AppSection {
    pub const CURRENT_VERSION: &'static str = "1.0.0";

    pub fn get_migration_strategy(&self) -> MigrationStrategy {
        match self.version.as_str() {
            "1.0.0" => MigrationStrategy::None,
            "0.9.0" => MigrationStrategy::Upgrade("0.9.0 -> 1.0.0".to_string()),
            _ => MigrationStrategy::Recreate,
        }
    }
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MigrationStrategy {
    None,
    Upgrade(String),
    Recreate,
}

/// Where the backend reads its record sets from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DataSection {
    pub items_path: String,
    pub locations_path: String,
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            items_path: "inventory/items.json".to_string(),
            locations_path: "inventory/locations.json".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UiSection {
    pub mobile_breakpoint_px: u32,
    #[serde(default)]
    pub tree_scope: TreeScope,
    pub fallback_image_url: String,
}

impl Default for UiSection {
    fn default() -> Self {
        Self {
            mobile_breakpoint_px: MOBILE_BREAKPOINT_PX,
            tree_scope: TreeScope::default(),
            fallback_image_url: DEFAULT_FALLBACK_IMAGE_URL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Migrates old versions and repairs out-of-range values in place.
    /// Returns one warning per change, empty when the config was already valid.
    pub fn validate_and_fix(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        match self.app.get_migration_strategy() {
            MigrationStrategy::None => {}
            MigrationStrategy::Upgrade(path) => {
                warnings.push(format!("Config migrated {path}"));
                self.app.version = AppSection::CURRENT_VERSION.to_string();
            }
            MigrationStrategy::Recreate => {
                warnings.push(format!(
                    "Unsupported config version '{}', recreated with defaults",
                    self.app.version
                ));
                *self = AppConfig::default();
                return warnings;
            }
        }

        if self.ui.mobile_breakpoint_px < MIN_BREAKPOINT_PX {
            warnings.push(format!(
                "mobile_breakpoint_px {} is below {MIN_BREAKPOINT_PX}, reset to {MOBILE_BREAKPOINT_PX}",
                self.ui.mobile_breakpoint_px
            ));
            self.ui.mobile_breakpoint_px = MOBILE_BREAKPOINT_PX;
        }

        if self.ui.fallback_image_url.trim().is_empty() {
            warnings.push("fallback_image_url was empty, restored default".to_string());
            self.ui.fallback_image_url = DEFAULT_FALLBACK_IMAGE_URL.to_string();
        }

        let defaults = DataSection::default();
        if self.data.items_path.trim().is_empty() {
            warnings.push(format!("items_path was empty, reset to {}", defaults.items_path));
            self.data.items_path = defaults.items_path;
        }
        if self.data.locations_path.trim().is_empty() {
            warnings.push(format!("locations_path was empty, reset to {}", defaults.locations_path));
            self.data.locations_path = defaults.locations_path;
        }

        warnings
    }
}
