use anyhow::Context;
use shared::AppConfig;
use std::io::ErrorKind;
use std::path::Path;

/// Reads the config at `path`, writing defaults when the file does not exist.
/// A config that needed fixing is saved back; a parse error is returned as is.
pub async fn load_or_create(path: &Path) -> anyhow::Result<AppConfig> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            log::info!("No config at '{}', creating defaults", path.display());
            let config = AppConfig::default();
            save(path, &config)
                .await
                .context("Failed to create default config")?;
            return Ok(config);
        }
        Err(error) => {
            return Err(error).with_context(|| format!("Failed to read '{}'", path.display()));
        }
    };

    let mut config = AppConfig::from_toml_str(&content)?;
    let warnings = config.validate_and_fix();
    if !warnings.is_empty() {
        for warning in &warnings {
            log::warn!("{warning}");
        }
        // Keep the fixed config in memory even when the file can't be updated
        if let Err(error) = save(path, &config).await {
            log::error!("Failed to save fixed config: {error:#}");
        }
    }
    Ok(config)
}

pub async fn save(path: &Path, config: &AppConfig) -> anyhow::Result<()> {
    let toml_content = config.to_toml_string()?;
    let content_with_header = format!(
        "# Smart Warehouse Configuration\n\
         # Data file locations and display preferences\n\
         \n\
         {toml_content}"
    );
    tokio::fs::write(path, content_with_header)
        .await
        .with_context(|| format!("Failed to write '{}'", path.display()))
}
