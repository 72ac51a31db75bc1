use shared::{DataSection, ItemRecord, LocationRecord};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Inventory {
    pub locations: Vec<LocationRecord>,
    pub items: Vec<ItemRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to fetch items: {0}")]
    Items(#[source] FetchError),
    #[error("Failed to fetch locations: {0}")]
    Locations(#[source] FetchError),
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Items first, then locations. The first failure wins.
pub async fn load_inventory(data: &DataSection) -> Result<Inventory, LoadError> {
    let items = read_file(Path::new(&data.items_path))
        .await
        .and_then(|content| Ok(parse_items(&content)?))
        .map_err(LoadError::Items)?;

    let locations = read_file(Path::new(&data.locations_path))
        .await
        .and_then(|content| Ok(parse_locations(&content)?))
        .map_err(LoadError::Locations)?;

    log::info!(
        "Loaded {} items and {} locations",
        items.len(),
        locations.len()
    );
    Ok(Inventory { locations, items })
}

async fn read_file(path: &Path) -> Result<String, FetchError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FetchError::Read {
            path: path.to_path_buf(),
            source,
        })
}

pub fn parse_items(content: &str) -> Result<Vec<ItemRecord>, serde_json::Error> {
    serde_json::from_str(content)
}

pub fn parse_locations(content: &str) -> Result<Vec<LocationRecord>, serde_json::Error> {
    serde_json::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ItemStatus;

    const ITEMS: &str = r#"[
        {"id":"i1","name":"Cordless Drill","category":"Tools","quantity":4,"price":89.99,
         "brand":"Makita","status":"low_stock","locationId":"B","imageUrl":"http://img/1.jpg"},
        {"id":"i2","name":"Gloves","category":"Apparel","location_id":"C",
         "attributes":{"image_url":"http://img/2.jpg"}}
    ]"#;

    const LOCATIONS: &str = r#"[
        {"id":"A","name":"Warehouse","parentId":null},
        {"id":"B","name":"Aisle 1","parentId":"A"},
        {"id":"C","name":"Aisle 2","parent_id":"A"}
    ]"#;

    fn write_inventory(dir: &Path, items: Option<&str>, locations: Option<&str>) -> DataSection {
        let data = DataSection {
            items_path: dir.join("items.json").display().to_string(),
            locations_path: dir.join("locations.json").display().to_string(),
        };
        if let Some(items) = items {
            std::fs::write(&data.items_path, items).unwrap();
        }
        if let Some(locations) = locations {
            std::fs::write(&data.locations_path, locations).unwrap();
        }
        data
    }

    #[test]
    fn parses_both_key_spellings() {
        let items = parse_items(ITEMS).unwrap();
        let locations = parse_locations(LOCATIONS).unwrap();

        assert_eq!(items[0].location_id, "B");
        assert_eq!(items[0].status, ItemStatus::LowStock);
        assert_eq!(items[1].location_id, "C");
        assert_eq!(items[1].image_url(), Some("http://img/2.jpg"));
        assert_eq!(locations[0].parent_id, None);
        assert_eq!(locations[2].parent_id.as_deref(), Some("A"));
    }

    #[test]
    fn rejects_non_array_payload() {
        assert!(parse_items(r#"{"id":"i1"}"#).is_err());
    }

    #[tokio::test]
    async fn loads_both_record_sets() {
        let dir = tempfile::tempdir().unwrap();
        let data = write_inventory(dir.path(), Some(ITEMS), Some(LOCATIONS));

        let inventory = load_inventory(&data).await.unwrap();

        assert_eq!(inventory.items.len(), 2);
        assert_eq!(inventory.locations.len(), 3);
    }

    #[tokio::test]
    async fn items_failure_is_reported_before_locations() {
        let dir = tempfile::tempdir().unwrap();
        let data = write_inventory(dir.path(), None, None);

        let error = load_inventory(&data).await.unwrap_err();

        assert!(matches!(error, LoadError::Items(FetchError::Read { .. })));
        assert!(error.to_string().starts_with("Failed to fetch items: "));
    }

    #[tokio::test]
    async fn malformed_locations_name_the_locations_file() {
        let dir = tempfile::tempdir().unwrap();
        let data = write_inventory(dir.path(), Some(ITEMS), Some("[{\"id\":"));

        let error = load_inventory(&data).await.unwrap_err();

        assert!(matches!(error, LoadError::Locations(FetchError::Parse(_))));
        assert!(error.to_string().starts_with("Failed to fetch locations: invalid JSON"));
    }
}
