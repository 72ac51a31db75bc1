use serde::{Deserialize, Serialize};

// ===== LOCATIONS =====

/// Flat storage location as delivered by the data source.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub id: String,
    pub name: String,
    /// `None` (or a reference to a missing location) makes this a root.
    #[serde(default, alias = "parent_id")]
    pub parent_id: Option<String>,
}

impl LocationRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

// ===== ITEMS =====

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    InStock,
    LowStock,
    OutOfStock,
    Discontinued,
}

impl ItemStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::InStock => "IN Stock",
            ItemStatus::LowStock => "Low Stock",
            ItemStatus::OutOfStock => "Out of Stock",
            ItemStatus::Discontinued => "Discontinued",
        }
    }
}

/// Legacy item payloads nest the picture under `attributes.image_url`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ItemAttributes {
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(alias = "location_id")]
    pub location_id: String,
    #[serde(default, alias = "image_url", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attributes: Option<ItemAttributes>,
}

impl ItemRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        location_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            quantity: 0,
            price: 0.0,
            brand: String::new(),
            status: ItemStatus::InStock,
            location_id: location_id.into(),
            image_url: None,
            attributes: None,
        }
    }

    pub fn with_stock(mut self, quantity: u32, price: f64) -> Self {
        self.quantity = quantity;
        self.price = price;
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Top-level `imageUrl` first, then the nested legacy attribute.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .or_else(|| self.attributes.as_ref()?.image_url.as_deref())
            .filter(|url| !url.trim().is_empty())
    }

    pub fn image_url_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.image_url().unwrap_or(fallback)
    }

    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_accepts_both_parent_key_spellings() {
        let camel: LocationRecord =
            serde_json::from_str(r#"{"id":"B","name":"Shelf","parentId":"A"}"#).unwrap();
        let snake: LocationRecord =
            serde_json::from_str(r#"{"id":"B","name":"Shelf","parent_id":"A"}"#).unwrap();
        let root: LocationRecord =
            serde_json::from_str(r#"{"id":"A","name":"Hall","parentId":null}"#).unwrap();

        assert_eq!(camel.parent_id.as_deref(), Some("A"));
        assert_eq!(camel, snake);
        assert_eq!(root.parent_id, None);
    }

    #[test]
    fn item_defaults_missing_stock_fields() {
        let item: ItemRecord = serde_json::from_str(
            r#"{"id":"i1","name":"Drill","category":"Tools","locationId":"B"}"#,
        )
        .unwrap();

        assert_eq!(item.quantity, 0);
        assert_eq!(item.status, ItemStatus::InStock);
        assert_eq!(item.image_url(), None);
    }

    #[test]
    fn item_reads_nested_legacy_image_url() {
        let item: ItemRecord = serde_json::from_str(
            r#"{"id":"i1","name":"Drill","category":"Tools","location_id":"B",
                "status":"low_stock","attributes":{"image_url":"http://img/drill.png"}}"#,
        )
        .unwrap();

        assert_eq!(item.status, ItemStatus::LowStock);
        assert_eq!(item.image_url(), Some("http://img/drill.png"));
    }

    #[test]
    fn blank_image_url_uses_fallback() {
        let item = ItemRecord::new("i1", "Drill", "Tools", "B").with_image_url("  ");
        assert_eq!(item.image_url_or("fallback.jpg"), "fallback.jpg");
    }

    #[test]
    fn price_is_rendered_with_two_decimals() {
        let item = ItemRecord::new("i1", "Drill", "Tools", "B").with_stock(3, 49.5);
        assert_eq!(item.display_price(), "$49.50");
    }
}
