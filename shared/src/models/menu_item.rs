//! Menu item model

use serde::{Deserialize, Serialize};

/// How many options a modifier group allows
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    /// Exactly one option
    Radio,
    /// Zero or more options
    Checkbox,
}

/// One selectable value within a modifier group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModifierOption {
    pub label: String,
    /// Non-negative price delta, defaults to 0
    #[serde(default)]
    pub price_adjustment: f64,
}

/// A named axis of customization on a menu item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModifierGroup {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SelectionKind,
    pub options: Vec<ModifierOption>,
}

/// Menu item entity
///
/// `available` gates visibility to customers only; the owner always sees
/// all items for the cafe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub cafe_id: String,
    pub name: String,
    pub description: String,
    /// Base price in currency unit, non-negative
    pub price: f64,
    /// Free-text grouping key for the menu listing
    pub category: String,
    pub available: bool,
    #[serde(default)]
    pub modifiers: Vec<ModifierGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl MenuItem {
    /// Whether this item requires the customization flow before add-to-cart
    pub fn has_modifiers(&self) -> bool {
        !self.modifiers.is_empty()
    }
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub available: bool,
    #[serde(default)]
    pub modifiers: Vec<ModifierGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Update menu item payload (all fields optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub available: Option<bool>,
    pub modifiers: Option<Vec<ModifierGroup>>,
    pub image_url: Option<String>,
}
