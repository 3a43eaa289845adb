//! Menu management (owner surface)
//!
//! CRUD over the `menuItems` collection. `available` only gates what
//! customers see; the owner's own listing is filtered by cafe alone.
//! Edits never propagate into historical orders, which carry frozen
//! snapshots.

use crate::store::{DocumentStore, Query, WriteBatch};
use serde_json::{json, Value};
use shared::models::{collections, MenuItem, MenuItemCreate, MenuItemUpdate};
use shared::{AppError, AppResult, ErrorCode};

/// Standing query for the customer menu: available items for one cafe,
/// sorted by category for the grouped listing.
pub fn customer_menu_query(cafe_id: &str) -> Query {
    Query::collection(collections::MENU_ITEMS)
        .where_eq("cafeId", cafe_id)
        .where_eq("available", true)
        .order_by_asc("category")
        .order_by_asc("name")
}

/// Standing query for the owner's management view: every item, available
/// or not.
pub fn owner_menu_query(cafe_id: &str) -> Query {
    Query::collection(collections::MENU_ITEMS)
        .where_eq("cafeId", cafe_id)
        .order_by_asc("category")
        .order_by_asc("name")
}

/// Base price and every modifier adjustment must be non-negative
fn validate_prices(payload: &MenuItemCreate) -> AppResult<()> {
    let adjustments_ok = payload
        .modifiers
        .iter()
        .flat_map(|g| g.options.iter())
        .all(|opt| opt.price_adjustment >= 0.0);
    if payload.price < 0.0 || !adjustments_ok {
        return Err(AppError::new(ErrorCode::NegativePrice));
    }
    Ok(())
}

/// Create a menu item for a cafe
pub async fn create_item(
    store: &DocumentStore,
    cafe_id: &str,
    payload: &MenuItemCreate,
) -> AppResult<MenuItem> {
    if payload.name.trim().is_empty() {
        return Err(AppError::invalid_argument("Item name is required"));
    }
    validate_prices(payload)?;

    let mut doc = serde_json::to_value(payload).map_err(|e| AppError::internal(e.to_string()))?;
    if let Some(obj) = doc.as_object_mut() {
        obj.insert("cafeId".to_string(), json!(cafe_id));
    }
    let id = store.add(collections::MENU_ITEMS, doc).await?;

    let doc = store
        .get(collections::MENU_ITEMS, &id)
        .await
        .ok_or_else(|| AppError::store("menu item vanished after commit"))?;
    serde_json::from_value(doc).map_err(|e| AppError::store(e.to_string()))
}

/// Apply a partial update to a menu item
pub async fn update_item(
    store: &DocumentStore,
    item_id: &str,
    payload: &MenuItemUpdate,
) -> AppResult<()> {
    if let Some(price) = payload.price {
        if price < 0.0 {
            return Err(AppError::new(ErrorCode::NegativePrice));
        }
    }
    let mut fields: Vec<(String, Value)> = Vec::new();
    if let Some(name) = &payload.name {
        fields.push(("name".to_string(), json!(name)));
    }
    if let Some(description) = &payload.description {
        fields.push(("description".to_string(), json!(description)));
    }
    if let Some(price) = payload.price {
        fields.push(("price".to_string(), json!(price)));
    }
    if let Some(category) = &payload.category {
        fields.push(("category".to_string(), json!(category)));
    }
    if let Some(available) = payload.available {
        fields.push(("available".to_string(), json!(available)));
    }
    if let Some(modifiers) = &payload.modifiers {
        fields.push((
            "modifiers".to_string(),
            serde_json::to_value(modifiers).map_err(|e| AppError::internal(e.to_string()))?,
        ));
    }
    if let Some(image_url) = &payload.image_url {
        fields.push(("imageUrl".to_string(), json!(image_url)));
    }
    if fields.is_empty() {
        return Ok(());
    }
    store
        .commit(WriteBatch::new().update(collections::MENU_ITEMS, item_id, fields))
        .await
        .map_err(|err| {
            if err.code == ErrorCode::NotFound {
                AppError::new(ErrorCode::MenuItemNotFound)
            } else {
                err
            }
        })
}

/// One-click availability toggle from the management list
pub async fn set_available(store: &DocumentStore, item_id: &str, available: bool) -> AppResult<()> {
    update_item(
        store,
        item_id,
        &MenuItemUpdate {
            available: Some(available),
            ..Default::default()
        },
    )
    .await
}

/// Delete a menu item. Historical orders keep their frozen snapshot.
pub async fn delete_item(store: &DocumentStore, item_id: &str) -> AppResult<()> {
    store
        .commit(WriteBatch::new().delete(collections::MENU_ITEMS, item_id))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{ModifierGroup, ModifierOption, SelectionKind};

    fn latte_payload() -> MenuItemCreate {
        MenuItemCreate {
            name: "Latte".into(),
            description: "Espresso with steamed milk".into(),
            price: 4.0,
            category: "Beverages".into(),
            available: true,
            modifiers: vec![ModifierGroup {
                name: "Milk".into(),
                kind: SelectionKind::Radio,
                options: vec![
                    ModifierOption {
                        label: "Whole".into(),
                        price_adjustment: 0.0,
                    },
                    ModifierOption {
                        label: "Oat".into(),
                        price_adjustment: 0.5,
                    },
                ],
            }],
        image_url: None,
        }
    }

    #[tokio::test]
    async fn customers_only_see_available_items() {
        let store = DocumentStore::new();
        let item = create_item(&store, "c1", &latte_payload()).await.unwrap();
        let mut hidden = latte_payload();
        hidden.name = "Seasonal Special".into();
        hidden.available = false;
        create_item(&store, "c1", &hidden).await.unwrap();
        // Another cafe's item never leaks in
        create_item(&store, "c2", &latte_payload()).await.unwrap();

        let customer = store.run_query(&customer_menu_query("c1")).await;
        assert_eq!(customer.len(), 1);
        assert_eq!(customer[0]["name"], "Latte");

        let owner = store.run_query(&owner_menu_query("c1")).await;
        assert_eq!(owner.len(), 2);

        set_available(&store, &item.id, false).await.unwrap();
        assert!(store.run_query(&customer_menu_query("c1")).await.is_empty());
    }

    #[tokio::test]
    async fn negative_prices_are_rejected() {
        let store = DocumentStore::new();
        let mut bad = latte_payload();
        bad.price = -1.0;
        let err = create_item(&store, "c1", &bad).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NegativePrice);

        let mut bad = latte_payload();
        bad.modifiers[0].options[1].price_adjustment = -0.5;
        let err = create_item(&store, "c1", &bad).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NegativePrice);

        let item = create_item(&store, "c1", &latte_payload()).await.unwrap();
        let err = update_item(
            &store,
            &item.id,
            &MenuItemUpdate {
                price: Some(-0.1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NegativePrice);
    }

    #[tokio::test]
    async fn update_and_delete_round_trip() {
        let store = DocumentStore::new();
        let item = create_item(&store, "c1", &latte_payload()).await.unwrap();

        update_item(
            &store,
            &item.id,
            &MenuItemUpdate {
                price: Some(4.5),
                description: Some("New recipe".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let updated: MenuItem =
            serde_json::from_value(store.get(collections::MENU_ITEMS, &item.id).await.unwrap())
                .unwrap();
        assert_eq!(updated.price, 4.5);
        assert_eq!(updated.description, "New recipe");
        // Untouched fields survive a partial update
        assert_eq!(updated.modifiers.len(), 1);

        delete_item(&store, &item.id).await.unwrap();
        assert!(store.get(collections::MENU_ITEMS, &item.id).await.is_none());

        let err = update_item(
            &store,
            &item.id,
            &MenuItemUpdate {
                price: Some(5.0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuItemNotFound);
    }
}
