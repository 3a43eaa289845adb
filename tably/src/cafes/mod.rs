//! Cafe onboarding and settings
//!
//! Admin side: create a cafe with generated owner credentials and a
//! vacant table map. Owner side: update display details, add and remove
//! tables. Table keys must never collide; adds are rejected when the key
//! already exists.

use crate::store::{server_timestamp, DocumentStore, WriteBatch};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::json;
use shared::models::{collections, Cafe, CafeCreate, TableCell, PENDING_OWNER};
use shared::{AppError, AppResult, ErrorCode};

/// Generated owner login pair, mirrored into the identity provider at
/// first login
#[derive(Debug, Clone)]
pub struct OwnerCredentials {
    pub username: String,
    pub password: String,
}

/// Generate a fresh credential pair for a new cafe
pub fn generate_credentials() -> OwnerCredentials {
    let mut rng = rand::thread_rng();
    let suffix: String = (&mut rng)
        .sample_iter(Alphanumeric)
        .take(6)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect();
    let password: String = (&mut rng)
        .sample_iter(Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    OwnerCredentials {
        username: format!("cafe_{}", suffix),
        password,
    }
}

/// Onboard a new cafe: tables T1..Tn vacant, owner uid pending until the
/// owner's first login links it.
pub async fn onboard_cafe(store: &DocumentStore, payload: &CafeCreate) -> AppResult<Cafe> {
    if payload.name.trim().is_empty() || payload.address.trim().is_empty() {
        return Err(AppError::invalid_argument("Cafe name and address are required"));
    }
    if payload.table_count == 0 {
        return Err(AppError::invalid_argument("A cafe needs at least one table"));
    }

    let credentials = generate_credentials();
    let mut table_status = serde_json::Map::new();
    for i in 1..=payload.table_count {
        table_status.insert(
            format!("T{}", i),
            serde_json::to_value(TableCell::default())
                .map_err(|e| AppError::internal(e.to_string()))?,
        );
    }

    let id = store
        .add(
            collections::CAFES,
            json!({
                "name": payload.name,
                "address": payload.address,
                "tableCount": payload.table_count,
                "tableStatus": table_status,
                "ownerUsername": credentials.username,
                "ownerPassword": credentials.password,
                "ownerUserId": PENDING_OWNER,
                "createdAt": server_timestamp(),
            }),
        )
        .await?;
    tracing::info!(cafe_id = %id, name = %payload.name, "cafe onboarded");

    let doc = store
        .get(collections::CAFES, &id)
        .await
        .ok_or_else(|| AppError::store("cafe vanished after commit"))?;
    serde_json::from_value(doc).map_err(|e| AppError::store(e.to_string()))
}

/// Owner settings: update the display name and address
pub async fn update_details(
    store: &DocumentStore,
    cafe_id: &str,
    name: &str,
    address: &str,
) -> AppResult<()> {
    if name.trim().is_empty() || address.trim().is_empty() {
        return Err(AppError::invalid_argument("Cafe name and address are required"));
    }
    store
        .commit(WriteBatch::new().update(
            collections::CAFES,
            cafe_id,
            vec![
                ("name".to_string(), json!(name)),
                ("address".to_string(), json!(address)),
            ],
        ))
        .await
}

/// Add a table with a fresh vacant cell. Colliding keys are rejected so
/// one physical table is never represented twice.
pub async fn add_table(store: &DocumentStore, cafe_id: &str, table_id: &str) -> AppResult<()> {
    let table_id = table_id.trim();
    if table_id.is_empty() || table_id.contains('.') {
        return Err(AppError::invalid_argument("Invalid table name"));
    }
    let cafe = fetch(store, cafe_id).await?;
    if cafe.table(table_id).is_some() {
        return Err(AppError::already_exists(format!("Table {}", table_id)));
    }
    store
        .commit(WriteBatch::new().update(
            collections::CAFES,
            cafe_id,
            vec![(
                format!("tableStatus.{}", table_id),
                serde_json::to_value(TableCell::default())
                    .map_err(|e| AppError::internal(e.to_string()))?,
            )],
        ))
        .await
}

/// Remove a table from the occupancy map entirely
pub async fn remove_table(store: &DocumentStore, cafe_id: &str, table_id: &str) -> AppResult<()> {
    let cafe = fetch(store, cafe_id).await?;
    if cafe.table(table_id).is_none() {
        return Err(AppError::with_message(
            ErrorCode::TableNotFound,
            format!("Table \"{}\" not found", table_id),
        ));
    }
    store
        .commit(WriteBatch::new().update_delete_field(
            collections::CAFES,
            cafe_id,
            format!("tableStatus.{}", table_id),
        ))
        .await
}

async fn fetch(store: &DocumentStore, cafe_id: &str) -> AppResult<Cafe> {
    let doc = store
        .get(collections::CAFES, cafe_id)
        .await
        .ok_or_else(|| AppError::new(ErrorCode::CafeNotFound))?;
    serde_json::from_value(doc).map_err(|e| AppError::store(e.to_string()))
}
