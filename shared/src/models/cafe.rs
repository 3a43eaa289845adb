//! Cafe model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Occupancy state of a single table
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TableState {
    #[default]
    Vacant,
    Occupied,
}

/// Versioned occupancy register for one table
///
/// Occupancy is mutated by two independent writers without locking
/// (order submission sets Occupied, the Paid transition sets Vacant).
/// The version is bumped on every flip so a concurrent double-submission
/// against the same table is detectable: two active orders carrying the
/// same cycle number landed inside one occupancy cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TableCell {
    pub status: TableState,
    pub version: u64,
}

impl TableCell {
    /// The cell written by an order submission. Only a Vacant -> Occupied
    /// flip starts a new cycle; a further order against an occupied table
    /// lands in the current cycle, which is what makes double-booking
    /// detectable.
    pub fn occupied(&self) -> Self {
        Self {
            status: TableState::Occupied,
            version: match self.status {
                TableState::Vacant => self.version + 1,
                TableState::Occupied => self.version,
            },
        }
    }

    /// The cell written by the Paid transition
    pub fn vacated(&self) -> Self {
        Self {
            status: TableState::Vacant,
            version: self.version + 1,
        }
    }

    pub fn is_vacant(&self) -> bool {
        self.status == TableState::Vacant
    }
}

/// Cafe entity: a tenant/site with its own menu, tables and owner
///
/// The cafe document is the sole source of truth for table occupancy.
/// Owner credentials are stored in plaintext because the owner account is
/// mirrored in the identity provider; login cross-checks the stored pair
/// before delegating.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cafe {
    pub id: String,
    pub name: String,
    pub address: String,
    /// Table identifier ("T1") to occupancy cell. Keys must never collide;
    /// the owner may add or remove tables.
    pub table_status: BTreeMap<String, TableCell>,
    pub table_count: u32,
    /// Identity-provider uid of the owner, `"pending"` until first login
    pub owner_user_id: String,
    pub owner_username: String,
    pub owner_password: String,
    pub created_at: String,
}

/// Sentinel owner uid before the owner has logged in for the first time
pub const PENDING_OWNER: &str = "pending";

impl Cafe {
    /// Whether the owner account has been linked to a provider uid
    pub fn owner_linked(&self) -> bool {
        self.owner_user_id != PENDING_OWNER
    }

    /// Look up a table's occupancy cell
    pub fn table(&self, table_id: &str) -> Option<TableCell> {
        self.table_status.get(table_id).copied()
    }
}

/// Payload for onboarding a new cafe from the admin console
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CafeCreate {
    pub name: String,
    pub address: String,
    pub table_count: u32,
}
