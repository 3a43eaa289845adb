//! Service request ("call server") model

use serde::{Deserialize, Serialize};

/// What kind of assistance was requested
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RequestKind {
    #[default]
    #[serde(rename = "server-call")]
    ServerCall,
}

/// Lifecycle of a service request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Raised by the customer, visible on the dashboard
    #[default]
    New,
    /// Acknowledged by staff; drops out of the live query, retained for purge
    Done,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::New => "new",
            RequestStatus::Done => "done",
        }
    }
}

/// Customer-initiated, staff-acknowledged alert, independent of any order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub id: String,
    pub cafe_id: String,
    pub table_id: String,
    #[serde(rename = "type")]
    pub kind: RequestKind,
    pub status: RequestStatus,
    pub created_at: String,
}
