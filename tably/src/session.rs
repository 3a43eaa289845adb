//! Entry-point parameters
//!
//! A customer arrives by scanning a QR code that encodes
//! `?cafeId=<id>&tableId=<id>`. Both are required before any store I/O
//! happens; a hand-typed or damaged link fails here with a terminal
//! error rather than opening a session against nothing.

use shared::{AppError, AppResult, ErrorCode};

/// The (cafe, table) pair a QR code binds a session to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryParams {
    pub cafe_id: String,
    pub table_id: String,
}

impl EntryParams {
    /// Parse from a raw query string (with or without the leading `?`).
    /// Unknown parameters are ignored.
    pub fn from_query(query: &str) -> AppResult<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut cafe_id = None;
        let mut table_id = None;
        for pair in query.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "cafeId" => cafe_id = Some(value),
                "tableId" => table_id = Some(value),
                _ => {}
            }
        }
        match (cafe_id, table_id) {
            (Some(cafe), Some(table)) if !cafe.is_empty() && !table.is_empty() => Ok(Self {
                cafe_id: cafe.to_string(),
                table_id: table.to_string(),
            }),
            _ => Err(AppError::with_message(
                ErrorCode::InvalidEntryParams,
                "Entry link must carry both cafeId and tableId",
            )),
        }
    }
}
