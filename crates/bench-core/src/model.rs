//! Synthetic records written by the benchmark.

use crate::document::Document;
use serde::{Deserialize, Serialize};

/// Postal address embedded in a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    /// Optional secondary line (apartment, suite).
    pub line2: Option<String>,
    pub city: String,
    pub country: String,
    pub zip: String,
}

/// User record, one document per insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    /// Assigned by the store on insert; absent on a fresh record.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    pub address: Address,
    /// Friend usernames, in generation order.
    pub friends: Vec<String>,
    pub last_message: String,
}

impl Document for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn clear_id(&mut self) {
        self.id = None;
    }
}
