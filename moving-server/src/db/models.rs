//! Box record models

use serde::{Deserialize, Serialize};

/// A registered moving box
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BoxRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Declared value in whole currency units
    pub value: i64,
    /// Username of whoever registered the box
    pub owner: String,
    /// Creation time (unix millis)
    pub created_at: i64,
}

/// Fields needed to insert a new box
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBox {
    pub title: String,
    pub description: String,
    pub value: i64,
    pub owner: String,
    pub created_at: i64,
}
