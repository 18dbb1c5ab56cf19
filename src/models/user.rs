// src/models/user.rs

use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// The author of a post as embedded in feed responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,

    /// Display name.
    pub name: String,

    /// Unique handle, without the leading '@'.
    pub username: String,

    #[serde(default)]
    pub avatar: Option<String>,
}
