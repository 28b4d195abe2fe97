//! Saved query record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::BuiltinQuery;

/// Prefix of user-created ids
pub const CUSTOM_ID_PREFIX: &str = "custom-";

/// A named query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedQuery {
    pub id: String,
    pub name: String,
    pub query: String,
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
    #[serde(default, alias = "isPredefined")]
    pub is_protected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SavedQuery {
    /// New user entry with a fresh `custom-` id
    pub fn custom(name: &str, query: &str) -> Self {
        Self {
            id: format!("{}{}", CUSTOM_ID_PREFIX, Uuid::new_v4()),
            name: name.to_string(),
            query: query.to_string(),
            timestamp: Utc::now(),
            is_protected: false,
            description: None,
        }
    }

    /// Protected entry for a built-in
    pub fn protected(builtin: &BuiltinQuery) -> Self {
        Self {
            id: builtin.id.clone(),
            name: builtin.name.clone(),
            query: builtin.query.clone(),
            timestamp: DateTime::<Utc>::default(),
            is_protected: true,
            description: Some(builtin.description.clone()),
        }
    }

    /// User entry that may be kept across restarts
    pub fn is_custom(&self) -> bool {
        !self.is_protected && self.id.starts_with(CUSTOM_ID_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_id_shape() {
        let q = SavedQuery::custom("Mine", "SELECT 1");
        assert!(q.id.starts_with("custom-"));
        assert!(q.is_custom());
        assert!(Uuid::parse_str(&q.id["custom-".len()..]).is_ok());
    }

    #[test]
    fn test_legacy_flag_alias() {
        let q: SavedQuery = serde_json::from_value(serde_json::json!({
            "id": "custom-1",
            "name": "Old",
            "query": "SELECT 1",
            "isPredefined": true
        }))
        .unwrap();
        assert!(q.is_protected);
        assert!(!q.is_custom());
    }

    #[test]
    fn test_serializes_protected_flag() {
        let q = SavedQuery::custom("Mine", "SELECT 1");
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["isProtected"], false);
        assert!(json.get("description").is_none());
    }
}
