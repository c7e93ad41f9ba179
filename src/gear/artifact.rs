//! Artifact records

use serde::{Deserialize, Serialize};

use super::stats::{ArtifactStats, StatKey};

/// An artifact as published by the data source
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Artifact {
    pub name: String,
    pub stats: ArtifactStats,
    pub image: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Artifact {
    pub fn new(name: impl Into<String>, stats: ArtifactStats) -> Self {
        Self {
            name: name.into(),
            stats,
            ..Default::default()
        }
    }

    pub fn bonus(&self, key: StatKey) -> i32 {
        self.stats.bonus(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_artifact() {
        let art: Artifact = serde_json::from_str(
            r#"{"name": "Jellyfish", "stats": {"radio_protection": 3, "weight": 1}, "image": "jelly.png"}"#,
        )
        .unwrap();
        assert_eq!(art.name, "Jellyfish");
        assert_eq!(art.bonus(StatKey::RadioProtection), 20);
        assert_eq!(art.bonus(StatKey::Weight), 10);
        assert_eq!(art.description, None);
    }

    #[test]
    fn test_missing_stats_default_to_zero() {
        let art: Artifact = serde_json::from_str(r#"{"name": "Pebble"}"#).unwrap();
        assert_eq!(art.stats.present().count(), 0);
    }
}
