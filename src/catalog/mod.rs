//! Armor and artifact catalogs
//!
//! Both catalogs come from the public data repository by default. Either can
//! be pointed at a local file instead, which is how tests and offline use
//! work.

pub mod fetch;
pub mod parse;

pub use fetch::CatalogSource;
pub use parse::{image_url, parse_armor_catalog, parse_artifact_catalog};

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;

use crate::core::error::{OptimizerError, Result};
use crate::gear::{Armor, Artifact};

pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/Saintxc/ArtifactBuildOptimizerData/main/";

/// Catalog locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Root of the data repository; file names and the image directory are
    /// appended to it
    pub base_url: String,
    pub armor_file: String,
    pub artifact_file: String,
    pub image_dir: String,
    /// Local armor document, used instead of the remote one when set
    pub armor_path: Option<PathBuf>,
    /// Local artifact document, used instead of the remote one when set
    pub artifact_path: Option<PathBuf>,
    /// Per-request HTTP timeout
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            armor_file: "armor.json".into(),
            artifact_file: "artifact.json".into(),
            image_dir: "images/".into(),
            armor_path: None,
            artifact_path: None,
            timeout_secs: 10,
        }
    }
}

impl CatalogConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be at least 1".into());
        }
        let needs_remote = self.armor_path.is_none() || self.artifact_path.is_none();
        if needs_remote && self.base_url.trim().is_empty() {
            return Err("base_url is required unless both local paths are set".into());
        }
        Ok(())
    }

    pub fn armor_source(&self) -> CatalogSource {
        CatalogSource::resolve(self.armor_path.as_deref(), self.join(&self.armor_file))
    }

    pub fn artifact_source(&self) -> CatalogSource {
        CatalogSource::resolve(self.artifact_path.as_deref(), self.join(&self.artifact_file))
    }

    /// Prefix for record `image` paths
    pub fn image_base(&self) -> String {
        let mut base = self.join(&self.image_dir);
        if !base.ends_with('/') {
            base.push('/');
        }
        base
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn join(&self, name: &str) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, name)
        } else {
            format!("{}/{}", self.base_url, name)
        }
    }
}

/// Both catalogs, validated and ready for lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    pub armors: Vec<Armor>,
    pub artifacts: Vec<Artifact>,
}

impl Catalog {
    pub fn new(armors: Vec<Armor>, artifacts: Vec<Artifact>) -> Self {
        Self { armors, artifacts }
    }

    /// Fetch and parse both catalogs concurrently
    pub async fn fetch(cfg: &CatalogConfig) -> Result<Self> {
        let client = fetch::http_client(cfg.timeout())?;
        let armor_source = cfg.armor_source();
        let artifact_source = cfg.artifact_source();
        let (armor_json, artifact_json) = tokio::try_join!(
            fetch::read_source(&client, &armor_source),
            fetch::read_source(&client, &artifact_source),
        )?;

        let image_base = cfg.image_base();
        let catalog = Self::new(
            parse_armor_catalog(&armor_json, &image_base)?,
            parse_artifact_catalog(&artifact_json, &image_base)?,
        );
        tracing::info!(
            armor_source = %armor_source,
            artifact_source = %artifact_source,
            armors = catalog.armors.len(),
            artifacts = catalog.artifacts.len(),
            "loaded catalogs"
        );
        Ok(catalog)
    }

    /// Blocking wrapper around [`Catalog::fetch`]
    pub fn load(cfg: &CatalogConfig) -> Result<Self> {
        let rt = Runtime::new()?;
        rt.block_on(Self::fetch(cfg))
    }

    /// Case-insensitive armor lookup
    pub fn find_armor(&self, name: &str) -> Result<&Armor> {
        let name = name.trim();
        self.armors
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| OptimizerError::ArmorNotFound(name.to_string()))
    }

    /// Case-insensitive artifact lookup
    pub fn find_artifact(&self, name: &str) -> Result<&Artifact> {
        let name = name.trim();
        self.artifacts
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| OptimizerError::ArtifactNotFound(name.to_string()))
    }

    /// Resolve a list of artifact names, keeping their order and duplicates
    pub fn find_artifacts<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Artifact>> {
        names
            .iter()
            .map(|name| self.find_artifact(name.as_ref()).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_catalogs(dir: &std::path::Path) -> CatalogConfig {
        let armor_path = dir.join("armor.json");
        let artifact_path = dir.join("artifact.json");
        fs::write(
            &armor_path,
            r#"{"armor": [{"name": "Sunrise Suit", "image": "sunrise.png", "resistances": {"physical": 30}}]}"#,
        )
        .unwrap();
        fs::write(
            &artifact_path,
            r#"{"artifacts": [{"name": "Jellyfish", "stats": {"radio_protection": 2}}, {"name": "Stone Blood"}]}"#,
        )
        .unwrap();
        CatalogConfig {
            armor_path: Some(armor_path),
            artifact_path: Some(artifact_path),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_sources() {
        let cfg = CatalogConfig::default();
        assert_eq!(
            cfg.armor_source(),
            CatalogSource::Remote(format!("{}armor.json", DEFAULT_BASE_URL))
        );
        assert_eq!(cfg.image_base(), format!("{}images/", DEFAULT_BASE_URL));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_base_url_without_trailing_slash() {
        let cfg = CatalogConfig {
            base_url: "http://localhost:8000".into(),
            image_dir: "img".into(),
            ..Default::default()
        };
        assert_eq!(cfg.artifact_source(), CatalogSource::Remote("http://localhost:8000/artifact.json".into()));
        assert_eq!(cfg.image_base(), "http://localhost:8000/img/");
    }

    #[test]
    fn test_validate() {
        let cfg = CatalogConfig { timeout_secs: 0, ..Default::default() };
        assert!(cfg.validate().is_err());
        let cfg = CatalogConfig { base_url: String::new(), ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_load_local_catalogs() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::load(&write_catalogs(dir.path())).unwrap();
        assert_eq!(catalog.armors.len(), 1);
        assert_eq!(catalog.artifacts.len(), 2);
        assert_eq!(
            catalog.armors[0].image_url,
            format!("{}images/sunrise.png", DEFAULT_BASE_URL)
        );
    }

    #[test]
    fn test_missing_local_file() {
        let cfg = CatalogConfig {
            armor_path: Some("no/such/armor.json".into()),
            artifact_path: Some("no/such/artifact.json".into()),
            ..Default::default()
        };
        assert!(matches!(Catalog::load(&cfg), Err(OptimizerError::IoError(_))));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::load(&write_catalogs(dir.path())).unwrap();
        assert_eq!(catalog.find_armor("sunrise suit").unwrap().name, "Sunrise Suit");
        assert_eq!(catalog.find_artifact(" JELLYFISH ").unwrap().name, "Jellyfish");
        assert!(matches!(catalog.find_armor("Exoskeleton"), Err(OptimizerError::ArmorNotFound(_))));

        let picked = catalog.find_artifacts(&["jellyfish", "Jellyfish", "stone blood"]).unwrap();
        assert_eq!(picked.len(), 3);
        assert!(matches!(
            catalog.find_artifacts(&["Moonlight"]),
            Err(OptimizerError::ArtifactNotFound(_))
        ));
    }
}
