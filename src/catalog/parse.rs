//! Catalog documents to validated records
//!
//! A bad record never sinks the whole catalog: it is logged and skipped.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::error::{OptimizerError, Result};
use crate::gear::{Armor, Artifact};

pub const ARMOR_ROOT_KEY: &str = "armor";
pub const ARTIFACT_ROOT_KEY: &str = "artifacts";

/// Parse an armor document (`{"armor": [...]}`)
pub fn parse_armor_catalog(json: &str, image_base: &str) -> Result<Vec<Armor>> {
    let mut armors: Vec<Armor> = parse_records(json, ARMOR_ROOT_KEY)?;
    for armor in &mut armors {
        armor.image_url = image_url(image_base, &armor.image);
        armor.normalize();
    }
    Ok(armors)
}

/// Parse an artifact document (`{"artifacts": [...]}`)
pub fn parse_artifact_catalog(json: &str, image_base: &str) -> Result<Vec<Artifact>> {
    let mut artifacts: Vec<Artifact> = parse_records(json, ARTIFACT_ROOT_KEY)?;
    for artifact in &mut artifacts {
        artifact.image_url = image_url(image_base, &artifact.image);
    }
    Ok(artifacts)
}

/// Absolute image location, or empty when the record has no image
pub fn image_url(image_base: &str, image: &str) -> String {
    if image.is_empty() {
        String::new()
    } else {
        format!("{}{}", image_base, image)
    }
}

trait Named {
    fn name(&self) -> &str;
}

impl Named for Armor {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Artifact {
    fn name(&self) -> &str {
        &self.name
    }
}

fn parse_records<T: DeserializeOwned + Named>(json: &str, root_key: &str) -> Result<Vec<T>> {
    let document: Value = serde_json::from_str(json)?;
    let Some(root) = document.as_object() else {
        return Err(OptimizerError::CatalogError("document root is not an object".into()));
    };
    let records = match root.get(root_key) {
        None | Some(Value::Null) => {
            tracing::warn!(root_key, "catalog has no records");
            return Ok(Vec::new());
        }
        Some(Value::Array(records)) => records,
        Some(_) => {
            return Err(OptimizerError::CatalogError(format!("\"{}\" is not a list", root_key)));
        }
    };

    let mut parsed = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match T::deserialize(record) {
            Ok(item) if item.name().trim().is_empty() => {
                tracing::warn!(root_key, index, "skipping record without a name");
            }
            Ok(item) => parsed.push(item),
            Err(e) => {
                tracing::warn!(root_key, index, error = %e, "skipping malformed record");
            }
        }
    }
    tracing::debug!(root_key, kept = parsed.len(), total = records.len(), "parsed catalog");
    Ok(parsed)
}
