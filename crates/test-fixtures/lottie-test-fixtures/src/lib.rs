use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../../../fixtures/manifest.json"))
        .expect("fixtures/manifest.json is malformed")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    properties: HashMap<String, PropertyEntry>,
    vectors: HashMap<String, String>,
}

/// Which property model a fixture document decodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Value,
    MultiDimensional,
    Shape,
    Gradient,
}

#[derive(Debug, Deserialize)]
struct PropertyEntry {
    path: String,
    kind: PropertyKind,
}

/// Reference numbers for one vector, as recorded in the vector fixtures.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorCase {
    pub components: Vec<f32>,
    pub length: f32,
    pub length_squared: f32,
    /// What the pairwise `a*a + b*b` reduction some older bindings used
    /// reports instead; only differs from `length_squared` beyond two
    /// components.
    #[serde(default)]
    pub pairwise_reduction: Option<f32>,
}

/// Absolute location of a file under the workspace `fixtures/` directory.
fn fixture_path(rel: &str) -> PathBuf {
    let mut path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures");
    path.push(rel);
    path
}

fn fixture_text(rel: &str) -> Result<String> {
    let path = fixture_path(rel);
    fs::read_to_string(&path).with_context(|| format!("cannot read {}", path.display()))
}

fn parse_fixture<T: DeserializeOwned>(rel: &str) -> Result<T> {
    serde_json::from_str(&fixture_text(rel)?).with_context(|| format!("{rel} is not valid JSON"))
}

fn property(name: &str) -> Result<&'static PropertyEntry> {
    MANIFEST
        .properties
        .get(name)
        .ok_or_else(|| anyhow!("no property fixture named '{name}'"))
}

pub mod properties {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.properties.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn kind(name: &str) -> Result<PropertyKind> {
        Ok(property(name)?.kind)
    }

    /// Exact file text, for comparing against exported strings.
    pub fn json(name: &str) -> Result<String> {
        fixture_text(&property(name)?.path)
    }

    /// The fixture as a raw wire value.
    pub fn value(name: &str) -> Result<serde_json::Value> {
        parse_fixture(&property(name)?.path)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(fixture_path(&property(name)?.path))
    }
}

pub mod vectors {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.vectors.keys().cloned().collect()
    }

    pub fn cases(name: &str) -> Result<Vec<VectorCase>> {
        match MANIFEST.vectors.get(name) {
            Some(rel) => parse_fixture(rel),
            None => Err(anyhow!("no vector fixture named '{name}'")),
        }
    }
}
