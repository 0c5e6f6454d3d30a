//! Static sensor catalog, read once at startup.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::StartupError;

/// One sensor descriptor from the catalog file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SensorSpec {
    pub name: String,
    /// Jinja expression the hub applies to the section payload.
    pub value_template: String,
    pub icon: String,
    pub unit: Option<String>,
    pub device_class: Option<String>,
}

impl SensorSpec {
    /// Unit of measurement, with the catalog's empty-string placeholder
    /// treated as absent.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref().filter(|u| !u.is_empty())
    }

    /// Device class, with the empty-string placeholder treated as absent.
    pub fn device_class(&self) -> Option<&str> {
        self.device_class.as_deref().filter(|c| !c.is_empty())
    }
}

/// Sensor descriptors keyed by sensor id.
///
/// An id's first underscore-delimited segment names the section whose
/// runtime topic carries the sensor's state (`player_gold` → `player`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SensorCatalog(BTreeMap<String, SensorSpec>);

impl SensorCatalog {
    /// Reads the catalog file. Any shape problem is fatal at startup,
    /// never reported per-request.
    pub fn load(path: &Path) -> Result<Self, StartupError> {
        let raw = std::fs::read_to_string(path).map_err(|source| StartupError::CatalogRead {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| StartupError::CatalogParse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(sensor_id, spec)` pairs in stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SensorSpec)> {
        self.0.iter().map(|(id, spec)| (id.as_str(), spec))
    }
}
