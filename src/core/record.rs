//! Stored cinema records and partial updates

use crate::core::location::LocationPath;
use serde::{Deserialize, Serialize};

/// Attribute name of the partition key
pub const PARTITION_KEY: &str = "tenant_id";

/// Attribute name of the sort key
pub const SORT_KEY: &str = "ordenamiento";

/// A cinema location as stored in the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CinemaRecord {
    pub tenant_id: String,

    #[serde(rename = "ordenamiento")]
    pub location_key: String,

    #[serde(flatten)]
    pub location: LocationPath,

    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(rename = "direccion")]
    pub address: String,

    #[serde(rename = "contacto", default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,

    #[serde(rename = "imagen", default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,

    #[serde(rename = "horario_apertura", default, skip_serializing_if = "Option::is_none")]
    pub opening_time: Option<String>,

    #[serde(rename = "horario_cierre", default, skip_serializing_if = "Option::is_none")]
    pub closing_time: Option<String>,
}

impl CinemaRecord {
    /// Build a record whose sort key is derived from `location`
    pub fn new(
        tenant_id: impl Into<String>,
        location: LocationPath,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            location_key: location.key(),
            location,
            name: name.into(),
            address: address.into(),
            contact: None,
            image_ref: None,
            opening_time: None,
            closing_time: None,
        }
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, patch: &CinemaPatch) {
        for (attribute, value) in patch.attributes() {
            let value = value.to_string();
            match attribute {
                "nombre" => self.name = value,
                "direccion" => self.address = value,
                "contacto" => self.contact = Some(value),
                "imagen" => self.image_ref = Some(value),
                "horario_apertura" => self.opening_time = Some(value),
                "horario_cierre" => self.closing_time = Some(value),
                _ => {}
            }
        }
    }
}

/// Named attributes to `SET` on an existing record
///
/// Only supplied, non-empty values are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CinemaPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub image_ref: Option<String>,
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
}

impl CinemaPatch {
    pub fn is_empty(&self) -> bool {
        self.attributes().is_empty()
    }

    /// `(attribute name, value)` pairs in a stable order
    pub fn attributes(&self) -> Vec<(&'static str, &str)> {
        [
            ("nombre", self.name.as_deref()),
            ("direccion", self.address.as_deref()),
            ("contacto", self.contact.as_deref()),
            ("imagen", self.image_ref.as_deref()),
            ("horario_apertura", self.opening_time.as_deref()),
            ("horario_cierre", self.closing_time.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.filter(|v| !v.trim().is_empty()).map(|v| (name, v)))
        .collect()
    }
}
