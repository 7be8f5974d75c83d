//! Inbound request payloads
//!
//! Field names are the wire names used by clients. Every payload is
//! normalized with [`filters::trim`] before it is checked, so a blank string
//! counts as a missing field.

use crate::core::location::LocationPath;
use crate::core::record::{CinemaPatch, CinemaRecord};
use crate::core::validation::{RequiredFields, filters};
use serde::Deserialize;
use validator::Validate;

/// Search filters, from the query string or a JSON body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub pais: Option<String>,
    #[serde(default)]
    pub departamento: Option<String>,
    #[serde(default)]
    pub provincia: Option<String>,
    #[serde(default)]
    pub distrito: Option<String>,
}

impl SearchRequest {
    pub fn normalized(self) -> Self {
        Self {
            tenant_id: filters::trim(self.tenant_id),
            pais: filters::trim(self.pais),
            departamento: filters::trim(self.departamento),
            provincia: filters::trim(self.provincia),
            distrito: filters::trim(self.distrito),
        }
    }

    pub fn location(&self) -> LocationPath {
        LocationPath::new(
            self.pais.clone(),
            self.departamento.clone(),
            self.provincia.clone(),
            self.distrito.clone(),
        )
    }
}

/// Body of a create call
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateRequest {
    #[validate(required)]
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub pais: Option<String>,
    #[validate(required)]
    #[serde(default)]
    pub departamento: Option<String>,
    #[validate(required)]
    #[serde(default)]
    pub provincia: Option<String>,
    #[validate(required)]
    #[serde(default)]
    pub distrito: Option<String>,
    #[validate(required)]
    #[serde(default)]
    pub nombre: Option<String>,
    #[validate(required)]
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub contacto: Option<String>,
    #[serde(default)]
    pub imagen: Option<String>,
    #[serde(default)]
    pub horario_apertura: Option<String>,
    #[serde(default)]
    pub horario_cierre: Option<String>,
}

impl RequiredFields for CreateRequest {
    const REQUIRED: &'static [&'static str] = &[
        "tenant_id",
        "departamento",
        "provincia",
        "distrito",
        "nombre",
        "direccion",
    ];
}

impl CreateRequest {
    pub fn normalized(self) -> Self {
        Self {
            tenant_id: filters::trim(self.tenant_id),
            pais: filters::trim(self.pais),
            departamento: filters::trim(self.departamento),
            provincia: filters::trim(self.provincia),
            distrito: filters::trim(self.distrito),
            nombre: filters::trim(self.nombre),
            direccion: filters::trim(self.direccion),
            contacto: filters::trim(self.contacto),
            imagen: filters::trim(self.imagen),
            horario_apertura: filters::trim(self.horario_apertura),
            horario_cierre: filters::trim(self.horario_cierre),
        }
    }

    pub fn location(&self) -> LocationPath {
        LocationPath::new(
            self.pais.clone(),
            self.departamento.clone(),
            self.provincia.clone(),
            self.distrito.clone(),
        )
    }

    /// Build the record to write
    ///
    /// Returns `None` if a required field is missing; callers run
    /// [`RequiredFields::check_required`] first.
    pub fn into_record(self) -> Option<CinemaRecord> {
        let location = self.location();
        let mut record = CinemaRecord::new(self.tenant_id?, location, self.nombre?, self.direccion?);
        record.contact = self.contacto;
        record.image_ref = self.imagen;
        record.opening_time = self.horario_apertura;
        record.closing_time = self.horario_cierre;
        Some(record)
    }
}

/// Body of an update call
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRequest {
    #[validate(required)]
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub pais: Option<String>,
    #[validate(required)]
    #[serde(default)]
    pub departamento: Option<String>,
    #[validate(required)]
    #[serde(default)]
    pub provincia: Option<String>,
    #[validate(required)]
    #[serde(default)]
    pub distrito: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub contacto: Option<String>,
    #[serde(default)]
    pub imagen: Option<String>,
    #[serde(default)]
    pub horario_apertura: Option<String>,
    #[serde(default)]
    pub horario_cierre: Option<String>,
}

impl RequiredFields for UpdateRequest {
    const REQUIRED: &'static [&'static str] =
        &["tenant_id", "departamento", "provincia", "distrito"];
}

impl UpdateRequest {
    pub fn normalized(self) -> Self {
        Self {
            tenant_id: filters::trim(self.tenant_id),
            pais: filters::trim(self.pais),
            departamento: filters::trim(self.departamento),
            provincia: filters::trim(self.provincia),
            distrito: filters::trim(self.distrito),
            nombre: filters::trim(self.nombre),
            direccion: filters::trim(self.direccion),
            contacto: filters::trim(self.contacto),
            imagen: filters::trim(self.imagen),
            horario_apertura: filters::trim(self.horario_apertura),
            horario_cierre: filters::trim(self.horario_cierre),
        }
    }

    pub fn location(&self) -> LocationPath {
        LocationPath::new(
            self.pais.clone(),
            self.departamento.clone(),
            self.provincia.clone(),
            self.distrito.clone(),
        )
    }

    pub fn patch(&self) -> CinemaPatch {
        CinemaPatch {
            name: self.nombre.clone(),
            address: self.direccion.clone(),
            contact: self.contacto.clone(),
            image_ref: self.imagen.clone(),
            opening_time: self.horario_apertura.clone(),
            closing_time: self.horario_cierre.clone(),
        }
    }
}
