//! Request validation and filtering
//!
//! Inbound fields are first normalized by the [`filters`], then checked in a
//! single declarative pass. The outcome is a [`FieldCheck`] rather than an
//! early return per field, so a rejection lists every missing field at once.

pub mod filters;

use validator::{Validate, ValidationErrors};

/// Result of a required-field check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCheck {
    Valid,
    MissingFields(Vec<String>),
}

impl FieldCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldCheck::Valid)
    }

    /// Convert `validator` output, reporting fields in `declared_order`
    ///
    /// Fields that failed but are not listed are appended in name order.
    pub fn from_validation(
        result: Result<(), ValidationErrors>,
        declared_order: &[&str],
    ) -> Self {
        let errors = match result {
            Ok(()) => return FieldCheck::Valid,
            Err(errors) => errors,
        };

        let field_errors = errors.field_errors();
        let mut missing: Vec<String> = declared_order
            .iter()
            .filter(|field| field_errors.contains_key(**field))
            .map(|field| field.to_string())
            .collect();

        let mut extra: Vec<String> = field_errors
            .keys()
            .map(|k| k.to_string())
            .filter(|k| !declared_order.contains(&k.as_str()))
            .collect();
        extra.sort();
        missing.extend(extra);

        if missing.is_empty() {
            FieldCheck::Valid
        } else {
            FieldCheck::MissingFields(missing)
        }
    }
}

/// Requests that declare their mandatory fields
pub trait RequiredFields: Validate {
    /// Mandatory fields in the order they are reported
    const REQUIRED: &'static [&'static str];

    fn check_required(&self) -> FieldCheck {
        FieldCheck::from_validation(self.validate(), Self::REQUIRED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Draft {
        #[validate(required)]
        tenant_id: Option<String>,
        #[validate(required)]
        nombre: Option<String>,
    }

    impl RequiredFields for Draft {
        const REQUIRED: &'static [&'static str] = &["tenant_id", "nombre"];
    }

    #[test]
    fn test_valid_when_all_present() {
        let draft = Draft {
            tenant_id: Some("t1".into()),
            nombre: Some("Cine".into()),
        };
        assert_eq!(draft.check_required(), FieldCheck::Valid);
    }

    #[test]
    fn test_reports_every_missing_field_in_order() {
        let draft = Draft {
            tenant_id: None,
            nombre: None,
        };
        assert_eq!(
            draft.check_required(),
            FieldCheck::MissingFields(vec!["tenant_id".into(), "nombre".into()])
        );
    }

    #[test]
    fn test_single_missing_field() {
        let draft = Draft {
            tenant_id: Some("t1".into()),
            nombre: None,
        };
        let check = draft.check_required();
        assert!(!check.is_valid());
        assert_eq!(check, FieldCheck::MissingFields(vec!["nombre".into()]));
    }
}
