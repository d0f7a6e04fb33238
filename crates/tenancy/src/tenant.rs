//! Tenant record and subdomain validation.

use serde::{Deserialize, Serialize};

use ordermill_core::{DomainError, DomainResult, TenantId};

/// An isolated customer organization.
///
/// `domain` is the subdomain label tenants are addressed by and is immutable
/// after creation. Deactivation stops new context resolution for the domain
/// but does not delete historical data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub domain: String,
    pub is_active: bool,
}

impl Tenant {
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> DomainResult<Self> {
        let domain = domain.into();
        validate_subdomain(&domain)?;

        Ok(Self {
            id: TenantId::new(),
            name: name.into(),
            domain,
            is_active: true,
        })
    }
}

/// Validate a subdomain label: lowercase alphanumerics and hyphens, no
/// leading or trailing hyphen, non-empty.
pub fn validate_subdomain(value: &str) -> DomainResult<()> {
    let valid_chars = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if value.is_empty() || !valid_chars || value.starts_with('-') || value.ends_with('-') {
        return Err(DomainError::validation(format!(
            "{value:?} is not a valid subdomain name: only lowercase letters, \
             numbers, and hyphens are allowed, and it cannot start or end with a hyphen"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_labels() {
        for label in ["acme", "acme-1", "a", "0day", "x-y-z"] {
            assert!(validate_subdomain(label).is_ok(), "rejected {label}");
        }
    }

    #[test]
    fn rejects_malformed_labels() {
        for label in ["", "-acme", "acme-", "Acme", "acme.com", "ac me", "ümlaut"] {
            assert!(validate_subdomain(label).is_err(), "accepted {label}");
        }
    }

    #[test]
    fn tenant_new_enforces_the_domain_rule() {
        assert!(Tenant::new("Acme Inc", "acme").is_ok());
        assert!(matches!(
            Tenant::new("Acme Inc", "Acme"),
            Err(DomainError::Validation(_))
        ));
    }
}
