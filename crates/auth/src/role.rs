//! Role and permission model.
//!
//! Roles are a closed set with a static role-to-permission lookup table,
//! checked via exhaustive matches. Adding a role means adding a variant and
//! extending the table; there is no string comparison anywhere.

use serde::{Deserialize, Serialize};

/// Role granted to a tenant member.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Operator,
    Viewer,
}

/// Fine-grained permission checked at service boundaries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ProfileCreate,
    ProfileUpdate,
    ProfileDelete,
    ProfileView,
    OrderCreate,
    OrderUpdate,
    OrderDelete,
    OrderView,
    OrderExport,
    ProductCreate,
    ProductUpdate,
    ProductDelete,
    ProductView,
}

impl Role {
    /// Permission set granted by this role.
    pub fn permissions(&self) -> &'static [Permission] {
        use Permission::*;

        match self {
            Role::Admin => &[
                ProfileCreate,
                ProfileUpdate,
                ProfileDelete,
                ProfileView,
                OrderCreate,
                OrderUpdate,
                OrderDelete,
                OrderView,
                OrderExport,
                ProductCreate,
                ProductUpdate,
                ProductDelete,
                ProductView,
            ],
            Role::Operator => &[OrderCreate, OrderUpdate, OrderView, ProductView],
            Role::Viewer => &[OrderView, ProductView],
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Operator => "operator",
            Role::Viewer => "viewer",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_holds_every_permission() {
        for permission in [
            Permission::ProfileCreate,
            Permission::OrderCreate,
            Permission::OrderExport,
            Permission::ProductDelete,
        ] {
            assert!(Role::Admin.has_permission(permission));
        }
    }

    #[test]
    fn operator_creates_and_views_but_does_not_export() {
        assert!(Role::Operator.has_permission(Permission::OrderCreate));
        assert!(Role::Operator.has_permission(Permission::OrderUpdate));
        assert!(Role::Operator.has_permission(Permission::ProductView));
        assert!(!Role::Operator.has_permission(Permission::OrderExport));
        assert!(!Role::Operator.has_permission(Permission::ProductUpdate));
    }

    #[test]
    fn viewer_is_read_only() {
        assert!(Role::Viewer.has_permission(Permission::OrderView));
        assert!(Role::Viewer.has_permission(Permission::ProductView));
        assert!(!Role::Viewer.has_permission(Permission::OrderCreate));
        assert!(!Role::Viewer.has_permission(Permission::OrderUpdate));
    }
}
