//! Authorization guard applied at service boundaries.

use ordermill_core::{DomainError, DomainResult};

use crate::principal::Principal;
use crate::role::Permission;

/// Check that a principal holds a permission.
///
/// Superusers pass every check. Blocked members fail every check, regardless
/// of role.
pub fn authorize(principal: &Principal, permission: Permission) -> DomainResult<()> {
    match principal {
        Principal::Superuser => Ok(()),
        Principal::Member(profile) => {
            if profile.is_blocked {
                return Err(DomainError::Unauthorized);
            }
            if profile.role.has_permission(permission) {
                Ok(())
            } else {
                Err(DomainError::Unauthorized)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;
    use crate::role::Role;
    use ordermill_core::TenantId;

    fn member(role: Role) -> Principal {
        Principal::member(Profile::new(TenantId::new(), "alex", role))
    }

    #[test]
    fn superuser_passes_every_check() {
        assert!(authorize(&Principal::Superuser, Permission::ProfileDelete).is_ok());
        assert!(authorize(&Principal::Superuser, Permission::OrderExport).is_ok());
    }

    #[test]
    fn member_checks_go_through_the_role_table() {
        assert!(authorize(&member(Role::Operator), Permission::OrderCreate).is_ok());
        assert_eq!(
            authorize(&member(Role::Viewer), Permission::OrderCreate),
            Err(DomainError::Unauthorized)
        );
    }

    #[test]
    fn blocked_member_fails_even_with_the_right_role() {
        let mut profile = Profile::new(TenantId::new(), "alex", Role::Admin);
        profile.is_blocked = true;
        let principal = Principal::member(profile);
        assert_eq!(
            authorize(&principal, Permission::OrderView),
            Err(DomainError::Unauthorized)
        );
    }
}
