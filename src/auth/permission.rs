//! Role-based restriction.
//!
//! A capability check orthogonal to ownership: an operation declares the
//! set of roles permitted to run it, and the caller's role must be a member.
//! Not wired to any current route; kept as the reusable primitive for
//! admin-only operations.

use crate::models::user::{Role, User};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PermissionError {
    #[error("You do not have permission to perform this action")]
    InsufficientRole,
}

/// Return true if `role` is in the permitted set.
pub fn role_allowed(role: Role, permitted: &[Role]) -> bool {
    permitted.contains(&role)
}

/// Check a resolved caller against the permitted roles for an operation.
pub fn restrict_to(user: &User, permitted: &[Role]) -> Result<(), PermissionError> {
    if role_allowed(user.role, permitted) {
        Ok(())
    } else {
        Err(PermissionError::InsufficientRole)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn test_user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: "test@example.com".into(),
            google_id: None,
            first_name: None,
            last_name: None,
            display_name: Some("Test User".into()),
            avatar_url: None,
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn role_membership() {
        assert!(role_allowed(Role::Admin, &[Role::Admin]));
        assert!(role_allowed(Role::User, &[Role::User, Role::Admin]));
        assert!(!role_allowed(Role::User, &[Role::Admin]));
        assert!(!role_allowed(Role::Admin, &[]));
    }

    #[test]
    fn restrict_to_rejects_outsiders() {
        let user = test_user(Role::User);
        assert!(restrict_to(&user, &[Role::User]).is_ok());
        assert_eq!(
            restrict_to(&user, &[Role::Admin]),
            Err(PermissionError::InsufficientRole)
        );
    }

    #[test]
    fn admin_is_not_implicitly_user() {
        // Membership is exact; call sites list every permitted role.
        let admin = test_user(Role::Admin);
        assert!(restrict_to(&admin, &[Role::User]).is_err());
        assert!(restrict_to(&admin, &[Role::User, Role::Admin]).is_ok());
    }
}
