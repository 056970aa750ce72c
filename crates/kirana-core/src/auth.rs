//! # Authentication
//!
//! Two fixed roles behind static shared secrets. There is no hashing and
//! no session expiry; this is a single-device local tool and the secrets
//! gate convenience features (drawer reset, store reset), not data
//! confidentiality. Treat it as a speed bump, not security.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// Owner password. Grants privileged actions when matched verbatim.
pub const OWNER_PASSWORD: &str = "owner2024";

/// Shopkeeper password.
pub const SHOPKEEPER_PASSWORD: &str = "shop2024";

// =============================================================================
// Roles & Users
// =============================================================================

/// The two fixed roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Shopkeeper,
}

impl Role {
    /// Default display name when the login form leaves the name blank.
    pub fn default_name(&self) -> &'static str {
        match self {
            Role::Owner => "Owner",
            Role::Shopkeeper => "Shopkeeper",
        }
    }

    fn password(&self) -> &'static str {
        match self {
            Role::Owner => OWNER_PASSWORD,
            Role::Shopkeeper => SHOPKEEPER_PASSWORD,
        }
    }
}

/// The person currently behind the counter. The name is stamped onto
/// sales and review items as the cashier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub name: String,
    pub role: Role,
}

// =============================================================================
// Session
// =============================================================================

/// The active login session. A fresh session is an anonymous shopkeeper,
/// matching how the counter starts before anyone logs in.
#[derive(Debug, Clone)]
pub struct Session {
    user: User,
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session {
            user: User {
                name: Role::Shopkeeper.default_name().to_string(),
                role: Role::Shopkeeper,
            },
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Name stamped onto sales and review items.
    pub fn cashier_name(&self) -> &str {
        &self.user.name
    }

    pub fn is_owner(&self) -> bool {
        self.user.role == Role::Owner
    }

    /// Attempts a login. The password is compared verbatim against the
    /// static secret for the requested role.
    ///
    /// ## Errors
    /// `Unauthorized` on a wrong password; the current session survives.
    pub fn login(&mut self, role: Role, name: &str, password: &str) -> CoreResult<&User> {
        if password != role.password() {
            return Err(CoreError::Unauthorized {
                action: "log in with these credentials".to_string(),
            });
        }

        let name = name.trim();
        self.user = User {
            name: if name.is_empty() {
                role.default_name().to_string()
            } else {
                name.to_string()
            },
            role,
        };
        Ok(&self.user)
    }

    /// Returns to the default shopkeeper session.
    pub fn logout(&mut self) {
        *self = Session::new();
    }

    /// Guards a privileged action.
    ///
    /// ## Errors
    /// `Unauthorized` naming the action unless the owner is logged in.
    pub fn require_owner(&self, action: &str) -> CoreResult<()> {
        if self.is_owner() {
            Ok(())
        } else {
            Err(CoreError::Unauthorized {
                action: action.to_string(),
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session_is_shopkeeper() {
        let session = Session::new();
        assert!(!session.is_owner());
        assert_eq!(session.cashier_name(), "Shopkeeper");
    }

    #[test]
    fn test_owner_login_and_logout() {
        let mut session = Session::new();

        session.login(Role::Owner, "Asha", OWNER_PASSWORD).unwrap();
        assert!(session.is_owner());
        assert_eq!(session.cashier_name(), "Asha");

        session.logout();
        assert!(!session.is_owner());
        assert_eq!(session.cashier_name(), "Shopkeeper");
    }

    #[test]
    fn test_blank_name_falls_back_to_role_default() {
        let mut session = Session::new();
        session.login(Role::Owner, "  ", OWNER_PASSWORD).unwrap();
        assert_eq!(session.cashier_name(), "Owner");
    }

    #[test]
    fn test_wrong_password_keeps_session() {
        let mut session = Session::new();
        session
            .login(Role::Shopkeeper, "Ravi", SHOPKEEPER_PASSWORD)
            .unwrap();

        let err = session.login(Role::Owner, "X", "guess").unwrap_err();
        assert!(matches!(err, CoreError::Unauthorized { .. }));
        assert_eq!(session.cashier_name(), "Ravi");
        assert!(!session.is_owner());
    }

    #[test]
    fn test_require_owner() {
        let mut session = Session::new();
        assert!(session.require_owner("reset the cash counter").is_err());

        session.login(Role::Owner, "", OWNER_PASSWORD).unwrap();
        assert!(session.require_owner("reset the cash counter").is_ok());
    }
}
