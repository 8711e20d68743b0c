use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authorization level carried by a user record and embedded in tokens.
///
/// `0` is a regular customer; any other value grants admin routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(pub u8);

impl Role {
    #[cfg(test)]
    pub const CUSTOMER: Role = Role(0);
    #[cfg(test)]
    pub const ADMIN: Role = Role(1);

    pub fn is_admin(self) -> bool {
        self.0 != 0
    }
}

/// Represents a registered user in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub role: Role,
    pub email: String,
    pub name: String,
    pub lastname: String,
    /// Opaque credential hash. Never rendered.
    #[serde(default, skip_serializing)]
    pub password_hash: String,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.lastname)
    }
}

#[cfg(test)]
impl User {
    /// Creates a new customer with a fresh id.
    pub fn new(name: impl Into<String>, lastname: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::CUSTOMER,
            email: email.into(),
            name: name.into(),
            lastname: lastname.into(),
            password_hash: String::new(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_nonzero_role_is_admin() {
        assert!(!Role::CUSTOMER.is_admin());
        assert!(Role::ADMIN.is_admin());
        assert!(Role(7).is_admin());
    }

    #[test]
    fn test_credentials_are_not_serialized() {
        let mut user = User::new("Ana", "Paz", "ana@example.com");
        user.password_hash = "secret-hash".into();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], 0);
    }
}
