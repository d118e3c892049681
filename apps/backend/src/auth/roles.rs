use serde::{Deserialize, Serialize};

/// Application roles stored on the user record.
///
/// Roles are persisted as lowercase strings in the `users.roles` column.
/// Unknown strings are dropped on parse so a bad row can never grant
/// access it was not meant to grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }

    /// Parse a stored role string. Unknown values return `None`.
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "customer" => Some(Role::Customer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Parse a stored role list, silently dropping unknown entries.
    pub fn from_list<S: AsRef<str>>(values: &[S]) -> Vec<Role> {
        values.iter().filter_map(|v| Role::parse(v.as_ref())).collect()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// True when the user holds at least one of the allowed roles.
pub fn has_any_role(user_roles: &[Role], allowed: &[Role]) -> bool {
    user_roles.iter().any(|r| allowed.contains(r))
}
