use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Role granted to a user by the editorial backend.
///
/// Unknown role strings are preserved as [`Role::Other`] so that a profile
/// carrying roles this front-end does not route on still decodes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Reader,
    Author,
    Reviewer,
    Editor,
    Admin,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Reader => "READER",
            Role::Author => "AUTHOR",
            Role::Reviewer => "REVIEWER",
            Role::Editor => "EDITOR",
            Role::Admin => "ADMIN",
            Role::Other(role) => role,
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "READER" => Role::Reader,
            "AUTHOR" => Role::Author,
            "REVIEWER" => Role::Reviewer,
            "EDITOR" => Role::Editor,
            "ADMIN" => Role::Admin,
            _ => Role::Other(value.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile returned by the login endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: BTreeSet<Role>,
}

impl UserProfile {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            email: None,
            roles: roles.into_iter().collect(),
        }
    }
}

/// Credential and profile handed to the session on login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserData {
    pub access_credential: Option<String>,
    pub profile: Option<UserProfile>,
}

impl UserData {
    pub fn new(access_credential: impl Into<String>, profile: UserProfile) -> Self {
        Self {
            access_credential: Some(access_credential.into()),
            profile: Some(profile),
        }
    }
}

/// Session state of one context.
///
/// `authenticated` is true exactly when `user_data` holds a credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    pub user_data: UserData,
}

impl Session {
    pub fn credential(&self) -> Option<&str> {
        self.user_data.access_credential.as_deref()
    }

    pub fn roles(&self) -> BTreeSet<Role> {
        self.user_data
            .profile
            .as_ref()
            .map(|profile| profile.roles.clone())
            .unwrap_or_default()
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.user_data
            .profile
            .as_ref()
            .is_some_and(|profile| profile.roles.contains(role))
    }
}
