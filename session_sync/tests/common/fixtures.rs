use session_sync::{Role, UserData, UserProfile};

/// Test user fixtures for cross-tab flows
pub struct TestUsers;

impl TestUsers {
    /// Reader who also edits; lands on the editor dashboard
    pub fn editor() -> UserData {
        Self::with_roles("tok1", [Role::Reader, Role::Editor])
    }

    pub fn reader() -> UserData {
        Self::with_roles("tok-reader", [Role::Reader])
    }

    /// Holds more than two roles and has to pick one
    pub fn chief_editor() -> UserData {
        Self::with_roles("tok-chief", [Role::Reader, Role::Editor, Role::Admin])
    }

    pub fn with_roles(token: &str, roles: impl IntoIterator<Item = Role>) -> UserData {
        let mut profile = UserProfile::new(format!("user-{token}"), "Test User", roles);
        profile.email = Some(format!("{token}@example.com"));
        UserData::new(token, profile)
    }
}
