use std::fmt;

use crate::session::Role;

/// Screens the session subsystem can send a context to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Unauthorized,
    RoleChooser,
    ReaderDashboard,
    AuthorDashboard,
    ReviewerDashboard,
    EditorDashboard,
    AdminDashboard,
}

const ALL_ROUTES: [Route; 8] = [
    Route::Login,
    Route::Unauthorized,
    Route::RoleChooser,
    Route::ReaderDashboard,
    Route::AuthorDashboard,
    Route::ReviewerDashboard,
    Route::EditorDashboard,
    Route::AdminDashboard,
];

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Unauthorized => "/unauthorized",
            Route::RoleChooser => "/choose-role",
            Route::ReaderDashboard => "/reader/dashboard",
            Route::AuthorDashboard => "/author/dashboard",
            Route::ReviewerDashboard => "/reviewer/dashboard",
            Route::EditorDashboard => "/editor/dashboard",
            Route::AdminDashboard => "/admin/dashboard",
        }
    }

    /// Route whose path is exactly `path`, ignoring a trailing slash.
    pub fn from_path(path: &str) -> Option<Route> {
        let path = match path.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => path,
        };
        ALL_ROUTES.into_iter().find(|route| route.path() == path)
    }

    /// Dashboard of a role, if the role has one.
    pub fn dashboard_for(role: &Role) -> Option<Route> {
        match role {
            Role::Reader => Some(Route::ReaderDashboard),
            Role::Author => Some(Route::AuthorDashboard),
            Role::Reviewer => Some(Route::ReviewerDashboard),
            Role::Editor => Some(Route::EditorDashboard),
            Role::Admin => Some(Route::AdminDashboard),
            Role::Other(_) => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
