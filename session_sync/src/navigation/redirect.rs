use std::collections::BTreeSet;

use crate::session::Role;

use super::route::Route;

/// Where a freshly authenticated context should land, given its roles.
///
/// Everyone is expected to hold `READER`; a single additional role picks that
/// role's dashboard, more than one leaves the choice to the user.
pub fn decide_redirect(roles: &BTreeSet<Role>) -> Route {
    match roles.len() {
        0 => Route::Unauthorized,
        1 if roles.contains(&Role::Reader) => Route::ReaderDashboard,
        2 if roles.contains(&Role::Reader) => roles
            .iter()
            .find(|role| **role != Role::Reader)
            .and_then(Route::dashboard_for)
            .unwrap_or(Route::Unauthorized),
        n if n > 2 => Route::RoleChooser,
        _ => Route::Unauthorized,
    }
}
