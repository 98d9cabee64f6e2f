use crate::domain::entities::{Role, SessionStatus};
use serde::Serialize;
use std::fmt;

// Navigation targets the session core can redirect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Login,
    Register,
    AdminHome,
    EmployeeProfile,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::AdminHome => "/admin/home",
            Route::EmployeeProfile => "/employee/profile",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Where a user lands right after authenticating.
pub fn landing_route_for(role: Option<&Role>) -> Route {
    match role {
        Some(Role::Admin) => Route::AdminHome,
        Some(Role::Employee) => Route::EmployeeProfile,
        Some(Role::Unknown) | None => Route::Login,
    }
}

/// Redirect to apply after a failed request, given the session status it left behind.
pub fn route_after_error(status: SessionStatus) -> Option<Route> {
    match status {
        SessionStatus::NotAuthenticated => Some(Route::Login),
        SessionStatus::Checking | SessionStatus::Authenticated => None,
    }
}
