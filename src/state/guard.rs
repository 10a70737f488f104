// Route guard.
// Decides whether a navigation may enter its target or must detour to the login view.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::credentials::CredentialStore;
use crate::error::{Result, TodoError};

/// A navigable view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Route {
    #[default]
    Home,
    Login,
    Items,
}

/// Whether a route needs a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Public,
    Protected,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Home, Route::Login, Route::Items];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Items => "/items",
        }
    }

    pub fn class(&self) -> RouteClass {
        match self {
            Route::Home | Route::Login => RouteClass::Public,
            Route::Items => RouteClass::Protected,
        }
    }

    pub fn is_protected(&self) -> bool {
        self.class() == RouteClass::Protected
    }

    /// Resolve a path. A trailing slash is ignored.
    pub fn from_path(path: &str) -> Result<Self> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            other => other,
        };

        Route::ALL
            .into_iter()
            .find(|route| route.path() == normalized)
            .ok_or_else(|| TodoError::NotFound(trimmed.to_string()))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Guard evaluation state for one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Navigation requested, not yet evaluated.
    Entering(Route),
    /// The route may render.
    Allowed(Route),
    /// Entry refused, navigation continues at the target.
    Redirecting(Route),
}

impl GuardState {
    /// Route the navigation ends up on.
    pub fn route(&self) -> Route {
        match self {
            GuardState::Entering(route)
            | GuardState::Allowed(route)
            | GuardState::Redirecting(route) => *route,
        }
    }
}

/// Gates protected routes on the presence of a credential.
#[derive(Clone)]
pub struct RouteGuard {
    credentials: Arc<dyn CredentialStore>,
}

impl RouteGuard {
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self { credentials }
    }

    /// Advance one step. `Allowed` and `Redirecting` are returned as is.
    pub fn step(&self, state: GuardState) -> Result<GuardState> {
        let GuardState::Entering(route) = state else {
            return Ok(state);
        };

        if !route.is_protected() || self.credentials.is_authenticated()? {
            Ok(GuardState::Allowed(route))
        } else {
            Ok(GuardState::Redirecting(Route::Login))
        }
    }

    /// Evaluate entry to `route`.
    pub fn check(&self, route: Route) -> Result<GuardState> {
        self.step(GuardState::Entering(route))
    }
}
