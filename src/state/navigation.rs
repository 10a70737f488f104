// Navigation state management.
// Tracks the current route and history, running the guard on every transition.

use super::guard::{GuardState, Route, RouteGuard};
use crate::error::Result;

/// Outcome of one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    /// Route the caller asked for.
    pub requested: Route,
    /// Route that is now current.
    pub resolved: Route,
    /// Final guard state for `resolved`.
    pub state: GuardState,
}

impl Navigation {
    /// Whether the guard sent the navigation somewhere else.
    pub fn redirected(&self) -> bool {
        self.requested != self.resolved
    }
}

/// Route history for the session, guarded on every entry.
#[derive(Clone)]
pub struct Navigator {
    guard: RouteGuard,
    /// Visited routes (bottom = first, top = current)
    history: Vec<Route>,
}

impl Navigator {
    /// Create a navigator positioned on the home route.
    pub fn new(guard: RouteGuard) -> Self {
        Self {
            guard,
            history: vec![Route::Home],
        }
    }

    /// Get the current route.
    pub fn current(&self) -> Route {
        self.history.last().copied().unwrap_or_default()
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Navigate to a path such as `/items`.
    pub fn navigate_to(&mut self, path: &str) -> Result<Navigation> {
        let route = Route::from_path(path)?;
        self.navigate(route)
    }

    /// Navigate to `route`, following guard redirects until a route is allowed.
    pub fn navigate(&mut self, route: Route) -> Result<Navigation> {
        let mut state = self.guard.check(route)?;

        // Redirect targets are public, so this settles in one extra step
        while let GuardState::Redirecting(target) = state {
            tracing::info!(from = %route, to = %target, "navigation redirected");
            state = self.guard.check(target)?;
        }

        let resolved = state.route();
        if self.current() != resolved {
            self.history.push(resolved);
        }

        Ok(Navigation {
            requested: route,
            resolved,
            state,
        })
    }

    /// Run the guard again for the current route, e.g. after the credential was cleared.
    pub fn reevaluate(&mut self) -> Result<Navigation> {
        self.navigate(self.current())
    }

    /// Go back one route. Returns false at the first route.
    pub fn back(&mut self) -> Result<bool> {
        if self.history.len() <= 1 {
            return Ok(false);
        }
        self.history.pop();
        self.reevaluate()?;
        Ok(true)
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }
}
