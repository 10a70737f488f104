// Navigation state module.
// Route guard and the navigator that applies it.

pub mod guard;
pub mod navigation;

pub use guard::{GuardState, Route, RouteClass, RouteGuard};
pub use navigation::{Navigation, Navigator};
