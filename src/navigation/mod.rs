/// Navigation gating module - Gateway
mod navigator;
mod route;

pub use navigator::{NavigationError, Navigator};
pub use route::{route_for, Route};
