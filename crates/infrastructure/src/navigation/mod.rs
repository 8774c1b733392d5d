//! Navigation adapters.

mod route_navigator;

pub use route_navigator::RouteNavigator;
