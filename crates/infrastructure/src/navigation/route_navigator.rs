//! Navigator backed by a `tokio::sync::watch` channel.

use sacco_application::ports::Navigator;
use tokio::sync::watch;
use tracing::info;

/// Holds the current route and publishes every redirect.
///
/// A host UI subscribes with [`RouteNavigator::subscribe`] and performs a
/// full reload whenever the route changes.
#[derive(Debug)]
pub struct RouteNavigator {
    route: watch::Sender<String>,
}

impl RouteNavigator {
    /// Creates a navigator displaying `initial`.
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        let (route, _) = watch::channel(initial.into());
        Self { route }
    }

    /// Returns a receiver that observes route changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.route.subscribe()
    }
}

impl Navigator for RouteNavigator {
    fn current_path(&self) -> String {
        self.route.borrow().clone()
    }

    fn redirect(&self, path: &str) {
        let previous = self.route.send_replace(path.to_string());
        info!(from = %previous, to = %path, "full reload");
    }
}
