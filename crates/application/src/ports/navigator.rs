//! Navigation port

/// Port for the navigation surface hosting the client.
pub trait Navigator: Send + Sync {
    /// Returns the route currently displayed (e.g. `/members`).
    fn current_path(&self) -> String;

    /// Performs a full reload to `path`, discarding all in-memory UI state.
    fn redirect(&self, path: &str);
}
