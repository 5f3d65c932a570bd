/// Sink for user-facing alerts.
///
/// The overlay never fails the page; transport and server errors end up here
/// as a single generic message and the view keeps its previous state.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}
