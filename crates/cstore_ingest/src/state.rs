/// The ingester controller's lifecycle: `Initializing -> {Rejected, Ready} -> Ready* -> Stopped`.
///
/// `Ready` is absorbing on success — a validated controller never returns to `Initializing` —
/// and is left only by an explicit `Stop`, never by a single write failure (see
/// [`crate::IngesterEvent::ShardingError`], which leaves the controller in `Ready`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngesterState {
    Initializing,
    Rejected,
    Ready,
    Stopped,
}
