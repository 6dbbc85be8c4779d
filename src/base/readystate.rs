/// Readiness of a cookie store.
///
/// A store starts `NotReady` until the client reports its cookie string, then
/// stays `Ready` for the rest of the evaluation cycle. The caller drives the
/// transition by reconstructing the store on the next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    /// No client snapshot yet.
    #[default]
    NotReady,

    /// The client snapshot for this cycle is available.
    Ready,
}

impl ReadyState {
    pub fn is_ready(&self) -> bool {
        matches!(self, ReadyState::Ready)
    }
}
