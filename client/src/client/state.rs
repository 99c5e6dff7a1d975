#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClientState {
    /// Nothing received yet, or the mirror is stale. The client keeps asking
    /// for the world and ignores sprite updates until it arrives.
    #[default]
    Blank,
    /// A full world was applied; deltas keep the mirror current
    Synced,
}
