/// What the next outgoing frame carries besides the header
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ServerState {
    /// Incremental updates: deletions, detach notices and dirty sprites
    #[default]
    Running,
    /// A client asked for the world; the next frame is a full dump, after
    /// which the server returns to `Running`
    SendWorld,
}
