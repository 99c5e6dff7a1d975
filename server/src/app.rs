use std::time::Duration;

use crate::{events::ServerEvent, server::ServerWorld};

/// Timing handed to the application each tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpdateParams {
    /// Time since the previous tick
    pub delta: Duration,
    /// Time since the engine started
    pub elapsed: Duration,
    pub tick: u64,
}

/// Application logic driven by [`EngineServer`](crate::EngineServer).
///
/// `update` runs at the start of every tick. Whatever it changes in the world
/// is sent to clients in that same tick.
pub trait ServerApp {
    fn setup(&mut self, _world: &mut ServerWorld) {}

    fn update(&mut self, world: &mut ServerWorld, events: Vec<ServerEvent>, params: UpdateParams);
}
