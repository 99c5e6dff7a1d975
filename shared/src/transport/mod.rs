mod error;
mod framing;

pub use error::FramingError;
pub use framing::{read_message, write_message, MAX_MESSAGE_SIZE};

#[derive(Debug)]
pub struct SendError;

#[derive(Debug)]
pub struct RecvError;

pub trait PacketSender: Send {
    /// Send one whole message. On the server this reaches every connected
    /// client.
    fn send(&self, payload: &[u8]) -> Result<(), SendError>;
}

pub trait PacketReceiver: Send {
    /// Next whole message, if one has arrived
    fn receive(&mut self) -> Result<Option<&[u8]>, RecvError>;

    /// True once after the connection was (re)established. Anything derived
    /// from an earlier connection may be stale.
    fn take_reconnected(&mut self) -> bool {
        false
    }
}
