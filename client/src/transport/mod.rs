cfg_if! {
    if #[cfg(feature = "transport_tcp")] {
        pub mod tcp;
    } else {}
}

pub use tableau_shared::transport::{PacketReceiver, PacketSender, RecvError, SendError};

pub trait Socket {
    /// Start connecting. Never blocks: messages sent before the connection
    /// is up are queued, and the transport keeps reconnecting on its own.
    fn connect(self: Box<Self>) -> (Box<dyn PacketSender>, Box<dyn PacketReceiver>);
}
