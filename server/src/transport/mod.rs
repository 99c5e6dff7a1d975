cfg_if! {
    if #[cfg(feature = "transport_tcp")] {
        pub mod tcp;
    } else {}
}

pub use tableau_shared::transport::{PacketReceiver, PacketSender, RecvError, SendError};

use crate::TableauServerError;

pub trait Socket {
    /// Start accepting clients. The sender broadcasts to every connected
    /// client; the receiver yields messages from any of them.
    fn listen(
        self: Box<Self>,
    ) -> Result<(Box<dyn PacketSender>, Box<dyn PacketReceiver>), TableauServerError>;
}
