use std::{
    net::{SocketAddr, TcpListener, TcpStream},
    sync::Arc,
    thread,
};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::{info, warn};
use parking_lot::Mutex;

use tableau_shared::transport::{read_message, write_message};

use super::{
    PacketReceiver as TransportReceiver, PacketSender as TransportSender, RecvError, SendError,
    Socket as TransportSocket,
};
use crate::TableauServerError;

/// Length-prefixed messages over TCP.
///
/// An accept thread takes new clients; every client gets a reader thread
/// feeding one shared inbound queue and a writer thread draining its own
/// outbound queue, so the tick never blocks on the network.
pub struct Socket {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl Socket {
    /// Bind now so that the address (and an ephemeral port) is known before
    /// `listen`
    pub fn bind(listen_addr: SocketAddr) -> Result<Self, TableauServerError> {
        let listener = TcpListener::bind(listen_addr).map_err(|source| TableauServerError::Listen {
            addr: listen_addr,
            source,
        })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| TableauServerError::Listen {
                addr: listen_addr,
                source,
            })?;
        Ok(Self {
            listener,
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl From<Socket> for Box<dyn TransportSocket> {
    fn from(socket: Socket) -> Self {
        Box::new(socket)
    }
}

impl TransportSocket for Socket {
    fn listen(
        self: Box<Self>,
    ) -> Result<(Box<dyn TransportSender>, Box<dyn TransportReceiver>), TableauServerError> {
        let clients = Arc::new(Mutex::new(Vec::<ClientLink>::new()));
        let (inbound_sender, inbound_receiver) = crossbeam_channel::unbounded::<Vec<u8>>();

        info!("Listening for clients on {}", self.local_addr);
        spawn_acceptor(self.listener, clients.clone(), inbound_sender);

        Ok((
            Box::new(TcpPacketSender { clients }),
            Box::new(TcpPacketReceiver {
                receiver: inbound_receiver,
                current_payload: None,
            }),
        ))
    }
}

struct ClientLink {
    address: SocketAddr,
    outgoing: Sender<Arc<[u8]>>,
}

fn spawn_acceptor(
    listener: TcpListener,
    clients: Arc<Mutex<Vec<ClientLink>>>,
    inbound_sender: Sender<Vec<u8>>,
) {
    thread::spawn(move || {
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(error) = accept_client(stream, &clients, inbound_sender.clone()) {
                        warn!("Failed to set up client connection: {error}");
                    }
                }
                Err(error) => warn!("Accept failed: {error}"),
            }
        }
        info!("Client acceptor stopped");
    });
}

fn accept_client(
    stream: TcpStream,
    clients: &Arc<Mutex<Vec<ClientLink>>>,
    inbound_sender: Sender<Vec<u8>>,
) -> std::io::Result<()> {
    let address = stream.peer_addr()?;
    stream.set_nodelay(true)?;
    let mut reader = stream.try_clone()?;
    let mut writer = stream;
    let (outgoing, outgoing_receiver) = crossbeam_channel::unbounded::<Arc<[u8]>>();

    info!("Client connected from {address}");

    thread::spawn(move || {
        for payload in outgoing_receiver.iter() {
            if let Err(error) = write_message(&mut writer, &payload) {
                info!("Client {address} stopped accepting frames: {error}");
                break;
            }
        }
        let _ = writer.shutdown(std::net::Shutdown::Both);
    });

    thread::spawn(move || loop {
        match read_message(&mut reader) {
            Ok(message) => {
                if inbound_sender.send(message).is_err() {
                    break;
                }
            }
            Err(error) => {
                info!("Client {address} disconnected: {error}");
                break;
            }
        }
    });

    clients.lock().push(ClientLink { address, outgoing });
    Ok(())
}

struct TcpPacketSender {
    clients: Arc<Mutex<Vec<ClientLink>>>,
}

impl TransportSender for TcpPacketSender {
    fn send(&self, payload: &[u8]) -> Result<(), SendError> {
        let payload: Arc<[u8]> = Arc::from(payload);
        let mut clients = self.clients.lock();

        // shuffle order of connections in order to avoid priority among clients
        fastrand::shuffle(&mut clients);

        clients.retain(|client| {
            let alive = client.outgoing.send(payload.clone()).is_ok();
            if !alive {
                info!("Dropping client {}", client.address);
            }
            alive
        });
        Ok(())
    }
}

struct TcpPacketReceiver {
    receiver: Receiver<Vec<u8>>,
    current_payload: Option<Vec<u8>>,
}

impl TransportReceiver for TcpPacketReceiver {
    fn receive(&mut self) -> Result<Option<&[u8]>, RecvError> {
        match self.receiver.try_recv() {
            Ok(payload) => {
                self.current_payload = Some(payload);
                Ok(self.current_payload.as_deref())
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(RecvError),
        }
    }
}
