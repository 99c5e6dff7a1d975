//! In-memory transport for end-to-end tests. Routes whole messages between
//! one server and any number of clients without touching the network.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use tableau_client::transport::Socket as ClientSocket;
use tableau_server::{transport::Socket as ServerSocket, TableauServerError};
use tableau_shared::transport::{PacketReceiver, PacketSender, RecvError, SendError};

type Queue = Arc<Mutex<VecDeque<Vec<u8>>>>;

struct ClientLink {
    to_client: Queue,
    connected: Arc<AtomicBool>,
}

#[derive(Default)]
struct HubState {
    to_server: Queue,
    clients: Vec<ClientLink>,
}

/// Shared switchboard. Hand `server_socket()` to the server and one
/// `client_socket()` to every client.
#[derive(Clone, Default)]
pub struct LocalHub {
    state: Arc<Mutex<HubState>>,
}

impl LocalHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn server_socket(&self) -> LocalServerSocket {
        LocalServerSocket { hub: self.clone() }
    }

    /// A new client endpoint, plus a handle to break and restore its link
    pub fn client_socket(&self) -> (LocalClientSocket, LocalClientHandle) {
        let to_client: Queue = Arc::default();
        let connected = Arc::new(AtomicBool::new(true));
        let reconnected = Arc::new(AtomicBool::new(true));

        let mut state = self.state.lock().unwrap();
        state.clients.push(ClientLink {
            to_client: to_client.clone(),
            connected: connected.clone(),
        });
        let to_server = state.to_server.clone();

        let socket = LocalClientSocket {
            to_server,
            to_client: to_client.clone(),
            connected: connected.clone(),
            reconnected: reconnected.clone(),
        };
        let handle = LocalClientHandle {
            to_client,
            connected,
            reconnected,
        };
        (socket, handle)
    }

    /// Messages waiting for the server
    pub fn pending_to_server(&self) -> usize {
        self.state.lock().unwrap().to_server.lock().unwrap().len()
    }
}

/// Break or restore one client's link
#[derive(Clone)]
pub struct LocalClientHandle {
    to_client: Queue,
    connected: Arc<AtomicBool>,
    reconnected: Arc<AtomicBool>,
}

impl LocalClientHandle {
    /// Messages in flight are lost
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.to_client.lock().unwrap().clear();
    }

    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
        self.reconnected.store(true, Ordering::SeqCst);
    }

    /// Messages waiting for this client
    pub fn pending(&self) -> usize {
        self.to_client.lock().unwrap().len()
    }

    /// Copy of the messages waiting for this client
    pub fn peek(&self) -> Vec<Vec<u8>> {
        self.to_client.lock().unwrap().iter().cloned().collect()
    }
}

// Server side

pub struct LocalServerSocket {
    hub: LocalHub,
}

impl From<LocalServerSocket> for Box<dyn ServerSocket> {
    fn from(socket: LocalServerSocket) -> Self {
        Box::new(socket)
    }
}

impl ServerSocket for LocalServerSocket {
    fn listen(
        self: Box<Self>,
    ) -> Result<(Box<dyn PacketSender>, Box<dyn PacketReceiver>), TableauServerError> {
        let to_server = self.hub.state.lock().unwrap().to_server.clone();
        Ok((
            Box::new(LocalServerSender { hub: self.hub }),
            Box::new(LocalReceiver {
                queue: to_server,
                connected: None,
                reconnected: None,
                current_payload: None,
            }),
        ))
    }
}

struct LocalServerSender {
    hub: LocalHub,
}

impl PacketSender for LocalServerSender {
    fn send(&self, payload: &[u8]) -> Result<(), SendError> {
        let state = self.hub.state.lock().unwrap();
        for client in &state.clients {
            if client.connected.load(Ordering::SeqCst) {
                client.to_client.lock().unwrap().push_back(payload.to_vec());
            }
        }
        Ok(())
    }
}

// Client side

pub struct LocalClientSocket {
    to_server: Queue,
    to_client: Queue,
    connected: Arc<AtomicBool>,
    reconnected: Arc<AtomicBool>,
}

impl From<LocalClientSocket> for Box<dyn ClientSocket> {
    fn from(socket: LocalClientSocket) -> Self {
        Box::new(socket)
    }
}

impl ClientSocket for LocalClientSocket {
    fn connect(self: Box<Self>) -> (Box<dyn PacketSender>, Box<dyn PacketReceiver>) {
        (
            Box::new(LocalClientSender {
                queue: self.to_server,
                connected: self.connected.clone(),
            }),
            Box::new(LocalReceiver {
                queue: self.to_client,
                connected: Some(self.connected),
                reconnected: Some(self.reconnected),
                current_payload: None,
            }),
        )
    }
}

struct LocalClientSender {
    queue: Queue,
    connected: Arc<AtomicBool>,
}

impl PacketSender for LocalClientSender {
    fn send(&self, payload: &[u8]) -> Result<(), SendError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(SendError);
        }
        self.queue.lock().unwrap().push_back(payload.to_vec());
        Ok(())
    }
}

struct LocalReceiver {
    queue: Queue,
    connected: Option<Arc<AtomicBool>>,
    reconnected: Option<Arc<AtomicBool>>,
    current_payload: Option<Vec<u8>>,
}

impl PacketReceiver for LocalReceiver {
    fn receive(&mut self) -> Result<Option<&[u8]>, RecvError> {
        if let Some(connected) = &self.connected {
            if !connected.load(Ordering::SeqCst) {
                return Ok(None);
            }
        }
        let next = self.queue.lock().unwrap().pop_front();
        match next {
            Some(payload) => {
                self.current_payload = Some(payload);
                Ok(self.current_payload.as_deref())
            }
            None => Ok(None),
        }
    }

    fn take_reconnected(&mut self) -> bool {
        self.reconnected
            .as_ref()
            .is_some_and(|flag| flag.swap(false, Ordering::SeqCst))
    }
}
