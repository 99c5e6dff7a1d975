use std::{
    net::{Shutdown, SocketAddr, TcpStream},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use log::{debug, info, warn};

use tableau_shared::transport::{read_message, write_message};

use super::{
    PacketReceiver as TransportReceiver, PacketSender as TransportSender, RecvError, SendError,
    Socket as TransportSocket,
};

const WRITER_POLL: Duration = Duration::from_millis(50);

/// Length-prefixed messages over TCP, with automatic reconnection.
///
/// A connection thread owns the stream. It writes queued messages, spawns a
/// reader per connection and, when the connection drops, waits
/// `reconnect_interval` plus up to half of it again at random before the
/// next attempt.
pub struct Socket {
    server_addr: SocketAddr,
    reconnect_interval: Duration,
}

impl Socket {
    pub fn new(server_addr: SocketAddr, reconnect_interval: Duration) -> Self {
        Self {
            server_addr,
            reconnect_interval,
        }
    }
}

impl From<Socket> for Box<dyn TransportSocket> {
    fn from(socket: Socket) -> Self {
        Box::new(socket)
    }
}

impl TransportSocket for Socket {
    fn connect(self: Box<Self>) -> (Box<dyn TransportSender>, Box<dyn TransportReceiver>) {
        let (outgoing_sender, outgoing_receiver) = crossbeam_channel::unbounded::<Vec<u8>>();
        let (incoming_sender, incoming_receiver) = crossbeam_channel::unbounded::<Vec<u8>>();
        let reconnected = Arc::new(AtomicBool::new(false));

        let server_addr = self.server_addr;
        let reconnect_interval = self.reconnect_interval;
        let connection_flag = reconnected.clone();
        thread::spawn(move || {
            maintain_connection(
                server_addr,
                reconnect_interval,
                outgoing_receiver,
                incoming_sender,
                connection_flag,
            )
        });

        (
            Box::new(TcpPacketSender { outgoing_sender }),
            Box::new(TcpPacketReceiver {
                incoming_receiver,
                current_payload: None,
                reconnected,
            }),
        )
    }
}

enum SessionEnd {
    ConnectionLost,
    ClientDropped,
}

fn maintain_connection(
    server_addr: SocketAddr,
    reconnect_interval: Duration,
    outgoing: Receiver<Vec<u8>>,
    incoming: Sender<Vec<u8>>,
    reconnected: Arc<AtomicBool>,
) {
    loop {
        match TcpStream::connect(server_addr) {
            Ok(stream) => {
                info!("Connected to server at {server_addr}");
                reconnected.store(true, Ordering::Release);
                match serve_connection(stream, &outgoing, &incoming) {
                    SessionEnd::ClientDropped => return,
                    SessionEnd::ConnectionLost => warn!("Lost connection to {server_addr}"),
                }
            }
            Err(error) => debug!("Could not reach server at {server_addr}: {error}"),
        }

        let max_jitter = u64::try_from(reconnect_interval.as_millis()).unwrap_or(u64::MAX) / 2;
        let jitter = Duration::from_millis(fastrand::u64(0..=max_jitter));
        thread::sleep(reconnect_interval + jitter);
    }
}

fn serve_connection(
    stream: TcpStream,
    outgoing: &Receiver<Vec<u8>>,
    incoming: &Sender<Vec<u8>>,
) -> SessionEnd {
    if let Err(error) = stream.set_nodelay(true) {
        debug!("Could not disable Nagle: {error}");
    }
    let mut reader = match stream.try_clone() {
        Ok(reader) => reader,
        Err(error) => {
            warn!("Could not split connection: {error}");
            return SessionEnd::ConnectionLost;
        }
    };
    let mut writer = stream;

    let reader_done = Arc::new(AtomicBool::new(false));
    let reader_flag = reader_done.clone();
    let incoming = incoming.clone();
    let reader_thread = thread::spawn(move || {
        loop {
            match read_message(&mut reader) {
                Ok(message) => {
                    if incoming.send(message).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    info!("Server connection closed: {error}");
                    break;
                }
            }
        }
        reader_flag.store(true, Ordering::Release);
    });

    let end = loop {
        match outgoing.recv_timeout(WRITER_POLL) {
            Ok(payload) => {
                if let Err(error) = write_message(&mut writer, &payload) {
                    warn!("Failed to send {} bytes: {error}", payload.len());
                    break SessionEnd::ConnectionLost;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if reader_done.load(Ordering::Acquire) {
                    break SessionEnd::ConnectionLost;
                }
            }
            Err(RecvTimeoutError::Disconnected) => break SessionEnd::ClientDropped,
        }
    };

    let _ = writer.shutdown(Shutdown::Both);
    let _ = reader_thread.join();
    end
}

struct TcpPacketSender {
    outgoing_sender: Sender<Vec<u8>>,
}

impl TransportSender for TcpPacketSender {
    fn send(&self, payload: &[u8]) -> Result<(), SendError> {
        self.outgoing_sender
            .send(payload.to_vec())
            .map_err(|_| SendError)
    }
}

struct TcpPacketReceiver {
    incoming_receiver: Receiver<Vec<u8>>,
    current_payload: Option<Vec<u8>>,
    reconnected: Arc<AtomicBool>,
}

impl TransportReceiver for TcpPacketReceiver {
    fn receive(&mut self) -> Result<Option<&[u8]>, RecvError> {
        match self.incoming_receiver.try_recv() {
            Ok(payload) => {
                self.current_payload = Some(payload);
                Ok(self.current_payload.as_deref())
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(RecvError),
        }
    }

    fn take_reconnected(&mut self) -> bool {
        self.reconnected.swap(false, Ordering::AcqRel)
    }
}
