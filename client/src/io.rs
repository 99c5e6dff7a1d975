use log::warn;

use tableau_shared::{CompressionConfig, Decoder, Encoder};

use crate::{
    transport::{PacketReceiver, PacketSender},
    TableauClientError,
};

/// The client end of the transport, plus optional compression in each
/// direction
pub struct Io {
    packet_sender: Option<Box<dyn PacketSender>>,
    packet_receiver: Option<Box<dyn PacketReceiver>>,
    outgoing_encoder: Option<Encoder>,
    incoming_decoder: Option<Decoder>,
}

impl Io {
    pub fn new(compression: &CompressionConfig) -> Result<Self, TableauClientError> {
        let outgoing_encoder = match &compression.client_to_server {
            Some(mode) => Some(Encoder::try_new(mode.clone())?),
            None => None,
        };
        let incoming_decoder = match &compression.server_to_client {
            Some(mode) => Some(Decoder::try_new(mode.clone())?),
            None => None,
        };

        Ok(Self {
            packet_sender: None,
            packet_receiver: None,
            outgoing_encoder,
            incoming_decoder,
        })
    }

    pub fn load(
        &mut self,
        packet_sender: Box<dyn PacketSender>,
        packet_receiver: Box<dyn PacketReceiver>,
    ) -> Result<(), TableauClientError> {
        if self.is_loaded() {
            return Err(TableauClientError::AlreadyConnected);
        }
        self.packet_sender = Some(packet_sender);
        self.packet_receiver = Some(packet_receiver);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.packet_sender.is_some()
    }

    pub fn take_reconnected(&mut self) -> bool {
        self.packet_receiver
            .as_mut()
            .is_some_and(|receiver| receiver.take_reconnected())
    }

    pub fn send_packet(&mut self, payload: &[u8]) {
        let Some(sender) = &self.packet_sender else {
            return;
        };
        let result = match &mut self.outgoing_encoder {
            Some(encoder) => match encoder.try_encode(payload) {
                Ok(encoded) => sender.send(encoded),
                Err(error) => {
                    warn!("Dropping outgoing frame: {error}");
                    return;
                }
            },
            None => sender.send(payload),
        };
        if result.is_err() {
            warn!("Client failed to send frame of {} bytes", payload.len());
        }
    }

    pub fn recv_packet(&mut self) -> Option<Vec<u8>> {
        let receiver = self.packet_receiver.as_mut()?;
        loop {
            let payload = match receiver.receive() {
                Ok(Some(payload)) => payload,
                Ok(None) => return None,
                Err(_) => {
                    warn!("Client error receiving packet");
                    return None;
                }
            };
            match &mut self.incoming_decoder {
                Some(decoder) => match decoder.try_decode(payload) {
                    Ok(decoded) => return Some(decoded.to_vec()),
                    Err(error) => warn!("Dropping inbound frame: {error}"),
                },
                None => return Some(payload.to_vec()),
            }
        }
    }
}
