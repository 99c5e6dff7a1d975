use tableau_serde::{ConstByteLength, DataBuffer, Serde, SerdeErr};

/// Single-byte control codes carried by the `COMMAND` blob
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Sent by a client with no state; the server answers with a full world
    ClientRequestWorld,
    /// Sent by the server immediately before a full world dump
    ServerSendWorld,
}

impl Command {
    pub const CLIENT_REQUEST_WORLD: u8 = 1;
    pub const SERVER_SEND_WORLD: u8 = 2;

    pub fn code(&self) -> u8 {
        match self {
            Command::ClientRequestWorld => Self::CLIENT_REQUEST_WORLD,
            Command::ServerSendWorld => Self::SERVER_SEND_WORLD,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            Self::CLIENT_REQUEST_WORLD => Some(Command::ClientRequestWorld),
            Self::SERVER_SEND_WORLD => Some(Command::ServerSendWorld),
            _ => None,
        }
    }
}

impl Serde for Command {
    fn ser(&self, buffer: &mut DataBuffer) {
        self.code().ser(buffer);
    }

    fn de(buffer: &mut DataBuffer) -> Result<Self, SerdeErr> {
        let code = u8::de(buffer)?;
        Self::from_code(code).ok_or(SerdeErr::InvalidDiscriminant {
            type_name: "Command",
            value: u32::from(code),
        })
    }

    fn byte_length(&self) -> usize {
        1
    }
}

impl ConstByteLength for Command {
    fn const_byte_length() -> usize {
        1
    }
}
