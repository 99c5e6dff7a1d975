use std::fmt;

use tableau_serde::{ConstByteLength, DataBuffer, Serde, SerdeErr};

/// Byte closing every blob body and every sprite attribute list
pub const TERMINATOR: u8 = 0;

/// Per-sprite-type tag of one field group inside a sprite frame
pub type AttributeId = u8;

/// Process-unique sprite identity, assigned by the server and mirrored
/// verbatim by clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(u32);

impl SpriteId {
    /// Every process owns a root sprite with this id
    pub const ROOT: SpriteId = SpriteId(1);

    /// Wire value standing in for "no parent"
    pub(crate) const NONE: u32 = 0;

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl Serde for SpriteId {
    fn ser(&self, buffer: &mut DataBuffer) {
        self.0.ser(buffer);
    }

    fn de(buffer: &mut DataBuffer) -> Result<Self, SerdeErr> {
        Ok(Self(u32::de(buffer)?))
    }

    fn byte_length(&self) -> usize {
        4
    }
}

impl ConstByteLength for SpriteId {
    fn const_byte_length() -> usize {
        4
    }
}

/// Hands out server-side sprite ids. Ids are never reused within a process.
pub struct SpriteIdGenerator {
    next: u32,
}

impl Default for SpriteIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteIdGenerator {
    pub fn new() -> Self {
        Self {
            next: SpriteId::ROOT.value() + 1,
        }
    }

    pub fn generate(&mut self) -> SpriteId {
        let id = SpriteId(self.next);
        self.next = self.next.wrapping_add(1).max(SpriteId::ROOT.value() + 1);
        id
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    Server,
    Client,
}
