use tableau_serde::{ConstByteLength, DataBuffer, Serde, SerdeErr};

use crate::math::{read_vec3, write_vec3, Vec3};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    Added,
    Moved,
    Removed,
}

impl Serde for TouchPhase {
    fn ser(&self, buffer: &mut DataBuffer) {
        let index: u8 = match self {
            TouchPhase::Added => 0,
            TouchPhase::Moved => 1,
            TouchPhase::Removed => 2,
        };
        index.ser(buffer);
    }

    fn de(buffer: &mut DataBuffer) -> Result<Self, SerdeErr> {
        match u8::de(buffer)? {
            0 => Ok(TouchPhase::Added),
            1 => Ok(TouchPhase::Moved),
            2 => Ok(TouchPhase::Removed),
            value => Err(SerdeErr::InvalidDiscriminant {
                type_name: "TouchPhase",
                value: u32::from(value),
            }),
        }
    }

    fn byte_length(&self) -> usize {
        1
    }
}

/// One finger sample, in world coordinates unless stated otherwise
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub finger_id: i32,
    pub point: Vec3,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase, finger_id: i32, point: Vec3) -> Self {
        Self {
            phase,
            finger_id,
            point,
        }
    }
}

impl Serde for TouchEvent {
    fn ser(&self, buffer: &mut DataBuffer) {
        self.phase.ser(buffer);
        self.finger_id.ser(buffer);
        write_vec3(buffer, self.point);
    }

    fn de(buffer: &mut DataBuffer) -> Result<Self, SerdeErr> {
        Ok(Self {
            phase: TouchPhase::de(buffer)?,
            finger_id: i32::de(buffer)?,
            point: read_vec3(buffer)?,
        })
    }

    fn byte_length(&self) -> usize {
        Self::const_byte_length()
    }
}

impl ConstByteLength for TouchEvent {
    fn const_byte_length() -> usize {
        1 + 4 + 12
    }
}

/// A keyboard sample forwarded to a web view
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key_code: u32,
    pub character: u32,
    pub down: bool,
}

impl Serde for KeyEvent {
    fn ser(&self, buffer: &mut DataBuffer) {
        self.key_code.ser(buffer);
        self.character.ser(buffer);
        self.down.ser(buffer);
    }

    fn de(buffer: &mut DataBuffer) -> Result<Self, SerdeErr> {
        Ok(Self {
            key_code: u32::de(buffer)?,
            character: u32::de(buffer)?,
            down: bool::de(buffer)?,
        })
    }

    fn byte_length(&self) -> usize {
        9
    }
}

/// Writes `count u16` followed by each item. Lists longer than `u16::MAX`
/// are truncated; the caller keeps the tail.
pub(crate) fn write_list<T: Serde>(buffer: &mut DataBuffer, items: &[T]) -> usize {
    let count = items.len().min(usize::from(u16::MAX));
    u16::try_from(count).unwrap_or(u16::MAX).ser(buffer);
    for item in &items[..count] {
        item.ser(buffer);
    }
    count
}

pub(crate) fn read_list<T: Serde>(buffer: &mut DataBuffer) -> Result<Vec<T>, SerdeErr> {
    let count = u16::de(buffer)?;
    let mut items = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        items.push(T::de(buffer)?);
    }
    Ok(items)
}
