use crate::{data_buffer::DataBuffer, error::SerdeErr};

/// A type that can be appended to and read back out of a [`DataBuffer`]
pub trait Serde: Sized {
    /// Append the canonical byte representation of `self`
    fn ser(&self, buffer: &mut DataBuffer);

    /// Consume the next bytes of `buffer` as a `Self`
    fn de(buffer: &mut DataBuffer) -> Result<Self, SerdeErr>;

    /// Number of bytes `ser` appends for this value
    fn byte_length(&self) -> usize;
}

/// A type whose encoding always occupies the same number of bytes. Used by
/// [`DataBuffer::can_read`] to check for underrun before reading.
pub trait ConstByteLength {
    fn const_byte_length() -> usize;
}

macro_rules! impl_serde_for_number {
    ($($ty:ty),*) => {$(
        impl Serde for $ty {
            fn ser(&self, buffer: &mut DataBuffer) {
                buffer.write_bytes(&self.to_le_bytes());
            }

            fn de(buffer: &mut DataBuffer) -> Result<Self, SerdeErr> {
                let mut bytes = [0u8; std::mem::size_of::<$ty>()];
                bytes.copy_from_slice(buffer.read_bytes(std::mem::size_of::<$ty>())?);
                Ok(<$ty>::from_le_bytes(bytes))
            }

            fn byte_length(&self) -> usize {
                std::mem::size_of::<$ty>()
            }
        }

        impl ConstByteLength for $ty {
            fn const_byte_length() -> usize {
                std::mem::size_of::<$ty>()
            }
        }
    )*};
}

impl_serde_for_number!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

impl Serde for bool {
    fn ser(&self, buffer: &mut DataBuffer) {
        u8::from(*self).ser(buffer);
    }

    fn de(buffer: &mut DataBuffer) -> Result<Self, SerdeErr> {
        match u8::de(buffer)? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(SerdeErr::InvalidBool { value }),
        }
    }

    fn byte_length(&self) -> usize {
        1
    }
}

impl ConstByteLength for bool {
    fn const_byte_length() -> usize {
        1
    }
}

// Strings are a u32 byte length followed by UTF-8 bytes
impl Serde for String {
    fn ser(&self, buffer: &mut DataBuffer) {
        let max_length = usize::try_from(u32::MAX).unwrap_or(usize::MAX);
        let text = truncate_on_char_boundary(self, max_length);
        u32::try_from(text.len()).unwrap_or(u32::MAX).ser(buffer);
        buffer.write_bytes(text.as_bytes());
    }

    fn de(buffer: &mut DataBuffer) -> Result<Self, SerdeErr> {
        let length = u32::de(buffer)? as usize;
        let bytes = buffer.read_bytes(length)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| SerdeErr::InvalidUtf8 { length })
    }

    fn byte_length(&self) -> usize {
        4 + self.len()
    }
}

/// Longest prefix of `text` no longer than `max_length` bytes that ends on
/// a character boundary
fn truncate_on_char_boundary(text: &str, max_length: usize) -> &str {
    if text.len() <= max_length {
        return text;
    }
    let mut length = max_length;
    while !text.is_char_boundary(length) {
        length -= 1;
    }
    &text[..length]
}
