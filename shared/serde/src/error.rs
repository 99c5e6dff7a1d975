use thiserror::Error;

/// Errors that can occur while decoding values out of a [`DataBuffer`](crate::DataBuffer)
///
/// SECURITY: every variant can be produced by a malformed or truncated frame
/// coming off the network. Decoding never panics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// Fewer bytes remain than the value being read requires
    #[error("Buffer underrun: needed {needed} bytes but only {remaining} remain")]
    Underrun { needed: usize, remaining: usize },

    /// A bool was encoded as something other than 0 or 1
    #[error("Invalid bool byte {value} (expected 0 or 1)")]
    InvalidBool { value: u8 },

    /// A string payload was not valid UTF-8
    #[error("String payload of {length} bytes is not valid UTF-8")]
    InvalidUtf8 { length: usize },

    /// An enum discriminant was read that has no matching variant
    #[error("Invalid {type_name} discriminant {value}")]
    InvalidDiscriminant {
        type_name: &'static str,
        value: u32,
    },
}
