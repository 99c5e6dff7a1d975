cfg_if! {
    if #[cfg(feature = "zstd_support")]
    {
        use zstd::bulk::Decompressor;

        use super::compression_config::CompressionMode;
        use super::error::DecoderError;

        /// Upper bound on a decompressed message
        const MAX_DECOMPRESSED_SIZE: usize = 64 * 1024 * 1024;

        pub struct Decoder {
            result: Vec<u8>,
            decompressor: Decompressor<'static>,
        }

        impl Decoder {
            pub fn try_new(compression_mode: CompressionMode) -> Result<Self, DecoderError> {
                let decompressor = match compression_mode {
                    CompressionMode::Default(_) => {
                        Decompressor::new().map_err(|_| DecoderError::DecompressorCreationFailed)?
                    }
                    CompressionMode::Dictionary(_, dictionary) => Decompressor::with_dictionary(&dictionary)
                        .map_err(|_| DecoderError::DecompressorWithDictionaryFailed)?,
                };

                Ok(Self {
                    result: Vec::new(),
                    decompressor,
                })
            }

            /// SECURITY: `payload` comes off the network. Malformed input
            /// returns an error instead of panicking.
            pub fn try_decode(&mut self, payload: &[u8]) -> Result<&[u8], DecoderError> {
                let upper_bound = match zstd::zstd_safe::get_frame_content_size(payload) {
                    Ok(Some(size)) => usize::try_from(size)
                        .unwrap_or(MAX_DECOMPRESSED_SIZE)
                        .min(MAX_DECOMPRESSED_SIZE),
                    _ => {
                        return Err(DecoderError::UnknownContentSize {
                            payload_size: payload.len(),
                        })
                    }
                };

                self.result = self
                    .decompressor
                    .decompress(payload, upper_bound)
                    .map_err(|_| DecoderError::DecompressionFailed {
                        payload_size: payload.len(),
                    })?;
                Ok(&self.result)
            }
        }
    }
    else
    {
        use super::compression_config::CompressionMode;
        use super::error::DecoderError;

        /// Pass-through used when zstd support is compiled out
        pub struct Decoder {
            result: Vec<u8>,
        }

        impl Decoder {
            pub fn try_new(_: CompressionMode) -> Result<Self, DecoderError> {
                Ok(Self { result: Vec::new() })
            }

            pub fn try_decode(&mut self, payload: &[u8]) -> Result<&[u8], DecoderError> {
                self.result = payload.to_vec();
                Ok(&self.result)
            }
        }
    }
}
