cfg_if! {
    if #[cfg(feature = "zstd_support")]
    {
        use zstd::bulk::Compressor;

        use super::compression_config::CompressionMode;
        use super::error::EncoderError;

        pub struct Encoder {
            result: Vec<u8>,
            compressor: Compressor<'static>,
        }

        impl Encoder {
            pub fn try_new(compression_mode: CompressionMode) -> Result<Self, EncoderError> {
                let compressor = match compression_mode {
                    CompressionMode::Default(compression_level) => Compressor::new(compression_level)
                        .map_err(|_| EncoderError::CompressorCreationFailed {
                            level: compression_level,
                        })?,
                    CompressionMode::Dictionary(compression_level, dictionary) => {
                        Compressor::with_dictionary(compression_level, &dictionary).map_err(|_| {
                            EncoderError::CompressorWithDictionaryFailed {
                                level: compression_level,
                            }
                        })?
                    }
                };

                Ok(Self {
                    result: Vec::new(),
                    compressor,
                })
            }

            pub fn try_encode(&mut self, payload: &[u8]) -> Result<&[u8], EncoderError> {
                self.result = self
                    .compressor
                    .compress(payload)
                    .map_err(|_| EncoderError::CompressionFailed {
                        payload_size: payload.len(),
                    })?;
                Ok(&self.result)
            }
        }
    }
    else
    {
        use super::compression_config::CompressionMode;
        use super::error::EncoderError;

        /// Pass-through used when zstd support is compiled out
        pub struct Encoder {
            result: Vec<u8>,
        }

        impl Encoder {
            pub fn try_new(_: CompressionMode) -> Result<Self, EncoderError> {
                Ok(Self { result: Vec::new() })
            }

            pub fn try_encode(&mut self, payload: &[u8]) -> Result<&[u8], EncoderError> {
                self.result = payload.to_vec();
                Ok(&self.result)
            }
        }
    }
}
