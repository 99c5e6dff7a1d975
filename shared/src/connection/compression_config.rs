/// Optional zstd compression of whole transport messages, configured per
/// direction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompressionConfig {
    pub server_to_client: Option<CompressionMode>,
    pub client_to_server: Option<CompressionMode>,
}

impl CompressionConfig {
    pub fn new(
        server_to_client: Option<CompressionMode>,
        client_to_server: Option<CompressionMode>,
    ) -> Self {
        Self {
            server_to_client,
            client_to_server,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompressionMode {
    /// Compression level, from -7 (fastest) to 22 (smallest)
    Default(i32),
    /// Compression level plus a dictionary shared by both ends
    Dictionary(i32, Vec<u8>),
}
