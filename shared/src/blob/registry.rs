use log::{trace, warn};

use tableau_serde::DataBuffer;

use crate::blob::{
    error::BlobError,
    kind::{BlobKind, BlobType},
};

/// Reads one blob body (the type byte already consumed) into the context
pub type BlobHandler<C> = Box<dyn FnMut(&mut C, &mut DataBuffer) -> Result<(), BlobError>>;

/// Maps one-byte blob types to handlers.
///
/// Types are handed out sequentially from zero in registration order, so two
/// registries built with the same sequence of kinds agree on every id.
pub struct BlobRegistry<C> {
    entries: Vec<(BlobKind, BlobHandler<C>)>,
    locked: bool,
}

impl<C> Default for BlobRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> BlobRegistry<C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            locked: false,
        }
    }

    pub fn add(&mut self, kind: BlobKind, handler: BlobHandler<C>) -> Result<BlobType, BlobError> {
        if self.locked {
            return Err(BlobError::RegistryLocked { kind });
        }
        let blob_type = BlobType::try_from(self.entries.len()).map_err(|_| BlobError::RegistryFull)?;
        self.entries.push((kind, handler));
        Ok(blob_type)
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn blob_type(&self, kind: BlobKind) -> Option<BlobType> {
        self.entries
            .iter()
            .position(|(entry_kind, _)| *entry_kind == kind)
            .and_then(|index| BlobType::try_from(index).ok())
    }

    pub fn kind_of(&self, blob_type: BlobType) -> Option<BlobKind> {
        self.entries
            .get(usize::from(blob_type))
            .map(|(kind, _)| *kind)
    }

    /// Read one type byte and hand the body to its handler
    pub fn dispatch(&mut self, context: &mut C, buffer: &mut DataBuffer) -> Result<BlobKind, BlobError> {
        let blob_type = buffer.read::<u8>()?;
        let registered = self.entries.len();
        let Some((kind, handler)) = self.entries.get_mut(usize::from(blob_type)) else {
            return Err(BlobError::UnknownBlobType {
                blob_type,
                registered,
            });
        };
        handler(context, buffer)?;
        Ok(*kind)
    }

    /// Dispatch every blob in a transport message. The first failure drops
    /// the rest of the message. Returns the number of blobs handled.
    pub fn dispatch_all(&mut self, context: &mut C, buffer: &mut DataBuffer) -> usize {
        let mut handled = 0;
        while buffer.remaining() > 0 {
            match self.dispatch(context, buffer) {
                Ok(_) => handled += 1,
                Err(BlobError::Discarded { reason }) => {
                    let skipped = buffer.skip_remaining();
                    trace!("Discarding rest of message ({skipped} bytes): {reason}");
                }
                Err(error) => {
                    let skipped = buffer.skip_remaining();
                    warn!("Dropping rest of message ({skipped} bytes unread): {error}");
                }
            }
        }
        handled
    }
}
