use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
    thread,
};

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, warn};
use parking_lot::Mutex;

use tableau_shared::{SpriteId, SpriteTree, IMG_CACHE_F};

use crate::LoadImageError;

/// Tightly packed RGBA8 pixels
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Turns a filename into pixels. Runs on the loader thread.
pub trait ImageDecoder: Send + 'static {
    fn decode(&self, path: &Path, flags: u32) -> Result<DecodedImage, LoadImageError>;
}

/// Used when the crate is built without an image codec
pub struct UnsupportedImageDecoder;

impl ImageDecoder for UnsupportedImageDecoder {
    fn decode(&self, path: &Path, _flags: u32) -> Result<DecodedImage, LoadImageError> {
        Err(LoadImageError::Unsupported {
            path: path.to_path_buf(),
        })
    }
}

cfg_if! {
    if #[cfg(feature = "image_loading")] {
        /// Reads images from disk with the `image` crate
        pub struct FileImageDecoder;

        impl ImageDecoder for FileImageDecoder {
            fn decode(&self, path: &Path, _flags: u32) -> Result<DecodedImage, LoadImageError> {
                let decoded = image::open(path).map_err(|error| match error {
                    image::ImageError::IoError(source) => LoadImageError::Io {
                        path: path.to_path_buf(),
                        source,
                    },
                    other => LoadImageError::Decode {
                        path: path.to_path_buf(),
                        reason: other.to_string(),
                    },
                })?;
                let rgba = decoded.to_rgba8();
                Ok(DecodedImage {
                    width: rgba.width(),
                    height: rgba.height(),
                    rgba: rgba.into_raw(),
                })
            }
        }

        pub fn default_decoder() -> Box<dyn ImageDecoder> {
            Box::new(FileImageDecoder)
        }
    } else {
        pub fn default_decoder() -> Box<dyn ImageDecoder> {
            Box::new(UnsupportedImageDecoder)
        }
    }
}

type ImageResult = Result<Arc<DecodedImage>, LoadImageError>;

struct TokenSlot {
    alive: bool,
    result: Option<ImageResult>,
}

/// Claim on one pending image load.
///
/// The loader thread writes the result into the token's slot. Dropping the
/// token marks the slot dead, so a load finishing afterwards is thrown away
/// and a load not yet started is skipped.
pub struct ImageToken {
    slot: Arc<Mutex<TokenSlot>>,
}

impl ImageToken {
    /// Take the result if the load has finished
    pub fn try_take(&mut self) -> Option<ImageResult> {
        self.slot.lock().result.take()
    }
}

impl Drop for ImageToken {
    fn drop(&mut self) {
        self.slot.lock().alive = false;
    }
}

struct LoadJob {
    path: PathBuf,
    flags: u32,
    slot: Arc<Mutex<TokenSlot>>,
}

/// Decodes images on a worker thread
pub struct LoadImageService {
    jobs: Sender<LoadJob>,
}

impl LoadImageService {
    pub fn new(decoder: Box<dyn ImageDecoder>) -> Self {
        let (jobs, job_receiver) = crossbeam_channel::unbounded::<LoadJob>();
        thread::spawn(move || run_loader(decoder, job_receiver));
        Self { jobs }
    }

    pub fn load(&self, path: impl Into<PathBuf>, flags: u32) -> ImageToken {
        let slot = Arc::new(Mutex::new(TokenSlot {
            alive: true,
            result: None,
        }));
        let job = LoadJob {
            path: path.into(),
            flags,
            slot: slot.clone(),
        };
        if self.jobs.send(job).is_err() {
            slot.lock().result = Some(Err(LoadImageError::LoaderStopped));
        }
        ImageToken { slot }
    }
}

fn run_loader(decoder: Box<dyn ImageDecoder>, jobs: Receiver<LoadJob>) {
    for job in jobs.iter() {
        if !job.slot.lock().alive {
            debug!("Skipping abandoned load of {}", job.path.display());
            continue;
        }
        let result = decoder.decode(&job.path, job.flags).map(Arc::new);
        let mut slot = job.slot.lock();
        if slot.alive {
            slot.result = Some(result);
        }
    }
    info!("Image loader stopped");
}

enum ImageState {
    Loading(ImageToken),
    Ready(Arc<DecodedImage>),
    Failed,
}

struct ImageEntry {
    filename: String,
    flags: u32,
    state: ImageState,
}

/// Keeps the pixels of every image sprite in the mirror up to date
pub struct ImageService {
    loader: LoadImageService,
    entries: HashMap<SpriteId, ImageEntry>,
    cache: HashMap<String, Arc<DecodedImage>>,
}

impl ImageService {
    pub fn new(decoder: Box<dyn ImageDecoder>) -> Self {
        Self {
            loader: LoadImageService::new(decoder),
            entries: HashMap::new(),
            cache: HashMap::new(),
        }
    }

    /// Pixels for `id`, once loaded
    pub fn image(&self, id: SpriteId) -> Option<&Arc<DecodedImage>> {
        match &self.entries.get(&id)?.state {
            ImageState::Ready(image) => Some(image),
            _ => None,
        }
    }

    pub fn is_loading(&self, id: SpriteId) -> bool {
        matches!(
            self.entries.get(&id).map(|entry| &entry.state),
            Some(ImageState::Loading(_))
        )
    }

    /// Start loads for image sprites whose file changed, and forget sprites
    /// that are gone or changed kind
    pub fn sync(&mut self, tree: &SpriteTree, changed: &[SpriteId]) {
        for id in changed {
            let Some(image) = tree.sprite(*id).and_then(|sprite| sprite.as_image()) else {
                // dropping the token cancels an in-flight load
                self.entries.remove(id);
                continue;
            };
            let unchanged = self.entries.get(id).is_some_and(|entry| {
                entry.filename == image.filename() && entry.flags == image.flags()
            });
            if unchanged {
                continue;
            }
            if image.filename().is_empty() {
                self.entries.remove(id);
                continue;
            }

            let state = match self.cache.get(image.filename()) {
                Some(cached) => ImageState::Ready(cached.clone()),
                None => ImageState::Loading(self.loader.load(image.filename(), image.flags())),
            };
            self.entries.insert(
                *id,
                ImageEntry {
                    filename: image.filename().to_string(),
                    flags: image.flags(),
                    state,
                },
            );
        }
    }

    /// Collect finished loads. Sizes come from the server; the mirror is
    /// never written here.
    pub fn poll(&mut self) {
        for (id, entry) in self.entries.iter_mut() {
            let ImageState::Loading(token) = &mut entry.state else {
                continue;
            };
            let Some(result) = token.try_take() else {
                continue;
            };
            match result {
                Ok(image) => {
                    if entry.flags & IMG_CACHE_F != 0 {
                        self.cache.insert(entry.filename.clone(), image.clone());
                    }
                    entry.state = ImageState::Ready(image);
                }
                Err(error) => {
                    warn!("Image sprite {id} stays empty: {error}");
                    entry.state = ImageState::Failed;
                }
            }
        }
    }

    /// Drop everything, e.g. when the mirror is rebuilt
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
