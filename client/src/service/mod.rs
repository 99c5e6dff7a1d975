mod load_image;

pub use load_image::{
    default_decoder, DecodedImage, ImageDecoder, ImageService, ImageToken, LoadImageService,
    UnsupportedImageDecoder,
};

cfg_if! {
    if #[cfg(feature = "image_loading")] {
        pub use load_image::FileImageDecoder;
    } else {}
}
