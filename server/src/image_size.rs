cfg_if! {
    if #[cfg(feature = "image_metadata")] {
        use log::debug;

        use tableau_shared::ImageSizer;

        /// Reads image headers from disk with the `image` crate
        pub struct FileImageSizer;

        impl ImageSizer for FileImageSizer {
            fn dimensions(&self, filename: &str) -> Option<(u32, u32)> {
                match image::image_dimensions(filename) {
                    Ok(dimensions) => Some(dimensions),
                    Err(error) => {
                        debug!("No size for image {filename}: {error}");
                        None
                    }
                }
            }
        }

        pub(crate) fn install_default_sizer(tree: &mut tableau_shared::SpriteTree) {
            tree.set_image_sizer(Box::new(FileImageSizer));
        }

    } else {
        pub(crate) fn install_default_sizer(_tree: &mut tableau_shared::SpriteTree) {}
    }
}
