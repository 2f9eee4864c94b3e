//! Decoded image cache keyed by annotation.

use crate::renderer::{RenderResult, RendererError};
use pagemark_core::annotations::{AnnotationId, Image};
use pagemark_core::AnnotationStore;
use peniko::{Blob, ImageAlphaType, ImageData, ImageFormat};
use std::collections::HashMap;
use std::sync::Arc;

/// Decode result for one image annotation.
#[derive(Debug, Clone)]
pub enum CachedImage {
    Decoded(ImageData),
    /// Decoding failed; drawn as a placeholder without retrying.
    Failed,
}

/// Decode an image annotation's payload to RGBA8.
pub fn decode_image(image: &Image) -> RenderResult<ImageData> {
    let raw = image
        .data()
        .ok_or_else(|| RendererError::ImageDecode("payload is not base64 data".to_string()))?;
    let decoded =
        ::image::load_from_memory(&raw).map_err(|e| RendererError::ImageDecode(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(ImageData {
        data: Blob::new(Arc::new(rgba.into_vec())),
        format: ImageFormat::Rgba8,
        alpha_type: ImageAlphaType::Alpha,
        width,
        height,
    })
}

#[derive(Debug, Default)]
pub struct ImageCache {
    entries: HashMap<AnnotationId, CachedImage>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached bitmap for `id`, decoding it on first use.
    pub fn get_or_decode(&mut self, id: AnnotationId, image: &Image) -> &CachedImage {
        self.entries.entry(id).or_insert_with(|| match decode_image(image) {
            Ok(data) => CachedImage::Decoded(data),
            Err(e) => {
                log::warn!("Cannot display image {}: {}", id, e);
                CachedImage::Failed
            }
        })
    }

    pub fn contains(&self, id: AnnotationId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Forget images whose annotations are gone.
    pub fn retain(&mut self, store: &AnnotationStore) {
        self.entries.retain(|id, _| store.contains(*id));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use kurbo::{Point, Size};
    use std::io::Cursor;

    fn png_data_url() -> String {
        let img = ::image::RgbaImage::from_pixel(2, 3, ::image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ::image::ImageFormat::Png).unwrap();
        format!("data:image/png;base64,{}", STANDARD.encode(&bytes))
    }

    #[test]
    fn test_decode_png() {
        let image = Image::new(1, Point::ZERO, Size::new(10.0, 10.0), png_data_url());
        let data = decode_image(&image).unwrap();
        assert_eq!((data.width, data.height), (2, 3));
        assert_eq!(data.data.data().len(), 2 * 3 * 4);
    }

    #[test]
    fn test_decode_garbage() {
        let image = Image::new(
            1,
            Point::ZERO,
            Size::new(10.0, 10.0),
            "data:image/png;base64,AAAA".to_string(),
        );
        assert!(matches!(decode_image(&image), Err(RendererError::ImageDecode(_))));
    }

    #[test]
    fn test_cache_decodes_once() {
        let mut store = AnnotationStore::new();
        let image = Image::new(1, Point::ZERO, Size::new(10.0, 10.0), png_data_url());
        let id = store.add(image.clone());
        let mut cache = ImageCache::new();

        assert!(matches!(cache.get_or_decode(id, &image), CachedImage::Decoded(_)));
        assert!(matches!(cache.get_or_decode(id, &image), CachedImage::Decoded(_)));
        assert_eq!(cache.len(), 1);

        store.remove(id);
        cache.retain(&store);
        assert!(cache.is_empty());
    }
}
