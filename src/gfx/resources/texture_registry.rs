//! Tagged texture slots
//!
//! Images are decoded on the CPU into RGBA8 and kept in load order. The render
//! engine uploads each slot once; draw calls refer to textures by slot index.

use image::imageops::FilterType;
use std::path::Path;

use crate::error::TextureError;

/// Upper bound on simultaneously registered textures
pub const MAX_TEXTURE_SLOTS: usize = 16;

/// Files loaded for the clock scene and the tags they are registered under
pub const SCENE_TEXTURES: [(&str, &str); 7] = [
    ("clockface.png", "clockface1"),
    ("hypno.jpg", "clockface2"),
    ("knobtexture.png", "goldTexture"),
    ("darkgrain.jpg", "handsTexture"),
    ("rusticwood.jpg", "woodTexture"),
    ("backdrop.jpg", "backdropTexture"),
    ("DisintegrationofPersistence.jpg", "disintegration"),
];

/// Decoded RGBA8 pixels, bottom row first
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ImageData {
    /// Decodes an image file, accepting only RGB and RGBA sources.
    ///
    /// Rows are flipped so that texture coordinate v = 0 addresses the bottom
    /// of the picture.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let channels = image.color().channel_count();
        if channels != 3 && channels != 4 {
            return Err(TextureError::UnsupportedChannels {
                path: path.to_path_buf(),
                channels,
            });
        }

        let rgba = image.flipv().to_rgba8();
        log::info!(
            "Loaded image {} ({}x{}, {} channels)",
            path.display(),
            rgba.width(),
            rgba.height(),
            channels
        );

        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }

    /// A single opaque white texel, bound wherever no texture is selected
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        }
    }

    /// Levels in a full mip chain down to 1x1
    pub fn mip_level_count(&self) -> u32 {
        32 - self.width.max(self.height).max(1).leading_zeros()
    }

    /// The image followed by successively halved copies, ending at 1x1
    pub fn mip_chain(&self) -> Vec<ImageData> {
        let mut levels = vec![self.clone()];
        let Some(base) = image::RgbaImage::from_raw(self.width, self.height, self.rgba.clone())
        else {
            log::warn!(
                "Pixel buffer does not match {}x{}, skipping mipmaps",
                self.width,
                self.height
            );
            return levels;
        };

        for level in 1..self.mip_level_count() {
            let width = (self.width >> level).max(1);
            let height = (self.height >> level).max(1);
            let scaled = image::imageops::resize(&base, width, height, FilterType::Triangle);
            levels.push(ImageData {
                width,
                height,
                rgba: scaled.into_raw(),
            });
        }
        levels
    }
}

/// One registered texture
#[derive(Debug, Clone)]
pub struct TextureSlot {
    pub tag: String,
    pub image: ImageData,
}

#[derive(Debug, Default)]
pub struct TextureRegistry {
    slots: Vec<TextureSlot>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `path` and stores it in the next free slot under `tag`
    pub fn load(&mut self, path: impl AsRef<Path>, tag: &str) -> Result<usize, TextureError> {
        self.check_free(tag)?;
        let path = path.as_ref();
        let image = ImageData::load(path)?;
        log::debug!(
            "Decoded {} ({}x{}) for '{}'",
            path.display(),
            image.width,
            image.height,
            tag
        );
        self.insert(tag, image)
    }

    /// Registers already decoded pixels under `tag`
    pub fn register(&mut self, tag: &str, image: ImageData) -> Result<usize, TextureError> {
        self.check_free(tag)?;
        self.insert(tag, image)
    }

    fn check_free(&self, tag: &str) -> Result<(), TextureError> {
        if self.find_slot(tag).is_some() {
            return Err(TextureError::DuplicateTag(tag.to_string()));
        }
        if self.slots.len() >= MAX_TEXTURE_SLOTS {
            return Err(TextureError::SlotsExhausted {
                tag: tag.to_string(),
            });
        }
        Ok(())
    }

    fn insert(&mut self, tag: &str, image: ImageData) -> Result<usize, TextureError> {
        let slot = self.slots.len();
        self.slots.push(TextureSlot {
            tag: tag.to_string(),
            image,
        });
        log::debug!("Texture '{}' bound to slot {}", tag, slot);
        Ok(slot)
    }

    /// Slot index of the first texture registered under `tag`
    pub fn find_slot(&self, tag: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.tag == tag)
    }

    pub fn slots(&self) -> &[TextureSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Loads every scene texture found in `dir`.
///
/// A texture that fails to load is reported and skipped; objects that ask for
/// its tag later fall back to their flat color.
pub fn load_scene_textures(dir: impl AsRef<Path>) -> TextureRegistry {
    let dir = dir.as_ref();
    let mut registry = TextureRegistry::new();

    for (file, tag) in SCENE_TEXTURES {
        if let Err(e) = registry.load(dir.join(file), tag) {
            log::warn!("Skipping texture '{}': {}", tag, e);
        }
    }

    log::info!(
        "{} of {} scene textures loaded from {}",
        registry.len(),
        SCENE_TEXTURES.len(),
        dir.display()
    );
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    fn write_two_row_png(path: &Path) {
        // Top row red, bottom row blue
        let mut image = RgbImage::new(1, 2);
        image.put_pixel(0, 0, Rgb([255, 0, 0]));
        image.put_pixel(0, 1, Rgb([0, 0, 255]));
        image.save(path).unwrap();
    }

    #[test]
    fn test_load_flips_and_expands_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.png");
        write_two_row_png(&path);

        let data = ImageData::load(&path).unwrap();
        assert_eq!((data.width, data.height), (1, 2));
        assert_eq!(data.rgba.len(), 8);
        // Bottom row comes first after the flip
        assert_eq!(&data.rgba[0..4], &[0, 0, 255, 255]);
        assert_eq!(&data.rgba[4..8], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_mip_chain_halves_down_to_one_texel() {
        let image = ImageData {
            width: 8,
            height: 2,
            rgba: [10, 20, 30, 255].repeat(16),
        };
        assert_eq!(image.mip_level_count(), 4);

        let chain = image.mip_chain();
        let sizes: Vec<_> = chain.iter().map(|level| (level.width, level.height)).collect();
        assert_eq!(sizes, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
        assert_eq!(chain[0], image);
        // a flat color stays flat at every level
        assert_eq!(chain[3].rgba, vec![10, 20, 30, 255]);
    }

    #[test]
    fn test_single_texel_has_no_extra_levels() {
        assert_eq!(ImageData::white().mip_level_count(), 1);
        assert_eq!(ImageData::white().mip_chain().len(), 1);
    }

    #[test]
    fn test_rejects_single_channel_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grey.png");
        GrayImage::from_pixel(2, 2, Luma([128])).save(&path).unwrap();

        let err = ImageData::load(&path).unwrap_err();
        assert!(matches!(
            err,
            TextureError::UnsupportedChannels { channels: 1, .. }
        ));
    }

    #[test]
    fn test_missing_file_is_a_decode_error() {
        let err = ImageData::load("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, TextureError::Decode { .. }));
    }

    #[test]
    fn test_slots_follow_load_order() {
        let mut registry = TextureRegistry::new();
        assert_eq!(registry.register("a", ImageData::white()).unwrap(), 0);
        assert_eq!(registry.register("b", ImageData::white()).unwrap(), 1);

        assert_eq!(registry.find_slot("b"), Some(1));
        assert_eq!(registry.find_slot("missing"), None);
        assert!(matches!(
            registry.register("a", ImageData::white()),
            Err(TextureError::DuplicateTag(_))
        ));
    }

    #[test]
    fn test_slot_limit() {
        let mut registry = TextureRegistry::new();
        for i in 0..MAX_TEXTURE_SLOTS {
            registry.register(&format!("t{i}"), ImageData::white()).unwrap();
        }
        let err = registry.register("overflow", ImageData::white()).unwrap_err();
        assert!(matches!(err, TextureError::SlotsExhausted { .. }));
        assert_eq!(registry.len(), MAX_TEXTURE_SLOTS);
    }

    #[test]
    fn test_scene_textures_skip_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        write_two_row_png(&dir.path().join("clockface.png"));
        write_two_row_png(&dir.path().join("knobtexture.png"));

        let registry = load_scene_textures(dir.path());
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find_slot("clockface1"), Some(0));
        assert_eq!(registry.find_slot("goldTexture"), Some(1));
        assert_eq!(registry.find_slot("clockface2"), None);
    }
}
