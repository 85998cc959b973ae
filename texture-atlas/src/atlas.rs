use area_allocator::{AllocatorConfig, Area, AreaAllocator, AreaAllocatorError, RegionHandle};
use log::{trace, warn};
use thiserror::Error;

use crate::window::TextureWindow;

/// Pixels are stored as tightly packed RGBA8.
pub const BYTES_PER_PIXEL: usize = 4;

static ATLAS_ID: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureAtlasId {
    id: usize,
}

impl TextureAtlasId {
    fn new() -> Self {
        let id = ATLAS_ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        Self { id }
    }
}

/// A sub-image packed into a [`TextureAtlas`].
///
/// Returned by [`TextureAtlas::add`] and [`TextureAtlas::allocate`], and
/// handed back to [`TextureAtlas::remove`] to release the space.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtlasTexture {
    atlas_id: TextureAtlasId,
    region: RegionHandle,
    atlas_size: [u32; 2], // atlases never resize, so this stays valid
}

impl AtlasTexture {
    pub fn atlas_id(&self) -> TextureAtlasId {
        self.atlas_id
    }

    pub fn width(&self) -> u32 {
        self.region.width()
    }

    pub fn height(&self) -> u32 {
        self.region.height()
    }

    pub fn size(&self) -> [u32; 2] {
        self.region.size()
    }

    pub fn area(&self) -> u64 {
        self.region.area()
    }

    /// Pixel rectangle inside the atlas, exactly as the allocator returned it.
    pub fn region(&self) -> Area {
        self.region.region()
    }

    pub fn texture_window(&self) -> TextureWindow {
        TextureWindow::from_region(self.region.region(), self.atlas_size)
    }
}

/// CPU-side backing surface with an [`AreaAllocator`] deciding where each
/// sub-image goes. Uploading `pixels()` to the GPU is left to the renderer.
#[derive(Debug)]
pub struct TextureAtlas {
    id: TextureAtlasId,
    size: [u32; 2],
    allocator: AreaAllocator,
    pixels: Vec<u8>,
}

/// Constructor and information methods.
impl TextureAtlas {
    pub fn new(width: u32, height: u32) -> Result<Self, TextureAtlasError> {
        Self::with_config(width, height, AllocatorConfig::default())
    }

    pub fn with_config(
        width: u32,
        height: u32,
        config: AllocatorConfig,
    ) -> Result<Self, TextureAtlasError> {
        let mut allocator = AreaAllocator::with_config(config);
        allocator.initialize(width, height)?;
        let Some(byte_len) = Self::byte_len([width, height]) else {
            warn!("TextureAtlas::new: surface of {width}x{height} pixels does not fit in memory");
            return Err(TextureAtlasError::InvalidAtlasSize { width, height });
        };

        let id = TextureAtlasId::new();
        trace!("TextureAtlas::new: created atlas id={id:?} with size={width}x{height}");

        Ok(Self {
            id,
            size: [width, height],
            allocator,
            pixels: vec![0; byte_len],
        })
    }

    pub fn id(&self) -> TextureAtlasId {
        self.id
    }

    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    /// Total number of pixels.
    pub fn capacity(&self) -> u64 {
        self.allocator.total_area()
    }

    /// Number of pixels currently handed out.
    pub fn usage(&self) -> u64 {
        self.allocator.allocated_area()
    }

    pub fn texture_count(&self) -> usize {
        self.allocator.allocated_region_count()
    }

    /// The whole RGBA8 surface, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn allocator(&self) -> &AreaAllocator {
        &self.allocator
    }

    /// The window covering the whole atlas.
    pub fn full_window() -> TextureWindow {
        TextureWindow::FULL
    }
}

/// TextureAtlas allocation and deallocation
impl TextureAtlas {
    /// Reserves space for a `width x height` texture without touching its pixels.
    pub fn allocate(&mut self, width: u32, height: u32) -> Result<AtlasTexture, TextureAtlasError> {
        trace!("TextureAtlas::allocate: atlas={:?} requested {width}x{height}", self.id);

        let Some(region) = self.allocator.allocate(width, height)? else {
            warn!(
                "TextureAtlas::allocate: atlas={:?} has no room for {width}x{height}",
                self.id
            );
            return Err(TextureAtlasError::AllocationFailedNotEnoughSpace {
                requested: [width, height],
            });
        };

        Ok(AtlasTexture {
            atlas_id: self.id,
            region,
            atlas_size: self.size,
        })
    }

    /// Packs a `width x height` RGBA8 image into the atlas.
    pub fn add(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<AtlasTexture, TextureAtlasError> {
        trace!(
            "TextureAtlas::add: atlas={:?} uploading {} bytes as {width}x{height}",
            self.id,
            pixels.len()
        );
        // Validate before reserving anything.
        Self::check_data_size([width, height], pixels)?;

        let texture = self.allocate(width, height)?;
        self.copy_in(texture.region(), pixels);
        Ok(texture)
    }

    /// Overwrites the pixels of an existing texture.
    pub fn write(&mut self, texture: &AtlasTexture, pixels: &[u8]) -> Result<(), TextureAtlasError> {
        trace!(
            "TextureAtlas::write: atlas={:?} writing {} bytes to {:?}",
            self.id,
            pixels.len(),
            texture.region()
        );
        let region = self.live_region(texture)?;
        Self::check_data_size(region.size(), pixels)?;
        self.copy_in(region, pixels);
        Ok(())
    }

    /// Copies a texture's pixels out of the atlas.
    pub fn read(&self, texture: &AtlasTexture) -> Result<Vec<u8>, TextureAtlasError> {
        let region = self.live_region(texture)?;

        let row_bytes = region.width as usize * BYTES_PER_PIXEL;
        let mut out = Vec::with_capacity(row_bytes * region.height as usize);
        for row in 0..region.height {
            let start = self.offset_of(region.x, region.y + row);
            out.extend_from_slice(&self.pixels[start..start + row_bytes]);
        }
        Ok(out)
    }

    /// Releases a texture's space. Its pixels stay in the surface until overwritten.
    pub fn remove(&mut self, texture: AtlasTexture) -> Result<(), TextureAtlasError> {
        trace!(
            "TextureAtlas::remove: atlas={:?} releasing {:?}",
            self.id,
            texture.region()
        );
        self.check_owner(&texture)?;
        self.allocator.free(texture.region).map_err(|err| match err {
            AreaAllocatorError::InvalidHandle(_) => TextureAtlasError::TextureNotFoundInAtlas,
            other => TextureAtlasError::Allocator(other),
        })
    }

    /// Texture coordinates of a live texture.
    pub fn texture_window(&self, texture: &AtlasTexture) -> Result<TextureWindow, TextureAtlasError> {
        let region = self.live_region(texture)?;
        Ok(TextureWindow::from_region(region, self.size))
    }
}

// helper functions
impl TextureAtlas {
    fn check_owner(&self, texture: &AtlasTexture) -> Result<(), TextureAtlasError> {
        if texture.atlas_id != self.id {
            warn!(
                "TextureAtlas: texture from atlas={:?} used with atlas={:?}",
                texture.atlas_id, self.id
            );
            return Err(TextureAtlasError::WrongAtlas);
        }
        Ok(())
    }

    fn live_region(&self, texture: &AtlasTexture) -> Result<Area, TextureAtlasError> {
        self.check_owner(texture)?;
        self.allocator.get(&texture.region).ok_or_else(|| {
            warn!("TextureAtlas: texture {:?} is no longer in the atlas", texture.region());
            TextureAtlasError::TextureNotFoundInAtlas
        })
    }

    /// Bytes needed for `size` pixels, or `None` past what a `Vec<u8>` can hold.
    fn byte_len(size: [u32; 2]) -> Option<usize> {
        (size[0] as usize)
            .checked_mul(size[1] as usize)?
            .checked_mul(BYTES_PER_PIXEL)
            .filter(|&len| len <= isize::MAX as usize)
    }

    fn check_data_size(size: [u32; 2], pixels: &[u8]) -> Result<(), TextureAtlasError> {
        let Some(expected) = Self::byte_len(size) else {
            warn!(
                "TextureAtlas: {}x{} pixels overflow the addressable size",
                size[0], size[1]
            );
            return Err(TextureAtlasError::DataConsistencyError(format!(
                "Texture size {}x{} is too large to address",
                size[0], size[1]
            )));
        };
        if pixels.len() != expected {
            warn!(
                "TextureAtlas: data size mismatch (expected {expected} bytes, got {})",
                pixels.len()
            );
            return Err(TextureAtlasError::DataConsistencyError(format!(
                "Data size({}byte) does not match expected size({expected}byte)",
                pixels.len()
            )));
        }
        Ok(())
    }

    fn offset_of(&self, x: u32, y: u32) -> usize {
        (y as usize * self.size[0] as usize + x as usize) * BYTES_PER_PIXEL
    }

    fn copy_in(&mut self, region: Area, pixels: &[u8]) {
        let row_bytes = region.width as usize * BYTES_PER_PIXEL;
        for (row, src) in pixels.chunks_exact(row_bytes).enumerate() {
            let start = self.offset_of(region.x, region.y + row as u32);
            self.pixels[start..start + row_bytes].copy_from_slice(src);
        }
    }
}

#[derive(Error, Debug)]
pub enum TextureAtlasError {
    #[error("Area allocator error: {0}")]
    Allocator(#[from] AreaAllocatorError),
    #[error(
        "Allocation failed because there was not enough space in the atlas. requested: {requested:?}"
    )]
    AllocationFailedNotEnoughSpace { requested: [u32; 2] },
    #[error("Invalid atlas size {width}x{height}: the pixel surface does not fit in memory.")]
    InvalidAtlasSize { width: u32, height: u32 },
    #[error("Data consistency error: {0}")]
    DataConsistencyError(String),
    #[error("The texture belongs to a different atlas.")]
    WrongAtlas,
    #[error("The texture was not found in the atlas.")]
    TextureNotFoundInAtlas,
}
