//! # Texture Atlas
//!
//! Packs many small RGBA8 images (glyph bitmaps, icons, loaded textures) into
//! one fixed-size surface and hands out texture coordinates for each of them.
//!
//! ## Usage
//!
//! 1. Create an atlas with `TextureAtlas::new()`.
//! 2. Pack an image with `TextureAtlas::add()`, or reserve space with
//!    `TextureAtlas::allocate()` and fill it later with `write()`.
//! 3. Use `AtlasTexture::texture_window()` to sample it from the surface.
//! 4. Upload `TextureAtlas::pixels()` to the GPU when it changes.
//! 5. Release space with `TextureAtlas::remove()`.

mod atlas;
mod window;

pub use atlas::{AtlasTexture, BYTES_PER_PIXEL, TextureAtlas, TextureAtlasError, TextureAtlasId};
pub use window::TextureWindow;

// re-exports
pub use area_allocator::{AllocatorConfig, CoalescePolicy};
pub use euclid;
