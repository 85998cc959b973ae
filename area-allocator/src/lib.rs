//! # Area Allocator
//!
//! A first-fit guillotine allocator that packs variable-sized rectangles
//! (glyph bitmaps, loaded images) into a single fixed-size surface.
//!
//! ## Usage
//!
//! 1. Create an allocator with `AreaAllocator::with_size()`, or `new()` followed
//!    by `initialize()`.
//! 2. Reserve space with `allocate()`. `Ok(None)` means the atlas is full.
//! 3. Copy pixels to the returned region's `x`/`y` in the backing surface.
//! 4. Give the region back with `free()`.
//!
//! Freed regions are merged with full-edge neighbours lazily, when an
//! allocation misses. See [`CoalescePolicy`] for the alternatives.

mod allocator;
mod area;
mod config;
mod error;
mod regions;

pub use allocator::AreaAllocator;
pub use area::{Adjacency, Area};
pub use config::{AllocatorConfig, CoalescePolicy};
pub use error::AreaAllocatorError;
pub use regions::RegionHandle;

// re-exports
pub use euclid;
