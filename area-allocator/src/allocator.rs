use log::{debug, trace, warn};

use crate::area::Area;
use crate::config::{AllocatorConfig, CoalescePolicy};
use crate::error::AreaAllocatorError;
use crate::regions::{RegionArena, RegionHandle};

/// First-fit guillotine allocator over a fixed-size 2D surface.
///
/// The surface is partitioned into a free set and an allocated set. An
/// allocation carves the request out of the top-left corner of the first free
/// region that is large enough and puts up to three offcuts back into the free
/// set. Freed regions are returned unchanged; adjacent free regions are merged
/// according to the configured [`CoalescePolicy`].
#[derive(Debug, Default)]
pub struct AreaAllocator {
    width: u32,
    height: u32,
    initialized: bool,
    config: AllocatorConfig,
    regions: RegionArena,
}

/// Constructor and information methods.
impl AreaAllocator {
    /// Creates an allocator with no atlas bounds. [`initialize`](Self::initialize)
    /// must be called before allocating.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AllocatorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Creates and initializes an allocator in one step.
    pub fn with_size(width: u32, height: u32) -> Result<Self, AreaAllocatorError> {
        let mut allocator = Self::new();
        allocator.initialize(width, height)?;
        Ok(allocator)
    }

    /// Sets the atlas bounds and seeds the free set with the whole surface.
    pub fn initialize(&mut self, width: u32, height: u32) -> Result<(), AreaAllocatorError> {
        trace!("AreaAllocator::initialize: size={width}x{height}");
        if self.initialized {
            warn!("AreaAllocator::initialize: already initialized");
            return Err(AreaAllocatorError::AlreadyInitialized {
                width: self.width,
                height: self.height,
            });
        }
        if width == 0 || height == 0 {
            warn!("AreaAllocator::initialize: rejected zero-sized atlas {width}x{height}");
            return Err(AreaAllocatorError::InvalidAtlasSize { width, height });
        }

        self.width = width;
        self.height = height;
        self.regions = RegionArena::new();
        self.regions.push_free(Area::new(0, 0, width, height));
        self.initialized = true;

        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> AllocatorConfig {
        self.config
    }

    pub fn total_width(&self) -> u32 {
        self.width
    }

    pub fn total_height(&self) -> u32 {
        self.height
    }

    pub fn total_area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn free_region_count(&self) -> usize {
        self.regions.free_count()
    }

    pub fn free_area(&self) -> u64 {
        self.regions.free_areas().map(|area| area.area()).sum()
    }

    pub fn allocated_region_count(&self) -> usize {
        self.regions.allocated_count()
    }

    pub fn allocated_area(&self) -> u64 {
        self.regions.allocated_areas().map(|area| area.area()).sum()
    }

    /// Free regions in first-fit scan order.
    pub fn free_regions(&self) -> impl Iterator<Item = Area> + '_ {
        self.regions.free_areas()
    }

    pub fn allocated_regions(&self) -> impl Iterator<Item = Area> + '_ {
        self.regions.allocated_areas()
    }

    /// Current rectangle of a live allocation.
    pub fn get(&self, handle: &RegionHandle) -> Option<Area> {
        self.regions.get(handle)
    }

    pub fn contains(&self, handle: &RegionHandle) -> bool {
        self.regions.get(handle).is_some()
    }
}

/// Allocation and deallocation.
impl AreaAllocator {
    /// Reserves a `width x height` region.
    ///
    /// Returns `Ok(None)` when no free region can hold the request, even after
    /// merging adjacent free regions. That is a normal outcome: the caller
    /// decides whether to start another atlas or drop the image.
    pub fn allocate(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Option<RegionHandle>, AreaAllocatorError> {
        trace!("AreaAllocator::allocate: requested {width}x{height}");
        if !self.initialized {
            warn!("AreaAllocator::allocate: called before initialize");
            return Err(AreaAllocatorError::NotInitialized);
        }
        if width == 0 || height == 0 {
            warn!("AreaAllocator::allocate: rejected zero-sized request {width}x{height}");
            return Err(AreaAllocatorError::ZeroSizedRequest { width, height });
        }

        let mut found = self.regions.find_free(width, height);
        if found.is_none() && self.config.coalesce != CoalescePolicy::Never {
            let merges = self.regions.coalesce();
            debug!(
                "AreaAllocator::allocate: no fit for {width}x{height}, coalesced {merges} regions ({} free left)",
                self.regions.free_count()
            );
            found = self.regions.find_free(width, height);
        }

        let Some(position) = found else {
            debug!(
                "AreaAllocator::allocate: exhausted for {width}x{height} (free area {} of {})",
                self.free_area(),
                self.total_area()
            );
            return Ok(None);
        };

        let source = self.regions.take_free(position);
        let (carved, offcuts) = source.guillotine(width, height);
        let handle = self.regions.push_allocated(carved);
        for offcut in offcuts {
            self.regions.push_free(offcut);
        }

        trace!("AreaAllocator::allocate: carved {carved:?} out of {source:?}");
        Ok(Some(handle))
    }

    /// Returns a region to the free set unchanged.
    pub fn free(&mut self, handle: RegionHandle) -> Result<(), AreaAllocatorError> {
        trace!("AreaAllocator::free: releasing {:?}", handle.region());
        if !self.initialized {
            warn!("AreaAllocator::free: called before initialize");
            return Err(AreaAllocatorError::NotInitialized);
        }
        if self.regions.release(&handle).is_none() {
            warn!("AreaAllocator::free: handle {handle:?} is not a live allocation");
            return Err(AreaAllocatorError::InvalidHandle(handle));
        }

        if self.config.coalesce == CoalescePolicy::OnFree {
            let merges = self.regions.coalesce();
            debug!("AreaAllocator::free: coalesced {merges} regions");
        }
        Ok(())
    }

    /// Merges full-edge adjacent free regions now. Returns the number of merges.
    pub fn coalesce(&mut self) -> usize {
        let merges = self.regions.coalesce();
        debug!(
            "AreaAllocator::coalesce: {merges} merges, {} free regions",
            self.regions.free_count()
        );
        merges
    }

    /// Drops every allocation and resets the free set to the whole atlas.
    ///
    /// Handles issued before the call are no longer valid.
    pub fn clear(&mut self) {
        trace!("AreaAllocator::clear");
        self.regions.clear();
        if self.initialized {
            self.regions
                .push_free(Area::new(0, 0, self.width, self.height));
        }
    }
}
