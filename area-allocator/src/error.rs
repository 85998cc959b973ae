use thiserror::Error;

use crate::regions::RegionHandle;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AreaAllocatorError {
    #[error("The allocator has not been initialized with an atlas size.")]
    NotInitialized,
    #[error("The allocator is already initialized with size {width}x{height}.")]
    AlreadyInitialized { width: u32, height: u32 },
    #[error("Invalid atlas size {width}x{height}: both dimensions must be non-zero.")]
    InvalidAtlasSize { width: u32, height: u32 },
    #[error("Requested area {width}x{height} is zero-sized.")]
    ZeroSizedRequest { width: u32, height: u32 },
    #[error("The handle {0:?} does not refer to a live allocation.")]
    InvalidHandle(RegionHandle),
}
