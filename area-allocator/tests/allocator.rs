use area_allocator::{Area, AreaAllocator, AreaAllocatorError, RegionHandle};

fn assert_partition(allocator: &AreaAllocator) {
    let bounds = Area::new(0, 0, allocator.total_width(), allocator.total_height());
    let free: Vec<Area> = allocator.free_regions().collect();
    let allocated: Vec<Area> = allocator.allocated_regions().collect();
    let all: Vec<Area> = free.iter().chain(allocated.iter()).copied().collect();

    for (i, a) in all.iter().enumerate() {
        assert!(!a.is_empty(), "zero-sized region {a:?}");
        assert!(bounds.contains(a), "{a:?} escapes {bounds:?}");
        for b in &all[i + 1..] {
            assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
        }
    }

    assert_eq!(free.len(), allocator.free_region_count());
    assert_eq!(allocated.len(), allocator.allocated_region_count());
    assert_eq!(
        allocator.free_area() + allocator.allocated_area(),
        allocator.total_area()
    );
}

#[test]
#[allow(clippy::unwrap_used)]
fn test_reference_scenario() {
    let mut allocator = AreaAllocator::new();
    allocator.initialize(100, 100).unwrap();

    let first = allocator.allocate(60, 40).unwrap().unwrap();
    assert_eq!(
        (first.x(), first.y(), first.width(), first.height()),
        (0, 0, 60, 40)
    );
    assert_eq!(
        allocator.free_regions().collect::<Vec<_>>(),
        vec![
            Area::new(60, 0, 40, 40),
            Area::new(0, 40, 60, 60),
            Area::new(60, 40, 40, 60),
        ]
    );
    assert_eq!(allocator.free_area(), 10_000 - 2_400);

    // the 60x60 offcut below the first allocation already holds 50x50
    let second = allocator.allocate(50, 50).unwrap().unwrap();
    assert_eq!(second.region(), Area::new(0, 40, 50, 50));
    assert_partition(&allocator);
}

/// The right and diagonal offcuts share their full 40px edge; the offcut
/// below does not line up with either of them.
#[test]
#[allow(clippy::unwrap_used)]
fn test_offcuts_merge_only_along_full_edges() {
    let mut allocator = AreaAllocator::with_size(100, 100).unwrap();
    let _first = allocator.allocate(60, 40).unwrap().unwrap();

    let merges = allocator.coalesce();

    assert_eq!(merges, 1);
    assert_eq!(
        allocator.free_regions().collect::<Vec<_>>(),
        vec![Area::new(60, 0, 40, 100), Area::new(0, 40, 60, 60)]
    );
}

/// Enough free area in aggregate, but the two free regions only share half an
/// edge, so nothing can be merged and the request fails.
#[test]
#[allow(clippy::unwrap_used)]
fn test_partial_edge_fragmentation_is_not_recovered() {
    let mut allocator = AreaAllocator::with_size(20, 20).unwrap();
    let left = allocator.allocate(10, 20).unwrap().unwrap();
    let _top_right = allocator.allocate(10, 10).unwrap().unwrap();
    allocator.free(left).unwrap();

    assert_eq!(
        allocator.free_regions().collect::<Vec<_>>(),
        vec![Area::new(10, 10, 10, 10), Area::new(0, 0, 10, 20)]
    );
    assert_eq!(allocator.free_area(), 300);

    assert_eq!(allocator.allocate(15, 15), Ok(None));
    assert_eq!(allocator.free_region_count(), 2);
    assert_partition(&allocator);
}

#[test]
#[allow(clippy::unwrap_used)]
fn test_full_release_recovers_whole_atlas() {
    let mut allocator = AreaAllocator::with_size(20, 20).unwrap();
    let left = allocator.allocate(10, 20).unwrap().unwrap();
    let top_right = allocator.allocate(10, 10).unwrap().unwrap();
    allocator.free(left).unwrap();
    allocator.free(top_right).unwrap();

    let whole = allocator.allocate(20, 20).unwrap().unwrap();

    assert_eq!(whole.region(), Area::new(0, 0, 20, 20));
    assert_eq!(allocator.free_region_count(), 0);
}

#[test]
#[allow(clippy::unwrap_used)]
fn test_round_trip_restores_free_area() {
    let mut allocator = AreaAllocator::with_size(128, 64).unwrap();
    let _keep = allocator.allocate(17, 9).unwrap().unwrap();
    let before = allocator.free_area();

    let handle = allocator.allocate(33, 21).unwrap().unwrap();
    assert_eq!(allocator.free_area(), before - 33 * 21);
    allocator.free(handle).unwrap();

    assert_eq!(allocator.free_area(), before);
    assert_partition(&allocator);
}

#[test]
#[allow(clippy::unwrap_used)]
fn test_identical_geometry_distinct_handles() {
    let mut allocator = AreaAllocator::with_size(10, 10).unwrap();

    let first = allocator.allocate(10, 10).unwrap().unwrap();
    allocator.free(first).unwrap();
    let second = allocator.allocate(10, 10).unwrap().unwrap();

    assert_eq!(first.region(), second.region());
    assert_ne!(first, second);
    assert!(!allocator.contains(&first));
    assert!(allocator.contains(&second));
    assert_eq!(
        allocator.free(first),
        Err(AreaAllocatorError::InvalidHandle(first))
    );
    assert!(allocator.free(second).is_ok());
}

#[test]
#[allow(clippy::unwrap_used)]
fn test_oversized_requests_always_fail() {
    let mut allocator = AreaAllocator::with_size(64, 32).unwrap();

    assert_eq!(allocator.allocate(65, 1), Ok(None));
    assert_eq!(allocator.allocate(1, 33), Ok(None));
    assert!(allocator.allocate(64, 32).unwrap().is_some());
    assert_eq!(allocator.allocate(1, 1), Ok(None));
}

#[test]
fn test_exhaustion_on_fresh_atlas() {
    fn prop(atlas: (u8, u8), request: (u8, u8)) -> bool {
        let (atlas_w, atlas_h) = (atlas.0 as u32 + 1, atlas.1 as u32 + 1);
        let (w, h) = (request.0 as u32 + 1, request.1 as u32 + 1);
        let Ok(mut allocator) = AreaAllocator::with_size(atlas_w, atlas_h) else {
            return false;
        };
        let fits = w <= atlas_w && h <= atlas_h;
        match allocator.allocate(w, h) {
            Ok(Some(handle)) => fits && handle.region() == Area::new(0, 0, w, h),
            Ok(None) => !fits,
            Err(_) => false,
        }
    }

    quickcheck::quickcheck(prop as fn((u8, u8), (u8, u8)) -> bool);
}

/// Random interleavings of allocations and frees keep the partition intact
/// and conserve area.
#[test]
fn test_random_churn_keeps_partition() {
    fn prop(atlas: (u8, u8), ops: Vec<(u8, u8, u8)>) -> bool {
        let width = atlas.0 as u32 % 64 + 1;
        let height = atlas.1 as u32 % 64 + 1;
        let Ok(mut allocator) = AreaAllocator::with_size(width, height) else {
            return false;
        };
        let mut live: Vec<RegionHandle> = Vec::new();

        for (a, b, op) in ops {
            if op % 3 == 0 && !live.is_empty() {
                let handle = live.swap_remove(a as usize % live.len());
                if allocator.free(handle).is_err() {
                    return false;
                }
            } else {
                let w = a as u32 % width + 1;
                let h = b as u32 % height + 1;
                match allocator.allocate(w, h) {
                    Ok(Some(handle)) => {
                        if handle.size() != [w, h] {
                            return false;
                        }
                        live.push(handle);
                    }
                    Ok(None) => {}
                    Err(_) => return false,
                }
            }
            assert_partition(&allocator);
        }

        for handle in live.drain(..) {
            if allocator.free(handle).is_err() {
                return false;
            }
        }
        assert_partition(&allocator);
        allocator.allocated_area() == 0 && allocator.free_area() == allocator.total_area()
    }

    quickcheck::quickcheck(prop as fn((u8, u8), Vec<(u8, u8, u8)>) -> bool);
}

/// Every successful allocation carves the request from one free region and
/// the offcuts together with it cover that region exactly.
#[test]
fn test_split_tiles_matched_region() {
    fn prop(sizes: Vec<(u8, u8)>) -> bool {
        let Ok(mut allocator) = AreaAllocator::with_size(96, 96) else {
            return false;
        };

        for (w, h) in sizes {
            let (w, h) = (w as u32 % 40 + 1, h as u32 % 40 + 1);
            let before: Vec<Area> = allocator.free_regions().collect();
            let Ok(Some(handle)) = allocator.allocate(w, h) else {
                continue;
            };
            // a hit without coalescing consumes exactly one region
            let Some(source) = before
                .iter()
                .find(|area| area.x == handle.x() && area.y == handle.y())
            else {
                // the hit came from a region produced by coalescing
                continue;
            };
            if !source.can_hold(w, h) {
                continue;
            }
            let after: Vec<Area> = allocator.free_regions().collect();
            let offcuts: Vec<Area> = after
                .iter()
                .filter(|area| !before.contains(area))
                .copied()
                .collect();
            let covered: u64 = offcuts.iter().map(Area::area).sum::<u64>() + handle.area();
            if covered != source.area()
                || !offcuts.iter().all(|area| source.contains(area))
                || offcuts.iter().any(|area| area.intersects(&handle.region()))
            {
                return false;
            }
        }
        true
    }

    quickcheck::quickcheck(prop as fn(Vec<(u8, u8)>) -> bool);
}
