use std::collections::VecDeque;
use std::mem;

use crate::area::Area;

/// Caller-held identity of an allocated region.
///
/// Handles identify a slot and its generation, not a position: two
/// allocations with the same rectangle made at different times are distinct.
/// The rectangle is copied into the handle so callers can read it without
/// going back to the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionHandle {
    index: usize,
    generation: u32,
    region: Area,
}

impl RegionHandle {
    pub fn x(&self) -> u32 {
        self.region.x
    }

    pub fn y(&self) -> u32 {
        self.region.y
    }

    pub fn width(&self) -> u32 {
        self.region.width
    }

    pub fn height(&self) -> u32 {
        self.region.height
    }

    pub fn size(&self) -> [u32; 2] {
        self.region.size()
    }

    /// Number of pixels covered by the region.
    pub fn area(&self) -> u64 {
        self.region.area()
    }

    pub fn region(&self) -> Area {
        self.region
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Vacant,
    Free,
    Allocated,
}

#[derive(Debug, Clone)]
struct Slot {
    area: Area,
    generation: u32,
    state: SlotState,
}

impl Slot {
    /// Index, generation and rectangle must all match the live allocation.
    fn matches(&self, handle: &RegionHandle) -> bool {
        self.state == SlotState::Allocated
            && self.generation == handle.generation
            && self.area == handle.region
    }
}

/// Arena holding both the free and the allocated rectangles.
///
/// Moving a rectangle between the two sets only flips its slot state.
/// `free_order` keeps the free slots in insertion order, which is the
/// first-fit scan order.
#[derive(Debug, Default)]
pub(crate) struct RegionArena {
    slots: Vec<Slot>,
    vacant: Vec<usize>,
    free_order: Vec<usize>,
    allocated_count: usize,
}

impl RegionArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn clear(&mut self) {
        // keep bumping generations so handles from before the clear stay invalid
        for index in 0..self.slots.len() {
            if self.slots[index].state != SlotState::Vacant {
                self.vacate(index);
            }
        }
        self.free_order.clear();
        self.allocated_count = 0;
    }

    pub(crate) fn push_free(&mut self, area: Area) {
        debug_assert!(!area.is_empty());
        let index = self.occupy(area, SlotState::Free);
        self.free_order.push(index);
    }

    pub(crate) fn push_allocated(&mut self, area: Area) -> RegionHandle {
        debug_assert!(!area.is_empty());
        let index = self.occupy(area, SlotState::Allocated);
        self.allocated_count += 1;
        RegionHandle {
            index,
            generation: self.slots[index].generation,
            region: area,
        }
    }

    /// Position in scan order of the first free region that can hold the request.
    pub(crate) fn find_free(&self, width: u32, height: u32) -> Option<usize> {
        self.free_order
            .iter()
            .position(|&index| self.slots[index].area.can_hold(width, height))
    }

    /// Removes the free region at `position` in scan order and returns its rectangle.
    pub(crate) fn take_free(&mut self, position: usize) -> Area {
        let index = self.free_order.remove(position);
        let area = self.slots[index].area;
        self.vacate(index);
        area
    }

    /// Moves an allocated region back to the end of the free scan order.
    ///
    /// Returns `None` if the handle is unknown, stale or already released.
    pub(crate) fn release(&mut self, handle: &RegionHandle) -> Option<Area> {
        let slot = self.slots.get_mut(handle.index)?;
        if !slot.matches(handle) {
            return None;
        }
        slot.state = SlotState::Free;
        let area = slot.area;
        self.allocated_count -= 1;
        self.free_order.push(handle.index);
        Some(area)
    }

    pub(crate) fn get(&self, handle: &RegionHandle) -> Option<Area> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.matches(handle))
            .map(|slot| slot.area)
    }

    pub(crate) fn free_count(&self) -> usize {
        self.free_order.len()
    }

    pub(crate) fn allocated_count(&self) -> usize {
        self.allocated_count
    }

    pub(crate) fn free_areas(&self) -> impl Iterator<Item = Area> + '_ {
        self.free_order.iter().map(|&index| self.slots[index].area)
    }

    pub(crate) fn allocated_areas(&self) -> impl Iterator<Item = Area> + '_ {
        self.slots
            .iter()
            .filter(|slot| slot.state == SlotState::Allocated)
            .map(|slot| slot.area)
    }

    /// Merges full-edge adjacent free regions until a whole pass merges nothing.
    ///
    /// Each pass walks the free list front to back. The region taken from the
    /// front absorbs the first remaining neighbour it is adjacent to, again and
    /// again, and is then moved to the next pass's list. Returns the total
    /// number of merges.
    pub(crate) fn coalesce(&mut self) -> usize {
        if self.free_order.len() < 2 {
            return 0;
        }

        let mut total = 0;
        loop {
            let mut merged = 0;
            let mut pending: VecDeque<usize> = mem::take(&mut self.free_order).into();
            let mut collapsed = Vec::with_capacity(pending.len());

            while let Some(first) = pending.pop_front() {
                let mut grown = self.slots[first].area;
                loop {
                    let Some(position) = pending
                        .iter()
                        .position(|&other| grown.is_adjacent(&self.slots[other].area))
                    else {
                        break;
                    };
                    let Some(other) = pending.remove(position) else {
                        break;
                    };
                    grown.combine_with(&self.slots[other].area);
                    self.vacate(other);
                    merged += 1;
                }
                self.slots[first].area = grown;
                collapsed.push(first);
            }

            self.free_order = collapsed;
            total += merged;
            if merged == 0 {
                break;
            }
        }
        total
    }

    fn occupy(&mut self, area: Area, state: SlotState) -> usize {
        match self.vacant.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.area = area;
                slot.state = state;
                index
            }
            None => {
                self.slots.push(Slot {
                    area,
                    generation: 0,
                    state,
                });
                self.slots.len() - 1
            }
        }
    }

    fn vacate(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        slot.state = SlotState::Vacant;
        slot.generation = slot.generation.wrapping_add(1);
        self.vacant.push(index);
    }
}
