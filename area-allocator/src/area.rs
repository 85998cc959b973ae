use euclid::{Box2D, Point2D, UnknownUnit};

/// An axis-aligned rectangle in atlas-pixel coordinates.
///
/// `x`/`y` is the top-left corner. Regions stored by the allocator always have
/// a non-zero `width` and `height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Area {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Which side of an area another area touches along a full edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjacency {
    Below,
    Above,
    Right,
    Left,
}

impl Area {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge, clamped to `u32::MAX`.
    ///
    /// Regions handed out by the allocator always lie inside its `u32` bounds,
    /// so the clamp only matters for hand-built areas.
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, clamped to `u32::MAX`.
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub const fn size(&self) -> [u32; 2] {
        [self.width, self.height]
    }

    /// `width * height`, widened so sums over a whole atlas cannot overflow.
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub const fn can_hold(&self, width: u32, height: u32) -> bool {
        self.width >= width && self.height >= height
    }

    /// True when the two areas share at least one pixel.
    pub fn intersects(&self, other: &Area) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains(&self, other: &Area) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Returns where `other` sits relative to `self` if the two share a full edge.
    ///
    /// Only exact edge matches count: a neighbour that covers part of an edge
    /// is not adjacent.
    pub fn adjacency(&self, other: &Area) -> Option<Adjacency> {
        if self.x == other.x && self.width == other.width {
            if self.bottom() == other.y {
                return Some(Adjacency::Below);
            }
            if other.bottom() == self.y {
                return Some(Adjacency::Above);
            }
        }
        if self.y == other.y && self.height == other.height {
            if self.right() == other.x {
                return Some(Adjacency::Right);
            }
            if other.right() == self.x {
                return Some(Adjacency::Left);
            }
        }
        None
    }

    pub fn is_adjacent(&self, other: &Area) -> bool {
        self.adjacency(other).is_some()
    }

    /// Grows `self` to cover `other`. Returns `false` and leaves `self`
    /// untouched when the two are not full-edge adjacent.
    pub fn combine_with(&mut self, other: &Area) -> bool {
        match self.adjacency(other) {
            Some(Adjacency::Below) => self.height += other.height,
            Some(Adjacency::Above) => {
                self.y = other.y;
                self.height += other.height;
            }
            Some(Adjacency::Right) => self.width += other.width,
            Some(Adjacency::Left) => {
                self.x = other.x;
                self.width += other.width;
            }
            None => return false,
        }
        true
    }

    /// Carves `width x height` out of the top-left corner.
    ///
    /// Returns the carved area and the offcuts in right, below, diagonal order.
    /// Together they tile `self` exactly. The caller guarantees the request fits.
    pub(crate) fn guillotine(&self, width: u32, height: u32) -> (Area, Vec<Area>) {
        debug_assert!(self.can_hold(width, height));

        let carved = Area::new(self.x, self.y, width, height);
        let mut offcuts = Vec::with_capacity(3);

        let spare_width = self.width - width;
        let spare_height = self.height - height;

        if spare_width > 0 {
            offcuts.push(Area::new(self.x + width, self.y, spare_width, height));
        }
        if spare_height > 0 {
            offcuts.push(Area::new(self.x, self.y + height, width, spare_height));
        }
        if spare_width > 0 && spare_height > 0 {
            offcuts.push(Area::new(
                self.x + width,
                self.y + height,
                spare_width,
                spare_height,
            ));
        }

        (carved, offcuts)
    }

    pub fn to_box2d(&self) -> Box2D<u32, UnknownUnit> {
        Box2D::new(
            Point2D::new(self.x, self.y),
            Point2D::new(self.right(), self.bottom()),
        )
    }
}

impl From<Area> for Box2D<u32, UnknownUnit> {
    fn from(area: Area) -> Self {
        area.to_box2d()
    }
}

impl From<Box2D<u32, UnknownUnit>> for Area {
    fn from(b: Box2D<u32, UnknownUnit>) -> Self {
        Area::new(
            b.min.x,
            b.min.y,
            b.max.x.saturating_sub(b.min.x),
            b.max.y.saturating_sub(b.min.y),
        )
    }
}
