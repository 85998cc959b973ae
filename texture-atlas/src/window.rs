use area_allocator::Area;
use euclid::{Box2D, Point2D, UnknownUnit};

/// Normalized texture coordinates of a region inside its atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureWindow {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl TextureWindow {
    /// The window covering the whole atlas.
    pub const FULL: TextureWindow = TextureWindow {
        x0: 0.0,
        y0: 0.0,
        x1: 1.0,
        y1: 1.0,
    };

    /// Maps `region` into `[0, 1]` relative to an atlas of `atlas_size` pixels.
    pub fn from_region(region: Area, atlas_size: [u32; 2]) -> Self {
        let atlas_width = atlas_size[0] as f32;
        let atlas_height = atlas_size[1] as f32;

        let x0 = region.x as f32 / atlas_width;
        let y0 = region.y as f32 / atlas_height;
        TextureWindow {
            x0,
            y0,
            x1: x0 + region.width as f32 / atlas_width,
            y1: y0 + region.height as f32 / atlas_height,
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Translates texture-local uvs (`[0, 1]` over the region) into atlas uvs.
    pub fn translate_uv(&self, uvs: &[[f32; 2]]) -> Vec<[f32; 2]> {
        uvs.iter()
            .map(|&[x, y]| {
                [
                    (self.x0 + (x * self.width())).clamp(0.0, 1.0),
                    (self.y0 + (y * self.height())).clamp(0.0, 1.0),
                ]
            })
            .collect()
    }

    pub fn to_box2d(&self) -> Box2D<f32, UnknownUnit> {
        Box2D::new(Point2D::new(self.x0, self.y0), Point2D::new(self.x1, self.y1))
    }
}
