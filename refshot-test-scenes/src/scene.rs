use refshot::{Bitmap, Renderable, SnapshotError};

// ── Canvas constants ─────────────────────────────────────────────────────────

pub const CANVAS_WIDTH: u32 = 64;
pub const CANVAS_HEIGHT: u32 = 48;

fn fill(pixel_at: impl Fn(u32, u32) -> [u8; 4]) -> Bitmap {
    let mut data = Vec::with_capacity((CANVAS_WIDTH * CANVAS_HEIGHT) as usize * 4);
    for y in 0..CANVAS_HEIGHT {
        for x in 0..CANVAS_WIDTH {
            data.extend_from_slice(&pixel_at(x, y));
        }
    }
    Bitmap::from_rgba(CANVAS_WIDTH, CANVAS_HEIGHT, data)
        .expect("canvas buffer matches dimensions")
}

/// Canvas-sized solid fill.
pub fn solid(color: [u8; 4]) -> Bitmap {
    fill(|_, _| color)
}

/// Deterministic gradient: red rises left to right, green top to bottom,
/// fully opaque.
pub fn gradient() -> Bitmap {
    fill(|x, y| {
        let r = (x * 255 / (CANVAS_WIDTH - 1)) as u8;
        let g = (y * 255 / (CANVAS_HEIGHT - 1)) as u8;
        [r, g, 64, 255]
    })
}

/// Checkerboard of `tile`-sized black and white squares.
pub fn checkerboard(tile: u32) -> Bitmap {
    let tile = tile.max(1);
    fill(|x, y| {
        if ((x / tile) + (y / tile)) % 2 == 0 {
            [255, 255, 255, 255]
        } else {
            [0, 0, 0, 255]
        }
    })
}

/// Copies `bitmap` with the first `count` pixels (row-major) pushed far past
/// any per-channel threshold: the red channel is flipped by exactly 128.
pub fn perturb_pixels(bitmap: &Bitmap, count: u64) -> Bitmap {
    let mut data = bitmap.data().to_vec();
    let count = count.min(bitmap.total_pixels());
    for i in 0..count {
        let x = (i % u64::from(bitmap.width())) as usize;
        let y = (i / u64::from(bitmap.width())) as usize;
        let offset = y * bitmap.stride() + x * 4;
        data[offset] ^= 0x80;
    }
    Bitmap::with_stride(bitmap.width(), bitmap.height(), bitmap.stride(), data)
        .expect("layout unchanged")
        .with_scale(bitmap.scale())
}

// ── Renderable scene stand-ins ───────────────────────────────────────────────

/// Stands in for a framework view rendered off-screen.
pub struct GradientView;

impl Renderable for GradientView {
    fn render(&self) -> Result<Bitmap, SnapshotError> {
        Ok(gradient())
    }
}

/// Stands in for a bare layer rendered without a hosting view.
pub struct CheckerboardLayer {
    pub tile: u32,
}

impl Renderable for CheckerboardLayer {
    fn render(&self) -> Result<Bitmap, SnapshotError> {
        Ok(checkerboard(self.tile))
    }
}
