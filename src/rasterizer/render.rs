//! Core rendering functions
//! Line drawing and depth-tested triangle filling

use std::path::Path;

use super::math::{barycentric, is_inside, Vec2, Vec2i, Vec3};
use super::types::{Color, Texture};
use crate::error::RenderError;

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(&self.pixels[idx..idx + 4]);
            Some(Color::from_bytes(bytes))
        } else {
            None
        }
    }

    /// Write a pixel; coordinates outside the canvas are dropped
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    /// Write a pixel at signed coordinates; false when it lands off the canvas
    fn plot(&mut self, x: i64, y: i64, color: Color) -> bool {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) if x < self.width && y < self.height => {
                self.set_pixel(x, y, color);
                true
            }
            _ => false,
        }
    }

    /// Reverse row order in place (moves the origin to the bottom-left)
    pub fn flip_vertically(&mut self) {
        let stride = self.width * 4;
        let half = self.height / 2;
        for y in 0..half {
            let (top, bottom) = self.pixels.split_at_mut((self.height - 1 - y) * stride);
            top[y * stride..(y + 1) * stride].swap_with_slice(&mut bottom[..stride]);
        }
    }

    /// Number of pixels that differ from `background`
    pub fn count_pixels_not(&self, background: Color) -> usize {
        let bg = background.to_bytes();
        self.pixels.chunks_exact(4).filter(|px| *px != bg).count()
    }

    /// Save as an image file; the format follows the file extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        let path = path.as_ref();
        let img = image::RgbaImage::from_raw(self.width as u32, self.height as u32, self.pixels.clone())
            .ok_or(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;

        // TGA and PNG keep alpha; JPEG and BMP want plain RGB
        let keeps_alpha = path
            .extension()
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                ext == "png" || ext == "tga"
            })
            .unwrap_or(false);

        if keeps_alpha {
            img.save(path)?;
        } else {
            image::DynamicImage::ImageRgba8(img).to_rgb8().save(path)?;
        }
        log::info!("Wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Depth buffer, one value per framebuffer pixel.
/// Larger z is closer to the viewer.
#[derive(Debug, Clone)]
pub struct ZBuffer {
    pub depth: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl ZBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            depth: vec![f32::NEG_INFINITY; width * height],
            width,
            height,
        }
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.depth[x + y * self.width]
    }

    /// Store `z` at `idx` if it is strictly closer than what is there.
    /// Equal depth loses, so the first triangle drawn keeps an exact tie.
    fn test_and_set(&mut self, idx: usize, z: f32) -> bool {
        if self.depth[idx] < z {
            self.depth[idx] = z;
            true
        } else {
            false
        }
    }

    /// Number of entries written since creation
    pub fn written(&self) -> usize {
        self.depth.iter().filter(|d| **d != f32::NEG_INFINITY).count()
    }
}

/// What a triangle is painted with
#[derive(Debug, Clone, Copy)]
pub enum Fill<'t> {
    /// One color for every covered pixel
    Solid(Color),
    /// Texels picked by interpolated texture coordinates, RGB scaled by intensity
    Textured {
        texture: &'t Texture,
        uvs: [Vec2; 3],
        intensity: f32,
    },
}

/// Draws into a borrowed framebuffer, resolving visibility with its own z-buffer
pub struct Rasterizer<'a> {
    fb: &'a mut Framebuffer,
    zbuffer: ZBuffer,
}

impl<'a> Rasterizer<'a> {
    pub fn new(fb: &'a mut Framebuffer) -> Self {
        let zbuffer = ZBuffer::new(fb.width, fb.height);
        Self { fb, zbuffer }
    }

    /// Reuse a z-buffer from an earlier pass; dimensions must match
    pub fn with_zbuffer(fb: &'a mut Framebuffer, zbuffer: ZBuffer) -> Result<Self, RenderError> {
        if zbuffer.width != fb.width || zbuffer.height != fb.height {
            return Err(RenderError::InvalidDimensions {
                width: zbuffer.width,
                height: zbuffer.height,
            });
        }
        Ok(Self { fb, zbuffer })
    }

    pub fn width(&self) -> usize {
        self.fb.width
    }

    pub fn height(&self) -> usize {
        self.fb.height
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &*self.fb
    }

    pub fn zbuffer(&self) -> &ZBuffer {
        &self.zbuffer
    }

    pub fn into_zbuffer(self) -> ZBuffer {
        self.zbuffer
    }

    /// Draw a line from p0 to p1 using Bresenham's algorithm.
    /// Both endpoints are drawn; returns the number of pixels that landed on
    /// the canvas. Only the part of the major axis inside the canvas is walked.
    pub fn draw_line(&mut self, p0: Vec2i, p1: Vec2i, color: Color) -> usize {
        let (mut x0, mut y0) = (i64::from(p0.x), i64::from(p0.y));
        let (mut x1, mut y1) = (i64::from(p1.x), i64::from(p1.y));

        // Walk along the longer axis
        let steep = (x0 - x1).abs() < (y0 - y1).abs();
        if steep {
            std::mem::swap(&mut x0, &mut y0);
            std::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let dy = y1 - y0;
        let derror2 = dy.abs() * 2;
        let step = if y1 > y0 { 1 } else { -1 };

        let major_len = if steep { self.fb.height as i64 } else { self.fb.width as i64 };
        let first = x0.max(0);
        let last = x1.min(major_len - 1);
        if first > last {
            return 0;
        }

        let (mut y, mut error2) = bresenham_skip(y0, first - x0, dx, derror2, step);
        let mut plotted = 0;

        for x in first..=last {
            let on_canvas = if steep {
                self.fb.plot(y, x, color)
            } else {
                self.fb.plot(x, y, color)
            };
            if on_canvas {
                plotted += 1;
            }
            error2 += derror2;
            if error2 > dx {
                y += step;
                error2 -= dx * 2;
            }
        }

        plotted
    }

    /// Fill a screen-space triangle, depth tested against the z-buffer.
    /// Returns the number of pixels that won the depth test.
    pub fn draw_triangle(&mut self, pts: [Vec3; 3], fill: &Fill) -> usize {
        let width = self.fb.width;
        let height = self.fb.height;
        if width == 0 || height == 0 {
            return 0;
        }

        // Bounding box, clamped to the canvas
        let min_x = pts[0].x.min(pts[1].x).min(pts[2].x).max(0.0).floor();
        let min_y = pts[0].y.min(pts[1].y).min(pts[2].y).max(0.0).floor();
        let max_x = pts[0].x.max(pts[1].x).max(pts[2].x).min((width - 1) as f32).floor();
        let max_y = pts[0].y.max(pts[1].y).max(pts[2].y).min((height - 1) as f32).floor();
        if !(min_x <= max_x && min_y <= max_y) {
            return 0;
        }

        let mut written = 0;
        for y in min_y as usize..=max_y as usize {
            for x in min_x as usize..=max_x as usize {
                let bc = barycentric(pts, Vec3::new(x as f32, y as f32, 0.0));
                if !is_inside(bc) {
                    continue;
                }

                let z = bc.x * pts[0].z + bc.y * pts[1].z + bc.z * pts[2].z;
                if !self.zbuffer.test_and_set(x + y * width, z) {
                    continue;
                }

                let color = match *fill {
                    Fill::Solid(color) => color,
                    Fill::Textured { texture, uvs, intensity } => {
                        let u = bc.x * uvs[0].x + bc.y * uvs[1].x + bc.z * uvs[2].x;
                        let v = bc.x * uvs[0].y + bc.y * uvs[1].y + bc.z * uvs[2].y;
                        // Texture rows run top-down, v runs bottom-up
                        texture.sample(u, 1.0 - v).shade(intensity)
                    }
                };
                self.fb.set_pixel(x, y, color);
                written += 1;
            }
        }
        written
    }
}

/// Minor-axis position and error term after `k` Bresenham steps, without
/// walking them. The error stays in `(-dx, dx]`, which pins down how many
/// minor steps were taken.
fn bresenham_skip(y0: i64, k: i64, dx: i64, derror2: i64, step: i64) -> (i64, i64) {
    if k == 0 {
        return (y0, 0);
    }
    let (k, dx2, derror2) = (i128::from(k), i128::from(dx) * 2, i128::from(derror2));
    let excess = k * derror2 - i128::from(dx);
    let minor_steps = -(-excess).div_euclid(dx2);
    let error2 = k * derror2 - minor_steps * dx2;
    (y0 + step * minor_steps as i64, error2 as i64)
}
