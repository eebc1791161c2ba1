//! Core types for the rasterizer

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };
    /// Fully transparent black, the state of a fresh framebuffer
    pub const CLEAR: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Apply shading (multiply RGB by intensity 0.0-1.0, alpha untouched)
    pub fn shade(self, intensity: f32) -> Self {
        let i = intensity.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * i) as u8,
            g: (self.g as f32 * i) as u8,
            b: (self.b as f32 * i) as u8,
            a: self.a,
        }
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::with_alpha(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

/// Simple texture (array of colors, row 0 at the top)
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Texture {
    /// Solid white texture
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::WHITE; width * height],
            name: String::new(),
        }
    }

    /// Load texture from an image file (PNG, JPEG, BMP or TGA)
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, RenderError> {
        use image::GenericImageView;

        let path = path.as_ref();
        let img = image::open(path)?;

        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: width as usize,
                height: height as usize,
            });
        }
        let rgba = img.to_rgba8();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        log::info!("Loaded texture: {} ({}x{})", name, width, height);

        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        })
    }

    /// Create a checkerboard test texture
    pub fn checkerboard(width: usize, height: usize, color1: Color, color2: Color) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self { width, height, pixels, name: "checkerboard".to_string() }
    }

    /// Sample at texel-space fractions (no filtering).
    /// u = 0 is the left column, v = 0 the top row; edges clamp.
    /// An empty texture samples as black.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::BLACK;
        }
        let tx = ((u * self.width as f32) as usize).min(self.width - 1);
        let ty = ((v * self.height as f32) as usize).min(self.height - 1);
        self.pixels[ty * self.width + tx]
    }

    /// Get pixel at x,y coordinates
    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            Color::BLACK
        }
    }
}

/// How mesh faces turn into pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShadingMode {
    Wireframe, // Face outlines only, no depth
    #[default]
    Flat,      // One light calculation per face
    Textured,  // Flat lighting over sampled texels
}

/// Rasterizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RasterSettings {
    /// Shading mode
    pub shading: ShadingMode,
    /// Line color in wireframe mode
    pub wireframe_color: Color,
    /// Base color for flat shading
    pub base_color: Color,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            shading: ShadingMode::Flat,
            wireframe_color: Color::WHITE,
            base_color: Color::WHITE,
        }
    }
}
