//! Offscreen pixel buffer and the canvas that draws onto it.

use glam::Vec2;
use trackyard_core::SurfaceSize;

/// RGBA color used when painting onto a [`PixelBuffer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Quantizes the color into packed RGBA bytes.
    #[must_use]
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            quantize_channel(self.red),
            quantize_channel(self.green),
            quantize_channel(self.blue),
            quantize_channel(self.alpha),
        ]
    }
}

fn quantize_channel(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Independent offscreen pixel store, zero-initialized on allocation.
///
/// Snapshot captures render into a fresh buffer rather than one of the live
/// loop surfaces, so captures and the render cycle never contend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    size: SurfaceSize,
    pixels: Vec<[u8; 4]>,
}

impl PixelBuffer {
    /// Allocates a transparent-black buffer of the provided size.
    #[must_use]
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            pixels: vec![[0; 4]; size.area()],
        }
    }

    /// Dimensions of the buffer.
    #[must_use]
    pub const fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Returns the RGBA bytes stored at the pixel, or `None` out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.index(x, y).map(|index| self.pixels[index])
    }

    /// Raw RGBA pixel rows in top-to-bottom, left-to-right order.
    #[must_use]
    pub fn as_pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(index) = self.index(x, y) {
            self.pixels[index] = rgba;
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.size.width() && y < self.size.height() {
            Some(y as usize * self.size.width() as usize + x as usize)
        } else {
            None
        }
    }
}

/// Drawing surface combining a borrowed [`PixelBuffer`] with transform state.
///
/// The canvas tracks a translation offset plus a save/restore stack so a
/// renderer can be bracketed: whatever transform it leaves behind is undone
/// by the matching [`restore`](Self::restore).
#[derive(Debug)]
pub struct Canvas<'a> {
    buffer: &'a mut PixelBuffer,
    translation: Vec2,
    saved: Vec<Vec2>,
}

impl<'a> Canvas<'a> {
    /// Creates a canvas painting onto the provided buffer with an identity
    /// transform.
    #[must_use]
    pub fn new(buffer: &'a mut PixelBuffer) -> Self {
        Self {
            buffer,
            translation: Vec2::ZERO,
            saved: Vec::new(),
        }
    }

    /// Current translation applied to drawing coordinates.
    #[must_use]
    pub const fn translation(&self) -> Vec2 {
        self.translation
    }

    /// Pushes the current transform onto the save stack.
    pub fn save(&mut self) {
        self.saved.push(self.translation);
    }

    /// Pops the most recently saved transform.
    ///
    /// Restoring with an empty stack resets the transform to identity.
    pub fn restore(&mut self) {
        self.translation = self.saved.pop().unwrap_or(Vec2::ZERO);
    }

    /// Offsets all subsequent drawing by the provided amount.
    pub fn translate(&mut self, offset: Vec2) {
        self.translation += offset;
    }

    /// Fills an axis-aligned rectangle, clipped to the buffer bounds.
    pub fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }

        let top_left = origin + self.translation;
        let bottom_right = top_left + size;

        let x0 = top_left.x.round().max(0.0) as u32;
        let y0 = top_left.y.round().max(0.0) as u32;
        let x1 = bottom_right.x.round().max(0.0) as u32;
        let y1 = bottom_right.y.round().max(0.0) as u32;

        let rgba = color.to_rgba8();
        for y in y0..y1.min(self.buffer.size().height()) {
            for x in x0..x1.min(self.buffer.size().width()) {
                self.buffer.put_pixel(x, y, rgba);
            }
        }
    }
}
