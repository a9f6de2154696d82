//! Software frame buffer handed between the engine and the presentation side

use std::io::{self, Write};

/// Linear RGBA color, each channel in 0.0 - 1.0
pub type Color = [f32; 4];

/// Pack a color into RGBA8 bytes stored in a `u32` (byte order R, G, B, A)
#[inline]
pub fn pack_color(color: Color) -> u32 {
    let [r, g, b, a] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    u32::from_le_bytes([r, g, b, a])
}

#[inline]
pub fn unpack_color(pixel: u32) -> Color {
    pixel.to_le_bytes().map(|c| c as f32 / 255.0)
}

/// A drawable RGBA8 raster
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    /// Monotonic number assigned by the surface when the frame is locked
    sequence: u64,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
            sequence: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub(crate) fn set_sequence(&mut self, sequence: u64) {
        self.sequence = sequence;
    }

    /// Reallocate the raster if a recycled buffer has the wrong dimensions
    pub(crate) fn ensure_size(&mut self, width: u32, height: u32) {
        if self.width != width || self.height != height {
            *self = Self::new(width, height);
        }
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Raw RGBA8 bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Fill the whole frame with one color
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(pack_color(color));
    }

    /// Blend `color` over the pixel at (x, y), scaled by `coverage` (0.0 - 1.0).
    /// Out-of-range coordinates are ignored.
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Color, coverage: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) as usize;
        let alpha = (color[3] * coverage).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let dst = unpack_color(self.pixels[idx]);
        let out = [
            color[0] * alpha + dst[0] * (1.0 - alpha),
            color[1] * alpha + dst[1] * (1.0 - alpha),
            color[2] * alpha + dst[2] * (1.0 - alpha),
            alpha + dst[3] * (1.0 - alpha),
        ];
        self.pixels[idx] = pack_color(out);
    }

    /// Write the frame as a binary PPM (P6); alpha is dropped
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut row = Vec::with_capacity(self.width as usize * 3);
        for line in self.as_bytes().chunks_exact(self.width.max(1) as usize * 4) {
            row.clear();
            for px in line.chunks_exact(4) {
                row.extend_from_slice(&px[..3]);
            }
            out.write_all(&row)?;
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_roundtrip_extremes() {
        assert_eq!(pack_color([1.0, 0.0, 0.0, 1.0]).to_le_bytes(), [255, 0, 0, 255]);
        assert_eq!(unpack_color(pack_color([0.0, 1.0, 0.0, 0.0])), [0.0, 1.0, 0.0, 0.0]);
        // Out-of-range channels saturate
        assert_eq!(pack_color([2.0, -1.0, 0.0, 1.0]).to_le_bytes(), [255, 0, 0, 255]);
    }

    #[test]
    fn test_clear_and_bytes() {
        let mut frame = Frame::new(4, 2);
        frame.clear([0.0, 0.0, 1.0, 1.0]);
        assert_eq!(frame.as_bytes().len(), 4 * 2 * 4);
        assert!(frame.as_bytes().chunks(4).all(|px| px == [0, 0, 255, 255]));
    }

    #[test]
    fn test_blend_pixel() {
        let mut frame = Frame::new(2, 2);
        frame.clear([0.0, 0.0, 0.0, 1.0]);

        frame.blend_pixel(1, 1, [1.0, 1.0, 1.0, 1.0], 1.0);
        assert_eq!(frame.pixel(1, 1), Some(pack_color([1.0, 1.0, 1.0, 1.0])));

        frame.blend_pixel(0, 0, [1.0, 1.0, 1.0, 1.0], 0.5);
        let [r, _, _, a] = frame.pixel(0, 0).unwrap().to_le_bytes();
        assert!((127..=128).contains(&r));
        assert_eq!(a, 255);

        // Ignored
        frame.blend_pixel(5, 5, [1.0, 1.0, 1.0, 1.0], 1.0);
        assert_eq!(frame.pixel(5, 5), None);
    }

    #[test]
    fn test_write_ppm() {
        let mut frame = Frame::new(3, 2);
        frame.clear([1.0, 0.0, 0.0, 1.0]);
        let mut out = Vec::new();
        frame.write_ppm(&mut out).unwrap();

        let header = b"P6\n3 2\n255\n";
        assert!(out.starts_with(header));
        let body = &out[header.len()..];
        assert_eq!(body.len(), 3 * 2 * 3);
        assert!(body.chunks(3).all(|px| px == [255, 0, 0]));
    }

    #[test]
    fn test_ensure_size_reallocates() {
        let mut frame = Frame::new(2, 2);
        frame.set_sequence(9);
        frame.ensure_size(2, 2);
        assert_eq!(frame.sequence(), 9);
        frame.ensure_size(3, 1);
        assert_eq!((frame.width(), frame.height()), (3, 1));
        assert_eq!(frame.pixels().len(), 3);
    }
}
