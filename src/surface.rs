//! Pixel surface abstraction and an in-memory frame buffer.
//!
//! Effects draw through [`PixelSurface`]. The board crate either implements it
//! directly on top of its LED driver, or implements the much smaller
//! [`StripWriter`] and wraps it in a [`FrameBuffer`].

use crate::color::{self, BLACK, Rgb8};

/// An ordered run of color cells that can be flushed to hardware.
///
/// Indices outside `0..len()` are ignored on write and read back as black.
pub trait PixelSurface {
    /// Number of cells.
    fn len(&self) -> usize;

    /// Returns the cell at `index`, or black when out of range.
    fn pixel(&self, index: usize) -> Rgb8;

    /// Writes a single cell.
    fn set_pixel(&mut self, index: usize, color: Rgb8);

    /// Flushes the current cells to the hardware.
    fn present(&mut self);

    /// Sets the global brightness applied while presenting.
    fn set_brightness(&mut self, level: u8);

    /// Current global brightness.
    fn brightness(&self) -> u8;

    /// Writes `count` cells starting at `start`, clipped to the surface.
    fn fill_range(&mut self, start: usize, count: usize, color: Rgb8) {
        let end = start.saturating_add(count).min(self.len());
        for index in start..end {
            self.set_pixel(index, color);
        }
    }

    /// Sets every cell to black. Does not present.
    fn clear(&mut self) {
        let len = self.len();
        self.fill_range(0, len, BLACK);
    }

    /// Sets every cell to `color`.
    fn fill_solid(&mut self, color: Rgb8) {
        let len = self.len();
        self.fill_range(0, len, color);
    }

    /// Adds `color` onto the cell at `index` with per-channel saturation.
    fn add_to_pixel(&mut self, index: usize, color: Rgb8) {
        if index < self.len() {
            let mixed = color::saturating_add(self.pixel(index), color);
            self.set_pixel(index, mixed);
        }
    }

    /// Dims every cell by `amount / 256` toward black.
    fn fade_to_black_by(&mut self, amount: u8) {
        for index in 0..self.len() {
            let faded = color::fade_to_black(self.pixel(index), amount);
            self.set_pixel(index, faded);
        }
    }
}

/// Hardware seam for [`FrameBuffer`].
///
/// Implement this for your LED driver (RMT, PIO, SPI, ...). Brightness and
/// power limiting are the driver's concern; handle hardware errors internally,
/// this method cannot fail.
pub trait StripWriter {
    /// Pushes one frame of pixels at the given global brightness.
    fn write(&mut self, pixels: &[Rgb8], brightness: u8);
}

/// In-memory surface of `N` cells flushed through a [`StripWriter`].
pub struct FrameBuffer<W: StripWriter, const N: usize> {
    pixels: [Rgb8; N],
    brightness: u8,
    writer: W,
}

impl<W: StripWriter, const N: usize> FrameBuffer<W, N> {
    /// Creates a dark buffer at the given brightness.
    pub fn new(writer: W, brightness: u8) -> Self {
        Self {
            pixels: [BLACK; N],
            brightness,
            writer,
        }
    }

    /// All cells, in strip order.
    pub fn pixels(&self) -> &[Rgb8] {
        &self.pixels
    }

    /// The wrapped writer.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Releases the wrapped writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: StripWriter, const N: usize> PixelSurface for FrameBuffer<W, N> {
    fn len(&self) -> usize {
        N
    }

    fn pixel(&self, index: usize) -> Rgb8 {
        self.pixels.get(index).copied().unwrap_or(BLACK)
    }

    fn set_pixel(&mut self, index: usize, color: Rgb8) {
        if let Some(cell) = self.pixels.get_mut(index) {
            *cell = color;
        }
    }

    fn present(&mut self) {
        self.writer.write(&self.pixels, self.brightness);
    }

    fn set_brightness(&mut self, level: u8) {
        self.brightness = level;
    }

    fn brightness(&self) -> u8 {
        self.brightness
    }

    fn clear(&mut self) {
        self.pixels = [BLACK; N];
    }
}
