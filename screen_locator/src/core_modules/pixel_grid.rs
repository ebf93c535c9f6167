// THEORY:
// The `PixelGrid` is the decoded raster image: a rectangular block of `Pixel`s in
// row-major order. It plays the role the `Chunk` plays in a video pipeline, a
// "dumb" container that every scanner reads from, except that here the block
// is the whole frame.
//
// The grid remembers whether its source carried alpha (`ChannelLayout`). The
// scanners never care, but the remapper's output must be re-encoded in the
// same layout it came in with.

pub mod pixel_grid {
    use crate::core_modules::pixel::pixel::{Pixel, RGB_CHANNELS, RGBA_CHANNELS};
    use crate::error::{LocatorError, Result};

    /// How many channels the source carried.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ChannelLayout {
        Rgb,
        Rgba,
    }

    impl ChannelLayout {
        pub fn channels(self) -> usize {
            match self {
                ChannelLayout::Rgb => RGB_CHANNELS,
                ChannelLayout::Rgba => RGBA_CHANNELS,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct PixelGrid {
        /// The width of the image in pixels.
        width: u32,
        /// The height of the image in pixels.
        height: u32,
        layout: ChannelLayout,
        /// Row-major pixels, `width * height` long.
        pixels: Vec<Pixel>,
    }

    impl PixelGrid {
        /// Wraps a raw interleaved buffer, validating its length.
        pub fn from_raw(width: u32, height: u32, layout: ChannelLayout, bytes: &[u8]) -> Result<Self> {
            let channels = layout.channels();
            let expected = width as usize * height as usize * channels;
            if bytes.len() != expected {
                return Err(LocatorError::BufferSize {
                    width,
                    height,
                    channels,
                    expected,
                    actual: bytes.len(),
                });
            }

            let pixels = bytes
                .chunks_exact(channels)
                .map(Pixel::try_from)
                .collect::<Result<Vec<_>>>()?;

            Ok(Self {
                width,
                height,
                layout,
                pixels,
            })
        }

        /// Builds a grid from nested `rows[y][x] = [r, g, b(, a)]` tuples.
        ///
        /// Every row must be equally wide and every pixel must share the arity of
        /// the first one, which also decides the layout.
        pub fn from_rows(rows: &[Vec<Vec<i64>>]) -> Result<Self> {
            let height = rows.len();
            let width = rows.first().map_or(0, Vec::len);
            let arity = rows
                .first()
                .and_then(|row| row.first())
                .map_or(RGB_CHANNELS, Vec::len);
            let layout = match arity {
                RGB_CHANNELS => ChannelLayout::Rgb,
                RGBA_CHANNELS => ChannelLayout::Rgba,
                other => return Err(LocatorError::UnsupportedArity(other)),
            };

            let mut pixels = Vec::with_capacity(width * height);
            for (y, row) in rows.iter().enumerate() {
                if row.len() != width {
                    return Err(LocatorError::RaggedRows {
                        row: y,
                        expected: width,
                        actual: row.len(),
                    });
                }
                for (x, channels) in row.iter().enumerate() {
                    if channels.len() != arity {
                        return Err(LocatorError::MixedArity {
                            x,
                            y,
                            expected: arity,
                            actual: channels.len(),
                        });
                    }
                    pixels.push(Pixel::try_from_channels(channels)?);
                }
            }

            Ok(Self {
                width: width as u32,
                height: height as u32,
                layout,
                pixels,
            })
        }

        /// A grid where every pixel is `fill`.
        pub fn filled(width: u32, height: u32, layout: ChannelLayout, fill: Pixel) -> Self {
            Self {
                width,
                height,
                layout,
                pixels: vec![fill; width as usize * height as usize],
            }
        }

        pub fn width(&self) -> u32 {
            self.width
        }

        pub fn height(&self) -> u32 {
            self.height
        }

        pub fn layout(&self) -> ChannelLayout {
            self.layout
        }

        pub fn is_empty(&self) -> bool {
            self.pixels.is_empty()
        }

        pub fn pixels(&self) -> &[Pixel] {
            &self.pixels
        }

        #[inline]
        fn index(&self, x: u32, y: u32) -> Option<usize> {
            (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
        }

        #[inline]
        pub fn get(&self, x: u32, y: u32) -> Option<&Pixel> {
            self.index(x, y).map(|i| &self.pixels[i])
        }

        /// Overwrites one pixel. Returns false when `(x, y)` is off the grid.
        pub fn set(&mut self, x: u32, y: u32, pixel: Pixel) -> bool {
            match self.index(x, y) {
                Some(i) => {
                    self.pixels[i] = pixel;
                    true
                }
                None => false,
            }
        }

        /// Paints the inclusive rectangle `(x0, y0)..=(x1, y1)`, clipped to the grid.
        pub fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, pixel: Pixel) {
            for y in y0..=y1.min(self.height.saturating_sub(1)) {
                for x in x0..=x1.min(self.width.saturating_sub(1)) {
                    self.set(x, y, pixel);
                }
            }
        }

        pub(crate) fn pixels_mut(&mut self) -> &mut [Pixel] {
            &mut self.pixels
        }

        /// Every `(x, y, pixel)` in row-major order.
        pub fn iter_coords(&self) -> impl Iterator<Item = (u32, u32, &Pixel)> + '_ {
            let width = self.width.max(1) as usize;
            self.pixels
                .iter()
                .enumerate()
                .map(move |(i, p)| ((i % width) as u32, (i / width) as u32, p))
        }

        /// Interleaved bytes in the grid's source layout.
        pub fn to_raw(&self) -> Vec<u8> {
            let mut bytes = Vec::with_capacity(self.pixels.len() * self.layout.channels());
            for p in &self.pixels {
                bytes.extend_from_slice(&[p.red, p.green, p.blue]);
                if self.layout == ChannelLayout::Rgba {
                    bytes.push(p.alpha);
                }
            }
            bytes
        }
    }

}
