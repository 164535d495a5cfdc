//! Owned pixel arrays fed to the histogram builder.
//!
//! `PixelArray` holds either a 2D grey buffer (one sample per pixel) or an
//! interleaved RGB buffer (three samples per pixel, row-major, no padding).
//! Buffers are validated on construction so every later pass can index without
//! bounds surprises.

use crate::util::{HistMatchError, HistMatchResult};

#[cfg(feature = "image-io")]
pub mod io;

/// Sample layout of a pixel array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    /// One grey sample per pixel.
    Grey,
    /// Interleaved red, green and blue samples.
    Rgb,
}

impl PixelLayout {
    /// Returns the number of samples per pixel.
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Grey => 1,
            PixelLayout::Rgb => 3,
        }
    }
}

/// Owned contiguous 8-bit image buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelArray {
    data: Vec<u8>,
    width: usize,
    height: usize,
    layout: PixelLayout,
}

impl PixelArray {
    /// Creates a grey array from a row-major buffer of `width * height` samples.
    pub fn grey(data: Vec<u8>, width: usize, height: usize) -> HistMatchResult<Self> {
        Self::new(data, width, height, PixelLayout::Grey)
    }

    /// Creates an RGB array from an interleaved buffer of `width * height * 3` samples.
    pub fn rgb(data: Vec<u8>, width: usize, height: usize) -> HistMatchResult<Self> {
        Self::new(data, width, height, PixelLayout::Rgb)
    }

    /// Creates an array filled with a single RGB color.
    pub fn solid_rgb(width: usize, height: usize, color: [u8; 3]) -> HistMatchResult<Self> {
        let count = required_len(width, height, 1)?;
        let mut data = Vec::with_capacity(count * 3);
        for _ in 0..count {
            data.extend_from_slice(&color);
        }
        Self::rgb(data, width, height)
    }

    fn new(
        data: Vec<u8>,
        width: usize,
        height: usize,
        layout: PixelLayout,
    ) -> HistMatchResult<Self> {
        let needed = required_len(width, height, layout.channels())?;
        if data.len() < needed {
            return Err(HistMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(HistMatchError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
            layout,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns `width * height`.
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Returns the sample layout.
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Returns the raw sample buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Iterates pixels as `[r, g, b]`; grey samples are replicated.
    pub fn rgb_pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        let step = self.layout.channels();
        self.data.chunks_exact(step).map(|px| match px {
            [v] => [*v, *v, *v],
            [r, g, b] => [*r, *g, *b],
            _ => unreachable!("chunks_exact yields 1 or 3 samples"),
        })
    }

    /// Returns true when the array carries no chroma.
    ///
    /// An RGB array qualifies when every pixel has equal red, green and blue,
    /// which is the zero-saturation condition in HSV.
    pub fn is_greyscale(&self) -> bool {
        match self.layout {
            PixelLayout::Grey => true,
            PixelLayout::Rgb => self
                .data
                .chunks_exact(3)
                .all(|px| px[0] == px[1] && px[1] == px[2]),
        }
    }

    /// Converts to a grey array using ITU-R BT.601 luma weights.
    ///
    /// Grey arrays are returned unchanged.
    pub fn to_grey(&self) -> PixelArray {
        match self.layout {
            PixelLayout::Grey => self.clone(),
            PixelLayout::Rgb => {
                let data = self
                    .data
                    .chunks_exact(3)
                    .map(|px| luma(px[0], px[1], px[2]))
                    .collect();
                PixelArray {
                    data,
                    width: self.width,
                    height: self.height,
                    layout: PixelLayout::Grey,
                }
            }
        }
    }
}

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    ((weighted + 500) / 1000) as u8
}

fn required_len(width: usize, height: usize, channels: usize) -> HistMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(HistMatchError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(channels))
        .ok_or(HistMatchError::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::{luma, PixelArray, PixelLayout};
    use crate::util::HistMatchError;

    #[test]
    fn rejects_mismatched_buffers() {
        let err = PixelArray::rgb(vec![0u8; 5], 1, 2).unwrap_err();
        assert_eq!(err, HistMatchError::BufferTooSmall { needed: 6, got: 5 });

        let err = PixelArray::grey(vec![0u8; 5], 2, 2).unwrap_err();
        assert_eq!(
            err,
            HistMatchError::InvalidDimensions {
                width: 2,
                height: 2
            }
        );

        let err = PixelArray::grey(Vec::new(), 0, 3).unwrap_err();
        assert_eq!(
            err,
            HistMatchError::InvalidDimensions {
                width: 0,
                height: 3
            }
        );
    }

    #[test]
    fn greyscale_detection_requires_equal_channels() {
        let grey = PixelArray::solid_rgb(4, 4, [150, 150, 150]).unwrap();
        assert!(grey.is_greyscale());

        let red = PixelArray::solid_rgb(4, 4, [254, 0, 0]).unwrap();
        assert!(!red.is_greyscale());
    }

    #[test]
    fn luma_preserves_neutral_values() {
        for v in [0u8, 1, 127, 150, 254, 255] {
            assert_eq!(luma(v, v, v), v);
        }
        assert_eq!(luma(255, 0, 0), 76);
    }

    #[test]
    fn to_grey_keeps_dimensions() {
        let img = PixelArray::solid_rgb(3, 2, [10, 20, 30]).unwrap();
        let grey = img.to_grey();
        assert_eq!(grey.layout(), PixelLayout::Grey);
        assert_eq!(grey.dimensions(), (3, 2));
        assert_eq!(grey.as_slice().len(), 6);
        assert_eq!(grey.rgb_pixels().count(), 6);
    }
}
