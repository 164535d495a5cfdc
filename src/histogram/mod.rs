//! Color and grey intensity histograms.
//!
//! A `Histogram` is a closed variant over its channel layout: three channels
//! (red, green, blue) for color images, one channel for grey images. Every
//! channel holds exactly `bins` counts over the intensity range [0, 255], and
//! each channel sums to the pixel count of its source.
//!
//! Histograms built from pixels keep a shared handle to them. Color-axis
//! projection and Color/Grey reconciliation re-derive data from the pixels,
//! so histograms assembled from bare counts support intersection of equal
//! kinds only.

mod build;

pub use build::{bin_counts, build_histogram};

use crate::image::PixelArray;
use crate::util::{HistMatchError, HistMatchResult};
use std::sync::Arc;

/// Kind tag of a histogram.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistogramKind {
    /// Red, green and blue channels.
    Color,
    /// Single grey channel.
    Grey,
}

/// Per-channel bin counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Channels {
    /// Three channels of equal length.
    Color {
        red: Vec<u64>,
        green: Vec<u64>,
        blue: Vec<u64>,
    },
    /// One grey channel.
    Grey(Vec<u64>),
}

/// Binned intensity histogram.
#[derive(Clone, Debug)]
pub struct Histogram {
    bins: usize,
    channels: Channels,
    pixels: Option<Arc<PixelArray>>,
}

impl Histogram {
    /// Creates a color histogram from externally computed counts.
    pub fn from_color(red: Vec<u64>, green: Vec<u64>, blue: Vec<u64>) -> HistMatchResult<Self> {
        let bins = red.len();
        let hist = Self {
            bins,
            channels: Channels::Color { red, green, blue },
            pixels: None,
        };
        hist.validate()?;
        Ok(hist)
    }

    /// Creates a grey histogram from externally computed counts.
    pub fn from_grey(grey: Vec<u64>) -> HistMatchResult<Self> {
        let hist = Self {
            bins: grey.len(),
            channels: Channels::Grey(grey),
            pixels: None,
        };
        hist.validate()?;
        Ok(hist)
    }

    pub(crate) fn from_parts(bins: usize, channels: Channels, pixels: Arc<PixelArray>) -> Self {
        Self {
            bins,
            channels,
            pixels: Some(pixels),
        }
    }

    /// Attaches the pixels the counts were computed from.
    pub fn with_pixels(mut self, pixels: Arc<PixelArray>) -> Self {
        self.pixels = Some(pixels);
        self
    }

    /// Returns the number of bins per channel.
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Returns the kind tag.
    pub fn kind(&self) -> HistogramKind {
        match self.channels {
            Channels::Color { .. } => HistogramKind::Color,
            Channels::Grey(_) => HistogramKind::Grey,
        }
    }

    /// Returns the channel counts.
    pub fn channels(&self) -> &Channels {
        &self.channels
    }

    /// Returns the backing pixels, if any.
    pub fn pixels(&self) -> Option<&PixelArray> {
        self.pixels.as_deref()
    }

    /// Red counts for a color histogram.
    pub fn red(&self) -> Option<&[u64]> {
        match &self.channels {
            Channels::Color { red, .. } => Some(red),
            Channels::Grey(_) => None,
        }
    }

    /// Green counts for a color histogram.
    pub fn green(&self) -> Option<&[u64]> {
        match &self.channels {
            Channels::Color { green, .. } => Some(green),
            Channels::Grey(_) => None,
        }
    }

    /// Blue counts for a color histogram.
    pub fn blue(&self) -> Option<&[u64]> {
        match &self.channels {
            Channels::Color { blue, .. } => Some(blue),
            Channels::Grey(_) => None,
        }
    }

    /// Grey counts for a grey histogram.
    pub fn grey(&self) -> Option<&[u64]> {
        match &self.channels {
            Channels::Grey(grey) => Some(grey),
            Channels::Color { .. } => None,
        }
    }

    /// Replaces the red channel.
    pub fn set_red(&mut self, counts: Vec<u64>) -> HistMatchResult<()> {
        let bins = self.bins;
        match &mut self.channels {
            Channels::Color { red, .. } => replace_channel(red, counts, bins),
            Channels::Grey(_) => Err(HistMatchError::InvalidInput(
                "cannot set red on a grey histogram",
            )),
        }
    }

    /// Replaces the green channel.
    pub fn set_green(&mut self, counts: Vec<u64>) -> HistMatchResult<()> {
        let bins = self.bins;
        match &mut self.channels {
            Channels::Color { green, .. } => replace_channel(green, counts, bins),
            Channels::Grey(_) => Err(HistMatchError::InvalidInput(
                "cannot set green on a grey histogram",
            )),
        }
    }

    /// Replaces the blue channel.
    pub fn set_blue(&mut self, counts: Vec<u64>) -> HistMatchResult<()> {
        let bins = self.bins;
        match &mut self.channels {
            Channels::Color { blue, .. } => replace_channel(blue, counts, bins),
            Channels::Grey(_) => Err(HistMatchError::InvalidInput(
                "cannot set blue on a grey histogram",
            )),
        }
    }

    /// Replaces the grey channel.
    pub fn set_grey(&mut self, counts: Vec<u64>) -> HistMatchResult<()> {
        let bins = self.bins;
        match &mut self.channels {
            Channels::Grey(grey) => replace_channel(grey, counts, bins),
            Channels::Color { .. } => Err(HistMatchError::InvalidInput(
                "cannot set grey on a color histogram",
            )),
        }
    }

    /// Checks that `bins` is non-zero and every channel has `bins` counts.
    pub fn validate(&self) -> HistMatchResult<()> {
        if self.bins == 0 {
            return Err(HistMatchError::InvalidHistogram {
                reason: "zero bins",
            });
        }
        match &self.channels {
            Channels::Color { red, green, blue } => {
                for channel in [red, green, blue] {
                    check_len(channel, self.bins)?;
                }
                Ok(())
            }
            Channels::Grey(grey) => check_len(grey, self.bins),
        }
    }

    /// Pixel count as seen by the reference channel (red, or grey).
    pub fn total_pixels(&self) -> u64 {
        match &self.channels {
            Channels::Color { red, .. } => red.iter().sum(),
            Channels::Grey(grey) => grey.iter().sum(),
        }
    }

    /// Returns a grey histogram with `bins` bins recomputed from the pixels.
    ///
    /// A grey histogram with the requested bin count is returned as is.
    pub fn to_grey(&self, bins: usize) -> HistMatchResult<Histogram> {
        if self.kind() == HistogramKind::Grey && self.bins == bins {
            return Ok(self.clone());
        }
        let pixels = self.pixels.clone().ok_or(HistMatchError::MissingPixels {
            context: "grey conversion",
        })?;
        build_histogram(pixels, bins, true)
    }
}

impl PartialEq for Histogram {
    fn eq(&self, other: &Self) -> bool {
        self.bins == other.bins && self.channels == other.channels
    }
}

fn check_len(channel: &[u64], bins: usize) -> HistMatchResult<()> {
    if channel.len() != bins {
        return Err(HistMatchError::ChannelLength {
            bins,
            got: channel.len(),
        });
    }
    Ok(())
}

fn replace_channel(slot: &mut Vec<u64>, counts: Vec<u64>, bins: usize) -> HistMatchResult<()> {
    check_len(&counts, bins)?;
    *slot = counts;
    Ok(())
}
