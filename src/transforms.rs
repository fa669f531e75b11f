use burn::data::dataset::transform::Mapper;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// A raw grayscale image as stored by the catalog
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct RawImage {
    /// Width in pixels
    pub width: usize,

    /// Height in pixels
    pub height: usize,

    /// Row-major pixel intensities
    pub pixels: Vec<u8>,
}

/// Leaves samples untouched
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl<I: Clone> Mapper<I, I> for Identity {
    fn map(&self, item: &I) -> I {
        item.clone()
    }
}

/// Scales pixel intensities to `[0, 1]`
#[derive(Clone, Copy, Debug, Default)]
pub struct ToFloat;

impl Mapper<RawImage, Vec<f32>> for ToFloat {
    fn map(&self, item: &RawImage) -> Vec<f32> {
        item.pixels.iter().map(|p| *p as f32 / 255.0).collect()
    }
}

/// Configuration for [`Normalize`]. Defaults are the MNIST training set statistics.
#[derive(burn::config::Config)]
pub struct NormalizeConfig {
    /// Mean of the scaled pixel intensities
    #[config(default = 0.1307)]
    pub mean: f32,

    /// Standard deviation of the scaled pixel intensities
    #[config(default = 0.3081)]
    pub std: f32,
}

impl NormalizeConfig {
    /// Initialize the transform
    pub fn init(&self) -> Normalize {
        Normalize {
            mean: self.mean,
            std: self.std,
        }
    }
}

/// Scales pixels to `[0, 1]`, then standardizes them with a fixed mean and deviation
#[derive(Clone, Copy, Debug)]
pub struct Normalize {
    mean: f32,
    std: f32,
}

impl Mapper<RawImage, Vec<f32>> for Normalize {
    fn map(&self, item: &RawImage) -> Vec<f32> {
        ToFloat
            .map(item)
            .into_iter()
            .map(|p| (p - self.mean) / self.std)
            .collect()
    }
}
