use std::{fmt::Display, io, path::PathBuf};

use super::{DatasetFactory, FactoryArgs};
use crate::transforms::NormalizeConfig;

/// Datasets stored in the IDX format
pub mod idx;

pub use idx::IdxDataset;

/// The vision datasets available in the catalog
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Catalog {
    /// Handwritten digits
    Mnist,

    /// Zalando article images, drop-in compatible with MNIST
    FashionMnist,
}

impl Catalog {
    /// Get the unique string token that identifies this dataset
    pub fn as_str(&self) -> &'static str {
        match self {
            Catalog::Mnist => "mnist",
            Catalog::FashionMnist => "fashion-mnist",
        }
    }

    /// The directory under the storage root holding this dataset
    pub fn dir_name(&self) -> &'static str {
        match self {
            Catalog::Mnist => "MNIST",
            Catalog::FashionMnist => "FashionMNIST",
        }
    }

    /// The mirror the gzipped IDX files are downloaded from
    pub fn mirror(&self) -> &'static str {
        match self {
            Catalog::Mnist => "https://ossci-datasets.s3.amazonaws.com/mnist/",
            Catalog::FashionMnist => {
                "http://fashion-mnist.s3-website.eu-central-1.amazonaws.com/"
            }
        }
    }

    /// Pixel statistics of the training split, for normalizing samples
    pub fn normalize(&self) -> NormalizeConfig {
        match self {
            Catalog::Mnist => NormalizeConfig::new(),
            Catalog::FashionMnist => NormalizeConfig::new().with_mean(0.2860).with_std(0.3530),
        }
    }

    /// Class names, indexed by label
    pub fn classes(&self) -> [&'static str; 10] {
        match self {
            Catalog::Mnist => ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"],
            Catalog::FashionMnist => [
                "T-shirt/top",
                "Trouser",
                "Pullover",
                "Dress",
                "Coat",
                "Sandal",
                "Shirt",
                "Sneaker",
                "Bag",
                "Ankle boot",
            ],
        }
    }
}

impl TryFrom<&str> for Catalog {
    type Error = CatalogError;

    /// Try to convert a string to a catalog dataset
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        [Catalog::Mnist, Catalog::FashionMnist]
            .into_iter()
            .find(|dataset| value.to_lowercase() == dataset.as_str())
            .ok_or_else(|| CatalogError::Unknown(value.to_string()))
    }
}

impl Display for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<T> DatasetFactory<T> for Catalog {
    type Output = IdxDataset<T>;
    type Error = CatalogError;

    fn create(self, args: FactoryArgs<T>) -> Result<IdxDataset<T>, CatalogError> {
        IdxDataset::load(self, args)
    }
}

/// Catalog Error
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// No dataset found for the given string
    #[error("no dataset found for {0}")]
    Unknown(String),

    /// A required file is missing and downloads are disabled
    #[error("dataset file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A file doesn't hold valid IDX data
    #[error("invalid IDX data: {0}")]
    Format(String),

    /// The image and label files disagree on the number of samples
    #[error("{images} images but {labels} labels")]
    CountMismatch {
        /// Number of images
        images: usize,

        /// Number of labels
        labels: usize,
    },

    /// Reading or downloading a file failed
    #[error(transparent)]
    Io(#[from] io::Error),
}
