use std::path::{Path, PathBuf};

/// The image classification adapter
pub mod image_classification;

/// Dataset configuration
pub mod config;

/// Datasets from the built-in vision catalog
pub mod catalog;

pub use config::DatasetConfig;
pub use image_classification::ImageClassificationDataset;

/// The default directory where dataset files are stored
pub static DEFAULT_ROOT: &str = "./input/data";

/// Arguments handed to a dataset factory
#[derive(Clone, Debug)]
pub struct FactoryArgs<T> {
    /// The path where downloads are stored
    pub root: PathBuf,

    /// If the split is training (`true`) or testing (`false`)
    pub train: bool,

    /// Whether missing files may be downloaded
    pub download: bool,

    /// A transform to be applied to each raw sample
    pub transform: T,
}

/// Something that can materialize an underlying dataset
pub trait DatasetFactory<T> {
    /// The collection produced by this factory
    type Output;

    /// The error raised when the collection can't be produced
    type Error;

    /// Produce the collection
    fn create(self, args: FactoryArgs<T>) -> Result<Self::Output, Self::Error>;
}

impl<T, F, O, E> DatasetFactory<T> for F
where
    F: FnOnce(FactoryArgs<T>) -> Result<O, E>,
{
    type Output = O;
    type Error = E;

    fn create(self, args: FactoryArgs<T>) -> Result<O, E> {
        self(args)
    }
}

/// A vision dataset which can be constructed from a dataset factory.
///
/// This is only the construction half of a vision dataset. Length and indexed access come from
/// [`burn::data::dataset::Dataset`], which every implementor is expected to provide as well.
pub trait VisionDataset<F, T>: Sized
where
    F: DatasetFactory<T>,
{
    /// Construct the dataset for a split, storing downloads under `root`
    fn new(factory: F, transform: T, root: impl AsRef<Path>, train: bool)
        -> Result<Self, F::Error>;
}
