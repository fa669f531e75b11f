use std::path::Path;

use burn::data::dataset::Dataset;

use super::{DatasetConfig, DatasetFactory, FactoryArgs, VisionDataset};

/// Image Classification Dataset.
///
/// Materializes an underlying dataset once through a [`DatasetFactory`] and forwards length and
/// indexed access to it. Items are `(sample, label)` pairs with the transform already applied by
/// the underlying dataset.
#[derive(Debug)]
pub struct ImageClassificationDataset<D> {
    /// Underlying dataset
    data: D,
}

impl<D, F, T> VisionDataset<F, T> for ImageClassificationDataset<D>
where
    F: DatasetFactory<T, Output = D>,
{
    /// Calls the factory exactly once, always allowing it to download missing files
    fn new(
        factory: F,
        transform: T,
        root: impl AsRef<Path>,
        train: bool,
    ) -> Result<Self, F::Error> {
        let root = root.as_ref().to_path_buf();

        log::debug!(
            "Materializing {} split under {}",
            if train { "train" } else { "test" },
            root.display()
        );

        let data = factory.create(FactoryArgs {
            root,
            train,
            download: true,
            transform,
        })?;

        Ok(Self { data })
    }
}

impl<D> ImageClassificationDataset<D> {
    /// Constructs the dataset for the root and split named in the config
    pub fn from_config<F, T>(
        factory: F,
        transform: T,
        config: &DatasetConfig,
    ) -> Result<Self, F::Error>
    where
        F: DatasetFactory<T, Output = D>,
    {
        Self::new(factory, transform, &config.root, config.train)
    }
}

impl<D, I> Dataset<I> for ImageClassificationDataset<D>
where
    D: Dataset<I>,
{
    /// Returns the underlying dataset's item at the given index
    fn get(&self, index: usize) -> Option<I> {
        self.data.get(index)
    }

    /// Returns the length of the underlying dataset
    fn len(&self) -> usize {
        self.data.len()
    }
}
