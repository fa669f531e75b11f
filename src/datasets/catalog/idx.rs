use std::path::{Path, PathBuf};

use burn::data::dataset::{
    transform::{Mapper, MapperDataset},
    Dataset, InMemDataset,
};

use super::{Catalog, CatalogError};
use crate::{
    datasets::FactoryArgs,
    transforms::RawImage,
    utils::files::{download_file, find_maybe_gz, read_maybe_gz},
};

const IMAGES_MAGIC: u32 = 2051;
const LABELS_MAGIC: u32 = 2049;

const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

/// A raw image paired with its class label
pub type RawItem = (RawImage, usize);

/// Applies an image transform to the sample half of a labelled pair
pub struct SampleMapper<T>(T);

impl<T, O> Mapper<RawItem, (O, usize)> for SampleMapper<T>
where
    T: Mapper<RawImage, O> + Send + Sync,
{
    fn map(&self, item: &RawItem) -> (O, usize) {
        (self.0.map(&item.0), item.1)
    }
}

type MappedDataset<T> = MapperDataset<InMemDataset<RawItem>, SampleMapper<T>, RawItem>;

/// An image classification dataset loaded from a pair of IDX files.
///
/// All samples are held in memory as [`RawImage`]s; the transform runs on every `get`.
pub struct IdxDataset<T> {
    dataset: MappedDataset<T>,
}

impl<T, O> Dataset<(O, usize)> for IdxDataset<T>
where
    T: Mapper<RawImage, O> + Send + Sync,
    O: Send + Sync,
{
    fn get(&self, index: usize) -> Option<(O, usize)> {
        self.dataset.get(index)
    }

    fn len(&self) -> usize {
        self.dataset.len()
    }
}

impl<T> IdxDataset<T> {
    /// Loads a split of a catalog dataset stored under `<root>/<name>/raw`, downloading missing
    /// files if allowed
    pub fn load(dataset: Catalog, args: FactoryArgs<T>) -> Result<Self, CatalogError> {
        let raw_dir = args.root.join(dataset.dir_name()).join("raw");

        let (images_name, labels_name) = if args.train {
            (TRAIN_IMAGES, TRAIN_LABELS)
        } else {
            (TEST_IMAGES, TEST_LABELS)
        };

        let images_path = ensure_file(dataset, &raw_dir, images_name, args.download)?;
        let labels_path = ensure_file(dataset, &raw_dir, labels_name, args.download)?;

        let images = parse_images(&read_maybe_gz(&images_path)?)?;
        let labels = parse_labels(&read_maybe_gz(&labels_path)?)?;

        log::debug!(
            "Loaded {} {} samples from {}",
            images.len(),
            dataset,
            raw_dir.display()
        );

        Self::from_parts(images, labels, args.transform)
    }

    /// Builds a dataset from decoded images and labels
    pub fn from_parts(
        images: Vec<RawImage>,
        labels: Vec<usize>,
        transform: T,
    ) -> Result<Self, CatalogError> {
        if images.len() != labels.len() {
            return Err(CatalogError::CountMismatch {
                images: images.len(),
                labels: labels.len(),
            });
        }

        let items = images.into_iter().zip(labels).collect();
        let dataset = MapperDataset::new(InMemDataset::new(items), SampleMapper(transform));

        Ok(Self { dataset })
    }
}

/// Returns the path of `name` in `dir`, fetching the gzipped file from the mirror if needed
fn ensure_file(
    dataset: Catalog,
    dir: &Path,
    name: &str,
    download: bool,
) -> Result<PathBuf, CatalogError> {
    if let Some(path) = find_maybe_gz(dir, name) {
        return Ok(path);
    }

    if !download {
        return Err(CatalogError::NotFound(dir.join(name)));
    }

    let gz_name = format!("{}.gz", name);
    let path = dir.join(&gz_name);
    download_file(&format!("{}{}", dataset.mirror(), gz_name), &path)?;

    Ok(path)
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32, CatalogError> {
    bytes
        .get(offset..offset + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| CatalogError::Format("truncated header".to_string()))
}

fn check_magic(bytes: &[u8], expected: u32) -> Result<(), CatalogError> {
    let magic = read_u32(bytes, 0)?;

    if magic != expected {
        return Err(CatalogError::Format(format!(
            "magic number {} (expected {})",
            magic, expected
        )));
    }

    Ok(())
}

/// Parse an IDX3 image file: magic | count | rows | cols | pixels
pub fn parse_images(bytes: &[u8]) -> Result<Vec<RawImage>, CatalogError> {
    check_magic(bytes, IMAGES_MAGIC)?;

    let count = read_u32(bytes, 4)? as usize;
    let height = read_u32(bytes, 8)? as usize;
    let width = read_u32(bytes, 12)? as usize;

    let pixels = &bytes[16..];

    let size = height
        .checked_mul(width)
        .filter(|size| *size > 0)
        .ok_or_else(|| CatalogError::Format(format!("invalid image size {}x{}", height, width)))?;
    let total = count
        .checked_mul(size)
        .ok_or_else(|| CatalogError::Format(format!("{} images of {} pixels", count, size)))?;

    if pixels.len() < total {
        return Err(CatalogError::Format(format!(
            "expected {} images of {}x{}, found {} pixel bytes",
            count,
            height,
            width,
            pixels.len()
        )));
    }

    Ok(pixels
        .chunks_exact(size)
        .take(count)
        .map(|chunk| RawImage::new(width, height, chunk.to_vec()))
        .collect())
}

/// Parse an IDX1 label file: magic | count | labels
pub fn parse_labels(bytes: &[u8]) -> Result<Vec<usize>, CatalogError> {
    check_magic(bytes, LABELS_MAGIC)?;

    let count = read_u32(bytes, 4)? as usize;
    let labels = &bytes[8..];

    if labels.len() < count {
        return Err(CatalogError::Format(format!(
            "expected {} labels, found {}",
            count,
            labels.len()
        )));
    }

    Ok(labels[..count].iter().map(|l| *l as usize).collect())
}

#[cfg(test)]
mod tests {
    use std::{fs, io::Write};

    use flate2::{write::GzEncoder, Compression};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        datasets::{ImageClassificationDataset, VisionDataset},
        transforms::{Identity, ToFloat},
    };

    fn images_file(images: &[[u8; 4]]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(IMAGES_MAGIC.to_be_bytes());
        bytes.extend((images.len() as u32).to_be_bytes());
        bytes.extend(2u32.to_be_bytes());
        bytes.extend(2u32.to_be_bytes());
        for image in images {
            bytes.extend(image);
        }
        bytes
    }

    fn labels_file(labels: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(LABELS_MAGIC.to_be_bytes());
        bytes.extend((labels.len() as u32).to_be_bytes());
        bytes.extend(labels);
        bytes
    }

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    /// Writes a three sample test split for MNIST under a fresh root
    fn mnist_root() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        let raw = root.path().join("MNIST").join("raw");
        fs::create_dir_all(&raw).unwrap();

        let images = images_file(&[[0, 0, 0, 0], [255, 255, 255, 255], [0, 255, 0, 255]]);
        fs::write(raw.join(TEST_IMAGES), images).unwrap();
        fs::write(raw.join(format!("{}.gz", TEST_LABELS)), gzip(&labels_file(&[7, 2, 1])))
            .unwrap();

        root
    }

    fn args<T>(root: &Path, train: bool, download: bool, transform: T) -> FactoryArgs<T> {
        FactoryArgs {
            root: root.to_path_buf(),
            train,
            download,
            transform,
        }
    }

    #[test]
    fn loads_plain_and_gzipped_files() {
        let root = mnist_root();

        let dataset = IdxDataset::load(Catalog::Mnist, args(root.path(), false, false, Identity))
            .unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(
            dataset.get(1),
            Some((RawImage::new(2, 2, vec![255, 255, 255, 255]), 2))
        );
        assert_eq!(dataset.get(3), None::<(RawImage, usize)>);
    }

    #[test]
    fn applies_the_transform_on_access() {
        let root = mnist_root();

        let dataset = IdxDataset::load(Catalog::Mnist, args(root.path(), false, false, ToFloat))
            .unwrap();

        assert_eq!(dataset.get(2), Some((vec![0.0, 1.0, 0.0, 1.0], 1)));
    }

    #[test]
    fn missing_files_are_not_found_without_download() {
        let root = mnist_root();

        let result = IdxDataset::load(Catalog::Mnist, args(root.path(), true, false, Identity));

        match result {
            Err(CatalogError::NotFound(path)) => {
                assert_eq!(path, root.path().join("MNIST").join("raw").join(TRAIN_IMAGES))
            }
            _ => panic!("expected a missing train split"),
        }
    }

    #[test]
    fn adapter_reads_existing_files_from_the_catalog() {
        let root = mnist_root();

        let dataset =
            ImageClassificationDataset::new(Catalog::Mnist, Identity, root.path(), false).unwrap();

        let labels: Vec<usize> = (0..dataset.len())
            .filter_map(|i| Dataset::<(RawImage, usize)>::get(&dataset, i))
            .map(|(_, label)| label)
            .collect();

        assert_eq!(labels, vec![7, 2, 1]);
        assert!(Dataset::<(RawImage, usize)>::get(&dataset, 3).is_none());
    }

    #[test]
    fn rejects_a_bad_magic_number() {
        let bytes = labels_file(&[1, 2]);

        assert!(matches!(parse_images(&bytes), Err(CatalogError::Format(_))));
    }

    #[test]
    fn rejects_truncated_pixel_data() {
        let mut bytes = images_file(&[[1, 2, 3, 4]]);
        bytes.pop();

        assert!(matches!(parse_images(&bytes), Err(CatalogError::Format(_))));
    }

    #[test]
    fn rejects_header_dimensions_that_overflow() {
        let mut bytes = Vec::new();
        bytes.extend(IMAGES_MAGIC.to_be_bytes());
        for _ in 0..3 {
            bytes.extend(u32::MAX.to_be_bytes());
        }
        bytes.extend([0u8; 8]);

        assert!(matches!(parse_images(&bytes), Err(CatalogError::Format(_))));
    }

    #[test]
    fn rejects_a_header_shorter_than_sixteen_bytes() {
        let bytes = images_file(&[[1, 2, 3, 4]]);

        let result = parse_images(&bytes[..12]);

        match result {
            Err(CatalogError::Format(message)) => assert_eq!(message, "truncated header"),
            _ => panic!("expected a truncated header"),
        }
    }

    #[test]
    fn rejects_truncated_label_data() {
        let mut bytes = labels_file(&[1, 2, 3]);
        bytes.pop();

        assert!(matches!(parse_labels(&bytes), Err(CatalogError::Format(_))));
    }

    #[test]
    fn rejects_mismatched_counts() {
        let images = parse_images(&images_file(&[[1, 2, 3, 4]])).unwrap();
        let labels = parse_labels(&labels_file(&[1, 2])).unwrap();

        let result = IdxDataset::from_parts(images, labels, Identity);

        assert!(matches!(
            result,
            Err(CatalogError::CountMismatch {
                images: 1,
                labels: 2
            })
        ));
    }
}
