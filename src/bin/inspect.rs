//! Command line tool to load a catalog dataset and print a few samples

use anyhow::anyhow;
use burn::data::dataset::Dataset as _;
use pico_args::Arguments;
use rand::Rng;
use vision_datasets::datasets::{catalog::Catalog, DatasetConfig, ImageClassificationDataset};

const HELP: &str = "\
Usage: inspect DATASET [OPTIONS]

Arguments:
  DATASET              The dataset to load (e.g., 'mnist' or 'fashion-mnist')

Options:
  -h, --help           Print help
  -r, --root           The path where downloads are stored (defaults to './input/data')
  -t, --test           Load the test split instead of the training split
  -s, --samples        Number of random samples to print (defaults to 10)
";

#[derive(Debug)]
struct Args {
    dataset: String,
    root: Option<String>,
    test: bool,
    samples: usize,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            root: pargs.opt_value_from_str(["-r", "--root"])?,
            test: pargs.contains(["-t", "--test"]),
            samples: pargs
                .opt_value_from_str(["-s", "--samples"])?
                .unwrap_or(10),
            dataset: pargs.free_from_str().map_err(|e| match e {
                pico_args::Error::MissingArgument => anyhow!("Missing required argument: DATASET"),
                _ => anyhow!("{}", e),
            })?,
        };

        Ok(Some(args))
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let Some(args) = Args::parse()? else {
        print!("{}", HELP);

        return Ok(());
    };

    let catalog = Catalog::try_from(args.dataset.as_str())?;

    let mut config = DatasetConfig::new().with_train(!args.test);
    if let Some(root) = args.root {
        config.root = root;
    }

    let transform = catalog.normalize().init();
    let dataset = ImageClassificationDataset::from_config(catalog, transform, &config)
        .map_err(|e| anyhow!("Unable to load {}: {}", catalog, e))?;

    let split = if config.train { "train" } else { "test" };
    println!("{} ({} split): {} samples", catalog, split, dataset.len());

    if dataset.is_empty() {
        return Ok(());
    }

    let classes = catalog.classes();
    let mut rng = rand::thread_rng();

    for _ in 0..args.samples {
        let index = rng.gen_range(0..dataset.len());
        let (image, label): (Vec<f32>, usize) = dataset
            .get(index)
            .ok_or_else(|| anyhow!("No sample at index {}", index))?;

        let mean = image.iter().sum::<f32>() / image.len().max(1) as f32;

        println!(
            "- #{index}: {} (label {label}, mean {mean:.3})",
            classes.get(label).copied().unwrap_or("?")
        );
    }

    Ok(())
}
