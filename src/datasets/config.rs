use super::DEFAULT_ROOT;

/// Where a dataset is stored and which split to load
#[derive(burn::config::Config)]
pub struct DatasetConfig {
    /// The path where downloads are stored
    #[config(default = "DEFAULT_ROOT.to_string()")]
    pub root: String,

    /// If the split is training or testing
    #[config(default = true)]
    pub train: bool,
}

#[cfg(test)]
mod tests {
    use burn::config::Config as _;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_to_train_split_under_input_data() {
        let config = DatasetConfig::new();

        assert_eq!(config.root, "./input/data");
        assert_eq!(config.root, DEFAULT_ROOT);
        assert!(config.train);
    }

    #[test]
    fn survives_a_trip_through_a_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.json");

        let config = DatasetConfig::new()
            .with_root("/data/vision".to_string())
            .with_train(false);
        config.save(&path).unwrap();

        let loaded = DatasetConfig::load(&path).unwrap();

        assert_eq!(loaded.root, "/data/vision");
        assert!(!loaded.train);
    }
}
