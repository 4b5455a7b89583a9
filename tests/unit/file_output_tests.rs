//! Streams written to disk and configurations read from disk

#[cfg(test)]
mod file_output_tests {
    use lobstream_rs::{CsvSink, GeneratorConfig, GeneratorError, LobEventGenerator};
    use std::fs;
    use tempfile::tempdir;

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            seed: 99,
            init_depth: 15,
            events: 2_000,
            snapshot_every: 400,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_file_matches_in_memory_stream() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("md_events.csv");

        let sink = CsvSink::create(&path).expect("create");
        let mut generator = LobEventGenerator::new(config(), sink).expect("valid");
        let stats = generator.run().expect("run");
        drop(generator.into_sink());

        let mut in_memory = LobEventGenerator::new(config(), Vec::new()).expect("valid");
        in_memory.run().expect("run");
        let expected = in_memory.into_sink();

        let contents = fs::read_to_string(&path).expect("read");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, expected);
        assert_eq!(lines.len() as u64, stats.lines + 1);
        assert!(contents.ends_with('\n'));
    }

    #[test]
    fn test_config_from_json_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "seed": 5, "events": 300, "snapshot_every": 100, "init_depth": 4 }"#,
        )
        .expect("write");

        let config = GeneratorConfig::from_json_file(&path).expect("parse");
        assert_eq!(config.seed, 5);
        assert_eq!(config.events, 300);
        assert_eq!(config.p_change, GeneratorConfig::default().p_change);

        let mut generator = LobEventGenerator::new(config, Vec::new()).expect("valid");
        let stats = generator.run().expect("run");
        assert_eq!(stats.snapshots, 3);
        assert_eq!(stats.incrementals, 300);
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempdir().expect("tempdir");
        let result = GeneratorConfig::from_json_file(dir.path().join("absent.json"));
        assert!(matches!(result, Err(GeneratorError::Io(_))));
    }

    #[test]
    fn test_invalid_config_leaves_file_empty() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("md_events.csv");
        let sink = CsvSink::create(&path).expect("create");

        let config = GeneratorConfig {
            p_new: 0.0,
            p_change: 0.0,
            p_delete: 0.0,
            ..config()
        };
        let result = LobEventGenerator::new(config, sink);
        assert!(matches!(
            result,
            Err(GeneratorError::InvalidConfiguration { .. })
        ));
        drop(result);

        assert_eq!(fs::read_to_string(&path).expect("read"), "");
    }
}
