//! Structural properties of complete generated streams

#[cfg(test)]
mod stream_format_tests {
    use lobstream_rs::generator::{Action, EventRecord, HEADER, MarketEvent, Side};
    use lobstream_rs::{GeneratorConfig, LobEventGenerator};

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            seed: 11,
            start_ts: 1_000_000,
            dt_ns: 250,
            start_seq: 500,
            base_mid: 50_000,
            tick_size: 5,
            init_depth: 20,
            qty_min: 2,
            qty_max: 9,
            spread_ticks: 4,
            events: 3_000,
            snapshot_every: 700,
            snapshot_depth: Some(8),
            max_depth_soft: 30,
            p_mid_move: 0.05,
            ..GeneratorConfig::default()
        }
    }

    fn generate(config: GeneratorConfig) -> Vec<String> {
        let mut generator = LobEventGenerator::new(config, Vec::new()).expect("valid config");
        generator.run().expect("run");
        generator.into_sink()
    }

    fn records(lines: &[String]) -> Vec<EventRecord> {
        lines[1..]
            .iter()
            .map(|line| line.parse().expect("valid record"))
            .collect()
    }

    /// Splits records into snapshot blocks and runs of incrementals
    fn snapshot_blocks(records: &[EventRecord]) -> Vec<&[EventRecord]> {
        let mut blocks = Vec::new();
        let mut start = None;
        for (i, record) in records.iter().enumerate() {
            match record.event {
                MarketEvent::SnapshotBegin => start = Some(i),
                MarketEvent::SnapshotEnd => {
                    let begin = start.take().expect("SE without SB");
                    blocks.push(&records[begin..=i]);
                }
                _ => {}
            }
        }
        assert!(start.is_none(), "Unterminated snapshot block");
        blocks
    }

    #[test]
    fn test_single_header_first() {
        let lines = generate(config());
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines.iter().filter(|line| *line == HEADER).count(), 1);
    }

    #[test]
    fn test_every_line_has_seven_fields() {
        let lines = generate(config());
        assert!(lines.iter().all(|line| line.split(',').count() == 7));
    }

    #[test]
    fn test_timestamps_advance_by_step() {
        let records = records(&generate(config()));
        for pair in records.windows(2) {
            assert_eq!(pair[1].ts_ns - pair[0].ts_ns, 250);
        }
        assert_eq!(records[0].ts_ns, 1_000_000);
    }

    #[test]
    fn test_sequence_numbers() {
        let records = records(&generate(config()));
        assert_eq!(records[0].seq, 500);

        let mut expected = 500u64;
        let mut in_block = false;
        for record in &records {
            assert_eq!(record.seq, expected, "Unexpected seq in {record}");
            match record.event {
                MarketEvent::SnapshotBegin => in_block = true,
                MarketEvent::SnapshotLevel { .. } => assert!(in_block),
                MarketEvent::SnapshotEnd => {
                    in_block = false;
                    expected += 1;
                }
                MarketEvent::Incremental { .. } => expected += 1,
            }
        }
    }

    #[test]
    fn test_snapshot_cadence_and_count() {
        let records = records(&generate(config()));
        let blocks = snapshot_blocks(&records);
        // 3000 incrementals in chunks of 700: initial block plus one per non-final chunk
        assert_eq!(blocks.len(), 5);

        let incrementals = records
            .iter()
            .filter(|r| matches!(r.event, MarketEvent::Incremental { .. }))
            .count();
        assert_eq!(incrementals, 3_000);

        let mut since_snapshot = 0;
        for record in &records {
            match record.event {
                MarketEvent::Incremental { .. } => since_snapshot += 1,
                MarketEvent::SnapshotBegin => {
                    assert!(since_snapshot == 0 || since_snapshot == 700);
                    since_snapshot = 0;
                }
                _ => {}
            }
        }
        assert_eq!(since_snapshot, 3_000 - 4 * 700);
    }

    #[test]
    fn test_snapshot_levels_are_ordered_and_uncrossed() {
        let config = config();
        let records = records(&generate(config.clone()));

        for block in snapshot_blocks(&records) {
            let mut bids = Vec::new();
            let mut asks = Vec::new();
            for record in block {
                if let MarketEvent::SnapshotLevel { side, price, qty } = record.event {
                    assert!(qty >= config.qty_min && qty <= config.qty_max);
                    assert_eq!(price % config.tick_size, 0);
                    match side {
                        Side::Bid => {
                            assert!(asks.is_empty(), "Bids precede asks");
                            bids.push(price);
                        }
                        Side::Ask => asks.push(price),
                    }
                }
            }

            assert!(!bids.is_empty() && bids.len() <= 8);
            assert!(!asks.is_empty() && asks.len() <= 8);
            assert!(bids.windows(2).all(|w| w[0] > w[1]), "Bids best to worst");
            assert!(asks.windows(2).all(|w| w[0] < w[1]), "Asks best to worst");
            assert!(bids[0] < asks[0], "Snapshot book must not be crossed");
        }
    }

    #[test]
    fn test_incremental_quantities() {
        let config = config();
        let records = records(&generate(config.clone()));

        for record in &records {
            if let MarketEvent::Incremental { qty, action, price, .. } = record.event {
                assert_eq!(price % config.tick_size, 0);
                match action {
                    Action::Delete => assert_eq!(qty, 0),
                    Action::New | Action::Change => {
                        assert!(qty >= config.qty_min && qty <= config.qty_max)
                    }
                }
            }
        }
    }

    #[test]
    fn test_all_actions_appear() {
        let records = records(&generate(config()));
        for wanted in [Action::New, Action::Change, Action::Delete] {
            assert!(
                records.iter().any(|r| matches!(
                    r.event,
                    MarketEvent::Incremental { action, .. } if action == wanted
                )),
                "No {wanted:?} incrementals"
            );
        }
    }

    #[test]
    fn test_same_config_same_bytes() {
        assert_eq!(generate(config()), generate(config()));
    }

    #[test]
    fn test_weights_need_not_sum_to_one() {
        let doubled = GeneratorConfig {
            p_new: 2.0,
            p_change: 16.0,
            p_delete: 2.0,
            ..config()
        };
        let single = GeneratorConfig {
            p_new: 1.0,
            p_change: 8.0,
            p_delete: 1.0,
            ..config()
        };
        assert_eq!(generate(doubled), generate(single));
    }
}
