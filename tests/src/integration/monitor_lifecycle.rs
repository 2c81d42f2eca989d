//! # Monitor Lifecycle
//!
//! A scraper only ever writes the staged copy of a monitor. Readers see the
//! production copy, which changes in a single rename.

#[cfg(test)]
mod tests {
    use std::fs;

    use ix_01_chunk_index::RangeChunkStore;
    use ix_02_address_monitors::{Monitor, MonitorDirectory, MonitorError, MonitorScanner};
    use shared_types::{AppearanceRecord, BlockRange};

    use crate::fixtures::{address, temp_config, write_chunk, CHAIN};

    fn rec(block: u32, tx: u32) -> AppearanceRecord {
        AppearanceRecord::new(block, tx)
    }

    #[test]
    fn test_append_then_promote() {
        let (_dir, config) = temp_config();
        let paths = config.paths();
        let a = address(0x41);

        let mut staged = Monitor::open_staged(&paths, CHAIN, a, false).unwrap();
        staged
            .append_records(120, &[rec(100, 1), rec(110, 0)])
            .unwrap();
        let staged_path = staged.path();
        let production_path = paths.monitor_path(CHAIN, &a, false, false);
        assert!(!production_path.exists());

        staged.move_to_production().unwrap();
        assert!(!staged_path.exists());

        let mut production = Monitor::open(&paths, CHAIN, a, false, false).unwrap();
        assert_eq!(production.count().unwrap(), 2);
        assert_eq!(production.read_all().unwrap(), vec![rec(100, 1), rec(110, 0)]);
        assert_eq!(production.read_header().unwrap().last_scanned, 120);
    }

    #[test]
    fn test_production_handle_refuses_appends() {
        let (_dir, config) = temp_config();
        let paths = config.paths();
        let mut production = Monitor::open(&paths, CHAIN, address(0x42), true, false).unwrap();
        assert!(matches!(
            production.append_records(10, &[rec(1, 0)]),
            Err(MonitorError::NotStaged { .. })
        ));
    }

    #[test]
    fn test_staged_copy_extends_production() {
        let (_dir, config) = temp_config();
        let paths = config.paths();
        let a = address(0x43);

        let mut first = Monitor::open_staged(&paths, CHAIN, a, false).unwrap();
        first.append_records(50, &[rec(10, 0)]).unwrap();
        first.move_to_production().unwrap();

        let mut second = Monitor::open_staged(&paths, CHAIN, a, false).unwrap();
        assert_eq!(second.count().unwrap(), 1);
        second.append_records(90, &[rec(60, 2)]).unwrap();

        let mut production = Monitor::open(&paths, CHAIN, a, false, false).unwrap();
        assert_eq!(production.count().unwrap(), 1);

        second.move_to_production().unwrap();
        let mut production = Monitor::open(&paths, CHAIN, a, false, false).unwrap();
        assert_eq!(production.read_all().unwrap(), vec![rec(10, 0), rec(60, 2)]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_override_list_takes_precedence() {
        let (dir, config) = temp_config();
        let paths = config.paths();
        Monitor::open(&paths, CHAIN, address(0x01), true, false).unwrap();

        fs::write(
            &config.override_file,
            format!(
                "# watched\n{},label\n0x0000000000000000000000000000000000000000\nnot-an-address\n{}\n",
                address(0x02).to_hex(),
                address(0x03).to_hex()
            ),
        )
        .unwrap();

        let directory =
            MonitorDirectory::new(paths, CHAIN).with_override_file(&config.override_file);
        let mut rx = directory.list_monitors("monitors");
        let mut seen = Vec::new();
        while let Some(item) = rx.recv().await {
            seen.push(item.unwrap().address());
        }
        assert_eq!(seen, vec![address(0x02), address(0x03)]);
    }

    #[test]
    fn test_freshen_stops_at_last_scanned() {
        let (_dir, config) = temp_config();
        let paths = config.paths();
        let store = RangeChunkStore::new(paths.clone(), CHAIN, config.chunk.clone()).unwrap();
        let a = address(0x44);
        write_chunk(&store, BlockRange::new(0, 99), &[(a, 7, 0)]);

        let scanner = MonitorScanner::new(&store);
        let mut staged = Monitor::open_staged(&paths, CHAIN, a, false).unwrap();
        let first = scanner.freshen(&mut staged).unwrap();
        assert_eq!(first.appended, 1);
        assert_eq!(first.last_scanned, 99);

        write_chunk(&store, BlockRange::new(100, 199), &[(a, 150, 4), (address(0x45), 151, 0)]);
        let second = scanner.freshen(&mut staged).unwrap();
        assert_eq!(second.chunks_scanned, 1);
        assert_eq!(second.appended, 1);
        assert_eq!(staged.read_all().unwrap(), vec![rec(7, 0), rec(150, 4)]);
    }
}
