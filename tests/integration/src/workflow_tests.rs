//! Multi-run workflow tests
//!
//! These exercise what carries over between runs: persisted snapshots,
//! run logs and saved configurations.

use pretty_assertions::assert_eq;
use treesync_core::{AutoConfirm, CrcMode, RunConfig, SyncEngine, SyncReport};
use treesync_fs::{ConfigStore, NormalizedPath};
use treesync_test_utils::TestTree;

fn config(source: &TestTree, dest: &TestTree, timestamp: &str) -> RunConfig {
    let mut config = RunConfig::new(source.root(), dest.root());
    config.run_timestamp = timestamp.to_string();
    config
}

fn run(config: RunConfig) -> SyncReport {
    SyncEngine::new(config).unwrap().run(&mut AutoConfirm).unwrap()
}

fn log_lines(source: &TestTree, timestamp: &str) -> Vec<String> {
    source
        .read(&format!(".treesync/log-{}.csv", timestamp))
        .lines()
        .map(str::to_string)
        .collect()
}

mod incremental {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Rewrite `rel` with same-length content and its old modification time.
    fn tamper(tree: &TestTree, rel: &str, content: &str) {
        let mtime = tree.mtime(rel);
        tree.file(rel, content, mtime);
    }

    #[test]
    fn persisted_checksums_are_trusted_for_unchanged_stats() {
        let source = TestTree::new();
        source.file("a.txt", "hello", 100);
        let dest = TestTree::new();
        let mut first = config(&source, &dest, "t1");
        first.crc_mode = CrcMode::All;
        run(first);

        tamper(&dest, "a.txt", "jello");
        let mut second = config(&source, &dest, "t2");
        second.crc_mode = CrcMode::All;
        let plan = SyncEngine::new(second).unwrap().plan().unwrap();

        assert!(plan.is_empty());
    }

    #[test]
    fn full_rescan_sees_same_stat_edits() {
        let source = TestTree::new();
        source.file("a.txt", "hello", 100);
        let dest = TestTree::new();
        let mut first = config(&source, &dest, "t1");
        first.crc_mode = CrcMode::All;
        run(first);

        tamper(&dest, "a.txt", "jello");
        let mut second = config(&source, &dest, "t2");
        second.crc_mode = CrcMode::All;
        second.incremental = false;
        let plan = SyncEngine::new(second).unwrap().plan().unwrap();

        assert_eq!(plan.diff().changed, vec!["a.txt"]);
    }
}

mod run_log {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn log_starts_with_config_and_ends_with_status() {
        let source = TestTree::new();
        source.file("a.txt", "a", 100);
        let dest = TestTree::new();

        run(config(&source, &dest, "t1"));

        let lines = log_lines(&source, "t1");
        assert!(lines[0].starts_with("CONFIG,source,"), "{:?}", lines);
        assert!(lines.iter().any(|l| l == "SOURCE ONLY,a.txt"));
        assert!(lines.iter().any(|l| l == "START,mirror"));
        assert_eq!(lines.last().map(String::as_str), Some("COMPLETED"));
    }

    #[test]
    fn outside_change_is_logged_and_run_still_completes() {
        let source = TestTree::new();
        source.file("a.txt", "a", 100);
        let dest = TestTree::new();
        run(config(&source, &dest, "t1"));

        dest.file("surprise.txt", "!", 100);
        let report = run(config(&source, &dest, "t2"));

        assert!(report.errors.is_empty(), "{:?}", report.errors);
        let lines = log_lines(&source, "t2");
        assert!(lines.iter().any(|l| l.starts_with("WARNING,")));
        assert!(lines.iter().any(|l| l == "CHANGED SINCE LAST SCAN,added,surprise.txt"));
        dest.assert_file_not_exists("surprise.txt");
        assert_eq!(dest.read(".treesync/t2/surprise.txt"), "!");
    }

    #[test]
    fn dry_run_predicts_the_real_run() {
        let source = TestTree::new();
        source.file("a.txt", "new", 300).file("n/new.txt", "n", 100);
        let dest = TestTree::new();
        dest.file("a.txt", "old", 100).file("gone.txt", "g", 100);

        let mut dry = config(&source, &dest, "t1");
        dry.dry_run = true;
        let predicted = run(dry);
        let actual = run(config(&source, &dest, "t1"));

        let predicted: Vec<String> = predicted
            .actions
            .iter()
            .map(|a| a.trim_start_matches("[dry-run] ").to_string())
            .collect();
        assert_eq!(predicted, actual.actions);
    }
}

mod persistence {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn saved_config_round_trips_without_timestamp() {
        let source = TestTree::new();
        let dest = TestTree::new();
        let mut original = config(&source, &dest, "not-saved");
        original.detect_moves = true;
        original.filters = vec!["docs/".to_string()];
        let path = NormalizedPath::new(source.path(".treesync/config.json"));

        ConfigStore::new().save(&path, &original).unwrap();
        let loaded: RunConfig = ConfigStore::new().load(&path).unwrap();

        assert_ne!(loaded.run_timestamp, "not-saved");
        assert_eq!(
            RunConfig {
                run_timestamp: original.run_timestamp.clone(),
                ..loaded
            },
            original
        );
    }

    #[test]
    fn suppressed_run_leaves_no_metadata() {
        let source = TestTree::new();
        source.file("a.txt", "a", 100);
        let dest = TestTree::new();
        dest.file("b.txt", "b", 100);
        let mut config = config(&source, &dest, "t1");
        config.suppress_logging = true;

        run(config);

        source.assert_file_not_exists(".treesync");
        dest.assert_file_not_exists(".treesync/dirinfo.json");
        assert_eq!(dest.read(".treesync/t1/b.txt"), "b");
    }

    #[test]
    fn snapshot_file_is_keyed_by_relative_path() {
        let source = TestTree::new();
        source.file("dir/a.txt", "a", 100).mkdir("empty");
        let dest = TestTree::new();

        run(config(&source, &dest, "t1"));

        let json: serde_json::Value =
            serde_json::from_str(&dest.read(".treesync/dirinfo.json")).unwrap();
        assert_eq!(json["dir/a.txt"]["size"], 1);
        assert_eq!(json["dir/a.txt"]["mtime"], 100.0);
        assert_eq!(json["empty"]["dir"], true);
    }
}

mod filtering {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn paths_outside_the_filter_are_left_alone() {
        let source = TestTree::new();
        source.file("docs/a.md", "a", 100);
        let dest = TestTree::new();
        dest.file("docs/old.md", "o", 100).file("other/keep.bin", "k", 100);
        let mut config = config(&source, &dest, "t1");
        config.filters = vec!["docs/".to_string()];

        run(config);

        assert_eq!(dest.files(), vec!["docs/a.md", "other/keep.bin"]);
    }
}
