//! Scenario tests
//!
//! Each module drives a full plan/execute cycle against real temporary
//! trees and checks the resulting state of both roots.

use pretty_assertions::assert_eq;
use treesync_core::{
    AutoConfirm, ConflictPolicy, CrcMode, MovedPair, RunConfig, SyncEngine, SyncMode, SyncReport,
};
use treesync_test_utils::TestTree;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn config(source: &TestTree, dest: &TestTree, timestamp: &str) -> RunConfig {
    let mut config = RunConfig::new(source.root(), dest.root());
    config.run_timestamp = timestamp.to_string();
    config
}

fn run(config: RunConfig) -> SyncReport {
    let report = SyncEngine::new(config).unwrap().run(&mut AutoConfirm).unwrap();
    assert!(report.errors.is_empty(), "unexpected errors: {:?}", report.errors);
    report
}

// =============================================================================
// Move detection
// =============================================================================

mod moves {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn identical_content_under_new_name_is_a_move() {
        let source = TestTree::new();
        source.file("a.txt", "aaaaa", 100).file("b.txt", "bbbbb", 100);
        let dest = TestTree::new();
        dest.file("a.txt", "aaaaa", 100).file("c.txt", "bbbbb", 100);
        let mut config = config(&source, &dest, "t1");
        config.detect_moves = true;
        config.crc_mode = CrcMode::All;

        let plan = SyncEngine::new(config).unwrap().plan().unwrap();

        assert_eq!(
            plan.diff().moved,
            vec![MovedPair {
                source: "b.txt".to_string(),
                dest: "c.txt".to_string()
            }]
        );
        assert!(plan.diff().source_only.is_empty());
        assert!(plan.diff().dest_only.is_empty());
        assert!(plan.diff().changed.is_empty());
    }

    #[test]
    fn applied_move_needs_no_copy() {
        let source = TestTree::new();
        source.file("photos/2024/img.jpg", "pixels", 100);
        let dest = TestTree::new();
        dest.file("inbox/img.jpg", "pixels", 100);
        let mut config = config(&source, &dest, "t1");
        config.detect_moves = true;

        let report = run(config);

        assert!(report.actions.iter().all(|a| !a.starts_with("copy")));
        assert_eq!(dest.files(), vec!["photos/2024/img.jpg"]);
        assert_eq!(dest.read(".treesync/t1/inbox/img.jpg"), "pixels");
    }

    #[test]
    fn equal_candidates_pair_in_path_order() {
        let source = TestTree::new();
        source.file("x.txt", "same", 100);
        let dest = TestTree::new();
        dest.file("b.txt", "same", 100).file("a.txt", "same", 100);
        let mut config = config(&source, &dest, "t1");
        config.detect_moves = true;

        let plan = SyncEngine::new(config).unwrap().plan().unwrap();

        assert_eq!(plan.diff().moved[0].dest, "a.txt");
        assert_eq!(plan.diff().dest_only, vec!["b.txt"]);
    }
}

// =============================================================================
// Time tolerance
// =============================================================================

mod time_tolerance {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_hour_shift_is_not_a_change() {
        let source = TestTree::new();
        source.file("a.txt", "hello", 100);
        let dest = TestTree::new();
        dest.file("a.txt", "hello", 3700);

        let plan = SyncEngine::new(config(&source, &dest, "t1")).unwrap().plan().unwrap();

        assert!(plan.is_empty());
    }

    #[test]
    fn one_hour_and_one_second_is_a_change() {
        let source = TestTree::new();
        source.file("a.txt", "hello", 100);
        let dest = TestTree::new();
        dest.file("a.txt", "hello", 3701);

        let plan = SyncEngine::new(config(&source, &dest, "t1")).unwrap().plan().unwrap();

        assert_eq!(plan.diff().changed, vec!["a.txt"]);
    }
}

// =============================================================================
// Conflict resolution
// =============================================================================

mod conflicts {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn newer_source_archives_dest_then_copies() {
        let source = TestTree::new();
        source.file("a.txt", "source version", 2_000);
        let dest = TestTree::new();
        dest.file("a.txt", "dest version", 1_000);
        let mut config = config(&source, &dest, "t1");
        config.mode = SyncMode::Mirror;
        config.conflict = ConflictPolicy::Newer;

        let report = run(config);

        assert_eq!(dest.read("a.txt"), "source version");
        assert_eq!(dest.read(".treesync/t1/a.txt"), "dest version");
        let archive_at = report.actions.iter().position(|a| a.starts_with("archive"));
        let copy_at = report.actions.iter().position(|a| a.starts_with("copy"));
        assert!(archive_at < copy_at, "{:?}", report.actions);
    }

    #[test]
    fn equal_times_let_dest_win_under_newer() {
        let source = TestTree::new();
        source.file("a.txt", "short", 1_000);
        let dest = TestTree::new();
        dest.file("a.txt", "longer", 1_000);
        let mut config = config(&source, &dest, "t1");
        config.conflict = ConflictPolicy::Newer;

        run(config);

        assert_eq!(source.read("a.txt"), "longer");
        assert_eq!(dest.read("a.txt"), "longer");
    }

    #[test]
    fn dest_policy_overwrites_source_in_backup_mode() {
        let source = TestTree::new();
        source.file("a.txt", "mine", 5_000);
        let dest = TestTree::new();
        dest.file("a.txt", "theirs", 1_000);
        let mut config = config(&source, &dest, "t1");
        config.mode = SyncMode::Backup;
        config.conflict = ConflictPolicy::Dest;

        run(config);

        assert_eq!(source.read("a.txt"), "theirs");
        assert_eq!(source.read(".treesync/t1/a.txt"), "mine");
    }
}

// =============================================================================
// Convergence and archive integrity
// =============================================================================

mod convergence {
    use super::*;
    use pretty_assertions::assert_eq;

    fn messy_pair() -> (TestTree, TestTree) {
        let source = TestTree::new();
        source
            .file("a.txt", "A", 100)
            .file("b/c.txt", "C", 100)
            .file("b/d/e.txt", "E", 200)
            .file("moved.txt", "M", 100)
            .mkdir("empty/dir");
        let dest = TestTree::new();
        dest.file("a.txt", "old A", 50)
            .file("b/c.txt", "C", 100)
            .file("x/old_name.txt", "M", 100)
            .file("y/z/gone.txt", "Z", 100)
            .mkdir("stale_empty");
        (source, dest)
    }

    #[test]
    fn mirror_twice_yields_empty_diff() {
        let (source, dest) = messy_pair();
        let mut first = config(&source, &dest, "t1");
        first.detect_moves = true;
        run(first);

        let mut second = config(&source, &dest, "t2");
        second.detect_moves = true;
        let plan = SyncEngine::new(second).unwrap().plan().unwrap();

        assert!(plan.is_empty(), "{:?}", plan.diff());
        assert_eq!(dest.files(), source.files());
        assert!(dest.path("empty/dir").is_dir());
        dest.assert_file_not_exists("stale_empty");
    }

    #[test]
    fn every_lost_file_has_an_identical_archive_copy() {
        let (source, dest) = messy_pair();
        let before: Vec<(String, String)> = dest
            .files()
            .into_iter()
            .map(|path| {
                let content = dest.read(&path);
                (path, content)
            })
            .collect();
        let mut config = config(&source, &dest, "t1");
        config.detect_moves = true;

        run(config);

        for (path, content) in before {
            let survived = dest.exists(&path) && dest.read(&path) == content;
            if !survived {
                assert_eq!(
                    dest.read(&format!(".treesync/t1/{}", path)),
                    content,
                    "{} was lost without an archive copy",
                    path
                );
            }
        }
    }

    #[test]
    fn sync_mode_unions_both_trees() {
        let source = TestTree::new();
        source.file("only_source.txt", "s", 100).file("shared.txt", "same", 100);
        let dest = TestTree::new();
        dest.file("only_dest/file.txt", "d", 100).file("shared.txt", "same", 100);
        let mut first = config(&source, &dest, "t1");
        first.mode = SyncMode::Sync;
        run(first);

        assert_eq!(source.files(), dest.files());
        let mut second = config(&source, &dest, "t2");
        second.mode = SyncMode::Sync;
        assert!(SyncEngine::new(second).unwrap().plan().unwrap().is_empty());
    }
}
