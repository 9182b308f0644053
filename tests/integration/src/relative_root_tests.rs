//! Roots given relative to the working directory
//!
//! The only test in this binary: it changes the process working directory.

use std::env;
use std::fs;

use treesync_core::{AutoConfirm, RunConfig, SyncEngine};
use treesync_test_utils::TestTree;

#[test]
fn parent_relative_roots_keep_metadata_inside_the_roots() {
    let base = TestTree::new();
    base.file("src/a.txt", "a", 100).mkdir("work");
    env::set_current_dir(base.path("work")).unwrap();

    let mut config = RunConfig::new("../src", "../dst");
    config.run_timestamp = "t1".to_string();
    let engine = SyncEngine::new(config.clone()).unwrap();
    let report = engine.run(&mut AutoConfirm).unwrap();

    assert!(report.errors.is_empty(), "{:?}", report.errors);
    assert!(report.log_path.unwrap().is_absolute());
    base.assert_file_exists("src/.treesync/log-t1.csv");
    base.assert_file_exists("dst/.treesync/dirinfo.json");
    assert_eq!(base.read("dst/a.txt"), "a");
    assert_eq!(fs::read_dir(base.path("work")).unwrap().count(), 0);

    // The second run finds the persisted snapshot and has nothing to do
    let plan = SyncEngine::new(config).unwrap().plan().unwrap();
    assert!(plan.is_empty());
    assert!(plan.warnings().is_empty());
}
