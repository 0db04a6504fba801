use canvas_testing::TestWorld;
use canvas_types::{FeatureId, LifecycleDates, ToggleStatus};
use chrono::NaiveDate;
use predicates::str::contains;

#[test]
fn regenerate_feature_dry_run_reports_no_description_without_a_cached_value() {
    let world = TestWorld::new().expect("creating test world");
    let db = world.db().expect("opening db");
    let feature_id = FeatureId::new("document-processing");
    db.upsert_feature(&feature_id, "Document Processing").expect("seeding feature");

    let output =
        world.run(&["regenerate", "feature", "document-processing", "--dry-run"]).expect("running canvas-cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(contains("no description generated").eval(&stdout));
}

#[test]
fn regenerate_unknown_feature_fails() {
    let world = TestWorld::new().expect("creating test world");
    let output = world.run(&["regenerate", "feature", "nope", "--dry-run"]).expect("running canvas-cli");
    assert!(!output.status.success());
}

#[test]
fn regenerate_features_skips_ones_with_a_description_under_missing() {
    let world = TestWorld::new().expect("creating test world");
    let db = world.db().expect("opening db");
    let feature_id = FeatureId::new("document-processing");
    db.upsert_feature(&feature_id, "Document Processing").expect("seeding feature");
    db.set_feature_description(&feature_id, "Already described.").expect("seeding description");

    let output =
        world.run(&["regenerate", "features", "--missing", "--dry-run"]).expect("running canvas-cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("document-processing"));
}

#[test]
fn regenerate_meta_summary_resolves_an_option_before_a_setting() {
    let world = TestWorld::new().expect("creating test world");
    let db = world.db().expect("opening db");
    let feature_id = FeatureId::new("document-processing");
    db.upsert_feature(&feature_id, "Document Processing").expect("seeding feature");
    let option = db
        .upsert_option(
            "Document Processor",
            &feature_id,
            ToggleStatus::Preview,
            &LifecycleDates::default(),
            NaiveDate::from_ymd_opt(2026, 2, 21).unwrap(),
        )
        .expect("seeding option");

    let output =
        world.run(&["regenerate", "meta-summary", option.option_id.as_str(), "--dry-run"]).expect("running canvas-cli");
    assert!(output.status.success());
}
