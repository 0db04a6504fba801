use canvas_testing::TestWorld;
use canvas_types::{ContentFeatureRef, ContentItem, ContentType, MentionType};
use predicates::str::contains;

fn seed_general_ref(world: &TestWorld, content_id: &str) {
    let db = world.db().expect("opening db");

    let general = canvas_types::FeatureId::new(canvas_engine::GENERAL_FEATURE_ID);
    db.upsert_feature(&general, "General").expect("seeding general feature");

    let item = ContentItem {
        source_id: canvas_types::ContentId::new(content_id),
        url: Some("https://community.canvaslms.com/t5/x/123".to_string()),
        title: Some("Document Processor not showing up".to_string()),
        content_type: ContentType::Question,
        summary: Some("Enabled the new option but can't find it.".to_string()),
        engagement_score: None,
        comment_count: Some(1),
        first_posted: None,
        last_edited: None,
        last_comment_at: None,
        last_checked_at: None,
        scraped_date: None,
    };
    db.upsert_content_item(&item).expect("seeding content item");

    let feature_ref = ContentFeatureRef {
        content_id: item.source_id.clone(),
        feature_id: Some(general),
        option_id: None,
        setting_id: None,
        mention_type: MentionType::Questions,
        superseded: false,
    };
    db.upsert_content_feature_ref(&feature_ref).expect("seeding feature ref");
}

#[test]
fn triage_on_empty_store_reports_no_violations() {
    let world = TestWorld::new().expect("creating test world");
    let output = world.run(&["general", "triage"]).expect("running canvas-cli");
    assert!(output.status.success());
    assert!(contains("no invariant violations found").eval(&String::from_utf8_lossy(&output.stdout)));
}

#[test]
fn list_on_empty_store_reports_nothing_parked() {
    let world = TestWorld::new().expect("creating test world");
    let output = world.run(&["general", "list"]).expect("running canvas-cli");
    assert!(output.status.success());
    assert!(contains("no low-confidence links").eval(&String::from_utf8_lossy(&output.stdout)));
}

#[test]
fn list_shows_refs_parked_under_the_general_feature() {
    let world = TestWorld::new().expect("creating test world");
    seed_general_ref(&world, "community-123");

    let output = world.run(&["general", "list"]).expect("running canvas-cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(contains("community-123").eval(&stdout));
}

#[test]
fn show_prints_the_seeded_content_item() {
    let world = TestWorld::new().expect("creating test world");
    seed_general_ref(&world, "community-456");

    let output = world.run(&["general", "show", "community-456"]).expect("running canvas-cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(contains("Document Processor not showing up").eval(&stdout));
}

#[test]
fn assign_moves_a_ref_off_the_general_feature() {
    let world = TestWorld::new().expect("creating test world");
    seed_general_ref(&world, "community-789");

    let assign_output = world
        .run(&["general", "assign", "community-789", "document-processing"])
        .expect("running canvas-cli");
    assert!(assign_output.status.success());
    assert!(contains("reassigned").eval(&String::from_utf8_lossy(&assign_output.stdout)));

    let list_output = world.run(&["general", "list"]).expect("running canvas-cli");
    let stdout = String::from_utf8_lossy(&list_output.stdout);
    assert!(!stdout.contains("community-789"));
}

#[test]
fn assign_without_an_existing_general_ref_fails() {
    let world = TestWorld::new().expect("creating test world");
    let output = world
        .run(&["general", "assign", "no-such-content", "document-processing"])
        .expect("running canvas-cli");
    assert!(!output.status.success());
}
