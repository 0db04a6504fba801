//! End-to-end classifier scenarios against a real in-memory store,
//! matching spec.md §8's S1/S2/S3 worked examples.

use canvas_engine::Classifier;
use canvas_index::Database;
use canvas_sources::deploy_notes::parse_deploy_note_page;
use canvas_sources::release_notes::parse_release_note_page;
use canvas_types::{ChangeVerdict, ContentId, ContentItem, ContentType, ToggleRef};
use chrono::NaiveDate;

const DOC_PROCESSOR_PAGE: &str = r#"
    <h2>New Features</h2>
    <h3>Assignments</h3>
    <h4 data-id="doc-proc">Document Processing App</h4>
    <table>
        <tr><th>Feature Option to Enable</th><td><p>Document Processor</p></td></tr>
    </table>
    <p>A new way to process documents in SpeedGrader.</p>
"#;

const DOC_PROCESSOR_PAGE_BETA: &str = r#"
    <h2>New Features</h2>
    <h3>Assignments</h3>
    <h4 data-id="doc-proc">Document Processing App</h4>
    <table>
        <tr><th>Feature Option to Enable</th><td><p>Document Processor</p></td></tr>
    </table>
    <p>Now available in beta for all accounts.</p>
"#;

fn seed_content(db: &Database, source_id: &str, scraped_date: NaiveDate) -> ContentId {
    let content_id = ContentId::new(source_id.to_string());
    db.upsert_content_item(&ContentItem {
        source_id: content_id.clone(),
        url: Some(format!("https://community.canvaslms.com/{source_id}")),
        title: Some("Canvas Release Notes".to_string()),
        content_type: ContentType::ReleaseNote,
        summary: None,
        engagement_score: None,
        comment_count: None,
        first_posted: None,
        last_edited: None,
        last_comment_at: None,
        last_checked_at: None,
        scraped_date: Some(scraped_date),
    })
    .unwrap();
    content_id
}

#[test]
fn s1_first_run_release_note_only() {
    let db = Database::open_in_memory().unwrap();
    let content_id = seed_content(&db, "release_note_664643", NaiveDate::from_ymd_opt(2026, 2, 21).unwrap());
    let page = parse_release_note_page(
        DOC_PROCESSOR_PAGE,
        NaiveDate::from_ymd_opt(2026, 2, 21).unwrap(),
        &[],
    )
    .unwrap();

    let classifier = Classifier::new(db.handle());
    let classified = classifier.classify_release_note_page(&content_id, &page, |_| {}).unwrap();

    assert_eq!(classified.len(), 1);
    let entry = &classified[0];
    assert_eq!(entry.feature_id.as_str(), "assignments");
    assert_eq!(entry.verdict, ChangeVerdict::New);
    assert!(entry.announcement_written);

    let ToggleRef::Option(option_id) = &entry.toggle_ref else { panic!("expected option") };
    assert_eq!(option_id.as_str(), "document_processor");
    let option = db.get_option(option_id).unwrap().unwrap();
    assert_eq!(option.canonical_name, "Document Processor");
    assert_eq!(option.status, canvas_types::ToggleStatus::Pending);
}

#[test]
fn s2_second_run_same_toggle_is_an_update_with_refined_lifecycle() {
    let db = Database::open_in_memory().unwrap();
    let classifier = Classifier::new(db.handle());

    let first_content = seed_content(&db, "release_note_664643", NaiveDate::from_ymd_opt(2026, 2, 21).unwrap());
    let first_page = parse_release_note_page(
        DOC_PROCESSOR_PAGE,
        NaiveDate::from_ymd_opt(2026, 2, 21).unwrap(),
        &[],
    )
    .unwrap();
    classifier.classify_release_note_page(&first_content, &first_page, |_| {}).unwrap();

    let second_content = seed_content(&db, "release_note_664700", NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
    let second_page = parse_release_note_page(
        DOC_PROCESSOR_PAGE_BETA,
        NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
        &[],
    )
    .unwrap();
    let classified = classifier.classify_release_note_page(&second_content, &second_page, |_| {}).unwrap();

    assert_eq!(classified.len(), 1);
    let entry = &classified[0];
    assert_eq!(entry.verdict, ChangeVerdict::Update, "second announcement for the same toggle must be an UPDATE");

    let ToggleRef::Option(option_id) = &entry.toggle_ref else { panic!("expected option") };
    let option = db.get_option(option_id).unwrap().unwrap();
    assert_eq!(option.first_seen, NaiveDate::from_ymd_opt(2026, 2, 21).unwrap());
    assert_eq!(option.last_seen, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
    assert_eq!(option.lifecycle.beta_date, Some(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()));
}

#[test]
fn s3_na_option_cell_is_classified_as_a_setting() {
    let db = Database::open_in_memory().unwrap();
    let content_id = seed_content(&db, "deploy_note_1", NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());

    let html = r#"
        <h3>Grades</h3>
        <h4>Submission Comment Ordering Fix</h4>
        <table>
            <tr><th>Feature Option Name to Enable</th><td><p>N/A</p></td></tr>
        </table>
        <p>Comments now sort oldest-first consistently.</p>
    "#;
    let page = parse_deploy_note_page(html, NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(), &[]).unwrap();

    let classifier = Classifier::new(db.handle());
    let classified = classifier.classify_deploy_note_page(&content_id, &page, |_| {}).unwrap();

    assert_eq!(classified.len(), 1);
    let ToggleRef::Setting(setting_id) = &classified[0].toggle_ref else {
        panic!("N/A option cell must classify as a setting, not an option")
    };
    let setting = db.get_setting(setting_id).unwrap().unwrap();
    assert_eq!(setting.title, "Submission Comment Ordering Fix");
}

#[test]
fn repeated_announcement_for_same_anchor_dedups_and_keeps_original_verdict() {
    let db = Database::open_in_memory().unwrap();
    let classifier = Classifier::new(db.handle());
    let content_id = seed_content(&db, "release_note_664643", NaiveDate::from_ymd_opt(2026, 2, 21).unwrap());
    let page = parse_release_note_page(
        DOC_PROCESSOR_PAGE,
        NaiveDate::from_ymd_opt(2026, 2, 21).unwrap(),
        &[],
    )
    .unwrap();

    let first_pass = classifier.classify_release_note_page(&content_id, &page, |_| {}).unwrap();
    assert!(first_pass[0].announcement_written);

    let second_pass = classifier.classify_release_note_page(&content_id, &page, |_| {}).unwrap();
    assert!(!second_pass[0].announcement_written, "same (content_id, anchor_id) must dedup");
    assert_eq!(second_pass[0].verdict, ChangeVerdict::New, "a deduped replay must not inflate the count");
}
