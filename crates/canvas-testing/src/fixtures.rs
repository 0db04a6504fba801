//! Sample rendered-HTML pages and config snippets, shaped to match exactly
//! what `canvas-sources`'s parsers expect, so other crates' tests can reach
//! for a known-good page instead of hand-rolling markup. Mirrors the
//! teacher's `SampleFiles` fixture pattern in spirit, minus the
//! filesystem-copy machinery since these are small inline constants, not
//! a directory of recorded session fixtures.

/// A release-note page (§4.2): one `<h2>` section, one `<h3>` category,
/// one `<h4>` entry whose table classifies it as a Feature Option.
pub const RELEASE_NOTE_PAGE: &str = r#"
    <h2>New Features</h2>
    <h3>Assignments</h3>
    <h4 data-id="doc-proc">Document Processing App</h4>
    <table>
        <tr><th>Feature Option to Enable</th><td><p>Document Processor</p></td></tr>
        <tr><th>Affects User Interface</th><td>Yes</td></tr>
    </table>
    <p>Lets instructors annotate submitted documents inline.</p>
"#;

/// A release-note page whose entry table marks the option cell `N/A`,
/// so the entry classifies as a Setting rather than an Option.
pub const RELEASE_NOTE_PAGE_SETTING_ENTRY: &str = r#"
    <h2>Updated Features</h2>
    <h3>Grades</h3>
    <h4 data-id="grade-rounding">Grade Rounding Behavior Change</h4>
    <table><tr><th>Feature Option to Enable</th><td><p>N/A</p></td></tr></table>
"#;

/// A deploy-note page (§4.2): flat list, no `<h2>`, keyed by the deploy
/// variant of the option-cell header.
pub const DEPLOY_NOTE_PAGE: &str = r#"
    <h3>Grades</h3>
    <h4 data-id="speedgrader-beta">SpeedGrader Loads Faster</h4>
    <table><tr><th>Feature Option Name to Enable</th><td><p>Speed Grader Beta</p></td></tr></table>
    <h4 data-id="minor-fix">Minor Bug Fix</h4>
    <table><tr><th>Feature Option Name to Enable</th><td><p>N/A</p></td></tr></table>
"#;

/// A community Q&A post with one reply, in the Community's conventional
/// `discussion-topic`/`discussion-reply` markup.
pub const COMMUNITY_QUESTION_POST: &str = r#"
    <article class="discussion-topic" data-posted-at="2026-02-10T00:00:00Z">
        <h1 class="discussion-title">Document Processor not showing up</h1>
        <div class="message userContent"><p>Enabled the new option but I don't see it anywhere.</p></div>
    </article>
    <ul>
        <li class="discussion-reply" data-posted-at="2026-02-11T00:00:00Z">
            <div class="message userContent">Did you publish the course after enabling it?</div>
        </li>
    </ul>
"#;

/// A `classification_overrides.yaml` sample forcing one anchor to Setting
/// and naming a canonical option name for another (§4.2 "Classification
/// overrides"), for tests exercising override plumbing end to end.
pub const CLASSIFICATION_OVERRIDES_YAML: &str = r#"
overrides:
  - anchor_id: doc-proc
    force_setting: false
    canonical_name: "Document Processor"
  - h4_title: "Grade Rounding Behavior Change"
    force_setting: true
"#;

/// A minimal `config.toml` sufficient for `canvas-runtime::Config::load_from`
/// to parse without error, with Reddit disabled so tests never depend on
/// `CANVAS_REDDIT_CLIENT_ID` being set.
pub const CONFIG_TOML: &str = r#"
[sources.reddit]
enabled = false
min_score = 0
subreddits = []
keywords = []
"#;
