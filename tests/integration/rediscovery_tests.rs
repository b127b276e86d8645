//! Integration tests for the rediscovery engine
//!
//! These tests use wiremock to stand in for organization websites and run
//! whole records through the engine end-to-end.

use job_relink::config::Config;
use job_relink::crawler::Fetcher;
use job_relink::rediscovery::{validate, Rediscoverer, Rules};
use job_relink::state::{Action, PageType, ValidationReason};
use job_relink::storage::{load_dataset, save_dataset, Dataset, Entry, Record};
use job_relink::url::same_site;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Default configuration without the politeness delay
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.http.politeness_delay_ms = 0;
    config.http.timeout_secs = 5;
    config.http.connect_timeout_secs = 2;
    config
}

fn create_engine() -> Rediscoverer {
    Rediscoverer::new(create_test_config()).expect("Failed to create engine")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!(
            "<html><head><title>Town Hall</title></head><body>{}</body></html>",
            body
        ),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

fn broken_record(name: &str, home: &str, hint: Option<&str>, status: i64) -> Record {
    Record {
        employment_url: Some(format!("{}old-jobs-page", home)),
        platform_hint: hint.map(str::to_string),
        status_code: Some(status),
        soft404: Some(false),
        ..Record::new(name, home)
    }
}

/// CivicPlus site whose homepage footer links a numeric-id employment page
/// that in turn links an application PDF
async fn mount_civicplus_site(server: &MockServer) {
    mount_page(
        server,
        "/",
        html(
            r#"<nav><a href="/about">About Essex</a><a href="/parks">Parks</a></nav>
            <main><h1>Welcome to Essex</h1></main>
            <footer><a href="/215/Employment-Opportunities">Employment Opportunities</a></footer>"#,
        ),
    )
    .await;

    mount_page(
        server,
        "/215/Employment-Opportunities",
        html(
            r#"<h1>Employment Opportunities</h1>
            <p>Current openings are listed below.</p>
            <a href="/DocumentCenter/View/9/Budget.pdf">Budget</a>
            <a href="/DocumentCenter/View/12/Employment-Application.pdf">Employment Application</a>"#,
        ),
    )
    .await;

    mount_page(
        server,
        "/DocumentCenter/View/12/Employment-Application.pdf",
        ResponseTemplate::new(200).set_body_raw("%PDF-1.4 application", "application/pdf"),
    )
    .await;
}

#[tokio::test]
async fn test_footer_link_replaces_broken_civicplus_link() {
    let server = MockServer::start().await;
    mount_civicplus_site(&server).await;
    let home = format!("{}/", server.uri());

    let mut record = Record {
        application_url: Some(format!("{}old-application.pdf", home)),
        ..broken_record("Essex", &home, Some("CivicPlus"), 404)
    };
    let engine = create_engine();
    let result = engine.rediscover(&mut record).await;

    let expected = format!("{}/215/Employment-Opportunities", server.uri());
    assert_eq!(result.action, Action::Updated);
    assert_eq!(result.new_url.as_deref(), Some(expected.as_str()));
    assert_eq!(result.page_type, Some(PageType::ModulePage));
    assert!(result.confidence.unwrap() >= 85);
    assert_eq!(result.old_url, Some(format!("{}old-jobs-page", home)));

    // Record carries the new link and its provenance
    assert_eq!(record.employment_url.as_deref(), Some(expected.as_str()));
    assert_eq!(record.employment_url_final.as_deref(), Some(expected.as_str()));
    assert_eq!(record.employment_page_type.as_deref(), Some("module_page"));
    assert_eq!(record.employment_url_confidence, result.confidence);
    assert_eq!(record.platform_detected.as_deref(), Some("civicplus"));
    assert_eq!(record.employment_url_validation_reason.as_deref(), Some("ok"));
    assert!(record
        .employment_url_change_reason
        .as_deref()
        .unwrap()
        .starts_with("rediscovered_from_"));
    assert!(record.employment_url_last_checked_at.is_some());
    assert_eq!(record.status_code, Some(200));
    assert_eq!(record.soft404, Some(false));

    // Application PDF found on the new page; the old link is preserved
    let pdf = format!(
        "{}/DocumentCenter/View/12/Employment-Application.pdf",
        server.uri()
    );
    assert_eq!(record.application_url.as_deref(), Some(pdf.as_str()));
    assert_eq!(
        record.application_url_original.as_deref(),
        Some(format!("{}old-application.pdf", home).as_str())
    );
    assert_eq!(record.application_url_confidence, Some(85));
    assert_eq!(
        result.application_note.as_deref(),
        Some("application_pdf_found_on_employment_page")
    );
}

#[tokio::test]
async fn test_second_run_settles_to_no_change() {
    let server = MockServer::start().await;
    mount_civicplus_site(&server).await;
    let home = format!("{}/", server.uri());

    let mut record = broken_record("Essex", &home, Some("CivicPlus"), 404);
    let engine = create_engine();

    let first = engine.rediscover(&mut record).await;
    assert_eq!(first.action, Action::Updated);
    let after_first = record.clone();

    let second = engine.rediscover(&mut record).await;
    assert_eq!(second.action, Action::NoChange);
    assert_eq!(second.reason, "employment_not_marked_broken");
    assert_eq!(record.employment_url, after_first.employment_url);
    assert_eq!(record.application_url, after_first.application_url);
}

#[tokio::test]
async fn test_bot_block_status_is_never_touched() {
    let server = MockServer::start().await;
    mount_civicplus_site(&server).await;
    let home = format!("{}/", server.uri());

    let mut record = broken_record("Old Lyme", &home, Some("CivicPlus"), 403);
    let before = record.employment_url.clone();
    let engine = create_engine();
    let result = engine.rediscover(&mut record).await;

    assert_eq!(result.action, Action::NoChange);
    assert_eq!(result.reason, "status_403_bot_block_likely");
    assert_eq!(record.employment_url, before);
    assert_eq!(engine.fetch_count(), 0);

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_ephemeral_platform_falls_back_to_homepage() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        html(r#"<h1>Welcome to Lyme</h1><a href="/parks">Parks</a><a href="/library">Library</a>"#),
    )
    .await;
    let home = format!("{}/", server.uri());

    let mut record = broken_record("Lyme", &home, Some("CivicLift"), 404);
    let engine = create_engine();
    let result = engine.rediscover(&mut record).await;

    assert_eq!(result.action, Action::Updated);
    assert_eq!(result.new_url.as_deref(), Some(home.as_str()));
    assert_eq!(result.page_type, Some(PageType::EphemeralPosts));
    assert_eq!(result.confidence, Some(60));
    assert_eq!(record.employment_url.as_deref(), Some(home.as_str()));
    assert_eq!(record.employment_page_type.as_deref(), Some("ephemeral_posts"));

    // The fallback does not pretend the link was validated
    assert_eq!(record.status_code, Some(404));

    // Running again yields the same link, not a different one
    let again = engine.rediscover(&mut record).await;
    assert_eq!(again.action, Action::Updated);
    assert_eq!(again.new_url, result.new_url);
}

#[tokio::test]
async fn test_soft404_candidate_is_rejected() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/jobs",
        html("<h2>Oops</h2><p>Sorry, the page you requested could not be found.</p>"),
    )
    .await;
    let home = format!("{}/", server.uri());

    let config = create_test_config();
    let rules = Rules::compile(&config).unwrap();
    let fetcher = Fetcher::new(&config.http).unwrap();
    let outcome = validate(&fetcher, &rules, &format!("{}/jobs", server.uri()), &home).await;

    assert!(!outcome.accepted);
    assert_eq!(outcome.reason, ValidationReason::Soft404);
}

#[tokio::test]
async fn test_soft404_candidate_is_never_selected() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html(r#"<a href="/jobs">Jobs</a>"#)).await;
    mount_page(
        &server,
        "/jobs",
        html("<p>Sorry, the page you requested could not be found.</p>"),
    )
    .await;
    let home = format!("{}/", server.uri());

    let mut record = broken_record("Chester", &home, None, 404);
    let before = record.employment_url.clone();
    let result = create_engine().rediscover(&mut record).await;

    assert_eq!(result.action, Action::NeedsReview);
    assert_eq!(result.reason, "no_candidate_validated");
    assert_eq!(result.new_url, None);
    assert_eq!(result.page_type, None);
    assert_eq!(record.employment_url, before);
    assert_eq!(record.employment_page_type, None);
}

#[tokio::test]
async fn test_splash_redirect_to_vendor_is_unwrapped() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html(r#"<a href="/careers">Careers</a>"#)).await;
    mount_page(
        &server,
        "/careers",
        ResponseTemplate::new(302).insert_header(
            "Location",
            "/landing?splash=https%3A%2F%2Fwww.governmentjobs.com%2Fcareers%2Fessexct",
        ),
    )
    .await;
    mount_page(&server, "/landing", html("<p>You are leaving our site.</p>")).await;
    let home = format!("{}/", server.uri());

    let mut record = broken_record("Essex", &home, None, 404);
    let result = create_engine().rediscover(&mut record).await;

    assert_eq!(result.action, Action::Updated);
    assert_eq!(
        result.new_url.as_deref(),
        Some("https://www.governmentjobs.com/careers/essexct")
    );
    assert_eq!(result.page_type, Some(PageType::AtsVendor));
    assert_eq!(result.confidence, Some(85));
    assert_eq!(
        record.employment_url_validation_reason.as_deref(),
        Some("ok_unwrapped_redirect")
    );
    // Off-site destinations skip the application search
    assert_eq!(result.application_note, None);
}

#[tokio::test]
async fn test_blocked_candidates_surface_in_needs_review() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html(r#"<a href="/employment">Employment</a>"#)).await;
    mount_page(
        &server,
        "/employment",
        html("<h1>Checking your browser before accessing this site</h1>"),
    )
    .await;
    let home = format!("{}/", server.uri());

    let mut record = broken_record("Haddam", &home, None, 410);
    let result = create_engine().rediscover(&mut record).await;

    assert_eq!(result.action, Action::NeedsReview);
    assert_eq!(result.blocked_reason.as_deref(), Some("checking your browser"));
    assert_eq!(
        record.employment_url_last_blocked_reason.as_deref(),
        Some("checking your browser")
    );
}

#[tokio::test]
async fn test_offsite_links_are_not_accepted() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        html(
            r#"<a href="https://www.facebook.com/essexjobs">Jobs on Facebook</a>
            <a href="/jobs">Jobs</a>"#,
        ),
    )
    .await;
    mount_page(&server, "/jobs", html("<h1>Job Openings</h1>")).await;
    let home = format!("{}/", server.uri());

    let mut record = broken_record("Essex", &home, None, 404);
    let engine = create_engine();
    let result = engine.rediscover(&mut record).await;

    assert_eq!(result.action, Action::Updated);
    let new_url = result.new_url.unwrap();
    assert!(same_site(&new_url, &home));
    assert!(!new_url.contains("facebook"));
}

#[tokio::test]
async fn test_dataset_run_reports_every_entry() {
    let server = MockServer::start().await;
    let home = format!("{}/", server.uri());

    let json = format!(
        r#"[
            {{"Town": "Essex", "Town Website": "{home}", "Employment Page URL": "{home}jobs",
              "employment_url_status_code": 403, "County": "Middlesex"}},
            42,
            {{"Town": "Nowhere", "employment_url_status_code": 404}},
            {{"Town": "Deep River", "Town Website": "{home}", "employment_url_status_code": 200}}
        ]"#,
        home = home
    );
    let mut dataset = Dataset::from_json_str(&json).unwrap();

    let engine = create_engine();
    let (results, stats) = engine.run_dataset(&mut dataset, None).await;

    let actions: Vec<(Action, &str)> = results
        .iter()
        .map(|r| (r.action, r.reason.as_str()))
        .collect();
    assert_eq!(
        actions,
        vec![
            (Action::NoChange, "status_403_bot_block_likely"),
            (Action::Skipped, "malformed_record"),
            (Action::Skipped, "missing_homepage"),
            (Action::NoChange, "employment_not_marked_broken"),
        ]
    );
    assert_eq!(stats.processed, 4);
    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.no_change, 2);
    assert_eq!(stats.fetches, 0);

    // Nothing disappears from the output
    let out: serde_json::Value = serde_json::from_str(&dataset.to_json_string().unwrap()).unwrap();
    assert_eq!(out.as_array().unwrap().len(), 4);
    assert_eq!(out[0]["Employment Page URL"], format!("{}jobs", home));
    assert_eq!(out[0]["County"], "Middlesex");
    assert_eq!(out[1], 42);
}

#[tokio::test]
async fn test_untouched_records_are_written_back_verbatim() {
    let input = serde_json::to_string_pretty(&serde_json::json!([
        {
            "Town": "Essex",
            "County": "Middlesex",
            "Town Website": "https://www.essexct.gov/",
            "Employment Page URL": "https://www.essexct.gov/jobs",
            "Application Form URL": null,
            "ATS or Platform (if known)": null,
            "employment_url_status_code": 200,
            "employment_url_soft404": false,
            "Notes": null,
            "platform_detected": "other"
        },
        {
            "Town": "Lyme",
            "Notes": null,
            "Town Website": "https://www.townlyme.org/",
            "employment_url_status_code": 403,
            "platform_detected": "other",
            "Population": 2300
        },
        {"Town": "Nowhere", "Town Website": null, "employment_url_status_code": 404},
        "not a record"
    ]))
    .unwrap();
    let mut dataset = Dataset::from_json_str(&input).unwrap();

    let engine = create_engine();
    let (results, _) = engine.run_dataset(&mut dataset, None).await;

    let actions: Vec<Action> = results.iter().map(|r| r.action).collect();
    assert_eq!(
        actions,
        vec![Action::NoChange, Action::NoChange, Action::Skipped, Action::Skipped]
    );
    assert_eq!(engine.fetch_count(), 0);
    assert_eq!(dataset.to_json_string().unwrap(), input);
}

#[tokio::test]
async fn test_detected_platform_is_appended_after_source_keys() {
    let input = r#"[{"Notes": null, "Town": "Essex", "Town Website": "https://www.essexct.gov/",
        "Application Form URL": null, "employment_url_status_code": 200}]"#;
    let mut dataset = Dataset::from_json_str(input).unwrap();

    let engine = create_engine();
    engine.run_dataset(&mut dataset, None).await;

    let out: serde_json::Value = serde_json::from_str(&dataset.to_json_string().unwrap()).unwrap();
    let keys: Vec<&str> = out[0].as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "Notes",
            "Town",
            "Town Website",
            "Application Form URL",
            "employment_url_status_code",
            "platform_detected",
        ]
    );
    assert!(out[0]["Notes"].is_null());
    assert!(out[0]["Application Form URL"].is_null());
}

#[tokio::test]
async fn test_town_filter_limits_the_run() {
    let server = MockServer::start().await;
    let home = format!("{}/", server.uri());

    let mut dataset = Dataset::from_records(vec![
        broken_record("Essex", &home, None, 403),
        broken_record("Lyme", &home, None, 403),
    ]);
    let (results, stats) = create_engine()
        .run_dataset(&mut dataset, Some("LYME"))
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Lyme");
    assert_eq!(stats.processed, 1);
}

#[tokio::test]
async fn test_updated_dataset_roundtrips_through_disk() {
    let server = MockServer::start().await;
    mount_civicplus_site(&server).await;
    let home = format!("{}/", server.uri());

    let mut dataset = Dataset::from_records(vec![broken_record(
        "Essex",
        &home,
        Some("CivicPlus"),
        404,
    )]);
    let (results, _) = create_engine().run_dataset(&mut dataset, None).await;
    assert_eq!(results[0].action, Action::Updated);

    let file = tempfile::NamedTempFile::new().unwrap();
    save_dataset(&dataset, file.path()).unwrap();
    let loaded = load_dataset(file.path()).unwrap();

    let Entry::Record(record) = &loaded.entries[0] else {
        panic!("expected a record");
    };
    assert_eq!(record.employment_url, results[0].new_url);
    assert_eq!(record.employment_page_type.as_deref(), Some("module_page"));
    assert_eq!(record.status_code, Some(200));
}

#[tokio::test]
async fn test_confidence_and_page_type_invariants() {
    let server = MockServer::start().await;
    mount_civicplus_site(&server).await;
    let home = format!("{}/", server.uri());

    let mut dataset = Dataset::from_records(vec![
        broken_record("Essex", &home, Some("CivicPlus"), 404),
        broken_record("Lyme", &home, Some("CivicLift"), 404),
        broken_record("Chester", &home, None, 403),
        broken_record("Haddam", &home, None, 200),
    ]);
    let (results, _) = create_engine().run_dataset(&mut dataset, None).await;

    for result in &results {
        assert!(result.confidence.unwrap_or(0) <= 95);
        assert_eq!(result.page_type.is_some(), result.action == Action::Updated);
        assert_eq!(result.confidence.is_some(), result.action == Action::Updated);
    }
}
