mod common;

use std::time::Duration;

use common::{RecordingSleeper, ScriptedTransport, client, test_config};
use serde_json::{Value, json};
use setlistcli::{
    config::Config,
    error::ScrapeError,
    setlistfm::{HttpResponse, SetlistClient},
};

#[test]
fn test_sends_key_and_query() {
    let config = test_config(std::env::temp_dir().as_path());
    let transport = ScriptedTransport::new().respond(200, json!({ "ok": true }));
    let client = client(transport, &config);

    let body: Value = client
        .get_json("/search/artists", &[("artistName", "Phish".to_string())])
        .unwrap();

    assert_eq!(body, json!({ "ok": true }));
    let requests = client.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url,
        "https://api.setlist.fm/rest/1.0/search/artists"
    );
    assert_eq!(requests[0].param("artistName"), Some("Phish"));
    assert_eq!(requests[0].api_key, "test-key");
}

#[test]
fn test_rate_limit_then_success() {
    let config = test_config(std::env::temp_dir().as_path());
    let transport = ScriptedTransport::new()
        .rate_limited(3)
        .respond(200, json!({ "ok": true }));
    let client = client(transport, &config);

    let body: Value = client.get_json("search/artists", &[]).unwrap();

    assert_eq!(body, json!({ "ok": true }));
    assert_eq!(client.transport().requests().len(), 4);

    let slept = client.sleeper().slept();
    assert_eq!(
        slept,
        vec![
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(400),
        ]
    );
    let cap = config.retry.max_backoff;
    assert!(slept.iter().all(|d| *d <= cap));
    assert!(client.sleeper().total() <= cap * 3);
}

#[test]
fn test_retry_after_is_honoured_up_to_cap() {
    let config = test_config(std::env::temp_dir().as_path());
    let transport = ScriptedTransport::new()
        .respond_raw(HttpResponse {
            status: 429,
            retry_after: Some(60),
            body: String::new(),
        })
        .respond(200, json!({}));
    let client = client(transport, &config);

    let _: Value = client.get_json("search/artists", &[]).unwrap();

    assert_eq!(client.sleeper().slept(), vec![config.retry.max_backoff]);
}

#[test]
fn test_rate_limit_budget_exhausted() {
    let mut config = test_config(std::env::temp_dir().as_path());
    config.retry.max_retries = 2;
    let transport = ScriptedTransport::new().rate_limited(3);
    let client = client(transport, &config);

    let err = client.get_json::<Value>("search/artists", &[]).unwrap_err();

    assert!(matches!(err, ScrapeError::RateLimited { attempts: 3 }));
    assert_eq!(client.transport().requests().len(), 3);
    assert_eq!(client.sleeper().slept().len(), 2);
}

#[test]
fn test_auth_failure_is_not_retried() {
    let config = test_config(std::env::temp_dir().as_path());
    let transport = ScriptedTransport::new().respond(401, json!({ "code": 401 }));
    let client = client(transport, &config);

    let err = client.get_json::<Value>("search/artists", &[]).unwrap_err();

    assert!(matches!(err, ScrapeError::Auth(_)));
    assert_eq!(client.transport().requests().len(), 1);
    assert!(client.sleeper().slept().is_empty());
}

#[test]
fn test_status_mapping() {
    let config = test_config(std::env::temp_dir().as_path());
    let transport = ScriptedTransport::new()
        .respond(404, json!({ "code": 404, "message": "not found" }))
        .respond(500, json!({}))
        .respond(403, json!({}));
    let client = client(transport, &config);

    assert!(matches!(
        client.get_json::<Value>("a", &[]).unwrap_err(),
        ScrapeError::NotFound(_)
    ));
    assert!(matches!(
        client.get_json::<Value>("b", &[]).unwrap_err(),
        ScrapeError::Http { status: 500, .. }
    ));
    assert!(matches!(
        client.get_json::<Value>("c", &[]).unwrap_err(),
        ScrapeError::Auth(_)
    ));
    assert!(client.sleeper().slept().is_empty());
}

#[test]
fn test_transport_error_propagates() {
    let config = test_config(std::env::temp_dir().as_path());
    let transport =
        ScriptedTransport::new().fail(ScrapeError::Transport("connection reset".to_string()));
    let client = client(transport, &config);

    let err = client.get_json::<Value>("search/artists", &[]).unwrap_err();

    assert!(matches!(err, ScrapeError::Transport(_)));
    assert_eq!(client.transport().remaining(), 0);
}

#[test]
fn test_malformed_body_is_a_decode_error() {
    let config = test_config(std::env::temp_dir().as_path());
    let transport =
        ScriptedTransport::new().respond_raw(HttpResponse::new(200, "<html>oops</html>"));
    let client = client(transport, &config);

    let err = client.get_json::<Value>("search/artists", &[]).unwrap_err();

    assert!(matches!(err, ScrapeError::Decode { .. }));
}

#[test]
fn test_blank_key_is_rejected_before_any_request() {
    let config = Config {
        api_key: "  ".to_string(),
        ..test_config(std::env::temp_dir().as_path())
    };

    let result = SetlistClient::with_transport(
        ScriptedTransport::new(),
        RecordingSleeper::new(),
        &config,
    );

    assert!(matches!(result, Err(ScrapeError::Auth(_))));
}
