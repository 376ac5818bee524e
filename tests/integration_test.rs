// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! End-to-end tests driving the compiled binary against a mock workflow service.

mod common;

use base64::{Engine, prelude::BASE64_STANDARD};
use common::{MockServer, refused_url, run_bridge, stdout_json, write_png};
use serde_json::{Value, json};

const OVERLAY_KEY: &str = "docscan_visualization";

fn detection_response() -> Value {
    json!({
        "workflowResult": {
            "model": {
                "predictions": [{"x": 10, "y": 10, "width": 4, "height": 4, "class": "cat"}]
            }
        }
    })
}

#[test]
fn test_missing_argument_is_usage_error() {
    let output = run_bridge(&refused_url(), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_help_exits_zero() {
    let output = run_bridge(&refused_url(), &["--help"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_missing_file_is_plain_text() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.jpg");
    let missing = missing.to_str().unwrap();

    let output = run_bridge(&refused_url(), &[missing]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(missing), "stderr: {stderr}");
    assert!(serde_json::from_str::<Value>(stderr.trim()).is_err());
}

#[test]
fn test_remote_failure_prints_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("scan.png");
    write_png(&image, 16, 16);

    let output = run_bridge(&refused_url(), &[image.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));

    let doc = stdout_json(&output);
    let map = doc.as_object().unwrap();
    assert_eq!(map.len(), 1);
    assert!(map["error"].is_string());
}

#[test]
fn test_service_error_status() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("scan.png");
    write_png(&image, 16, 16);

    let server = MockServer::start(401, r#"{"message": "Unauthorized"}"#);
    let output = run_bridge(&server.url, &[image.to_str().unwrap()]);
    server.request();

    assert_eq!(output.status.code(), Some(1));
    let doc = stdout_json(&output);
    let message = doc["error"].as_str().unwrap();
    assert!(message.contains("401"), "error: {message}");
    assert!(message.contains("Unauthorized"), "error: {message}");
}

#[test]
fn test_malformed_response() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("scan.png");
    write_png(&image, 16, 16);

    let server = MockServer::start(200, "<html>oops</html>");
    let output = run_bridge(&server.url, &[image.to_str().unwrap()]);
    server.request();

    assert_eq!(output.status.code(), Some(1));
    let doc = stdout_json(&output);
    assert_eq!(doc.as_object().unwrap().len(), 1);
    assert!(doc["error"].as_str().unwrap().starts_with("Malformed response"));
}

#[test]
fn test_request_shape() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("scan.png");
    write_png(&image, 8, 8);

    let server = MockServer::start(200, r#"{"workflowResult": null}"#);
    let output = run_bridge(&server.url, &[image.to_str().unwrap()]);
    let request = server.request();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/test-space/workflows/detect");

    let body: Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body["api_key"], "test-key");
    assert_eq!(body["use_cache"], true);
    assert_eq!(body["inputs"]["image"]["type"], "base64");
    let sent = BASE64_STANDARD
        .decode(body["inputs"]["image"]["value"].as_str().unwrap())
        .unwrap();
    assert_eq!(sent, std::fs::read(&image).unwrap());

    // Nothing to draw: the response comes back untouched
    assert_eq!(stdout_json(&output), json!({"workflowResult": null}));
}

#[test]
fn test_response_numbers_pass_through() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("scan.png");
    write_png(&image, 8, 8);

    let body = r#"{"id":18446744073709551617,"score":1.947700395895162e-169,"workflowResult":null}"#;
    let server = MockServer::start(200, body);
    let output = run_bridge(&server.url, &[image.to_str().unwrap()]);
    server.request();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim_end(), body);
}

#[cfg(feature = "annotate")]
#[test]
fn test_overlay_added() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("scan.png");
    write_png(&image, 32, 32);

    let server = MockServer::start(200, detection_response().to_string());
    let output = run_bridge(&server.url, &[image.to_str().unwrap()]);
    server.request();

    assert_eq!(output.status.code(), Some(0));
    let doc = stdout_json(&output);
    assert_eq!(doc["workflowResult"], detection_response()["workflowResult"]);

    let jpeg = BASE64_STANDARD
        .decode(doc[OVERLAY_KEY].as_str().unwrap())
        .unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    let decoded = image::load_from_memory(&jpeg).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (32, 32));
}

#[test]
fn test_no_overlay_flag() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("scan.png");
    write_png(&image, 32, 32);

    let server = MockServer::start(200, detection_response().to_string());
    let output = run_bridge(&server.url, &["--no-overlay", image.to_str().unwrap()]);
    server.request();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output), detection_response());
}

#[test]
fn test_unreadable_image_keeps_response() {
    // The service accepts anything; the local decode fails and is ignored
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("scan.jpg");
    std::fs::write(&image, b"definitely not a jpeg").unwrap();

    let server = MockServer::start(200, detection_response().to_string());
    let output = run_bridge(&server.url, &[image.to_str().unwrap()]);
    server.request();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output), detection_response());
}

#[test]
fn test_verbose_keeps_stdout_clean() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("scan.png");
    write_png(&image, 32, 32);

    let server = MockServer::start(200, detection_response().to_string());
    let output = run_bridge(&server.url, &["--verbose", image.to_str().unwrap()]);
    server.request();

    assert_eq!(output.status.code(), Some(0));
    stdout_json(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("1 cat"), "stderr: {stderr}");
}
