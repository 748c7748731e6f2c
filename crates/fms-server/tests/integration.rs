use axum::http::StatusCode;
use fms_client::FmsClient;
use fms_core::config::{Account, Config};
use http_body_util::BodyExt;
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use tower::ServiceExt;

const LOGIN: &str = "/fms-platform-user/Auth/Login";
const TASKS: &str = "/fms-platform-dispatch-management/TripDetail/GetTaskList";
const FILES: &str = "/fms-platform-dispatch-management/Trips/GetFileInfoByTripId";
const UPLOAD: &str = "/fms-platform-file/Storage/Upload";
const COMPLETE: &str = "/fms-platform-dispatch-management/TripDetail/TaskComplete";
const CANCEL: &str = "/fms-platform-dispatch-management/TripDetail/TaskCompleteCancel";
const REVERT: &str = "/fms-platform-dispatch-management/lh/revert-arrived";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Router wired to a client that talks to the given stub upstream.
fn app(server: &ServerGuard) -> axum::Router {
    let config = Config {
        base_url: server.url(),
        ..Config::new(Account::new("driver", "secret"))
    };
    let client = FmsClient::new(config).unwrap();
    fms_server::build_router(fms_server::state::AppState::new(client))
}

async fn login_mock(server: &mut ServerGuard, hits: usize) -> Mock {
    server
        .mock("POST", LOGIN)
        .with_status(200)
        .with_body(r#"{"data":{"token":"jwt","third_party_token":"rsa"}}"#)
        .expect(hits)
        .create_async()
        .await
}

/// Send a POST request with a JSON body via `oneshot` and return (status, parsed JSON body).
async fn post_json(app: axum::Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/fms")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, req).await
}

async fn send(
    app: axum::Router,
    req: axum::http::Request<axum::body::Body>,
) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_is_method_not_allowed() {
    let server = Server::new_async().await;
    let req = axum::http::Request::builder()
        .method("GET")
        .uri("/api/fms")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app(&server).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn missing_action_is_bad_request() {
    let server = Server::new_async().await;
    let (status, json) = post_json(app(&server), json!({ "tripNo": "B01KJY" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("action"));
}

#[tokio::test]
async fn empty_body_is_bad_request() {
    let server = Server::new_async().await;
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/fms")
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, _json) = send(app(&server), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_action_is_bad_request() {
    let server = Server::new_async().await;
    let (status, json) = post_json(app(&server), json!({ "action": "dance" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("unknown action"));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let server = Server::new_async().await;
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/fms")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, json) = send(app(&server), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn health_does_not_touch_upstream() {
    let mut server = Server::new_async().await;
    let login = login_mock(&mut server, 0).await;
    let req = axum::http::Request::builder()
        .uri("/api/health")
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, json) = send(app(&server), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    login.assert_async().await;
}

// ---------------------------------------------------------------------------
// getTasks / getFiles
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_tasks_returns_normalized_tasks() {
    let mut server = Server::new_async().await;
    login_mock(&mut server, 1).await;
    server
        .mock("GET", TASKS)
        .match_query(Matcher::UrlEncoded("tripNo".into(), "B01KJY".into()))
        .with_status(200)
        .with_body(
            json!({ "data": [{
                "order_no": "123",
                "tracking_no": "50001344",
                "task_no": 7,
                "task_type_text": "Delivery",
                "status_text": "Complete"
            }]})
            .to_string(),
        )
        .create_async()
        .await;

    let (status, json) =
        post_json(app(&server), json!({ "action": "getTasks", "tripNo": "B01KJY" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tripNo"], "B01KJY");
    assert_eq!(
        json["tasks"],
        json!([{
            "do": "123",
            "pro": "50001344",
            "pu": "",
            "taskNo": 7,
            "type": "Delivery",
            "status": "Complete",
            "complete": true
        }])
    );
}

#[tokio::test]
async fn get_tasks_requires_trip_number() {
    let server = Server::new_async().await;
    let (status, json) = post_json(app(&server), json!({ "action": "getTasks" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("tripNo"));
}

#[tokio::test]
async fn get_tasks_with_files_attaches_matches() {
    let mut server = Server::new_async().await;
    login_mock(&mut server, 1).await;
    server
        .mock("GET", TASKS)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"data":[{"task_no":1,"tracking_no":"5000"},{"task_no":2,"tracking_no":"6000"}]}"#,
        )
        .create_async()
        .await;
    server
        .mock("POST", FILES)
        .with_status(200)
        .with_body(
            r#"{"data":{"files":[{"file_type":"BOL","task_no":1,"pro_no":"6000","file_name":"bol.pdf"}]}}"#,
        )
        .create_async()
        .await;

    let (status, json) = post_json(
        app(&server),
        json!({ "action": "getTasks", "tripNo": "T9", "withFiles": true }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tasks"][0]["files"], json!([]));
    assert_eq!(json["tasks"][1]["files"][0]["fileName"], "bol.pdf");
}

#[tokio::test]
async fn get_tasks_upstream_failure_is_reported() {
    let mut server = Server::new_async().await;
    login_mock(&mut server, 1).await;
    server
        .mock("GET", TASKS)
        .match_query(Matcher::Any)
        .with_status(502)
        .with_body("gateway down")
        .create_async()
        .await;

    let (status, json) =
        post_json(app(&server), json!({ "action": "getTasks", "tripNo": "B01KJY" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert_eq!(json["upstreamStatus"], 502);
    assert_eq!(json["upstreamBody"], "gateway down");
}

#[tokio::test]
async fn login_failure_is_server_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", LOGIN)
        .with_status(401)
        .create_async()
        .await;

    let (status, json) =
        post_json(app(&server), json!({ "action": "getTasks", "tripNo": "B01KJY" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("authentication"));
}

#[tokio::test]
async fn get_files_lists_trip_files() {
    let mut server = Server::new_async().await;
    login_mock(&mut server, 1).await;
    server
        .mock("POST", FILES)
        .match_body(Matcher::Json(json!({ "trip_no": "T9" })))
        .with_status(200)
        .with_body(r#"{"data":{"files":[{"file_type":"pod","task_no":"3"}]}}"#)
        .create_async()
        .await;

    let (status, json) =
        post_json(app(&server), json!({ "action": "getFiles", "tripNo": "T9" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["files"][0]["fileType"], "POD");
    assert_eq!(json["files"][0]["taskNo"], "3");
}

// ---------------------------------------------------------------------------
// checkin / undo
// ---------------------------------------------------------------------------

#[tokio::test]
async fn checkin_retries_once_after_unauthorized() {
    let mut server = Server::new_async().await;
    let login = login_mock(&mut server, 2).await;
    let rejected = server
        .mock("POST", COMPLETE)
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let accepted = server
        .mock("POST", COMPLETE)
        .match_body(Matcher::PartialJson(json!({ "trip_no": "X", "task_no": 1 })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let (status, json) = post_json(
        app(&server),
        json!({ "action": "checkin", "tripNo": "X", "task": { "taskNo": 1 } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    rejected.assert_async().await;
    accepted.assert_async().await;
    login.assert_async().await;
}

#[tokio::test]
async fn checkin_delivery_sends_pro_and_evidence() {
    let mut server = Server::new_async().await;
    login_mock(&mut server, 1).await;
    let complete = server
        .mock("POST", COMPLETE)
        .match_body(Matcher::PartialJson(json!({
            "trip_no": "B01",
            "task_no": 7,
            "pro_number": "5000",
            "image_list": [{
                "file_name": "pod.jpg",
                "file_url": "https://f/pod.jpg",
                "file_extension": "jpg"
            }]
        })))
        .with_status(200)
        .create_async()
        .await;

    let (status, json) = post_json(
        app(&server),
        json!({
            "action": "checkin",
            "tripNo": "B01",
            "task": { "taskNo": 7, "type": "Delivery", "pro": "5000" },
            "files": [{ "fileName": "pod.jpg", "fileUrl": "https://f/pod.jpg", "extension": "jpg" }]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["taskNo"], 7);
    complete.assert_async().await;
}

#[tokio::test]
async fn checkin_without_task_number_is_bad_request() {
    let server = Server::new_async().await;
    let (status, json) = post_json(
        app(&server),
        json!({ "action": "checkin", "tripNo": "X", "task": {} }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("task.taskNo"));
}

#[tokio::test]
async fn checkin_without_trip_is_bad_request() {
    let server = Server::new_async().await;
    let (status, json) =
        post_json(app(&server), json!({ "action": "checkin", "task": { "taskNo": 1 } })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("tripNo"));
}

#[tokio::test]
async fn checkin_rejected_twice_reports_upstream_status() {
    let mut server = Server::new_async().await;
    login_mock(&mut server, 2).await;
    let complete = server
        .mock("POST", COMPLETE)
        .with_status(403)
        .with_body("forbidden")
        .expect(2)
        .create_async()
        .await;

    let (status, json) = post_json(
        app(&server),
        json!({ "action": "checkin", "tripNo": "X", "task": { "taskNo": 1 } }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert_eq!(json["upstreamStatus"], 403);
    complete.assert_async().await;
}

#[tokio::test]
async fn undo_cancels_task() {
    let mut server = Server::new_async().await;
    login_mock(&mut server, 1).await;
    let cancel = server
        .mock("POST", CANCEL)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("tripNo".into(), "X".into()),
            Matcher::UrlEncoded("taskNo".into(), "2".into()),
            Matcher::UrlEncoded("stopNo".into(), "0".into()),
        ]))
        .with_status(200)
        .create_async()
        .await;

    let (status, json) = post_json(
        app(&server),
        json!({ "action": "undo", "tripNo": "X", "task": { "taskNo": 2, "type": "Pickup" } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    cancel.assert_async().await;
}

#[tokio::test]
async fn undo_linehaul_reverts_arrival() {
    let mut server = Server::new_async().await;
    login_mock(&mut server, 1).await;
    let revert = server
        .mock("POST", REVERT)
        .match_body(Matcher::Json(json!({ "task_no": 11 })))
        .with_status(200)
        .create_async()
        .await;

    let (status, _json) =
        post_json(app(&server), json!({ "action": "undoLinehaul", "taskNo": 11 })).await;

    assert_eq!(status, StatusCode::OK);
    revert.assert_async().await;
}

// ---------------------------------------------------------------------------
// uploadFile
// ---------------------------------------------------------------------------

const UPLOAD_OK: &str = r#"{"is_success":true,"data":{"items":[{"file_info":{"name":"pod.jpg","url":"https://f/pod.jpg","file_extension":"jpg"}}]}}"#;

#[tokio::test]
async fn upload_json_base64() {
    let mut server = Server::new_async().await;
    login_mock(&mut server, 1).await;
    let upload = server
        .mock("POST", UPLOAD)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"filename="pod.jpg""#.into()),
            Matcher::Regex("fms_trip_pod".into()),
            Matcher::Regex("hello".into()),
        ]))
        .with_status(200)
        .with_body(UPLOAD_OK)
        .create_async()
        .await;

    let (status, json) = post_json(
        app(&server),
        json!({ "action": "uploadFile", "fileName": "pod.jpg", "contentBase64": "aGVsbG8=" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "success": true,
            "fileName": "pod.jpg",
            "fileUrl": "https://f/pod.jpg",
            "extension": "jpg"
        })
    );
    upload.assert_async().await;
}

#[tokio::test]
async fn upload_multipart_forwards_file_and_directory() {
    let mut server = Server::new_async().await;
    login_mock(&mut server, 1).await;
    let upload = server
        .mock("POST", UPLOAD)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"filename="bol.pdf""#.into()),
            Matcher::Regex("fms_trip_bol".into()),
        ]))
        .with_status(200)
        .with_body(UPLOAD_OK)
        .create_async()
        .await;

    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"directory\"\r\n\r\n\
         fms_trip_bol\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"bol.pdf\"\r\n\
         Content-Type: application/pdf\r\n\r\n\
         %PDF-1.4\r\n\
         --{boundary}--\r\n"
    );
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/fms")
        .header("content-type", format!("multipart/form-data; boundary={boundary}"))
        .body(axum::body::Body::from(body))
        .unwrap();

    let (status, json) = send(app(&server), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    upload.assert_async().await;
}

#[tokio::test]
async fn upload_multipart_without_file_is_bad_request() {
    let server = Server::new_async().await;
    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"directory\"\r\n\r\n\
         fms_trip_pod\r\n\
         --{boundary}--\r\n"
    );
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/fms")
        .header("content-type", format!("multipart/form-data; boundary={boundary}"))
        .body(axum::body::Body::from(body))
        .unwrap();

    let (status, json) = send(app(&server), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("file"));
}

#[tokio::test]
async fn upload_requires_content() {
    let server = Server::new_async().await;
    let (status, json) = post_json(
        app(&server),
        json!({ "action": "uploadFile", "fileName": "pod.jpg" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("contentBase64"));
}
