mod helpers;

use axum::{
    Json, Router,
    extract::Path,
    http::{
        HeaderMap, StatusCode,
        header::{ACCEPT, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use axum_macros::debug_handler;
use serde_json::{Value, json};

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use helpers::MockService;
use notes_client::{
    api::{ApiError, DEFAULT_TIMEOUT, NotesApi, NotesBackend, Payload},
    dto::{NoteId, NotePayload},
};

fn client(service: &MockService) -> NotesApi {
    NotesApi::new(&service.base, DEFAULT_TIMEOUT).unwrap()
}

fn payload(title: &str, content: &str) -> NotePayload {
    NotePayload {
        title: title.to_string(),
        content: content.to_string(),
    }
}

#[debug_handler]
async fn three_notes() -> Json<Value> {
    Json(json!([
        {"id": 1, "title": "one", "content": "a"},
        {"id": 2, "title": "two", "content": "b"},
        {"id": 3, "title": "three", "content": "c"},
    ]))
}

#[debug_handler]
async fn wrapped_notes() -> Json<Value> {
    Json(json!({"notes": [
        {"_id": "x1", "title": "one", "content": "a"},
        {"_id": "x2", "title": "two", "content": "b"},
    ]}))
}

#[debug_handler]
async fn echo_created(Json(body): Json<NotePayload>) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({"id": 10, "title": body.title, "content": body.content})),
    )
        .into_response()
}

#[tokio::test]
async fn bare_array_from_primary_path() {
    let service = MockService::start(Router::new().route("/notes", get(three_notes))).await;

    let notes = client(&service).list_notes().await.unwrap();

    assert_eq!(notes.len(), 3);
    assert_eq!(notes[2].title, "three");
    assert_eq!(notes[0].id, Some(NoteId::from(1_i64)));
    assert_eq!(service.hits(), vec!["GET /notes"]);
}

#[tokio::test]
async fn envelope_from_fallback_after_one_404() {
    let service = MockService::start(Router::new().route("/api/notes", get(wrapped_notes))).await;

    let notes = client(&service).list_notes().await.unwrap();

    assert_eq!(notes.len(), 2);
    assert_eq!(notes[1].id, Some(NoteId::from("x2")));
    assert_eq!(service.hits(), vec!["GET /notes", "GET /api/notes"]);
}

#[tokio::test]
async fn base_with_path_prefix_is_respected() {
    let service = MockService::start(Router::new().route("/rest/notes", get(three_notes))).await;
    let api = NotesApi::new(&format!("{}/rest/", service.base), DEFAULT_TIMEOUT).unwrap();

    assert_eq!(api.list_notes().await.unwrap().len(), 3);
    assert_eq!(service.hits(), vec!["GET /rest/notes"]);
}

#[tokio::test]
async fn fallback_is_tried_exactly_once() {
    let service = MockService::start(Router::new()).await;

    let err = client(&service).list_notes().await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.user_message(), "Not Found");
    assert_eq!(service.hits(), vec!["GET /notes", "GET /api/notes"]);
}

#[tokio::test]
async fn server_error_skips_fallback() {
    let routes = Router::new()
        .route(
            "/notes",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"detail": "Database offline"})),
                )
            }),
        )
        .route("/api/notes", get(three_notes));
    let service = MockService::start(routes).await;

    let err = client(&service).list_notes().await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.user_message(), "Database offline");
    match err {
        ApiError::Status { payload, .. } => {
            assert_eq!(payload, Payload::Json(json!({"detail": "Database offline"})));
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(service.hits(), vec!["GET /notes"]);
}

#[tokio::test]
async fn text_error_body_becomes_message() {
    let routes = Router::new().route(
        "/notes",
        post(|| async { (StatusCode::BAD_REQUEST, "Failed to create note") }),
    );
    let service = MockService::start(routes).await;

    let err = client(&service)
        .create_note(&payload("t", "c"))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Failed to create note");
    assert_eq!(service.hits(), vec!["POST /notes"]);
}

#[tokio::test]
async fn create_sends_json_and_returns_note() {
    let service = MockService::start(Router::new().route("/notes", post(echo_created))).await;

    let created = client(&service)
        .create_note(&payload("", "just content"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(created.id, Some(NoteId::from(10_i64)));
    assert_eq!(created.title, "");
    assert_eq!(created.content, "just content");
}

#[tokio::test]
async fn create_without_body_returns_none() {
    let routes = Router::new().route("/notes", post(|| async { StatusCode::CREATED }));
    let service = MockService::start(routes).await;

    let created = client(&service)
        .create_note(&payload("t", ""))
        .await
        .unwrap();

    assert_eq!(created, None);
}

#[tokio::test]
async fn update_falls_back_with_encoded_id() {
    let routes = Router::new().route(
        "/api/notes/{id}",
        put(|Path(id): Path<String>, Json(body): Json<NotePayload>| async move {
            Json(json!({"id": id, "title": body.title, "content": body.content}))
        }),
    );
    let service = MockService::start(routes).await;

    let updated = client(&service)
        .update_note(&NoteId::from("a b"), &payload("new", "body"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.id, Some(NoteId::from("a b")));
    assert_eq!(updated.title, "new");
    assert_eq!(
        service.hits(),
        vec!["PUT /notes/a%20b", "PUT /api/notes/a%20b"]
    );
}

#[tokio::test]
async fn delete_accepts_no_content() {
    let routes = Router::new().route(
        "/notes/{id}",
        axum::routing::delete(|| async { StatusCode::NO_CONTENT }),
    );
    let service = MockService::start(routes).await;

    client(&service)
        .delete_note(&NoteId::from(4_i64))
        .await
        .unwrap();

    assert_eq!(service.hits(), vec!["DELETE /notes/4"]);
}

#[tokio::test]
async fn slow_service_times_out_without_fallback() {
    let routes = Router::new().route(
        "/notes",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!([]))
        }),
    );
    let service = MockService::start(routes).await;
    let api = NotesApi::new(&service.base, Duration::from_millis(200)).unwrap();

    let err = api.list_notes().await.unwrap_err();

    assert!(matches!(err, ApiError::Timeout { .. }));
    assert_eq!(service.hits(), vec!["GET /notes"]);
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = NotesApi::new(&format!("http://{addr}"), DEFAULT_TIMEOUT).unwrap();
    let err = api.list_notes().await.unwrap_err();

    assert!(matches!(err, ApiError::Transport { .. }));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn content_type_is_sent_only_with_a_body() {
    let seen: Arc<Mutex<Vec<HeaderMap>>> = Arc::default();
    let on_get = Arc::clone(&seen);
    let on_post = Arc::clone(&seen);
    let routes = Router::new().route(
        "/notes",
        get(move |headers: HeaderMap| async move {
            on_get.lock().unwrap().push(headers);
            Json(json!([]))
        })
        .post(move |headers: HeaderMap| async move {
            on_post.lock().unwrap().push(headers);
            StatusCode::CREATED
        }),
    );
    let service = MockService::start(routes).await;
    let api = client(&service);

    api.list_notes().await.unwrap();
    api.create_note(&payload("t", "c")).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    for headers in seen.iter() {
        assert_eq!(headers[ACCEPT], "application/json");
    }
    assert!(seen[0].get(CONTENT_TYPE).is_none());
    assert_eq!(seen[1][CONTENT_TYPE], "application/json");
}

#[tokio::test]
async fn unparseable_json_error_falls_back_to_status_text() {
    let routes = Router::new().route(
        "/notes",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(CONTENT_TYPE, "application/json")],
                "{bad",
            )
        }),
    );
    let service = MockService::start(routes).await;

    let err = client(&service).list_notes().await.unwrap_err();

    assert_eq!(err.user_message(), "Request failed (500)");
    match err {
        ApiError::Status { payload, .. } => assert_eq!(payload, Payload::Empty),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_json_create_yields_no_note() {
    let routes = Router::new().route(
        "/notes",
        post(|| async {
            (
                StatusCode::CREATED,
                [(CONTENT_TYPE, "application/json")],
                "{bad",
            )
        }),
    );
    let service = MockService::start(routes).await;

    let created = client(&service)
        .create_note(&payload("t", "c"))
        .await
        .unwrap();

    assert_eq!(created, None);
}

#[tokio::test]
async fn plain_text_listing_is_not_parsed() {
    let routes = Router::new().route(
        "/notes",
        get(|| async {
            (
                [(CONTENT_TYPE, "text/plain")],
                r#"[{"id": 1, "title": "hidden"}]"#,
            )
        }),
    );
    let service = MockService::start(routes).await;

    let notes = client(&service).list_notes().await.unwrap();

    assert!(notes.is_empty());
    assert_eq!(service.hits(), vec!["GET /notes"]);
}

#[tokio::test]
async fn create_404_on_both_paths_is_final() {
    let service = MockService::start(Router::new()).await;

    let err = client(&service)
        .create_note(&payload("t", "c"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(service.hits(), vec!["POST /notes", "POST /api/notes"]);
}

#[tokio::test]
async fn delete_404_on_both_paths_is_final() {
    let service = MockService::start(Router::new()).await;

    let err = client(&service)
        .delete_note(&NoteId::from(1_i64))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(service.hits(), vec!["DELETE /notes/1", "DELETE /api/notes/1"]);
}
