use super::*;
use crate::client::AuthorizedClient;
use crate::error::ErrorKind;
use crate::request::{HttpMethod, MockHttpClient};
use crate::storage::{KeyValueStore, MemoryStore};
use serde_json::json;
use std::cell::Cell;
use tutor_shared::{STORAGE_TOKEN_KEY, STORAGE_USER_KEY};

const BASE: &str = "http://localhost:5000/api";

fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

fn signed_in_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.set(STORAGE_TOKEN_KEY, "tok").unwrap();
    store
        .set(STORAGE_USER_KEY, r#"{"id":"u-1","email":"ada@example.com"}"#)
        .unwrap();
    store
}

fn five_questions() -> serde_json::Value {
    let questions: Vec<_> = (1..=5)
        .map(|n| {
            json!({
                "question": format!("Question {}", n),
                "options": ["A", "B", "C", "D"],
                "correct_answer": "A",
                "explanation": "Because A."
            })
        })
        .collect();
    json!(questions)
}

#[tokio::test]
async fn ask_sends_defaults_and_returns_answer() {
    let http = MockHttpClient::new();
    http.mock_response(
        &url("/ask"),
        200,
        json!({ "answer": "Plants turn light into sugar.", "user_id": "anonymous" }),
    );
    let client = AuthorizedClient::new(BASE, &http, MemoryStore::new(), || {});

    let resp = ChatApi::new(&client)
        .ask("What is photosynthesis?", None, None)
        .await
        .unwrap();

    assert_eq!(resp.answer, "Plants turn light into sugar.");
    let req = http.last_request().unwrap();
    assert_eq!(req.method, HttpMethod::Post);
    let body: serde_json::Value = serde_json::from_str(req.body_text().unwrap()).unwrap();
    assert_eq!(body["context"], "");
    assert_eq!(body["user_id"], "anonymous");
}

#[tokio::test]
async fn ask_forwards_context_and_user() {
    let http = MockHttpClient::new();
    http.mock_response(&url("/ask"), 200, json!({ "answer": "ok" }));
    let client = AuthorizedClient::new(BASE, &http, MemoryStore::new(), || {});

    ChatApi::new(&client)
        .ask("Next?", Some("biology"), Some("u-7"))
        .await
        .unwrap();

    let body: serde_json::Value =
        serde_json::from_str(http.last_request().unwrap().body_text().unwrap()).unwrap();
    assert_eq!(body["context"], "biology");
    assert_eq!(body["user_id"], "u-7");
}

#[tokio::test]
async fn topics_unwraps_the_list() {
    let http = MockHttpClient::new();
    http.mock_response(
        &url("/topics"),
        200,
        json!({ "topics": [
            { "id": "math", "name": "Mathematics", "subtopics": ["Algebra"] },
            { "id": "science", "name": "Science" }
        ]}),
    );
    let client = AuthorizedClient::new(BASE, &http, MemoryStore::new(), || {});

    let topics = ChatApi::new(&client).topics().await.unwrap();

    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0].subtopics, vec!["Algebra".to_string()]);
    assert!(topics[1].subtopics.is_empty());
    assert_eq!(http.last_request().unwrap().method, HttpMethod::Get);
}

#[tokio::test]
async fn generate_accepts_wrapped_and_bare_shapes() {
    let http = MockHttpClient::new();
    http.mock_response(&url("/quiz/generate"), 200, json!({ "questions": five_questions() }));
    let client = AuthorizedClient::new(BASE, &http, MemoryStore::new(), || {});
    let wrapped = QuizApi::new(&client)
        .generate("Physics", Difficulty::Medium, 5)
        .await
        .unwrap();

    http.mock_response(&url("/quiz/generate"), 200, five_questions());
    let bare = QuizApi::new(&client)
        .generate("Physics", Difficulty::Medium, 5)
        .await
        .unwrap();

    assert_eq!(wrapped.len(), 5);
    assert_eq!(wrapped, bare);

    let body: serde_json::Value =
        serde_json::from_str(http.last_request().unwrap().body_text().unwrap()).unwrap();
    assert_eq!(body, json!({ "topic": "Physics", "difficulty": "medium", "num_questions": 5 }));
}

#[tokio::test]
async fn generate_rejects_empty_quizzes() {
    let http = MockHttpClient::new();
    http.mock_response(&url("/quiz/generate"), 200, json!({ "questions": [] }));
    let client = AuthorizedClient::new(BASE, &http, MemoryStore::new(), || {});

    let err = QuizApi::new(&client)
        .generate("History", Difficulty::Easy, 5)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidResponse);
}

#[tokio::test]
async fn generate_rejects_questions_without_options() {
    let http = MockHttpClient::new();
    http.mock_response(
        &url("/quiz/generate"),
        200,
        json!([{ "question": "Q", "options": [], "correct_answer": "A" }]),
    );
    let client = AuthorizedClient::new(BASE, &http, MemoryStore::new(), || {});

    let err = QuizApi::new(&client)
        .generate("History", Difficulty::Easy, 5)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(msg) if msg.contains("question 1")));
}

#[tokio::test]
async fn generate_error_body_is_a_server_error() {
    let http = MockHttpClient::new();
    http.mock_response(
        &url("/quiz/generate"),
        500,
        json!({ "error": "Failed to generate quiz" }),
    );
    let client = AuthorizedClient::new(BASE, &http, MemoryStore::new(), || {});

    let err = QuizApi::new(&client)
        .generate("Art", Difficulty::Hard, 5)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.user_message(), "Failed to generate quiz");
}

#[tokio::test]
async fn health_check_reports_status() {
    let http = MockHttpClient::new();
    http.mock_response(
        &url("/health"),
        200,
        json!({ "status": "healthy", "service": "ai-tutor-api" }),
    );
    let client = AuthorizedClient::new(BASE, &http, MemoryStore::new(), || {});

    let status = HealthApi::new(&client).check().await.unwrap();
    assert!(status.is_healthy());
    assert_eq!(status.service.as_deref(), Some("ai-tutor-api"));
}

#[tokio::test]
async fn every_facade_ends_the_session_on_401() {
    for path in ["/ask", "/topics", "/quiz/generate", "/health"] {
        let http = MockHttpClient::new();
        http.mock_response(&url(path), 401, json!({ "error": "Unauthorized" }));
        let store = signed_in_store();
        let fired = Cell::new(0);
        let client = AuthorizedClient::new(BASE, &http, store.clone(), || fired.set(fired.get() + 1));

        let err = match path {
            "/ask" => ChatApi::new(&client).ask("hi", None, None).await.map(|_| ()),
            "/topics" => ChatApi::new(&client).topics().await.map(|_| ()),
            "/quiz/generate" => QuizApi::new(&client)
                .generate("Math", Difficulty::Easy, 5)
                .await
                .map(|_| ()),
            _ => HealthApi::new(&client).check().await.map(|_| ()),
        }
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unauthorized, "{path}");
        assert_eq!(fired.get(), 1, "{path}");
        assert!(store.get(STORAGE_TOKEN_KEY).is_none(), "{path}");
        assert!(store.get(STORAGE_USER_KEY).is_none(), "{path}");
    }
}
