use crate::{DEFAULT_USER_ID, Difficulty, HealthStatus, QuizQuestion, Topic};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize + DeserializeOwned {
    /// The response type returned by this request.
    type Response: Serialize + DeserializeOwned;
    /// The URL path relative to the API base URL.
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
}

// =========================================================
// Chat
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub context: String,
    pub user_id: String,
}

impl AskRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            context: String::new(),
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl ApiRequest for AskRequest {
    type Response = AskResponse;
    const PATH: &'static str = "/ask";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// List study topics
#[derive(Debug, Serialize, Deserialize)]
pub struct TopicsRequest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicsResponse {
    pub topics: Vec<Topic>,
}

impl ApiRequest for TopicsRequest {
    type Response = TopicsResponse;
    const PATH: &'static str = "/topics";
    const METHOD: HttpMethod = HttpMethod::Get;
}

// =========================================================
// Quiz
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateQuizRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    pub num_questions: u32,
}

/// Body of a quiz generation response.
///
/// `{"questions": [...]}` is the canonical shape. Some deployments answer with
/// the bare array, which is accepted and normalized by `into_questions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuizPayload {
    Wrapped { questions: Vec<QuizQuestion> },
    Bare(Vec<QuizQuestion>),
}

impl QuizPayload {
    pub fn into_questions(self) -> Vec<QuizQuestion> {
        match self {
            QuizPayload::Wrapped { questions } => questions,
            QuizPayload::Bare(questions) => questions,
        }
    }
}

impl ApiRequest for GenerateQuizRequest {
    type Response = QuizPayload;
    const PATH: &'static str = "/quiz/generate";
    const METHOD: HttpMethod = HttpMethod::Post;
}

// =========================================================
// Health
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthRequest;

impl ApiRequest for HealthRequest {
    type Response = HealthStatus;
    const PATH: &'static str = "/health";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(n: usize) -> serde_json::Value {
        serde_json::json!({
            "question": format!("Q{}", n),
            "options": ["A", "B", "C", "D"],
            "correct_answer": "A"
        })
    }

    #[test]
    fn quiz_payload_accepts_both_shapes() {
        let wrapped = serde_json::json!({ "questions": [question(1), question(2)] });
        let bare = serde_json::json!([question(1), question(2)]);

        let a: QuizPayload = serde_json::from_value(wrapped).unwrap();
        let b: QuizPayload = serde_json::from_value(bare).unwrap();
        assert_eq!(a.into_questions(), b.into_questions());
    }

    #[test]
    fn quiz_payload_rejects_other_shapes() {
        let err = serde_json::json!({ "error": "Failed to generate quiz" });
        assert!(serde_json::from_value::<QuizPayload>(err).is_err());
    }

    #[test]
    fn ask_request_defaults() {
        let body = serde_json::to_value(AskRequest::new("What is photosynthesis?")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "question": "What is photosynthesis?",
                "context": "",
                "user_id": "anonymous"
            })
        );
    }
}
