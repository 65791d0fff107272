use crate::client::ApiTransport;
use crate::error::{ApiError, ApiResult};
use tutor_shared::protocol::{
    AskRequest, AskResponse, GenerateQuizRequest, HealthRequest, TopicsRequest,
};
use tutor_shared::{Difficulty, HealthStatus, QuizQuestion, Topic};

// =========================================================
// Chat
// =========================================================

pub struct ChatApi<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: ApiTransport + ?Sized> ChatApi<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// `POST /ask`. Missing context is sent as `""`, a missing user as `"anonymous"`.
    pub async fn ask(
        &self,
        question: &str,
        context: Option<&str>,
        user_id: Option<&str>,
    ) -> ApiResult<AskResponse> {
        let mut req = AskRequest::new(question);
        if let Some(context) = context {
            req.context = context.to_string();
        }
        if let Some(user_id) = user_id {
            req.user_id = user_id.to_string();
        }
        self.transport.call(&req).await
    }

    /// `GET /topics`
    pub async fn topics(&self) -> ApiResult<Vec<Topic>> {
        Ok(self.transport.call(&TopicsRequest).await?.topics)
    }
}

// =========================================================
// Quiz
// =========================================================

pub struct QuizApi<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: ApiTransport + ?Sized> QuizApi<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// `POST /quiz/generate`, normalized to a non-empty question list.
    pub async fn generate(
        &self,
        topic: &str,
        difficulty: Difficulty,
        num_questions: u32,
    ) -> ApiResult<Vec<QuizQuestion>> {
        let req = GenerateQuizRequest {
            topic: topic.to_string(),
            difficulty,
            num_questions,
        };
        let questions = self.transport.call(&req).await?.into_questions();
        validate_questions(&questions)?;
        Ok(questions)
    }
}

fn validate_questions(questions: &[QuizQuestion]) -> ApiResult<()> {
    if questions.is_empty() {
        return Err(ApiError::InvalidResponse("quiz has no questions".to_string()));
    }
    if let Some(index) = questions.iter().position(|q| q.options.is_empty()) {
        return Err(ApiError::InvalidResponse(format!(
            "question {} has no options",
            index + 1
        )));
    }
    Ok(())
}

// =========================================================
// Health
// =========================================================

pub struct HealthApi<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: ApiTransport + ?Sized> HealthApi<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// `GET /health`
    pub async fn check(&self) -> ApiResult<HealthStatus> {
        self.transport.call(&HealthRequest).await
    }
}

#[cfg(test)]
mod tests;
