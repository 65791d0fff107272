//! Quiz state
//!
//! `QuizAttempt` is one run through a generated question list: selections,
//! navigation, scoring and review. `QuizSession` wraps it with the setup form
//! and the generation request.

use crate::error::ApiResult;
use std::collections::BTreeMap;
use tracing::error;
use tutor_shared::{Difficulty, QuizQuestion};

pub const SUBJECTS: [&str; 8] = [
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "History",
    "English",
    "Computer Science",
    "Economics",
];

pub const QUESTIONS_PER_QUIZ: u32 = 5;

pub const MSG_SELECT_SUBJECT: &str = "Please select a subject.";
pub const MSG_GENERATION_FAILED: &str = "Could not generate quiz. Please try again.";
pub const NOT_ANSWERED: &str = "Not answered";

/// Number of questions whose selection equals the correct answer.
pub fn score(questions: &[QuizQuestion], selections: &BTreeMap<usize, String>) -> usize {
    questions
        .iter()
        .enumerate()
        .filter(|(i, q)| selections.get(i).is_some_and(|s| *s == q.correct_answer))
        .count()
}

/// `round(score / total * 100)`, 0 for an empty quiz.
pub fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((score as f64 / total as f64) * 100.0).round() as u32
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub number: usize,
    pub question: String,
    pub selected: Option<String>,
    pub correct_answer: String,
    pub explanation: Option<String>,
    pub is_correct: bool,
}

impl ReviewItem {
    pub fn selected_label(&self) -> &str {
        self.selected.as_deref().unwrap_or(NOT_ANSWERED)
    }
}

// =========================================================
// Attempt
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAttempt {
    questions: Vec<QuizQuestion>,
    selections: BTreeMap<usize, String>,
    current: usize,
    score: Option<usize>,
}

impl QuizAttempt {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            selections: BTreeMap::new(),
            current: 0,
            score: None,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current)
    }

    pub fn selection(&self, index: usize) -> Option<&str> {
        self.selections.get(&index).map(String::as_str)
    }

    /// Records `option` for question `index`. Ignored once submitted or when
    /// the option does not belong to the question.
    pub fn select(&mut self, index: usize, option: &str) -> bool {
        if self.is_submitted() {
            return false;
        }
        let valid = self
            .questions
            .get(index)
            .is_some_and(|q| q.options.iter().any(|o| o == option));
        if valid {
            self.selections.insert(index, option.to_string());
        }
        valid
    }

    pub fn select_current(&mut self, option: &str) -> bool {
        self.select(self.current, option)
    }

    pub fn next(&mut self) {
        self.current = (self.current + 1).min(self.len().saturating_sub(1));
    }

    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.len()
    }

    pub fn progress_label(&self) -> String {
        format!("Question {} of {}", self.current + 1, self.len())
    }

    /// True iff every question has a selection.
    pub fn can_submit(&self) -> bool {
        !self.is_empty() && (0..self.len()).all(|i| self.selections.contains_key(&i))
    }

    /// Scores the attempt. `None` while a question is unanswered.
    pub fn submit(&mut self) -> Option<usize> {
        if !self.can_submit() {
            return None;
        }
        let s = score(&self.questions, &self.selections);
        self.score = Some(s);
        Some(s)
    }

    pub fn is_submitted(&self) -> bool {
        self.score.is_some()
    }

    pub fn score(&self) -> Option<usize> {
        self.score
    }

    pub fn percentage(&self) -> Option<u32> {
        self.score.map(|s| percentage(s, self.len()))
    }

    /// Clears selections, score and position; keeps the questions.
    pub fn retake(&mut self) {
        self.selections.clear();
        self.current = 0;
        self.score = None;
    }

    pub fn review(&self) -> Vec<ReviewItem> {
        self.questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let selected = self.selections.get(&i).cloned();
                ReviewItem {
                    number: i + 1,
                    question: q.question.clone(),
                    is_correct: selected.as_deref() == Some(q.correct_answer.as_str()),
                    selected,
                    correct_answer: q.correct_answer.clone(),
                    explanation: q.explanation.clone().filter(|e| !e.trim().is_empty()),
                }
            })
            .collect()
    }
}

// =========================================================
// Session
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStage {
    Setup,
    InProgress,
    Results,
}

/// Parameters of one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    pub num_questions: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizSession {
    /// Lowercase subject as sent to the API; empty until chosen.
    pub subject: String,
    pub difficulty: Difficulty,
    attempt: Option<QuizAttempt>,
    loading: bool,
    error: Option<String>,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_subject(&mut self, subject: &str) {
        self.subject = subject.trim().to_lowercase();
    }

    pub fn stage(&self) -> QuizStage {
        match &self.attempt {
            None => QuizStage::Setup,
            Some(a) if a.is_submitted() => QuizStage::Results,
            Some(_) => QuizStage::InProgress,
        }
    }

    pub fn attempt(&self) -> Option<&QuizAttempt> {
        self.attempt.as_ref()
    }

    pub fn attempt_mut(&mut self) -> Option<&mut QuizAttempt> {
        self.attempt.as_mut()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Starts a generation (also used for "New quiz").
    ///
    /// Without a subject the error message is set and `None` is returned, so
    /// no request goes out. Otherwise any current attempt is dropped.
    pub fn begin_generation(&mut self) -> Option<QuizRequest> {
        if self.subject.is_empty() {
            self.error = Some(MSG_SELECT_SUBJECT.to_string());
            return None;
        }
        if self.loading {
            return None;
        }
        self.loading = true;
        self.error = None;
        self.attempt = None;
        Some(QuizRequest {
            topic: self.subject.clone(),
            difficulty: self.difficulty,
            num_questions: QUESTIONS_PER_QUIZ,
        })
    }

    pub fn finish_generation(&mut self, result: ApiResult<Vec<QuizQuestion>>) {
        self.loading = false;
        match result {
            Ok(questions) => self.attempt = Some(QuizAttempt::new(questions)),
            Err(e) => {
                error!(error = %e, subject = %self.subject, "quiz generation failed");
                self.error = Some(MSG_GENERATION_FAILED.to_string());
            }
        }
    }
}
