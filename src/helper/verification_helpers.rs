use crate::models::PostTranslation;
use serde::Serialize;

/// What the caller has presented towards a verification challenge.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChallengeRequest {
    /// Answer submitted with this request, if any.
    pub answer: Option<String>,
    /// Set once the caller passed the challenge earlier in its session.
    pub already_verified: bool,
}

/// What the presentation layer shows when a challenge must be passed.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ChallengePrompt {
    pub question: String,
}

/// A verification step (captcha) that may gate reading a post.
pub trait VerificationChallenge: Send + Sync {
    fn challenge_required(&self, request: &ChallengeRequest, post: &PostTranslation) -> bool;
    fn verify(&self, request: &ChallengeRequest) -> bool;
    fn prompt(&self) -> ChallengePrompt;
}

/// Fixed question with a single accepted answer, compared case-insensitively.
#[derive(Debug, Clone)]
pub struct QuestionChallenge {
    question: String,
    answer: String,
}

impl QuestionChallenge {
    pub fn new(question: &str, answer: &str) -> Self {
        QuestionChallenge {
            question: question.trim().to_string(),
            answer: answer.trim().to_lowercase(),
        }
    }
}

impl VerificationChallenge for QuestionChallenge {
    fn challenge_required(&self, request: &ChallengeRequest, _post: &PostTranslation) -> bool {
        !request.already_verified
    }

    fn verify(&self, request: &ChallengeRequest) -> bool {
        match request.answer.as_deref() {
            Some(answer) => !self.answer.is_empty() && answer.trim().to_lowercase() == self.answer,
            None => false,
        }
    }

    fn prompt(&self) -> ChallengePrompt {
        ChallengePrompt { question: self.question.clone() }
    }
}
