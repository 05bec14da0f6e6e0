use rand::seq::SliceRandom;
use rand::Rng;

use crate::db::Question;

/// Category id the client sends to play across every category.
pub const ALL_CATEGORIES: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizScope {
    All,
    Category(i64),
}

impl QuizScope {
    pub fn from_category_id(id: i64) -> Self {
        if id == ALL_CATEGORIES {
            QuizScope::All
        } else {
            QuizScope::Category(id)
        }
    }

    pub fn category_id(self) -> Option<i64> {
        match self {
            QuizScope::All => None,
            QuizScope::Category(id) => Some(id),
        }
    }

    /// Metrics label. Category ids come from the client, so they are not used as
    /// label values.
    pub fn label(self) -> &'static str {
        match self {
            QuizScope::All => "all",
            QuizScope::Category(_) => "category",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuizOutcome {
    Next(Question),
    GameOver,
}

/// Draws one of the remaining questions uniformly, or ends the game when none remain.
pub fn pick_question<R: Rng + ?Sized>(candidates: &[Question], rng: &mut R) -> QuizOutcome {
    match candidates.choose(rng) {
        Some(question) => QuizOutcome::Next(question.clone()),
        None => QuizOutcome::GameOver,
    }
}
