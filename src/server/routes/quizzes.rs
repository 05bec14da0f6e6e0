use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions::get_quiz_candidates, Question},
    server::{
        app::AppState,
        deserializers::Loosei64,
        error::ApiError,
        extractors::JsonBody,
        quiz::{pick_question, QuizOutcome, QuizScope},
    },
    telemetry::{QUIZ_GAMES_FINISHED, QUIZ_QUESTIONS_SERVED},
};

use super::ApiResponse;

const GAME_OVER: &str = "game over";

#[derive(Deserialize)]
struct QuizCategory {
    id: Loosei64,
}

#[derive(Deserialize)]
struct QuizRequest {
    quiz_category: QuizCategory,
    previous_questions: Vec<i64>,
}

#[derive(Serialize)]
struct QuizTurn {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    #[serde(rename = "previousQuestions")]
    previous_questions: Vec<i64>,
}

/// Hands out one question the player has not seen yet. The client appends its id to
/// `previous_questions` before asking again.
async fn play_quiz(
    State(pool): State<SqlitePool>,
    JsonBody(request): JsonBody<QuizRequest>,
) -> ApiResponse<QuizTurn> {
    let scope = QuizScope::from_category_id(request.quiz_category.id.0);
    let candidates = get_quiz_candidates(&pool, scope.category_id(), &request.previous_questions)
        .await
        .map_err(ApiError::unprocessable)?;

    let outcome = pick_question(&candidates, &mut rand::thread_rng());
    let turn = match outcome {
        QuizOutcome::Next(question) => {
            QUIZ_QUESTIONS_SERVED
                .with_label_values(&[scope.label()])
                .inc();
            QuizTurn {
                success: true,
                question: Some(question),
                message: None,
                previous_questions: request.previous_questions,
            }
        }
        QuizOutcome::GameOver => {
            QUIZ_GAMES_FINISHED
                .with_label_values(&[scope.label()])
                .inc();
            tracing::debug!(category = ?scope.category_id(), "No questions left");
            QuizTurn {
                success: true,
                question: None,
                message: Some(GAME_OVER),
                previous_questions: request.previous_questions,
            }
        }
    };
    Ok(Json(turn))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}
