use std::collections::BTreeMap;

use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{categories_map, get_categories_by_type},
            questions::{self, get_all_questions, get_question_by_id, search_questions},
        },
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        deserializers::{Loosei64, TextOrInt},
        error::ApiError,
        extractors::{JsonBody, PathId},
        pagination::{paginate, Page},
    },
    telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED},
};

use super::ApiResponse;

// any non-blank string or non-zero number counts as present, the way form clients send them
#[derive(Deserialize)]
struct NewQuestionBody {
    question: Option<TextOrInt>,
    answer: Option<TextOrInt>,
    category: Option<TextOrInt>,
    difficulty: Option<TextOrInt>,
}

impl NewQuestionBody {
    /// Every field must be present and non-blank before anything is written.
    fn validate(self) -> Result<NewQuestion, ApiError> {
        let present = |field: Option<TextOrInt>| field.filter(TextOrInt::is_present);
        match (
            present(self.question),
            present(self.answer),
            present(self.category),
            present(self.difficulty),
        ) {
            (Some(question), Some(answer), Some(category), Some(difficulty)) => {
                let Loosei64(difficulty) =
                    Loosei64::try_from(difficulty).map_err(ApiError::unprocessable)?;
                Ok(NewQuestion {
                    question: question.into_text(),
                    answer: answer.into_text(),
                    category: category.into_text(),
                    difficulty,
                })
            }
            _ => Err(ApiError::unprocessable(
                "question, answer, category and difficulty are all required",
            )),
        }
    }
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Map<String, Value>,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct QuestionCreated {
    success: bool,
    created: i64,
    question_created: Question,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
struct QuestionDeleted {
    success: bool,
    deleted: i64,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    search_term: String,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Option<i64>,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    Page(page): Page,
) -> ApiResponse<QuestionsPage> {
    let questions = get_all_questions(&pool).await.map_err(ApiError::internal)?;
    let total_questions = questions.len();
    let current = paginate(questions, page);
    if current.is_empty() {
        return Err(ApiError::not_found(format!("page {page} has no questions")));
    }

    let categories = get_categories_by_type(&pool)
        .await
        .map_err(ApiError::not_found)?;

    Ok(Json(QuestionsPage {
        success: true,
        questions: current,
        total_questions,
        current_category: Map::new(),
        categories: categories_map(categories),
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    Page(page): Page,
    JsonBody(body): JsonBody<NewQuestionBody>,
) -> ApiResponse<QuestionCreated> {
    let new_question = body.validate()?;

    let id = questions::create_question(&pool, &new_question)
        .await
        .map_err(ApiError::unprocessable)?;
    QUESTIONS_CREATED.inc();
    tracing::info!(id, category = %new_question.category, "Question created");

    let question_created = get_question_by_id(&pool, id)
        .await
        .map_err(ApiError::unprocessable)?
        .ok_or_else(|| ApiError::unprocessable(format!("question {id} vanished after insert")))?;
    let all = get_all_questions(&pool)
        .await
        .map_err(ApiError::unprocessable)?;

    Ok(Json(QuestionCreated {
        success: true,
        created: id,
        question_created,
        total_questions: all.len(),
        questions: paginate(all, page),
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    PathId(id): PathId,
    Page(page): Page,
) -> ApiResponse<QuestionDeleted> {
    get_question_by_id(&pool, id)
        .await
        .map_err(ApiError::unprocessable)?
        .ok_or_else(|| ApiError::not_found(format!("question {id} does not exist")))?;

    let deleted = questions::delete_question(&pool, id)
        .await
        .map_err(ApiError::unprocessable)?;
    if deleted == 0 {
        // removed by a concurrent request between lookup and delete
        return Err(ApiError::not_found(format!("question {id} does not exist")));
    }
    QUESTIONS_DELETED.inc();
    tracing::info!(id, "Question deleted");

    let remaining = get_all_questions(&pool)
        .await
        .map_err(ApiError::unprocessable)?;

    Ok(Json(QuestionDeleted {
        success: true,
        deleted: id,
        total_questions: remaining.len(),
        questions: paginate(remaining, page),
    }))
}

async fn search(
    State(pool): State<SqlitePool>,
    Page(page): Page,
    JsonBody(body): JsonBody<SearchBody>,
) -> ApiResponse<SearchResults> {
    let search_term = body
        .search_term
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unprocessable("searchTerm is required"))?;

    let found = search_questions(&pool, &search_term)
        .await
        .map_err(ApiError::not_found)?;

    Ok(Json(SearchResults {
        success: true,
        search_term,
        total_questions: found.len(),
        questions: paginate(found, page),
        current_category: None,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: &str) -> NewQuestionBody {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn accepts_string_or_number_fields() {
        let q = body(r#"{"question": "Q?", "answer": "A", "category": 3, "difficulty": "2"}"#)
            .validate()
            .unwrap();
        assert_eq!(q.category, "3");
        assert_eq!(q.difficulty, 2);
    }

    #[test]
    fn non_blank_values_count_as_present() {
        let q = body(r#"{"question": 42, "answer": "A", "category": "3", "difficulty": "0"}"#)
            .validate()
            .unwrap();
        assert_eq!(q.question, "42");
        assert_eq!(q.difficulty, 0);
    }

    #[test]
    fn non_numeric_difficulty_is_rejected() {
        let result = body(r#"{"question": "Q?", "answer": "A", "category": "3", "difficulty": "hard"}"#)
            .validate();
        assert!(matches!(result, Err(ApiError::Unprocessable(_))));
    }

    #[test]
    fn rejects_missing_or_blank_fields() {
        let cases = [
            r#"{"answer": "A", "category": "3", "difficulty": 2}"#,
            r#"{"question": "", "answer": "A", "category": "3", "difficulty": 2}"#,
            r#"{"question": "Q?", "answer": "A", "category": "", "difficulty": 2}"#,
            r#"{"question": "Q?", "answer": "A", "category": "3", "difficulty": 0}"#,
            r#"{"question": "Q?", "answer": null, "category": "3", "difficulty": 2}"#,
        ];
        for case in cases {
            assert!(
                matches!(body(case).validate(), Err(ApiError::Unprocessable(_))),
                "{case} should be rejected"
            );
        }
    }
}
