use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{categories_map, get_all_categories},
            questions::get_questions_for_category,
        },
        Question,
    },
    server::{app::AppState, error::ApiError, extractors::PathId},
};

use super::ApiResponse;

#[derive(Serialize)]
struct CategoriesList {
    success: bool,
    categories: BTreeMap<i64, String>,
    total_categories: usize,
}

#[derive(Serialize)]
struct CategoryQuestions {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: i64,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesList> {
    let categories = get_all_categories(&pool)
        .await
        .map_err(ApiError::not_found)?;
    let total_categories = categories.len();
    Ok(Json(CategoriesList {
        success: true,
        categories: categories_map(categories),
        total_categories,
    }))
}

// a storage failure here is a 400 while an unparseable id is a 404 from PathId;
// clients already rely on both codes
async fn category_questions(
    State(pool): State<SqlitePool>,
    PathId(id): PathId,
) -> ApiResponse<CategoryQuestions> {
    let questions = get_questions_for_category(&pool, id)
        .await
        .map_err(ApiError::bad_request)?;
    Ok(Json(CategoryQuestions {
        success: true,
        total_questions: questions.len(),
        questions,
        current_category: id,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(category_questions))
        .with_state(state)
}
