use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub difficulty: i64,
}

/// A question that passed validation and has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: String,
    pub difficulty: i64,
}

const SELECT_QUESTIONS: &str = "SELECT id, question, answer, category, difficulty FROM questions";

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(&format!("{SELECT_QUESTIONS} ORDER BY id"))
        .fetch_all(pool)
        .await
}

pub async fn get_question_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(&format!("{SELECT_QUESTIONS} WHERE id = ?1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn count_questions(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await
}

pub async fn create_question(pool: &SqlitePool, question: &NewQuestion) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
        INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&question.question)
    .bind(&question.answer)
    .bind(&question.category)
    .bind(question.difficulty)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns the number of deleted rows, zero when the id is unknown.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let deleted = sqlx::query("DELETE FROM questions WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(deleted)
}

/// Case-insensitive substring match on the question text.
// folded in Rust: SQLite's lower() only knows ASCII
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let term = term.to_lowercase();
    let questions = get_all_questions(pool).await?;
    Ok(questions
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&term))
        .collect())
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category_id: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(&format!("{SELECT_QUESTIONS} WHERE category = ?1 ORDER BY id"))
        .bind(category_id.to_string())
        .fetch_all(pool)
        .await
}

/// Questions not yet asked, optionally restricted to one category.
/// The exclusion list is bound as one JSON array, so its length is not capped by
/// SQLite's bind-variable limit.
pub async fn get_quiz_candidates(
    pool: &SqlitePool,
    category_id: Option<i64>,
    previous: &[i64],
) -> sqlx::Result<Vec<Question>> {
    let previous = serde_json::to_string(previous).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
    sqlx::query_as::<_, Question>(&format!(
        "{SELECT_QUESTIONS} WHERE (?1 IS NULL OR category = ?1) \
         AND id NOT IN (SELECT value FROM json_each(?2)) ORDER BY id"
    ))
    .bind(category_id.map(|id| id.to_string()))
    .bind(previous)
    .fetch_all(pool)
    .await
}

pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for question in questions {
        sqlx::query(
            r#"
            INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                question = excluded.question,
                answer = excluded.answer,
                category = excluded.category,
                difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(question.question)
        .bind(question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn mountain() -> NewQuestion {
        NewQuestion {
            question: "Which is the highest mountain in the world?".to_owned(),
            answer: "Mount Everest".to_owned(),
            category: "3".to_owned(),
            difficulty: 3,
        }
    }

    #[tokio::test]
    async fn all_questions_ordered_by_id() {
        let pool = test_pool().await;

        let questions = get_all_questions(&pool).await.unwrap();
        assert_eq!(questions.len(), 19);
        assert!(questions.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(count_questions(&pool).await.unwrap(), 19);
    }

    #[tokio::test]
    async fn create_then_delete() {
        let pool = test_pool().await;

        let id = create_question(&pool, &mountain()).await.unwrap();
        let stored = get_question_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(stored.answer, "Mount Everest");
        assert_eq!(stored.category, "3");
        assert_eq!(count_questions(&pool).await.unwrap(), 20);

        assert_eq!(delete_question(&pool, id).await.unwrap(), 1);
        assert!(get_question_by_id(&pool, id).await.unwrap().is_none());
        assert_eq!(delete_question(&pool, id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_category_tag_is_stored() {
        let pool = test_pool().await;

        let mut question = mountain();
        question.category = "Geography".to_owned();
        let id = create_question(&pool, &question).await.unwrap();

        let stored = get_question_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(stored.category, "Geography");
    }

    #[tokio::test]
    async fn search_ignores_case() {
        let pool = test_pool().await;

        let found = search_questions(&pool, "cassius CLAY").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].answer, "Muhammad Ali");

        assert!(search_questions(&pool, "no such phrase").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let pool = test_pool().await;

        let mut question = mountain();
        question.question = "Über welchen Fluss führt die Brücke?".to_owned();
        let id = create_question(&pool, &question).await.unwrap();

        for term in ["über", "ÜBER", "brücke", "BRÜCKE"] {
            let found = search_questions(&pool, term).await.unwrap();
            assert_eq!(found.len(), 1, "{term}");
            assert_eq!(found[0].id, id);
        }
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let pool = test_pool().await;

        assert!(search_questions(&pool, "%").await.unwrap().is_empty());
        assert!(search_questions(&pool, "_").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn questions_for_category() {
        let pool = test_pool().await;

        let science = get_questions_for_category(&pool, 1).await.unwrap();
        assert_eq!(science.len(), 3);
        assert!(science.iter().all(|q| q.category == "1"));

        assert!(get_questions_for_category(&pool, 99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn quiz_candidates_exclude_previous() {
        let pool = test_pool().await;

        let all = get_quiz_candidates(&pool, None, &[]).await.unwrap();
        assert_eq!(all.len(), 19);

        let science = get_quiz_candidates(&pool, Some(1), &[20, 21]).await.unwrap();
        assert_eq!(science.len(), 1);
        assert_eq!(science[0].id, 22);

        let none_left = get_quiz_candidates(&pool, Some(1), &[20, 21, 22]).await.unwrap();
        assert!(none_left.is_empty());
    }

    #[tokio::test]
    async fn quiz_candidates_with_long_exclusion_list() {
        let pool = test_pool().await;

        let mut previous: Vec<i64> = (1000..41000).collect();
        previous.push(2);
        let all = get_quiz_candidates(&pool, None, &previous).await.unwrap();
        assert_eq!(all.len(), 18);
        assert!(all.iter().all(|q| q.id != 2));

        previous.extend([20, 21, 22]);
        assert!(get_quiz_candidates(&pool, Some(1), &previous)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn import_keeps_ids() {
        let pool = test_pool().await;

        import_questions(
            &pool,
            vec![Question {
                id: 100,
                question: "Imported?".to_owned(),
                answer: "Yes".to_owned(),
                category: "1".to_owned(),
                difficulty: 1,
            }],
        )
        .await
        .unwrap();

        let imported = get_question_by_id(&pool, 100).await.unwrap().unwrap();
        assert_eq!(imported.answer, "Yes");
    }
}
