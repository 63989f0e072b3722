//! PostgreSQL-backed `WordRepository` implementation using Diesel ORM.
//!
//! Uniqueness of `words.text` is enforced by the database; a unique violation
//! on insert surfaces as [`WordRepositoryError::Conflict`] so the service can
//! fall back to the winning record.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{WordRepository, WordRepositoryError};
use crate::domain::{CefrLevel, NewWord, Translation, UserId, Word, WordId, WordText};

use super::models::{NewUserWordRow, NewWordRow, WordRow};
use super::pool::{DbPool, PoolError};
use super::schema::{user_words, words};

/// Diesel-backed implementation of the `WordRepository` port.
#[derive(Clone)]
pub struct DieselWordRepository {
    pool: DbPool,
}

impl DieselWordRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> WordRepositoryError {
    WordRepositoryError::connection(error.into_message())
}

/// Map Diesel errors to word store errors.
fn map_diesel_error(error: DieselError) -> WordRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => WordRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => WordRepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            WordRepositoryError::connection("database connection error")
        }
        _ => WordRepositoryError::query("database error"),
    }
}

fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

fn is_foreign_key_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)
    )
}

/// Convert a database row to a domain word.
fn row_to_word(row: WordRow) -> Result<Word, WordRepositoryError> {
    let id = row.id;
    let invalid = |err: &dyn std::fmt::Display| {
        WordRepositoryError::query(format!("stored word {id} is invalid: {err}"))
    };
    let text = WordText::parse(&row.text).map_err(|err| invalid(&err))?;
    let translation = Translation::new(&row.translation).map_err(|err| invalid(&err))?;
    let level: CefrLevel = row.level.parse().map_err(|err| invalid(&err))?;
    Ok(Word {
        id: WordId::new(row.id),
        text,
        translation,
        level,
        created_at: row.created_at,
    })
}

fn rows_to_words(rows: Vec<WordRow>) -> Result<Vec<Word>, WordRepositoryError> {
    rows.into_iter().map(row_to_word).collect()
}

#[async_trait]
impl WordRepository for DieselWordRepository {
    async fn find_by_text(&self, text: &WordText) -> Result<Option<Word>, WordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<WordRow> = words::table
            .filter(words::text.eq(text.as_str()))
            .select(WordRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_word).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Word>, WordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<WordRow> = words::table
            .order(words::id.asc())
            .select(WordRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_words(rows)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Word>, WordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<WordRow> = user_words::table
            .inner_join(words::table)
            .filter(user_words::user_id.eq(user_id.get()))
            .order(words::id.asc())
            .select(WordRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_words(rows)
    }

    async fn create_word(&self, word: &NewWord) -> Result<Word, WordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewWordRow {
            text: word.text.as_str(),
            translation: word.translation.as_str(),
            level: word.level.code(),
        };

        let row: WordRow = diesel::insert_into(words::table)
            .values(&new_row)
            .returning(WordRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    WordRepositoryError::conflict(word.text.as_str())
                } else {
                    map_diesel_error(err)
                }
            })?;

        row_to_word(row)
    }

    async fn associate_user(
        &self,
        word_id: WordId,
        user_id: UserId,
    ) -> Result<(), WordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let link = NewUserWordRow {
            user_id: user_id.get(),
            word_id: word_id.get(),
        };

        diesel::insert_into(user_words::table)
            .values(&link)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    WordRepositoryError::not_found(format!("word {word_id}"))
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn dissociate_user(
        &self,
        user_id: UserId,
        word_id: WordId,
    ) -> Result<(), WordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(
            user_words::table.filter(
                user_words::user_id
                    .eq(user_id.get())
                    .and(user_words::word_id.eq(word_id.get())),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if removed == 0 {
            return Err(WordRepositoryError::not_found(format!(
                "word {word_id} is not linked to user {user_id}"
            )));
        }
        Ok(())
    }
}
