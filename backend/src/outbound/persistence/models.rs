//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{user_words, words};

/// Row struct for reading from the words table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = words)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WordRow {
    pub id: i64,
    pub text: String,
    pub translation: String,
    pub level: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating word records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = words)]
pub(crate) struct NewWordRow<'a> {
    pub text: &'a str,
    pub translation: &'a str,
    pub level: &'a str,
}

/// Insertable struct for linking a user to a word.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = user_words)]
pub(crate) struct NewUserWordRow {
    pub user_id: i64,
    pub word_id: i64,
}
