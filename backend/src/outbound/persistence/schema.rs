//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Shared word catalogue.
    ///
    /// One row per normalised word; `text` carries a unique constraint.
    words (id) {
        /// Primary key: store-assigned sequence value.
        id -> Int8,
        /// Normalised source-language text (max 64 characters, unique).
        text -> Varchar,
        /// Target-language translation.
        translation -> Text,
        /// CEFR level code, `A1` through `C2`.
        level -> Varchar,
        /// Creation timestamp; never updated.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Many-to-many link between users and the words they have learned.
    user_words (user_id, word_id) {
        /// Identifier issued by the authentication subsystem.
        user_id -> Int8,
        /// Foreign key to `words.id`.
        word_id -> Int8,
        /// When the user first added the word.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(user_words -> words (word_id));

diesel::allow_tables_to_appear_in_same_query!(user_words, words);
