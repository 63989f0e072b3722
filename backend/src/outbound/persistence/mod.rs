//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementation of the [`WordRepository`](crate::domain::ports::WordRepository)
//! port backed by PostgreSQL via Diesel, with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: the repository only translates between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and schema definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: database failures are mapped to
//!   `WordRepositoryError` variants.
//!
//! # Example
//!
//! ```ignore
//! use wordbook::outbound::persistence::{DbPool, DieselWordRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/wordbook")).await?;
//! let repo = DieselWordRepository::new(pool);
//! ```

mod diesel_word_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_word_repository::DieselWordRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
