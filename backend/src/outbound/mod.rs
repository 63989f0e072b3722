//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed word store using Diesel ORM
//! - **gemini**: translation provider backed by the Gemini HTTP API
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod gemini;
pub mod persistence;
