//! Row structs and request DTOs.
//!
//! Row structs mirror table columns and convert into the domain types of
//! `releasegate_core`. `Create*` / `Update*` DTOs carry a `validated()`
//! step that every backend relies on before writing.

pub mod activity_log;
pub mod application;
pub mod condition;
pub mod release;
