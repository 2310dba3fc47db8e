//! Zero-sized repositories, one per table family. Each method takes a
//! `&PgPool` and returns raw rows; assembling domain types happens in
//! [`crate::store::postgres`].

pub mod activity_log_repo;
pub mod application_repo;
pub mod condition_repo;
pub mod release_repo;

pub use activity_log_repo::ActivityLogRepo;
pub use application_repo::ApplicationRepo;
pub use condition_repo::ConditionRepo;
pub use release_repo::ReleaseRepo;
