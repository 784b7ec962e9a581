pub mod error;
pub mod follow_repo;
pub mod notification_repo;
pub mod pool;
pub mod post_repo;
pub mod profile_repo;
pub mod update;
