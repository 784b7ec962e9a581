pub mod common;
pub mod follows;
pub mod notifications;
pub mod posts;
pub mod profiles;
