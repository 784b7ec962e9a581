/*
 * Responsibility
 * - Domain services that stay independent of HTTP and SQL details
 */
pub mod auth;
pub mod partial_update;
