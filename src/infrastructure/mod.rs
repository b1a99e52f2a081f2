pub mod audit;
pub mod cache;
pub mod database;
pub mod moderation;
pub mod notifications;
pub mod repositories;
pub mod security;
