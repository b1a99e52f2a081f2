pub mod admin;
pub mod auth;
pub mod community;
pub mod health;
pub mod notifications;
pub mod posts;
pub mod profiles;
pub mod social;
