pub mod notification;
pub mod post;
pub mod report;
pub mod shared;
pub mod social;
pub mod user;
