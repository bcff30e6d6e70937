pub mod auth;
pub mod bookmark;
pub mod shared;
pub mod user;
pub mod word;
