pub mod bookmark;
pub mod user;
pub mod word;
