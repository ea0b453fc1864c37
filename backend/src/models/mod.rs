pub mod audience;
pub mod common;
pub mod meeting;
pub mod room;
pub mod service;
pub mod user;
