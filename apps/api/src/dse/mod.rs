pub mod catalog;
pub mod grade;
pub mod handlers;
pub mod matcher;
pub mod scores;
