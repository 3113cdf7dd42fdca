pub mod chat;
pub mod dashboard;
pub mod dispatch;
pub mod generate;
pub mod project;
pub mod report;
pub mod shared;
pub mod template;
pub mod tools;
