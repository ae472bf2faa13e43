pub mod auth;
pub mod collection;
pub mod contact;
pub mod content;
pub mod dashboard;
pub mod editor;
pub mod extractors;
pub mod reorder;
pub mod showcase;
pub mod uploads;
