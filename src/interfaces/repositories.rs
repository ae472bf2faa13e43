pub mod collection;
pub mod contact_me;
pub mod content;
pub mod email;
pub mod memory;
pub mod sqlx_collection;
pub mod sqlx_repo;
pub mod storage;
pub mod token;
pub mod user;
