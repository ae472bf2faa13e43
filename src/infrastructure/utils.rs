pub mod dates;
pub mod markdown;
pub mod valid_uuid;
