pub mod auth;
pub mod collections;
pub mod contact_me;
pub mod content;
pub mod home;
pub mod json_error;
pub mod site;
pub mod system;
pub mod uploads;
