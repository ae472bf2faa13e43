pub mod about;
pub mod award;
pub mod bilingual;
pub mod certification;
pub mod contact_me;
pub mod dashboard;
pub mod education;
pub mod entry;
pub mod experience;
pub mod profile;
pub mod project;
pub mod skill;
pub mod token;
pub mod user;
