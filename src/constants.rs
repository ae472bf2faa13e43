use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Column holding the display ordinal of every reorderable table.
pub const ORDINAL_COLUMN: &str = r#""order""#;

/// Contact submissions allowed per email address inside one window.
pub const CONTACT_EMAIL_LIMIT: u32 = 2;
pub const CONTACT_EMAIL_WINDOW_SECS: u64 = 3600;
