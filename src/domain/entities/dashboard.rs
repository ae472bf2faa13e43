use serde::Serialize;

/// Counters shown on the admin landing page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub projects: i64,
    pub visible_projects: i64,
    pub featured_projects: i64,
    pub certifications: i64,
    pub awards: i64,
    pub skill_categories: i64,
    pub skills: i64,
    pub experience: i64,
    pub education: i64,
    pub messages: i64,
    pub unread_messages: i64,
}
