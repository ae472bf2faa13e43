use std::sync::Arc;

use crate::entities::{
    award::Award,
    certification::Certification,
    contact_me::MessageFilter,
    dashboard::DashboardStats,
    education::Education,
    entry::EntryFlag,
    experience::Experience,
    project::Project,
    skill::{Skill, SkillCategory},
};
use crate::errors::AppError;
use crate::repositories::{collection::SharedCollection, contact_me::ContactMeRepository};

pub struct DashboardHandler {
    pub projects: SharedCollection<Project>,
    pub certifications: SharedCollection<Certification>,
    pub awards: SharedCollection<Award>,
    pub skill_categories: SharedCollection<SkillCategory>,
    pub skills: SharedCollection<Skill>,
    pub experience: SharedCollection<Experience>,
    pub education: SharedCollection<Education>,
    pub messages: Arc<dyn ContactMeRepository>,
}

impl DashboardHandler {
    pub async fn stats(&self) -> Result<DashboardStats, AppError> {
        let (projects, visible_projects, featured_projects) = tokio::try_join!(
            self.projects.count(&[]),
            self.projects.count(&[EntryFlag::Visible]),
            self.projects.count(&[EntryFlag::Visible, EntryFlag::Featured]),
        )?;
        let (certifications, awards, skill_categories, skills, experience, education) = tokio::try_join!(
            self.certifications.count(&[]),
            self.awards.count(&[]),
            self.skill_categories.count(&[]),
            self.skills.count(&[]),
            self.experience.count(&[]),
            self.education.count(&[]),
        )?;
        let (messages, unread_messages) = tokio::try_join!(
            self.messages.count_contact_messages(MessageFilter::All),
            self.messages.count_contact_messages(MessageFilter::Unread),
        )?;

        Ok(DashboardStats {
            projects,
            visible_projects,
            featured_projects,
            certifications,
            awards,
            skill_categories,
            skills,
            experience,
            education,
            messages,
            unread_messages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::entry::Entry;
    use crate::repositories::memory::{MemoryCollectionRepo, MemoryContactRepo};

    #[actix_rt::test]
    async fn counts_follow_the_flags() {
        let project = |visible, featured| Project {
            title_en: "p".into(),
            is_visible: visible,
            is_featured: featured,
            ..Project::draft(0, None)
        };
        let dashboard = DashboardHandler {
            projects: Arc::new(MemoryCollectionRepo::with_rows(vec![
                project(true, true),
                project(true, false),
                project(false, true),
            ])),
            certifications: Arc::new(MemoryCollectionRepo::new()),
            awards: Arc::new(MemoryCollectionRepo::new()),
            skill_categories: Arc::new(MemoryCollectionRepo::new()),
            skills: Arc::new(MemoryCollectionRepo::new()),
            experience: Arc::new(MemoryCollectionRepo::new()),
            education: Arc::new(MemoryCollectionRepo::new()),
            messages: Arc::new(MemoryContactRepo::new()),
        };

        let stats = dashboard.stats().await.unwrap();

        assert_eq!(stats.projects, 3);
        assert_eq!(stats.visible_projects, 2);
        assert_eq!(stats.featured_projects, 1);
        assert_eq!(stats.unread_messages, 0);
    }
}
