//! Read-only views for the public site. Only visible rows are ever returned.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::entities::{
    about::LocalizedAbout,
    award::{Award, LocalizedAward},
    bilingual::Locale,
    certification::{Certification, LocalizedCertification},
    education::{Education, LocalizedEducation},
    experience::{Experience, LocalizedExperience},
    profile::Profile,
    project::{LocalizedProject, Project},
    skill::{group_skills, Skill, SkillCategory, SkillGroup},
};
use crate::errors::AppError;
use crate::repositories::{collection::SharedCollection, content::ContentRepository};

#[derive(Debug, Serialize)]
pub struct SiteHome {
    pub locale: Locale,
    pub profile: Option<Profile>,
    pub about: Option<LocalizedAbout>,
    pub featured_projects: Vec<LocalizedProject>,
    pub featured_certifications: Vec<LocalizedCertification>,
    pub experience: Vec<LocalizedExperience>,
    pub education: Vec<LocalizedEducation>,
    pub skills: Vec<SkillGroup>,
    pub awards: Vec<LocalizedAward>,
}

#[derive(Debug, Serialize)]
pub struct ProjectsPage {
    pub locale: Locale,
    pub projects: Vec<LocalizedProject>,
    /// Every technology used by a visible project, sorted and deduplicated.
    pub technologies: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CertificationsPage {
    pub locale: Locale,
    pub certifications: Vec<LocalizedCertification>,
}

pub struct ShowcaseHandler {
    pub projects: SharedCollection<Project>,
    pub certifications: SharedCollection<Certification>,
    pub awards: SharedCollection<Award>,
    pub skill_categories: SharedCollection<SkillCategory>,
    pub skills: SharedCollection<Skill>,
    pub experience: SharedCollection<Experience>,
    pub education: SharedCollection<Education>,
    pub content: Arc<dyn ContentRepository>,
}

impl ShowcaseHandler {
    #[tracing::instrument(skip(self))]
    pub async fn home(&self, locale: Locale) -> Result<SiteHome, AppError> {
        let (profile, about) = tokio::try_join!(self.content.get_profile(), self.content.get_about())?;
        let (projects, certifications, awards) = tokio::try_join!(
            self.projects.list_visible(true),
            self.certifications.list_visible(true),
            self.awards.list_visible(false),
        )?;
        let (categories, skills, experience, education) = tokio::try_join!(
            self.skill_categories.list_visible(false),
            self.skills.list_visible(false),
            self.experience.list_visible(false),
            self.education.list_visible(false),
        )?;

        Ok(SiteHome {
            locale,
            profile,
            about: about.map(|a| a.localize(locale)),
            featured_projects: projects.iter().map(|p| p.localize(locale)).collect(),
            featured_certifications: certifications.iter().map(|c| c.localize(locale)).collect(),
            experience: experience.iter().map(|e| e.localize(locale)).collect(),
            education: education.iter().map(|e| e.localize(locale)).collect(),
            skills: group_skills(&categories, &skills, locale),
            awards: awards.iter().map(|a| a.localize(locale)).collect(),
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn projects(&self, locale: Locale) -> Result<ProjectsPage, AppError> {
        let projects = self.projects.list_visible(false).await?;

        let technologies: BTreeSet<String> = projects
            .iter()
            .flat_map(|p| p.technologies.iter())
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();

        Ok(ProjectsPage {
            locale,
            projects: projects.iter().map(|p| p.localize(locale)).collect(),
            technologies: technologies.into_iter().collect(),
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn certifications(&self, locale: Locale) -> Result<CertificationsPage, AppError> {
        let certifications = self.certifications.list_visible(false).await?;
        Ok(CertificationsPage {
            locale,
            certifications: certifications.iter().map(|c| c.localize(locale)).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::entry::Entry;
    use crate::repositories::memory::{MemoryCollectionRepo, MemoryContentRepo};

    fn project(title: &str, es: Option<&str>, tech: &[&str], visible: bool, featured: bool) -> Project {
        Project {
            title_en: title.into(),
            title_es: es.map(String::from),
            description_en: "d".into(),
            technologies: tech.iter().map(|t| t.to_string()).collect(),
            is_visible: visible,
            is_featured: featured,
            ..Project::draft(0, None)
        }
    }

    fn showcase(projects: Vec<Project>, categories: Vec<SkillCategory>, skills: Vec<Skill>) -> ShowcaseHandler {
        ShowcaseHandler {
            projects: Arc::new(MemoryCollectionRepo::with_rows(projects)),
            certifications: Arc::new(MemoryCollectionRepo::new()),
            awards: Arc::new(MemoryCollectionRepo::new()),
            skill_categories: Arc::new(MemoryCollectionRepo::with_rows(categories)),
            skills: Arc::new(MemoryCollectionRepo::with_rows(skills)),
            experience: Arc::new(MemoryCollectionRepo::new()),
            education: Arc::new(MemoryCollectionRepo::new()),
            content: Arc::new(MemoryContentRepo::new()),
        }
    }

    #[actix_rt::test]
    async fn technologies_are_a_sorted_set_of_visible_projects() {
        let site = showcase(
            vec![
                project("A", None, &["Rust", "Actix"], true, false),
                project("B", None, &["Rust", " Postgres "], true, false),
                project("C", None, &["Cobol"], false, false),
            ],
            vec![],
            vec![],
        );

        let page = site.projects(Locale::En).await.unwrap();

        assert_eq!(page.technologies, vec!["Actix", "Postgres", "Rust"]);
        assert_eq!(page.projects.len(), 2);
    }

    #[actix_rt::test]
    async fn home_shows_only_featured_projects_in_the_requested_language() {
        let site = showcase(
            vec![
                project("Shop", Some("Tienda"), &[], true, true),
                project("Blog", Some("Blog ES"), &[], true, false),
                project("Secret", None, &[], false, true),
            ],
            vec![],
            vec![],
        );

        let home = site.home(Locale::Es).await.unwrap();

        let titles: Vec<_> = home.featured_projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Tienda"]);
        assert!(home.profile.is_none());
    }

    #[actix_rt::test]
    async fn empty_skill_categories_are_left_out() {
        let mut backend = SkillCategory { name_en: "Backend".into(), ..SkillCategory::draft(0, None) };
        backend.assign_id(uuid::Uuid::new_v4());
        let mut design = SkillCategory { name_en: "Design".into(), ..SkillCategory::draft(1, None) };
        design.assign_id(uuid::Uuid::new_v4());
        let hidden_skill = Skill { name: "Figma".into(), is_visible: false, ..Skill::draft(0, design.id) };
        let rust = Skill { name: "Rust".into(), ..Skill::draft(0, backend.id) };

        let site = showcase(vec![], vec![backend, design], vec![rust, hidden_skill]);
        let home = site.home(Locale::En).await.unwrap();

        assert_eq!(home.skills.len(), 1);
        assert_eq!(home.skills[0].name, "Backend");
        assert_eq!(home.skills[0].skills[0].name, "Rust");
    }
}
