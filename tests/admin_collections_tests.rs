mod common;

use std::sync::Arc;

use common::*;
use portfolio_cms::{
    auth::password::hash_password,
    entities::{
        award::Award,
        entry::Entry,
        project::Project,
        skill::{Skill, SkillCategory},
        user::UserInsert,
    },
    repositories::{memory::MemoryCollectionRepo, user::UserRepository},
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

fn project(title: &str, order: i32) -> Project {
    Project {
        title_en: title.to_string(),
        description_en: format!("{title} description"),
        ..Project::draft(order, None)
    }
}

fn titles(entries: &Value) -> Vec<String> {
    entries
        .as_array()
        .expect("entries should be an array")
        .iter()
        .map(|e| e["title_en"].as_str().unwrap_or_default().to_string())
        .collect()
}

async fn spawn_with_projects(projects: Vec<Project>) -> TestApp {
    let mut stores = Stores::new();
    stores.projects = Arc::new(MemoryCollectionRepo::with_rows(projects));
    TestApp::spawn_with(stores).await
}

#[actix_rt::test]
async fn admin_routes_require_a_token() {
    let app = TestApp::spawn().await;

    let (status, _) = app.get_json("/api/v1/admin/projects", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn non_admin_users_are_forbidden() {
    let app = TestApp::spawn().await;
    let password_hash = hash_password(ADMIN_PASSWORD).expect("hash");
    app.stores
        .users
        .create_user(&UserInsert {
            email: "visitor@example.com".into(),
            password_hash,
            is_admin: false,
        })
        .await
        .expect("seed user");

    let auth: Value = app
        .login("visitor@example.com", ADMIN_PASSWORD)
        .await
        .json()
        .await
        .expect("login body");
    let token = auth["access_token"].as_str().expect("access token");

    let (status, _) = app.get_json("/api/v1/admin/projects", Some(token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn saving_a_new_project_returns_201_and_the_reloaded_list() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let response = app
        .client
        .put(app.url("/api/v1/admin/projects"))
        .bearer_auth(&token)
        .json(&json!({ "title_en": "Portfolio", "description_en": "This site" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(titles(&body["entries"]), vec!["Portfolio"]);
    assert!(body["result"]["id"].is_string());
    assert_eq!(app.stores.projects.rows().len(), 1);
}

#[actix_rt::test]
async fn invalid_entries_are_rejected_without_a_write() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let response = app
        .client
        .put(app.url("/api/v1/admin/projects"))
        .bearer_auth(&token)
        .json(&json!({ "title_en": "", "description_en": "" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.stores.projects.rows().is_empty());
}

#[actix_rt::test]
async fn reorder_moves_the_entry_and_renumbers_the_list() {
    let app = spawn_with_projects(vec![project("A", 0), project("B", 1), project("C", 2)]).await;
    let token = app.admin_token().await;

    let response = app
        .client
        .post(app.url("/api/v1/admin/projects/reorder"))
        .bearer_auth(&token)
        .json(&json!({ "source_index": 2, "destination_index": 0 }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["result"]["status"], "persisted");
    assert_eq!(titles(&body["entries"]), vec!["C", "A", "B"]);

    let mut stored = app.stores.projects.rows();
    stored.sort_by_key(|p| p.order);
    let stored: Vec<(String, i32)> = stored.into_iter().map(|p| (p.title_en, p.order)).collect();
    assert_eq!(
        stored,
        vec![("C".to_string(), 0), ("A".to_string(), 1), ("B".to_string(), 2)]
    );
}

#[actix_rt::test]
async fn reorder_out_of_range_is_a_bad_request() {
    let app = spawn_with_projects(vec![project("A", 0)]).await;
    let token = app.admin_token().await;

    let response = app
        .client
        .post(app.url("/api/v1/admin/projects/reorder"))
        .bearer_auth(&token)
        .json(&json!({ "source_index": 0, "destination_index": 5 }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.stores.projects.ordinal_writes().is_empty());
}

#[actix_rt::test]
async fn delete_needs_confirmation() {
    let app = spawn_with_projects(vec![project("A", 0)]).await;
    let token = app.admin_token().await;
    let id = app.stores.projects.rows()[0].id.expect("seeded id");

    let declined = app
        .client
        .delete(app.url(&format!("/api/v1/admin/projects/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(declined.status(), StatusCode::PRECONDITION_REQUIRED);
    assert_eq!(app.stores.projects.rows().len(), 1);

    let confirmed = app
        .client
        .delete(app.url(&format!("/api/v1/admin/projects/{id}?confirm=true")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(confirmed.status(), StatusCode::OK);
    let body: Value = confirmed.json().await.unwrap();
    assert_eq!(body["result"], "deleted");
    assert!(app.stores.projects.rows().is_empty());
}

#[actix_rt::test]
async fn deleting_an_unknown_id_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let response = app
        .client
        .delete(app.url(&format!("/api/v1/admin/projects/{}?confirm=true", Uuid::new_v4())))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn toggles_flip_visibility_and_featured() {
    let app = spawn_with_projects(vec![project("A", 0)]).await;
    let token = app.admin_token().await;
    let id = app.stores.projects.rows()[0].id.expect("seeded id");

    let visibility: Value = app
        .client
        .post(app.url(&format!("/api/v1/admin/projects/{id}/visibility")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(visibility["result"], false);

    let featured: Value = app
        .client
        .post(app.url(&format!("/api/v1/admin/projects/{id}/featured")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(featured["result"], true);

    let stored = &app.stores.projects.rows()[0];
    assert!(!stored.is_visible);
    assert!(stored.is_featured);
}

#[actix_rt::test]
async fn awards_cannot_be_featured() {
    let mut stores = Stores::new();
    stores.awards = Arc::new(MemoryCollectionRepo::with_rows(vec![Award {
        title_en: "Hackathon".into(),
        issuer_en: "City".into(),
        ..Award::draft(1, None)
    }]));
    let app = TestApp::spawn_with(stores).await;
    let token = app.admin_token().await;
    let id = app.stores.awards.rows()[0].id.expect("seeded id");

    let response = app
        .client
        .post(app.url(&format!("/api/v1/admin/awards/{id}/featured")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn skills_are_listed_per_category() {
    let frontend = Uuid::new_v4();
    let backend = Uuid::new_v4();
    let skill = |name: &str, category: Uuid, order| Skill {
        name: name.to_string(),
        proficiency: 80,
        ..Skill::draft(order, Some(category))
    };

    let mut stores = Stores::new();
    stores.skill_categories = Arc::new(MemoryCollectionRepo::with_rows(vec![
        SkillCategory { id: Some(frontend), name_en: "Frontend".into(), ..SkillCategory::draft(0, None) },
        SkillCategory { id: Some(backend), name_en: "Backend".into(), ..SkillCategory::draft(1, None) },
    ]));
    stores.skills = Arc::new(MemoryCollectionRepo::with_rows(vec![
        skill("React", frontend, 0),
        skill("Rust", backend, 0),
        skill("CSS", frontend, 1),
    ]));
    let app = TestApp::spawn_with(stores).await;
    let token = app.admin_token().await;

    let (status, body) = app
        .get_json(&format!("/api/v1/admin/skills?category_id={frontend}"), Some(&token))
        .await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["React", "CSS"]);
}

#[actix_rt::test]
async fn draft_takes_the_next_ordinal() {
    let app = spawn_with_projects(vec![project("A", 0), project("B", 4)]).await;
    let token = app.admin_token().await;

    let response = app
        .client
        .post(app.url("/api/v1/admin/projects/draft"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["result"]["order"], 5);
    assert!(body["result"]["id"].is_null());
    assert_eq!(app.stores.projects.rows().len(), 2);
}

#[actix_rt::test]
async fn dashboard_counts_collections_and_messages() {
    let app = spawn_with_projects(vec![project("A", 0), project("B", 1)]).await;
    let token = app.admin_token().await;

    let (status, body) = app.get_json("/api/v1/admin/dashboard", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["projects"], 2);
}

#[actix_rt::test]
async fn skills_reorder_within_one_category_only() {
    let frontend = Uuid::new_v4();
    let backend = Uuid::new_v4();
    let skill = |name: &str, category: Uuid, order| Skill {
        name: name.to_string(),
        ..Skill::draft(order, Some(category))
    };

    let mut stores = Stores::new();
    stores.skills = Arc::new(MemoryCollectionRepo::with_rows(vec![
        skill("Rust", backend, 0),
        skill("React", frontend, 0),
        skill("Go", backend, 1),
        skill("Vue", frontend, 1),
    ]));
    let app = TestApp::spawn_with(stores).await;
    let token = app.admin_token().await;

    let unscoped = app
        .client
        .post(app.url("/api/v1/admin/skills/reorder"))
        .bearer_auth(&token)
        .json(&json!({ "source_index": 0, "destination_index": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(unscoped.status(), StatusCode::BAD_REQUEST);
    assert!(app.stores.skills.ordinal_writes().is_empty());

    let unscoped_draft = app
        .client
        .post(app.url("/api/v1/admin/skills/draft"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(unscoped_draft.status(), StatusCode::BAD_REQUEST);

    let scoped = app
        .client
        .post(app.url(&format!("/api/v1/admin/skills/reorder?category_id={backend}")))
        .bearer_auth(&token)
        .json(&json!({ "source_index": 1, "destination_index": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(scoped.status(), StatusCode::OK);

    let orders: Vec<(String, Option<Uuid>, i32)> = app
        .stores
        .skills
        .rows()
        .into_iter()
        .map(|s| (s.name, s.category_id, s.order))
        .collect();
    assert_eq!(
        orders,
        vec![
            ("Rust".to_string(), Some(backend), 1),
            ("React".to_string(), Some(frontend), 0),
            ("Go".to_string(), Some(backend), 0),
            ("Vue".to_string(), Some(frontend), 1),
        ]
    );
}
