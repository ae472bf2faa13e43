#![allow(dead_code)]

use std::{net::TcpListener, sync::Arc, time::Duration};

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use portfolio_cms::{
    entities::{
        award::Award,
        certification::Certification,
        education::Education,
        experience::Experience,
        project::Project,
        skill::{Skill, SkillCategory},
        token::AuthResponse,
    },
    middlewares::auth::AuthMiddleware,
    repositories::{
        memory::{MemoryCollectionRepo, MemoryContactRepo, MemoryContentRepo, MemoryStorage, MemoryUserRepo},
        storage::BlobStorage,
    },
    routes::configure_routes,
    settings::AppConfig,
    AppState, Backends,
};
use reqwest::Client;
use serde_json::{json, Value};

pub const ADMIN_EMAIL: &str = "owner@example.com";
pub const ADMIN_PASSWORD: &str = "Sunset#Harbor42";

/// Handles on the in-memory backends so tests can seed and inspect storage.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<MemoryUserRepo>,
    pub content: Arc<MemoryContentRepo>,
    pub messages: Arc<MemoryContactRepo>,
    pub projects: Arc<MemoryCollectionRepo<Project>>,
    pub certifications: Arc<MemoryCollectionRepo<Certification>>,
    pub awards: Arc<MemoryCollectionRepo<Award>>,
    pub skill_categories: Arc<MemoryCollectionRepo<SkillCategory>>,
    pub skills: Arc<MemoryCollectionRepo<Skill>>,
    pub experience: Arc<MemoryCollectionRepo<Experience>>,
    pub education: Arc<MemoryCollectionRepo<Education>>,
    pub storage: Arc<MemoryStorage>,
}

impl Stores {
    pub fn new() -> Self {
        Stores {
            users: Arc::new(MemoryUserRepo::new()),
            content: Arc::new(MemoryContentRepo::new()),
            messages: Arc::new(MemoryContactRepo::new()),
            projects: Arc::new(MemoryCollectionRepo::new()),
            certifications: Arc::new(MemoryCollectionRepo::new()),
            awards: Arc::new(MemoryCollectionRepo::new()),
            skill_categories: Arc::new(MemoryCollectionRepo::new()),
            skills: Arc::new(MemoryCollectionRepo::new()),
            experience: Arc::new(MemoryCollectionRepo::new()),
            education: Arc::new(MemoryCollectionRepo::new()),
            storage: Arc::new(MemoryStorage::new()),
        }
    }

    fn backends(&self) -> Backends {
        Backends {
            users: self.users.clone(),
            content: self.content.clone(),
            messages: self.messages.clone(),
            projects: self.projects.clone(),
            certifications: self.certifications.clone(),
            awards: self.awards.clone(),
            skill_categories: self.skill_categories.clone(),
            skills: self.skills.clone(),
            experience: self.experience.clone(),
            education: self.education.clone(),
            storage: Some(self.storage.clone() as Arc<dyn BlobStorage>),
            notifier: None,
        }
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: "integration_test_access_secret_at_least_32_chars".to_string(),
        refresh_token_secret: "integration_test_refresh_secret_at_least_32_chars".to_string(),
        worker_count: 1,
        ..Default::default()
    }
}

pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub stores: Stores,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(Stores::new()).await
    }

    pub async fn spawn_with(stores: Stores) -> Self {
        let config = test_config();
        let state = web::Data::new(AppState::from_backends(&config, stores.backends()));

        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
        let port = listener.local_addr().expect("No local address").port();
        let address = format!("http://127.0.0.1:{}", port);

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .wrap(AuthMiddleware)
                .wrap(NormalizePath::trim())
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(config.worker_count)
        .run();

        tokio::spawn(server);

        let client = Client::new();
        while client.get(&format!("{}/", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        TestApp { address, client, stores }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/auth/register"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("register request failed")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request failed")
    }

    /// Registers the site owner and returns their tokens.
    pub async fn admin_tokens(&self) -> AuthResponse {
        let registered = self.register(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert_eq!(registered.status(), reqwest::StatusCode::CREATED);

        self.login(ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .json::<AuthResponse>()
            .await
            .expect("login response was not an AuthResponse")
    }

    pub async fn admin_token(&self) -> String {
        self.admin_tokens().await.access_token
    }

    pub async fn get_json(&self, path: &str, token: Option<&str>) -> (reqwest::StatusCode, Value) {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.expect("request failed");
        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }
}
