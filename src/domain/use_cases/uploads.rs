use std::{fmt, str::FromStr};

use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::AppError;
use crate::repositories::storage::BlobStorage;

/// Storage buckets the admin may write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bucket {
    ProjectMedia,
    AwardsIcons,
    Certifications,
    ProfileImages,
    Resumes,
    Education,
    CompanyLogos,
    TechLogos,
}

impl Bucket {
    pub const ALL: [Bucket; 8] = [
        Bucket::ProjectMedia,
        Bucket::AwardsIcons,
        Bucket::Certifications,
        Bucket::ProfileImages,
        Bucket::Resumes,
        Bucket::Education,
        Bucket::CompanyLogos,
        Bucket::TechLogos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::ProjectMedia => "project-media",
            Bucket::AwardsIcons => "awards-icons",
            Bucket::Certifications => "certifications",
            Bucket::ProfileImages => "profile-images",
            Bucket::Resumes => "resumes",
            Bucket::Education => "education",
            Bucket::CompanyLogos => "company-logos",
            Bucket::TechLogos => "tech-logos",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bucket::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown bucket: {s}")))
    }
}

/// What an upload slot accepts, checked against the sniffed content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Pdf,
    Video,
    #[default]
    Any,
}

impl FileKind {
    fn accepts(&self, mime: &str) -> bool {
        match self {
            FileKind::Image => mime.starts_with("image/"),
            FileKind::Pdf => mime == "application/pdf",
            FileKind::Video => mime.starts_with("video/"),
            FileKind::Any => true,
        }
    }
}

impl FromStr for FileKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "image" => Ok(FileKind::Image),
            "pdf" => Ok(FileKind::Pdf),
            "video" => Ok(FileKind::Video),
            "any" | "" => Ok(FileKind::Any),
            other => Err(AppError::InvalidInput(format!("Unknown file kind: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedFile {
    pub path: String,
    pub url: String,
}

pub struct UploadHandler<S>
where
    S: BlobStorage,
{
    pub storage: S,
    max_bytes: usize,
}

impl<S> UploadHandler<S>
where
    S: BlobStorage,
{
    pub fn new(storage: S, max_bytes: usize) -> Self {
        UploadHandler { storage, max_bytes }
    }

    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload(
        &self,
        bucket: Bucket,
        kind: FileKind,
        file_name: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<UploadedFile, AppError> {
        if bytes.is_empty() {
            return Err(AppError::InvalidInput("File is empty".into()));
        }
        if bytes.len() > self.max_bytes {
            return Err(AppError::InvalidInput(format!(
                "File exceeds the {} MB limit",
                self.max_bytes / (1024 * 1024)
            )));
        }

        let (content_type, sniffed_ext) = match infer::get(&bytes) {
            Some(t) => (t.mime_type().to_string(), Some(t.extension())),
            None => ("application/octet-stream".to_string(), None),
        };
        if !kind.accepts(&content_type) {
            return Err(AppError::InvalidInput(format!(
                "Expected a {kind:?} file but received {content_type}"
            )));
        }

        let ext = file_name
            .and_then(extension_of)
            .or_else(|| sniffed_ext.map(String::from))
            .unwrap_or_else(|| "bin".to_string());
        let path = generated_name(&ext);

        let stored = self.storage.upload(bucket.as_str(), &path, bytes, &content_type).await?;
        let url = self.storage.public_url(bucket.as_str(), &stored);

        tracing::info!(%bucket, path = %stored, "File uploaded");
        Ok(UploadedFile { path: stored, url })
    }

    /// Removes the object a public URL points at. The object name is the last
    /// path segment of the URL.
    pub async fn delete(&self, bucket: Bucket, public_url: &str) -> Result<(), AppError> {
        let name = object_name(public_url)?;
        self.storage.remove(bucket.as_str(), &[name.clone()]).await?;
        tracing::info!(%bucket, path = %name, "File deleted");
        Ok(())
    }
}

fn extension_of(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    (!ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric())).then_some(ext)
}

fn generated_name(ext: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect();
    format!("{}-{}.{ext}", Utc::now().timestamp_millis(), suffix.to_ascii_lowercase())
}

fn object_name(public_url: &str) -> Result<String, AppError> {
    let url = Url::parse(public_url).map_err(|_| AppError::InvalidInput("Invalid file URL".into()))?;
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(String::from)
        .ok_or_else(|| AppError::InvalidInput("File URL has no object name".into()))
}
