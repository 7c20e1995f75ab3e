#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub full_description: Option<String>,
    /// JSON array of technology tag strings, as stored
    pub tags: Option<String>,
    pub live_link: Option<String>,
    pub github_link: Option<String>,
    pub display_order: i64,
}

impl Project {
    /// Parse the stored JSON tag array. Malformed tag data is treated as
    /// empty rather than failing the whole aggregation.
    pub fn tag_list(&self) -> Vec<String> {
        match &self.tags {
            Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
                warn!("Ignoring malformed tags for project '{}': {}", self.title, e);
                Vec::new()
            }),
            None => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Skill {
    pub id: i64,
    pub name: String,
    pub display_order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Education {
    pub id: i64,
    pub title: String,
    pub period: String,
    pub description: String,
    pub display_order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct WorkExperience {
    pub id: i64,
    pub title: String,
    pub organisation: String,
    pub period: String,
    pub description: String,
    pub display_order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Certification {
    pub id: i64,
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub description: Option<String>,
    pub credential_url: Option<String>,
    pub display_order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub date: String,
    pub read_time: Option<String>,
    pub url: Option<String>,
    pub display_order: i64,
}

// Insert shapes, also used as the `import` command's JSON schema.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub full_description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub live_link: Option<String>,
    #[serde(default)]
    pub github_link: Option<String>,
    #[serde(default)]
    pub display_order: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSkill {
    pub name: String,
    #[serde(default)]
    pub display_order: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewEducation {
    pub title: String,
    pub period: String,
    pub description: String,
    #[serde(default)]
    pub display_order: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewWorkExperience {
    pub title: String,
    pub organisation: String,
    pub period: String,
    pub description: String,
    #[serde(default)]
    pub display_order: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCertification {
    pub name: String,
    pub issuer: String,
    pub date: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub credential_url: Option<String>,
    #[serde(default)]
    pub display_order: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewBlogPost {
    pub title: String,
    pub excerpt: String,
    pub date: String,
    #[serde(default)]
    pub read_time: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub display_order: i64,
}

/// Snapshot of every source collection, the `import` command's file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioSeed {
    pub projects: Vec<NewProject>,
    pub skills: Vec<NewSkill>,
    pub education: Vec<NewEducation>,
    pub work_experience: Vec<NewWorkExperience>,
    pub certifications: Vec<NewCertification>,
    pub blog_posts: Vec<NewBlogPost>,
}

impl PortfolioSeed {
    pub fn record_count(&self) -> usize {
        self.projects.len()
            + self.skills.len()
            + self.education.len()
            + self.work_experience.len()
            + self.certifications.len()
            + self.blog_posts.len()
    }
}
