// Knowledge aggregation module
// Turns structured portfolio records into self-contained text chunks

pub mod aggregator;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use aggregator::aggregate;

/// Category of a knowledge chunk, carried in metadata so responses can label
/// their sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkKind {
    Profile,
    Project,
    SkillSet,
    Education,
    WorkExperience,
    Certification,
    BlogPost,
    AchievementSet,
}

impl ChunkKind {
    pub const ALL: [Self; 8] = [
        Self::Profile,
        Self::Project,
        Self::SkillSet,
        Self::Education,
        Self::WorkExperience,
        Self::Certification,
        Self::BlogPost,
        Self::AchievementSet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Project => "project",
            Self::SkillSet => "skill-set",
            Self::Education => "education",
            Self::WorkExperience => "work-experience",
            Self::Certification => "certification",
            Self::BlogPost => "blog-post",
            Self::AchievementSet => "achievement-set",
        }
    }
}

impl fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata stored alongside a chunk's content and embedding. Serialized to
/// JSON in the vector store so search results can cite sources without a
/// second lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(rename = "type")]
    pub kind: ChunkKind,
    /// Originating collection name, e.g. "projects_table"
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ChunkMetadata {
    pub fn new(kind: ChunkKind, source: &str) -> Self {
        Self {
            kind,
            source: source.to_string(),
            title: None,
            tags: Vec::new(),
            period: None,
            organisation: None,
            issuer: None,
            date: None,
            url: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// A draft chunk produced by the aggregator: content plus metadata, no
/// embedding yet. Content must make sense without surrounding chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    pub content: String,
    pub metadata: ChunkMetadata,
}
