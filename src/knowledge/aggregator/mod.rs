#[cfg(test)]
mod tests;

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::config::ProfileConfig;
use crate::database::sqlite::models::{
    BlogPost, Certification, Education, Project, Skill, WorkExperience,
};
use crate::database::sqlite::queries::{
    BlogPostQueries, CertificationQueries, EducationQueries, ProjectQueries, SkillQueries,
    WorkExperienceQueries,
};
use crate::knowledge::{ChunkKind, ChunkMetadata, KnowledgeChunk};
use crate::{Result, UrsaError};

/// Read every source collection and produce the full draft chunk list.
///
/// Fail-fast: an error reading any collection aborts the run, so a partial
/// knowledge base is never handed to the embedding step. The profile chunk
/// always comes first and the achievements chunk last; everything else
/// follows its collection's display order.
#[inline]
pub async fn aggregate(pool: &SqlitePool, profile: &ProfileConfig) -> Result<Vec<KnowledgeChunk>> {
    let mut chunks = vec![profile_chunk(profile)];

    let projects = ProjectQueries::list_all(pool)
        .await
        .map_err(|e| UrsaError::Aggregation(format!("Failed to read projects: {e}")))?;
    chunks.extend(projects.iter().map(project_chunk));

    let skills = SkillQueries::list_all(pool)
        .await
        .map_err(|e| UrsaError::Aggregation(format!("Failed to read skills: {e}")))?;
    if let Some(chunk) = skills_chunk(&profile.owner_name, &skills) {
        chunks.push(chunk);
    }

    let education = EducationQueries::list_all(pool)
        .await
        .map_err(|e| UrsaError::Aggregation(format!("Failed to read education: {e}")))?;
    chunks.extend(education.iter().map(education_chunk));

    let work = WorkExperienceQueries::list_all(pool)
        .await
        .map_err(|e| UrsaError::Aggregation(format!("Failed to read work experience: {e}")))?;
    chunks.extend(work.iter().map(work_experience_chunk));

    let certifications = CertificationQueries::list_all(pool)
        .await
        .map_err(|e| UrsaError::Aggregation(format!("Failed to read certifications: {e}")))?;
    chunks.extend(certifications.iter().map(certification_chunk));

    let posts = BlogPostQueries::list_all(pool)
        .await
        .map_err(|e| UrsaError::Aggregation(format!("Failed to read blog posts: {e}")))?;
    chunks.extend(posts.iter().map(blog_post_chunk));

    if let Some(chunk) = achievements_chunk(profile) {
        chunks.push(chunk);
    }

    for chunk in &chunks {
        debug!(
            "Aggregated chunk: {} - {}",
            chunk.metadata.kind,
            chunk.metadata.title.as_deref().unwrap_or("untitled")
        );
    }
    info!("Aggregated {} knowledge chunks", chunks.len());

    Ok(chunks)
}

/// Hand-authored identity chunk, built from static config facts so baseline
/// identity questions are answerable even when every collection is empty
pub fn profile_chunk(profile: &ProfileConfig) -> KnowledgeChunk {
    let mut content = format!("I am {}", profile.owner_name);
    if !profile.headline.is_empty() {
        content.push_str(&format!(", {}", profile.headline));
    }
    content.push('.');
    if !profile.summary.is_empty() {
        content.push_str(&format!("\n\n{}", profile.summary));
    }

    let mut contact_lines = Vec::new();
    if !profile.email.is_empty() {
        contact_lines.push(format!("- Email: {}", profile.email));
    }
    if !profile.linkedin.is_empty() {
        contact_lines.push(format!("- LinkedIn: {}", profile.linkedin));
    }
    if !profile.portfolio_url.is_empty() {
        contact_lines.push(format!("- Portfolio: {}", profile.portfolio_url));
    }
    if !contact_lines.is_empty() {
        content.push_str("\n\nContact Information:\n");
        content.push_str(&contact_lines.join("\n"));
    }

    KnowledgeChunk {
        content,
        metadata: ChunkMetadata::new(ChunkKind::Profile, "about_section")
            .with_title(format!("About {}", profile.owner_name)),
    }
}

/// One self-contained block per project so a retrieved chunk stands on its
/// own without its neighbors
pub fn project_chunk(project: &Project) -> KnowledgeChunk {
    let tags = project.tag_list();
    let mut content = format!(
        "Project: {}\n\nDescription: {}",
        project.title, project.description
    );

    if let Some(full) = &project.full_description {
        content.push_str(&format!("\n\nFull Description: {full}"));
    }

    if tags.is_empty() {
        content.push_str("\n\nTechnologies: N/A");
    } else {
        content.push_str(&format!("\n\nTechnologies: {}", tags.join(", ")));
    }

    if let Some(live) = &project.live_link {
        content.push_str(&format!("\n\nLive Demo: {live}"));
    }
    if let Some(github) = &project.github_link {
        content.push_str(&format!("\nGitHub: {github}"));
    }

    let mut metadata = ChunkMetadata::new(ChunkKind::Project, "projects_table")
        .with_title(project.title.clone());
    metadata.tags = tags;

    KnowledgeChunk { content, metadata }
}

/// Single aggregate chunk over all skill names. Individual skill names carry
/// too little retrievable signal to stand alone.
pub fn skills_chunk(owner_name: &str, skills: &[Skill]) -> Option<KnowledgeChunk> {
    if skills.is_empty() {
        return None;
    }

    let names: Vec<String> = skills.iter().map(|s| s.name.clone()).collect();
    let content = format!(
        "Technical Skills and Technologies:\n\n{} is proficient in the following technologies and tools: {}.\n\nThese skills span programming languages, frameworks, cloud platforms, AI/ML tools, and development technologies.",
        owner_name,
        names.join(", ")
    );

    let mut metadata = ChunkMetadata::new(ChunkKind::SkillSet, "skills_table")
        .with_title("Technical Skills");
    metadata.tags = names;

    Some(KnowledgeChunk { content, metadata })
}

pub fn education_chunk(education: &Education) -> KnowledgeChunk {
    let content = format!(
        "Education: {}\n\nPeriod: {}\n\nDetails: {}",
        education.title, education.period, education.description
    );

    let mut metadata = ChunkMetadata::new(ChunkKind::Education, "education_table")
        .with_title(education.title.clone());
    metadata.period = Some(education.period.clone());

    KnowledgeChunk { content, metadata }
}

pub fn work_experience_chunk(work: &WorkExperience) -> KnowledgeChunk {
    let content = format!(
        "Work Experience: {}\n\nOrganization: {}\n\nPeriod: {}\n\nDescription: {}",
        work.title, work.organisation, work.period, work.description
    );

    let mut metadata = ChunkMetadata::new(ChunkKind::WorkExperience, "work_experience_table")
        .with_title(work.title.clone());
    metadata.organisation = Some(work.organisation.clone());
    metadata.period = Some(work.period.clone());

    KnowledgeChunk { content, metadata }
}

pub fn certification_chunk(certification: &Certification) -> KnowledgeChunk {
    let mut content = format!(
        "Certification: {}\n\nIssuer: {}\n\nDate: {}",
        certification.name, certification.issuer, certification.date
    );

    if let Some(description) = &certification.description {
        content.push_str(&format!("\n\nDescription: {description}"));
    }
    if let Some(url) = &certification.credential_url {
        content.push_str(&format!("\nCredential URL: {url}"));
    }

    let mut metadata = ChunkMetadata::new(ChunkKind::Certification, "certifications_table")
        .with_title(certification.name.clone());
    metadata.issuer = Some(certification.issuer.clone());
    metadata.date = Some(certification.date.clone());

    KnowledgeChunk { content, metadata }
}

pub fn blog_post_chunk(post: &BlogPost) -> KnowledgeChunk {
    let mut content = format!(
        "Blog Post: {}\n\nExcerpt: {}\n\nPublished: {}",
        post.title, post.excerpt, post.date
    );

    if let Some(read_time) = &post.read_time {
        content.push_str(&format!("\n\nRead Time: {read_time}"));
    }
    if let Some(url) = &post.url {
        content.push_str(&format!("\nLink: {url}"));
    }

    let mut metadata =
        ChunkMetadata::new(ChunkKind::BlogPost, "blog_posts_table").with_title(post.title.clone());
    metadata.date = Some(post.date.clone());
    metadata.url = post.url.clone();

    KnowledgeChunk { content, metadata }
}

/// Hand-authored recognitions chunk, from config rather than source rows
pub fn achievements_chunk(profile: &ProfileConfig) -> Option<KnowledgeChunk> {
    if profile.achievements.is_empty() {
        return None;
    }

    let items: Vec<String> = profile
        .achievements
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect();

    let content = format!("Achievements and Recognition:\n\n{}", items.join("\n\n"));

    Some(KnowledgeChunk {
        content,
        metadata: ChunkMetadata::new(ChunkKind::AchievementSet, "about_section")
            .with_title("Achievements and Recognition"),
    })
}
