use super::*;
use crate::database::sqlite::Database;
use crate::database::sqlite::models::{NewEducation, NewProject, NewSkill, PortfolioSeed};
use tempfile::TempDir;

fn test_profile() -> ProfileConfig {
    ProfileConfig {
        owner_name: "Jane Doe".to_string(),
        assistant_name: "Ursa".to_string(),
        headline: "a systems engineer".to_string(),
        summary: "I build reliable infrastructure.".to_string(),
        email: "jane@example.com".to_string(),
        linkedin: String::new(),
        portfolio_url: "https://jane.example.com".to_string(),
        achievements: vec!["Won a hackathon".to_string()],
    }
}

async fn create_test_database() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let database = Database::new(temp_dir.path().join("portfolio.db"))
        .await
        .expect("should create database");
    (database, temp_dir)
}

#[test]
fn profile_chunk_contains_identity_and_contact() {
    let chunk = profile_chunk(&test_profile());

    assert!(chunk.content.starts_with("I am Jane Doe, a systems engineer."));
    assert!(chunk.content.contains("I build reliable infrastructure."));
    assert!(chunk.content.contains("- Email: jane@example.com"));
    assert!(chunk.content.contains("- Portfolio: https://jane.example.com"));
    // Empty fields are omitted entirely
    assert!(!chunk.content.contains("LinkedIn"));
    assert_eq!(chunk.metadata.kind, ChunkKind::Profile);
    assert_eq!(chunk.metadata.source, "about_section");
}

#[test]
fn project_chunk_is_self_contained() {
    let mut project = crate::database::sqlite::models::Project {
        id: 1,
        title: "QuizWhiz".to_string(),
        description: "An interactive quiz application".to_string(),
        full_description: Some("Longer write-up".to_string()),
        tags: Some(r#"["Quiz","TriviaChallenge"]"#.to_string()),
        live_link: Some("https://quizwhiz.example.com".to_string()),
        github_link: None,
        display_order: 0,
    };

    let chunk = project_chunk(&project);
    assert!(chunk.content.contains("Project: QuizWhiz"));
    assert!(chunk.content.contains("Description: An interactive quiz application"));
    assert!(chunk.content.contains("Full Description: Longer write-up"));
    assert!(chunk.content.contains("Technologies: Quiz, TriviaChallenge"));
    assert!(chunk.content.contains("Live Demo: https://quizwhiz.example.com"));
    assert_eq!(chunk.metadata.kind, ChunkKind::Project);
    assert_eq!(chunk.metadata.title.as_deref(), Some("QuizWhiz"));
    assert_eq!(chunk.metadata.tags, vec!["Quiz", "TriviaChallenge"]);

    project.tags = None;
    let chunk = project_chunk(&project);
    assert!(chunk.content.contains("Technologies: N/A"));
}

#[test]
fn skills_collapse_into_a_single_chunk() {
    let skills = vec![
        crate::database::sqlite::models::Skill {
            id: 1,
            name: "Rust".to_string(),
            display_order: 0,
        },
        crate::database::sqlite::models::Skill {
            id: 2,
            name: "PostgreSQL".to_string(),
            display_order: 1,
        },
    ];

    let chunk = skills_chunk("Jane Doe", &skills).expect("should build chunk");
    assert!(chunk.content.contains("Jane Doe is proficient"));
    assert!(chunk.content.contains("Rust, PostgreSQL"));
    assert_eq!(chunk.metadata.kind, ChunkKind::SkillSet);

    assert!(skills_chunk("Jane Doe", &[]).is_none());
}

#[test]
fn achievements_chunk_numbers_entries() {
    let chunk = achievements_chunk(&test_profile()).expect("should build chunk");
    assert!(chunk.content.contains("1. Won a hackathon"));
    assert_eq!(chunk.metadata.kind, ChunkKind::AchievementSet);

    let empty_profile = ProfileConfig {
        achievements: Vec::new(),
        ..test_profile()
    };
    assert!(achievements_chunk(&empty_profile).is_none());
}

#[tokio::test]
async fn aggregate_orders_profile_first_achievements_last() {
    let (database, _temp_dir) = create_test_database().await;

    let seed: PortfolioSeed = PortfolioSeed {
        projects: vec![
            NewProject {
                title: "Beta".to_string(),
                description: "Second project".to_string(),
                display_order: 2,
                ..NewProject::default()
            },
            NewProject {
                title: "Alpha".to_string(),
                description: "First project".to_string(),
                display_order: 1,
                ..NewProject::default()
            },
        ],
        skills: vec![NewSkill {
            name: "Rust".to_string(),
            display_order: 0,
        }],
        education: vec![NewEducation {
            title: "BTech".to_string(),
            period: "2021-2025".to_string(),
            description: "Computer science".to_string(),
            display_order: 0,
        }],
        ..PortfolioSeed::default()
    };
    database.import_seed(&seed).await.expect("should import seed");

    let chunks = aggregate(database.pool(), &test_profile())
        .await
        .expect("should aggregate");

    let kinds: Vec<ChunkKind> = chunks.iter().map(|c| c.metadata.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ChunkKind::Profile,
            ChunkKind::Project,
            ChunkKind::Project,
            ChunkKind::SkillSet,
            ChunkKind::Education,
            ChunkKind::AchievementSet,
        ]
    );

    // Projects follow display order, not insertion order
    assert_eq!(chunks[1].metadata.title.as_deref(), Some("Alpha"));
    assert_eq!(chunks[2].metadata.title.as_deref(), Some("Beta"));
}

#[tokio::test]
async fn aggregate_with_empty_collections_still_yields_profile() {
    let (database, _temp_dir) = create_test_database().await;

    let chunks = aggregate(database.pool(), &test_profile())
        .await
        .expect("should aggregate");

    // Profile plus achievements; no row-derived chunks
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].metadata.kind, ChunkKind::Profile);
}

#[test]
fn metadata_serializes_with_type_field() {
    let chunk = profile_chunk(&test_profile());
    let json = serde_json::to_value(&chunk.metadata).expect("should serialize");

    assert_eq!(json["type"], "profile");
    assert_eq!(json["source"], "about_section");
    // Empty optional fields are omitted from the stored JSON
    assert!(json.get("issuer").is_none());
}
