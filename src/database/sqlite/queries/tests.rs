use super::*;
use crate::database::sqlite::Database;
use crate::database::sqlite::models::{NewProject, NewSkill, PortfolioSeed};
use tempfile::TempDir;

async fn create_test_database() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let database = Database::new(temp_dir.path().join("portfolio.db"))
        .await
        .expect("should create database");
    (database, temp_dir)
}

#[tokio::test]
async fn projects_round_trip_in_display_order() {
    let (database, _temp_dir) = create_test_database().await;
    let pool = database.pool();

    for (title, order) in [("Second", 2), ("First", 1), ("Third", 3)] {
        ProjectQueries::insert(
            pool,
            &NewProject {
                title: title.to_string(),
                description: format!("{} project", title),
                tags: vec!["Rust".to_string()],
                display_order: order,
                ..NewProject::default()
            },
        )
        .await
        .expect("should insert project");
    }

    let projects = ProjectQueries::list_all(pool)
        .await
        .expect("should list projects");
    let titles: Vec<&str> = projects.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
    assert_eq!(projects[0].tag_list(), vec!["Rust"]);
}

#[tokio::test]
async fn skills_round_trip() {
    let (database, _temp_dir) = create_test_database().await;
    let pool = database.pool();

    SkillQueries::insert(
        pool,
        &NewSkill {
            name: "Rust".to_string(),
            display_order: 0,
        },
    )
    .await
    .expect("should insert skill");

    let skills = SkillQueries::list_all(pool).await.expect("should list skills");
    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0].name, "Rust");
}

#[tokio::test]
async fn generation_pointer_starts_empty_and_flips() {
    let (database, _temp_dir) = create_test_database().await;
    let pool = database.pool();

    let current = KnowledgeStateQueries::current_generation(pool)
        .await
        .expect("should read pointer");
    assert_eq!(current, None);

    KnowledgeStateQueries::set_current_generation(pool, "gen-a")
        .await
        .expect("should set pointer");
    let current = KnowledgeStateQueries::current_generation(pool)
        .await
        .expect("should read pointer");
    assert_eq!(current.as_deref(), Some("gen-a"));

    KnowledgeStateQueries::set_current_generation(pool, "gen-b")
        .await
        .expect("should flip pointer");
    let current = KnowledgeStateQueries::current_generation(pool)
        .await
        .expect("should read pointer");
    assert_eq!(current.as_deref(), Some("gen-b"));
}

#[tokio::test]
async fn import_seed_inserts_all_collections() {
    let (database, _temp_dir) = create_test_database().await;

    let seed: PortfolioSeed = serde_json::from_str(
        r#"{
            "projects": [{"title": "P1", "description": "D1"}],
            "skills": [{"name": "Rust"}, {"name": "SQL"}],
            "education": [{"title": "BTech", "period": "2021-2025", "description": "CS"}],
            "work_experience": [],
            "certifications": [{"name": "Cert", "issuer": "Org", "date": "2024"}],
            "blog_posts": [{"title": "Post", "excerpt": "E", "date": "2024-01-01"}]
        }"#,
    )
    .expect("should parse seed");

    let inserted = database.import_seed(&seed).await.expect("should import seed");
    assert_eq!(inserted, 6);

    let skills = SkillQueries::list_all(database.pool())
        .await
        .expect("should list skills");
    assert_eq!(skills.len(), 2);
}
