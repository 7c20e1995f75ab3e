use super::*;
use tempfile::TempDir;

#[tokio::test]
async fn database_creates_file_and_runs_migrations() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let db_path = temp_dir.path().join("portfolio.db");

    let database = Database::new(&db_path).await.expect("should create database");
    assert!(db_path.exists());

    // Migrations are idempotent
    database
        .run_migrations()
        .await
        .expect("should re-run migrations");

    // knowledge_state row is seeded by the migration
    let generation = database
        .current_generation()
        .await
        .expect("should read generation");
    assert_eq!(generation, None);
}
