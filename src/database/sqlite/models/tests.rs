use super::*;

#[test]
fn tag_list_parses_json_array() {
    let project = Project {
        id: 1,
        title: "QuizWhiz".to_string(),
        description: "A trivia app".to_string(),
        full_description: None,
        tags: Some(r#"["Quiz","TriviaChallenge"]"#.to_string()),
        live_link: None,
        github_link: None,
        display_order: 0,
    };

    assert_eq!(project.tag_list(), vec!["Quiz", "TriviaChallenge"]);
}

#[test]
fn tag_list_tolerates_missing_and_malformed_tags() {
    let mut project = Project {
        id: 1,
        title: "Untagged".to_string(),
        description: "desc".to_string(),
        full_description: None,
        tags: None,
        live_link: None,
        github_link: None,
        display_order: 0,
    };
    assert!(project.tag_list().is_empty());

    project.tags = Some("not json".to_string());
    assert!(project.tag_list().is_empty());
}

#[test]
fn seed_deserializes_with_missing_collections() {
    let seed: PortfolioSeed = serde_json::from_str(
        r#"{
            "projects": [{"title": "P", "description": "D", "tags": ["a"]}],
            "skills": [{"name": "Rust"}]
        }"#,
    )
    .expect("should deserialize seed");

    assert_eq!(seed.projects.len(), 1);
    assert_eq!(seed.skills.len(), 1);
    assert!(seed.blog_posts.is_empty());
    assert_eq!(seed.record_count(), 2);
}
