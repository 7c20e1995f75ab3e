use super::*;
use tempfile::TempDir;

#[test]
fn default_config_is_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.openai.embedding_dimension, 1536);
    assert!((config.retrieval.similarity_threshold - 0.3).abs() < f32::EPSILON);
    assert_eq!(config.retrieval.top_k, 5);
    assert_eq!(config.retrieval.history_window, 10);
}

#[test]
fn load_missing_file_returns_defaults() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config = Config::load(temp_dir.path()).expect("should load defaults");

    assert_eq!(config.base_dir, temp_dir.path());
    assert_eq!(config.openai, OpenAiConfig::default());
}

#[test]
fn save_and_reload_round_trip() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config = Config {
        openai: OpenAiConfig {
            embedding_model: "custom-embed".to_string(),
            embedding_dimension: 768,
            ..OpenAiConfig::default()
        },
        retrieval: RetrievalConfig {
            similarity_threshold: 0.5,
            top_k: 3,
            ..RetrievalConfig::default()
        },
        base_dir: temp_dir.path().to_path_buf(),
        ..Config::default()
    };

    config.save().expect("should save config");

    let reloaded = Config::load(temp_dir.path()).expect("should reload config");
    assert_eq!(reloaded.openai.embedding_model, "custom-embed");
    assert_eq!(reloaded.openai.embedding_dimension, 768);
    assert_eq!(reloaded.retrieval.top_k, 3);
}

#[test]
fn rejects_invalid_api_base() {
    let config = OpenAiConfig {
        api_base: "not a url".to_string(),
        ..OpenAiConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidApiBase(_))
    ));
}

#[test]
fn rejects_empty_model() {
    let config = OpenAiConfig {
        embedding_model: "  ".to_string(),
        ..OpenAiConfig::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::InvalidModel(_))));
}

#[test]
fn rejects_out_of_range_dimension() {
    for dimension in [0, 63, 4097] {
        let config = OpenAiConfig {
            embedding_dimension: dimension,
            ..OpenAiConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEmbeddingDimension(_))
        ));
    }
}

#[test]
fn rejects_out_of_range_threshold() {
    for threshold in [-0.1, 1.1] {
        let config = RetrievalConfig {
            similarity_threshold: threshold,
            ..RetrievalConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSimilarityThreshold(_))
        ));
    }
}

#[test]
fn rejects_zero_top_k() {
    let config = RetrievalConfig {
        top_k: 0,
        ..RetrievalConfig::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::InvalidTopK(0))));
}

#[test]
fn rejects_empty_owner_name() {
    let config = Config {
        profile: ProfileConfig {
            owner_name: String::new(),
            ..ProfileConfig::default()
        },
        ..Config::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::EmptyOwnerName)));
}

#[test]
fn api_base_url_joins_without_dropping_segments() {
    let config = OpenAiConfig {
        api_base: "https://api.example.com/v1".to_string(),
        ..OpenAiConfig::default()
    };

    let url = config
        .api_base_url()
        .expect("should parse")
        .join("embeddings")
        .expect("should join");
    assert_eq!(url.as_str(), "https://api.example.com/v1/embeddings");
}

#[test]
fn partial_toml_fills_defaults() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    std::fs::write(
        temp_dir.path().join("config.toml"),
        "[retrieval]\ntop_k = 7\n",
    )
    .expect("should write config");

    let config = Config::load(temp_dir.path()).expect("should load config");
    assert_eq!(config.retrieval.top_k, 7);
    assert_eq!(config.retrieval.history_window, 10);
    assert_eq!(config.openai.chat_model, "gpt-4o-mini");
}
