use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use lra_core::config::{AppConfig, ENV_CHAT_MODEL, ENV_INDEX_DIR};
use tempfile::tempdir;

#[test]
fn defaults_match_retrieval_contract() {
    let cfg = AppConfig::default();
    assert_eq!(cfg.retrieval.point_dense_k, 10);
    assert_eq!(cfg.retrieval.point_top_k, 3);
    assert_eq!(cfg.retrieval.broad_dense_k, 20);
    assert_eq!(cfg.retrieval.broad_fetch_k, 30);
    assert_eq!(cfg.retrieval.broad_diversity, 0.5);
    assert_eq!(cfg.retrieval.broad_per_source, 3);
    assert_eq!(cfg.retrieval.broad_top_k, 6);
    assert_eq!(cfg.segmenter.window_chars, 1000);
    assert_eq!(cfg.segmenter.overlap_chars, 100);
    assert!(cfg.validate().is_ok());
}

#[test]
fn partial_toml_keeps_other_defaults() {
    let cfg = AppConfig::from_toml_str(
        r#"
[ollama]
chat_model = "gemma3:4b"

[retrieval]
broad_top_k = 8
"#,
    )
    .expect("parse");
    assert_eq!(cfg.ollama.chat_model, "gemma3:4b");
    assert_eq!(cfg.ollama.base_url, "http://127.0.0.1:11434");
    assert_eq!(cfg.retrieval.broad_top_k, 8);
    assert_eq!(cfg.retrieval.point_top_k, 3);
}

#[test]
fn env_overrides_win_over_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lra.toml");
    fs::write(&path, "[ollama]\nchat_model = \"from-file\"\n").unwrap();

    let mut cfg = AppConfig::from_toml_file(&path).expect("load");
    let env: HashMap<&str, &str> =
        HashMap::from([(ENV_CHAT_MODEL, "from-env"), (ENV_INDEX_DIR, "/tmp/lra-index")]);
    cfg.apply_env(|k| env.get(k).map(|v| v.to_string()));

    assert_eq!(cfg.ollama.chat_model, "from-env");
    assert_eq!(cfg.paths.index_dir, PathBuf::from("/tmp/lra-index"));
    assert_eq!(
        cfg.paths.lexical_artifact(),
        PathBuf::from("/tmp/lra-index/lexical_index.json")
    );
}

#[test]
fn invalid_values_are_rejected() {
    let err = AppConfig::from_toml_str("[segmenter]\nwindow_chars = 100\noverlap_chars = 100\n")
        .unwrap()
        .validate()
        .expect_err("overlap must be < window");
    assert_eq!(err.code, "CONFIG_INVALID");

    let err = AppConfig::from_toml_str("[retrieval]\nbroad_diversity = 1.5\n")
        .unwrap()
        .validate()
        .expect_err("diversity out of range");
    assert_eq!(err.code, "CONFIG_INVALID");

    let err = AppConfig::from_toml_str("retrieval = 3").expect_err("bad toml");
    assert_eq!(err.code, "CONFIG_INVALID");
}

#[test]
fn missing_explicit_config_file_is_an_error() {
    let dir = tempdir().unwrap();
    let err = AppConfig::load(Some(&dir.path().join("absent.toml"))).expect_err("missing");
    assert_eq!(err.code, "CONFIG_READ_FAILED");
}
