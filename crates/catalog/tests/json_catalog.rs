use std::path::PathBuf;

use catalog::{CatalogError, QuestionCatalog, QuestionRecord};
use interview_core::model::{Category, Difficulty};

fn temp_catalog_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("catalog-test-{}-{name}.json", std::process::id()))
}

#[test]
fn load_json_reads_custom_bank() {
    let records = vec![
        QuestionRecord {
            id: "rust-1".into(),
            category: Category::Technical,
            difficulty: Difficulty::Advanced,
            prompt: "Explain ownership and borrowing.".into(),
            expected_topics: vec!["Ownership".into(), "Borrow checker".into()],
            time_limit_secs: 240,
            follow_ups: vec!["What is a lifetime?".into()],
        },
        QuestionRecord {
            id: "css-9".into(),
            category: Category::Css,
            difficulty: Difficulty::Beginner,
            prompt: "What is specificity?".into(),
            expected_topics: vec!["Selectors".into()],
            time_limit_secs: 60,
            follow_ups: Vec::new(),
        },
    ];
    let path = temp_catalog_path("custom");
    std::fs::write(&path, serde_json::to_string_pretty(&records).unwrap()).unwrap();

    let catalog = QuestionCatalog::load_json(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.all()[0].id().as_str(), "rust-1");
    assert_eq!(catalog.all()[0].follow_ups(), &["What is a lifetime?"]);
    assert_eq!(catalog.categories(), vec![Category::Technical, Category::Css]);
}

#[test]
fn load_json_missing_file_is_io_error() {
    let path = temp_catalog_path("does-not-exist");
    let err = QuestionCatalog::load_json(&path).unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
    assert!(err.to_string().contains("does-not-exist"));
}

#[test]
fn load_json_rejects_zero_time_limit() {
    let path = temp_catalog_path("zero-limit");
    std::fs::write(
        &path,
        r#"[{"id": "z", "category": "react", "difficulty": "beginner",
            "prompt": "p", "expected_topics": ["Hooks"], "time_limit_secs": 0}]"#,
    )
    .unwrap();

    let err = QuestionCatalog::load_json(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(matches!(err, CatalogError::InvalidQuestion { index: 0, .. }));
}

#[test]
fn load_json_rejects_malformed_json() {
    let path = temp_catalog_path("malformed");
    std::fs::write(&path, "[{").unwrap();

    let err = QuestionCatalog::load_json(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(matches!(err, CatalogError::Json(_)));
}
