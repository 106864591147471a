// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2025 MediaGit Contributors

//! Integration tests for configuration sources

use lfsfetch_config::{ConfigError, ConfigKey, ConfigSource, GitConfig, MemoryConfig};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_lfsconfig_style_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".lfsconfig");
    fs::write(
        &path,
        "[lfs]\n\turl = https://lfs.example.com\n[remote \"Origin.Mirror\"]\n\tlfsurl = https://mirror\n",
    )
    .unwrap();

    let config = GitConfig::open_file(&path).unwrap();
    assert_eq!(config.origin(), Some(path.as_path()));
    assert_eq!(
        config.get(&ConfigKey::new("lfs", "url")).unwrap(),
        "https://lfs.example.com"
    );
    // Subsections keep their case and may contain dots
    assert_eq!(
        config
            .find(&ConfigKey::with_subsection("remote", "Origin.Mirror", "lfsurl"))
            .unwrap()
            .as_deref(),
        Some("https://mirror")
    );
    assert_eq!(
        config.find(&ConfigKey::new("lfs", "storage")).unwrap(),
        None
    );
}

#[test]
fn test_missing_file_is_distinguished() {
    let dir = TempDir::new().unwrap();
    let err = GitConfig::open_file(&dir.path().join(".lfsconfig")).unwrap_err();
    assert!(err.is_file_not_found());
}

#[test]
fn test_sources_are_interchangeable() {
    let sources: Vec<Box<dyn ConfigSource>> = vec![
        Box::new(MemoryConfig::new().with("lfs.url", "a")),
        Box::new(MemoryConfig::new()),
    ];
    let key = ConfigKey::new("lfs", "url");
    let first = sources
        .iter()
        .find_map(|source| source.find(&key).transpose())
        .transpose()
        .unwrap();
    assert_eq!(first.as_deref(), Some("a"));

    let err = sources[1].get(&key).unwrap_err();
    assert!(matches!(err, ConfigError::KeyNotFound(_)));
}
