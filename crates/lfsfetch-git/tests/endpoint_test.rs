// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2025 MediaGit Contributors

//! Precedence of the LFS endpoint configuration layers

use lfsfetch_git::resolve_fetch_url;
use lfsfetch_test_utils::MemoryRepository;

const ORIGIN_URL: &str = "https://example.com/origin.git";

/// Every layer populated; each test removes the layers above the one it checks
fn full_repo() -> MemoryRepository {
    MemoryRepository::new()
        .with_config("lfs.url", "https://config/lfs")
        .with_overlay("lfs.url", "https://lfsconfig/lfs")
        .with_config("remote.origin.lfsurl", "https://config/origin-lfs")
        .with_overlay("remote.origin.lfsurl", "https://lfsconfig/origin-lfs")
        .with_remote("origin", ORIGIN_URL)
}

#[test]
fn test_lfs_url_in_config_wins() {
    let repo = full_repo();
    assert_eq!(resolve_fetch_url(&repo, None).unwrap(), "https://config/lfs");
    assert_eq!(
        resolve_fetch_url(&repo, Some("origin")).unwrap(),
        "https://config/lfs"
    );
}

#[test]
fn test_lfs_url_in_lfsconfig_second() {
    let repo = MemoryRepository::new()
        .with_overlay("lfs.url", "https://lfsconfig/lfs")
        .with_config("remote.origin.lfsurl", "https://config/origin-lfs")
        .with_remote("origin", ORIGIN_URL);
    assert_eq!(
        resolve_fetch_url(&repo, None).unwrap(),
        "https://lfsconfig/lfs"
    );
}

#[test]
fn test_remote_lfsurl_in_config_third() {
    let repo = MemoryRepository::new()
        .with_config("remote.origin.lfsurl", "https://config/origin-lfs")
        .with_overlay("remote.origin.lfsurl", "https://lfsconfig/origin-lfs")
        .with_remote("origin", ORIGIN_URL);
    assert_eq!(
        resolve_fetch_url(&repo, None).unwrap(),
        "https://config/origin-lfs"
    );
}

#[test]
fn test_remote_lfsurl_in_lfsconfig_fourth() {
    let repo = MemoryRepository::new()
        .with_overlay("remote.origin.lfsurl", "https://lfsconfig/origin-lfs")
        .with_remote("origin", ORIGIN_URL);
    assert_eq!(
        resolve_fetch_url(&repo, None).unwrap(),
        "https://lfsconfig/origin-lfs"
    );
}

#[test]
fn test_remote_fetch_url_last() {
    let repo = MemoryRepository::new().with_remote("origin", ORIGIN_URL);
    assert_eq!(resolve_fetch_url(&repo, None).unwrap(), ORIGIN_URL);
}

#[test]
fn test_missing_lfsconfig_is_empty() {
    // No overlay at all: the layers after it still resolve
    let repo = MemoryRepository::new()
        .with_config("remote.origin.lfsurl", "https://config/origin-lfs")
        .with_remote("origin", ORIGIN_URL);
    assert_eq!(
        resolve_fetch_url(&repo, None).unwrap(),
        "https://config/origin-lfs"
    );
}

#[test]
fn test_explicit_remote_selects_its_keys() {
    let repo = MemoryRepository::new()
        .with_config("remote.origin.lfsurl", "https://config/origin-lfs")
        .with_config("remote.backup.lfsurl", "https://config/backup-lfs")
        .with_remote("origin", ORIGIN_URL)
        .with_remote("backup", "https://example.com/backup.git");
    assert_eq!(
        resolve_fetch_url(&repo, Some("backup")).unwrap(),
        "https://config/backup-lfs"
    );
}

#[test]
fn test_branch_upstream_before_lfsdefault() {
    let repo = MemoryRepository::new()
        .with_branch_remote("upstream")
        .with_config("remote.lfsdefault", "mirror")
        .with_remote("upstream", "https://example.com/upstream.git")
        .with_remote("mirror", "https://example.com/mirror.git")
        .with_remote("origin", ORIGIN_URL);
    assert_eq!(
        resolve_fetch_url(&repo, None).unwrap(),
        "https://example.com/upstream.git"
    );
}

#[test]
fn test_lfsdefault_before_origin() {
    let repo = MemoryRepository::new()
        .with_config("remote.lfsdefault", "mirror")
        .with_remote("mirror", "https://example.com/mirror.git")
        .with_remote("origin", ORIGIN_URL);
    assert_eq!(
        resolve_fetch_url(&repo, None).unwrap(),
        "https://example.com/mirror.git"
    );
}

#[test]
fn test_unknown_remote_is_no_remote_configured() {
    let repo = MemoryRepository::new().with_remote("origin", ORIGIN_URL);
    let err = resolve_fetch_url(&repo, Some("nowhere")).unwrap_err();
    assert!(err.is_no_remote());
    assert!(err.to_string().contains("nowhere"));
}

#[test]
fn test_empty_remote_name_means_default() {
    let repo = MemoryRepository::new().with_remote("origin", ORIGIN_URL);
    assert_eq!(resolve_fetch_url(&repo, Some("")).unwrap(), ORIGIN_URL);
}
