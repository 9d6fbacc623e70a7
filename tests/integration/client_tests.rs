// tests/integration/client_tests.rs
use std::path::PathBuf;

use merkle_vault::{
    client::{upload_files, verify_file, VaultClient},
    core::integrity::Verdict,
    storage::RootStore,
};
use tempfile::tempdir;

use crate::common::TestServer;

fn write_files(dir: &std::path::Path, files: &[(&str, &str)]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(name, body)| {
            let path = dir.join(name);
            std::fs::write(&path, body).unwrap();
            path
        })
        .collect()
}

#[test_log::test(actix_web::test)]
async fn test_upload_then_verify() {
    let server_dir = tempdir().unwrap();
    let client_dir = tempdir().unwrap();
    let server = TestServer::start(server_dir.path()).await;
    let client = VaultClient::new(&server.url).unwrap();
    let roots = RootStore::new(client_dir.path().join("root_hash.txt"));

    let paths = write_files(
        client_dir.path(),
        &[("a.txt", "alpha"), ("b.txt", "bravo"), ("c.txt", "charlie")],
    );
    let summary = upload_files(&client, &paths, &roots, true).await.unwrap();
    assert!(summary.all_succeeded());
    assert_eq!(roots.load().await.unwrap(), summary.root);
    assert!(paths.iter().all(|p| !p.exists()));
    assert_eq!(server.service.root_status().root, Some(summary.root.clone()));

    let download_dir = client_dir.path().join("downloads");
    for name in ["a.txt", "b.txt", "c.txt"] {
        let outcome = verify_file(&client, name, &roots, &download_dir).await.unwrap();
        assert_eq!(outcome.verdict, Verdict::Intact);
        assert_eq!(outcome.server_root_matches, Some(true));
        assert_eq!(outcome.saved_to, Some(download_dir.join(name)));
    }
    assert_eq!(std::fs::read(download_dir.join("b.txt")).unwrap(), b"bravo");

    server.stop().await;
}

#[test_log::test(actix_web::test)]
async fn test_batch_with_empty_file_verifies() {
    let server_dir = tempdir().unwrap();
    let client_dir = tempdir().unwrap();
    let server = TestServer::start(server_dir.path()).await;
    let client = VaultClient::new(&server.url).unwrap();
    let roots = RootStore::new(client_dir.path().join("root_hash.txt"));

    let paths = write_files(client_dir.path(), &[("a.txt", "alpha"), ("empty.txt", "")]);
    let summary = upload_files(&client, &paths, &roots, false).await.unwrap();
    assert!(summary.all_succeeded());
    assert_eq!(server.service.root_status().root, Some(summary.root.clone()));

    let download_dir = client_dir.path().join("downloads");
    for name in ["a.txt", "empty.txt"] {
        let outcome = verify_file(&client, name, &roots, &download_dir).await.unwrap();
        assert_eq!(outcome.verdict, Verdict::Intact);
    }
    assert!(std::fs::read(download_dir.join("empty.txt")).unwrap().is_empty());

    server.stop().await;
}

#[test_log::test(actix_web::test)]
async fn test_later_uploads_move_the_server_root() {
    let server_dir = tempdir().unwrap();
    let client_dir = tempdir().unwrap();
    let server = TestServer::start(server_dir.path()).await;
    let client = VaultClient::new(&server.url).unwrap();
    let roots = RootStore::new(client_dir.path().join("root_hash.txt"));

    let first = write_files(client_dir.path(), &[("first.txt", "one")]);
    upload_files(&client, &first, &roots, false).await.unwrap();
    assert!(first[0].exists());

    // Another session grows the authoritative tree; the stored root is stale.
    client.upload("other.txt", b"someone else".to_vec()).await.unwrap();

    let download_dir = client_dir.path().join("downloads");
    let outcome = verify_file(&client, "first.txt", &roots, &download_dir)
        .await
        .unwrap();
    assert!(matches!(outcome.verdict, Verdict::ProofMismatch { .. }));
    assert_eq!(outcome.server_root_matches, Some(false));
    assert!(outcome.saved_to.is_none());
    assert!(!download_dir.join("first.txt").exists());

    server.stop().await;
}

#[test_log::test(actix_web::test)]
async fn test_missing_file_reports_not_found() {
    let server_dir = tempdir().unwrap();
    let client_dir = tempdir().unwrap();
    let server = TestServer::start(server_dir.path()).await;
    let client = VaultClient::new(&server.url).unwrap();
    let roots = RootStore::new(client_dir.path().join("root_hash.txt"));

    let paths = write_files(client_dir.path(), &[("kept.txt", "kept")]);
    upload_files(&client, &paths, &roots, false).await.unwrap();

    let err = verify_file(&client, "ghost.txt", &roots, client_dir.path())
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    server.stop().await;
}
