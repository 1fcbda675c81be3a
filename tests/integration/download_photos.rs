//! Integration tests for the photo downloader against a mock asset server

use observation_photo_downloader::downloader::{PhotoDownloader, PhotoOutcome};
use observation_photo_downloader::Observation;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SPECIES: &str = "Danaus plexippus";

/// Serve `original.jpg` for every photo id, body = "photo-<id>"
async fn mount_originals(server: &MockServer) {
    for id in 1..=10 {
        Mock::given(method("GET"))
            .and(path(format!("/photos/{id}/original.jpg")))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(format!("photo-{id}")))
            .mount(server)
            .await;
    }
}

fn square_url(server: &MockServer, id: usize) -> String {
    format!("{}/photos/{id}/square.jpg", server.uri())
}

fn observation(id: u64, urls: &[String]) -> Observation {
    let urls: Vec<&str> = urls.iter().map(String::as_str).collect();
    Observation::new(id, &urls)
}

fn observation_dir(root: &Path, id: u64) -> PathBuf {
    root.join("Danaus_plexippus").join(format!("observation_{id}"))
}

#[tokio::test]
async fn test_keeps_only_first_photos_in_order() {
    let server = MockServer::start().await;
    mount_originals(&server).await;
    let temp_dir = TempDir::new().unwrap();

    let urls: Vec<String> = (1..=7).map(|id| square_url(&server, id)).collect();
    let observations = vec![observation(42, &urls)];

    let summary = PhotoDownloader::new(reqwest::Client::new())
        .download_photos(&observations, SPECIES, temp_dir.path(), 5)
        .await;

    let folder = observation_dir(temp_dir.path(), 42);
    for idx in 1..=5 {
        let content = fs::read_to_string(folder.join(format!("photo_{idx}.jpg"))).unwrap();
        assert_eq!(content, format!("photo-{idx}"));
    }
    assert!(!folder.join("photo_6.jpg").exists());
    assert!(!folder.join("photo_7.jpg").exists());
    assert_eq!(fs::read_dir(&folder).unwrap().count(), 5);

    assert_eq!(summary.photos_saved, 5);
    assert_eq!(summary.photos_failed, 0);
    assert_eq!(server.received_requests().await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_rewrites_square_to_original_and_keeps_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photos/7/original.jpg"))
        .and(query_param("size", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF]))
        .expect(1)
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().unwrap();

    let url = format!("{}/photos/7/square.jpg?size=200", server.uri());
    let observations = vec![observation(1, &[url])];

    PhotoDownloader::new(reqwest::Client::new())
        .download_photos(&observations, SPECIES, temp_dir.path(), 5)
        .await;

    let bytes = fs::read(observation_dir(temp_dir.path(), 1).join("photo_1.jpg")).unwrap();
    assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF]);
}

#[tokio::test]
async fn test_observation_without_photos_creates_no_folder() {
    let server = MockServer::start().await;
    mount_originals(&server).await;
    let temp_dir = TempDir::new().unwrap();

    let observations = vec![observation(5, &[]), observation(6, &[square_url(&server, 1)])];

    let summary = PhotoDownloader::new(reqwest::Client::new())
        .download_photos(&observations, SPECIES, temp_dir.path(), 5)
        .await;

    assert!(!observation_dir(temp_dir.path(), 5).exists());
    assert!(observation_dir(temp_dir.path(), 6).join("photo_1.jpg").exists());
    assert_eq!(summary.observations_skipped, 1);
    assert_eq!(summary.observations_processed, 1);
}

#[tokio::test]
async fn test_failed_photo_does_not_stop_siblings_or_later_observations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photos/2/original.jpg"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_originals(&server).await;
    let temp_dir = TempDir::new().unwrap();

    let observations = vec![
        observation(
            10,
            &[
                square_url(&server, 1),
                square_url(&server, 2),
                square_url(&server, 3),
            ],
        ),
        observation(
            11,
            &[
                // Unreachable host: transport failure
                "http://127.0.0.1:9/photos/4/square.jpg".to_string(),
                square_url(&server, 5),
            ],
        ),
    ];

    let summary = PhotoDownloader::new(reqwest::Client::new())
        .download_photos(&observations, SPECIES, temp_dir.path(), 5)
        .await;

    let first = observation_dir(temp_dir.path(), 10);
    assert!(first.join("photo_1.jpg").exists());
    assert!(!first.join("photo_2.jpg").exists());
    assert!(first.join("photo_3.jpg").exists());

    let second = observation_dir(temp_dir.path(), 11);
    assert!(!second.join("photo_1.jpg").exists());
    assert_eq!(fs::read_to_string(second.join("photo_2.jpg")).unwrap(), "photo-5");

    assert_eq!(summary.photos_saved, 3);
    assert_eq!(summary.photos_failed, 2);
}

#[tokio::test]
async fn test_outcomes_report_each_photo() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/photos/9/.*$"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_originals(&server).await;
    let temp_dir = TempDir::new().unwrap();

    let obs = observation(3, &[square_url(&server, 9), square_url(&server, 8)]);
    let outcomes = PhotoDownloader::new(reqwest::Client::new())
        .download_observation(&obs, temp_dir.path(), 5)
        .await;

    assert_eq!(outcomes.len(), 2);
    match &outcomes[0] {
        PhotoOutcome::Failed { url, error } => {
            assert!(url.as_deref().unwrap().ends_with("/photos/9/original.jpg"));
            assert!(error.to_string().contains("404"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    match &outcomes[1] {
        PhotoOutcome::Saved { path, bytes } => {
            assert_eq!(path, &temp_dir.path().join("photo_2.jpg"));
            assert_eq!(*bytes, "photo-8".len());
        }
        other => panic!("expected saved photo, got {other:?}"),
    }
}

#[tokio::test]
async fn test_existing_files_are_overwritten() {
    let server = MockServer::start().await;
    mount_originals(&server).await;
    let temp_dir = TempDir::new().unwrap();

    let folder = observation_dir(temp_dir.path(), 77);
    fs::create_dir_all(&folder).unwrap();
    fs::write(folder.join("photo_1.jpg"), "stale contents from an earlier run").unwrap();

    let observations = vec![observation(77, &[square_url(&server, 4)])];
    PhotoDownloader::new(reqwest::Client::new())
        .download_photos(&observations, SPECIES, temp_dir.path(), 5)
        .await;

    assert_eq!(fs::read_to_string(folder.join("photo_1.jpg")).unwrap(), "photo-4");
}

#[tokio::test]
async fn test_url_without_square_downloads_as_is() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photos/3/medium.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes("medium"))
        .expect(1)
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().unwrap();

    let url = format!("{}/photos/3/medium.png", server.uri());
    let observations = vec![observation(8, &[url])];
    PhotoDownloader::new(reqwest::Client::new())
        .download_photos(&observations, SPECIES, temp_dir.path(), 5)
        .await;

    let saved = observation_dir(temp_dir.path(), 8).join("photo_1.png");
    assert_eq!(fs::read_to_string(saved).unwrap(), "medium");
}

#[tokio::test]
async fn test_zero_photo_limit_downloads_nothing() {
    let server = MockServer::start().await;
    mount_originals(&server).await;
    let temp_dir = TempDir::new().unwrap();

    let observations = vec![observation(1, &[square_url(&server, 1)])];
    let summary = PhotoDownloader::new(reqwest::Client::new())
        .download_photos(&observations, SPECIES, temp_dir.path(), 0)
        .await;

    assert_eq!(summary.photos_saved, 0);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unnamable_id_fails_only_that_observation() {
    let server = MockServer::start().await;
    mount_originals(&server).await;
    let temp_dir = TempDir::new().unwrap();

    let observations: Vec<Observation> = serde_json::from_value(serde_json::json!([
        {"id": 2.5, "photos": [{"url": square_url(&server, 1)}]},
        {"id": null, "photos": [{"url": square_url(&server, 2)}]},
        {"id": 3, "photos": [{"url": square_url(&server, 3)}]}
    ]))
    .unwrap();

    let summary = PhotoDownloader::new(reqwest::Client::new())
        .download_photos(&observations, SPECIES, temp_dir.path(), 5)
        .await;

    let species_dir = temp_dir.path().join("Danaus_plexippus");
    assert_eq!(
        fs::read_to_string(species_dir.join("observation_2.5").join("photo_1.jpg")).unwrap(),
        "photo-1"
    );
    assert!(observation_dir(temp_dir.path(), 3).join("photo_1.jpg").exists());
    assert_eq!(fs::read_dir(&species_dir).unwrap().count(), 2);

    assert_eq!(summary.observations_processed, 2);
    assert_eq!(summary.observations_failed, 1);
    assert_eq!(summary.photos_saved, 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
