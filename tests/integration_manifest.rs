//! Integration tests for the full build: config file → scan → extract →
//! manifest on disk.

use assert_fs::prelude::*;
use gallery_builder::core::scanner::ScanConfig;
use gallery_builder::{Manifest, ManifestBuilder, UserConfig};
use predicates::prelude::*;
use std::path::Path;

// Minimal JPEG header; enough for the extension filter, carries no EXIF
const JPEG_STUB: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];

fn load_config(dir: &assert_fs::TempDir, json: &str) -> UserConfig {
    let config_file = dir.child("config.json");
    config_file.write_str(json).unwrap();
    UserConfig::load(config_file.path()).unwrap()
}

#[test]
fn build_writes_a_manifest_for_a_nested_gallery() {
    let temp = assert_fs::TempDir::new().unwrap();
    let photos = temp.child("photos");
    photos.child("2024-trip/japan/2024-03-10_tokyo.jpg").write_binary(JPEG_STUB).unwrap();
    photos.child("2024-trip/japan/2024-03-12_kyoto.jpg").write_binary(JPEG_STUB).unwrap();
    photos.child("portraits/2022-08-01_anna.jpg").write_binary(JPEG_STUB).unwrap();

    let config = load_config(
        &temp,
        r#"{"name":"Travels","storage":{"prefix":"albums/"}}"#,
    );

    let manifest_path = temp.child("dist/manifest.json");
    let result = ManifestBuilder::new(photos.path())
        .config(config)
        .manifest_path(manifest_path.path())
        .run()
        .unwrap();

    assert_eq!(result.manifest.photos.len(), 3);
    assert!(result.errors.is_empty());

    manifest_path.assert(predicate::path::exists());
    manifest_path.assert(predicate::str::contains(
        "albums/2024-trip/japan/2024-03-10_tokyo.jpg",
    ));
    manifest_path.assert(predicate::str::contains("\"name\": \"Travels\""));
}

#[test]
fn manifest_orders_photos_newest_first_with_path_tags() {
    let temp = assert_fs::TempDir::new().unwrap();
    let photos = temp.child("photos");
    photos.child("old/2020-01-01_a.jpg").write_binary(JPEG_STUB).unwrap();
    photos.child("new/2024-06-30_b.jpg").write_binary(JPEG_STUB).unwrap();

    let config = load_config(&temp, r#"{"storage":{"prefix":"albums/"}}"#);

    let result = ManifestBuilder::new(photos.path())
        .config(config)
        .run()
        .unwrap();

    let photos = &result.manifest.photos;
    assert_eq!(photos[0].info.title, "2024-06-30_b");
    assert_eq!(photos[0].info.tags, vec!["new"]);
    assert_eq!(photos[1].info.title, "2020-01-01_a");
    assert_eq!(photos[1].info.tags, vec!["old"]);
    assert!(photos[0].info.date_taken > photos[1].info.date_taken);
}

#[test]
fn written_manifest_round_trips_through_serde() {
    let temp = assert_fs::TempDir::new().unwrap();
    let photos = temp.child("photos");
    photos.child("2023-05-20_sunset.jpg").write_binary(JPEG_STUB).unwrap();

    let manifest_path = temp.child("manifest.json");
    ManifestBuilder::new(photos.path())
        .manifest_path(manifest_path.path())
        .run()
        .unwrap();

    let raw = std::fs::read_to_string(manifest_path.path()).unwrap();
    let manifest: Manifest = serde_json::from_str(&raw).unwrap();
    assert_eq!(manifest.photos.len(), 1);
    assert_eq!(manifest.photos[0].info.title, "2023-05-20_sunset");
}

#[test]
fn non_images_and_hidden_files_stay_out_of_the_manifest() {
    let temp = assert_fs::TempDir::new().unwrap();
    let photos = temp.child("photos");
    photos.child("keep.jpg").write_binary(JPEG_STUB).unwrap();
    photos.child("notes.txt").write_str("not a photo").unwrap();
    photos.child(".thumbs/cache.jpg").write_binary(JPEG_STUB).unwrap();

    let result = ManifestBuilder::new(photos.path()).run().unwrap();
    assert_eq!(result.manifest.photos.len(), 1);
    assert_eq!(result.manifest.photos[0].key, "keep.jpg");
}

#[test]
fn hidden_files_can_be_opted_in() {
    let temp = assert_fs::TempDir::new().unwrap();
    let photos = temp.child("photos");
    photos.child("keep.jpg").write_binary(JPEG_STUB).unwrap();
    photos.child(".thumbs/cache.jpg").write_binary(JPEG_STUB).unwrap();

    let result = ManifestBuilder::new(photos.path())
        .scan_config(ScanConfig {
            include_hidden: true,
            ..Default::default()
        })
        .run()
        .unwrap();
    assert_eq!(result.manifest.photos.len(), 2);
}

#[test]
fn missing_photo_directory_fails_cleanly() {
    let err = ManifestBuilder::new(Path::new("/nonexistent/gallery"))
        .run()
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
}
