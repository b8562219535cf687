//! Integration tests for the upload coordinator over local disks

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use proptest::prelude::*;
use std::io::Cursor;
use stubforge::config::{ImageTarget, UploadSettings};
use stubforge::storage::{
    Disk, DiskAlias, UploadCoordinator, UploadOptions, UploadedFile, UploadedFiles,
};
use tempfile::TempDir;

fn settings(dir: &TempDir, process_images: bool) -> UploadSettings {
    UploadSettings {
        public_root: dir.path().join("public"),
        local_root: dir.path().join("storage/app"),
        public_disk_root: dir.path().join("storage/app/public"),
        process_images,
        target_format: ImageTarget::Webp,
        ..UploadSettings::default()
    }
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_fn(width, height, |x, _| Rgba([u8::try_from(x % 256).unwrap(), 0, 0, 255]));
    let mut buffer = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

fn cover(data: Vec<u8>) -> UploadedFiles {
    UploadedFiles::new().with("cover", UploadedFile::new("cover.png", "image/png", data))
}

proptest! {
    #[test]
    fn alias_resolution_is_total_and_deterministic(token in ".*") {
        let alias = DiskAlias::resolve(&token);
        prop_assert!(DiskAlias::ALL.contains(&alias));
        prop_assert_eq!(alias, DiskAlias::resolve(&token));

        let known = ["s3", "local", "public", "storage.local", "storage.public"];
        if !known.contains(&token.as_str()) {
            prop_assert_eq!(alias, DiskAlias::PublicPath);
        }
    }
}

#[test]
fn test_documented_aliases() {
    assert_eq!(DiskAlias::resolve("storage.local"), DiskAlias::Local);
    assert_eq!(DiskAlias::resolve("azure"), DiskAlias::PublicPath);
}

#[tokio::test]
async fn test_store_then_exists_then_delete() {
    let dir = TempDir::new().unwrap();
    let uploads = UploadCoordinator::from_settings(&settings(&dir, false)).unwrap();
    let options = UploadOptions::new("cover", "images/posts");

    let name = uploads.upload(&cover(png(4, 4)), &options).await.unwrap().unwrap();
    assert!(name.ends_with(".png"));
    assert!(dir.path().join("storage/app/public/images/posts").join(&name).is_file());
    assert_eq!(
        uploads.actual_image_name(Some(&name), "images/posts", "public").await,
        Some(name.clone())
    );

    assert!(uploads.delete(Some(&name), "images/posts", "public").await);
    assert_eq!(uploads.actual_image_name(Some(&name), "images/posts", "public").await, None);
    assert!(!uploads.delete(Some(&name), "images/posts", "public").await);
}

#[tokio::test]
async fn test_replacing_deletes_previous_image() {
    let dir = TempDir::new().unwrap();
    let uploads = UploadCoordinator::from_settings(&settings(&dir, false)).unwrap();

    let first = uploads
        .upload(&cover(png(4, 4)), &UploadOptions::new("cover", "covers"))
        .await
        .unwrap()
        .unwrap();

    let options = UploadOptions::new("cover", "covers").with_existing(format!("{first}?v=1"));
    let second = uploads.upload(&cover(png(6, 6)), &options).await.unwrap().unwrap();

    assert_ne!(first, second);
    assert_eq!(uploads.actual_image_name(Some(&first), "covers", "public").await, None);
    assert_eq!(
        uploads.actual_image_name(Some(&second), "covers", "storage.public").await,
        Some(second.clone())
    );
}

#[tokio::test]
async fn test_no_upload_falls_back_to_existing() {
    let dir = TempDir::new().unwrap();
    let uploads = UploadCoordinator::from_settings(&settings(&dir, false)).unwrap();
    let (_, disk) = uploads.disks().resolve("public").unwrap();
    disk.put("covers/kept.webp", vec![1, 2, 3]).await.unwrap();

    let options = UploadOptions::new("cover", "covers").with_existing("kept.webp?v=9");
    let kept = uploads.upload(&UploadedFiles::new(), &options).await.unwrap();
    assert_eq!(kept.as_deref(), Some("kept.webp"));

    let options = UploadOptions::new("cover", "covers");
    assert_eq!(uploads.upload(&UploadedFiles::new(), &options).await.unwrap(), None);

    let options = UploadOptions::new("cover", "covers").with_existing("missing.webp");
    assert_eq!(uploads.upload(&UploadedFiles::new(), &options).await.unwrap(), None);
}

#[tokio::test]
async fn test_transform_pipeline_encodes_and_crops() {
    let dir = TempDir::new().unwrap();
    let uploads = UploadCoordinator::from_settings(&settings(&dir, true)).unwrap();
    let options = UploadOptions::new("cover", "covers").crop_to(Some(20), Some(20));

    let name = uploads.upload(&cover(png(80, 40)), &options).await.unwrap().unwrap();
    assert!(name.ends_with(".webp"));

    let stored = std::fs::read(dir.path().join("storage/app/public/covers").join(&name)).unwrap();
    let img = image::load_from_memory(&stored).unwrap();
    assert_eq!((img.width(), img.height()), (20, 10));
}

#[tokio::test]
async fn test_unknown_alias_uses_public_path() {
    let dir = TempDir::new().unwrap();
    let uploads = UploadCoordinator::from_settings(&settings(&dir, false)).unwrap();
    let options = UploadOptions::new("cover", "img").on_disk("azure");

    let name = uploads.upload(&cover(png(2, 2)), &options).await.unwrap().unwrap();
    assert!(dir.path().join("public/img").join(&name).is_file());
    assert_eq!(
        uploads.image_url(Some(&name), "img", "azure").await,
        Some(format!("/img/{name}"))
    );
}

#[tokio::test]
async fn test_s3_without_disk_is_an_error_for_uploads_only() {
    let dir = TempDir::new().unwrap();
    let uploads = UploadCoordinator::from_settings(&settings(&dir, false)).unwrap();
    let options = UploadOptions::new("cover", "img").on_disk("s3").with_existing("a.png");

    assert!(uploads.upload(&cover(png(2, 2)), &options).await.is_err());
    assert!(!uploads.delete(Some("a.png"), "img", "s3").await);
}

#[tokio::test]
async fn test_private_local_disk_only_issues_temporary_urls() {
    let dir = TempDir::new().unwrap();
    let settings = UploadSettings {
        signing_key: Some("secret".to_string()),
        ..settings(&dir, false)
    };
    let uploads = UploadCoordinator::from_settings(&settings).unwrap();
    let options = UploadOptions::new("cover", "private").on_disk("local");

    let name = uploads.upload(&cover(png(2, 2)), &options).await.unwrap().unwrap();
    assert!(dir.path().join("storage/app/private").join(&name).is_file());
    assert_eq!(uploads.image_url(Some(&name), "private", "local").await, None);

    let expires = chrono::Utc::now() + chrono::Duration::minutes(5);
    let url = uploads
        .temporary_image_url(Some(&name), "private", "local", expires)
        .await
        .unwrap()
        .unwrap();
    assert!(url.starts_with(&format!("private/{name}?expires=")));
}
