// tests/media_tests.rs

use std::path::PathBuf;

use feedsync::{error::AppError, models::media::MediaUpload};

/// Writes `bytes` to a fresh file named `name` under a unique temp directory.
async fn write_temp(name: &str, bytes: &[u8]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("feedsync-{}", uuid::Uuid::new_v4()));
    tokio::fs::create_dir_all(&dir)
        .await
        .expect("Failed to create temp dir");

    let path = dir.join(name);
    tokio::fs::write(&path, bytes)
        .await
        .expect("Failed to write temp file");
    path
}

#[tokio::test]
async fn reads_file_and_guesses_image_type() {
    let path = write_temp("sunset.png", &[0x89, b'P', b'N', b'G']).await;

    let upload = MediaUpload::from_path(&path).await.unwrap();

    assert_eq!(upload.file_name, "sunset.png");
    assert_eq!(upload.mime_type, "image/png");
    assert_eq!(upload.bytes, vec![0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn extension_match_ignores_case() {
    let path = write_temp("PHOTO.JPG", &[0xff, 0xd8]).await;

    let upload = MediaUpload::from_path(&path).await.unwrap();

    assert_eq!(upload.file_name, "PHOTO.JPG");
    assert_eq!(upload.mime_type, "image/jpeg");
}

#[tokio::test]
async fn video_types_are_recognized() {
    let mov = write_temp("clip.mov", b"moov").await;
    let mp4 = write_temp("clip.mp4", b"ftyp").await;

    assert_eq!(MediaUpload::from_path(&mov).await.unwrap().mime_type, "video/quicktime");
    assert_eq!(MediaUpload::from_path(&mp4).await.unwrap().mime_type, "video/mp4");
}

#[tokio::test]
async fn unknown_or_missing_extension_falls_back_to_octet_stream() {
    for name in ["notes.xyz", "README"] {
        let path = write_temp(name, b"plain").await;

        let upload = MediaUpload::from_path(&path).await.unwrap();
        assert_eq!(upload.mime_type, "application/octet-stream", "file {}", name);
    }
}

#[tokio::test]
async fn missing_file_is_a_bad_request() {
    let path = std::env::temp_dir()
        .join(format!("feedsync-{}", uuid::Uuid::new_v4()))
        .join("gone.jpg");

    let result = MediaUpload::from_path(&path).await;

    match result {
        Err(AppError::BadRequest(message)) => assert!(message.contains("gone.jpg"), "{}", message),
        other => panic!("expected BadRequest, got {:?}", other),
    }
}
