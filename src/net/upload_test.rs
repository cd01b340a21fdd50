use super::*;

#[test]
fn mime_for_known_extensions() {
    assert_eq!(mime_for("a.png"), "image/png");
    assert_eq!(mime_for("a.JPG"), "image/jpeg");
    assert_eq!(mime_for("a.jpeg"), "image/jpeg");
    assert_eq!(mime_for("dir.v2/a.webp"), "image/webp");
}

#[test]
fn mime_for_unknown_or_missing_extension() {
    assert_eq!(mime_for("capture.qqzz"), "application/octet-stream");
    assert_eq!(mime_for("README"), "application/octet-stream");
}

#[test]
fn mime_for_non_image_extension_is_still_typed() {
    assert_eq!(mime_for("notes.txt"), "text/plain");
}

#[test]
fn new_sets_mime_from_file_name() {
    let upload = ImageUpload::new("shot.gif", vec![1]).unwrap();
    assert_eq!(upload.mime, "image/gif");
}

#[test]
fn new_rejects_empty_bytes() {
    let err = ImageUpload::new("a.png", Vec::new()).unwrap_err();
    assert!(matches!(err, UploadError::Empty { .. }));
}

#[test]
fn debug_omits_bytes() {
    let upload = ImageUpload::new("a.png", vec![1, 2, 3]).unwrap();
    let rendered = format!("{upload:?}");
    assert!(rendered.contains("len: 3"));
    assert!(!rendered.contains("[1, 2, 3]"));
}

#[tokio::test]
async fn from_path_reads_file_and_name() {
    let dir = std::env::temp_dir().join(format!("gallery-upload-{}", std::process::id()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join("sunset.png");
    tokio::fs::write(&path, b"\x89PNG").await.unwrap();

    let upload = ImageUpload::from_path(&path).await.unwrap();
    assert_eq!(upload.file_name, "sunset.png");
    assert_eq!(upload.mime, "image/png");
    assert_eq!(upload.len(), 4);

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[tokio::test]
async fn from_path_rejects_empty_file() {
    let dir = std::env::temp_dir().join(format!("gallery-upload-empty-{}", std::process::id()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join("blank.png");
    tokio::fs::write(&path, b"").await.unwrap();

    let err = ImageUpload::from_path(&path).await.unwrap_err();
    assert!(matches!(err, UploadError::Empty { .. }));

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[tokio::test]
async fn from_path_missing_file_errors() {
    let err = ImageUpload::from_path("/definitely/not/here.png").await.unwrap_err();
    assert!(matches!(err, UploadError::Read { .. }));
}
