mod common;

use common::{jpeg_bytes, png_bytes};
use pawscout_core::images::{collect_images, ImageFile};
use std::fs;
use tempfile::tempdir;

#[test]
fn walks_directories_and_sniffs_content() {
    let temp = tempdir().unwrap();
    let root = temp.path().join("photos");
    fs::create_dir_all(root.join("nested")).unwrap();
    fs::create_dir_all(root.join("thumbs")).unwrap();
    fs::write(root.join("a.png"), png_bytes(1)).unwrap();
    // extension lies; content wins
    fs::write(root.join("nested").join("b.dat"), jpeg_bytes(2)).unwrap();
    fs::write(root.join("notes.jpg"), "not really a photo").unwrap();
    fs::write(root.join("thumbs").join("c.png"), png_bytes(3)).unwrap();

    let single = temp.path().join("single.png");
    fs::write(&single, png_bytes(4)).unwrap();

    let collected = collect_images(
        &[root.clone(), single, temp.path().join("missing.png")],
        &["**/thumbs".to_string()],
    )
    .unwrap();

    let names: Vec<&str> = collected.images.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["a.png", "b.dat", "single.png"]);
    assert_eq!(collected.images[1].mime, "image/jpeg");

    assert_eq!(collected.skipped.len(), 2);
    let not_image = collected
        .skipped
        .iter()
        .find(|s| s.path.ends_with("notes.jpg"))
        .unwrap();
    assert_eq!(not_image.reason, "not an image");
    assert!(collected
        .skipped
        .iter()
        .any(|s| s.path.ends_with("missing.png")));
}

#[test]
fn bad_exclude_pattern_is_reported() {
    let temp = tempdir().unwrap();
    assert!(collect_images(&[temp.path().to_path_buf()], &["a[".to_string()]).is_err());
}

#[test]
fn identical_content_shares_a_digest() {
    let a = ImageFile::from_bytes("a.png", png_bytes(9)).unwrap();
    let b = ImageFile::from_bytes("b.png", png_bytes(9)).unwrap();
    assert_eq!(a.digest, b.digest);
    assert!(ImageFile::from_bytes("x.txt", b"hello".to_vec()).is_none());
    let upload = a.to_upload();
    assert_eq!((upload.file_name.as_str(), upload.mime.as_str()), ("a.png", "image/png"));
    assert_eq!(upload.bytes.len(), a.len());
}
