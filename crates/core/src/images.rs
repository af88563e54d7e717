//! Gathers image files for an upload from files and directories.
//!
//! Directories are walked recursively. The MIME type is sniffed from the file
//! content rather than trusted from the extension, and anything that is not an
//! image is reported back as skipped.

use bytes::Bytes;
use globset::{Glob, GlobSet, GlobSetBuilder};
use providers::UploadImage;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("invalid exclude pattern: {0}")]
    Pattern(#[from] globset::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub name: String,
    pub mime: String,
    pub bytes: Bytes,
    pub digest: blake3::Hash,
}

impl ImageFile {
    /// `None` unless the content is an image.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Bytes>) -> Option<Self> {
        let bytes = bytes.into();
        let kind = infer::get(&bytes)?;
        if !kind.mime_type().starts_with("image/") {
            return None;
        }
        Some(Self {
            name: name.into(),
            mime: kind.mime_type().to_string(),
            digest: blake3::hash(&bytes),
            bytes,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_upload(&self) -> UploadImage {
        UploadImage {
            file_name: self.name.clone(),
            mime: self.mime.clone(),
            bytes: self.bytes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct Collected {
    pub images: Vec<ImageFile>,
    pub skipped: Vec<SkippedFile>,
}

pub fn collect_images(paths: &[PathBuf], excludes: &[String]) -> Result<Collected, ImageError> {
    let exclude_set = build_globset(excludes)?;
    let mut out = Collected::default();

    for root in paths {
        if root.is_dir() {
            for entry in WalkDir::new(root)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| !exclude_set.is_match(e.path()))
            {
                match entry {
                    Ok(e) if e.file_type().is_file() => read_one(e.path(), &mut out),
                    Ok(_) => {}
                    Err(err) => out.skipped.push(SkippedFile {
                        path: err.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone()),
                        reason: err.to_string(),
                    }),
                }
            }
        } else if exclude_set.is_match(root) {
            debug!(path = %root.display(), "excluded");
        } else {
            read_one(root, &mut out);
        }
    }
    Ok(out)
}

fn read_one(path: &Path, out: &mut Collected) {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            out.skipped.push(SkippedFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
            return;
        }
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    match ImageFile::from_bytes(name, bytes) {
        Some(img) => out.images.push(img),
        None => out.skipped.push(SkippedFile {
            path: path.to_path_buf(),
            reason: "not an image".to_string(),
        }),
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat)?);
    }
    builder.build()
}
