use std::io::{Cursor, Write};
use std::path::Path;

use glitchlet_archive::{Error as ArchiveError, IntakePolicy};
use glitchlet_publish::{Error, ErrorKind, IntakePipeline, Publisher, Upload};
use tempfile::{TempDir, tempdir};
use zip::write::SimpleFileOptions;

const BASE_URL: &str = "https://example.net/projects/";

struct Harness {
    _root: TempDir,
    temp_root: std::path::PathBuf,
    projects_root: std::path::PathBuf,
    uploads: std::path::PathBuf,
    pipeline: IntakePipeline,
}

impl Harness {
    fn new() -> Self {
        Self::with_policy(IntakePolicy::default())
    }

    fn with_policy(policy: IntakePolicy) -> Self {
        let root = tempdir().unwrap();
        let temp_root = root.path().join("tmp");
        let projects_root = root.path().join("projects");
        let uploads = root.path().join("uploads");
        std::fs::create_dir_all(&temp_root).unwrap();
        std::fs::create_dir_all(&uploads).unwrap();

        let pipeline = IntakePipeline::new(
            policy,
            &temp_root,
            Publisher::new(&projects_root, BASE_URL),
        );
        Self {
            _root: root,
            temp_root,
            projects_root,
            uploads,
            pipeline,
        }
    }

    fn upload(&self, name: &str, bytes: &[u8]) -> Upload {
        let path = self.uploads.join(name);
        std::fs::write(&path, bytes).unwrap();
        Upload::new(path, bytes.len() as u64)
    }

    fn published(&self) -> Vec<String> {
        match std::fs::read_dir(&self.projects_root) {
            Ok(entries) => entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    fn staging_is_empty(&self) -> bool {
        std::fs::read_dir(&self.temp_root).unwrap().next().is_none()
    }
}

fn build_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, data) in files {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Build a one-entry deflated zip, then rewrite the uncompressed size it
/// declares in both the local header and the central directory.
fn zip_declaring(name: &str, data: &[u8], declared: u32) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    writer.start_file(name, options).unwrap();
    writer.write_all(data).unwrap();
    let mut bytes = writer.finish().unwrap().into_inner();

    let declared = declared.to_le_bytes();
    // Local file header: signature at 0, uncompressed size at 22.
    assert_eq!(&bytes[..4], b"PK\x03\x04");
    bytes[22..26].copy_from_slice(&declared);

    // No archive comment, so the end-of-central-directory record is the
    // last 22 bytes; the central directory offset sits at 16 within it.
    let eocd = bytes.len() - 22;
    assert_eq!(&bytes[eocd..eocd + 4], b"PK\x05\x06");
    let central =
        u32::from_le_bytes(bytes[eocd + 16..eocd + 20].try_into().unwrap()) as usize;
    assert_eq!(&bytes[central..central + 4], b"PK\x01\x02");
    bytes[central + 24..central + 28].copy_from_slice(&declared);
    bytes
}

fn files_under(dir: &Path) -> Vec<String> {
    let mut out = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for entry in std::fs::read_dir(&current).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                let rel = path.strip_prefix(dir).unwrap();
                out.push(rel.to_string_lossy().replace('\\', "/"));
            }
        }
    }
    out.sort();
    out
}

#[test]
fn publishes_valid_archive() {
    let harness = Harness::new();
    let logo = vec![7u8; 2048];
    let upload = harness.upload(
        "site.zip",
        &build_zip(&[("index.html", b"<h1>hi</h1>"), ("img/logo.png", &logo)]),
    );

    let project = harness.pipeline.run(&upload).unwrap();

    assert_eq!(project.slug.len(), 8);
    assert!(project.slug.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(project.url, format!("{BASE_URL}{}/", project.slug));
    assert_eq!(project.path, harness.projects_root.join(&project.slug));
    assert_eq!(files_under(&project.path), ["img/logo.png", "index.html"]);
    assert_eq!(
        std::fs::read(project.path.join("index.html")).unwrap(),
        b"<h1>hi</h1>"
    );
    assert_eq!(std::fs::metadata(project.path.join("img/logo.png")).unwrap().len(), 2048);
    assert!(harness.staging_is_empty());
}

#[test]
fn creates_missing_projects_root() {
    let harness = Harness::new();
    assert!(!harness.projects_root.exists());

    let upload = harness.upload("a.zip", &build_zip(&[("a.txt", b"a")]));
    harness.pipeline.run(&upload).unwrap();

    assert_eq!(harness.published().len(), 1);
}

#[test]
fn repeated_publishes_get_distinct_slugs() {
    let harness = Harness::new();
    let first = harness.upload("one.zip", &build_zip(&[("one.txt", b"1")]));
    let second = harness.upload("two.zip", &build_zip(&[("two.txt", b"2")]));

    let a = harness.pipeline.run(&first).unwrap();
    let b = harness.pipeline.run(&second).unwrap();

    assert_ne!(a.slug, b.slug);
    assert_eq!(files_under(&a.path), ["one.txt"]);
    assert_eq!(files_under(&b.path), ["two.txt"]);
    assert_eq!(harness.published().len(), 2);
}

#[test]
fn concurrent_publishes_do_not_collide() {
    let harness = Harness::new();
    let uploads: Vec<Upload> = (0..8)
        .map(|i| {
            let name = format!("f{i}.txt");
            harness.upload(&format!("{i}.zip"), &build_zip(&[(&name, b"x")]))
        })
        .collect();

    let pipeline = &harness.pipeline;
    let projects = std::thread::scope(|scope| {
        let handles: Vec<_> = uploads
            .iter()
            .map(|upload| scope.spawn(move || pipeline.run(upload).unwrap()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    });

    let mut slugs: Vec<_> = projects.iter().map(|p| p.slug.clone()).collect();
    slugs.sort();
    slugs.dedup();
    assert_eq!(slugs.len(), 8);
    for project in &projects {
        assert_eq!(files_under(&project.path).len(), 1);
    }
}

#[test]
fn traversal_publishes_nothing() {
    let harness = Harness::new();
    let upload = harness.upload(
        "evil.zip",
        &build_zip(&[("index.html", b"ok"), ("../evil.html", b"pwned")]),
    );

    let err = harness.pipeline.run(&upload).unwrap_err();

    assert!(matches!(
        err,
        Error::Archive(ArchiveError::ParentTraversal { .. })
    ));
    assert_eq!(err.kind(), ErrorKind::ClientInput);
    assert_eq!(err.public_message(), "Parent paths are not allowed.");
    assert!(harness.published().is_empty());
    assert!(harness.staging_is_empty());
}

#[test]
fn disallowed_type_publishes_nothing() {
    let harness = Harness::new();
    let upload = harness.upload(
        "php.zip",
        &build_zip(&[("index.html", b"ok"), ("shell.php", b"<?php")]),
    );

    let err = harness.pipeline.run(&upload).unwrap_err();

    assert!(matches!(
        err,
        Error::Archive(ArchiveError::DisallowedFileType { .. })
    ));
    assert!(harness.published().is_empty());
}

#[test]
fn oversized_upload_is_rejected_before_parsing() {
    let harness = Harness::new();
    // Not a zip at all; the declared size alone must reject it.
    let mut upload = harness.upload("big.zip", b"garbage");
    upload.size = 25 * 1024 * 1024 + 1;

    let err = harness.pipeline.run(&upload).unwrap_err();

    assert!(matches!(
        err,
        Error::Archive(ArchiveError::ArchiveTooLarge { .. })
    ));
    assert_eq!(err.public_message(), "Zip file too large.");
}

#[test]
fn garbage_is_an_invalid_archive() {
    let harness = Harness::new();
    let upload = harness.upload("junk.zip", b"definitely not a zip file");

    let err = harness.pipeline.run(&upload).unwrap_err();

    assert!(matches!(err, Error::Archive(ArchiveError::InvalidArchive)));
    assert_eq!(err.kind(), ErrorKind::ClientInput);
    assert!(harness.published().is_empty());
}

#[test]
fn quota_is_enforced_before_staging() {
    let harness = Harness::with_policy(IntakePolicy::default().max_file_count(2));
    let upload = harness.upload(
        "many.zip",
        &build_zip(&[("a.txt", b"a"), ("b.txt", b"b"), ("c.txt", b"c")]),
    );

    let err = harness.pipeline.run(&upload).unwrap_err();

    assert!(matches!(
        err,
        Error::Archive(ArchiveError::TooManyFiles { max: 2 })
    ));
    assert!(harness.staging_is_empty());
    assert!(harness.published().is_empty());
}

#[test]
fn missing_temp_root_is_a_storage_error() {
    let harness = Harness::new();
    let upload = harness.upload("a.zip", &build_zip(&[("a.txt", b"a")]));
    std::fs::remove_dir(&harness.temp_root).unwrap();

    let err = harness.pipeline.run(&upload).unwrap_err();

    assert!(matches!(err, Error::Staging { .. }));
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert_eq!(err.public_message(), "Failed to create directory.");
    assert!(harness.published().is_empty());
}

fn assert_size_mismatch_publishes_nothing(declared: u32) {
    let harness = Harness::new();
    let upload = harness.upload(
        "lying.zip",
        &zip_declaring("index.html", &[b'a'; 4000], declared),
    );

    let err = harness.pipeline.run(&upload).unwrap_err();

    assert!(
        matches!(
            err,
            Error::Archive(
                ArchiveError::SizeMismatch { .. } | ArchiveError::ExtractionFailed { .. }
            )
        ),
        "declared {declared}: {err}"
    );
    assert_eq!(err.kind(), ErrorKind::ClientInput);
    assert!(harness.published().is_empty());
    assert!(harness.staging_is_empty());
}

#[test]
fn entry_larger_than_declared_publishes_nothing() {
    assert_size_mismatch_publishes_nothing(100);
}

#[test]
fn entry_smaller_than_declared_publishes_nothing() {
    assert_size_mismatch_publishes_nothing(9000);
}
