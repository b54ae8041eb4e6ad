use crate::error::{Error, Result};
use crate::policy::IntakePolicy;

/// Replace backslashes with forward slashes and collapse runs of slashes.
///
/// Idempotent: normalizing a normalized path returns it unchanged.
pub fn normalize_path(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    let mut previous_slash = false;

    for c in raw.chars() {
        let c = if c == '\\' { '/' } else { c };
        if c == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        normalized.push(c);
    }

    normalized
}

/// Validate a raw archive entry name and return its normalized form.
///
/// Directory names keep their trailing slash. Checks short-circuit on the
/// first failure. Any `..` substring is rejected, not just `..` segments, so
/// names such as `a..b.txt` are refused as well.
pub fn sanitize_entry_path(raw: &str, policy: &IntakePolicy) -> Result<String> {
    let normalized = normalize_path(raw);

    if normalized.is_empty() {
        return Err(Error::EmptyPath);
    }

    // Byte length, not char count.
    if normalized.len() > policy.max_path_length {
        return Err(Error::PathTooLong {
            len: normalized.len(),
            max: policy.max_path_length,
        });
    }

    if normalized.starts_with('/') {
        return Err(Error::AbsolutePath { path: normalized });
    }

    if normalized.contains("..") {
        return Err(Error::ParentTraversal { path: normalized });
    }

    let trimmed = normalized.trim_matches('/');
    let segments = || trimmed.split('/').filter(|s| !s.is_empty());

    if let Some(segment) = segments().find(|s| policy.is_blocked_segment(s)) {
        return Err(Error::BlockedSegment {
            segment: segment.to_owned(),
            path: normalized,
        });
    }

    let basename = trimmed.rsplit('/').next().unwrap_or_default();
    if policy.is_blocked_filename(basename) {
        return Err(Error::BlockedFilename { path: normalized });
    }

    if segments().any(|s| s.starts_with('.')) {
        return Err(Error::HiddenPath { path: normalized });
    }

    Ok(normalized)
}
