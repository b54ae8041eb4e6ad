use std::path::PathBuf;

/// A published, immutable project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Project {
    pub slug: String,
    pub path: PathBuf,
    pub url: String,
}

/// `base_url` is used verbatim, so it should end with `/`.
pub fn project_url(base_url: &str, slug: &str) -> String {
    format!("{base_url}{slug}/")
}
