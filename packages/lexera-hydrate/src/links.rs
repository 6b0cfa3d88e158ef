/// Wiki-link resolution against a list of vault files.
///
/// Link targets may be URL-encoded (%20), relative (`./`, `../`), carry a
/// `#heading` subpath, and omit the `.md` extension.
use std::collections::BTreeSet;

use crate::host::LinkResolver;
use crate::types::FileHandle;

/// In-memory index of vault-relative file paths.
#[derive(Debug, Default, Clone)]
pub struct VaultLinkResolver {
    files: BTreeSet<String>,
}

impl VaultLinkResolver {
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    pub fn add_file(&mut self, path: impl Into<String>) {
        self.files.insert(path.into());
    }

    pub fn remove_file(&mut self, path: &str) {
        self.files.remove(path);
    }

    fn lookup_exact(&self, path: &str) -> Option<&String> {
        self.files
            .get(path)
            .or_else(|| self.files.get(&format!("{}.md", path)))
    }
}

impl LinkResolver for VaultLinkResolver {
    fn resolve_link(&self, target: &str, source_path: &str) -> Option<FileHandle> {
        let decoded = decode_link_target(target);
        let linkpath = strip_subpath(&decoded).trim();
        let source_dir = parent_dir(source_path);

        if linkpath.is_empty() {
            return self.files.get(source_path).map(|p| FileHandle::from_path(p));
        }

        if linkpath.starts_with("./") || linkpath.starts_with("../") {
            let joined = normalize_path(&format!("{}/{}", source_dir, linkpath));
            return self.lookup_exact(&joined).map(|p| FileHandle::from_path(p));
        }

        let absolute = linkpath.trim_start_matches('/');
        if let Some(found) = self.lookup_exact(absolute) {
            return Some(FileHandle::from_path(found));
        }

        let with_ext = if has_extension(absolute) {
            absolute.to_string()
        } else {
            format!("{}.md", absolute)
        };
        let suffix = format!("/{}", with_ext);

        let mut candidates: Vec<&String> = self
            .files
            .iter()
            .filter(|p| p.as_str() == with_ext || p.ends_with(&suffix))
            .collect();

        // Same folder as the source first, then the shortest path.
        candidates.sort_by_key(|p| (parent_dir(p) != source_dir, p.len()));
        candidates.first().map(|p| FileHandle::from_path(p))
    }
}

/// Decode URL-encoded link targets (%20 -> space, etc).
pub fn decode_link_target(raw: &str) -> String {
    percent_encoding::percent_decode_str(raw)
        .decode_utf8_lossy()
        .to_string()
}

fn strip_subpath(linkpath: &str) -> &str {
    match linkpath.find('#') {
        Some(idx) => &linkpath[..idx],
        None => linkpath,
    }
}

fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

fn has_extension(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    matches!(name.rfind('.'), Some(idx) if idx > 0)
}

/// Collapse `.` and `..` segments of a vault-relative path.
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
