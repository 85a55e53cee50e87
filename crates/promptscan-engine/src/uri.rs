//! # Resource locators
//!
//! [`ResourceUri`] is the absolute locator attached to every resolved file
//! reference. Resolution is purely lexical: no file system access, no
//! existence checks, no caching.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use relative_path::{Component, RelativePath, RelativePathBuf};
use serde::{Serialize, Serializer};

static SCHEME_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*)://(?P<authority>[^/?#]*)(?P<path>.*)$")
        .expect("scheme pattern is valid")
});

/// An absolute resource locator: `scheme://authority/path`.
///
/// The path is always absolute and normalized (no `.` or `..` segments).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceUri {
    scheme: String,
    authority: String,
    path: String,
}

impl ResourceUri {
    /// A `file://` locator for an absolute path. Relative input is anchored at `/`.
    pub fn file(path: &str) -> Self {
        Self {
            scheme: "file".to_string(),
            authority: String::new(),
            path: normalize_path(path),
        }
    }

    /// Parses `scheme://authority/path`. Returns `None` when `text` has no scheme.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = SCHEME_PREFIX.captures(text)?;
        Some(Self {
            scheme: caps["scheme"].to_ascii_lowercase(),
            authority: caps["authority"].to_string(),
            path: normalize_path(&caps["path"]),
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The last path segment, if any.
    pub fn file_name(&self) -> Option<&str> {
        RelativePath::new(&self.path).file_name()
    }

    /// The locator of the containing directory. The root is its own parent.
    #[must_use]
    pub fn dirname(&self) -> Self {
        let parent = RelativePath::new(&self.path)
            .parent()
            .map(|p| p.as_str().to_string())
            .unwrap_or_default();
        Self {
            scheme: self.scheme.clone(),
            authority: self.authority.clone(),
            path: normalize_path(&parent),
        }
    }

    /// Resolves `raw` against this locator, which is treated as a directory.
    ///
    /// - `scheme://...` is already absolute and is parsed as-is.
    /// - `/a/b` is absolute within this locator's scheme and authority.
    /// - anything else is joined to this directory.
    ///
    /// `.` and `..` segments are collapsed; `..` never climbs above the root.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> Self {
        if let Some(absolute) = Self::parse(raw) {
            return absolute;
        }

        let path = if raw.starts_with('/') {
            normalize_path(raw)
        } else {
            normalize_path(&format!("{}/{}", self.path, raw))
        };

        Self {
            scheme: self.scheme.clone(),
            authority: self.authority.clone(),
            path,
        }
    }
}

/// Resolves a reference's raw path relative to the directory of `document`.
pub fn resolve_reference(document: &ResourceUri, raw_path: &str) -> ResourceUri {
    document.dirname().resolve(raw_path)
}

/// Collapses `.`/`..` segments and repeated separators into an absolute path.
fn normalize_path(path: &str) -> String {
    let mut out = RelativePathBuf::new();
    for component in RelativePath::new(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Clamp at the root instead of escaping it
                out.pop();
            }
            Component::Normal(segment) => out.push(segment),
        }
    }
    format!("/{}", out.as_str())
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.path)
    }
}

impl Serialize for ResourceUri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/x/y/", "./a/../b.md", "file:///x/y/b.md")]
    #[case("/foo", "./folder/binary.file", "file:///foo/folder/binary.file")]
    #[case("/foo", "folder/file.md", "file:///foo/folder/file.md")]
    #[case("/foo/bar", "../sibling.md", "file:///foo/sibling.md")]
    #[case("/foo", "../../../../etc/passwd", "file:///etc/passwd")]
    #[case("/foo", "/abs/./path.md", "file:///abs/path.md")]
    #[case("/foo", "a//b/./c.md", "file:///foo/a/b/c.md")]
    #[case("/", "..", "file:///")]
    fn resolves_relative_to_directory(
        #[case] base: &str,
        #[case] raw: &str,
        #[case] expected: &str,
    ) {
        let base = ResourceUri::file(base);
        assert_eq!(base.resolve(raw).to_string(), expected);
    }

    #[test]
    fn absolute_paths_keep_scheme_and_authority() {
        let base = ResourceUri::parse("vscode-remote://box/home/user").unwrap();
        let resolved = base.resolve("/etc/hosts");
        assert_eq!(resolved.to_string(), "vscode-remote://box/etc/hosts");
    }

    #[test]
    fn scheme_prefixed_paths_are_not_joined() {
        let base = ResourceUri::file("/foo");
        let resolved = base.resolve("https://example.com/docs/../guide.md");
        assert_eq!(resolved.scheme(), "https");
        assert_eq!(resolved.authority(), "example.com");
        assert_eq!(resolved.path(), "/guide.md");
    }

    #[test]
    fn parse_rejects_plain_paths() {
        assert!(ResourceUri::parse("/just/a/path").is_none());
        assert!(ResourceUri::parse("relative.md").is_none());
        assert!(ResourceUri::parse("#file:x").is_none());
    }

    #[test]
    fn dirname_and_file_name() {
        let uri = ResourceUri::file("/foo/bar.md");
        assert_eq!(uri.file_name(), Some("bar.md"));
        assert_eq!(uri.dirname().path(), "/foo");
        assert_eq!(uri.dirname().dirname().path(), "/");
        assert_eq!(ResourceUri::file("/").dirname().path(), "/");
    }

    #[test]
    fn reference_resolution_uses_document_directory() {
        let doc = ResourceUri::file("/foo/bar.md");
        assert_eq!(
            resolve_reference(&doc, "./folder/binary.file").to_string(),
            "file:///foo/folder/binary.file"
        );
    }

    #[test]
    fn trailing_slash_document_resolves_from_its_parent() {
        let doc = ResourceUri::file("/x/y/");
        assert_eq!(
            resolve_reference(&doc, "./a/../b.md").to_string(),
            "file:///x/b.md"
        );
    }
}
