//! Lexical path confinement.
//!
//! A requested path is first cleaned as if it hung below a synthetic `/`, so
//! `.` and `..` segments and repeated separators collapse without ever
//! climbing above that synthetic root. The cleaned path is then appended to
//! the session root.
//!
//! Only `/` separates segments. A `\` is an ordinary filename byte, so a
//! name returned by a listing resolves back to the same entry.

use std::path::{Path, PathBuf};

/// Clean `path` under a synthetic root, returning its segments.
///
/// `..` at the synthetic root stays at the root.
pub fn clean_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments
}

/// Clean `path` under a synthetic root and render it as an absolute path.
pub fn clean(path: &str) -> String {
    format!("/{}", clean_segments(path).join("/"))
}

/// Resolve a session-relative path against `root`.
///
/// The result is always `root` itself or a descendant of it. An empty root
/// is treated as `/`, so the result is never relative to the working
/// directory.
pub fn resolve(root: &Path, path: &str) -> PathBuf {
    let mut resolved = if root.as_os_str().is_empty() {
        PathBuf::from("/")
    } else {
        root.to_path_buf()
    };
    for segment in clean_segments(path) {
        resolved.push(segment);
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean() {
        assert_eq!(clean(""), "/");
        assert_eq!(clean("/"), "/");
        assert_eq!(clean("a/b"), "/a/b");
        assert_eq!(clean("/a//b/"), "/a/b");
        assert_eq!(clean("./a/./b"), "/a/b");
        assert_eq!(clean("a/../b"), "/b");
        assert_eq!(clean("../../etc/passwd"), "/etc/passwd");
        assert_eq!(clean("/.."), "/");
    }

    #[test]
    fn test_resolve_empty_is_root() {
        let root = Path::new("/data/alice");
        assert_eq!(resolve(root, ""), PathBuf::from("/data/alice"));
        assert_eq!(resolve(root, "/"), PathBuf::from("/data/alice"));
        assert_eq!(resolve(root, "."), PathBuf::from("/data/alice"));
    }

    #[test]
    fn test_resolve_nested() {
        let root = Path::new("/data/alice");
        assert_eq!(
            resolve(root, "/docs/report.txt"),
            PathBuf::from("/data/alice/docs/report.txt")
        );
        assert_eq!(
            resolve(root, "docs/report.txt"),
            PathBuf::from("/data/alice/docs/report.txt")
        );
    }

    #[test]
    fn test_resolve_traversal_is_confined() {
        let root = Path::new("/data/alice");

        assert_eq!(
            resolve(root, "../../etc/passwd"),
            PathBuf::from("/data/alice/etc/passwd")
        );
        assert_eq!(resolve(root, "../bob"), PathBuf::from("/data/alice/bob"));
        assert_eq!(resolve(root, "docs/../../.."), PathBuf::from("/data/alice"));
    }

    #[test]
    fn test_resolve_backslash_is_part_of_name() {
        let root = Path::new("/data/alice");
        assert_eq!(resolve(root, "a\\b"), PathBuf::from("/data/alice/a\\b"));
        assert_eq!(clean_segments("a\\b.txt"), vec!["a\\b.txt"]);
        assert_eq!(
            resolve(root, "..\\..\\etc"),
            PathBuf::from("/data/alice/..\\..\\etc")
        );
    }

    #[test]
    fn test_resolve_empty_root_is_absolute() {
        let root = Path::new("");
        assert_eq!(resolve(root, ""), PathBuf::from("/"));
        assert_eq!(resolve(root, "x"), PathBuf::from("/x"));
        assert_eq!(resolve(root, "../x/./y"), PathBuf::from("/x/y"));
    }

    #[test]
    fn test_resolve_never_leaves_root() {
        let root = Path::new("/data/alice");
        let attempts = [
            "..",
            "../..",
            "/../../../",
            "a/../../b",
            "./../.././x",
            "a/b/c/../../../../y",
            "....//..//z",
        ];
        for attempt in attempts {
            let resolved = resolve(root, attempt);
            assert!(
                resolved.starts_with(root),
                "{attempt:?} resolved outside root: {resolved:?}"
            );
        }
    }
}
