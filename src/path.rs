//! Path normalization and the small path algebra built on it.
//!
//! Every path handled by the crate is a `/`-separated absolute string in
//! canonical form: one leading slash and no trailing slash, with `/` as the
//! root. [`normalize`] is total, so none of these helpers can fail.

/// Canonicalize a path to a single leading `/` and no trailing `/`.
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }

    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Like [`normalize`], mapping a missing path to the root.
pub fn normalize_opt(path: Option<&str>) -> String {
    normalize(path.unwrap_or_default())
}

/// Non-empty segments of the normalized path.
pub fn segments(path: &str) -> Vec<String> {
    normalize(path)
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Segment form of a path: `/a//b/` becomes `/a/b`. Two keys name the same
/// tree position exactly when their canonical forms are equal.
pub fn canonical(path: &str) -> String {
    format!("/{}", segments(path).join("/"))
}

pub fn parent(path: &str) -> String {
    let path = normalize(path);
    match path.rsplit_once('/') {
        Some((p, _)) => normalize(p),
        None => "/".to_string(),
    }
}

/// Last segment; empty for the root.
pub fn file_name(path: &str) -> String {
    let path = normalize(path);
    path.rsplit('/').next().unwrap_or_default().to_string()
}

pub fn join(dir: &str, name: &str) -> String {
    let dir = normalize(dir);
    let name = name.trim_matches('/');
    if name.is_empty() {
        dir
    } else if dir == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Split a file name into stem and extension.
///
/// The extension follows the last `.`, unless that dot opens the name:
/// `.env` has no extension, `a.tar.gz` has `gz`.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

/// True when `path` is `ancestor` or nested under it, compared segment by
/// segment.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    let path = segments(path);
    let ancestor = segments(ancestor);
    path.starts_with(&ancestor)
}

/// Replace the `from` prefix of `path` with `to`, keeping the remainder.
/// Paths inside `from` come back canonical; paths outside it come back
/// normalized but otherwise unchanged.
pub fn rebase(path: &str, from: &str, to: &str) -> String {
    let segs = segments(path);
    let from_segs = segments(from);
    if !segs.starts_with(&from_segs) {
        return normalize(path);
    }

    let mut rebased = segments(to);
    rebased.extend_from_slice(&segs[from_segs.len()..]);
    format!("/{}", rebased.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("///"), "/");
        assert_eq!(normalize("foo"), "/foo");
        assert_eq!(normalize("foo/bar/"), "/foo/bar");
        assert_eq!(normalize("/foo/bar//"), "/foo/bar");
        assert_eq!(normalize_opt(None), "/");
        assert_eq!(normalize_opt(Some("")), "/");
    }

    #[test]
    fn test_normalize_idempotent() {
        for p in ["", "/", "a", "a/", "/a//b/", "//x", "a b/c.d/", "./x/", ".."] {
            let once = normalize(p);
            assert_eq!(normalize(&once), once, "input {:?}", p);
        }
    }

    #[test]
    fn test_segments_skip_empty() {
        assert_eq!(segments("/a//b/c/"), vec!["a", "b", "c"]);
        assert!(segments("/").is_empty());
    }

    #[test]
    fn test_parent_and_name() {
        assert_eq!(parent("/a/b.js"), "/a");
        assert_eq!(parent("/b.js"), "/");
        assert_eq!(parent("/"), "/");
        assert_eq!(parent("/a//b"), "/a");
        assert_eq!(parent("a"), "/");
        assert_eq!(file_name("/a/b.js"), "b.js");
        assert_eq!(file_name("/"), "");
        assert_eq!(join("/", "x"), "/x");
        assert_eq!(join("/a/", "x"), "/a/x");
    }

    #[test]
    fn test_canonical() {
        assert_eq!(canonical(""), "/");
        assert_eq!(canonical("//a//b/"), "/a/b");
        assert_eq!(canonical("x.txt"), "/x.txt");
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("x.txt"), ("x", Some("txt")));
        assert_eq!(split_extension("a.tar.gz"), ("a.tar", Some("gz")));
        assert_eq!(split_extension(".env"), (".env", None));
        assert_eq!(split_extension("Makefile"), ("Makefile", None));
    }

    #[test]
    fn test_is_within() {
        assert!(is_within("/src", "/src"));
        assert!(is_within("/src/sub", "/src"));
        assert!(!is_within("/srcs", "/src"));
        assert!(is_within("/anything", "/"));
        assert!(is_within("/a//b.js", "/a/b.js"));
        assert!(is_within("/a/b.js", "a//"));
        assert!(!is_within("/a", "/a/b"));
    }

    #[test]
    fn test_rebase() {
        assert_eq!(rebase("/a/c/d.js", "/a", "/b"), "/b/c/d.js");
        assert_eq!(rebase("/a", "/a", "/z/a"), "/z/a");
        assert_eq!(rebase("/other.js", "/a", "/b"), "/other.js");
        assert_eq!(rebase("/a//c/d.js", "/a", "/b"), "/b/c/d.js");
        assert_eq!(rebase("x.txt", "/x.txt", "/y.txt"), "/y.txt");
    }
}
