//! # Path Resolution
//!
//! Maps identifiers to storage paths and public URLs.
//!
//! Identifiers are joined verbatim. Traversal sequences such as `..` or
//! embedded separators are not sanitized; callers own identifier hygiene.

const SEPARATOR: char = '/';

/// Pure identifier -> path/URL mapping for one backend instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    directory: String,
    host: Option<String>,
    prefix: Option<String>,
}

impl PathResolver {
    /// Create a resolver, stripping trailing separators from every component.
    pub fn new(directory: &str, host: Option<&str>, prefix: Option<&str>) -> Self {
        Self {
            directory: strip_trailing(directory),
            host: host.map(strip_trailing),
            prefix: prefix.map(strip_trailing),
        }
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// `<directory>/<prefix?>/<id>`
    pub fn path(&self, id: &str) -> String {
        let mut parts = vec![self.directory.as_str()];
        parts.extend(self.prefix.as_deref());
        parts.push(id);
        join(&parts)
    }

    /// `<host?>/<prefix?>/<id>`, never containing the root directory.
    ///
    /// Without a host the URL is root-relative.
    pub fn url(&self, id: &str) -> String {
        let parts: Vec<&str> = [self.host.as_deref(), self.prefix.as_deref(), Some(id)]
            .into_iter()
            .flatten()
            .collect();
        join(&parts)
    }
}

/// Directory portion of a resolved path.
pub fn parent(path: &str) -> &str {
    let trimmed = path.trim_end_matches(SEPARATOR);
    match trimmed.rfind(SEPARATOR) {
        Some(0) => "/",
        Some(idx) => trimmed[..idx].trim_end_matches(SEPARATOR),
        None if path.starts_with(SEPARATOR) => "/",
        None => ".",
    }
}

/// Join segments with exactly one separator at each boundary.
fn join(parts: &[&str]) -> String {
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i == 0 {
            out.push_str(part);
            continue;
        }
        let trimmed_len = out.trim_end_matches(SEPARATOR).len();
        out.truncate(trimmed_len);
        out.push(SEPARATOR);
        out.push_str(part.trim_start_matches(SEPARATOR));
    }
    out
}

fn strip_trailing(s: &str) -> String {
    s.trim_end_matches(SEPARATOR).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_with_prefix() {
        let resolver = PathResolver::new("/tmp/store/", None, Some("uploads/"));
        assert_eq!(resolver.directory(), "/tmp/store");
        assert_eq!(resolver.prefix(), Some("uploads"));
        assert_eq!(resolver.path("a.txt"), "/tmp/store/uploads/a.txt");
    }

    #[test]
    fn test_path_without_prefix() {
        let resolver = PathResolver::new("/tmp/store", None, None);
        assert_eq!(resolver.path("a.txt"), "/tmp/store/a.txt");
        assert_eq!(resolver.path("*"), "/tmp/store/*");
    }

    #[test]
    fn test_root_directory() {
        let resolver = PathResolver::new("/", None, None);
        assert_eq!(resolver.directory(), "");
        assert_eq!(resolver.path("a.txt"), "/a.txt");
    }

    #[test]
    fn test_url_omits_unset_components() {
        let bare = PathResolver::new("/tmp/store", None, None);
        assert_eq!(bare.url("a.txt"), "a.txt");

        let prefixed = PathResolver::new("/tmp/store", None, Some("uploads"));
        assert_eq!(prefixed.url("a.txt"), "uploads/a.txt");

        let hosted = PathResolver::new("/tmp/store", Some("//cdn.example.com/"), None);
        assert_eq!(hosted.url("a.txt"), "//cdn.example.com/a.txt");

        let full = PathResolver::new("/tmp/store", Some("//cdn.example.com"), Some("uploads"));
        assert_eq!(full.url("a.txt"), "//cdn.example.com/uploads/a.txt");
    }

    #[test]
    fn test_url_never_contains_directory() {
        let resolver = PathResolver::new("/srv/blobs", Some("https://cdn.test"), Some("u"));
        for id in ["a.txt", "nested/b.png", "c"] {
            assert!(!resolver.url(id).contains("/srv/blobs"));
        }
    }

    #[test]
    fn test_traversal_is_not_sanitized() {
        let resolver = PathResolver::new("/tmp/store", None, Some("uploads"));
        assert_eq!(resolver.path("../etc/passwd"), "/tmp/store/uploads/../etc/passwd");
        assert_eq!(resolver.path("/abs.txt"), "/tmp/store/uploads/abs.txt");
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent("/tmp/store/uploads/a.txt"), "/tmp/store/uploads");
        assert_eq!(parent("/a.txt"), "/");
        assert_eq!(parent("a.txt"), ".");
        assert_eq!(parent("uploads/nested/b"), "uploads/nested");
    }
}
