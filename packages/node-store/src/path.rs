//! Absolute node paths.

use std::fmt;

/// Errors related to path parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A path segment cannot name a node.
    #[error("invalid path segment '{segment}' at position {position}: {message}")]
    InvalidSegment {
        segment: String,
        position: usize,
        message: String,
    },
    /// The path string is invalid as a whole.
    #[error("invalid path: {message}")]
    InvalidPath { message: String },
}

/// A validated, absolute path in a node tree.
///
/// Segments are non-empty, are not `.` or `..`, and contain neither `/` nor
/// NUL. The empty segment list is the root, displayed as `/`.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// The root path `/`.
    pub fn root() -> Self {
        Path {
            segments: Vec::new(),
        }
    }

    /// Parse a path string, validating segments.
    ///
    /// # Path Syntax
    ///
    /// - Segments are separated by `/`
    /// - The leading `/` is optional
    /// - Empty segments are ignored (normalizes `//` and trailing `/`)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use treeconf_node_store::Path;
    ///
    /// let path = Path::parse("/services/web/port").unwrap();
    /// assert_eq!(path.len(), 3);
    /// assert_eq!(path.to_string(), "/services/web/port");
    ///
    /// assert_eq!(Path::parse("a/b/").unwrap(), Path::parse("/a//b").unwrap());
    /// ```
    pub fn parse(s: &str) -> Result<Self, PathError> {
        let segments: Vec<String> = s
            .split('/')
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string())
            .collect();

        Self::try_from_segments(segments)
    }

    /// Try to create a path from segments, validating each.
    pub fn try_from_segments(segments: Vec<String>) -> Result<Self, PathError> {
        for (i, segment) in segments.iter().enumerate() {
            Self::validate_segment(segment, i)?;
        }
        Ok(Path { segments })
    }

    fn validate_segment(segment: &str, position: usize) -> Result<(), PathError> {
        let reject = |message: &str| {
            Err(PathError::InvalidSegment {
                segment: segment.to_string(),
                position,
                message: message.to_string(),
            })
        };

        if segment.is_empty() {
            return reject("empty segment");
        }
        if segment == "." || segment == ".." {
            return reject("relative segments are not allowed");
        }
        if segment.contains('/') {
            return reject("segment contains '/'");
        }
        if segment.contains('\0') {
            return reject("segment contains NUL");
        }
        Ok(())
    }

    /// Check if this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Same as [`Path::is_root`].
    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    /// Iterate over segments.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.segments.iter()
    }

    /// The last segment, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Path> {
        if self.is_root() {
            return None;
        }
        Some(Path {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Append a single segment.
    pub fn child(&self, segment: &str) -> Result<Path, PathError> {
        Self::validate_segment(segment, self.segments.len())?;
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Path { segments })
    }

    /// Join this path with another.
    #[must_use]
    pub fn join(&self, other: &Path) -> Path {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Path { segments }
    }

    /// Descend by a relative path such as `b` or `b/c`.
    ///
    /// Unlike [`Path::join`] with a parsed path, a relative path naming no
    /// segment at all is an error, so the result is always strictly below
    /// `self`.
    pub fn descend(&self, relative: &str) -> Result<Path, PathError> {
        let relative = Path::parse(relative)?;
        if relative.is_root() {
            return Err(PathError::InvalidPath {
                message: format!("'{}' names no segment below {}", relative, self),
            });
        }
        Ok(self.join(&relative))
    }

    /// Check if this path has the given prefix.
    pub fn has_prefix(&self, prefix: &Path) -> bool {
        prefix.segments.len() <= self.segments.len()
            && prefix.segments == self.segments[..prefix.segments.len()]
    }

    /// Every proper ancestor from the root's first child down to the parent.
    ///
    /// `/a/b/c` yields `/a`, `/a/b`.
    pub fn ancestors(&self) -> impl Iterator<Item = Path> + '_ {
        (1..self.segments.len()).map(move |end| Path {
            segments: self.segments[..end].to_vec(),
        })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl std::ops::Index<usize> for Path {
    type Output = String;

    fn index(&self, i: usize) -> &Self::Output {
        &self.segments[i]
    }
}

/// Macro for creating paths from literals.
///
/// # Example
///
/// ```rust
/// use treeconf_node_store::path;
///
/// let p = path!("/services/web");
/// assert_eq!(p.len(), 2);
/// ```
#[macro_export]
macro_rules! path {
    ($s:expr) => {
        $crate::Path::parse($s).expect("invalid path literal")
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_paths() {
        assert_eq!(Path::parse("").unwrap().len(), 0);
        assert_eq!(Path::parse("/").unwrap().len(), 0);
        assert_eq!(Path::parse("/foo").unwrap().len(), 1);
        assert_eq!(Path::parse("/foo/bar/baz").unwrap().len(), 3);
    }

    #[test]
    fn normalize_slashes() {
        assert_eq!(path!("/foo/bar/"), path!("/foo/bar"));
        assert_eq!(path!("foo//bar"), path!("/foo/bar"));
        assert_eq!(path!("//"), Path::root());
    }

    #[test]
    fn service_style_names_allowed() {
        let p = path!("/app-1/db.host/0042/名前");
        assert_eq!(p.len(), 4);
        assert_eq!(&p[1], "db.host");
    }

    #[test]
    fn relative_segments_rejected() {
        let err = Path::parse("/a/../b").unwrap_err();
        assert!(err.to_string().contains("'..'"));
        assert!(Path::parse("/a/./b").is_err());
        assert!(Path::parse("/a/b\0c").is_err());
    }

    #[test]
    fn display_is_absolute() {
        assert_eq!(path!("foo/bar").to_string(), "/foo/bar");
        assert_eq!(Path::root().to_string(), "/");
    }

    #[test]
    fn name_and_parent() {
        let p = path!("/a/b/c");
        assert_eq!(p.name(), Some("c"));
        assert_eq!(p.parent(), Some(path!("/a/b")));
        assert_eq!(path!("/a").parent(), Some(Path::root()));
        assert_eq!(Path::root().parent(), None);
        assert_eq!(Path::root().name(), None);
    }

    #[test]
    fn child_validates_single_segment() {
        let p = path!("/a");
        assert_eq!(p.child("b").unwrap(), path!("/a/b"));
        assert!(p.child("b/c").is_err());
        assert!(p.child("").is_err());
    }

    #[test]
    fn descend_accepts_nested_relative_paths() {
        let p = path!("/a");
        assert_eq!(p.descend("b").unwrap(), path!("/a/b"));
        assert_eq!(p.descend("b/c").unwrap(), path!("/a/b/c"));
        assert!(p.descend("").is_err());
        assert!(p.descend("/").is_err());
        assert!(p.descend("..").is_err());
    }

    #[test]
    fn ancestors_excludes_root_and_self() {
        let p = path!("/a/b/c");
        let ancestors: Vec<Path> = p.ancestors().collect();
        assert_eq!(ancestors, vec![path!("/a"), path!("/a/b")]);
        assert_eq!(path!("/a").ancestors().count(), 0);
    }

    #[test]
    fn has_prefix_works() {
        let p = path!("/foo/bar/baz");
        assert!(p.has_prefix(&Path::root()));
        assert!(p.has_prefix(&path!("/foo/bar")));
        assert!(!p.has_prefix(&path!("/bar")));
        assert!(!p.has_prefix(&path!("/foo/bar/baz/qux")));
    }

    #[test]
    fn join_with_root() {
        let p = path!("/foo");
        assert_eq!(p.join(&Path::root()), p);
        assert_eq!(Path::root().join(&p), p);
    }

    #[test]
    fn from_str_parses() {
        let p: Path = "/x/y".parse().unwrap();
        assert_eq!(p, path!("/x/y"));
    }

    #[test]
    fn path_error_display_invalid_segment() {
        let err = PathError::InvalidSegment {
            segment: "..".to_string(),
            position: 2,
            message: "test message".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("position 2"));
        assert!(display.contains("test message"));
    }
}
