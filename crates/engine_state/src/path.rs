//! Stage paths.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Absolute, `/`-separated address of a prim on the stage.
///
/// Paths are plain strings; they are normalised on construction so that
/// equal addresses compare equal (leading `/`, no trailing or doubled
/// separators).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrimPath(String);

impl PrimPath {
    pub fn new(path: impl AsRef<str>) -> Self {
        let segments: Vec<&str> = path
            .as_ref()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        Self(format!("/{}", segments.join("/")))
    }

    pub fn root() -> Self {
        Self("/".to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    pub fn child(&self, name: &str) -> Self {
        Self::new(format!("{}/{}", self.0, name))
    }

    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let cut = self.0.rfind('/').unwrap_or(0);
        Some(Self::new(&self.0[..cut]))
    }

    /// Last path element, empty for the root.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or("")
    }

    pub fn has_prefix(&self, prefix: &PrimPath) -> bool {
        prefix.is_root()
            || self.0 == prefix.0
            || (self.0.starts_with(&prefix.0) && self.0.as_bytes().get(prefix.0.len()) == Some(&b'/'))
    }
}

impl fmt::Display for PrimPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PrimPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalisation() {
        assert_eq!(PrimPath::new("Windows//Window_1/").as_str(), "/Windows/Window_1");
        assert_eq!(PrimPath::new("").as_str(), "/");
    }

    #[test]
    fn test_parent_and_name() {
        let path = PrimPath::new("/Workspaces/Layout/Screen");
        assert_eq!(path.name(), "Screen");
        assert_eq!(path.parent(), Some(PrimPath::new("/Workspaces/Layout")));
        assert_eq!(PrimPath::new("/Scene").parent(), Some(PrimPath::root()));
        assert_eq!(PrimPath::root().parent(), None);
    }

    #[test]
    fn test_prefix_respects_segment_boundaries() {
        let screen = PrimPath::new("/Layout/Screen");
        assert!(PrimPath::new("/Layout/Screen/Area_0").has_prefix(&screen));
        assert!(!PrimPath::new("/Layout/ScreenB").has_prefix(&screen));
    }
}
