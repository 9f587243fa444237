//! Duplicate output path tracking.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Output paths claimed during a run, first writer wins.
#[derive(Debug, Default)]
pub struct EmittedPaths {
    /// output relative path → source relative path of the claimant
    claims: HashMap<PathBuf, PathBuf>,
}

impl EmittedPaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source of the item that already claimed `output`.
    pub fn claimant(&self, output: &Path) -> Option<&Path> {
        self.claims.get(output).map(PathBuf::as_path)
    }

    /// Record a claim. Returns `false`, leaving the first claim in place, if
    /// `output` was already taken.
    pub fn claim(&mut self, output: PathBuf, source: PathBuf) -> bool {
        match self.claims.entry(output) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(source);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_claim_wins() {
        let mut emitted = EmittedPaths::new();
        assert!(emitted.claim("plain/index.html".into(), "plain.html".into()));
        assert!(!emitted.claim("plain/index.html".into(), "plain.md".into()));

        assert_eq!(
            emitted.claimant(Path::new("plain/index.html")),
            Some(Path::new("plain.html"))
        );
        assert_eq!(emitted.len(), 1);
    }

    #[test]
    fn test_unclaimed() {
        let emitted = EmittedPaths::new();
        assert!(emitted.claimant(Path::new("a.html")).is_none());
        assert!(emitted.is_empty());
    }
}
