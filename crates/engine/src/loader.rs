//! Locates and loads sequence files under the sequences directory.
//!
//! Layout: `<dir>/<name>.json`, or nested one level under a domain-named
//! subdirectory as `<dir>/<domain>/<name>.json`. A direct file wins over
//! any subdirectory match.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use sitepilot_core::{Error, Result};

use crate::sequence::Sequence;

/// Path of the named sequence, direct file first, then one-level-deep
/// subdirectories in sorted order.
pub fn find_sequence(dir: &Path, name: &str) -> Option<PathBuf> {
    let direct = dir.join(format!("{}.json", name));
    if direct.exists() {
        return Some(direct);
    }

    let entries = std::fs::read_dir(dir).ok()?;
    let mut subdirs: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    subdirs.sort();
    for sub in subdirs {
        let candidate = sub.join(format!("{}.json", name));
        if candidate.exists() {
            debug!(sequence = name, path = %candidate.display(), "Found nested sequence");
            return Some(candidate);
        }
    }
    None
}

pub fn load_sequence(dir: &Path, name: &str) -> Result<Sequence> {
    let path = find_sequence(dir, name).ok_or_else(|| {
        Error::NotFound(format!(
            "sequence '{}' not found under {}",
            name,
            dir.display()
        ))
    })?;
    let content = std::fs::read_to_string(&path)?;
    match serde_json::from_str(&content) {
        Ok(sequence) => Ok(sequence),
        Err(e) => {
            warn!(sequence = name, path = %path.display(), error = %e, "Malformed sequence file");
            Err(Error::Validation(format!(
                "sequence '{}' is not valid JSON: {}",
                name, e
            )))
        }
    }
}

/// Display names of every stored sequence, `domain/name` for nested ones,
/// sorted.
pub fn list_sequences(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return names,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let Some(sub_name) = path.file_name().and_then(|s| s.to_str()).map(String::from)
            else {
                continue;
            };
            if let Ok(sub_entries) = std::fs::read_dir(&path) {
                for sub_entry in sub_entries.flatten() {
                    if let Some(stem) = json_stem(&sub_entry.path()) {
                        names.push(format!("{}/{}", sub_name, stem));
                    }
                }
            }
        } else if let Some(stem) = json_stem(&path) {
            names.push(stem);
        }
    }
    names.sort();
    names
}

fn json_stem(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return None;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_sequence(dir: &Path, rel: &str, name: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let doc = format!(r#"{{"name":"{}","steps":[{{"action":"wait"}}]}}"#, name);
        std::fs::write(path, doc).unwrap();
    }

    #[test]
    fn test_direct_file_wins_over_nested() {
        let dir = TempDir::new().unwrap();
        write_sequence(dir.path(), "login.json", "login-root");
        write_sequence(dir.path(), "example.com/login.json", "login-nested");

        let seq = load_sequence(dir.path(), "login").unwrap();
        assert_eq!(seq.name, "login-root");
    }

    #[test]
    fn test_nested_lookup() {
        let dir = TempDir::new().unwrap();
        write_sequence(dir.path(), "example.com/post-update.json", "post-update");

        let seq = load_sequence(dir.path(), "post-update").unwrap();
        assert_eq!(seq.name, "post-update");
    }

    #[test]
    fn test_missing_sequence_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_sequence(dir.path(), "nope").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_malformed_sequence_reports_clearly() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{oops").unwrap();

        let err = load_sequence(dir.path(), "broken").unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_list_sequences_sorted_with_nesting() {
        let dir = TempDir::new().unwrap();
        write_sequence(dir.path(), "zeta.json", "zeta");
        write_sequence(dir.path(), "example.com/login.json", "login");
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(
            list_sequences(dir.path()),
            vec!["example.com/login".to_string(), "zeta".to_string()]
        );
    }
}
