//! Evaluation id-list selection for the driver boundary

use crate::matcher::strip_extension;
use crate::{EvalError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Source of the evaluation id list: an id-correspondence CSV (column `ytid`)
/// or a plain split-list file with one filename per line. Exactly one of the
/// two must be supplied.
#[derive(Debug, Clone)]
pub enum IdSelector {
    Csv(PathBuf),
    Split(PathBuf),
}

impl IdSelector {
    /// Build a selector from optional paths, enforcing the exactly-one rule.
    pub fn from_paths(csv: Option<PathBuf>, split: Option<PathBuf>) -> Result<Self> {
        match (csv, split) {
            (Some(csv), None) => Ok(Self::Csv(csv)),
            (None, Some(split)) => Ok(Self::Split(split)),
            (None, None) => Err(EvalError::MissingSelector),
            (Some(_), Some(_)) => Err(EvalError::ConflictingSelectors),
        }
    }

    /// Path to the split allow-list, when this selector is one.
    ///
    /// The spatial matcher restricts to the split when present; with a CSV
    /// selector it falls back to directory intersection.
    pub fn split_path(&self) -> Option<&Path> {
        match self {
            Self::Split(path) => Some(path),
            Self::Csv(_) => None,
        }
    }

    /// Load the evaluation ids.
    pub fn load_ids(&self) -> Result<Vec<String>> {
        match self {
            Self::Csv(path) => load_ytid_column(path),
            Self::Split(path) => load_split_list(path),
        }
    }
}

/// Read the `ytid` column from an id-correspondence CSV.
fn load_ytid_column(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let mut lines = content.lines();

    let header = lines
        .next()
        .ok_or_else(|| EvalError::InvalidIdFile(format!("{}: empty csv", path.display())))?;
    let column = header
        .split(',')
        .position(|name| name.trim() == "ytid")
        .ok_or_else(|| {
            EvalError::InvalidIdFile(format!("{}: no 'ytid' column", path.display()))
        })?;

    let mut ids = Vec::new();
    for (row, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let id = line.split(',').nth(column).ok_or_else(|| {
            EvalError::InvalidIdFile(format!(
                "{}: row {} is missing the 'ytid' column",
                path.display(),
                row + 2
            ))
        })?;
        ids.push(id.trim().to_string());
    }

    Ok(ids)
}

/// Read a split list, one filename per line, extensions stripped.
fn load_split_list(path: &Path) -> Result<Vec<String>> {
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(strip_extension)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_selector() {
        let csv = Some(PathBuf::from("ids.csv"));
        let split = Some(PathBuf::from("split.txt"));

        assert!(matches!(
            IdSelector::from_paths(csv.clone(), None),
            Ok(IdSelector::Csv(_))
        ));
        assert!(matches!(
            IdSelector::from_paths(None, split.clone()),
            Ok(IdSelector::Split(_))
        ));
        assert!(matches!(
            IdSelector::from_paths(None, None),
            Err(EvalError::MissingSelector)
        ));
        assert!(matches!(
            IdSelector::from_paths(csv, split),
            Err(EvalError::ConflictingSelectors)
        ));
    }

    #[test]
    fn test_csv_ytid_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ids.csv");
        fs::write(&path, "caption,ytid,start\nsome text,abc123,0\nmore,def456,10\n").unwrap();

        let ids = IdSelector::Csv(path).load_ids().unwrap();
        assert_eq!(ids, vec!["abc123", "def456"]);
    }

    #[test]
    fn test_csv_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ids.csv");
        fs::write(&path, "caption,id\ntext,abc\n").unwrap();

        let err = IdSelector::Csv(path).load_ids().unwrap_err();
        assert!(matches!(err, EvalError::InvalidIdFile(_)));
    }

    #[test]
    fn test_split_list_strips_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("split.txt");
        fs::write(&path, "clip_a.flac\nclip_b.wav\n\nclip_c\n").unwrap();

        let ids = IdSelector::Split(path).load_ids().unwrap();
        assert_eq!(ids, vec!["clip_a", "clip_b", "clip_c"]);
    }
}
