//! Reference/generated file pair resolution

use crate::Result;
use log::debug;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Supported container extensions, probed in priority order.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["flac", "wav"];

/// A reference/generated file pair sharing a base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPair {
    /// Shared base name, extension stripped.
    pub base: String,

    /// Resolved reference file path.
    pub reference: PathBuf,

    /// Resolved generated file path.
    pub generated: PathBuf,
}

/// Resolve all file pairs present on both sides.
///
/// With a split allow-list (newline-delimited names, extensions stripped) only
/// listed base names are considered; otherwise the extension-stripped listings
/// of both directories are intersected. Each base name probes the supported
/// extensions in priority order independently per side; names that do not
/// resolve on both sides are skipped silently, a deliberate best-effort
/// policy. Pairs come back sorted by base name; downstream aggregation is
/// order-independent either way.
pub fn match_pairs(
    reference_dir: &Path,
    generated_dir: &Path,
    split: Option<&Path>,
) -> Result<Vec<MatchedPair>> {
    let bases: BTreeSet<String> = match split {
        Some(split_path) => fs::read_to_string(split_path)?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(strip_extension)
            .collect(),
        None => {
            let reference = list_base_names(reference_dir)?;
            let generated = list_base_names(generated_dir)?;
            reference.intersection(&generated).cloned().collect()
        }
    };

    let mut pairs = Vec::with_capacity(bases.len());
    for base in &bases {
        match (probe(reference_dir, base), probe(generated_dir, base)) {
            (Some(reference), Some(generated)) => pairs.push(MatchedPair {
                base: base.clone(),
                reference,
                generated,
            }),
            (reference, generated) => debug!(
                "skipping '{}': reference resolved={}, generated resolved={}",
                base,
                reference.is_some(),
                generated.is_some()
            ),
        }
    }

    Ok(pairs)
}

/// First existing candidate for `base` in `dir`, in extension priority order.
fn probe(dir: &Path, base: &str) -> Option<PathBuf> {
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{base}.{ext}")))
        .find(|candidate| candidate.exists())
}

fn list_base_names(dir: &Path) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        names.insert(strip_extension(&entry.file_name().to_string_lossy()));
    }
    Ok(names)
}

/// Drop the final extension from a bare file name.
pub(crate) fn strip_extension(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}
