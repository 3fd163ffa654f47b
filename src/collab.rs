//! Contracts for the external FDopenl3 and KLpasst collaborators
//!
//! The pretrained embedding and tagger models are opaque feature extractors
//! owned elsewhere; this crate only defines their call contracts and the
//! explicit configuration structures that replace the original tool's
//! process-wide constants. Cache file formats are owned by the collaborators.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Which pretrained OpenL3 variant to embed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    /// Model trained on music.
    Music,
    /// Model trained on environmental sound.
    Env,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Music => "music",
            Self::Env => "env",
        }
    }
}

/// OpenL3 embedding parameters for the FDopenl3 computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Openl3Config {
    /// Model channel count, 1 or 2.
    pub channels: usize,

    /// Sample rate the embedder evaluates at, Hz.
    pub sample_rate: u32,

    /// Pretrained model variant.
    pub content_type: ContentType,

    /// Windowing hop size in seconds (the OpenL3 window is 1 s).
    pub hop_size: f64,
}

impl Default for Openl3Config {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 44_100,
            content_type: ContentType::Env,
            hop_size: 0.5,
        }
    }
}

/// One FDopenl3 scoring request.
#[derive(Debug)]
pub struct FrechetRequest<'a> {
    /// Id to reference audio file.
    pub reference: &'a BTreeMap<String, PathBuf>,

    /// Id to generated audio file.
    pub generated: &'a BTreeMap<String, PathBuf>,

    pub config: &'a Openl3Config,

    /// Precomputed reference embeddings to reuse instead of re-embedding.
    pub reference_embeddings: Option<&'a Path>,
}

/// Frechet-style distance between reference and generated embedding sets.
pub trait EmbeddingDistance {
    fn frechet_distance(&self, request: &FrechetRequest<'_>) -> anyhow::Result<f64>;
}

/// Reduction applied over per-id divergences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KlAggregation {
    #[default]
    Mean,
    Median,
}

/// PaSST tagger parameters for the KLpasst computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasstConfig {
    /// Extension of the generated audio files, leading dot included.
    pub eval_extension: String,

    /// Extension of the reference audio files, leading dot included.
    pub ref_extension: String,

    pub aggregation: KlAggregation,

    /// Ids to skip entirely, e.g. reference recordings that could not be
    /// retrieved.
    pub skip_ids: Vec<String>,
}

impl Default for PasstConfig {
    fn default() -> Self {
        Self {
            eval_extension: ".flac".into(),
            ref_extension: ".flac".into(),
            aggregation: KlAggregation::Mean,
            skip_ids: Vec::new(),
        }
    }
}

/// One KLpasst scoring request.
#[derive(Debug)]
pub struct KlRequest<'a> {
    pub ids: &'a [String],
    pub reference_dir: &'a Path,
    pub generated_dir: &'a Path,
    pub config: &'a PasstConfig,

    /// Precomputed reference class probabilities to reuse.
    pub reference_probabilities: Option<&'a Path>,
}

/// KL divergence between predicted class-probability distributions.
pub trait TaggerDivergence {
    fn kl_divergence(&self, request: &KlRequest<'_>) -> anyhow::Result<f64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openl3_defaults_match_source_constants() {
        let config = Openl3Config::default();
        assert_eq!(config.channels, 2);
        assert_eq!(config.sample_rate, 44_100);
        assert_eq!(config.content_type, ContentType::Env);
        assert_eq!(config.hop_size, 0.5);
    }

    #[test]
    fn test_passt_defaults() {
        let config = PasstConfig::default();
        assert_eq!(config.eval_extension, ".flac");
        assert_eq!(config.aggregation, KlAggregation::Mean);
        assert!(config.skip_ids.is_empty());
    }

    #[test]
    fn test_content_type_tags() {
        assert_eq!(ContentType::Music.as_str(), "music");
        assert_eq!(ContentType::Env.as_str(), "env");
    }
}
