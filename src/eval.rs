//! Evaluation driver composing the metric subsystems

use crate::collab::{
    EmbeddingDistance, FrechetRequest, KlAggregation, KlRequest, Openl3Config, PasstConfig,
    TaggerDivergence,
};
use crate::ids::IdSelector;
use crate::report::EvalReport;
use crate::spatial::{self, ErrorKind, SpatialOptions};
use crate::{EvalError, Result};
use log::info;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for one evaluation run.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Directory with the generated audio to evaluate.
    pub generated_dir: PathBuf,

    /// Directory with the reference/ground-truth audio.
    pub reference_dir: PathBuf,

    /// Id-correspondence CSV (column `ytid`); mutually exclusive with
    /// `split_path`.
    pub csv_path: Option<PathBuf>,

    /// Split allow-list, one filename per line; mutually exclusive with
    /// `csv_path`.
    pub split_path: Option<PathBuf>,

    /// Precomputed reference class probabilities for KLpasst.
    pub kl_ref_probabilities: Option<PathBuf>,

    /// Precomputed reference embeddings for FDopenl3.
    pub fd_ref_embeddings: Option<PathBuf>,

    /// Extension of the generated audio files, leading dot included.
    pub eval_extension: String,

    /// Extension of the reference audio files, leading dot included.
    pub ref_extension: String,

    /// Spatial error reduction.
    pub error_kind: ErrorKind,

    /// Optional per-file decode budget for the spatial path.
    pub decode_timeout: Option<Duration>,

    /// OpenL3 embedding parameters for the FDopenl3 collaborator.
    pub openl3: Openl3Config,

    /// Reduction over per-id KL divergences.
    pub kl_aggregation: KlAggregation,

    /// Ids skipped by the KLpasst collaborator.
    pub skip_ids: Vec<String>,
}

impl EvalConfig {
    /// Configuration with the source tool's defaults for everything but the
    /// two directories.
    pub fn new(generated_dir: impl Into<PathBuf>, reference_dir: impl Into<PathBuf>) -> Self {
        Self {
            generated_dir: generated_dir.into(),
            reference_dir: reference_dir.into(),
            csv_path: None,
            split_path: None,
            kl_ref_probabilities: None,
            fd_ref_embeddings: None,
            eval_extension: ".flac".into(),
            ref_extension: ".flac".into(),
            error_kind: ErrorKind::Mae,
            decode_timeout: None,
            openl3: Openl3Config::default(),
            kl_aggregation: KlAggregation::Mean,
            skip_ids: Vec::new(),
        }
    }
}

/// Composes the id selector, the external collaborators and the spatial
/// subsystem into one run.
///
/// Collaborator backends are optional registrations; an additional metric
/// backend (e.g. a CLAP-style text/audio score) slots in the same way without
/// structural rework.
pub struct Evaluator {
    config: EvalConfig,
    embedding: Option<Box<dyn EmbeddingDistance>>,
    tagger: Option<Box<dyn TaggerDivergence>>,
}

impl Evaluator {
    pub fn new(config: EvalConfig) -> Self {
        Self {
            config,
            embedding: None,
            tagger: None,
        }
    }

    /// Register the FDopenl3 collaborator.
    pub fn with_embedding_distance(mut self, backend: Box<dyn EmbeddingDistance>) -> Self {
        self.embedding = Some(backend);
        self
    }

    /// Register the KLpasst collaborator.
    pub fn with_tagger_divergence(mut self, backend: Box<dyn TaggerDivergence>) -> Self {
        self.tagger = Some(backend);
        self
    }

    /// Run the full evaluation.
    ///
    /// Fails fast on selector problems before any file I/O; every
    /// sub-component error aborts the run with no partial metrics.
    pub fn run(&self) -> Result<EvalReport> {
        let selector = IdSelector::from_paths(
            self.config.csv_path.clone(),
            self.config.split_path.clone(),
        )?;
        let ids = selector.load_ids()?;
        info!("evaluating {} ids", ids.len());

        let kl_passt = match &self.tagger {
            Some(backend) => {
                info!("computing KLpasst");
                let passt = PasstConfig {
                    eval_extension: self.config.eval_extension.clone(),
                    ref_extension: self.config.ref_extension.clone(),
                    aggregation: self.config.kl_aggregation,
                    skip_ids: self.config.skip_ids.clone(),
                };
                let request = KlRequest {
                    ids: &ids,
                    reference_dir: &self.config.reference_dir,
                    generated_dir: &self.config.generated_dir,
                    config: &passt,
                    reference_probabilities: self.config.kl_ref_probabilities.as_deref(),
                };
                Some(
                    backend
                        .kl_divergence(&request)
                        .map_err(EvalError::Collaborator)?,
                )
            }
            None => {
                info!("no tagger backend registered, skipping KLpasst");
                None
            }
        };

        let fd_openl3 = match &self.embedding {
            Some(backend) => {
                info!("computing FDopenl3");
                let reference =
                    id_paths(&self.config.reference_dir, &ids, &self.config.ref_extension);
                let generated =
                    id_paths(&self.config.generated_dir, &ids, &self.config.eval_extension);
                let request = FrechetRequest {
                    reference: &reference,
                    generated: &generated,
                    config: &self.config.openl3,
                    reference_embeddings: self.config.fd_ref_embeddings.as_deref(),
                };
                Some(
                    backend
                        .frechet_distance(&request)
                        .map_err(EvalError::Collaborator)?,
                )
            }
            None => {
                info!("no embedding backend registered, skipping FDopenl3");
                None
            }
        };

        info!("computing spatial metrics");
        let options = SpatialOptions {
            error_kind: self.config.error_kind,
            decode_timeout: self.config.decode_timeout,
        };
        let scores = spatial::calculate_spatial_metrics(
            &self.config.reference_dir,
            &self.config.generated_dir,
            selector.split_path(),
            &options,
        )?;

        Ok(EvalReport::new(
            self.config.generated_dir.display().to_string(),
            self.config.reference_dir.display().to_string(),
            kl_passt,
            fd_openl3,
            scores,
        ))
    }
}

/// Map each id to its audio file in `dir` with the given extension.
fn id_paths(dir: &Path, ids: &[String], extension: &str) -> BTreeMap<String, PathBuf> {
    ids.iter()
        .map(|id| (id.clone(), dir.join(format!("{id}{extension}"))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;
    use std::fs;

    struct FixedDistance(f64);

    impl EmbeddingDistance for FixedDistance {
        fn frechet_distance(&self, request: &FrechetRequest<'_>) -> anyhow::Result<f64> {
            assert_eq!(request.reference.len(), request.generated.len());
            Ok(self.0)
        }
    }

    struct FixedDivergence(f64);

    impl TaggerDivergence for FixedDivergence {
        fn kl_divergence(&self, request: &KlRequest<'_>) -> anyhow::Result<f64> {
            assert!(!request.ids.is_empty());
            Ok(self.0)
        }
    }

    fn write_quad_wav(path: &Path, x: f32, y: f32) {
        let spec = hound::WavSpec {
            channels: 4,
            sample_rate: 48_000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..128 {
            for sample in [1.0f32, x, y, 0.0] {
                writer.write_sample(sample).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    fn fixture(dir: &Path) -> EvalConfig {
        let reference = dir.join("ref");
        let generated = dir.join("gen");
        fs::create_dir_all(&reference).unwrap();
        fs::create_dir_all(&generated).unwrap();
        write_quad_wav(&reference.join("clip.wav"), 1.0, 0.0);
        write_quad_wav(&generated.join("clip.wav"), 0.0, 1.0);

        let split = dir.join("split.txt");
        fs::write(&split, "clip.wav\n").unwrap();

        let mut config = EvalConfig::new(generated, reference);
        config.split_path = Some(split);
        config
    }

    #[test]
    fn test_run_without_backends() {
        let dir = tempfile::tempdir().unwrap();
        let report = Evaluator::new(fixture(dir.path())).run().unwrap();

        assert_eq!(report.kl_passt, None);
        assert_eq!(report.fd_openl3, None);
        assert_abs_diff_eq!(report.spatial.theta, FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn test_run_with_backends() {
        let dir = tempfile::tempdir().unwrap();
        let report = Evaluator::new(fixture(dir.path()))
            .with_embedding_distance(Box::new(FixedDistance(42.0)))
            .with_tagger_divergence(Box::new(FixedDivergence(1.5)))
            .run()
            .unwrap();

        assert_eq!(report.kl_passt, Some(1.5));
        assert_eq!(report.fd_openl3, Some(42.0));
    }

    #[test]
    fn test_missing_selector_fails_before_io() {
        let config = EvalConfig::new("/nonexistent/gen", "/nonexistent/ref");
        let err = Evaluator::new(config).run().unwrap_err();
        assert!(matches!(err, EvalError::MissingSelector));
    }

    #[test]
    fn test_conflicting_selectors_rejected() {
        let mut config = EvalConfig::new("/nonexistent/gen", "/nonexistent/ref");
        config.csv_path = Some("ids.csv".into());
        config.split_path = Some("split.txt".into());
        let err = Evaluator::new(config).run().unwrap_err();
        assert!(matches!(err, EvalError::ConflictingSelectors));
    }

    #[test]
    fn test_id_paths_join() {
        let ids = vec!["a".to_string(), "b".to_string()];
        let paths = id_paths(Path::new("/audio"), &ids, ".flac");
        assert_eq!(paths["a"], PathBuf::from("/audio/a.flac"));
        assert_eq!(paths["b"], PathBuf::from("/audio/b.flac"));
    }
}
