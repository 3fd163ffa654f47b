//! Report generation for evaluation results

use crate::spatial::SpatialScores;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Plain text report, fixed metric ordering
    Text,
    /// Machine-readable JSON record
    Json,
}

/// One evaluation run's results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Generated audio directory
    pub generated_path: String,

    /// Reference audio directory
    pub reference_path: String,

    /// KLpasst score, absent when no tagger backend was registered
    pub kl_passt: Option<f64>,

    /// FDopenl3 score, absent when no embedding backend was registered
    pub fd_openl3: Option<f64>,

    /// Spatial localization error means
    pub spatial: SpatialScores,
}

impl EvalReport {
    /// Create a report for a finished run.
    pub fn new(
        generated_path: impl Into<String>,
        reference_path: impl Into<String>,
        kl_passt: Option<f64>,
        fd_openl3: Option<f64>,
        spatial: SpatialScores,
    ) -> Self {
        Self {
            timestamp: timestamp_now(),
            generated_path: generated_path.into(),
            reference_path: reference_path.into(),
            kl_passt,
            fd_openl3,
            spatial,
        }
    }

    /// Generate the report in the specified format.
    pub fn generate(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Text => self.to_text(),
            ReportFormat::Json => self.to_json(),
        }
    }

    /// Save the report to file.
    pub fn save<P: AsRef<Path>>(&self, path: P, format: ReportFormat) -> std::io::Result<()> {
        let content = self.generate(format);
        let mut file = std::fs::File::create(path)?;
        file.write_all(content.as_bytes())
    }

    /// Fixed-order textual report: KLpasst, FDopenl3, then the spatial block.
    fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Evaluation report ({})\n", self.timestamp));
        output.push_str(&format!("Generated: {}\n", self.generated_path));
        output.push_str(&format!("Reference: {}\n\n", self.reference_path));

        match self.kl_passt {
            Some(kl) => output.push_str(&format!("KLpasst: {}\n", kl)),
            None => output.push_str("KLpasst: skipped (no tagger backend)\n"),
        }
        match self.fd_openl3 {
            Some(fd) => output.push_str(&format!("FDopenl3: {}\n", fd)),
            None => output.push_str("FDopenl3: skipped (no embedding backend)\n"),
        }

        output.push_str("Spatial metrics:\n");
        output.push_str(&format!("Theta: {}\n", self.spatial.theta));
        output.push_str(&format!("Phi: {}\n", self.spatial.phi));
        output.push_str(&format!("Spatial angle: {}\n", self.spatial.spatial_angle));

        output
    }

    fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".into())
    }
}

/// Simple ISO 8601 timestamp without a full chrono dependency.
pub(crate) fn timestamp_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let secs = duration.as_secs();

    let days = secs / 86400;
    let time_of_day = secs % 86400;
    let hours = time_of_day / 3600;
    let minutes = (time_of_day % 3600) / 60;
    let seconds = time_of_day % 60;

    let mut year = 1970u64;
    let mut remaining_days = days;
    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining_days < days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }

    let days_in_months: [u64; 12] = if is_leap_year(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let mut month = 1;
    for (i, &d) in days_in_months.iter().enumerate() {
        if remaining_days < d {
            month = i + 1;
            break;
        }
        remaining_days -= d;
    }
    let day = remaining_days + 1;

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year, month, day, hours, minutes, seconds
    )
}

fn is_leap_year(year: u64) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}
