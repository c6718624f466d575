//! Forward search outcomes to the analyzer and persist the results.

use tracing::{info, warn};

use crate::llm::Analyzer;
use crate::repository::{ProductRepository, Result};
use crate::search::{analysis_text, SearchOutcome};

/// Caller-supplied values that replace what the model extracted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides<'a> {
    pub brand: Option<&'a str>,
    pub product_name: Option<&'a str>,
}

/// What happened to each term.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// Terms analyzed and stored.
    pub stored: Vec<String>,
    /// Terms with no matches to analyze.
    pub skipped: Vec<String>,
    /// Terms whose analysis failed, with the reason.
    pub failed: Vec<(String, String)>,
}

/// Analyze every outcome that has matches and upsert it under its term.
///
/// Analyzer failures are recorded per term and do not stop the run; store
/// failures are returned.
pub fn analyze_and_store(
    results: &[(String, SearchOutcome)],
    analyzer: &dyn Analyzer,
    repo: &ProductRepository,
    overrides: Overrides<'_>,
) -> Result<PipelineReport> {
    let mut report = PipelineReport::default();

    for (term, outcome) in results {
        if !outcome.has_matches() {
            info!("No matches for '{}', skipping analysis", term);
            report.skipped.push(term.clone());
            continue;
        }

        let mut analysis = match analyzer.analyze(&analysis_text(outcome)) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Analysis failed for '{}': {}", term, e);
                report.failed.push((term.clone(), e.to_string()));
                continue;
            }
        };
        analysis.apply_overrides(overrides.brand, overrides.product_name);

        repo.upsert(term, &analysis)?;
        report.stored.push(term.clone());
    }

    Ok(report)
}
