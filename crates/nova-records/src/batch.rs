//! Fixing many classes at once.

use nova_classfile::ClassStub;
use rayon::prelude::*;

use crate::config::RecordFixConfig;
use crate::error::RecordFixError;
use crate::fixer::{FixOutcome, RecordFixer};
use crate::registry::ClassRegistry;

/// Per-class results of [`fix_all`], in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub results: Vec<Result<FixOutcome, RecordFixError>>,
}

impl BatchReport {
    /// Number of classes that were modified.
    pub fn changed(&self) -> usize {
        self.results
            .iter()
            .filter(|result| matches!(result, Ok(outcome) if !outcome.is_unchanged()))
            .count()
    }

    pub fn records(&self) -> usize {
        self.results
            .iter()
            .filter(|result| match result {
                Ok(outcome) => outcome.is_record,
                Err(_) => true,
            })
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &RecordFixError> + '_ {
        self.results.iter().filter_map(|result| result.as_ref().err())
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Fixes every class in parallel. Classes share nothing but the registry, so
/// a failure in one leaves the others (and itself) untouched.
pub fn fix_all<R>(classes: &mut [ClassStub], registry: &R, config: &RecordFixConfig) -> BatchReport
where
    R: ClassRegistry + Sync + ?Sized,
{
    let fixer = RecordFixer::new(registry, config);
    let results: Vec<_> = classes
        .par_iter_mut()
        .map(|class| {
            let result = fixer.fix(class);
            if let Err(err) = &result {
                tracing::warn!(
                    target: "nova.records",
                    class = %err.class_name(),
                    error = %err,
                    "failed to fix record class"
                );
            }
            result
        })
        .collect();

    let report = BatchReport { results };
    tracing::debug!(
        target: "nova.records",
        classes = classes.len(),
        records = report.records(),
        changed = report.changed(),
        "fixed record classes"
    );
    report
}
