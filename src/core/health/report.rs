use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::config::Thresholds;

use super::collector::{CategoryFilter, Snapshot};
use super::metrics::{Category, SystemIdentity};
use super::thresholds::{Assessment, StatusTier, ThresholdEvaluator};

/// Assessments of one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub category: Category,
    pub assessments: Vec<Assessment>,
}

/// Evaluated snapshot, ready to render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub taken_at: DateTime<Utc>,
    pub identity: SystemIdentity,
    pub sections: Vec<Section>,
    pub overall: StatusTier,
}

/// Worst known tier; `Ok` when there is none.
pub fn overall_tier<I>(tiers: I) -> StatusTier
where
    I: IntoIterator<Item = StatusTier>,
{
    tiers
        .into_iter()
        .filter(StatusTier::is_known)
        .max()
        .unwrap_or(StatusTier::Ok)
}

impl Report {
    /// Group assessments into sections.
    ///
    /// Sections follow [`Category`] declaration order and only cover
    /// categories the filter includes. Disk and network entries are sorted by
    /// mount point / interface name; entries for the same subject keep their
    /// collection order.
    pub fn build(
        taken_at: DateTime<Utc>,
        identity: SystemIdentity,
        assessments: Vec<Assessment>,
        filter: &CategoryFilter,
    ) -> Self {
        let overall = overall_tier(assessments.iter().map(|a| a.tier));

        let sections = Category::ALL
            .iter()
            .copied()
            .filter(|category| filter.includes(*category))
            .map(|category| {
                let mut entries: Vec<Assessment> = assessments
                    .iter()
                    .filter(|a| a.metric.category == category)
                    .cloned()
                    .collect();
                if matches!(category, Category::Disk | Category::Network) {
                    entries.sort_by(|a, b| a.metric.subject().cmp(&b.metric.subject()));
                }
                Section {
                    category,
                    assessments: entries,
                }
            })
            .collect();

        Self {
            taken_at,
            identity,
            sections,
            overall,
        }
    }

    /// Evaluate a snapshot against `thresholds`
    pub fn from_snapshot(
        snapshot: &Snapshot,
        thresholds: &Thresholds,
        filter: &CategoryFilter,
    ) -> Self {
        let evaluator = ThresholdEvaluator::new(thresholds, snapshot.cpu_cores());
        let assessments = evaluator.evaluate_all(&snapshot.metrics);
        Self::build(
            snapshot.taken_at,
            snapshot.identity.clone(),
            assessments,
            filter,
        )
    }

    pub fn exit_code(&self) -> i32 {
        self.overall.exit_code()
    }

    pub fn section(&self, category: Category) -> Option<&Section> {
        self.sections.iter().find(|s| s.category == category)
    }

    pub fn assessments(&self) -> impl Iterator<Item = &Assessment> {
        self.sections.iter().flat_map(|s| s.assessments.iter())
    }

    pub fn find(&self, metric_name: &str) -> Option<&Assessment> {
        self.assessments().find(|a| a.metric.name == metric_name)
    }

    pub fn count(&self, tier: StatusTier) -> usize {
        self.assessments().filter(|a| a.tier == tier).count()
    }
}
