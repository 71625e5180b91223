use std::collections::HashMap;

use crate::models::enums::MatchTier;
use crate::models::{Metric, MetricRecord};

use super::types::MetricMatch;

/// Read-only lookup structure over the reference-range table.
///
/// Records keep their load order; within a match tier the earliest record
/// wins. Exact, code and unit tiers are served from hash indexes, the
/// partial tiers scan.
#[derive(Debug, Clone, Default)]
pub struct MetricIndex {
    metrics: Vec<Metric>,
    by_code: HashMap<String, Vec<usize>>,
    by_unit: HashMap<String, Vec<usize>>,
}

impl MetricIndex {
    pub fn new(metrics: Vec<Metric>) -> Self {
        let mut by_code: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_unit: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, metric) in metrics.iter().enumerate() {
            for code in &metric.codes {
                push_position(by_code.entry(code.clone()).or_default(), idx);
            }
            for unit in &metric.units {
                push_position(by_unit.entry(unit.clone()).or_default(), idx);
            }
        }

        Self {
            metrics,
            by_code,
            by_unit,
        }
    }

    pub fn from_records(records: impl IntoIterator<Item = MetricRecord>) -> Self {
        Self::new(records.into_iter().map(Metric::from).collect())
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Find the metric for a test code and unit, trying each tier in order:
    /// exact, code only, unit only, partial code, partial unit.
    pub fn lookup(&self, code: &str, unit: &str) -> Option<MetricMatch<'_>> {
        let found = self
            .exact(code, unit)
            .map(|idx| (idx, MatchTier::Exact))
            .or_else(|| first_position(&self.by_code, code).map(|idx| (idx, MatchTier::Code)))
            .or_else(|| first_position(&self.by_unit, unit).map(|idx| (idx, MatchTier::Unit)))
            .or_else(|| {
                self.partial(code, codes_of)
                    .map(|idx| (idx, MatchTier::PartialCode))
            })
            .or_else(|| {
                self.partial(unit, units_of)
                    .map(|idx| (idx, MatchTier::PartialUnit))
            });

        match found {
            Some((idx, tier)) => {
                let metric = &self.metrics[idx];
                tracing::debug!(
                    code,
                    unit,
                    tier = tier.as_str(),
                    metric = %metric.name,
                    "Metric matched"
                );
                Some(MetricMatch { metric, tier })
            }
            None => {
                tracing::debug!(code, unit, "No metric matched code or unit");
                None
            }
        }
    }

    /// Case-insensitive containment, either direction, between the
    /// observation name and a metric display name.
    pub fn find_by_name(&self, name: &str) -> Option<&Metric> {
        let needle = name.to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let found = self.metrics.iter().find(|metric| {
            let candidate = metric.name.to_lowercase();
            !candidate.is_empty() && (candidate.contains(&needle) || needle.contains(&candidate))
        });

        match found {
            Some(metric) => tracing::debug!(name, metric = %metric.name, "Metric matched by name"),
            None => tracing::debug!(name, "No metric matched by name either"),
        }
        found
    }

    /// Code/unit lookup with the name fallback behind it.
    pub fn resolve(&self, code: &str, unit: &str, name: &str) -> Option<MetricMatch<'_>> {
        self.lookup(code, unit).or_else(|| {
            self.find_by_name(name).map(|metric| MetricMatch {
                metric,
                tier: MatchTier::Name,
            })
        })
    }

    fn exact(&self, code: &str, unit: &str) -> Option<usize> {
        self.by_code
            .get(code)?
            .iter()
            .copied()
            .find(|&idx| self.metrics[idx].units.iter().any(|u| u == unit))
    }

    fn partial(&self, needle: &str, values: fn(&Metric) -> &[String]) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        self.metrics.iter().position(|metric| {
            values(metric)
                .iter()
                .any(|v| v.contains(needle) || needle.contains(v.as_str()))
        })
    }
}

fn codes_of(metric: &Metric) -> &[String] {
    &metric.codes
}

fn units_of(metric: &Metric) -> &[String] {
    &metric.units
}

fn push_position(positions: &mut Vec<usize>, idx: usize) {
    if positions.last() != Some(&idx) {
        positions.push(idx);
    }
}

fn first_position(index: &HashMap<String, Vec<usize>>, key: &str) -> Option<usize> {
    index.get(key).and_then(|positions| positions.first().copied())
}
