//! Cycle statistics derived from a user's period entries.
//!
//! Everything here is a pure function of the entries passed in. Nothing
//! reads the clock, so the same input always yields the same output.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::entry::{Flow, PeriodEntry};

/// Fewest entries needed before a cycle length can be estimated.
pub const MIN_ENTRIES_FOR_ESTIMATE: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleEstimate {
    #[serde(rename_all = "camelCase")]
    InsufficientData {
        entry_count: usize,
    },
    #[serde(rename_all = "camelCase")]
    Estimated {
        gaps: Vec<i64>,
        average_cycle_length: i64,
        last_period: NaiveDate,
        /// `None` only if the prediction falls outside the representable date range.
        next_period: Option<NaiveDate>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowCount {
    pub flow: Flow,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleAnalysis {
    pub entry_count: usize,
    pub cycle: CycleEstimate,
    pub symptoms: Vec<TagCount>,
    pub moods: Vec<TagCount>,
    pub flow: Vec<FlowCount>,
}

/// Occurrence count per distinct tag. Matching is exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymptomTally {
    counts: BTreeMap<String, usize>,
}

impl SymptomTally {
    pub fn from_entries(entries: &[PeriodEntry]) -> Self {
        Self::from_tags(entries.iter().flat_map(|e| e.symptoms.iter().map(String::as_str)))
    }

    /// Tally of `mood:` tags only, keyed without the prefix.
    pub fn moods_from_entries(entries: &[PeriodEntry]) -> Self {
        Self::from_tags(entries.iter().flat_map(|e| e.moods()))
    }

    fn from_tags<'a>(tags: impl Iterator<Item = &'a str>) -> Self {
        let mut counts = BTreeMap::new();
        for tag in tags {
            *counts.entry(tag.to_string()).or_insert(0) += 1;
        }
        Self { counts }
    }

    #[cfg(test)]
    pub fn count(&self, tag: &str) -> usize {
        self.counts.get(tag).copied().unwrap_or(0)
    }

    #[cfg(test)]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Most frequent first; equal counts fall back to ascending tag order.
    pub fn ranked(&self) -> Vec<TagCount> {
        let mut ranked: Vec<TagCount> = self
            .counts
            .iter()
            .map(|(tag, &count)| TagCount {
                tag: tag.clone(),
                count,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        ranked
    }
}

/// Entries in ascending date order. Same-day entries keep id order.
pub fn sorted_by_date(entries: &[PeriodEntry]) -> Vec<&PeriodEntry> {
    let mut sorted: Vec<&PeriodEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| (e.date, e.id));
    sorted
}

/// Whole-day gaps between consecutive entries after sorting by date.
///
/// Two entries on the same day contribute a gap of 0.
pub fn cycle_gaps(entries: &[PeriodEntry]) -> Vec<i64> {
    sorted_by_date(entries)
        .windows(2)
        .map(|pair| (pair[1].date - pair[0].date).num_days())
        .collect()
}

/// Integer mean rounded half-up, matching `Math.round` for non-negative input.
///
/// `count` must be positive.
pub fn round_half_up(sum: i64, count: i64) -> i64 {
    (2 * sum + count).div_euclid(2 * count)
}

pub fn average_cycle_length(entries: &[PeriodEntry]) -> Option<i64> {
    if entries.len() < MIN_ENTRIES_FOR_ESTIMATE {
        return None;
    }
    let gaps = cycle_gaps(entries);
    Some(round_half_up(gaps.iter().sum(), gaps.len() as i64))
}

pub fn predict_next_period(entries: &[PeriodEntry]) -> Option<NaiveDate> {
    let average = average_cycle_length(entries)?;
    let last = entries.iter().map(|e| e.date).max()?;
    last.checked_add_signed(Duration::days(average))
}

pub fn estimate_cycle(entries: &[PeriodEntry]) -> CycleEstimate {
    let sorted = sorted_by_date(entries);
    let (Some(average), Some(last)) = (average_cycle_length(entries), sorted.last()) else {
        return CycleEstimate::InsufficientData {
            entry_count: entries.len(),
        };
    };

    CycleEstimate::Estimated {
        gaps: cycle_gaps(entries),
        average_cycle_length: average,
        last_period: last.date,
        next_period: predict_next_period(entries),
    }
}

/// Entry count per flow level, in severity order. Levels never logged report 0.
pub fn flow_distribution(entries: &[PeriodEntry]) -> Vec<FlowCount> {
    Flow::ALL
        .iter()
        .map(|&flow| FlowCount {
            flow,
            count: entries.iter().filter(|e| e.flow == flow).count(),
        })
        .collect()
}

pub fn analyze(entries: &[PeriodEntry]) -> CycleAnalysis {
    CycleAnalysis {
        entry_count: entries.len(),
        cycle: estimate_cycle(entries),
        symptoms: SymptomTally::from_entries(entries).ranked(),
        moods: SymptomTally::moods_from_entries(entries).ranked(),
        flow: flow_distribution(entries),
    }
}
