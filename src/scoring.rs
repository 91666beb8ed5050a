//! Aligns generated records with ground truth by id and accumulates
//! accuracy / evidence-recall per group (movie) and globally.

use crate::types::{AnnotationRecord, CharSlot, DemographicEntry, EvidenceStrength, RecordSet};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq)]
pub struct ItemScore {
    pub id: String,
    pub relationship_correct: bool,
    /// `None` when ground truth cites no lines.
    pub evidence_recall: Option<f64>,
    /// `None` when no typed ground-truth evidence could be compared.
    pub type_agreement: Option<f64>,
}

/// Case-insensitive, whitespace-trimmed label equality. An empty label only matches empty.
pub fn labels_match(ground_truth: &str, generated: &str) -> bool {
    ground_truth.trim().to_lowercase() == generated.trim().to_lowercase()
}

/// `|gt ∩ gen| / |gt|`; extra generated lines never lower the score.
pub fn evidence_recall(gt: &BTreeSet<i64>, generated: &BTreeSet<i64>) -> Option<f64> {
    if gt.is_empty() {
        return None;
    }
    let hit = gt.intersection(generated).count();
    Some(hit as f64 / gt.len() as f64)
}

/// Fraction of typed ground-truth evidence items for which some generated
/// item citing an overlapping line carries the equivalent strength. Each
/// side's `type` is read in its own vocabulary (`Definitive` vs `Explicit`).
pub fn type_agreement(gt: &AnnotationRecord, generated: Option<&AnnotationRecord>) -> Option<f64> {
    let mut compared = 0usize;
    let mut agreeing = 0usize;
    for gt_item in &gt.evidence {
        let Some(strength) = EvidenceStrength::from_ground_truth(&gt_item.kind) else { continue };
        if gt_item.line_indices.is_empty() {
            continue;
        }
        compared += 1;
        let agrees = generated.map_or(false, |g| {
            g.evidence.iter().any(|gen_item| {
                EvidenceStrength::from_generated(&gen_item.kind) == Some(strength)
                    && gen_item.line_indices.iter().any(|i| gt_item.line_indices.contains(i))
            })
        });
        if agrees {
            agreeing += 1;
        }
    }
    (compared > 0).then(|| agreeing as f64 / compared as f64)
}

pub fn score_item(id: &str, gt: &AnnotationRecord, generated: Option<&AnnotationRecord>) -> ItemScore {
    let relationship_correct = generated.map_or(false, |g| labels_match(&gt.relationship, &g.relationship));
    let gen_lines = generated.map(AnnotationRecord::cited_lines).unwrap_or_default();
    ItemScore {
        id: id.to_string(),
        relationship_correct,
        evidence_recall: evidence_recall(&gt.cited_lines(), &gen_lines),
        type_agreement: type_agreement(gt, generated),
    }
}

fn percent(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupStats {
    pub total: usize,
    pub correct: usize,
    pub recall_sum: f64,
    pub recall_count: usize,
    pub type_agreement_sum: f64,
    pub type_agreement_count: usize,
}

impl GroupStats {
    pub fn record(&mut self, item: &ItemScore) {
        self.total += 1;
        if item.relationship_correct {
            self.correct += 1;
        }
        if let Some(r) = item.evidence_recall {
            self.recall_sum += r;
            self.recall_count += 1;
        }
        if let Some(t) = item.type_agreement {
            self.type_agreement_sum += t;
            self.type_agreement_count += 1;
        }
    }

    pub fn merge(&mut self, other: &GroupStats) {
        self.total += other.total;
        self.correct += other.correct;
        self.recall_sum += other.recall_sum;
        self.recall_count += other.recall_count;
        self.type_agreement_sum += other.type_agreement_sum;
        self.type_agreement_count += other.type_agreement_count;
    }

    pub fn accuracy(&self) -> f64 {
        percent(self.correct as f64, self.total as f64)
    }

    pub fn average_recall(&self) -> f64 {
        percent(self.recall_sum, self.recall_count as f64)
    }

    pub fn average_type_agreement(&self) -> f64 {
        percent(self.type_agreement_sum, self.type_agreement_count as f64)
    }
}

/// Run-scoped accumulator table. One per evaluation run.
#[derive(Debug, Default)]
pub struct Scoreboard {
    groups: BTreeMap<String, GroupStats>,
    files_processed: usize,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores every ground-truth id in `ground_truth`; ids only present in
    /// `generated` are ignored.
    pub fn score(&mut self, group: &str, ground_truth: &RecordSet, generated: &RecordSet) -> Vec<ItemScore> {
        let mut items = Vec::with_capacity(ground_truth.len());
        for (id, gt) in ground_truth {
            let item = score_item(id, gt, generated.get(id));
            self.groups.entry(group.to_string()).or_default().record(&item);
            items.push(item);
        }
        items
    }

    pub fn note_file_processed(&mut self) {
        self.files_processed += 1;
    }

    pub fn files_processed(&self) -> usize {
        self.files_processed
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &GroupStats)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn group(&self, name: &str) -> Option<&GroupStats> {
        self.groups.get(name)
    }

    /// Sum of the group accumulators, not an average of group averages.
    pub fn totals(&self) -> GroupStats {
        let mut all = GroupStats::default();
        for stats in self.groups.values() {
            all.merge(stats);
        }
        all
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemographicStats {
    pub total: usize,
    pub age_correct: usize,
    pub sex_correct: usize,
}

impl DemographicStats {
    pub fn merge(&mut self, other: &DemographicStats) {
        self.total += other.total;
        self.age_correct += other.age_correct;
        self.sex_correct += other.sex_correct;
    }

    pub fn age_accuracy(&self) -> f64 {
        percent(self.age_correct as f64, self.total as f64)
    }

    pub fn sex_accuracy(&self) -> f64 {
        percent(self.sex_correct as f64, self.total as f64)
    }
}

fn by_slot(entries: &[DemographicEntry]) -> BTreeMap<CharSlot, &DemographicEntry> {
    let mut out = BTreeMap::new();
    for e in entries {
        if let Some(slot) = e.slot() {
            out.entry(slot).or_insert(e);
        }
    }
    out
}

/// Aligns by `char1`/`char2` slot; a missing generated slot is wrong on both counts.
pub fn score_demographics(ground_truth: &[DemographicEntry], generated: &[DemographicEntry]) -> DemographicStats {
    let gen = by_slot(generated);
    let mut stats = DemographicStats::default();
    for (slot, gt) in by_slot(ground_truth) {
        stats.total += 1;
        if let Some(g) = gen.get(&slot) {
            if labels_match(&gt.age, &g.age) {
                stats.age_correct += 1;
            }
            if labels_match(&gt.sex, &g.sex) {
                stats.sex_correct += 1;
            }
        }
    }
    stats
}

#[derive(Debug, Default)]
pub struct DemographicScoreboard {
    groups: BTreeMap<String, DemographicStats>,
    files_processed: usize,
}

impl DemographicScoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&mut self, group: &str, ground_truth: &[DemographicEntry], generated: &[DemographicEntry]) {
        let stats = score_demographics(ground_truth, generated);
        self.groups.entry(group.to_string()).or_default().merge(&stats);
    }

    pub fn note_file_processed(&mut self) {
        self.files_processed += 1;
    }

    pub fn files_processed(&self) -> usize {
        self.files_processed
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &DemographicStats)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn totals(&self) -> DemographicStats {
        let mut all = DemographicStats::default();
        for stats in self.groups.values() {
            all.merge(stats);
        }
        all
    }
}
