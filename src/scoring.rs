use std::cmp::Ordering;

use anyhow::{Result, anyhow};
use serde::Serialize;

use crate::dataset::PlayerRecord;

/// Raw statistics that feed the performance and consistency scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    PassCompletion,
    DribbleSuccess,
    ShotsOnTarget,
    DefensiveActions,
}

impl Metric {
    pub const DEFAULT_SET: [Metric; 4] = [
        Metric::PassCompletion,
        Metric::DribbleSuccess,
        Metric::ShotsOnTarget,
        Metric::DefensiveActions,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::PassCompletion => "Cmp%",
            Metric::DribbleSuccess => "DribSucc%",
            Metric::ShotsOnTarget => "SoT%",
            Metric::DefensiveActions => "Defensive Actions",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Metric::PassCompletion => "Passing %",
            Metric::DribbleSuccess => "Dribble Success %",
            Metric::ShotsOnTarget => "Shots on Target %",
            Metric::DefensiveActions => "Defensive Actions",
        }
    }

    pub fn value(self, record: &PlayerRecord) -> f64 {
        match self {
            Metric::PassCompletion => record.pass_completion_pct,
            Metric::DribbleSuccess => record.dribble_success_pct,
            Metric::ShotsOnTarget => record.shots_on_target_pct,
            Metric::DefensiveActions => record.defensive_actions as f64,
        }
    }
}

/// Recognized pipeline options. Defaults mirror the season analysis:
/// 900 minutes (~10 full matches), the four-metric set, uniform weights.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub min_minutes: u32,
    pub metrics: Vec<Metric>,
    pub weights: Option<Vec<f64>>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_minutes: 900,
            metrics: Metric::DEFAULT_SET.to_vec(),
            weights: None,
        }
    }
}

impl ScoringConfig {
    fn validate(&self) -> Result<()> {
        if self.metrics.is_empty() {
            return Err(anyhow!("scoring config needs at least one metric"));
        }
        if let Some(weights) = &self.weights {
            if weights.len() != self.metrics.len() {
                return Err(anyhow!(
                    "{} aggregation weights for {} metrics",
                    weights.len(),
                    self.metrics.len()
                ));
            }
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(anyhow!("aggregation weights must be finite and non-negative"));
            }
            if weights.iter().sum::<f64>() <= 0.0 {
                return Err(anyhow!("aggregation weights must not all be zero"));
            }
        }
        Ok(())
    }
}

/// A player row enriched with the computed scores. Parallel vectors follow
/// the config's metric order.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: PlayerRecord,
    pub normalized: Vec<f64>,
    pub performance_score: f64,
    pub consistency_score: f64,
    pub consistency_index: f64,
}

/// Keeps only players with enough minutes, preserving input order.
pub fn filter_by_minutes(records: &[PlayerRecord], min_minutes: u32) -> Vec<PlayerRecord> {
    records
        .iter()
        .filter(|r| r.minutes >= min_minutes)
        .cloned()
        .collect()
}

/// Min-max rescale each metric to [0,100] within the filtered population.
/// A metric where every player holds the same value rescales to 0 for all.
pub fn normalize(filtered: &[PlayerRecord], metrics: &[Metric]) -> Vec<Vec<f64>> {
    let mut table = vec![Vec::with_capacity(metrics.len()); filtered.len()];
    for metric in metrics {
        let values: Vec<f64> = filtered.iter().map(|r| metric.value(r)).collect();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;
        for (row, v) in table.iter_mut().zip(&values) {
            let norm = if range > 0.0 { (v - min) / range * 100.0 } else { 0.0 };
            row.push(norm);
        }
    }
    table
}

/// Weighted mean of the normalized sub-scores; uniform when `weights` is None.
pub fn performance_scores(normalized: &[Vec<f64>], weights: Option<&[f64]>) -> Vec<f64> {
    normalized
        .iter()
        .map(|row| match weights {
            Some(w) => {
                let total: f64 = w.iter().sum();
                row.iter().zip(w).map(|(v, w)| v * w).sum::<f64>() / total
            }
            None => row.iter().sum::<f64>() / row.len() as f64,
        })
        .collect()
}

/// Mean absolute z-score per player across the raw metrics. Sample stddev
/// (n-1 denominator); a zero-variance metric contributes z = 0.
pub fn consistency_scores(filtered: &[PlayerRecord], metrics: &[Metric]) -> Vec<f64> {
    let mut scores = vec![0.0; filtered.len()];
    for metric in metrics {
        let values: Vec<f64> = filtered.iter().map(|r| metric.value(r)).collect();
        let mean = mean(&values);
        let std = sample_std(&values, mean);
        for (score, v) in scores.iter_mut().zip(&values) {
            let z = if std > 0.0 { (v - mean) / std } else { 0.0 };
            *score += z.abs();
        }
    }
    for score in &mut scores {
        *score /= metrics.len() as f64;
    }
    scores
}

/// Invert and rescale consistency scores to [0,100], relative to this
/// population's maximum. All-identical populations score 100 across the board.
pub fn consistency_indices(consistency: &[f64]) -> Vec<f64> {
    let max = consistency.iter().copied().fold(0.0f64, f64::max);
    consistency
        .iter()
        .map(|score| {
            if max > 0.0 {
                100.0 - score / max * 100.0
            } else {
                100.0
            }
        })
        .collect()
}

/// Full pipeline: filter, normalize, aggregate, attach consistency.
/// Errors when no player clears the minutes threshold.
pub fn score_players(records: &[PlayerRecord], config: &ScoringConfig) -> Result<Vec<ScoredRecord>> {
    config.validate()?;
    let filtered = filter_by_minutes(records, config.min_minutes);
    if filtered.is_empty() {
        return Err(anyhow!(
            "no player reaches {} minutes; nothing to score",
            config.min_minutes
        ));
    }

    let normalized = normalize(&filtered, &config.metrics);
    let performance = performance_scores(&normalized, config.weights.as_deref());
    let consistency = consistency_scores(&filtered, &config.metrics);
    let indices = consistency_indices(&consistency);

    Ok(filtered
        .into_iter()
        .zip(normalized)
        .zip(performance)
        .zip(consistency.into_iter().zip(indices))
        .map(|(((record, normalized), performance_score), (consistency_score, consistency_index))| {
            ScoredRecord {
                record,
                normalized,
                performance_score,
                consistency_score,
                consistency_index,
            }
        })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    PerformanceScore,
    ConsistencyIndex,
    DefensiveActions,
    ShotsOnTarget,
    PassCompletion,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::PerformanceScore => "Performance Score",
            SortKey::ConsistencyIndex => "Consistency Index",
            SortKey::DefensiveActions => "Defensive Actions",
            SortKey::ShotsOnTarget => "SoT%",
            SortKey::PassCompletion => "Cmp%",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortKey::PerformanceScore => SortKey::ConsistencyIndex,
            SortKey::ConsistencyIndex => SortKey::DefensiveActions,
            SortKey::DefensiveActions => SortKey::ShotsOnTarget,
            SortKey::ShotsOnTarget => SortKey::PassCompletion,
            SortKey::PassCompletion => SortKey::PerformanceScore,
        }
    }

    fn value(self, row: &ScoredRecord) -> f64 {
        match self {
            SortKey::PerformanceScore => row.performance_score,
            SortKey::ConsistencyIndex => row.consistency_index,
            SortKey::DefensiveActions => row.record.defensive_actions as f64,
            SortKey::ShotsOnTarget => row.record.shots_on_target_pct,
            SortKey::PassCompletion => row.record.pass_completion_pct,
        }
    }
}

/// Stable sort by one computed field; ties keep their input order.
pub fn rank(table: &[ScoredRecord], key: SortKey, descending: bool) -> Vec<ScoredRecord> {
    let mut out = table.to_vec();
    out.sort_by(|a, b| {
        let ord = key
            .value(a)
            .partial_cmp(&key.value(b))
            .unwrap_or(Ordering::Equal);
        if descending { ord.reverse() } else { ord }
    });
    out
}

/// Unweighted mean of a player's raw metric values, the "all-rounder" score.
pub fn all_round_score(record: &PlayerRecord, metrics: &[Metric]) -> f64 {
    let sum: f64 = metrics.iter().map(|m| m.value(record)).sum();
    sum / metrics.len() as f64
}

pub const TEAM_CATEGORIES: [&str; 5] =
    ["Passing", "Dribbling", "Chance Creation", "Defense", "Consistency"];

/// Per-squad averages of the four metrics plus Consistency Index, min-max
/// rescaled to [0,100] across squads (one column per TEAM_CATEGORIES entry).
#[derive(Debug, Clone, Serialize)]
pub struct TeamProfile {
    pub squad: String,
    pub averages: Vec<f64>,
    pub rescaled: Vec<f64>,
}

pub fn team_profiles(table: &[ScoredRecord]) -> Vec<TeamProfile> {
    let mut squads: Vec<String> = Vec::new();
    for row in table {
        if !squads.contains(&row.record.squad) {
            squads.push(row.record.squad.clone());
        }
    }

    let mut profiles: Vec<TeamProfile> = squads
        .into_iter()
        .map(|squad| {
            let rows: Vec<&ScoredRecord> =
                table.iter().filter(|r| r.record.squad == squad).collect();
            let n = rows.len() as f64;
            let averages = vec![
                rows.iter().map(|r| r.record.pass_completion_pct).sum::<f64>() / n,
                rows.iter().map(|r| r.record.dribble_success_pct).sum::<f64>() / n,
                rows.iter().map(|r| r.record.shots_on_target_pct).sum::<f64>() / n,
                rows.iter().map(|r| r.record.defensive_actions as f64).sum::<f64>() / n,
                rows.iter().map(|r| r.consistency_index).sum::<f64>() / n,
            ];
            TeamProfile {
                squad,
                averages,
                rescaled: Vec::new(),
            }
        })
        .collect();

    for col in 0..TEAM_CATEGORIES.len() {
        let values: Vec<f64> = profiles.iter().map(|p| p.averages[col]).collect();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;
        for (profile, v) in profiles.iter_mut().zip(&values) {
            let rescaled = if range > 0.0 { (v - min) / range * 100.0 } else { 0.0 };
            profile.rescaled.push(rescaled);
        }
    }
    profiles
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let var = values
        .iter()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / (values.len() as f64 - 1.0);
    var.sqrt()
}
