use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::scoring::{Metric, ScoredRecord, TEAM_CATEGORIES, TeamProfile, team_profiles};
use crate::team_colors;

pub struct ExportReport {
    pub path: PathBuf,
    pub players: usize,
    pub teams: usize,
}

pub fn default_xlsx_path() -> PathBuf {
    PathBuf::from(format!(
        "midfield_analysis_{}.xlsx",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}

pub fn default_json_path() -> PathBuf {
    PathBuf::from(format!(
        "midfield_analysis_{}.json",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Write the scored table as a workbook: a Players sheet with raw and
/// normalized values, a Teams sheet with squad averages.
pub fn export_xlsx(path: &Path, table: &[ScoredRecord], metrics: &[Metric]) -> Result<ExportReport> {
    let profiles = team_profiles(table);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Players")?;
        write_rows(sheet, &player_rows(table, metrics))?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Teams")?;
        write_rows(sheet, &team_rows(&profiles))?;
    }
    workbook
        .save(path)
        .with_context(|| format!("save workbook to {}", path.display()))?;

    Ok(ExportReport {
        path: path.to_path_buf(),
        players: table.len(),
        teams: profiles.len(),
    })
}

/// Write the scored table as JSON, one object per player.
pub fn export_json(path: &Path, table: &[ScoredRecord]) -> Result<ExportReport> {
    let json = serde_json::to_string_pretty(table).context("serialize scored table")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(ExportReport {
        path: path.to_path_buf(),
        players: table.len(),
        teams: 0,
    })
}

fn player_rows(table: &[ScoredRecord], metrics: &[Metric]) -> Vec<Vec<String>> {
    let mut header = vec![
        "Player".to_string(),
        "Squad".to_string(),
        "Squad Color".to_string(),
        "Min".to_string(),
        "Cmp%".to_string(),
        "DribSucc%".to_string(),
        "SoT%".to_string(),
        "TklW".to_string(),
        "Int".to_string(),
        "Defensive Actions".to_string(),
    ];
    for metric in metrics {
        header.push(format!("{} (norm)", metric.label()));
    }
    header.push("Performance Score".to_string());
    header.push("Consistency Index".to_string());

    let mut rows = vec![header];
    for row in table {
        let r = &row.record;
        let mut cells = vec![
            r.player.clone(),
            r.squad.clone(),
            team_colors::hex_color(&r.squad).to_string(),
            r.minutes.to_string(),
            format!("{:.1}", r.pass_completion_pct),
            format!("{:.1}", r.dribble_success_pct),
            format!("{:.1}", r.shots_on_target_pct),
            r.tackles_won.to_string(),
            r.interceptions.to_string(),
            r.defensive_actions.to_string(),
        ];
        for norm in &row.normalized {
            cells.push(format!("{norm:.2}"));
        }
        cells.push(format!("{:.2}", row.performance_score));
        cells.push(format!("{:.2}", row.consistency_index));
        rows.push(cells);
    }
    rows
}

fn team_rows(profiles: &[TeamProfile]) -> Vec<Vec<String>> {
    let mut header = vec!["Squad".to_string()];
    for category in TEAM_CATEGORIES {
        header.push(format!("{category} (avg)"));
    }
    for category in TEAM_CATEGORIES {
        header.push(format!("{category} (rescaled)"));
    }

    let mut rows = vec![header];
    for profile in profiles {
        let mut cells = vec![profile.squad.clone()];
        for v in &profile.averages {
            cells.push(format!("{v:.2}"));
        }
        for v in &profile.rescaled {
            cells.push(format!("{v:.2}"));
        }
        rows.push(cells);
    }
    rows
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::load_midfielders;
    use crate::scoring::{ScoringConfig, score_players};

    #[test]
    fn player_rows_include_scores_and_colors() {
        let records = load_midfielders().unwrap();
        let config = ScoringConfig::default();
        let table = score_players(&records, &config).unwrap();
        let rows = player_rows(&table, &config.metrics);

        assert_eq!(rows.len(), table.len() + 1);
        let header = &rows[0];
        assert!(header.contains(&"Performance Score".to_string()));
        assert!(header.contains(&"Cmp% (norm)".to_string()));
        // Every data row carries the squad hex color for chart styling.
        assert!(rows[1..].iter().all(|r| r[2].starts_with('#')));
    }

    #[test]
    fn team_rows_cover_every_squad_once() {
        let records = load_midfielders().unwrap();
        let table = score_players(&records, &ScoringConfig::default()).unwrap();
        let rows = team_rows(&team_profiles(&table));
        // Header plus the four Süper Lig squads.
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn json_export_round_trips_names() {
        let records = load_midfielders().unwrap();
        let table = score_players(&records, &ScoringConfig::default()).unwrap();
        let dir = std::env::temp_dir().join("midfield_terminal_test_json");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("table.json");

        let report = export_json(&path, &table).unwrap();
        assert_eq!(report.players, table.len());

        let raw = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), table.len());
        assert!(raw.contains("Lucas Torreira"));
        let _ = fs::remove_file(&path);
    }
}
