use crate::scoring::{ScoredRecord, SortKey, rank};

const WIDTH: usize = 80;

/// Console summary of the scored table: five top-5 boards, one per sort key.
pub fn render_report(table: &[ScoredRecord]) -> String {
    let mut out = String::new();
    out.push_str(&"=".repeat(WIDTH));
    out.push('\n');
    out.push_str(&center("2022-2023 SÜPER LIG MIDFIELDER ANALYSIS"));
    out.push('\n');
    out.push_str(&"=".repeat(WIDTH));
    out.push('\n');

    push_board(&mut out, table, "TOP 5 OVERALL PERFORMERS", SortKey::PerformanceScore);
    push_board(&mut out, table, "TOP 5 MOST CONSISTENT PLAYERS", SortKey::ConsistencyIndex);
    push_board(&mut out, table, "TOP DEFENSIVE MIDFIELDERS", SortKey::DefensiveActions);
    push_board(&mut out, table, "TOP CREATIVE MIDFIELDERS", SortKey::ShotsOnTarget);
    push_board(&mut out, table, "BEST PASSERS", SortKey::PassCompletion);
    out
}

fn push_board(out: &mut String, table: &[ScoredRecord], title: &str, key: SortKey) {
    out.push('\n');
    out.push_str(title);
    out.push_str(":\n");

    let ranked = rank(table, key, true);
    let top = &ranked[..ranked.len().min(5)];

    let name_w = top
        .iter()
        .map(|r| r.record.player.chars().count())
        .max()
        .unwrap_or(6)
        .max("Player".len());
    let squad_w = top
        .iter()
        .map(|r| r.record.squad.chars().count())
        .max()
        .unwrap_or(5)
        .max("Squad".len());

    out.push_str(&format!(
        "{:<name_w$}  {:<squad_w$}  {}\n",
        "Player",
        "Squad",
        key.label()
    ));
    for row in top {
        out.push_str(&format!(
            "{}  {}  {}\n",
            pad_name(&row.record.player, name_w),
            pad_name(&row.record.squad, squad_w),
            format_value(row, key)
        ));
    }
}

fn format_value(row: &ScoredRecord, key: SortKey) -> String {
    match key {
        SortKey::PerformanceScore => format!("{:.1}", row.performance_score),
        SortKey::ConsistencyIndex => format!("{:.1}", row.consistency_index),
        SortKey::DefensiveActions => row.record.defensive_actions.to_string(),
        SortKey::ShotsOnTarget => format!("{:.1}", row.record.shots_on_target_pct),
        SortKey::PassCompletion => format!("{:.1}", row.record.pass_completion_pct),
    }
}

// format! width counts bytes, not chars; Turkish names need manual padding.
fn pad_name(name: &str, width: usize) -> String {
    let chars = name.chars().count();
    let mut out = name.to_string();
    for _ in chars..width {
        out.push(' ');
    }
    out
}

fn center(text: &str) -> String {
    let chars = text.chars().count();
    if chars >= WIDTH {
        return text.to_string();
    }
    let left = (WIDTH - chars) / 2;
    format!("{}{}", " ".repeat(left), text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::load_midfielders;
    use crate::scoring::{ScoringConfig, score_players};

    #[test]
    fn report_contains_all_boards() {
        let records = load_midfielders().unwrap();
        let table = score_players(&records, &ScoringConfig::default()).unwrap();
        let report = render_report(&table);
        assert!(report.contains("TOP 5 OVERALL PERFORMERS"));
        assert!(report.contains("TOP 5 MOST CONSISTENT PLAYERS"));
        assert!(report.contains("TOP DEFENSIVE MIDFIELDERS"));
        assert!(report.contains("TOP CREATIVE MIDFIELDERS"));
        assert!(report.contains("BEST PASSERS"));
    }

    #[test]
    fn defensive_board_leads_with_siopis() {
        // 42 TklW + 37 Int is the dataset's defensive high-water mark.
        let records = load_midfielders().unwrap();
        let table = score_players(&records, &ScoringConfig::default()).unwrap();
        let report = render_report(&table);
        let defensive = report
            .split("TOP DEFENSIVE MIDFIELDERS")
            .nth(1)
            .expect("defensive board present");
        let first_row = defensive.lines().nth(2).expect("board has rows");
        assert!(first_row.contains("Manolis Siopis"));
        assert!(first_row.contains("79"));
    }
}
