use midfield_terminal::dataset::{PlayerRecord, load_midfielders};
use midfield_terminal::scoring::{
    Metric, ScoringConfig, SortKey, consistency_indices, consistency_scores, filter_by_minutes,
    normalize, performance_scores, rank, score_players,
};

fn record(name: &str, minutes: u32, cmp: f64, drib: f64, sot: f64, tkl: u32, int: u32) -> PlayerRecord {
    PlayerRecord {
        player: name.to_string(),
        squad: "Test SK".to_string(),
        minutes,
        pass_completion_pct: cmp,
        dribble_success_pct: drib,
        shots_on_target_pct: sot,
        tackles_won: tkl,
        interceptions: int,
        defensive_actions: tkl + int,
    }
}

#[test]
fn normalized_values_stay_in_range_and_hit_extremes() {
    let records = load_midfielders().unwrap();
    let filtered = filter_by_minutes(&records, 900);
    let table = normalize(&filtered, &Metric::DEFAULT_SET);

    for col in 0..Metric::DEFAULT_SET.len() {
        let column: Vec<f64> = table.iter().map(|row| row[col]).collect();
        assert!(column.iter().all(|v| (0.0..=100.0).contains(v)));
        assert!(column.iter().any(|v| *v == 0.0), "column {col} misses 0");
        assert!(column.iter().any(|v| *v == 100.0), "column {col} misses 100");
    }
}

#[test]
fn performance_score_reconstructs_from_sub_scores() {
    let records = load_midfielders().unwrap();
    let table = score_players(&records, &ScoringConfig::default()).unwrap();
    for row in &table {
        let mean: f64 = row.normalized.iter().sum::<f64>() / row.normalized.len() as f64;
        assert!((row.performance_score - mean).abs() < 1e-9);
        assert!((0.0..=100.0).contains(&row.performance_score));
    }
}

#[test]
fn lowest_consistency_score_gets_highest_index() {
    let records = load_midfielders().unwrap();
    let table = score_players(&records, &ScoringConfig::default()).unwrap();

    let steadiest = table
        .iter()
        .min_by(|a, b| a.consistency_score.partial_cmp(&b.consistency_score).unwrap())
        .unwrap();
    let max_index = table
        .iter()
        .map(|r| r.consistency_index)
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(steadiest.consistency_index, max_index);

    // The index is a monotone inversion of the score.
    for a in &table {
        for b in &table {
            if a.consistency_score < b.consistency_score {
                assert!(a.consistency_index > b.consistency_index);
            }
        }
    }
}

#[test]
fn identical_population_falls_back_not_nan() {
    let records = vec![
        record("A", 1500, 80.0, 60.0, 30.0, 10, 5),
        record("B", 2000, 80.0, 60.0, 30.0, 10, 5),
        record("C", 2500, 80.0, 60.0, 30.0, 10, 5),
    ];
    let table = score_players(&records, &ScoringConfig::default()).unwrap();
    assert_eq!(table.len(), 3);
    for row in &table {
        assert!(row.normalized.iter().all(|v| *v == 0.0));
        assert_eq!(row.performance_score, 0.0);
        assert_eq!(row.consistency_score, 0.0);
        assert_eq!(row.consistency_index, 100.0);
    }
}

#[test]
fn empty_filtered_population_is_an_error() {
    let records = load_midfielders().unwrap();
    let config = ScoringConfig {
        min_minutes: 10_000,
        ..ScoringConfig::default()
    };
    let err = score_players(&records, &config).unwrap_err();
    assert!(format!("{err:#}").contains("no player reaches"));
}

#[test]
fn rank_is_stable_on_ties() {
    let records = vec![
        record("First", 1500, 80.0, 60.0, 30.0, 10, 5),
        record("Second", 1500, 80.0, 60.0, 30.0, 10, 5),
        record("Third", 1500, 80.0, 60.0, 30.0, 10, 5),
    ];
    let table = score_players(&records, &ScoringConfig::default()).unwrap();
    // All scores tie, so every sort key must preserve input order.
    let mut key = SortKey::PerformanceScore;
    for _ in 0..5 {
        let ranked = rank(&table, key, true);
        let names: Vec<&str> = ranked.iter().map(|r| r.record.player.as_str()).collect();
        assert_eq!(names, ["First", "Second", "Third"], "key {:?}", key.label());
        key = key.next();
    }
}

#[test]
fn two_player_population_maps_to_extremes() {
    let records = vec![
        record("A", 1500, 80.0, 60.0, 20.0, 5, 5),
        record("B", 1500, 90.0, 70.0, 40.0, 15, 15),
    ];
    let table = score_players(&records, &ScoringConfig::default()).unwrap();
    let a = &table[0];
    let b = &table[1];

    assert!(a.normalized.iter().all(|v| *v == 0.0));
    assert!(b.normalized.iter().all(|v| *v == 100.0));
    assert_eq!(a.performance_score, 0.0);
    assert_eq!(b.performance_score, 100.0);
}

#[test]
fn excluded_players_never_shift_the_scores() {
    let core = vec![
        record("A", 1500, 80.0, 60.0, 20.0, 5, 5),
        record("B", 1500, 90.0, 70.0, 40.0, 15, 15),
        record("C", 1200, 85.0, 65.0, 30.0, 10, 10),
    ];
    let mut with_benchwarmer = core.clone();
    // An extreme outlier below the threshold must not move anyone.
    with_benchwarmer.push(record("Bench", 100, 10.0, 5.0, 1.0, 0, 0));

    let config = ScoringConfig::default();
    let base = score_players(&core, &config).unwrap();
    let extended = score_players(&with_benchwarmer, &config).unwrap();

    assert_eq!(base.len(), extended.len());
    for (x, y) in base.iter().zip(&extended) {
        assert_eq!(x.record.player, y.record.player);
        assert_eq!(x.performance_score, y.performance_score);
        assert_eq!(x.consistency_index, y.consistency_index);
    }
}

#[test]
fn pipeline_stages_compose_like_score_players() {
    let records = load_midfielders().unwrap();
    let config = ScoringConfig::default();

    let filtered = filter_by_minutes(&records, config.min_minutes);
    let normalized = normalize(&filtered, &config.metrics);
    let performance = performance_scores(&normalized, None);
    let consistency = consistency_scores(&filtered, &config.metrics);
    let indices = consistency_indices(&consistency);

    let table = score_players(&records, &config).unwrap();
    assert_eq!(table.len(), filtered.len());
    for (i, row) in table.iter().enumerate() {
        assert_eq!(row.record.player, filtered[i].player);
        assert_eq!(row.performance_score, performance[i]);
        assert_eq!(row.consistency_score, consistency[i]);
        assert_eq!(row.consistency_index, indices[i]);
    }
}

#[test]
fn threshold_filters_the_known_benchwarmers() {
    let records = load_midfielders().unwrap();
    let filtered = filter_by_minutes(&records, 900);
    assert_eq!(filtered.len(), 34);
    assert!(filtered.iter().all(|r| r.minutes >= 900));
    assert!(!filtered.iter().any(|r| r.player == "Berkay Vardar"));
    // 920 minutes just clears the bar.
    assert!(filtered.iter().any(|r| r.player == "Etebo"));
}
