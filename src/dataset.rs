use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// 2022-23 Süper Lig midfielder season stats, one row per player.
/// Columns: Player,Squad,Min,Cmp%,DribSucc%,SoT%,TklW,Int
pub const MIDFIELDERS_2022_23: &str = "\
Player,Squad,Min,Cmp%,DribSucc%,SoT%,TklW,Int
Sergio Oliveira,Galatasaray,2310,84.3,61.7,22.5,32,27
Lucas Torreira,Galatasaray,2670,86.7,68.4,18.3,41,35
Kerem Aktürkoğlu,Galatasaray,3010,76.9,58.4,44.3,15,11
Berkan Kutlu,Galatasaray,1780,82.1,63.2,15.8,28,19
Dries Mertens,Galatasaray,1890,79.8,57.3,38.7,7,9
Yunus Akgün,Galatasaray,1640,75.4,59.6,36.2,11,14
Fredrik Midtsjø,Galatasaray,2050,83.5,64.1,19.5,26,22
Etebo,Galatasaray,920,83.8,66.2,15.3,18,14
Dusan Tadić,Fenerbahçe,3120,82.4,63.1,45.3,22,14
Miguel Crespo,Fenerbahçe,2210,87.2,68.9,19.1,38,29
İrfan Can Kahveci,Fenerbahçe,2450,83.7,61.8,39.6,26,18
Sebastian Szymański,Fenerbahçe,2840,81.6,58.7,42.1,19,23
Willian Arao,Fenerbahçe,1980,88.9,65.3,12.4,31,25
Miha Zajc,Fenerbahçe,1420,80.2,60.7,37.8,13,16
Ferdi Kadıoğlu,Fenerbahçe,2980,79.3,62.4,33.6,29,21
Lincoln,Fenerbahçe,1250,76.8,59.2,40.1,8,11
Gedson Fernandes,Beşiktaş,2750,83.5,67.8,31.7,35,28
Salih Uçan,Beşiktaş,1870,85.7,62.4,18.9,27,21
Alexandru Maxim,Beşiktaş,1560,79.8,59.3,38.2,14,17
Rachid Ghezzal,Beşiktaş,2580,76.5,62.4,43.7,9,13
Berkay Vardar,Beşiktaş,680,77.3,56.1,29.4,5,8
Tayfur Bingöl,Beşiktaş,1320,81.9,64.7,21.8,19,15
Umut Meraş,Beşiktaş,1580,78.4,58.9,17.5,23,18
Nathan Redmond,Beşiktaş,1720,75.6,61.3,41.2,7,10
Anastasios Bakasetas,Trabzonspor,2920,81.9,57.8,41.5,24,19
Manolis Siopis,Trabzonspor,2740,86.3,64.7,14.6,42,37
Uğurcan Yazğılı,Trabzonspor,2150,78.5,59.2,25.3,19,22
Marek Hamšík,Trabzonspor,1890,84.7,60.8,19.8,21,17
Abdülkadir Ömür,Trabzonspor,1420,79.2,61.4,33.7,11,15
Yusuf Yazıcı,Trabzonspor,1350,78.9,59.7,38.4,8,11
Jean Evrard Kouassi,Trabzonspor,1210,76.3,58.6,28.9,16,13
Andreas Cornelius,Trabzonspor,1280,75.4,52.8,46.1,3,4
Dorukhan Toköz,Beşiktaş,1540,82.6,65.1,17.2,23,16
Emre Kılınç,Galatasaray,1430,80.7,63.5,26.8,15,12
Arda Güler,Fenerbahçe,980,81.4,64.8,40.3,6,9
Bartuğ Elmaz,Galatasaray,720,77.9,60.2,31.5,9,7
Efe Can Kaya,Trabzonspor,650,79.6,58.3,35.2,5,8
Batuhan Kör,Beşiktaş,580,76.2,55.7,28.7,7,9
";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player: String,
    pub squad: String,
    pub minutes: u32,
    pub pass_completion_pct: f64,
    pub dribble_success_pct: f64,
    pub shots_on_target_pct: f64,
    pub tackles_won: u32,
    pub interceptions: u32,
    // TklW + Int, fixed at load time.
    pub defensive_actions: u32,
}

/// Parse the embedded season dataset.
pub fn load_midfielders() -> Result<Vec<PlayerRecord>> {
    parse_players_csv(MIDFIELDERS_2022_23)
}

pub fn parse_players_csv(raw: &str) -> Result<Vec<PlayerRecord>> {
    let mut rows = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if idx == 0 && line.to_lowercase().starts_with("player,") {
            continue;
        }
        let record = parse_player_row(line)
            .with_context(|| format!("parse dataset row {}: {line}", idx + 1))?;
        rows.push(record);
    }
    if rows.is_empty() {
        return Err(anyhow!("dataset contains no player rows"));
    }
    Ok(rows)
}

fn parse_player_row(line: &str) -> Result<PlayerRecord> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 8 {
        return Err(anyhow!("expected 8 columns, got {}", fields.len()));
    }

    let player = fields[0].to_string();
    let squad = fields[1].to_string();
    if player.is_empty() || squad.is_empty() {
        return Err(anyhow!("player and squad must be non-empty"));
    }

    let minutes = parse_count(fields[2]).context("Min")?;
    let pass_completion_pct = parse_percent(fields[3]).context("Cmp%")?;
    let dribble_success_pct = parse_percent(fields[4]).context("DribSucc%")?;
    let shots_on_target_pct = parse_percent(fields[5]).context("SoT%")?;
    let tackles_won = parse_count(fields[6]).context("TklW")?;
    let interceptions = parse_count(fields[7]).context("Int")?;

    Ok(PlayerRecord {
        player,
        squad,
        minutes,
        pass_completion_pct,
        dribble_success_pct,
        shots_on_target_pct,
        tackles_won,
        interceptions,
        defensive_actions: tackles_won + interceptions,
    })
}

fn parse_count(raw: &str) -> Result<u32> {
    let s = raw.trim();
    s.parse::<u32>()
        .map_err(|_| anyhow!("expected non-negative integer, got {s:?}"))
}

fn parse_percent(raw: &str) -> Result<f64> {
    let s = raw.trim().trim_end_matches('%');
    let v = s
        .parse::<f64>()
        .map_err(|_| anyhow!("expected percentage, got {raw:?}"))?;
    if !(0.0..=100.0).contains(&v) {
        return Err(anyhow!("percentage out of range: {v}"));
    }
    Ok(v)
}
