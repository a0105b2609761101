use std::io;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use midfield_terminal::dataset::load_midfielders;
use midfield_terminal::export;
use midfield_terminal::report::render_report;
use midfield_terminal::scoring::{
    Metric, ScoredRecord, ScoringConfig, SortKey, TEAM_CATEGORIES, all_round_score, rank,
    score_players, team_profiles,
};
use midfield_terminal::team_colors::terminal_color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Table,
    Performance,
    Consistency,
    Leaders,
    Teams,
    AllRound,
}

struct App {
    config: ScoringConfig,
    // Pipeline output in filter order; `ranked` is re-derived on sort changes.
    table: Vec<ScoredRecord>,
    ranked: Vec<ScoredRecord>,
    screen: Screen,
    sort: SortKey,
    table_scroll: usize,
    help_overlay: bool,
    status: String,
    should_quit: bool,
}

impl App {
    fn new(config: ScoringConfig, table: Vec<ScoredRecord>) -> Self {
        let sort = SortKey::PerformanceScore;
        let ranked = rank(&table, sort, true);
        Self {
            config,
            table,
            ranked,
            screen: Screen::Table,
            sort,
            table_scroll: 0,
            help_overlay: false,
            status: String::new(),
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.screen = Screen::Table,
            KeyCode::Char('2') => self.screen = Screen::Performance,
            KeyCode::Char('3') => self.screen = Screen::Consistency,
            KeyCode::Char('4') => self.screen = Screen::Leaders,
            KeyCode::Char('5') => self.screen = Screen::Teams,
            KeyCode::Char('6') => self.screen = Screen::AllRound,
            KeyCode::Char('j') | KeyCode::Down => {
                if self.screen == Screen::Table {
                    let max = self.ranked.len().saturating_sub(1);
                    self.table_scroll = (self.table_scroll + 1).min(max);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.screen == Screen::Table {
                    self.table_scroll = self.table_scroll.saturating_sub(1);
                }
            }
            KeyCode::Char('s') => {
                self.sort = self.sort.next();
                self.ranked = rank(&self.table, self.sort, true);
                self.table_scroll = 0;
            }
            KeyCode::Char('e') | KeyCode::Char('E') => self.export_workbook(),
            KeyCode::Char('?') => self.help_overlay = !self.help_overlay,
            _ => {}
        }
    }

    fn export_workbook(&mut self) {
        let path = export::default_xlsx_path();
        match export::export_xlsx(&path, &self.ranked, &self.config.metrics) {
            Ok(report) => {
                self.status = format!(
                    "Exported {} players / {} teams to {}",
                    report.players,
                    report.teams,
                    report.path.display()
                );
            }
            Err(err) => self.status = format!("Export failed: {err:#}"),
        }
    }
}

enum RunMode {
    Tui,
    Report,
    ExportXlsx(Option<String>),
    ExportJson(Option<String>),
}

fn parse_args() -> Result<RunMode> {
    let mut args = std::env::args().skip(1);
    let Some(flag) = args.next() else {
        return Ok(RunMode::Tui);
    };
    match flag.as_str() {
        "--report" => Ok(RunMode::Report),
        "--export" => Ok(RunMode::ExportXlsx(args.next())),
        "--json" => Ok(RunMode::ExportJson(args.next())),
        other => Err(anyhow!(
            "unknown flag {other:?}; expected --report, --export [path], or --json [path]"
        )),
    }
}

fn config_from_env() -> ScoringConfig {
    let mut config = ScoringConfig::default();
    if let Some(min) = std::env::var("MIN_MINUTES")
        .ok()
        .and_then(|val| val.parse::<u32>().ok())
    {
        config.min_minutes = min;
    }
    config
}

fn main() -> Result<()> {
    let mode = parse_args()?;
    let config = config_from_env();

    let records = load_midfielders().context("load midfielder dataset")?;
    let table = score_players(&records, &config).context("score midfielders")?;

    match mode {
        RunMode::Report => {
            print!("{}", render_report(&table));
            Ok(())
        }
        RunMode::ExportXlsx(path) => {
            let path = path
                .map(std::path::PathBuf::from)
                .unwrap_or_else(export::default_xlsx_path);
            let report = export::export_xlsx(&path, &table, &config.metrics)?;
            println!(
                "Exported {} players / {} teams to {}",
                report.players,
                report.teams,
                report.path.display()
            );
            Ok(())
        }
        RunMode::ExportJson(path) => {
            let path = path
                .map(std::path::PathBuf::from)
                .unwrap_or_else(export::default_json_path);
            let report = export::export_json(&path, &table)?;
            println!("Exported {} players to {}", report.players, report.path.display());
            Ok(())
        }
        RunMode::Tui => run_tui(App::new(config, table)),
    }
}

fn run_tui(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.screen {
        Screen::Table => render_table(frame, chunks[1], app),
        Screen::Performance => render_top_bars(
            frame,
            chunks[1],
            app,
            "Top 10 Midfielders: Overall Performance",
            SortKey::PerformanceScore,
            10,
        ),
        Screen::Consistency => render_top_bars(
            frame,
            chunks[1],
            app,
            "Top 10 Most Consistent Midfielders",
            SortKey::ConsistencyIndex,
            10,
        ),
        Screen::Leaders => render_leaders(frame, chunks[1], app),
        Screen::Teams => render_teams(frame, chunks[1], app),
        Screen::AllRound => render_allround(frame, chunks[1], app),
    }

    let footer = Paragraph::new(footer_text(app)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    format!(
        "SÜPER LIG MIDFIELD TERMINAL 2022-23 | {} | Min >= {} | Sort: {}",
        screen_label(app.screen),
        app.config.min_minutes,
        app.sort.label()
    )
}

fn footer_text(app: &App) -> String {
    let keys =
        "1 Table | 2 Perf | 3 Consist | 4 Leaders | 5 Teams | 6 All-round | s Sort | j/k Scroll | e Export | ? Help | q Quit";
    if app.status.is_empty() {
        keys.to_string()
    } else {
        format!("{keys}\n{}", app.status)
    }
}

fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Table => "TABLE",
        Screen::Performance => "PERFORMANCE",
        Screen::Consistency => "CONSISTENCY",
        Screen::Leaders => "LEADERS",
        Screen::Teams => "TEAMS",
        Screen::AllRound => "ALL-ROUND",
    }
}

fn table_columns() -> [Constraint; 8] {
    [
        Constraint::Length(22),
        Constraint::Length(13),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(9),
        Constraint::Length(9),
    ]
}

fn render_table(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = table_columns();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(sections[0]);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    render_cell_text(frame, cols[0], "Player", bold);
    render_cell_text(frame, cols[1], "Squad", bold);
    render_cell_text(frame, cols[2], "Min", bold);
    render_cell_text(frame, cols[3], "Cmp%", bold);
    render_cell_text(frame, cols[4], "Drib%", bold);
    render_cell_text(frame, cols[5], "SoT%", bold);
    render_cell_text(frame, cols[6], "DefAct", bold);
    render_cell_text(frame, cols[7], "Score", bold);

    let list_area = sections[1];
    if list_area.height == 0 {
        return;
    }
    let visible = list_area.height as usize;
    let total = app.ranked.len();
    let start = app.table_scroll.min(total.saturating_sub(visible));
    let end = (start + visible).min(total);

    for (i, row) in app.ranked[start..end].iter().enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let style = Style::default().fg(terminal_color(&row.record.squad));
        let r = &row.record;
        render_cell_text(frame, cols[0], &r.player, style);
        render_cell_text(frame, cols[1], &r.squad, style);
        render_cell_text(frame, cols[2], &r.minutes.to_string(), style);
        render_cell_text(frame, cols[3], &format!("{:.1}", r.pass_completion_pct), style);
        render_cell_text(frame, cols[4], &format!("{:.1}", r.dribble_success_pct), style);
        render_cell_text(frame, cols[5], &format!("{:.1}", r.shots_on_target_pct), style);
        render_cell_text(frame, cols[6], &r.defensive_actions.to_string(), style);
        render_cell_text(frame, cols[7], &sort_value_text(row, app.sort), style);
    }
}

fn sort_value_text(row: &ScoredRecord, sort: SortKey) -> String {
    match sort {
        SortKey::PerformanceScore => format!("{:.1}", row.performance_score),
        SortKey::ConsistencyIndex => format!("{:.1}", row.consistency_index),
        SortKey::DefensiveActions => row.record.defensive_actions.to_string(),
        SortKey::ShotsOnTarget => format!("{:.1}", row.record.shots_on_target_pct),
        SortKey::PassCompletion => format!("{:.1}", row.record.pass_completion_pct),
    }
}

fn render_top_bars(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    title: &str,
    key: SortKey,
    count: usize,
) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let ranked = rank(&app.table, key, true);
    let top = &ranked[..ranked.len().min(count)];

    for (i, row) in top.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        let row_area = Rect {
            x: inner.x,
            y: inner.y + i as u16,
            width: inner.width,
            height: 1,
        };
        let value = match key {
            SortKey::ConsistencyIndex => row.consistency_index,
            _ => row.performance_score,
        };
        render_score_bar(
            frame,
            row_area,
            &format!("{} ({})", row.record.player, row.record.squad),
            value,
            100.0,
            terminal_color(&row.record.squad),
        );
    }
}

fn render_score_bar(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: f64,
    max: f64,
    color: Color,
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(30),
            Constraint::Min(10),
            Constraint::Length(7),
        ])
        .split(area);

    render_cell_text(frame, cols[0], label, Style::default());

    let bar = Bar::default()
        .value(value.round().max(0.0) as u64)
        .text_value(String::new())
        .style(Style::default().fg(color));
    let chart = BarChart::default()
        .data(BarGroup::default().bars(&[bar]))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(max.ceil().max(1.0) as u64);
    frame.render_widget(chart, cols[1]);

    render_cell_text(frame, cols[2], &format!("{value:.1}"), Style::default());
}

/// 2x2 grid of per-metric leader boards, top 8 each.
fn render_leaders(frame: &mut Frame, area: Rect, app: &App) {
    let panels = quad_panels(area);
    for (metric, panel) in app.config.metrics.iter().zip(panels) {
        render_metric_leaders(frame, panel, app, *metric);
    }
}

fn render_metric_leaders(frame: &mut Frame, area: Rect, app: &App, metric: Metric) {
    let block = Block::default()
        .title(format!("Top Players: {}", metric.display_name()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let mut ranked: Vec<&ScoredRecord> = app.table.iter().collect();
    ranked.sort_by(|a, b| {
        metric
            .value(&b.record)
            .partial_cmp(&metric.value(&a.record))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let top: Vec<&ScoredRecord> = ranked.into_iter().take(8).collect();
    let max = top
        .iter()
        .map(|r| metric.value(&r.record))
        .fold(1.0f64, f64::max);

    for (i, row) in top.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        let row_area = Rect {
            x: inner.x,
            y: inner.y + i as u16,
            width: inner.width,
            height: 1,
        };
        render_score_bar(
            frame,
            row_area,
            &row.record.player,
            metric.value(&row.record),
            max,
            terminal_color(&row.record.squad),
        );
    }
}

/// Squad averages rescaled across teams, one panel per squad.
fn render_teams(frame: &mut Frame, area: Rect, app: &App) {
    let profiles = team_profiles(&app.table);
    if profiles.is_empty() {
        let empty =
            Paragraph::new("No squads to compare").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let panels = quad_panels(area);
    for (profile, panel) in profiles.iter().zip(panels) {
        let block = Block::default()
            .title(profile.squad.clone())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(terminal_color(&profile.squad)));
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        for (i, (category, value)) in TEAM_CATEGORIES.into_iter().zip(&profile.rescaled).enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            let row_area = Rect {
                x: inner.x,
                y: inner.y + i as u16,
                width: inner.width,
                height: 1,
            };
            render_score_bar(
                frame,
                row_area,
                category,
                *value,
                100.0,
                terminal_color(&profile.squad),
            );
        }
    }
}

/// Top 5 by mean raw metric value; each panel shows the player's four metrics.
fn render_allround(frame: &mut Frame, area: Rect, app: &App) {
    let mut ranked: Vec<&ScoredRecord> = app.table.iter().collect();
    ranked.sort_by(|a, b| {
        all_round_score(&b.record, &app.config.metrics)
            .partial_cmp(&all_round_score(&a.record, &app.config.metrics))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let top: Vec<&ScoredRecord> = ranked.into_iter().take(5).collect();

    let block = Block::default()
        .title("Top 5 All-Round Midfielders")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if top.is_empty() || inner.height == 0 {
        return;
    }

    let constraints: Vec<Constraint> = top
        .iter()
        .map(|_| Constraint::Ratio(1, top.len() as u32))
        .collect();
    let panels = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (row, panel) in top.iter().zip(panels.iter()) {
        if panel.height == 0 {
            continue;
        }
        let title = format!(
            "{} ({}) - {:.1}",
            row.record.player,
            row.record.squad,
            all_round_score(&row.record, &app.config.metrics)
        );
        render_cell_text(
            frame,
            Rect { height: 1, ..*panel },
            &title,
            Style::default()
                .fg(terminal_color(&row.record.squad))
                .add_modifier(Modifier::BOLD),
        );

        for (i, metric) in app.config.metrics.iter().enumerate() {
            let y = panel.y + 1 + i as u16;
            if y >= panel.y + panel.height {
                break;
            }
            let row_area = Rect {
                x: panel.x + 2,
                y,
                width: panel.width.saturating_sub(2),
                height: 1,
            };
            render_score_bar(
                frame,
                row_area,
                metric.display_name(),
                metric.value(&row.record),
                100.0,
                terminal_color(&row.record.squad),
            );
        }
    }
}

fn quad_panels(area: Rect) -> [Rect; 4] {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    [top[0], top[1], bottom[0], bottom[1]]
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let paragraph = Paragraph::new(text.to_string()).style(style);
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Midfield Terminal - Help",
        "",
        "Screens:",
        "  1            Scored table",
        "  2            Top performers",
        "  3            Most consistent",
        "  4            Metric leaders",
        "  5            Team comparison",
        "  6            All-rounders",
        "",
        "Keys:",
        "  j/k or ↑/↓   Scroll table",
        "  s            Cycle sort key",
        "  e            Export workbook",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
