use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Wrap};

use cwc_dashboard::aggregate::{TeamAggregate, VenueAggregate};
use cwc_dashboard::config::AppConfig;
use cwc_dashboard::country_map;
use cwc_dashboard::dataset::{Dataset, MatchCategory};
use cwc_dashboard::sentiment;
use cwc_dashboard::state::{Action, AppState, InputMode, Screen, apply_action};
use cwc_dashboard::summary::{CategorySummary, YearSummary};

struct App {
    state: AppState,
    should_quit: bool,
    tick_rate: Duration,
}

impl App {
    fn new(state: AppState, tick_rate: Duration) -> Self {
        Self {
            state,
            should_quit: false,
            tick_rate,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.input_mode == InputMode::Editing {
            let action = match key.code {
                KeyCode::Enter => Action::SubmitSentiment,
                KeyCode::Esc => Action::CancelEditing,
                KeyCode::Backspace => Action::InputBackspace,
                KeyCode::Char(c) => Action::InputChar(c),
                _ => return,
            };
            apply_action(&mut self.state, action);
            return;
        }

        let action = match (self.state.screen, key.code) {
            (_, KeyCode::Char('q')) => {
                self.should_quit = true;
                return;
            }
            (_, KeyCode::Tab) => Action::ToggleScreen,
            (_, KeyCode::Char('?')) => Action::ToggleHelp,
            (Screen::Overview, KeyCode::Char('1')) => Action::SelectCategory(MatchCategory::League),
            (Screen::Overview, KeyCode::Char('2')) => {
                Action::SelectCategory(MatchCategory::SemiFinal)
            }
            (Screen::Overview, KeyCode::Char('3')) => Action::SelectCategory(MatchCategory::Final),
            (Screen::Overview, KeyCode::Char(']')) => Action::NextSentimentTeam,
            (Screen::Overview, KeyCode::Char('[')) => Action::PrevSentimentTeam,
            (Screen::Overview, KeyCode::Char('e')) => Action::BeginEditing,
            (Screen::Overview, KeyCode::Enter) => Action::SubmitSentiment,
            (Screen::Details, KeyCode::Right | KeyCode::Char('l')) => Action::NextYear,
            (Screen::Details, KeyCode::Left | KeyCode::Char('h')) => Action::PrevYear,
            (Screen::Details, KeyCode::Down | KeyCode::Char('j')) => Action::NextDetailsTeam,
            (Screen::Details, KeyCode::Up | KeyCode::Char('k')) => Action::PrevDetailsTeam,
            (Screen::Details, KeyCode::Char('0')) => Action::ResetDetailsTeam,
            (Screen::Details, KeyCode::Char('x')) => Action::Export,
            _ => return,
        };
        apply_action(&mut self.state, action);
    }
}

fn main() -> Result<()> {
    let config = AppConfig::load();

    let (dataset, report) = Dataset::load_csv(&config.data_path)?;
    let dataset = Arc::new(dataset);

    let mut state = AppState::new(Arc::clone(&dataset));
    state.export_dir = config.export_dir.clone();
    state.push_log(format!(
        "[INFO] Loaded {}/{} rows from {}",
        report.rows_loaded,
        report.rows_read,
        config.data_path.display()
    ));
    for reason in report.rejected.iter().take(5) {
        state.push_log(format!("[WARN] Rejected {reason}"));
    }
    if report.rejected.len() > 5 {
        state.push_log(format!(
            "[WARN] ... {} more rejected rows",
            report.rejected.len() - 5
        ));
    }

    match sentiment::shared(&config.models) {
        Ok(adapter) => {
            state.sentiment = Some(adapter);
            state.push_log("[INFO] Sentiment models loaded");
        }
        Err(err) => state.push_log(format!("[WARN] Sentiment disabled: {err}")),
    }

    if config.warm_cache {
        let added = state.cache.warm(&dataset);
        state.push_log(format!("[INFO] Precomputed {added} year summaries"));
    }

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(state, config.tick_rate);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, &mut app.state))?;

        let timeout = app
            .tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= app.tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, state: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match state.screen {
        Screen::Overview => render_overview(frame, chunks[1], state),
        Screen::Details => render_details(frame, chunks[1], state),
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if state.help_overlay {
        let area = frame.size();
        render_help_overlay(frame, area);
    }
}

fn header_text(state: &AppState) -> String {
    match state.screen {
        Screen::Overview => format!(
            "CRICKET WORLD CUP | OVERVIEW | Category: {}",
            state.category.label()
        ),
        Screen::Details => {
            let year = state
                .selected_year()
                .map(|y| y.to_string())
                .unwrap_or_else(|| "-".to_string());
            let team = state.details_team.as_deref().unwrap_or("winner");
            format!("CRICKET WORLD CUP | DETAILS | {year} | Team: {team}")
        }
    }
}

fn footer_text(state: &AppState) -> String {
    if state.input_mode == InputMode::Editing {
        return "Type text | Enter Submit | Backspace Delete | Esc Cancel".to_string();
    }
    match state.screen {
        Screen::Overview => {
            "Tab Details | 1 League 2 Semi 3 Final | [/] Team | e Edit | Enter Predict | ? Help | q Quit"
                .to_string()
        }
        Screen::Details => {
            "Tab Overview | ←/→ Year | ↑/↓ Team | 0 Winner | x Export | ? Help | q Quit".to_string()
        }
    }
}

fn render_overview(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(10)])
        .split(columns[0]);

    let summary = state.category_summary();
    render_category_runs(frame, left[0], &summary);

    let winners = Paragraph::new(winners_text(&summary)).block(
        Block::default()
            .title("Winning Teams Distribution")
            .borders(Borders::ALL),
    );
    frame.render_widget(winners, left[1]);

    let sentiment = Paragraph::new(sentiment_text(state))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Sentiment Prediction")
                .borders(Borders::ALL),
        );
    frame.render_widget(sentiment, columns[1]);
}

fn render_category_runs(frame: &mut Frame, area: Rect, summary: &CategorySummary) {
    let block = Block::default()
        .title(format!(
            "Team Performance in {} ({} matches)",
            summary.category.label(),
            summary.counts.total
        ))
        .borders(Borders::ALL);
    if summary.team_runs.is_empty() {
        let empty = Paragraph::new("No matches for this category")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let bars: Vec<Bar> = summary
        .team_runs
        .iter()
        .map(|t| {
            Bar::default()
                .value(u64::from(t.runs))
                .label(Line::from(t.team.clone()))
                .style(Style::default().fg(Color::Green))
        })
        .collect();
    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(5)
        .bar_gap(1);
    frame.render_widget(chart, area);
}

fn winners_text(summary: &CategorySummary) -> String {
    if summary.winners.is_empty() {
        return "No results".to_string();
    }
    let total: usize = summary.winners.iter().map(|(_, n)| n).sum();
    summary
        .winners
        .iter()
        .map(|(team, n)| {
            let pct = (*n as f64) / (total as f64) * 100.0;
            format!("{team:<6} {n:>3}  {pct:>5.1}%")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn sentiment_text(state: &AppState) -> String {
    let team = match state.selected_sentiment_team() {
        Some(code) => format!("{code} ({})", country_map::display_name(code)),
        None => "-".to_string(),
    };
    let cursor = if state.input_mode == InputMode::Editing {
        "_"
    } else {
        ""
    };
    let status = if state.sentiment.is_some() {
        "models ready"
    } else {
        "models unavailable"
    };
    let prediction = state.prediction.as_deref().unwrap_or("");
    format!(
        "Team: < {team} >\n\nText: {}{cursor}\n\nPrediction:\n{prediction}\n\n[{status}]",
        state.input
    )
}

fn render_details(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let Some(summary) = state.year_summary() else {
        let empty = Paragraph::new("No tournaments in dataset")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(50),
            Constraint::Min(6),
        ])
        .split(area);

    let stats = Paragraph::new(details_stats_text(&summary))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(stats, rows[0]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(20)])
        .split(rows[1]);

    let categories = Paragraph::new(categories_text(&summary)).block(
        Block::default()
            .title("Match Summary")
            .borders(Borders::ALL),
    );
    frame.render_widget(categories, middle[0]);
    render_team_totals(frame, middle[1], &summary.team_totals);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(20)])
        .split(rows[2]);

    let focus = summary.focus_team.as_deref().unwrap_or("-");
    let series = Paragraph::new(series_text(&summary.series)).block(
        Block::default()
            .title(format!("Runs vs Wickets of {focus}"))
            .borders(Borders::ALL),
    );
    frame.render_widget(series, bottom[0]);
    render_venues(frame, bottom[1], focus, &summary.venues);
}

fn details_stats_text(summary: &YearSummary) -> String {
    let winner = match &summary.winner {
        Ok(team) => team.clone(),
        Err(err) => err.to_string(),
    };
    format!(
        "Winning Team: {winner} | Total Matches: {} | Played: {} | Abandoned: {}",
        summary.counts.total, summary.counts.played, summary.counts.abandoned
    )
}

fn categories_text(summary: &YearSummary) -> String {
    if summary.categories.is_empty() {
        return "No matches".to_string();
    }
    let total = summary.counts.total.max(1) as f64;
    summary
        .categories
        .iter()
        .map(|(category, n)| {
            let pct = (*n as f64) / total * 100.0;
            format!("{:<13}{n:>3} {pct:>5.1}%", category.label())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn series_text(series: &[(u32, u8)]) -> String {
    if series.is_empty() {
        return "No matches".to_string();
    }
    series
        .iter()
        .enumerate()
        .map(|(idx, (runs, wickets))| format!("#{:<3} {runs:>4}/{wickets}", idx + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_team_totals(frame: &mut Frame, area: Rect, totals: &[TeamAggregate]) {
    let block = Block::default()
        .title("Total Runs and Wickets by Team")
        .borders(Borders::ALL);
    if totals.is_empty() {
        frame.render_widget(Paragraph::new("No data").block(block), area);
        return;
    }
    let groups: Vec<BarGroup> = totals
        .iter()
        .map(|t| runs_wickets_group(&t.team, t.runs, t.wickets))
        .collect();
    let mut chart = BarChart::default().block(block).bar_width(3).group_gap(2);
    for group in groups {
        chart = chart.data(group);
    }
    frame.render_widget(chart, area);
}

fn render_venues(frame: &mut Frame, area: Rect, focus: &str, venues: &[VenueAggregate]) {
    let block = Block::default()
        .title(format!("Venue Performance of {focus}"))
        .borders(Borders::ALL);
    if venues.is_empty() {
        frame.render_widget(Paragraph::new("No data").block(block), area);
        return;
    }
    let mut chart = BarChart::default().block(block).bar_width(4).group_gap(2);
    for v in venues {
        chart = chart.data(runs_wickets_group(&v.venue, v.runs, v.wickets));
    }
    frame.render_widget(chart, area);
}

fn runs_wickets_group(label: &str, runs: u32, wickets: u32) -> BarGroup<'static> {
    let runs = Bar::default()
        .value(u64::from(runs))
        .style(Style::default().fg(Color::Green));
    let wickets = Bar::default()
        .value(u64::from(wickets))
        .style(Style::default().fg(Color::Red));
    BarGroup::default()
        .label(Line::from(label.to_string()))
        .bars(&[runs, wickets])
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Cricket World Cup Dashboard - Help",
        "",
        "Global:",
        "  Tab          Switch Overview / Details",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Overview:",
        "  1 / 2 / 3    League / Semi-Final / Final",
        "  [ / ]        Sentiment team",
        "  e            Edit sentiment text",
        "  Enter        Run sentiment prediction",
        "",
        "Details:",
        "  ←/→ or h/l   World Cup year",
        "  ↑/↓ or k/j   Team",
        "  0            Back to tournament winner",
        "  x            Export summary to .xlsx",
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
