use std::io;
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use flex_terminal::config::AppConfig;
use flex_terminal::ev::EvSummary;
use flex_terminal::hit_rate::Confidence;
use flex_terminal::http_cache::app_cache_dir;
use flex_terminal::injury::InjuryStatus;
use flex_terminal::provider;
use flex_terminal::state::{self, AppState, ProviderCommand, apply_delta};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(cfg: &AppConfig, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(&cfg.session),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('a') | KeyCode::Enter => self.state.add_selected(false),
            KeyCode::Char('o') => self.state.add_selected(true),
            KeyCode::Char('x') | KeyCode::Backspace => self.state.remove_last_pick(),
            KeyCode::Char('c') => self.state.clear_entry(),
            KeyCode::Char('f') => self.state.cycle_sport_filter(),
            KeyCode::Char('m') => self.state.toggle_recommended_only(),
            KeyCode::Char('p') => self.state.toggle_players_only(),
            KeyCode::Char('t') => self.state.toggle_auto_select(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.state.adjust_amount(1),
            KeyCode::Char('-') => self.state.adjust_amount(-1),
            KeyCode::Char('n') => self.state.cycle_legs(),
            KeyCode::Char('r') => self.request_refresh(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn request_refresh(&mut self) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Refresh unavailable");
            return;
        };
        let sports = self.state.session.filters.sports.clone();
        if tx.send(ProviderCommand::Refresh { sports }).is_err() {
            self.state.push_log("[WARN] Refresh request failed");
        } else {
            self.state.loading = true;
            self.state.push_log("[INFO] Refreshing props");
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let _log_guard = init_logging();

    let cfg = AppConfig::from_env();
    info!(
        legs = cfg.session.num_legs,
        amount = cfg.session.entry_amount,
        feed = %cfg.feed_url,
        "starting flex terminal"
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let mut app = App::new(&cfg, Some(cmd_tx));
    provider::spawn_provider(tx, cmd_rx, cfg);

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

/// File logging only: stdout belongs to the terminal UI.
fn init_logging() -> Option<WorkerGuard> {
    let dir = app_cache_dir()?;
    std::fs::create_dir_all(&dir).ok()?;
    writable(&dir)?;

    let appender = tracing_appender::rolling::daily(&dir, "flex_terminal.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .ok()?;
    Some(guard)
}

// The rolling appender panics when its first file cannot be created.
fn writable(dir: &Path) -> Option<()> {
    let marker = dir.join(".write_test");
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&marker)
        .ok()?;
    let _ = std::fs::remove_file(&marker);
    Some(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
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
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[1]);
    render_props(frame, body[0], &app.state);
    render_entry(frame, body[1], &app.state);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let filters = &state.session.filters;
    let entry = state.session.entry();
    let title = format!(
        "FLEX TERMINAL | Sports: {} | {} | {} | Auto {}",
        state.sport_filter_label(),
        if filters.recommended_only { "MORE only" } else { "All sides" },
        if filters.players_only { "Players" } else { "Players+Teams" },
        if state.session.auto_select { "ON" } else { "OFF" },
    );
    let status = match (&state.batch, state.loading) {
        (_, true) => "Loading props...".to_string(),
        (Some(batch), false) => format!(
            "{} props from {} | {} shown | updated {}",
            batch.projections.len(),
            batch.source.label(),
            state.filtered_count(),
            state.last_updated.as_deref().unwrap_or("-"),
        ),
        (None, false) => "No props loaded".to_string(),
    };
    let counts = state
        .batch
        .as_ref()
        .map(|b| {
            b.sport_counts()
                .into_iter()
                .map(|(sport, n)| format!("{} {}", sport.badge(), n))
                .collect::<Vec<_>>()
                .join("  ")
        })
        .unwrap_or_default();
    format!(
        "{title}\n{status} | ${:.0} x {} legs\n{counts}",
        entry.amount(),
        entry.num_legs()
    )
}

fn footer_text() -> &'static str {
    "j/k Move | a Add | o Opposite | x Remove | c Clear | f Sport | m MORE | p Players | t Auto | +/- $ | n Legs | r Refresh | ? Help | q Quit"
}

fn prop_columns() -> [Constraint; 7] {
    [
        Constraint::Length(5),
        Constraint::Min(18),
        Constraint::Length(16),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(6),
        Constraint::Length(6),
    ]
}

fn render_props(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Top Props").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let widths = prop_columns();
    render_props_header(frame, sections[0], &widths);

    let list_area = sections[1];
    let props = state.visible_props();
    if props.is_empty() {
        let msg = if state.loading {
            "Loading..."
        } else {
            "No props match the current filters"
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, props.len(), visible);
    let entry = state.session.entry();

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };

        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let p = props[idx];
        let marker = if entry.contains(&p.id) { "*" } else { " " };
        let name = format!("{marker}{}", p.subject_name);
        let side_style = match p.confidence {
            Confidence::High => row_style.fg(Color::Green).add_modifier(Modifier::BOLD),
            Confidence::Medium => row_style.fg(Color::Yellow),
        };

        render_cell_text(frame, cols[0], p.sport.badge, row_style);
        render_cell_text(frame, cols[1], &name, row_style);
        render_cell_text(frame, cols[2], &p.stat_type, row_style);
        render_cell_text(frame, cols[3], &format!("{:.1}", p.line), row_style);
        render_cell_text(frame, cols[4], p.recommendation.label(), side_style);
        render_cell_text(frame, cols[5], &format!("{:.1}%", p.hit_rate * 100.0), row_style);
        render_cell_text(
            frame,
            cols[6],
            injury_badge(p.injury.status),
            row_style.fg(injury_color(p.injury.status)),
        );
    }
}

fn render_props_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "Lg", style);
    render_cell_text(frame, cols[1], "Player", style);
    render_cell_text(frame, cols[2], "Stat", style);
    render_cell_text(frame, cols[3], "Line", style);
    render_cell_text(frame, cols[4], "Pick", style);
    render_cell_text(frame, cols[5], "Hit%", style);
    render_cell_text(frame, cols[6], "Inj", style);
}

fn render_entry(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(9)])
        .split(area);

    let entry = state.session.entry();
    let title = format!("Entry {}/{}", entry.len(), entry.num_legs());
    let picks = Paragraph::new(picks_text(state))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(picks, rows[0]);

    let summary = state.session.summary();
    let style = match &summary {
        Some(s) if s.is_positive() => Style::default().fg(Color::Green),
        Some(_) => Style::default().fg(Color::Red),
        None => Style::default().fg(Color::DarkGray),
    };
    let ev = Paragraph::new(ev_text(state, summary.as_ref()))
        .style(style)
        .block(Block::default().title("Expected Value").borders(Borders::ALL));
    frame.render_widget(ev, rows[1]);
}

fn picks_text(state: &AppState) -> String {
    let entry = state.session.entry();
    if entry.is_empty() {
        return "No picks yet. Press a to add the highlighted prop.".to_string();
    }
    entry
        .picks()
        .iter()
        .enumerate()
        .map(|(i, pick)| {
            format!(
                "{}. {} {} {} {:.1} ({:.1}%) {}",
                i + 1,
                pick.sport.emoji,
                pick.player,
                pick.side,
                pick.line,
                pick.hit_rate * 100.0,
                pick.stat_type
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn ev_text(state: &AppState, summary: Option<&EvSummary>) -> String {
    let entry = state.session.entry();
    let Some(summary) = summary else {
        if entry.is_complete() {
            return format!("No payout table for {} legs", entry.num_legs());
        }
        return format!(
            "Add {} more pick(s) for the EV breakdown",
            (entry.num_legs() as usize).saturating_sub(entry.len())
        );
    };

    let mut lines = vec![format!(
        "Avg hit {:.1}% | Stake ${:.2}",
        summary.avg_hit_rate * 100.0,
        summary.amount
    )];
    for tier in summary.tiers.iter().rev() {
        lines.push(format!(
            "{}/{} correct x{:<4} p={:.4}",
            tier.min_correct,
            entry.num_legs(),
            tier.multiplier,
            tier.probability
        ));
    }
    lines.push(format!(
        "EV ${:.2} | ROI {:+.2}% {}",
        summary.ev,
        summary.roi,
        if summary.is_positive() { "+EV" } else { "-EV" }
    ));
    lines.join("\n")
}

fn injury_badge(status: InjuryStatus) -> &'static str {
    match status {
        InjuryStatus::Active => "-",
        InjuryStatus::Probable => "PROB",
        InjuryStatus::Questionable => "QUES",
        InjuryStatus::Out => "OUT",
    }
}

fn injury_color(status: InjuryStatus) -> Color {
    match status {
        InjuryStatus::Active => Color::DarkGray,
        InjuryStatus::Probable => Color::Cyan,
        InjuryStatus::Questionable => Color::Yellow,
        InjuryStatus::Out => Color::Red,
    }
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    let skip = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Flex Terminal - Help",
        "",
        "Props:",
        "  j/k or ↑/↓   Move",
        "  f            Cycle sport filter",
        "  m            Recommended (MORE) only",
        "  p            Players only",
        "  r            Refresh feed",
        "",
        "Entry:",
        "  a / Enter    Add on recommended side",
        "  o            Add on opposite side",
        "  x            Remove last pick",
        "  c            Clear entry",
        "  t            Toggle auto-select",
        "  + / -        Entry amount",
        "  n            Cycle leg count",
        "",
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
