mod app;
mod event;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use tracing_subscriber::EnvFilter;

use kanadrill::config::Config;
use kanadrill::engine::{ResetScope, SignStatsStore, StatSide, TestDirection};
use kanadrill::kana::CATALOG;
use kanadrill::store::json_store::JsonStore;
use kanadrill::store::schema::SignStatsData;

use app::{App, AppScreen};
use event::{AppEvent, EventHandler};
use ui::components::answer_grid::{AnswerGrid, Outcome};
use ui::components::progress_bar::CountdownBar;
use ui::components::stats_panel::StatsPanel;

#[derive(Parser)]
#[command(name = "kanadrill", version, about = "Adaptive kana multiple-choice trainer")]
struct Cli {
    #[arg(short, long, help = "Test direction, e.g. hiragana-to-roomaji")]
    direction: Option<TestDirection>,

    #[arg(short, long, help = "Number of answers per question")]
    answers: Option<u8>,

    #[arg(long, help = "Only offer answers that look like the question")]
    similar: bool,

    #[arg(long, help = "Seed the question generator")]
    seed: Option<u64>,

    #[arg(long, value_name = "SCOPE", help = "Reset statistics (all, only-wrong-hiragana, ...) and exit")]
    reset: Option<ResetScope>,

    #[arg(long, help = "Print a statistics summary and exit")]
    stats: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = JsonStore::new()?;
    init_logging(store.base_dir());

    let mut config = Config::load()?;
    if let Some(direction) = cli.direction {
        config.test_direction = direction;
    }
    if let Some(answers) = cli.answers {
        config.maximum_answers = answers;
    }
    if cli.similar {
        config.similar_answers_only = true;
    }
    config.normalize();

    if let Some(scope) = cli.reset {
        let mut stats = load_stats(&store);
        stats.reset(scope);
        store.save_sign_stats(&SignStatsData::from_store(&stats))?;
        println!("Statistics reset ({})", scope.key());
        return Ok(());
    }
    if cli.stats {
        print_summary(&load_stats(&store));
        return Ok(());
    }

    let mut app = App::new(config, Some(store), cli.seed);
    app.start_round(Instant::now());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(50));

    let result = run_app(&mut terminal, &mut app, &events);
    app.save_stats();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Logs go to a file since the terminal belongs to the UI.
fn init_logging(dir: &Path) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kanadrill=info"));
    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("kanadrill.log"))
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: logging disabled: {e}");
            return;
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();
}

fn load_stats(store: &JsonStore) -> SignStatsStore {
    let mut stats = SignStatsStore::from_signs(CATALOG.iter());
    store.load_sign_stats().restore_into(&mut stats);
    stats
}

fn print_summary(stats: &SignStatsStore) {
    let summary = stats.summary();
    println!("Practiced signs: {}/{}", summary.practiced_signs, stats.len());
    for (name, side, correct, wrong) in [
        ("Hiragana", StatSide::Hiragana, summary.correct_hiragana, summary.wrong_hiragana),
        ("Katakana", StatSide::Katakana, summary.correct_katakana, summary.wrong_katakana),
    ] {
        println!(
            "{name}: {correct} correct, {wrong} wrong ({:.1}%)",
            summary.accuracy(side)
        );
        for record in stats.hardest(side, 5) {
            println!(
                "  {:<4} missed {:>3}x, avg {:.2}s",
                record.sign.roomaji,
                record.wrong_count(side),
                record.average_answer_time(side).as_secs_f64()
            );
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::Stats => handle_stats_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn slot_for(ch: char) -> Option<usize> {
    match ch {
        '1'..='9' => ch.to_digit(10).map(|d| d as usize - 1),
        '0' => Some(9),
        '-' => Some(10),
        '=' => Some(11),
        _ => None,
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('m') => app.mark_mode = !app.mark_mode,
        KeyCode::Char('b') => app.go_back(now),
        KeyCode::Char('s') => app.go_to_stats(),
        KeyCode::Char('c') => app.go_to_settings(),
        KeyCode::Char('n') if app.round.is_none() => app.start_round(now),
        KeyCode::Char(ch) => {
            if let Some(slot) = slot_for(ch) {
                if app.mark_mode {
                    app.toggle_mark(slot);
                } else {
                    app.answer(slot, now);
                }
            }
        }
        _ => {}
    }
}

fn handle_stats_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_quiz(Instant::now()),
        KeyCode::Left | KeyCode::Char('h') => app.cycle_reset_scope(false),
        KeyCode::Right | KeyCode::Char('l') => app.cycle_reset_scope(true),
        KeyCode::Char('x') | KeyCode::Char('y') => app.confirm_reset(),
        _ => app.reset_confirm = false,
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.leave_settings(Instant::now()),
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings_selected = app.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.settings_selected + 1 < app::SETTING_FIELDS.len() {
                app.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle_forward(),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle_backward(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::Stats => render_stats(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let now = Instant::now();

    let answer_rows = app.round.as_ref().map_or(0, |r| r.answers.len()) as u16;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Length(answer_rows + 2),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let accuracy = if app.answered == 0 {
        String::new()
    } else {
        format!(
            "  {}/{} correct",
            app.answered_correct, app.answered
        )
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " kanadrill ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}{accuracy}", app.config.test_direction.label()),
            Style::default().fg(colors.header_fg()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    let Some(round) = app.round.as_ref() else {
        let message = app.status.as_deref().unwrap_or("No question available");
        let status = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {message}"),
                Style::default().fg(colors.answer_wrong()),
            )),
            Line::from(Span::styled(
                "  [c] Settings  [n] Try again",
                Style::default().fg(colors.muted()),
            )),
        ]);
        frame.render_widget(status, layout[1]);
        render_quiz_footer(frame, app, layout[5]);
        return;
    };

    let result = match round.last_result {
        Some((true, elapsed)) => Span::styled(
            format!("  correct ({:.2}s)", elapsed.as_secs_f64()),
            Style::default().fg(colors.answer_correct()),
        ),
        Some((false, _)) => Span::styled(
            format!("  wrong, it was {}", round.question.text(round.answer_script)),
            Style::default().fg(colors.answer_wrong()),
        ),
        None => Span::raw(""),
    };
    let prompt_block = Block::bordered()
        .title(" Question ")
        .border_style(Style::default().fg(colors.border()));
    let prompt = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("  {}", round.question.text(round.ask)),
                Style::default().fg(colors.prompt()).add_modifier(Modifier::BOLD),
            ),
            result,
        ]),
    ])
    .block(prompt_block);
    frame.render_widget(prompt, layout[1]);

    let submitted = app.submitted();
    let outcome = app.is_scored().then(|| Outcome {
        question: &round.question,
        submitted: submitted.as_ref(),
    });
    let grid = AnswerGrid::new(&round.answers, round.answer_script, &app.theme)
        .hints(&app.hints)
        .marked(app.session.marked())
        .outcome(outcome);
    frame.render_widget(grid, layout[2]);

    if let (Some(used), Some(timeout)) = (
        app.session.timeout_progress(now),
        app.session.settings().answer_timeout,
    ) {
        frame.render_widget(CountdownBar::new(used, timeout, &app.theme), layout[3]);
    }

    render_quiz_footer(frame, app, layout[5]);
}

fn render_quiz_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let mode = if app.mark_mode { "MARK" } else { "ANSWER" };
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {mode} "),
            Style::default().fg(colors.bg()).bg(colors.accent()),
        ),
        Span::styled(
            "  [1-9] Answer  [m] Mark mode  [b] Back  [s] Stats  [c] Settings  [q] Quit",
            Style::default().fg(colors.muted()),
        ),
    ]));
    frame.render_widget(footer, area);
}

fn render_stats(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(area);

    frame.render_widget(StatsPanel::new(app.session.stats(), &app.theme), layout[0]);

    let prompt = if app.reset_confirm {
        format!("  Reset {}? press [y] again to confirm", app.reset_scope().key())
    } else {
        format!(
            "  [ESC] Back  [</>] Reset scope: {}  [x] Reset",
            app.reset_scope().key()
        )
    };
    let mut lines = vec![Line::from(Span::styled(
        prompt,
        Style::default().fg(colors.accent()),
    ))];
    if let Some(ref status) = app.status {
        lines.push(Line::from(Span::styled(
            format!("  {status}"),
            Style::default().fg(colors.muted()),
        )));
    }
    Paragraph::new(lines).render(layout[1], frame.buffer_mut());
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(60, 90, area);

    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let fields = app.setting_rows();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        "  Use arrows to navigate, Enter/Right to change, ESC to save & exit",
        Style::default().fg(colors.muted()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let lines: Vec<Line> = fields
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let is_selected = i == app.settings_selected;
            let indicator = if is_selected { " > " } else { "   " };
            let label_style = Style::default()
                .fg(if is_selected { colors.accent() } else { colors.fg() })
                .add_modifier(if is_selected { Modifier::BOLD } else { Modifier::empty() });
            let value_style = Style::default().fg(if is_selected {
                colors.prompt()
            } else {
                colors.muted()
            });
            Line::from(vec![
                Span::styled(format!("{indicator}{label:<30}"), label_style),
                Span::styled(format!("< {value} >"), value_style),
            ])
        })
        .collect();
    Paragraph::new(lines).render(layout[1], frame.buffer_mut());

    let footer = Paragraph::new(Line::from(Span::styled(
        "  [ESC] Save & back  [Enter/arrows] Change value",
        Style::default().fg(colors.accent()),
    )));
    footer.render(layout[2], frame.buffer_mut());
}
