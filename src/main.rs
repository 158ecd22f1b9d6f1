use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use rust_i18n::t;
use tracing::{info, warn};

use wordgap::app::{App, AppScreen};
use wordgap::config::Config;
use wordgap::event::{AppEvent, EventHandler};
use wordgap::logging;
use wordgap::remote::ArticleService;
use wordgap::remote::http::HttpArticleService;
use wordgap::remote::memory::MemoryArticleService;
use wordgap::remote::types::ArticleMode;
use wordgap::session::controller::SessionState;
use wordgap::session::exercise::{ClozeExercise, FeedbackKind};
use wordgap::session::input::KeyInput;
use wordgap::store::json_store::JsonStore;
use wordgap::ui;
use wordgap::ui::components::cloze_area::ClozeArea;
use wordgap::ui::components::fetch_error::FetchErrorPanel;
use wordgap::ui::components::menu::Menu;
use wordgap::ui::components::progress_bar::ProgressBar;
use wordgap::ui::components::word_bank::WordBankPanel;
use wordgap::ui::layout::{AppLayout, pack_hint_lines};
use wordgap::ui::theme::Theme;

rust_i18n::i18n!("locales", fallback = "en");

#[derive(Parser)]
#[command(name = "wordgap", version, about = "Vocabulary cloze practice in the terminal")]
struct Cli {
    #[arg(short, long, help = "Start straight into an article mode (generic, custom)")]
    mode: Option<ArticleMode>,

    #[arg(short, long, help = "Article service base URL")]
    server: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Use the bundled sample articles instead of a server")]
    demo: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_err) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    let log_path = logging::init_tracing(&config.log_level);
    if let Some(e) = config_err {
        warn!(error = %e, "could not read config, using defaults");
    }
    info!(log = ?log_path, demo = cli.demo, "wordgap starting");

    rust_i18n::set_locale(&config.language);

    let service: Arc<dyn ArticleService> = if cli.demo {
        Arc::new(MemoryArticleService::demo()?)
    } else {
        let server = cli.server.as_deref().unwrap_or(&config.server_url);
        Arc::new(HttpArticleService::new(
            server,
            config.auth_token.clone(),
            config.request_timeout(),
        )?)
    };

    let theme_name = cli.theme.as_deref().unwrap_or(&config.theme);
    let theme = Theme::load(theme_name).unwrap_or_else(|| {
        warn!(theme = theme_name, "unknown theme, using default");
        Theme::default()
    });

    let store = match JsonStore::new() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!(error = %e, "article history disabled");
            None
        }
    };

    let events = EventHandler::new(Duration::from_millis(50));
    let mut app = App::new(config, theme, service, events.sender(), store);
    app.persist_config = true;
    if let Some(mode) = cli.mode {
        app.start(mode);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
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
            AppEvent::Resize(_, _) => {}
            AppEvent::ArticleLoaded {
                generation, result, ..
            } => app.on_article_loaded(generation, result),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Exercise => handle_exercise_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.start(ArticleMode::Generic),
        KeyCode::Char('2') => app.start(ArticleMode::Custom),
        KeyCode::Up | KeyCode::Char('k') => app.menu_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu_next(),
        KeyCode::Enter => app.start_selected(),
        _ => {}
    }
}

fn handle_exercise_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.go_to_menu();
        return;
    }

    if matches!(app.session.state(), SessionState::Failed(_)) {
        match key.code {
            KeyCode::Char('r') => app.retry(),
            KeyCode::Char('q') => app.should_quit = true,
            _ => {}
        }
        return;
    }
    if app.session.exercise().is_none() {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('n') {
            app.skip_article();
        }
        return;
    }
    match key.code {
        KeyCode::Left | KeyCode::BackTab => app.focus_prev(),
        KeyCode::Right | KeyCode::Tab => app.focus_next(),
        KeyCode::Char('?') => app.toggle_meaning(),
        code => app.key(key_input(code), Instant::now()),
    }
}

fn key_input(code: KeyCode) -> KeyInput {
    match code {
        KeyCode::Char(ch) => KeyInput::Char(ch),
        KeyCode::Backspace => KeyInput::Backspace,
        KeyCode::Enter => KeyInput::Enter,
        _ => KeyInput::Other,
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Exercise => render_exercise(frame, app),
    }
}

fn header_line<'a>(app: &App, info: String) -> Paragraph<'a> {
    let colors = &app.theme.colors;
    Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", t!("app.name")),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()))
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let server = if app.config.server_url.is_empty() {
        String::new()
    } else {
        format!("| {}", app.config.server_url)
    };
    frame.render_widget(header_line(app, server), layout[0]);

    let menu = Menu::new(app.menu_selected, app.history.summary(), &app.theme);
    let menu_area = ui::layout::centered_rect(50, 60, layout[1]);
    frame.render_widget(&menu, menu_area);

    let footer = Paragraph::new(Line::from(Span::styled(
        format!(" {}", t!("menu.footer")),
        Style::default().fg(colors.text_dim()),
    )));
    frame.render_widget(footer, layout[2]);
}

fn render_exercise(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    match app.session.state() {
        SessionState::Idle | SessionState::Loading => {
            let centered = ui::layout::centered_rect(40, 20, area);
            let loading = Paragraph::new(Line::from(Span::styled(
                t!("exercise.loading").to_string(),
                Style::default().fg(colors.accent()),
            )))
            .alignment(Alignment::Center)
            .block(Block::bordered().border_style(Style::default().fg(colors.border())));
            frame.render_widget(loading, centered);
        }
        SessionState::Failed(error) => {
            let centered = ui::layout::centered_rect(60, 40, area);
            frame.render_widget(FetchErrorPanel::new(error, &app.theme), centered);
        }
        SessionState::Active(exercise) => render_active(frame, app, exercise),
    }
}

fn render_active(frame: &mut ratatui::Frame, app: &App, ex: &ClozeExercise) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let footer_text = t!("exercise.footer").to_string();
    let hints: Vec<&str> = footer_text.split("  ").collect();
    let footer_lines = pack_hint_lines(&hints, area.width as usize);
    let layout = AppLayout::new(area, footer_lines.len() as u16);

    let mut info = format!(
        "| {} | {}",
        app.session.mode(),
        t!(
            "exercise.question",
            current = ex.current_index() + 1,
            total = ex.total()
        )
    );
    if app.session.is_fetching() {
        info.push_str(&format!(" | {}", t!("exercise.loading_next")));
    }
    frame.render_widget(header_line(app, info), layout.header);

    frame.render_widget(ClozeArea::new(ex, &app.theme), layout.main);

    let hint = if let Some(feedback) = ex.feedback() {
        let (key, color) = match feedback.kind {
            FeedbackKind::NotInBank => ("feedback.not_in_bank", colors.rejected()),
            FeedbackKind::Wrong => ("feedback.wrong", colors.answer_wrong()),
        };
        Span::styled(
            format!(" {}", t!(key, word = feedback.text)),
            Style::default().fg(color),
        )
    } else if ex.is_finished() && !app.session.is_settling() && !app.session.is_fetching() {
        Span::styled(
            format!(" {}", t!("exercise.all_done")),
            Style::default().fg(colors.warning()),
        )
    } else if let Some(meaning) = ex
        .current_question()
        .and_then(|q| q.meaning.as_deref())
        .filter(|_| app.session.config.show_meaning)
    {
        Span::styled(
            format!(" {}", t!("exercise.meaning", meaning = meaning)),
            Style::default().fg(colors.meaning()),
        )
    } else {
        Span::raw("")
    };
    frame.render_widget(Paragraph::new(Line::from(hint)), layout.hint);

    let progress = ProgressBar::new(
        &t!("progress.title"),
        ex.answered_count(),
        ex.total(),
        &app.theme,
    );
    frame.render_widget(progress, layout.progress);

    if let Some(bank_area) = layout.bank {
        let panel = WordBankPanel::new(&ex.bank, app.session.config.show_meaning, &app.theme);
        frame.render_widget(panel, bank_area);
    }

    let footer = Paragraph::new(
        footer_lines
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_dim()))))
            .collect::<Vec<_>>(),
    );
    frame.render_widget(footer, layout.footer);
}
