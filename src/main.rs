//! stedi-runner - Stedi healthcare API sample request runner
//!
//! Front ends:
//! - Command line (clap) - list, inspect, run one or all requests
//! - Terminal UI (Ratatui) - select, edit, run; drawn synchronously and
//!   driven from a single-threaded Tokio runtime

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tracing_appender::non_blocking::WorkerGuard;

use stedi_runner::app::{key_to_ui_event, AppState, InputMode, UiEvent, View};
use stedi_runner::catalog::Catalog;
use stedi_runner::cli::{self, Action, Cli};
use stedi_runner::config::{ConfigPaths, SecretsStore, Settings};
use stedi_runner::constants::{APP_NAME, APP_VERSION, LOG_FILE_NAME};
use stedi_runner::credentials::CredentialResolver;
use stedi_runner::network::HttpTransport;
use stedi_runner::runner::{BatchOutcome, BatchProgress, PayloadState, Runner};
use stedi_runner::ui::{
    body_lines, centered_rect, clamp_u16, editor_cursor, highlight_json, method_color, render_tabs,
    status_color, status_style,
};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Cli::parse();
    let action = args.action();
    let _log_guard = init_logging(action, args.verbose);

    let paths = ConfigPaths::resolve(args.config.as_deref());
    let settings = Settings::load_or_default(&paths.settings);
    let credentials = CredentialResolver::new(SecretsStore::load(&paths.secrets), args.api_key.clone());
    let mut runner = Runner::new(
        Catalog::new(),
        Box::new(credentials),
        Box::new(HttpTransport::new()),
        settings,
    );

    if action == Action::Tui {
        run_tui(&mut runner).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let code = cli::execute(
        &args,
        action,
        &mut runner,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )
    .await?;
    Ok(ExitCode::from(code))
}

/// The TUI owns the terminal, so it logs to a file; everything else logs to stderr
fn init_logging(action: Action, verbose: bool) -> Option<WorkerGuard> {
    if action == Action::Tui {
        let file_appender = tracing_appender::rolling::never(".", LOG_FILE_NAME);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        tracing_subscriber::fmt()
            .with_writer(non_blocking)
            .with_ansi(false)
            .init();
        Some(guard)
    } else {
        let level = if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        };
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_max_level(level)
            .init();
        None
    }
}

async fn run_tui(runner: &mut Runner) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = AppState::new();
    app.load_selection(runner);
    tracing::info!("Terminal UI started");

    loop {
        terminal.draw(|f| draw_ui(f, &app, runner))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(key, app.view, app.input_mode, app.show_help)
                {
                    if handle_ui_event(event, &mut app, runner, &mut terminal).await? {
                        break;
                    }
                }
            }
        }
    }

    tracing::info!("Terminal UI closed");
    Ok(())
}

/// Apply one event; returns true when the UI should exit
async fn handle_ui_event<B: Backend>(
    event: UiEvent,
    app: &mut AppState,
    runner: &mut Runner,
    terminal: &mut Terminal<B>,
) -> anyhow::Result<bool> {
    match event {
        UiEvent::Quit => return Ok(true),
        UiEvent::SwitchView(view) => app.switch_view(view),

        UiEvent::SelectPrev => app.select_prev(runner),
        UiEvent::SelectNext => app.select_next(runner),

        UiEvent::StartEditing => app.start_editing(),
        UiEvent::CommitEdit => app.commit_edit(runner),
        UiEvent::CharInput(c) => app.enter_char(c),
        UiEvent::Newline => app.enter_char('\n'),
        UiEvent::Backspace => app.delete_char(),
        UiEvent::CursorLeft => app.move_cursor_left(),
        UiEvent::CursorRight => app.move_cursor_right(),
        UiEvent::CursorUp => app.move_cursor_up(),
        UiEvent::CursorDown => app.move_cursor_down(),

        UiEvent::Refresh => app.refresh(runner),
        UiEvent::Run => {
            app.is_loading = true;
            terminal.draw(|f| draw_ui(f, app, runner))?;
            app.run_selected(runner).await;
        }
        UiEvent::ClearResult => app.clear_result(runner),
        UiEvent::ToggleHeaders => app.toggle_headers(),
        UiEvent::ScrollUp => app.scroll_up(),
        UiEvent::ScrollDown => app.scroll_down(),

        UiEvent::RunAll => {
            app.begin_batch();
            let report = runner
                .run_all(|progress| {
                    if let Err(e) = terminal.draw(|f| draw_batch_progress(f, &progress)) {
                        tracing::warn!(error = %e, "Failed to draw batch progress");
                    }
                })
                .await;
            app.finish_batch(report);
        }
        UiEvent::ClearAll => app.clear_all(runner),

        UiEvent::ToggleHelp => app.toggle_help(),
        UiEvent::CloseHelp => app.close_help(),
    }
    Ok(false)
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, app: &AppState, runner: &Runner) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_tab_bar(f, app, main_chunks[0]);

    match app.view {
        View::Single => draw_single_view(f, app, runner, main_chunks[1]),
        View::Batch => draw_batch_view(f, app, runner, main_chunks[1]),
    }

    draw_status_bar(f, app, main_chunks[2]);

    if app.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_tab_bar(f: &mut Frame, app: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(40)])
        .split(area);

    let tabs = render_tabs(&[" 1:Single Request ", " 2:Run All "], app.view.index());
    f.render_widget(tabs, chunks[0]);

    let title = Paragraph::new(format!("{} v{} ", APP_NAME, APP_VERSION))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right);
    f.render_widget(title, chunks[1]);
}

fn draw_single_view(f: &mut Frame, app: &AppState, runner: &Runner, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
        .split(area);

    draw_request_list(f, app, runner, columns[0]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),      // Details
            Constraint::Percentage(45), // Payload editor
            Constraint::Min(5),         // Response
        ])
        .split(columns[1]);

    draw_details(f, app, runner, rows[0]);
    draw_editor(f, app, runner, rows[1]);
    draw_response(f, app, runner, rows[2]);
}

fn draw_request_list(f: &mut Frame, app: &AppState, runner: &Runner, area: Rect) {
    let items: Vec<ListItem> = runner
        .catalog()
        .iter()
        .map(|entry| {
            let marker = match runner.result(entry.id) {
                Some(result) => Span::styled(" ●", Style::default().fg(status_color(result.status))),
                None => Span::raw("  "),
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:2}. ", entry.id)),
                Span::styled(
                    format!("{:6}", entry.method),
                    Style::default().fg(method_color(entry.method)).bold(),
                ),
                Span::raw(format!(" {}", entry.path)),
                marker,
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Requests (↑/↓) "),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).bold());

    let mut list_state = ListState::default();
    list_state.select(Some(app.selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_details(f: &mut Frame, app: &AppState, runner: &Runner, area: Rect) {
    let Some(entry) = app.selected_entry(runner) else {
        return;
    };

    let payload_label = match runner.payload_state(entry.id) {
        Some(state) if state.rejected().is_some() => {
            Span::styled("invalid edit (previous payload kept)", Style::default().fg(Color::Red))
        }
        Some(PayloadState::Edited { .. }) => {
            Span::styled("edited", Style::default().fg(Color::Yellow))
        }
        Some(PayloadState::DefaultLoaded(_)) => {
            Span::styled("default from source", Style::default().fg(Color::Green))
        }
        Some(PayloadState::DefaultUnavailable) if entry.method.has_body() => Span::styled(
            "no default could be extracted",
            Style::default().fg(Color::Red),
        ),
        _ => Span::styled("none", Style::default().fg(Color::DarkGray)),
    };

    let lines = vec![
        Line::from(entry.description.unwrap_or("N/A")),
        Line::from(vec![
            Span::styled("URL: ", Style::default().fg(Color::DarkGray)),
            Span::raw(entry.full_url(&runner.settings().base_url)),
        ]),
        Line::from(vec![
            Span::styled("Payload: ", Style::default().fg(Color::DarkGray)),
            payload_label,
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", entry.label()))
        .title_style(Style::default().fg(method_color(entry.method)).bold());
    let details = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(details, area);
}

fn draw_editor(f: &mut Frame, app: &AppState, runner: &Runner, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let takes_body = app
        .selected_entry(runner)
        .map(|e| e.method.has_body())
        .unwrap_or(false);

    let title = if editing {
        " Payload - editing (Esc to save) "
    } else if takes_body {
        " Payload (e:edit r:refresh) "
    } else {
        " Payload (not sent for GET/DELETE) "
    };
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    // Keep the cursor line in view
    let inner_height = area.height.saturating_sub(2) as usize;
    let (line, col) = app.cursor_line_col();
    let scroll = if editing && inner_height > 0 {
        line.saturating_sub(inner_height - 1)
    } else {
        0
    };

    let content: Vec<Line> = if editing {
        app.editor.split('\n').map(|l| Line::raw(l.to_string())).collect()
    } else {
        highlight_json(&app.editor)
    };
    let editor = Paragraph::new(content)
        .block(block)
        .scroll((clamp_u16(scroll), 0));
    f.render_widget(editor, area);

    if editing {
        f.set_cursor_position(editor_cursor(area, line - scroll, col));
    }
}

fn draw_response(f: &mut Frame, app: &AppState, runner: &Runner, area: Rect) {
    let result = app
        .selected_entry(runner)
        .and_then(|entry| runner.result(entry.id));

    let Some(result) = result else {
        let text = if app.is_loading {
            " Sending request..."
        } else {
            " No response yet. Press s or Enter to run."
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Response "));
        f.render_widget(empty, area);
        return;
    };

    let status_text = Span::styled(
        format!(
            " {} {} ",
            result.status,
            result.reason.as_deref().unwrap_or("")
        ),
        Style::default().fg(status_color(result.status)).bold(),
    );
    let footer = format!(
        " {}ms | {} | {} ",
        result.elapsed.as_millis(),
        result.body_kind().as_str(),
        result.timestamp_label()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(status_text)
        .title_bottom(Line::from(footer).right_aligned());

    let mut lines = Vec::new();
    if app.show_headers {
        for (key, value) in &result.headers {
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", key), Style::default().fg(Color::Cyan)),
                Span::raw(value.clone()),
            ]));
        }
        lines.push(Line::raw(""));
    }
    lines.extend(body_lines(&result.body));

    let response = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.response_scroll, 0));
    f.render_widget(response, area);
}

fn draw_batch_view(f: &mut Frame, app: &AppState, runner: &Runner, area: Rect) {
    let Some(report) = &app.batch else {
        let text = format!(
            "\n  Press a or Enter to run all {} requests sequentially.\n  Press x to clear all results.",
            runner.catalog().len()
        );
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Run All "));
        f.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(3)])
        .split(area);

    let summary = vec![
        Line::from(format!("Total Requests: {}", report.len())),
        Line::from(vec![
            Span::raw("Successful:     "),
            Span::styled(
                format!("{} ({:.1}%)", report.success_count(), report.success_rate()),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            Span::raw("Errors:         "),
            Span::styled(
                report.error_count().to_string(),
                Style::default().fg(if report.error_count() > 0 {
                    Color::Red
                } else {
                    Color::Green
                }),
            ),
        ]),
        Line::from(format!(
            "Total Time:     {:.2}s (wall {:.2}s)",
            report.total_elapsed.as_secs_f64(),
            report.wall_time.as_secs_f64()
        )),
    ];
    let summary = Paragraph::new(summary)
        .block(Block::default().borders(Borders::ALL).title(" Results Summary "));
    f.render_widget(summary, chunks[0]);

    let lines: Vec<Line> = report
        .outcomes
        .iter()
        .filter_map(|outcome| {
            let entry = runner.catalog().get(outcome.id())?;
            let head = vec![
                Span::raw(format!("{:2}. ", entry.id)),
                Span::styled(
                    format!("{:6}", entry.method),
                    Style::default().fg(method_color(entry.method)),
                ),
                Span::raw(format!(" {:<60} ", entry.path)),
            ];
            let tail = match outcome {
                BatchOutcome::Completed {
                    status, elapsed, ..
                } => Span::styled(
                    format!("{} ({}ms)", status, elapsed.as_millis()),
                    Style::default().fg(status_color(*status)),
                ),
                BatchOutcome::Failed { message, .. } => {
                    Span::styled(format!("Error: {}", message), Style::default().fg(Color::Red))
                }
            };
            Some(Line::from([head, vec![tail]].concat()))
        })
        .collect();

    let outcomes = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Outcomes (PgUp/PgDn scroll) "),
        )
        .scroll((app.batch_scroll, 0));
    f.render_widget(outcomes, chunks[1]);
}

fn draw_batch_progress(f: &mut Frame, progress: &BatchProgress) {
    let area = centered_rect(70, 30, f.area());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Running all requests "))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(progress.position as f64 / progress.total.max(1) as f64)
        .label(format!("{}/{}", progress.position, progress.total));
    f.render_widget(gauge, chunks[0]);

    let current = Paragraph::new(format!(
        "Running request {}/{}: {} {}",
        progress.position, progress.total, progress.entry.method, progress.entry.path
    ))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(current, chunks[1]);
}

fn draw_status_bar(f: &mut Frame, app: &AppState, area: Rect) {
    let hints = if app.is_loading {
        " Loading... "
    } else if app.input_mode == InputMode::Editing {
        " Esc:save | arrows:move | Enter:newline "
    } else {
        match app.view {
            View::Single => " e:edit | r:refresh | s:run | c:clear | h:headers | ?:help | q:quit ",
            View::Batch => " a:run all | x:clear all | PgUp/PgDn:scroll | ?:help | q:quit ",
        }
    };

    let mut spans = vec![Span::styled(hints, Style::default().fg(Color::DarkGray))];
    if let Some(status) = &app.status {
        spans.push(Span::styled(status.text.clone(), status_style(status.kind)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 STEDI RUNNER - Keyboard Shortcuts

 VIEWS
   1 / 2              Single request / Run all

 SINGLE REQUEST
   ↑ / ↓              Select request
   e                  Edit payload (Esc saves)
   r                  Refresh payload from source
   s / Enter          Run request
   c                  Clear this result
   h                  Toggle response headers
   PgUp / PgDn        Scroll response

 RUN ALL
   a / Enter          Run every request in order
   x                  Clear all results

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}
