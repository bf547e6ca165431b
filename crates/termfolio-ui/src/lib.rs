use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use termfolio_core::UiConfig;
use termfolio_shell::{InputEvent, Session, SessionState};
use tracing::{debug, info};
use unicode_width::UnicodeWidthStr;

mod keys;
mod palette;

pub use keys::{KeyAction, KeyBindings, load_keybindings, parse_key_event};
pub use palette::{Palette, parse_hex_color};

const TICK: Duration = Duration::from_millis(33);
const FAREWELL_PAUSE: Duration = Duration::from_millis(900);

const BOOT_LINES: &[&str] = &[
    "[  OK  ] Initializing portfolio kernel...",
    "[  OK  ] Loading developer profile...",
    "[  OK  ] Mounting /projects...",
    "[  OK  ] Indexing skills database...",
    "[  OK  ] Applying terminal theme...",
    "[  OK  ] Starting interactive shell...",
];

#[derive(Debug, Clone)]
pub struct TuiOptions {
    pub boot_delay: Duration,
    pub skip_boot: bool,
    /// Leave the terminal once the `exit` farewell has been shown.
    pub exit_on_exit_command: bool,
    pub bindings: KeyBindings,
}

impl Default for TuiOptions {
    fn default() -> Self {
        Self {
            boot_delay: Duration::from_millis(UiConfig::default().boot_delay_ms),
            skip_boot: false,
            exit_on_exit_command: true,
            bindings: KeyBindings::default(),
        }
    }
}

impl TuiOptions {
    /// Relative keybinding paths resolve against the workspace.
    pub fn from_config(ui: &UiConfig, workspace: &Path) -> Result<Self> {
        let bindings = match ui.keybindings_path.as_deref() {
            Some(raw) => {
                let path = workspace.join(raw);
                load_keybindings(&path)
                    .with_context(|| format!("invalid keybindings file {}", path.display()))?
            }
            None => KeyBindings::default(),
        };
        Ok(Self {
            boot_delay: Duration::from_millis(ui.boot_delay_ms),
            skip_boot: ui.skip_boot,
            exit_on_exit_command: ui.exit_on_exit_command,
            bindings,
        })
    }
}

/// Restores the terminal on drop, including during unwinding.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
    }
}

/// Characters typed since the last whole-line update from the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct InputBuffer {
    text: String,
}

impl InputBuffer {
    fn insert(&mut self, ch: char) {
        self.text.push(ch);
    }

    fn backspace(&mut self) -> bool {
        self.text.pop().is_some()
    }

    fn replace(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }
}

/// Plain characters, optionally shifted, edit the line; anything with
/// control or alt held does not.
fn typed_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(ch) if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() => Some(ch),
        _ => None,
    }
}

pub fn run_tui(session: &mut Session, options: &TuiOptions) -> Result<()> {
    let sigint_flag = Arc::new(AtomicBool::new(false));
    #[cfg(unix)]
    {
        let flag = Arc::clone(&sigint_flag);
        signal_hook::flag::register(signal_hook::consts::SIGINT, flag)?;
    }

    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
        prev_hook(info);
    }));

    enable_raw_mode()?;
    let _guard = TerminalGuard;
    crossterm::execute!(io::stdout(), EnterAlternateScreen, crossterm::cursor::Hide)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    info!(theme = session.theme(), "terminal session started");
    let started = Instant::now();
    if options.skip_boot {
        session.boot();
    }
    let mut input = InputBuffer::default();

    loop {
        if session.state() == SessionState::Booting && started.elapsed() >= options.boot_delay {
            session.boot();
        }
        terminal.draw(|frame| draw(frame, session, started.elapsed(), options.boot_delay))?;

        if sigint_flag.swap(false, Ordering::SeqCst) {
            session.handle(InputEvent::Cancel);
            input.replace(session.input());
            continue;
        }
        if !event::poll(TICK)? {
            continue;
        }
        let key = match event::read()? {
            Event::Key(key) => key,
            Event::Paste(pasted) => {
                for ch in pasted.chars().filter(|ch| !ch.is_control()) {
                    input.insert(ch);
                }
                session.handle(InputEvent::TextChanged(input.text.clone()));
                continue;
            }
            _ => continue,
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let action = options.bindings.action_for(&key);
        if action == Some(KeyAction::Quit) {
            break;
        }
        if session.state() == SessionState::Booting {
            session.boot();
            continue;
        }

        match action {
            Some(KeyAction::Submit) => {
                session.handle(InputEvent::Submit);
            }
            Some(KeyAction::HistoryPrev) => {
                session.handle(InputEvent::HistoryOlder);
            }
            Some(KeyAction::HistoryNext) => {
                session.handle(InputEvent::HistoryNewer);
            }
            Some(KeyAction::Autocomplete) => {
                session.handle(InputEvent::CompletionRequest);
            }
            Some(KeyAction::Cancel) => {
                session.handle(InputEvent::Cancel);
            }
            Some(KeyAction::Quit) => break,
            None => {
                let changed = match (key.code, typed_char(&key)) {
                    (_, Some(ch)) => {
                        input.insert(ch);
                        true
                    }
                    (KeyCode::Backspace, None) => input.backspace(),
                    _ => false,
                };
                if changed {
                    session.handle(InputEvent::TextChanged(input.text.clone()));
                }
            }
        }
        input.replace(session.input());

        if session.take_exit_request() && options.exit_on_exit_command {
            debug!("exit command received, leaving terminal");
            terminal.draw(|frame| draw(frame, session, started.elapsed(), options.boot_delay))?;
            std::thread::sleep(FAREWELL_PAUSE);
            break;
        }
    }

    drop(_guard);
    info!("terminal session ended");
    Ok(())
}

/// How many boot lines have "finished" after `elapsed`.
fn boot_lines_visible(elapsed: Duration, delay: Duration) -> usize {
    if delay.is_zero() {
        return BOOT_LINES.len();
    }
    let fraction = elapsed.as_secs_f64() / delay.as_secs_f64();
    ((fraction * BOOT_LINES.len() as f64).floor() as usize + 1).min(BOOT_LINES.len())
}

/// Rows a line occupies once wrapped at `width` columns.
fn wrapped_rows(line: &Line<'_>, width: u16) -> usize {
    let width = usize::from(width.max(1));
    let used: usize = line.spans.iter().map(|span| span.content.width()).sum();
    used.div_ceil(width).max(1)
}

fn status_line(session: &Session) -> String {
    format!(
        " Enter run | ↑↓ history | Tab complete | Ctrl+C cancel | Ctrl+D quit | theme: {}",
        session.theme()
    )
}

fn draw(frame: &mut Frame<'_>, session: &Session, elapsed: Duration, boot_delay: Duration) {
    let palette = session
        .content()
        .theme(session.theme())
        .map(Palette::from_theme)
        .unwrap_or_default();
    let area = frame.area();

    if session.state() == SessionState::Booting {
        let visible = boot_lines_visible(elapsed, boot_delay);
        let mut lines = vec![Line::from(Span::styled(
            "PORTFOLIO OS v1.0",
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        ))];
        lines.push(Line::default());
        lines.extend(BOOT_LINES.iter().take(visible).map(|text| {
            Line::from(Span::styled(*text, Style::default().fg(palette.primary)))
        }));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Press any key to skip",
            Style::default().fg(palette.secondary),
        )));
        frame.render_widget(Paragraph::new(lines), area);
        return;
    }

    let [log_area, prompt_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let mut lines = palette.lines(&session.banner());
    lines.push(Line::default());
    for entry in session.output().entries() {
        lines.extend(palette.entry_lines(entry));
    }
    render_log(frame, log_area, lines);

    let prompt = Line::from(vec![
        Span::styled(
            session.prompt(),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(session.input().to_string(), Style::default().fg(palette.primary)),
        Span::styled("█", Style::default().fg(palette.primary)),
    ]);
    frame.render_widget(Paragraph::new(prompt), prompt_area);
    frame.render_widget(
        Paragraph::new(Span::styled(
            status_line(session),
            Style::default().fg(palette.secondary),
        )),
        status_area,
    );
}

/// Renders the log pinned to its newest line.
fn render_log(frame: &mut Frame<'_>, area: Rect, lines: Vec<Line<'static>>) {
    let total: usize = lines.iter().map(|line| wrapped_rows(line, area.width)).sum();
    let offset = total.saturating_sub(usize::from(area.height));
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((offset, 0));
    frame.render_widget(paragraph, area);
}
