use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use sudoku_engine::{CheckOutcome, GameSession, SessionEvent};

use crate::ui;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
    Success,
}

pub struct StatusLine {
    pub text: String,
    pub kind: StatusKind,
}

/// Frontend state wrapped around the engine session. The session owns the
/// grids and the selection; the app keeps only presentation state derived
/// from drained events.
pub struct App {
    pub session: GameSession,
    pub cursor_row: usize,
    pub cursor_col: usize,
    /// Cells currently rendered as invalid: advisory conflicts from entry
    /// plus mismatches flagged by the last explicit check.
    pub flagged: Vec<(usize, usize)>,
    pub status: Option<StatusLine>,
    pub solved: bool,
    pub show_quit_confirm: bool,
}

impl App {
    pub fn new() -> Self {
        let mut app = Self {
            session: GameSession::new(),
            cursor_row: 4,
            cursor_col: 4,
            flagged: Vec::new(),
            status: None,
            solved: false,
            show_quit_confirm: false,
        };
        app.apply_events();
        app
    }

    fn apply_events(&mut self) {
        for ev in self.session.drain_events() {
            match ev {
                SessionEvent::NewGame => {
                    self.flagged.clear();
                    self.solved = false;
                }
                SessionEvent::SelectionChanged { .. } => {}
                SessionEvent::CellUpdated {
                    row,
                    col,
                    conflict,
                    ..
                } => {
                    self.flagged.retain(|&cell| cell != (row, col));
                    if conflict {
                        self.flagged.push((row, col));
                    }
                }
                SessionEvent::CellCleared { row, col } => {
                    self.flagged.retain(|&cell| cell != (row, col));
                }
                SessionEvent::Completed => {
                    self.solved = true;
                    self.status = Some(StatusLine {
                        text: "Congratulations! You solved the puzzle!".to_string(),
                        kind: StatusKind::Success,
                    });
                }
            }
        }
    }

    pub fn move_cursor(&mut self, dr: i32, dc: i32) {
        self.cursor_row = (self.cursor_row as i32 + dr).rem_euclid(9) as usize;
        self.cursor_col = (self.cursor_col as i32 + dc).rem_euclid(9) as usize;
    }

    /// Select the cell under the cursor. The session ignores givens.
    pub fn select_under_cursor(&mut self) {
        let _ = self.session.select_cell(self.cursor_row, self.cursor_col);
        self.apply_events();
    }

    pub fn enter_value(&mut self, value: u8) {
        if let Some((row, col)) = self.session.selected() {
            if let Err(e) = self.session.set_cell_value(row, col, value) {
                self.status = Some(StatusLine {
                    text: e.to_string(),
                    kind: StatusKind::Error,
                });
            }
            self.apply_events();
        }
    }

    pub fn clear_selected(&mut self) {
        if let Some((row, col)) = self.session.selected() {
            let _ = self.session.clear_cell(row, col);
            self.apply_events();
        }
    }

    pub fn run_check(&mut self) {
        let outcome = self.session.check_solution();
        match outcome {
            CheckOutcome::Solved => {
                self.solved = true;
                self.status = Some(StatusLine {
                    text: "Congratulations! You solved the puzzle!".to_string(),
                    kind: StatusKind::Success,
                });
            }
            CheckOutcome::HasErrors { cells } => {
                for cell in cells {
                    if !self.flagged.contains(&cell) {
                        self.flagged.push(cell);
                    }
                }
                self.status = Some(StatusLine {
                    text: "There are some errors in your solution.".to_string(),
                    kind: StatusKind::Error,
                });
            }
            CheckOutcome::Incomplete => {
                self.status = Some(StatusLine {
                    text: "Keep going! The puzzle is not complete yet.".to_string(),
                    kind: StatusKind::Info,
                });
            }
        }
    }

    pub fn new_game(&mut self) {
        self.session.new_game();
        self.status = None;
        self.show_quit_confirm = false;
        self.apply_events();
    }

    pub fn filled_count(&self) -> usize {
        self.session
            .board()
            .iter()
            .flatten()
            .filter(|cell| cell.value().is_some())
            .count()
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Restore the terminal even when drawing panics.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                // Press only; crossterm sends Press+Release on Windows.
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key(app, key) {
                    return Ok(());
                }
            }
        }
    }
}

/// Handle a key event. Returns true if the app should quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if app.show_quit_confirm {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => return true,
            _ => app.show_quit_confirm = false,
        }
        return false;
    }

    if app.solved {
        match key.code {
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Enter => app.new_game(),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Up => app.move_cursor(-1, 0),
        KeyCode::Down => app.move_cursor(1, 0),
        KeyCode::Left => app.move_cursor(0, -1),
        KeyCode::Right => app.move_cursor(0, 1),
        KeyCode::Enter | KeyCode::Char(' ') => app.select_under_cursor(),
        KeyCode::Char(c @ '1'..='9') => app.enter_value(c as u8 - b'0'),
        KeyCode::Char('0') | KeyCode::Delete | KeyCode::Backspace => app.clear_selected(),
        KeyCode::Char('c') | KeyCode::Char('C') => app.run_check(),
        KeyCode::Char('n') | KeyCode::Char('N') => app.new_game(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.show_quit_confirm = true,
        _ => {}
    }
    false
}
