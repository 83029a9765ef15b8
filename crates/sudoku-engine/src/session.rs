use std::fmt;

use crate::board::{Board, Cell, SolutionBoard};
use crate::event::SessionEvent;
use crate::generate::generate_puzzle;
use crate::validation::{self, CheckOutcome};

/// Rejected session input. Nothing is mutated when one of these is
/// returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// Coordinate outside [0,8] or value outside 1-9.
    InvalidInput,
    /// The target cell is a given.
    GivenCellImmutable,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidInput => write!(f, "coordinate or value out of range"),
            SessionError::GivenCellImmutable => write!(f, "given cells cannot be changed"),
        }
    }
}

impl std::error::Error for SessionError {}

/// One game: the solved grid, the board the player works on, and the cell
/// selection. Owns all of its state; nothing is shared between sessions.
pub struct GameSession {
    board: Board,
    solution: SolutionBoard,
    selected: Option<(usize, usize)>,
    events: Vec<SessionEvent>,
}

impl GameSession {
    pub fn new() -> Self {
        let (board, solution) = generate_puzzle();
        Self {
            board,
            solution,
            selected: None,
            events: vec![SessionEvent::NewGame],
        }
    }

    /// Discard all three grids and regenerate. Selection resets to none.
    pub fn new_game(&mut self) {
        let (board, solution) = generate_puzzle();
        self.board = board;
        self.solution = solution;
        self.selected = None;
        self.events.push(SessionEvent::NewGame);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Coordinates of the pre-filled cells.
    pub fn givens(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for r in 0..9 {
            for c in 0..9 {
                if self.board[r][c].is_given() {
                    cells.push((r, c));
                }
            }
        }
        cells
    }

    pub fn selected(&self) -> Option<(usize, usize)> {
        self.selected
    }

    pub fn is_given(&self, row: usize, col: usize) -> bool {
        row < 9 && col < 9 && self.board[row][col].is_given()
    }

    /// Select a cell, replacing any previous selection. Returns Ok(false)
    /// without a transition when the cell is a given. There is no explicit
    /// deselect; only re-selection or a new game moves the selection.
    pub fn select_cell(&mut self, row: usize, col: usize) -> Result<bool, SessionError> {
        check_coord(row, col)?;
        if self.board[row][col].is_given() {
            return Ok(false);
        }
        self.selected = Some((row, col));
        self.events.push(SessionEvent::SelectionChanged { row, col });
        Ok(true)
    }

    /// Store `value` at (row, col) and report whether it currently clashes
    /// with another filled cell. The conflict is advisory: the value is
    /// kept either way, and the caller decides how to surface it.
    pub fn set_cell_value(
        &mut self,
        row: usize,
        col: usize,
        value: u8,
    ) -> Result<bool, SessionError> {
        check_coord(row, col)?;
        if !(1..=9).contains(&value) {
            return Err(SessionError::InvalidInput);
        }
        if self.board[row][col].is_given() {
            return Err(SessionError::GivenCellImmutable);
        }

        let conflict = validation::placement_conflicts(&self.board, row, col, value);
        self.board[row][col] = Cell::UserInput(value);
        self.events.push(SessionEvent::CellUpdated {
            row,
            col,
            value,
            conflict,
        });

        // Automatic completion check after every update: silent unless the
        // grid is full and matches the solution exactly.
        if validation::is_filled(&self.board)
            && validation::mismatched_cells(&self.board, &self.solution).is_empty()
        {
            self.events.push(SessionEvent::Completed);
        }

        Ok(conflict)
    }

    /// Empty the player's value at (row, col). Clearing an already-empty
    /// cell changes nothing.
    pub fn clear_cell(&mut self, row: usize, col: usize) -> Result<(), SessionError> {
        check_coord(row, col)?;
        if self.board[row][col].is_given() {
            return Err(SessionError::GivenCellImmutable);
        }
        if !self.board[row][col].is_empty() {
            self.board[row][col] = Cell::Empty;
            self.events.push(SessionEvent::CellCleared { row, col });
        }
        Ok(())
    }

    /// Explicit three-way check of the current grid.
    pub fn check_solution(&self) -> CheckOutcome {
        validation::check(&self.board, &self.solution)
    }

    /// Take the events accumulated since the last drain.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

fn check_coord(row: usize, col: usize) -> Result<(), SessionError> {
    if row > 8 || col > 8 {
        return Err(SessionError::InvalidInput);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLUTION: SolutionBoard = [
        [5, 3, 4, 6, 7, 8, 9, 1, 2],
        [6, 7, 2, 1, 9, 5, 3, 4, 8],
        [1, 9, 8, 3, 4, 2, 5, 6, 7],
        [8, 5, 9, 7, 6, 1, 4, 2, 3],
        [4, 2, 6, 8, 5, 3, 7, 9, 1],
        [7, 1, 3, 9, 2, 4, 8, 5, 6],
        [9, 6, 1, 5, 3, 7, 2, 8, 4],
        [2, 8, 7, 4, 1, 9, 6, 3, 5],
        [3, 4, 5, 2, 8, 6, 1, 7, 9],
    ];

    /// A fixed session: row 0 is given, everything else is open.
    fn scripted_session() -> GameSession {
        let mut board = [[Cell::Empty; 9]; 9];
        for c in 0..9 {
            board[0][c] = Cell::Given(SOLUTION[0][c]);
        }
        GameSession {
            board,
            solution: SOLUTION,
            selected: None,
            events: Vec::new(),
        }
    }

    #[test]
    fn out_of_range_inputs_are_rejected_without_mutation() {
        let mut session = scripted_session();
        assert_eq!(session.select_cell(9, 0), Err(SessionError::InvalidInput));
        assert_eq!(
            session.set_cell_value(1, 9, 5),
            Err(SessionError::InvalidInput)
        );
        assert_eq!(
            session.set_cell_value(1, 1, 0),
            Err(SessionError::InvalidInput)
        );
        assert_eq!(
            session.set_cell_value(1, 1, 10),
            Err(SessionError::InvalidInput)
        );
        assert_eq!(session.clear_cell(0, 9), Err(SessionError::InvalidInput));
        assert_eq!(session.selected(), None);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn givens_refuse_selection_and_keep_previous_selection() {
        let mut session = scripted_session();
        assert_eq!(session.select_cell(4, 4), Ok(true));
        assert_eq!(session.select_cell(0, 3), Ok(false));
        assert_eq!(session.selected(), Some((4, 4)));
    }

    #[test]
    fn reselection_replaces_previous_selection() {
        let mut session = scripted_session();
        session.select_cell(1, 1).unwrap();
        session.select_cell(8, 8).unwrap();
        assert_eq!(session.selected(), Some((8, 8)));
    }

    #[test]
    fn givens_are_immutable() {
        let mut session = scripted_session();
        let before = *session.board();
        assert_eq!(
            session.set_cell_value(0, 2, 9),
            Err(SessionError::GivenCellImmutable)
        );
        assert_eq!(
            session.clear_cell(0, 2),
            Err(SessionError::GivenCellImmutable)
        );
        assert_eq!(*session.board(), before);
    }

    #[test]
    fn conflicting_value_is_stored_and_reported() {
        let mut session = scripted_session();
        // (1,0) shares a column with the given 5 at (0,0).
        assert_eq!(session.set_cell_value(1, 0, 5), Ok(true));
        assert_eq!(session.board()[1][0], Cell::UserInput(5));

        let events = session.drain_events();
        assert!(events.contains(&SessionEvent::CellUpdated {
            row: 1,
            col: 0,
            value: 5,
            conflict: true,
        }));
    }

    #[test]
    fn non_conflicting_value_reports_clean() {
        let mut session = scripted_session();
        assert_eq!(
            session.set_cell_value(1, 0, SOLUTION[1][0]),
            Ok(false)
        );
    }

    #[test]
    fn clear_cell_empties_and_ignores_already_empty() {
        let mut session = scripted_session();
        session.set_cell_value(5, 5, 3).unwrap();
        session.clear_cell(5, 5).unwrap();
        assert!(session.board()[5][5].is_empty());

        session.drain_events();
        session.clear_cell(5, 5).unwrap();
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn filling_the_grid_correctly_emits_completed() {
        let mut session = scripted_session();
        for r in 1..9 {
            for c in 0..9 {
                session.set_cell_value(r, c, SOLUTION[r][c]).unwrap();
            }
        }
        let events = session.drain_events();
        assert_eq!(events.last(), Some(&SessionEvent::Completed));
        assert_eq!(
            events.iter().filter(|e| **e == SessionEvent::Completed).count(),
            1
        );
        assert_eq!(session.check_solution(), CheckOutcome::Solved);
    }

    #[test]
    fn full_grid_with_one_wrong_cell_stays_silent_until_checked() {
        let mut session = scripted_session();
        for r in 1..9 {
            for c in 0..9 {
                let v = if (r, c) == (7, 7) {
                    SOLUTION[7][7] % 9 + 1
                } else {
                    SOLUTION[r][c]
                };
                session.set_cell_value(r, c, v).unwrap();
            }
        }
        let events = session.drain_events();
        assert!(!events.contains(&SessionEvent::Completed));
        assert_eq!(
            session.check_solution(),
            CheckOutcome::HasErrors {
                cells: vec![(7, 7)]
            }
        );
    }

    #[test]
    fn check_solution_is_idempotent_without_mutation() {
        let mut session = scripted_session();
        session.set_cell_value(3, 3, 2).unwrap();
        assert_eq!(session.check_solution(), session.check_solution());
    }

    #[test]
    fn new_game_resets_selection_and_regenerates() {
        let mut session = scripted_session();
        session.select_cell(2, 2).unwrap();
        session.new_game();
        assert_eq!(session.selected(), None);
        assert_eq!(
            session.drain_events().last(),
            Some(&SessionEvent::NewGame)
        );

        // Fresh puzzle upholds the given/solution invariant.
        for (r, c) in session.givens() {
            assert_eq!(
                session.board()[r][c],
                Cell::Given(session.solution[r][c])
            );
        }
    }

    #[test]
    fn generated_sessions_start_unsolved() {
        let session = GameSession::new();
        assert_eq!(session.check_solution(), CheckOutcome::Incomplete);
    }
}
