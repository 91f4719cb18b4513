// Column-drop (connect four) game on a plain two-array board
//
// Boards are indexed `[y][x]` with row 0 at the bottom. `my_board` always
// holds the stones of the player to move; boards swap after every drop.

use serde::{Deserialize, Serialize};

use crate::game::{AlternatingState, Outcome, SearchState};

pub const CONNECT_FOUR_HEIGHT: usize = 6;
pub const CONNECT_FOUR_WIDTH: usize = 7;

/// Score magnitude for decided positions.
pub const WIN_SCORE: i64 = 1_000_000_000;

pub type Grid = [[bool; CONNECT_FOUR_WIDTH]; CONNECT_FOUR_HEIGHT];

/// (dx, dy) for horizontal, vertical and both diagonals
const LINES: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectFourState {
    pub my_board: Grid,
    pub enemy_board: Grid,
    pub is_first: bool,
    pub status: ConnectFourStatus,
}

/// Status from the point of view of the player to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectFourStatus {
    Ongoing,
    Lose,
    Draw,
}

impl Default for ConnectFourState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectFourState {
    pub fn new() -> Self {
        ConnectFourState {
            my_board: [[false; CONNECT_FOUR_WIDTH]; CONNECT_FOUR_HEIGHT],
            enemy_board: [[false; CONNECT_FOUR_WIDTH]; CONNECT_FOUR_HEIGHT],
            is_first: true,
            status: ConnectFourStatus::Ongoing,
        }
    }

    /// Plays a sequence of columns from the empty board.
    pub fn from_moves(columns: &[usize]) -> Self {
        columns
            .iter()
            .fold(Self::new(), |state, &col| state.apply_action(col))
    }

    fn is_empty(&self, x: usize, y: usize) -> bool {
        !self.my_board[y][x] && !self.enemy_board[y][x]
    }

    /// Number of `board` stones in a row through (x, y) along (dx, dy).
    fn run_length(board: &Grid, x: usize, y: usize, dx: i32, dy: i32) -> usize {
        let mut count = 1;
        for sign in [1, -1] {
            let (mut cx, mut cy) = (x as i32 + dx * sign, y as i32 + dy * sign);
            while cx >= 0
                && cy >= 0
                && (cx as usize) < CONNECT_FOUR_WIDTH
                && (cy as usize) < CONNECT_FOUR_HEIGHT
                && board[cy as usize][cx as usize]
            {
                count += 1;
                cx += dx * sign;
                cy += dy * sign;
            }
        }
        count
    }

    /// Column weight favouring the centre: 4,5,6,7,6,5,4.
    pub fn column_weight(x: usize) -> i64 {
        let centre = (CONNECT_FOUR_WIDTH / 2) as i64;
        CONNECT_FOUR_WIDTH as i64 - (x as i64 - centre).abs()
    }
}

impl SearchState for ConnectFourState {
    type Action = usize;

    fn legal_actions(&self) -> Vec<usize> {
        if self.status != ConnectFourStatus::Ongoing {
            return Vec::new();
        }
        (0..CONNECT_FOUR_WIDTH)
            .filter(|&x| self.is_empty(x, CONNECT_FOUR_HEIGHT - 1))
            .collect()
    }

    fn apply_action(&self, column: usize) -> Self {
        let mut next = self.clone();
        let landing = (0..CONNECT_FOUR_HEIGHT).find(|&y| next.is_empty(column, y));

        if let Some(y) = landing {
            next.my_board[y][column] = true;
            let won = LINES
                .iter()
                .any(|&(dx, dy)| Self::run_length(&next.my_board, column, y, dx, dy) >= 4);
            if won {
                next.status = ConnectFourStatus::Lose;
            }
        }

        std::mem::swap(&mut next.my_board, &mut next.enemy_board);
        next.is_first = !next.is_first;

        if next.status == ConnectFourStatus::Ongoing && next.legal_actions().is_empty() {
            next.status = ConnectFourStatus::Draw;
        }
        next
    }

    fn is_terminal(&self) -> bool {
        self.status != ConnectFourStatus::Ongoing
    }

    fn heuristic_score(&self) -> i64 {
        match self.status {
            ConnectFourStatus::Lose => -WIN_SCORE,
            ConnectFourStatus::Draw => 0,
            ConnectFourStatus::Ongoing => {
                let mut score = 0;
                for y in 0..CONNECT_FOUR_HEIGHT {
                    for x in 0..CONNECT_FOUR_WIDTH {
                        let w = Self::column_weight(x);
                        if self.my_board[y][x] {
                            score += w;
                        } else if self.enemy_board[y][x] {
                            score -= w;
                        }
                    }
                }
                score
            }
        }
    }
}

impl AlternatingState for ConnectFourState {
    fn outcome(&self) -> Outcome {
        match self.status {
            ConnectFourStatus::Ongoing => Outcome::Ongoing,
            ConnectFourStatus::Lose => Outcome::Lose,
            ConnectFourStatus::Draw => Outcome::Draw,
        }
    }

    fn score_rate(&self) -> f64 {
        match self.status {
            ConnectFourStatus::Ongoing => centre_rate(self.heuristic_score()),
            _ => self.outcome().value(),
        }
    }
}

/// Squashes a centre-weighted stone balance into (0, 1).
pub(crate) fn centre_rate(score: i64) -> f64 {
    1.0 / (1.0 + (-(score as f64) / 20.0).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_allows_all_columns() {
        let state = ConnectFourState::new();
        assert_eq!(state.legal_actions(), (0..7).collect::<Vec<_>>());
        assert_eq!(state.heuristic_score(), 0);
    }

    #[test]
    fn test_full_column_is_illegal() {
        let state = ConnectFourState::from_moves(&[3, 3, 3, 3, 3, 3]);
        assert!(!state.legal_actions().contains(&3));
        assert_eq!(state.legal_actions().len(), 6);
    }

    #[test]
    fn test_horizontal_four_ends_game() {
        // First player builds 0..=3 on the bottom row, second stacks on top
        let state = ConnectFourState::from_moves(&[0, 0, 1, 1, 2, 2, 3]);
        assert_eq!(state.status, ConnectFourStatus::Lose);
        assert_eq!(state.outcome(), Outcome::Lose);
        assert!(state.legal_actions().is_empty());
        assert_eq!(state.heuristic_score(), -WIN_SCORE);
    }

    #[test]
    fn test_vertical_four_ends_game() {
        let state = ConnectFourState::from_moves(&[0, 1, 0, 1, 0, 1, 0]);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_diagonal_four_ends_game() {
        let state = ConnectFourState::from_moves(&[0, 1, 1, 2, 2, 3, 2, 3, 3, 6, 3]);
        assert_eq!(state.status, ConnectFourStatus::Lose);
    }

    #[test]
    fn test_perspective_swaps_after_drop() {
        let state = ConnectFourState::new().apply_action(3);
        assert!(!state.is_first);
        assert!(state.enemy_board[0][3]);
        assert_eq!(state.heuristic_score(), -ConnectFourState::column_weight(3));
    }

    #[test]
    fn test_score_rate_is_centred() {
        assert!((centre_rate(0) - 0.5).abs() < 1e-12);
        assert!(centre_rate(10) > 0.5);
    }
}
