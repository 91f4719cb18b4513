//! Bit-packed connect four board.
//!
//! Each column is a 7-bit lane: six playable rows plus one guard bit that is
//! always zero. Cell (x, y) lives at bit `x * 7 + y`, row 0 at the bottom.
//!
//! ```text
//!  6 13 20 27 34 41 48   <- guard row
//!  5 12 19 26 33 40 47
//!  4 11 18 25 32 39 46
//!  3 10 17 24 31 38 45
//!  2  9 16 23 30 37 44
//!  1  8 15 22 29 36 43
//!  0  7 14 21 28 35 42
//! ```

use crate::game::{AlternatingState, Outcome, SearchState};
use crate::games::connect_four::{
    centre_rate, ConnectFourState, ConnectFourStatus, CONNECT_FOUR_HEIGHT, CONNECT_FOUR_WIDTH,
    WIN_SCORE,
};

const LANE: usize = CONNECT_FOUR_HEIGHT + 1;

/// Lowest cell of every lane.
const BOTTOM_MASK: u64 = 0b0000001_0000001_0000001_0000001_0000001_0000001_0000001;

/// Every playable cell (all lanes, guard bits excluded).
const BOARD_MASK: u64 = 0b0111111_0111111_0111111_0111111_0111111_0111111_0111111;

const COLUMN_BITS: u64 = 0b0111111;

#[inline]
const fn column_mask(x: usize) -> u64 {
    COLUMN_BITS << (x * LANE)
}

/// Connect four position seen from the player to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectFourBitBoard {
    mine: u64,
    all: u64,
    is_first: bool,
    status: ConnectFourStatus,
}

impl Default for ConnectFourBitBoard {
    fn default() -> Self {
        ConnectFourBitBoard {
            mine: 0,
            all: 0,
            is_first: true,
            status: ConnectFourStatus::Ongoing,
        }
    }
}

impl ConnectFourBitBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mine(&self) -> u64 {
        self.mine
    }

    pub fn all(&self) -> u64 {
        self.all
    }

    pub fn is_first(&self) -> bool {
        self.is_first
    }

    pub fn status(&self) -> ConnectFourStatus {
        self.status
    }

    /// True when `board` holds four in a row in any direction.
    ///
    /// Folding by one step then by twice the step leaves a set bit exactly
    /// where four consecutive cells were set. Guard bits stop vertical and
    /// diagonal runs from wrapping into the next lane.
    #[inline]
    pub fn is_winner(board: u64) -> bool {
        // horizontal, "\" diagonal, "/" diagonal, vertical
        for step in [LANE, LANE - 1, LANE + 1, 1] {
            let pairs = board & (board >> step);
            if pairs & (pairs >> (2 * step)) != 0 {
                return true;
            }
        }
        false
    }

    /// Bitmask of the cell each non-full column would receive next.
    #[inline]
    pub fn playable_cells(&self) -> u64 {
        (self.all + BOTTOM_MASK) & BOARD_MASK
    }

    /// Drops a stone for the player to move. `column` must be legal.
    pub fn advance(&mut self, column: usize) {
        // Switch to the opponent's stones first; the new stone then belongs
        // to `all ^ mine`, the player who just moved.
        self.mine ^= self.all;
        self.is_first = !self.is_first;
        self.all |= self.all + (1u64 << (column * LANE));

        if Self::is_winner(self.mine ^ self.all) {
            self.status = ConnectFourStatus::Lose;
        } else if self.all == BOARD_MASK {
            self.status = ConnectFourStatus::Draw;
        }
    }

    /// Converts back to the array form.
    pub fn to_array(&self) -> ConnectFourState {
        let mut state = ConnectFourState::new();
        for x in 0..CONNECT_FOUR_WIDTH {
            for y in 0..CONNECT_FOUR_HEIGHT {
                let bit = 1u64 << (x * LANE + y);
                if self.mine & bit != 0 {
                    state.my_board[y][x] = true;
                } else if self.all & bit != 0 {
                    state.enemy_board[y][x] = true;
                }
            }
        }
        state.is_first = self.is_first;
        state.status = self.status;
        state
    }

    fn lane_count(board: u64, x: usize) -> i64 {
        (board & column_mask(x)).count_ones() as i64
    }
}

impl From<&ConnectFourState> for ConnectFourBitBoard {
    fn from(state: &ConnectFourState) -> Self {
        let mut mine = 0u64;
        let mut all = 0u64;
        for y in 0..CONNECT_FOUR_HEIGHT {
            for x in 0..CONNECT_FOUR_WIDTH {
                let bit = 1u64 << (x * LANE + y);
                if state.my_board[y][x] {
                    mine |= bit;
                    all |= bit;
                } else if state.enemy_board[y][x] {
                    all |= bit;
                }
            }
        }

        let status = if Self::is_winner(mine ^ all) {
            ConnectFourStatus::Lose
        } else if all == BOARD_MASK {
            ConnectFourStatus::Draw
        } else {
            ConnectFourStatus::Ongoing
        };

        ConnectFourBitBoard {
            mine,
            all,
            is_first: state.is_first,
            status,
        }
    }
}

impl SearchState for ConnectFourBitBoard {
    type Action = usize;

    fn legal_actions(&self) -> Vec<usize> {
        if self.status != ConnectFourStatus::Ongoing {
            return Vec::new();
        }
        let playable = self.playable_cells();
        (0..CONNECT_FOUR_WIDTH)
            .filter(|&x| playable & column_mask(x) != 0)
            .collect()
    }

    fn apply_action(&self, column: usize) -> Self {
        let mut next = *self;
        next.advance(column);
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
                let theirs = self.mine ^ self.all;
                (0..CONNECT_FOUR_WIDTH)
                    .map(|x| {
                        ConnectFourState::column_weight(x)
                            * (Self::lane_count(self.mine, x) - Self::lane_count(theirs, x))
                    })
                    .sum()
            }
        }
    }
}

impl AlternatingState for ConnectFourBitBoard {
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

#[cfg(test)]
mod tests {
    use super::*;

    const GUARD_MASK: u64 = BOTTOM_MASK << CONNECT_FOUR_HEIGHT;

    fn play(columns: &[usize]) -> ConnectFourBitBoard {
        columns
            .iter()
            .fold(ConnectFourBitBoard::new(), |b, &c| b.apply_action(c))
    }

    #[test]
    fn test_masks_cover_the_board() {
        assert_eq!(BOARD_MASK.count_ones() as usize, CONNECT_FOUR_WIDTH * CONNECT_FOUR_HEIGHT);
        assert_eq!(BOARD_MASK & GUARD_MASK, 0);
        assert_eq!(column_mask(6) >> 42, COLUMN_BITS);
    }

    #[test]
    fn test_is_winner_directions() {
        let horizontal = (0..4).fold(0u64, |b, x| b | 1 << (x * LANE));
        let vertical = 0b1111u64 << LANE;
        let rising = (0..4).fold(0u64, |b, i| b | 1 << (i * LANE + i));
        let falling = (0..4).fold(0u64, |b, i| b | 1 << (i * LANE + 3 - i));
        for board in [horizontal, vertical, rising, falling] {
            assert!(ConnectFourBitBoard::is_winner(board), "{:b}", board);
        }
        assert!(!ConnectFourBitBoard::is_winner(0b0111));
    }

    #[test]
    fn test_vertical_run_does_not_wrap_lanes() {
        // Top three of column 0 plus bottom of column 1
        let board = 0b111000u64 | (1 << LANE);
        assert!(!ConnectFourBitBoard::is_winner(board));
    }

    #[test]
    fn test_full_column_is_illegal_and_guard_stays_clear() {
        let board = play(&[2, 2, 2, 2, 2, 2]);
        assert!(!board.legal_actions().contains(&2));
        assert_eq!(board.all() & GUARD_MASK, 0);
        assert_eq!(board.mine() & !board.all(), 0);
    }

    #[test]
    fn test_immediate_horizontal_win() {
        // Mover has three on the bottom row at columns 0..=2
        let board = play(&[0, 0, 1, 1, 2, 2]);
        assert!(board.legal_actions().contains(&3));
        let after = board.apply_action(3);
        assert_eq!(after.status(), ConnectFourStatus::Lose);
        assert_eq!(after.outcome(), Outcome::Lose);
        assert!(after.legal_actions().is_empty());
    }

    #[test]
    fn test_round_trip_through_array() {
        let array = ConnectFourState::from_moves(&[3, 2, 3, 4, 1]);
        let bits = ConnectFourBitBoard::from(&array);
        assert_eq!(bits.to_array(), array);
        assert_eq!(bits.heuristic_score(), array.heuristic_score());
    }
}
