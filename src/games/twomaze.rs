// Two-player alternating maze
//
// `players[0]` is always the player to move. After each move the pair is
// swapped, so every query on the state is already from the mover's side.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::{random_points, PointGrid, MAZE_END_TURN, MAZE_HEIGHT, MAZE_WIDTH};
use crate::game::{AlternatingState, Outcome, SearchState};
use crate::types::{Coord, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazePlayer {
    pub coord: Coord,
    pub game_score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoMazeState {
    pub points: PointGrid,
    pub players: [MazePlayer; 2],
    pub turn: u32,
}

impl TwoMazeState {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mid_y = (MAZE_HEIGHT / 2) as i32;
        let mid_x = (MAZE_WIDTH / 2) as i32;
        let players = [
            MazePlayer {
                coord: Coord::new(mid_x - 1, mid_y),
                game_score: 0,
            },
            MazePlayer {
                coord: Coord::new(mid_x + 1, mid_y),
                game_score: 0,
            },
        ];

        let mut points = random_points(&mut rng);
        for player in &players {
            points[player.coord.y as usize][player.coord.x as usize] = 0;
        }

        TwoMazeState {
            points,
            players,
            turn: 0,
        }
    }

    /// Score of the player to move minus the opponent's.
    pub fn score_margin(&self) -> i32 {
        self.players[0].game_score - self.players[1].game_score
    }
}

impl SearchState for TwoMazeState {
    type Action = Direction;

    fn legal_actions(&self) -> Vec<Direction> {
        if self.is_terminal() {
            return Vec::new();
        }
        let mover = self.players[0].coord;
        Direction::all()
            .into_iter()
            .filter(|dir| dir.apply(&mover).in_bounds(MAZE_WIDTH, MAZE_HEIGHT))
            .collect()
    }

    fn apply_action(&self, action: Direction) -> Self {
        let mut next = self.clone();
        let mover = &mut next.players[0];
        mover.coord = action.apply(&mover.coord);
        let point = &mut next.points[mover.coord.y as usize][mover.coord.x as usize];
        mover.game_score += *point;
        *point = 0;
        next.turn += 1;
        next.players.swap(0, 1);
        next
    }

    fn is_terminal(&self) -> bool {
        self.turn >= MAZE_END_TURN
    }

    fn heuristic_score(&self) -> i64 {
        self.score_margin() as i64
    }
}

impl AlternatingState for TwoMazeState {
    fn outcome(&self) -> Outcome {
        if !self.is_terminal() {
            return Outcome::Ongoing;
        }
        match self.score_margin() {
            m if m > 0 => Outcome::Win,
            m if m < 0 => Outcome::Lose,
            _ => Outcome::Draw,
        }
    }

    fn score_rate(&self) -> f64 {
        let mine = self.players[0].game_score;
        let total = mine + self.players[1].game_score;
        if total == 0 {
            0.5
        } else {
            mine as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::flip_value;

    #[test]
    fn test_players_start_apart_on_empty_cells() {
        let state = TwoMazeState::new(0);
        assert_ne!(state.players[0].coord, state.players[1].coord);
        for p in &state.players {
            assert_eq!(state.points[p.coord.y as usize][p.coord.x as usize], 0);
        }
    }

    #[test]
    fn test_move_swaps_perspective() {
        let state = TwoMazeState::new(4);
        let action = state.legal_actions()[0];
        let target = action.apply(&state.players[0].coord);
        let gained = state.points[target.y as usize][target.x as usize];

        let next = state.apply_action(action);
        assert_eq!(next.players[1].coord, target, "mover should now be in slot 1");
        assert_eq!(next.players[1].game_score, gained);
        assert_eq!(next.heuristic_score(), -(gained as i64));
    }

    #[test]
    fn test_terminal_outcome_is_from_mover_side() {
        let mut state = TwoMazeState::new(9);
        state.turn = MAZE_END_TURN;
        state.players[0].game_score = 10;
        state.players[1].game_score = 3;
        assert_eq!(state.outcome(), Outcome::Win);
        assert!(state.legal_actions().is_empty());

        state.players.swap(0, 1);
        assert_eq!(state.outcome(), Outcome::Lose);
    }

    #[test]
    fn test_score_rate_complements_after_swap() {
        let mut state = TwoMazeState::new(2);
        assert_eq!(state.score_rate(), 0.5);
        state.players[0].game_score = 3;
        state.players[1].game_score = 1;
        let rate = state.score_rate();
        state.players.swap(0, 1);
        assert!((state.score_rate() - flip_value(rate)).abs() < 1e-12);
    }
}
