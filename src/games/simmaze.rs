// Simultaneous-move maze: both characters move every turn

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::twomaze::MazePlayer;
use super::{PointGrid, MAZE_END_TURN, MAZE_HEIGHT, MAZE_WIDTH};
use crate::game::{Outcome, SimultaneousState};
use crate::types::{Coord, Direction};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimMazeState {
    pub points: PointGrid,
    pub players: [MazePlayer; 2],
    pub turn: u32,
}

impl SimMazeState {
    /// Builds a board whose points are mirrored left to right, so neither
    /// side starts with an advantage.
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

        let mut points = [[0; MAZE_WIDTH]; MAZE_HEIGHT];
        for y in 0..MAZE_HEIGHT {
            for x in 0..MAZE_WIDTH / 2 {
                let mirror = MAZE_WIDTH - 1 - x;
                let occupied = players.iter().any(|p| {
                    p.coord.y as usize == y && (p.coord.x as usize == x || p.coord.x as usize == mirror)
                });
                let point = if occupied { 0 } else { rng.random_range(0..10) };
                points[y][x] = point;
                points[y][mirror] = point;
            }
        }

        SimMazeState {
            points,
            players,
            turn: 0,
        }
    }

    pub fn score_margin(&self) -> i32 {
        self.players[0].game_score - self.players[1].game_score
    }
}

impl SimultaneousState for SimMazeState {
    type Action = Direction;

    fn legal_actions_for(&self, player: usize) -> Vec<Direction> {
        if self.is_terminal() {
            return Vec::new();
        }
        let coord = self.players[player].coord;
        Direction::all()
            .into_iter()
            .filter(|dir| dir.apply(&coord).in_bounds(MAZE_WIDTH, MAZE_HEIGHT))
            .collect()
    }

    fn apply_actions(&self, first: Direction, second: Direction) -> Self {
        let mut next = self.clone();
        next.players[0].coord = first.apply(&self.players[0].coord);
        next.players[1].coord = second.apply(&self.players[1].coord);

        if next.players[0].coord == next.players[1].coord {
            // Contested cell: nobody scores it
            let c = next.players[0].coord;
            next.points[c.y as usize][c.x as usize] = 0;
        } else {
            for player in next.players.iter_mut() {
                let point = &mut next.points[player.coord.y as usize][player.coord.x as usize];
                player.game_score += *point;
                *point = 0;
            }
        }

        next.turn += 1;
        next
    }

    fn is_terminal(&self) -> bool {
        self.turn >= MAZE_END_TURN
    }

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

    fn heuristic_score(&self) -> i64 {
        self.score_margin() as i64
    }

    fn score_rate(&self) -> f64 {
        let total = self.players[0].game_score + self.players[1].game_score;
        if total == 0 {
            0.5
        } else {
            self.players[0].game_score as f64 / total as f64
        }
    }
}
