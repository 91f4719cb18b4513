// Single-agent grid maze: walk for a fixed number of turns collecting points

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{random_points, PointGrid, MAZE_END_TURN, MAZE_HEIGHT, MAZE_WIDTH};
use crate::game::SearchState;
use crate::types::{Coord, Direction};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeState {
    pub points: PointGrid,
    pub character: Coord,
    pub turn: u32,
    pub game_score: i32,
}

impl MazeState {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let character = Coord::new(
            rng.random_range(0..MAZE_WIDTH as i32),
            rng.random_range(0..MAZE_HEIGHT as i32),
        );
        let mut points = random_points(&mut rng);
        points[character.y as usize][character.x as usize] = 0;

        MazeState {
            points,
            character,
            turn: 0,
            game_score: 0,
        }
    }
}

impl SearchState for MazeState {
    type Action = Direction;

    fn legal_actions(&self) -> Vec<Direction> {
        if self.is_terminal() {
            return Vec::new();
        }
        Direction::all()
            .into_iter()
            .filter(|dir| dir.apply(&self.character).in_bounds(MAZE_WIDTH, MAZE_HEIGHT))
            .collect()
    }

    fn apply_action(&self, action: Direction) -> Self {
        let mut next = self.clone();
        next.character = action.apply(&self.character);
        let point = &mut next.points[next.character.y as usize][next.character.x as usize];
        next.game_score += *point;
        *point = 0;
        next.turn += 1;
        next
    }

    fn is_terminal(&self) -> bool {
        self.turn >= MAZE_END_TURN
    }

    fn heuristic_score(&self) -> i64 {
        self.game_score as i64
    }
}
