// Concrete games exposed to the engines through the state contracts

pub mod connect_four;
pub mod maze;
pub mod simmaze;
pub mod twomaze;

use rand::Rng;

/// Grid maze height
pub const MAZE_HEIGHT: usize = 8;
/// Grid maze width
pub const MAZE_WIDTH: usize = 8;
/// Number of turns before a maze game ends
pub const MAZE_END_TURN: u32 = 15;

/// Point value grid, indexed `[y][x]`.
pub type PointGrid = [[i32; MAZE_WIDTH]; MAZE_HEIGHT];

/// Fills a grid with uniform point values in 0..=9.
pub(crate) fn random_points<R: Rng + ?Sized>(rng: &mut R) -> PointGrid {
    let mut points = [[0; MAZE_WIDTH]; MAZE_HEIGHT];
    for row in points.iter_mut() {
        for cell in row.iter_mut() {
            *cell = rng.random_range(0..10);
        }
    }
    points
}
