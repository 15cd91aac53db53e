//! Maze grid and perfect-maze generation
//!
//! Cells store open passages as a bitmask (N=1, S=2, E=4, W=8). Every passage
//! is carved on both sides, so the grid is always reciprocal.

use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Cardinal move direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Passage bit for this direction
    #[inline]
    pub const fn bit(self) -> u8 {
        match self {
            Direction::North => 1,
            Direction::South => 2,
            Direction::East => 4,
            Direction::West => 8,
        }
    }

    /// Grid delta (x, y); north is -y
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    #[inline]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

/// Open passages out of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MazeCell(u8);

impl MazeCell {
    #[inline]
    pub fn is_open(self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    #[inline]
    pub fn open(&mut self, dir: Direction) {
        self.0 |= dir.bit();
    }

    /// Raw bitmask
    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Number of open passages out of this cell
    pub fn degree(self) -> u32 {
        self.0.count_ones()
    }
}

/// Grid coordinate. Always in bounds for the maze it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Neighbor one step in `dir`, or None if it would leave a `cols x rows` grid
    pub fn step(self, dir: Direction, cols: usize, rows: usize) -> Option<Position> {
        let (dx, dy) = dir.delta();
        let x = self.x.checked_add_signed(dx as isize)?;
        let y = self.y.checked_add_signed(dy as isize)?;
        (x < cols && y < rows).then_some(Position { x, y })
    }

    /// Euclidean distance from the origin cell
    pub fn distance_from_origin(self) -> f64 {
        ((self.x * self.x + self.y * self.y) as f64).sqrt()
    }
}

/// Rectangular grid of cells, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    rows: usize,
    cols: usize,
    cells: Vec<MazeCell>,
}

impl Maze {
    /// A grid with every wall standing
    pub fn closed(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![MazeCell::default(); rows * cols],
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        pos.y * self.cols + pos.x
    }

    pub fn cell(&self, pos: Position) -> MazeCell {
        self.cells[self.index(pos)]
    }

    pub fn cells(&self) -> &[MazeCell] {
        &self.cells
    }

    /// Open the wall between `pos` and its neighbor in `dir` on both sides.
    /// Returns false if the neighbor is outside the grid.
    pub fn carve(&mut self, pos: Position, dir: Direction) -> bool {
        let Some(next) = pos.step(dir, self.cols, self.rows) else {
            return false;
        };
        let a = self.index(pos);
        let b = self.index(next);
        self.cells[a].open(dir);
        self.cells[b].open(dir.opposite());
        true
    }

    /// Number of carved passages (each counted once)
    pub fn passage_count(&self) -> usize {
        let ends: u32 = self.cells.iter().map(|c| c.degree()).sum();
        ends as usize / 2
    }

    /// Cells reachable from `start` through open passages
    pub fn reachable_from(&self, start: Position) -> usize {
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        seen[self.index(start)] = true;
        queue.push_back(start);
        let mut count = 0;

        while let Some(pos) = queue.pop_front() {
            count += 1;
            for dir in Direction::ALL {
                if !self.cell(pos).is_open(dir) {
                    continue;
                }
                if let Some(next) = pos.step(dir, self.cols, self.rows) {
                    let i = self.index(next);
                    if !seen[i] {
                        seen[i] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        count
    }

    /// Directions of the shortest passage route from `from` to `to`
    pub fn shortest_path(&self, from: Position, to: Position) -> Option<Vec<Direction>> {
        let mut came_from: Vec<Option<(Position, Direction)>> = vec![None; self.cells.len()];
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        seen[self.index(from)] = true;
        queue.push_back(from);

        while let Some(pos) = queue.pop_front() {
            if pos == to {
                let mut path = Vec::new();
                let mut cur = pos;
                while let Some((prev, dir)) = came_from[self.index(cur)] {
                    path.push(dir);
                    cur = prev;
                }
                path.reverse();
                return Some(path);
            }
            for dir in Direction::ALL {
                if !self.cell(pos).is_open(dir) {
                    continue;
                }
                if let Some(next) = pos.step(dir, self.cols, self.rows) {
                    let i = self.index(next);
                    if !seen[i] {
                        seen[i] = true;
                        came_from[i] = Some((pos, dir));
                        queue.push_back(next);
                    }
                }
            }
        }
        None
    }
}

/// Generate a perfect maze with a randomized depth-first backtracker from (0, 0)
pub fn generate_maze<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Maze {
    let mut maze = Maze::closed(rows, cols);
    if rows == 0 || cols == 0 {
        return maze;
    }

    let mut visited = vec![false; rows * cols];
    let mut stack = vec![Position::ORIGIN];
    visited[0] = true;

    while let Some(&current) = stack.last() {
        let mut dirs = Direction::ALL;
        dirs.shuffle(rng);

        let next = dirs.into_iter().find_map(|dir| {
            current
                .step(dir, cols, rows)
                .filter(|n| !visited[n.y * cols + n.x])
                .map(|n| (dir, n))
        });

        match next {
            Some((dir, n)) => {
                maze.carve(current, dir);
                visited[n.y * cols + n.x] = true;
                stack.push(n);
            }
            None => {
                stack.pop();
            }
        }
    }

    maze
}

/// Pick a random perimeter exit at least `min(4, min(rows, cols) / 3)` from the start
pub fn generate_exit<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Position {
    let fallback = Position::new(cols.saturating_sub(1), rows.saturating_sub(1));
    if rows == 0 || cols == 0 {
        return fallback;
    }

    let min_distance = 4.min(rows.min(cols) / 3) as f64;
    let candidates: Vec<Position> = perimeter(rows, cols)
        .filter(|p| *p != Position::ORIGIN && p.distance_from_origin() >= min_distance)
        .collect();

    if candidates.is_empty() {
        return fallback;
    }
    candidates[rng.random_range(0..candidates.len())]
}

/// Perimeter cells, each exactly once
fn perimeter(rows: usize, cols: usize) -> impl Iterator<Item = Position> {
    (0..rows).flat_map(move |y| {
        (0..cols)
            .filter(move |&x| y == 0 || y == rows - 1 || x == 0 || x == cols - 1)
            .map(move |x| Position::new(x, y))
    })
}

/// True iff the maze has an open passage out of (x, y) in `dir`
#[inline]
pub fn can_move(maze: &Maze, x: usize, y: usize, dir: Direction) -> bool {
    maze.cell(Position::new(x, y)).is_open(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn is_on_perimeter(p: Position, rows: usize, cols: usize) -> bool {
        p.x == 0 || p.y == 0 || p.x == cols - 1 || p.y == rows - 1
    }

    #[test]
    fn test_generate_15x15_is_spanning_tree() {
        let mut rng = Pcg32::seed_from_u64(42);
        let maze = generate_maze(15, 15, &mut rng);
        assert_eq!(maze.passage_count(), 224);
        assert_eq!(maze.reachable_from(Position::ORIGIN), 225);
    }

    #[test]
    fn test_single_cell_maze() {
        let mut rng = Pcg32::seed_from_u64(1);
        let maze = generate_maze(1, 1, &mut rng);
        assert_eq!(maze.passage_count(), 0);
        assert_eq!(maze.reachable_from(Position::ORIGIN), 1);
    }

    #[test]
    fn test_can_move_matches_bits() {
        let mut maze = Maze::closed(2, 2);
        assert!(maze.carve(Position::ORIGIN, Direction::East));
        assert!(can_move(&maze, 0, 0, Direction::East));
        assert!(can_move(&maze, 1, 0, Direction::West));
        assert!(!can_move(&maze, 0, 0, Direction::South));
        // Carving off the edge does nothing
        assert!(!maze.carve(Position::ORIGIN, Direction::North));
        assert_eq!(maze.passage_count(), 1);
    }

    #[test]
    fn test_step_bounds() {
        let p = Position::ORIGIN;
        assert_eq!(p.step(Direction::North, 5, 5), None);
        assert_eq!(p.step(Direction::West, 5, 5), None);
        assert_eq!(p.step(Direction::East, 5, 5), Some(Position::new(1, 0)));
        assert_eq!(Position::new(4, 4).step(Direction::South, 5, 5), None);
    }

    #[test]
    fn test_exit_fallback_for_tiny_maze() {
        // 1x1: no perimeter cell other than the start
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(generate_exit(1, 1, &mut rng), Position::new(0, 0));
    }

    #[test]
    fn test_exit_min_distance_15() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..200 {
            let exit = generate_exit(15, 15, &mut rng);
            assert!(is_on_perimeter(exit, 15, 15));
            assert!(exit.distance_from_origin() >= 4.0);
        }
    }

    #[test]
    fn test_shortest_path_reaches_exit() {
        let mut rng = Pcg32::seed_from_u64(5);
        let maze = generate_maze(10, 10, &mut rng);
        let exit = generate_exit(10, 10, &mut rng);
        let path = maze.shortest_path(Position::ORIGIN, exit).unwrap();

        let mut pos = Position::ORIGIN;
        for dir in path {
            assert!(can_move(&maze, pos.x, pos.y, dir));
            pos = pos.step(dir, 10, 10).unwrap();
        }
        assert_eq!(pos, exit);
    }

    proptest! {
        #[test]
        fn prop_maze_connected_and_acyclic(rows in 2usize..26, cols in 2usize..26, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let maze = generate_maze(rows, cols, &mut rng);
            prop_assert_eq!(maze.passage_count(), rows * cols - 1);
            prop_assert_eq!(maze.reachable_from(Position::ORIGIN), rows * cols);
        }

        #[test]
        fn prop_passages_reciprocal(rows in 1usize..20, cols in 1usize..20, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let maze = generate_maze(rows, cols, &mut rng);
            for y in 0..rows {
                for x in 0..cols {
                    let pos = Position::new(x, y);
                    for dir in Direction::ALL {
                        match pos.step(dir, cols, rows) {
                            Some(n) => prop_assert_eq!(
                                maze.cell(pos).is_open(dir),
                                maze.cell(n).is_open(dir.opposite())
                            ),
                            None => prop_assert!(!maze.cell(pos).is_open(dir)),
                        }
                    }
                }
            }
        }

        #[test]
        fn prop_exit_on_perimeter_and_far(rows in 2usize..30, cols in 2usize..30, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let exit = generate_exit(rows, cols, &mut rng);
            prop_assert!(exit.x < cols && exit.y < rows);
            prop_assert!(is_on_perimeter(exit, rows, cols));
            prop_assert_ne!(exit, Position::ORIGIN);
            let min_distance = 4.min(rows.min(cols) / 3) as f64;
            prop_assert!(exit.distance_from_origin() >= min_distance);
        }
    }
}
