use anyhow::{anyhow, bail, Context};
use rand::Rng;
use std::fs;

use crate::common::{Cell, Position, DIRECTIONS, ORIGIN};

/// Hidden layout of a world. `grid[0]` is the top row, so `(x, y)` lives at
/// `grid[height - 1 - y][x]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    pub height: usize,
    pub width: usize,
    pub grid: Vec<Vec<Cell>>,
}

impl Map {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("cannot read world file {path}"))?;
        Self::parse(&content).with_context(|| format!("invalid world file {path}"))
    }

    /// Whitespace separated rows of `E`, `P`, `W` and `G`, top row first.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let mut grid: Vec<Vec<Cell>> = Vec::new();
        for (row, token) in content.split_whitespace().enumerate() {
            let cells = token
                .chars()
                .map(|c| Cell::from_char(c).ok_or_else(|| anyhow!("unknown cell {c:?} in row {row}")))
                .collect::<anyhow::Result<Vec<_>>>()?;
            grid.push(cells);
        }

        let height = grid.len();
        let width = grid.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            bail!("world is empty");
        }
        if let Some(row) = grid.iter().position(|cells| cells.len() != width) {
            bail!("row {row} has {} cells, expected {width}", grid[row].len());
        }

        Ok(Map {
            height,
            width,
            grid,
        })
    }

    /// Random world with an empty origin, one gold, one wumpus and a pit in
    /// every other cell with probability `pit_probability`.
    pub fn generate<R: Rng>(
        width: usize,
        height: usize,
        pit_probability: f64,
        rng: &mut R,
    ) -> anyhow::Result<Self> {
        if width * height < 3 {
            bail!("a {width}x{height} world cannot hold the origin, the gold and the wumpus");
        }
        if !(0.0..=1.0).contains(&pit_probability) {
            bail!("pit probability must be within [0, 1], got {pit_probability}");
        }

        let mut map = Map {
            height,
            width,
            grid: vec![vec![Cell::Empty; width]; height],
        };
        let mut free: Vec<Position> = map.positions().filter(|&pos| pos != ORIGIN).collect();
        for item in [Cell::Gold, Cell::Wumpus] {
            let pos = free.swap_remove(rng.gen_range(0..free.len()));
            map.set(pos, item);
        }
        for pos in free {
            if rng.gen_bool(pit_probability) {
                map.set(pos, Cell::Pit);
            }
        }
        Ok(map)
    }

    pub fn is_valid(&self, (x, y): Position) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Cell at `pos`, or `Wall` outside the world.
    pub fn get(&self, pos: Position) -> Cell {
        if !self.is_valid(pos) {
            return Cell::Wall;
        }
        let (x, y) = pos;
        self.grid[self.height - 1 - y as usize][x as usize]
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        debug_assert!(self.is_valid(pos), "{pos:?} is outside the world");
        if self.is_valid(pos) {
            let (x, y) = pos;
            self.grid[self.height - 1 - y as usize][x as usize] = cell;
        }
    }

    /// In-bounds neighbors in search direction order.
    pub fn get_neighbors(&self, pos: Position) -> Vec<Position> {
        DIRECTIONS
            .iter()
            .map(|direction| direction.apply(pos))
            .filter(|&neighbor| self.is_valid(neighbor))
            .collect()
    }

    /// True if some neighbor of `pos` holds `cell`.
    pub fn find(&self, pos: Position, cell: Cell) -> bool {
        DIRECTIONS
            .iter()
            .any(|direction| self.get(direction.apply(pos)) == cell)
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32).flat_map(move |y| (0..self.width as i32).map(move |x| (x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_read_map() {
        let map = Map::from_file("worlds/test/hunt-4x3.txt").unwrap();

        assert_eq!(map.height, 3);
        assert_eq!(map.width, 4);

        assert_eq!(map.get((0, 0)), Cell::Empty);
        assert_eq!(map.get((3, 2)), Cell::Gold);
        assert_eq!(map.get((2, 1)), Cell::Wumpus);
        assert_eq!(map.get((-1, 0)), Cell::Wall);
        assert_eq!(map.get((4, 0)), Cell::Wall);

        let neighbors = map.get_neighbors((0, 0));
        assert_eq!(neighbors, vec![(0, 1), (1, 0)]);
        assert!(map.find((1, 1), Cell::Wumpus));
        assert!(!map.find((0, 0), Cell::Wumpus));
    }

    #[test]
    fn test_parse_rejects_bad_worlds() {
        assert!(Map::parse("").is_err());
        assert!(Map::parse("EE\nE").is_err());
        assert!(Map::parse("EX\nEE").is_err());
        assert!(Map::from_file("worlds/test/missing.txt").is_err());
    }

    #[test]
    fn test_set_uses_bottom_left_origin() {
        let mut map = Map::parse("EE\nEE").unwrap();
        map.set((1, 1), Cell::Pit);
        assert_eq!(map.grid[0][1], Cell::Pit);
        assert_eq!(map.get((1, 1)), Cell::Pit);
    }

    #[test]
    fn test_generate() {
        let mut rng = StdRng::seed_from_u64(7);
        let map = Map::generate(5, 4, 0.2, &mut rng).unwrap();
        assert_eq!((map.width, map.height), (5, 4));
        assert_eq!(map.get(ORIGIN), Cell::Empty);

        let count = |cell: Cell| map.positions().filter(|&pos| map.get(pos) == cell).count();
        assert_eq!(count(Cell::Gold), 1);
        assert_eq!(count(Cell::Wumpus), 1);

        let again = Map::generate(5, 4, 0.2, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(map, again);

        assert!(Map::generate(1, 2, 0.2, &mut rng).is_err());
        assert!(Map::generate(3, 3, 1.5, &mut rng).is_err());
    }
}
