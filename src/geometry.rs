use rand::Rng;

use crate::config::ConfigError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Position { x: self.x + dx, y: self.y + dy }
    }
}

/// Upper bound on the number of grid cells a board may have.
pub const MAX_CELLS: i32 = 1 << 20;

/// The playing window and its grid. Every valid position is a multiple of
/// `cell_size` inside `[0, width) x [0, height)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Geometry {
    width: i32,
    height: i32,
    cell_size: i32,
}

impl Geometry {
    pub fn new(width: i32, height: i32, cell_size: i32) -> Result<Self, ConfigError> {
        for &(name, value) in &[("cell size", cell_size), ("width", width), ("height", height)] {
            if value <= 0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        for &(name, value) in &[("width", width), ("height", height)] {
            if value % cell_size != 0 {
                return Err(ConfigError::Misaligned { name, value, cell_size });
            }
        }

        let cells = (width / cell_size).checked_mul(height / cell_size);
        if cells.map_or(true, |cells| cells > MAX_CELLS) {
            return Err(ConfigError::TooLarge("board"));
        }

        Ok(Geometry { width, height, cell_size })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn columns(&self) -> i32 {
        self.width / self.cell_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.cell_size
    }

    /// The grid point closest to the middle of the window.
    pub fn center(&self) -> Position {
        Position::new(self.columns() / 2 * self.cell_size, self.rows() / 2 * self.cell_size)
    }

    /// Touching the far edge already counts as out of bounds.
    pub fn in_bounds(&self, p: Position) -> bool {
        0 <= p.x && p.x < self.width && 0 <= p.y && p.y < self.height
    }

    /// Picks each axis uniformly from the multiples of the cell size in
    /// `[0, extent]`, far edge included.
    pub fn random_grid_position<R: Rng>(&self, rng: &mut R) -> Position {
        Position::new(
            rng.gen_range(0..=self.columns()) * self.cell_size,
            rng.gen_range(0..=self.rows()) * self.cell_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn board() -> Geometry {
        Geometry::new(640, 640, 10).unwrap()
    }

    #[test]
    fn rejects_degenerate_boards() {
        assert_eq!(
            Geometry::new(640, 640, 0),
            Err(ConfigError::NonPositive { name: "cell size", value: 0 })
        );
        assert_eq!(
            Geometry::new(640, -10, 10),
            Err(ConfigError::NonPositive { name: "height", value: -10 })
        );
        assert_eq!(
            Geometry::new(640, 645, 10),
            Err(ConfigError::Misaligned { name: "height", value: 645, cell_size: 10 })
        );
        assert_eq!(Geometry::new(100_000, 100_000, 1), Err(ConfigError::TooLarge("board")));
        assert_eq!(Geometry::new(i32::MAX, i32::MAX, 1), Err(ConfigError::TooLarge("board")));
        assert!(Geometry::new(1024, 1024, 1).is_ok());
    }

    #[test]
    fn far_edges_are_out_of_bounds() {
        let board = board();
        assert!(board.in_bounds(Position::new(0, 0)));
        assert!(board.in_bounds(Position::new(630, 630)));
        assert!(!board.in_bounds(Position::new(640, 100)));
        assert!(!board.in_bounds(Position::new(100, 640)));
        assert!(!board.in_bounds(Position::new(-10, 100)));
        assert!(!board.in_bounds(Position::new(100, -10)));
        assert!(!board.in_bounds(Position::new(650, 0)));
    }

    #[test]
    fn center_is_grid_aligned() {
        assert_eq!(board().center(), Position::new(320, 320));
        assert_eq!(Geometry::new(90, 50, 10).unwrap().center(), Position::new(40, 20));
    }

    #[test]
    fn random_positions_are_on_the_grid() {
        let board = Geometry::new(40, 30, 10).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let mut saw_far_edge = false;
        for _ in 0..2000 {
            let p = board.random_grid_position(&mut rng);
            assert_eq!(p.x % 10, 0);
            assert_eq!(p.y % 10, 0);
            assert!((0..=40).contains(&p.x));
            assert!((0..=30).contains(&p.y));
            saw_far_edge |= p.x == 40 || p.y == 30;
        }
        assert!(saw_far_edge);
    }
}
