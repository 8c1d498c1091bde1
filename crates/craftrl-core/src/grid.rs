//! Tile grid - fixed-size 2-D array of cells stored row-major.

use crate::components::{Point, Tile};

static BAD_TILE: Tile = Tile::BAD;

/// Width x height cells. Out-of-grid reads return the bad tile and
/// out-of-grid writes are ignored.
#[derive(Debug, Clone, Default)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// A grid with every cell set to terrain `fill`
    pub fn new(width: i32, height: i32, fill: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![Tile::new(fill); (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn valid(&self, p: &Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    fn index(&self, p: &Point) -> Option<usize> {
        if self.valid(p) {
            Some(p.x as usize + p.y as usize * self.width as usize)
        } else {
            None
        }
    }

    /// The cell at `p`, or the bad tile (terrain -1) when `p` is off-grid
    pub fn at(&self, p: &Point) -> &Tile {
        self.index(p)
            .and_then(|i| self.tiles.get(i))
            .unwrap_or(&BAD_TILE)
    }

    pub fn at_mut(&mut self, p: &Point) -> Option<&mut Tile> {
        let index = self.index(p)?;
        self.tiles.get_mut(index)
    }

    /// Row-major point for a cell index
    pub fn point_of(&self, index: usize) -> Point {
        if self.width == 0 {
            return Point::NOWHERE;
        }
        let width = self.width as usize;
        Point::new((index % width) as i32, (index / width) as i32)
    }

    /// Cells in row-major order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Every cell with its coordinate, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Point, &Tile)> {
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, tile)| (self.point_of(i), tile))
    }

    /// Every valid point in the square of side `2*radius+1` around `centre`,
    /// row-major
    pub fn square_around(&self, centre: Point, radius: i32) -> impl Iterator<Item = Point> + '_ {
        let radius = radius.max(0);
        ((centre.y - radius)..=(centre.y + radius))
            .flat_map(move |y| ((centre.x - radius)..=(centre.x + radius)).map(move |x| Point::new(x, y)))
            .filter(move |p| self.valid(p))
    }
}
