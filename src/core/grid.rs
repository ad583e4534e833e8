//! Generic grid for map layers

use serde::{Deserialize, Serialize};

use crate::core::types::Size;

/// Integer cell coordinate (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Rectangular region anchored at its top-left cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub origin: Coord,
    pub size: Size,
}

impl Footprint {
    pub fn new(origin: Coord, size: Size) -> Self {
        Self { origin, size }
    }

    /// Exclusive right edge
    pub fn right(&self) -> usize {
        self.origin.x + self.size.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> usize {
        self.origin.y + self.size.height
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.x >= self.origin.x
            && coord.x < self.right()
            && coord.y >= self.origin.y
            && coord.y < self.bottom()
    }

    pub fn overlaps(&self, other: &Footprint) -> bool {
        self.origin.x < other.right()
            && other.origin.x < self.right()
            && self.origin.y < other.bottom()
            && other.origin.y < self.bottom()
    }

    pub fn center(&self) -> Coord {
        Coord::new(
            self.origin.x + self.size.width / 2,
            self.origin.y + self.size.height / 2,
        )
    }

    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (self.origin.y..self.bottom())
            .flat_map(move |y| (self.origin.x..self.right()).map(move |x| Coord::new(x, y)))
    }
}

/// Generic 2D grid stored row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T: Clone> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    #[inline]
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// True if the whole footprint lies on the grid
    pub fn fits(&self, footprint: &Footprint) -> bool {
        footprint.right() <= self.width && footprint.bottom() <= self.height
    }

    #[inline]
    pub fn get(&self, coord: Coord) -> Option<&T> {
        if self.in_bounds(coord) {
            Some(&self.data[coord.y * self.width + coord.x])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut T> {
        if self.in_bounds(coord) {
            Some(&mut self.data[coord.y * self.width + coord.x])
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, coord: Coord, value: T) {
        if self.in_bounds(coord) {
            self.data[coord.y * self.width + coord.x] = value;
        }
    }

    /// Iterate over every cell with its coordinate
    pub fn cells(&self) -> impl Iterator<Item = (Coord, &T)> {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (Coord::new(i % width, i / width), v))
    }

    pub fn map<U: Clone>(&self, f: impl Fn(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Render the grid row by row
    pub fn render_rows(&self, glyph: impl Fn(&T) -> char) -> Vec<String> {
        self.data
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(&glyph).collect())
            .collect()
    }
}

impl Grid<char> {
    pub fn rows(&self) -> Vec<String> {
        self.render_rows(|c| *c)
    }
}
