//! Grid geometry shared by the domain and table placers.

use std::collections::BTreeSet;

use crate::model::{Direction, GridPos};

/// A near-square grid with room for `count` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Shape {
    pub columns: usize,
    pub rows: usize,
}

impl Shape {
    pub fn for_count(count: usize) -> Self {
        if count == 0 {
            return Self {
                columns: 0,
                rows: 0,
            };
        }
        let mut columns = 1;
        while columns * columns < count {
            columns += 1;
        }
        Self {
            columns,
            rows: count.div_ceil(columns),
        }
    }

    pub fn centre(self) -> GridPos {
        GridPos::new(
            self.rows.saturating_sub(1) / 2,
            self.columns.saturating_sub(1) / 2,
        )
    }

    /// Cells in row-major order.
    pub fn cells(self) -> impl Iterator<Item = GridPos> {
        (0..self.rows).flat_map(move |row| (0..self.columns).map(move |col| GridPos::new(row, col)))
    }

    /// How far `cell` is from the border on the `facing` side.
    pub fn distance_to_edge(self, cell: GridPos, facing: Option<Direction>) -> usize {
        match facing {
            None => 0,
            Some(Direction::Left) => cell.col,
            Some(Direction::Right) => self.columns.saturating_sub(1 + cell.col),
            Some(Direction::Above) => cell.row,
            Some(Direction::Below) => self.rows.saturating_sub(1 + cell.row),
        }
    }
}

/// Tracks which cells of a [`Shape`] are taken.
#[derive(Debug)]
pub(crate) struct Occupancy {
    shape: Shape,
    taken: BTreeSet<GridPos>,
}

impl Occupancy {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            taken: BTreeSet::new(),
        }
    }

    /// The free cell with the smallest key; row-major order breaks ties.
    pub fn take_best<K: Ord>(&mut self, key: impl Fn(GridPos) -> K) -> Option<GridPos> {
        let cell = self
            .shape
            .cells()
            .filter(|c| !self.taken.contains(c))
            .min_by_key(|&c| (key(c), c))?;
        self.taken.insert(cell);
        Some(cell)
    }

    pub fn take(&mut self, cell: GridPos) -> bool {
        self.taken.insert(cell)
    }
}

/// Index of the largest score, lowest index on ties.
pub(crate) fn strongest(
    candidates: impl IntoIterator<Item = usize>,
    score: impl Fn(usize) -> usize,
) -> Option<usize> {
    candidates
        .into_iter()
        .min_by_key(|&i| (std::cmp::Reverse(score(i)), i))
}
