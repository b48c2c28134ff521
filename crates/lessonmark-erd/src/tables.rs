//! Places the tables of one domain on its local grid.
//!
//! The hub (most internal links) takes the centre and its neighbours gather
//! around it. A table whose links leave the domain is pulled toward the
//! border facing the domain it links to.

use crate::grid::{Occupancy, Shape, strongest};
use crate::model::{Direction, GridPos};

/// Most frequent direction, earliest in [`Direction::ALL`] on ties.
pub(crate) fn dominant(directions: impl IntoIterator<Item = Direction>) -> Option<Direction> {
    let mut counts = [0usize; 4];
    for dir in directions {
        if let Some(ix) = Direction::ALL.iter().position(|d| *d == dir) {
            counts[ix] += 1;
        }
    }
    strongest(0..4, |ix| counts[ix])
        .filter(|&ix| counts[ix] > 0)
        .map(|ix| Direction::ALL[ix])
}

/// One cell per table, indexed like `internal` and `facing`.
pub(crate) fn place_tables(
    internal: &[Vec<usize>],
    facing: &[Option<Direction>],
) -> (Shape, Vec<GridPos>) {
    let k = internal.len();
    let shape = Shape::for_count(k);
    let mut grid = Occupancy::new(shape);
    let mut cells: Vec<Option<GridPos>> = vec![None; k];
    let degree: Vec<usize> = internal.iter().map(|row| row.iter().sum()).collect();

    if let Some(hub) = strongest((0..k).filter(|&i| degree[i] > 0), |i| degree[i]) {
        grid.take(shape.centre());
        cells[hub] = Some(shape.centre());
    }

    while let Some(next) = strongest(
        (0..k).filter(|&i| degree[i] > 0 && cells[i].is_none()),
        |i| neighbours(i, &cells, internal).map(|(w, _)| w).sum(),
    ) {
        let cell = grid.take_best(|c| {
            let pull: usize = neighbours(next, &cells, internal)
                .map(|(w, placed)| w * c.manhattan(placed))
                .sum();
            (pull, shape.distance_to_edge(c, facing[next]))
        });
        match cell {
            Some(cell) => cells[next] = Some(cell),
            None => break,
        }
    }

    for i in 0..k {
        if cells[i].is_none() && facing[i].is_some() {
            cells[i] = grid.take_best(|c| shape.distance_to_edge(c, facing[i]));
        }
    }
    for cell in cells.iter_mut().filter(|c| c.is_none()) {
        *cell = grid.take_best(|_| 0);
    }

    (shape, cells.into_iter().flatten().collect())
}

fn neighbours<'a>(
    i: usize,
    cells: &'a [Option<GridPos>],
    internal: &'a [Vec<usize>],
) -> impl Iterator<Item = (usize, GridPos)> + 'a {
    cells
        .iter()
        .enumerate()
        .filter_map(move |(j, cell)| cell.map(|c| (internal[i][j], c)))
        .filter(|(w, _)| *w > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn star(k: usize, hub: usize) -> Vec<Vec<usize>> {
        let mut weights = vec![vec![0; k]; k];
        for other in (0..k).filter(|&o| o != hub) {
            weights[hub][other] = 1;
            weights[other][hub] = 1;
        }
        weights
    }

    #[test]
    fn dominant_direction_counts_and_breaks_ties() {
        use Direction::*;
        assert_eq!(dominant([Above, Right, Right]), Some(Right));
        assert_eq!(dominant([Below, Left]), Some(Left));
        assert_eq!(dominant([]), None);
    }

    #[test]
    fn hub_is_centred_among_dependents() {
        let (shape, cells) = place_tables(&star(5, 3), &[None; 5]);

        assert_eq!(cells[3], shape.centre());
        assert_eq!(cells[3], GridPos::new(0, 1));
        for dependent in [0, 1, 2] {
            assert_eq!(cells[dependent].manhattan(cells[3]), 1);
        }
    }

    #[test]
    fn dependent_with_external_link_leans_toward_it() {
        let mut facing = [None; 5];
        facing[1] = Some(Direction::Right);

        let (_, cells) = place_tables(&star(5, 0), &facing);

        assert_eq!(cells[0], GridPos::new(0, 1));
        assert_eq!(cells[1], GridPos::new(0, 2));
    }

    #[test]
    fn externally_linked_table_takes_the_facing_edge() {
        let mut weights = vec![vec![0; 4]; 4];
        weights[0][1] = 1;
        weights[1][0] = 1;
        let facing = [None, None, Some(Direction::Below), None];

        let (_, cells) = place_tables(&weights, &facing);

        assert_eq!(cells[0], GridPos::new(0, 0));
        assert_eq!(cells[1], GridPos::new(0, 1));
        assert_eq!(cells[2], GridPos::new(1, 0));
        assert_eq!(cells[3], GridPos::new(1, 1));
    }

    #[test]
    fn isolated_tables_fill_row_major() {
        let (_, cells) = place_tables(&vec![vec![0; 3]; 3], &[None; 3]);

        assert_eq!(
            cells,
            vec![GridPos::new(0, 0), GridPos::new(0, 1), GridPos::new(1, 0)]
        );
    }

    #[test]
    fn cycles_terminate_with_distinct_cells() {
        let mut weights = vec![vec![0; 4]; 4];
        for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
            weights[a][b] += 1;
            weights[b][a] += 1;
        }

        let (_, mut cells) = place_tables(&weights, &[None; 4]);

        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 4);
    }
}
