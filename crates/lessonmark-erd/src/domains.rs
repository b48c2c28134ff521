//! Places domains on the outer grid so heavily linked domains sit close.

use crate::grid::{Occupancy, Shape, strongest};
use crate::model::GridPos;

/// One cell per domain, indexed like `weights`.
pub(crate) fn place_domains(weights: &[Vec<usize>]) -> (Shape, Vec<GridPos>) {
    let n = weights.len();
    let shape = Shape::for_count(n);
    let mut grid = Occupancy::new(shape);
    let mut cells: Vec<Option<GridPos>> = vec![None; n];

    let Some(first) = strongest(0..n, |i| weights[i].iter().sum()) else {
        return (shape, Vec::new());
    };
    grid.take(shape.centre());
    cells[first] = Some(shape.centre());

    while let Some(next) = strongest((0..n).filter(|&i| cells[i].is_none()), |i| {
        linked(i, &cells, weights).map(|(w, _)| w).sum()
    }) {
        let cell = grid.take_best(|c| {
            linked(next, &cells, weights)
                .map(|(w, placed)| w * c.manhattan(placed))
                .sum::<usize>()
        });
        match cell {
            Some(cell) => cells[next] = Some(cell),
            None => break,
        }
    }

    (shape, cells.into_iter().flatten().collect())
}

/// Weights from `i` to every already placed domain, with that domain's cell.
fn linked<'a>(
    i: usize,
    cells: &'a [Option<GridPos>],
    weights: &'a [Vec<usize>],
) -> impl Iterator<Item = (usize, GridPos)> + 'a {
    cells
        .iter()
        .enumerate()
        .filter_map(move |(j, cell)| cell.map(|c| (weights[i][j], c)))
        .filter(|(w, _)| *w > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_domain_sits_at_origin() {
        let (shape, cells) = place_domains(&[vec![0]]);

        assert_eq!((shape.columns, shape.rows), (1, 1));
        assert_eq!(cells, vec![GridPos::new(0, 0)]);
    }

    #[test]
    fn busiest_domain_takes_the_centre() {
        // 4 links to 0..=3; 5..=8 are unconnected.
        let mut weights = vec![vec![0; 9]; 9];
        for other in 0..4 {
            weights[4][other] = 1;
            weights[other][4] = 1;
        }

        let (shape, cells) = place_domains(&weights);

        assert_eq!(cells[4], shape.centre());
        for other in 0..4 {
            assert_eq!(cells[other].manhattan(cells[4]), 1, "domain {other}");
        }
        assert_eq!(cells[5], GridPos::new(0, 0));
    }

    #[test]
    fn strongest_partner_is_placed_adjacent() {
        let weights = vec![
            vec![0, 1, 5, 0],
            vec![1, 0, 0, 0],
            vec![5, 0, 0, 0],
            vec![0, 0, 0, 0],
        ];

        let (_, cells) = place_domains(&weights);

        assert_eq!(cells[0], GridPos::new(0, 0));
        assert_eq!(cells[2], GridPos::new(0, 1));
        assert_eq!(cells[1], GridPos::new(1, 0));
        assert_eq!(cells[3], GridPos::new(1, 1));
    }

    #[test]
    fn unconnected_domains_keep_declaration_order() {
        let (_, cells) = place_domains(&vec![vec![0; 3]; 3]);

        assert_eq!(
            cells,
            vec![GridPos::new(0, 0), GridPos::new(0, 1), GridPos::new(1, 0)]
        );
    }
}
