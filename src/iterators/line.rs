//! Integer line traversal between two grid cells.
//!
//! [`GridLineIterator`] walks the dominant axis one cell at a time and keeps an
//! integer error accumulator for the minor axis (Bresenham). Both endpoints are
//! included and every cell is produced exactly once.

use std::iter::FusedIterator;

use glam::{IVec2, UVec2};

use crate::Grid2d;

#[derive(Debug, Clone)]
pub struct GridLineIterator {
    cell: IVec2,
    /// Step applied on every iteration (dominant axis).
    step_major: IVec2,
    /// Step applied when the accumulator overflows (minor axis).
    step_minor: IVec2,
    num: i32,
    num_add: i32,
    den: i32,
    remaining: u32,
}

impl GridLineIterator {
    pub fn new(start: IVec2, end: IVec2) -> Self {
        let delta = end - start;
        let sign = delta.signum();
        let abs = delta.abs();

        let (step_major, step_minor, den, num_add) = if abs.x >= abs.y {
            (IVec2::new(sign.x, 0), IVec2::new(0, sign.y), abs.x, abs.y)
        } else {
            (IVec2::new(0, sign.y), IVec2::new(sign.x, 0), abs.y, abs.x)
        };

        // Positive and negative walks round half-way ties to opposite sides so
        // that a -> b and b -> a visit the same cells.
        let major_positive = step_major.x + step_major.y > 0;
        let num = if major_positive { den / 2 } else { (den - 1).max(0) / 2 };

        Self {
            cell: start,
            step_major,
            step_minor,
            num,
            num_add,
            den,
            remaining: den as u32 + 1,
        }
    }

    pub fn from_cells(start: UVec2, end: UVec2) -> Self {
        Self::new(start.as_ivec2(), end.as_ivec2())
    }
}

impl Iterator for GridLineIterator {
    type Item = IVec2;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let cell = self.cell;
        self.remaining -= 1;

        if self.remaining > 0 {
            self.num += self.num_add;
            if self.num >= self.den {
                self.num -= self.den;
                self.cell += self.step_minor;
            }
            self.cell += self.step_major;
        }

        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for GridLineIterator {}

impl FusedIterator for GridLineIterator {}

/// Cells of a grid line paired with the grid values under them.
///
/// Stops at the first cell outside the grid.
pub struct LineValueIterator<'a, T> {
    grid: &'a Grid2d<T>,
    iter: GridLineIterator,
}

impl<'a, T> LineValueIterator<'a, T> {
    pub fn new(grid: &'a Grid2d<T>, start: UVec2, end: UVec2) -> Self {
        Self {
            grid,
            iter: GridLineIterator::from_cells(start, end),
        }
    }
}

impl<'a, T> Iterator for LineValueIterator<'a, T> {
    type Item = (UVec2, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.iter.next()?;
        if cell.x < 0 || cell.y < 0 {
            return None;
        }
        let cell = cell.as_uvec2();
        self.grid.get(cell).map(|value| (cell, value))
    }
}

impl<T> Grid2d<T> {
    /// Iterate over grid values along the line between two cells, inclusive.
    pub fn line_value(&self, start: UVec2, end: UVec2) -> LineValueIterator<'_, T> {
        LineValueIterator::new(self, start, end)
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec2;
    use rstest::rstest;

    use super::*;
    use crate::types::MapInfo;

    fn cells(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<IVec2> {
        GridLineIterator::new(IVec2::new(x0, y0), IVec2::new(x1, y1)).collect()
    }

    #[test]
    fn single_cell() {
        assert_eq!(cells(3, 4, 3, 4), vec![IVec2::new(3, 4)]);
    }

    #[test]
    fn horizontal() {
        assert_eq!(
            cells(1, 2, 4, 2),
            vec![
                IVec2::new(1, 2),
                IVec2::new(2, 2),
                IVec2::new(3, 2),
                IVec2::new(4, 2)
            ]
        );
    }

    #[test]
    fn vertical_down() {
        assert_eq!(
            cells(0, 3, 0, 0),
            vec![
                IVec2::new(0, 3),
                IVec2::new(0, 2),
                IVec2::new(0, 1),
                IVec2::new(0, 0)
            ]
        );
    }

    #[test]
    fn diagonal() {
        assert_eq!(
            cells(0, 0, 3, -3),
            vec![
                IVec2::new(0, 0),
                IVec2::new(1, -1),
                IVec2::new(2, -2),
                IVec2::new(3, -3)
            ]
        );
    }

    #[test]
    fn shallow_slope_ties_match_reverse() {
        assert_eq!(
            cells(0, 0, 2, 1),
            vec![IVec2::new(0, 0), IVec2::new(1, 1), IVec2::new(2, 1)]
        );
        assert_eq!(
            cells(2, 1, 0, 0),
            vec![IVec2::new(2, 1), IVec2::new(1, 1), IVec2::new(0, 0)]
        );
    }

    #[rstest]
    #[case(0, 0, 7, 3)]
    #[case(0, 0, 3, 7)]
    #[case(5, 5, -4, 2)]
    #[case(2, 9, 2, -1)]
    #[case(-3, 1, 6, 1)]
    #[case(0, 0, 4, 4)]
    #[case(0, 0, -4, 4)]
    #[case(10, 3, 1, 8)]
    #[case(0, 0, 6, 3)]
    #[case(1, 1, 8, 4)]
    fn reverse_walk_visits_same_cells(
        #[case] x0: i32,
        #[case] y0: i32,
        #[case] x1: i32,
        #[case] y1: i32,
    ) {
        let forward = cells(x0, y0, x1, y1);
        let mut backward = cells(x1, y1, x0, y0);
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn reverse_symmetry_over_all_short_segments() {
        for x1 in -6..=6 {
            for y1 in -6..=6 {
                let forward = cells(0, 0, x1, y1);
                let mut backward = cells(x1, y1, 0, 0);
                backward.reverse();
                assert_eq!(forward, backward, "segment (0, 0) -> ({x1}, {y1})");
            }
        }
    }

    #[rstest]
    #[case(0, 0, 7, 3)]
    #[case(5, 5, -4, 2)]
    #[case(2, 9, 2, -1)]
    #[case(0, 0, 0, 0)]
    fn endpoints_once_and_steps_adjacent(
        #[case] x0: i32,
        #[case] y0: i32,
        #[case] x1: i32,
        #[case] y1: i32,
    ) {
        let line = cells(x0, y0, x1, y1);
        let start = IVec2::new(x0, y0);
        let end = IVec2::new(x1, y1);
        assert_eq!(line.first(), Some(&start));
        assert_eq!(line.last(), Some(&end));
        assert_eq!(line.iter().filter(|c| **c == start).count(), 1);
        assert_eq!(line.iter().filter(|c| **c == end).count(), 1);
        for pair in line.windows(2) {
            let d = (pair[1] - pair[0]).abs();
            assert!(d.x <= 1 && d.y <= 1 && d != IVec2::ZERO);
        }
    }

    #[test]
    fn exact_length() {
        let iter = GridLineIterator::new(IVec2::new(0, 0), IVec2::new(-5, 9));
        assert_eq!(iter.len(), 10);
        assert_eq!(iter.count(), 10);
    }

    #[test]
    fn value_iterator_reads_cells() {
        let info = MapInfo::square(5, 1.0);
        let grid = Grid2d::from_fn(info, |x, y| (x + 10 * y) as u8);
        let values: Vec<u8> = grid
            .line_value(UVec2::new(0, 0), UVec2::new(4, 2))
            .map(|(_, v)| *v)
            .collect();
        assert_eq!(values.len(), 5);
        assert_eq!(values.first(), Some(&0));
        assert_eq!(values.last(), Some(&24));
    }

    #[test]
    fn value_iterator_stops_outside_grid() {
        let info = MapInfo::square(3, 1.0);
        let grid = Grid2d::<u8>::empty(info);
        let count = grid.line_value(UVec2::new(0, 0), UVec2::new(6, 0)).count();
        assert_eq!(count, 3);
    }
}
