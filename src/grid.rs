//! The finished product of a render pass.

use crate::escape::EscapeResult;

/// A rows-by-columns block of escape results stored row-major.  Row 0
/// is the top of the viewport, column 0 its left edge.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleGrid {
    rows: usize,
    columns: usize,
    samples: Vec<EscapeResult>,
}

impl SampleGrid {
    /// Wraps an already assembled buffer.  The buffer length must be
    /// `rows * columns`.
    pub(crate) fn from_samples(rows: usize, columns: usize, samples: Vec<EscapeResult>) -> Self {
        debug_assert_eq!(samples.len(), rows * columns);
        SampleGrid {
            rows,
            columns,
            samples,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The total number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Describes whether the grid holds any samples at all.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The result at `(row, column)`, if it lies inside the grid.
    pub fn get(&self, row: usize, column: usize) -> Option<EscapeResult> {
        if row < self.rows && column < self.columns {
            Some(self.samples[row * self.columns + column])
        } else {
            None
        }
    }

    /// One row of results, left to right.
    pub fn row(&self, row: usize) -> &[EscapeResult] {
        &self.samples[row * self.columns..(row + 1) * self.columns]
    }

    /// All rows, top to bottom.
    pub fn iter_rows(&self) -> impl DoubleEndedIterator<Item = &[EscapeResult]> {
        self.samples.chunks(self.columns.max(1))
    }

    /// Every sample in row-major order.
    pub fn samples(&self) -> &[EscapeResult] {
        &self.samples
    }

    /// The membership mask the terminal draws: `true` for bounded
    /// points, row-major.
    pub fn membership(&self) -> Vec<bool> {
        self.samples.iter().map(|s| s.is_bounded()).collect()
    }

    /// One byte per sample, row-major, using the `as_byte` convention.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.samples.iter().map(|s| s.as_byte()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::EscapeResult::{Bounded, Diverged};

    fn sample() -> SampleGrid {
        SampleGrid::from_samples(
            2,
            3,
            vec![Bounded, Diverged(1), Diverged(2), Diverged(3), Bounded, Diverged(260)],
        )
    }

    #[test]
    fn indexes_row_major() {
        let g = sample();
        assert_eq!(g.get(0, 1), Some(Diverged(1)));
        assert_eq!(g.get(1, 0), Some(Diverged(3)));
        assert_eq!(g.get(2, 0), None);
        assert_eq!(g.get(0, 3), None);
        assert_eq!(g.row(1), &[Diverged(3), Bounded, Diverged(260)]);
        assert_eq!(g.iter_rows().count(), 2);
    }

    #[test]
    fn membership_marks_bounded_points() {
        assert_eq!(sample().membership(), vec![true, false, false, false, true, false]);
    }

    #[test]
    fn bytes_follow_the_escape_convention() {
        assert_eq!(sample().to_bytes(), vec![0, 1, 2, 3, 0, 4]);
    }
}
