use crate::table::{Row, Table};
use std::num::NonZeroUsize;

/// A contiguous run of rows from one table, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chunk<'a> {
    pub index: usize,
    pub columns: &'a [String],
    pub rows: &'a [Row],
}

impl Chunk<'_> {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Lazy sequence of chunks over a table. Clone it to start over.
#[derive(Debug, Clone)]
pub struct ChunkIter<'a> {
    columns: &'a [String],
    inner: std::iter::Enumerate<std::slice::Chunks<'a, Row>>,
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, rows) = self.inner.next()?;
        Some(Chunk {
            index: idx + 1,
            columns: self.columns,
            rows,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ChunkIter<'_> {}

impl Table {
    pub fn chunks(&self, max_rows: NonZeroUsize) -> ChunkIter<'_> {
        ChunkIter {
            columns: self.columns(),
            inner: self.rows().chunks(max_rows.get()).enumerate(),
        }
    }
}
