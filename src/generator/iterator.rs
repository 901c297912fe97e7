//! Lazy, bounded position iteration shared by every generator.
//!
//! Each generator variant supplies a [`PositionCursor`] holding only its transient
//! cursor state. [`Positions`] wraps a cursor and enforces the declared size: it never
//! hands out more than `size` positions, and reports a cursor that tries to as a
//! [`GeneratorError::Bounds`].

use std::iter::FusedIterator;

use tracing::{error, warn};

use crate::error::{GeneratorError, PointsResult};
use crate::position::Position;

/// Forward-only source of positions.
pub trait PositionCursor {
    /// Produce the next position, or `None` once the sequence is exhausted.
    fn next_position(&mut self) -> Option<Position>;
}

/// Iterator over the positions of one generator.
///
/// Created by [`PointGenerator::iter`](super::PointGenerator::iter). Independent
/// iterators over the same generator do not interfere.
pub struct Positions<'a> {
    cursor: Box<dyn PositionCursor + 'a>,
    size: usize,
    yielded: usize,
    peeked: Option<Position>,
    finished: bool,
}

impl<'a> Positions<'a> {
    pub(crate) fn new(cursor: Box<dyn PositionCursor + 'a>, size: usize) -> Self {
        Self {
            cursor,
            size,
            yielded: 0,
            peeked: None,
            finished: false,
        }
    }

    /// Declared number of positions.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of positions handed out so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// True if another position is available.
    pub fn has_next(&mut self) -> bool {
        if self.peeked.is_some() {
            return true;
        }
        if self.finished || self.yielded >= self.size {
            return false;
        }
        match self.cursor.next_position() {
            Some(position) => {
                self.peeked = Some(position);
                true
            }
            None => {
                self.finish_short();
                false
            }
        }
    }

    /// Advance, failing if the cursor overruns the declared size.
    pub fn try_next(&mut self) -> PointsResult<Option<Position>> {
        if let Some(position) = self.peeked.take() {
            self.yielded += 1;
            return Ok(Some(position));
        }
        if self.finished {
            return Ok(None);
        }
        match self.cursor.next_position() {
            None => {
                self.finish_short();
                Ok(None)
            }
            Some(_) if self.yielded >= self.size => {
                self.finished = true;
                Err(GeneratorError::Bounds { size: self.size })
            }
            Some(position) => {
                self.yielded += 1;
                Ok(Some(position))
            }
        }
    }

    /// Drain the remaining positions, failing unless exactly `size` are produced.
    pub(crate) fn collect_checked(mut self) -> PointsResult<Vec<Position>> {
        let mut points = Vec::with_capacity(self.size.saturating_sub(self.yielded));
        while let Some(position) = self.try_next()? {
            points.push(position);
        }
        if self.yielded != self.size {
            return Err(GeneratorError::Incomplete {
                yielded: self.yielded,
                size: self.size,
            });
        }
        Ok(points)
    }

    fn finish_short(&mut self) {
        self.finished = true;
        if self.yielded < self.size {
            warn!(
                yielded = self.yielded,
                size = self.size,
                "Position cursor ended before the declared size"
            );
        }
    }
}

impl Iterator for Positions<'_> {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        match self.try_next() {
            Ok(position) => position,
            Err(e) => {
                error!(error = %e, "Position iteration aborted");
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.size.saturating_sub(self.yielded);
        (0, Some(remaining))
    }
}

impl FusedIterator for Positions<'_> {}
