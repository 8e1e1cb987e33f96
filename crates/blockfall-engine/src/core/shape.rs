use std::fmt;

use arrayvec::ArrayVec;

/// Largest extent (in cells) a shape may have along either axis.
pub const MAX_SHAPE_EXTENT: usize = 4;

const MAX_SHAPE_CELLS: usize = MAX_SHAPE_EXTENT * MAX_SHAPE_EXTENT;

/// Rejected shape definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ShapeError {
    #[display("shape has no rows or no columns")]
    Empty,
    #[display("shape rows have different lengths")]
    Ragged,
    #[display("shape exceeds {MAX_SHAPE_EXTENT}x{MAX_SHAPE_EXTENT} cells")]
    TooLarge,
    #[display("shape has no occupied cell")]
    NoOccupiedCell,
}

/// Immutable rectangular occupancy matrix of a piece.
///
/// Cells are stored row-major. Rotation never mutates a shape; it builds a new one.
///
/// # Example
///
/// ```
/// use blockfall_engine::Shape;
///
/// let t = Shape::from_rows(&[&[true, true, true], &[false, true, false]]).unwrap();
/// let rotated = t.rotated_clockwise();
/// assert_eq!((rotated.width(), rotated.height()), (2, 3));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u8,
    height: u8,
    cells: ArrayVec<bool, MAX_SHAPE_CELLS>,
}

impl Shape {
    /// Builds a shape from rows of occupancy flags, top row first.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, ShapeError>
    where
        R: AsRef<[bool]>,
    {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        if height == 0 || width == 0 {
            return Err(ShapeError::Empty);
        }
        if rows.iter().any(|row| row.as_ref().len() != width) {
            return Err(ShapeError::Ragged);
        }
        if height > MAX_SHAPE_EXTENT || width > MAX_SHAPE_EXTENT {
            return Err(ShapeError::TooLarge);
        }

        let cells: ArrayVec<bool, MAX_SHAPE_CELLS> = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();
        if !cells.iter().any(|&cell| cell) {
            return Err(ShapeError::NoOccupiedCell);
        }

        Ok(Self {
            width: u8::try_from(width).map_err(|_| ShapeError::TooLarge)?,
            height: u8::try_from(height).map_err(|_| ShapeError::TooLarge)?,
            cells,
        })
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        usize::from(self.width)
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(self.height)
    }

    /// Returns whether the cell at `(row, col)` is occupied.
    ///
    /// Coordinates outside the shape are reported as unoccupied.
    #[must_use]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < self.height() && col < self.width() && self.cells[row * self.width() + col]
    }

    /// Iterates over `(row, col)` of every occupied cell, row by row.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width();
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, occupied)| **occupied)
            .map(move |(i, _)| (i / width, i % width))
    }

    /// Iterates over the rows of the shape.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.width())
    }

    /// Returns the shape turned 90° clockwise.
    ///
    /// The result has `height` columns and `width` rows. Destination row `r`
    /// holds input column `width - 1 - r`, read from the top row down.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let (width, height) = (self.width(), self.height());
        let cells = (0..width)
            .rev()
            .flat_map(|col| (0..height).map(move |row| (row, col)))
            .map(|(row, col)| self.cells[row * width + col])
            .collect();
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self
            .rows()
            .map(|row| {
                row.iter()
                    .map(|&cell| if cell { '#' } else { '.' })
                    .collect::<String>()
            })
            .collect::<Vec<_>>();
        f.debug_tuple("Shape").field(&rows.join("/")).finish()
    }
}
