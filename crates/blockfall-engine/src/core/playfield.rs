use std::fmt::{self, Write as _};

use super::{catalog::ColorIndex, shape::Shape};

/// A single playfield cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Cell {
    /// Nothing locked here.
    #[default]
    Empty,
    /// Locked block of the piece type with the given catalog index.
    Filled(ColorIndex),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Integer tag of the cell: `0` when empty, the color index otherwise.
    #[must_use]
    pub fn value(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Filled(index) => index.get(),
        }
    }

    /// Inverse of [`Cell::value`].
    #[must_use]
    pub fn from_value(value: u8) -> Self {
        ColorIndex::new(value).map_or(Cell::Empty, Cell::Filled)
    }
}

/// Grid position of a shape's top-left corner.
///
/// Row 0 is the top of the playfield; rows grow downward. Coordinates are
/// signed so that candidates left of or above the field can be expressed and
/// rejected by collision checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub const fn left(self) -> Self {
        Self::new(self.row, self.col - 1)
    }

    #[must_use]
    pub const fn right(self) -> Self {
        Self::new(self.row, self.col + 1)
    }

    #[must_use]
    pub const fn down(self) -> Self {
        Self::new(self.row + 1, self.col)
    }

    /// Absolute coordinates of the shape cell at `(row, col)` offset from `self`.
    fn offset(self, (row, col): (usize, usize)) -> Option<(i32, i32)> {
        let row = i32::try_from(row).ok()?;
        let col = i32::try_from(col).ok()?;
        Some((self.row + row, self.col + col))
    }
}

/// The grid of locked cells.
///
/// The grid is owned exclusively by the playfield; callers only get
/// read-only views through [`Playfield::rows`] and [`Playfield::cell`].
///
/// # Example
///
/// ```
/// use blockfall_engine::{ColorIndex, Playfield, Position, Shape};
///
/// let mut field = Playfield::new(4, 3);
/// let bar = Shape::from_rows(&[&[true, true, true, true]]).unwrap();
/// let color = ColorIndex::new(1).unwrap();
///
/// assert!(!field.is_colliding(&bar, Position::new(2, 0)));
/// field.fill_shape(&bar, Position::new(2, 0), color);
/// assert_eq!(field.clear_lines(), 1);
/// assert!(field.rows().flatten().all(|cell| cell.is_empty()));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Playfield {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Playfield {
    /// Creates an empty playfield of `width` columns by `height` rows.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0, "playfield must have at least one column");
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Builds a playfield from rows of cell values (`0` = empty), top row first.
    ///
    /// Returns `None` when the rows are empty or of different lengths.
    #[must_use]
    pub fn from_values<R>(rows: &[R]) -> Option<Self>
    where
        R: AsRef<[u8]>,
    {
        let width = rows.first()?.as_ref().len();
        if width == 0 || rows.iter().any(|row| row.as_ref().len() != width) {
            return None;
        }
        let cells = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().copied().map(Cell::from_value))
            .collect();
        Some(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the cell at `(row, col)`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.height && col < self.width {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    /// Iterates over the rows, top first.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[Cell]> + ExactSizeIterator {
        self.cells.chunks_exact(self.width)
    }

    fn index_of(&self, (row, col): (i32, i32)) -> Option<usize> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        (row < self.height && col < self.width).then_some(row * self.width + col)
    }

    /// Returns `true` if any occupied cell of `shape` placed at `position`
    /// lies outside the grid or on a non-empty cell.
    ///
    /// This is the single validity check used for movement, rotation,
    /// spawning and dropping.
    #[must_use]
    pub fn is_colliding(&self, shape: &Shape, position: Position) -> bool {
        shape.occupied_cells().any(|offset| {
            position
                .offset(offset)
                .and_then(|coords| self.index_of(coords))
                .is_none_or(|i| !self.cells[i].is_empty())
        })
    }

    /// Writes `color` into every cell covered by `shape` at `position`.
    ///
    /// Cells falling outside the grid are skipped; callers check
    /// [`Self::is_colliding`] beforehand.
    pub fn fill_shape(&mut self, shape: &Shape, position: Position, color: ColorIndex) {
        for offset in shape.occupied_cells() {
            if let Some(i) = position
                .offset(offset)
                .and_then(|coords| self.index_of(coords))
            {
                self.cells[i] = Cell::Filled(color);
            }
        }
    }

    /// Removes every full row and compacts the remaining rows toward the bottom.
    ///
    /// A fresh grid is built bottom-up from the non-full rows (keeping their
    /// relative order) and then replaces the current one; the gap left at the
    /// top is empty. Returns the number of rows removed.
    pub fn clear_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut new_cells = vec![Cell::Empty; self.cells.len()];
        let mut target = new_cells.chunks_exact_mut(self.width).rev();
        for row in self.rows().rev() {
            if row.iter().all(|cell| !cell.is_empty()) {
                cleared += 1;
                continue;
            }
            if let Some(dest) = target.next() {
                dest.copy_from_slice(row);
            }
        }
        self.cells = new_cells;
        cleared
    }
}

impl fmt::Debug for Playfield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Playfield {}x{}", self.width, self.height)?;
        for row in self.rows() {
            for cell in row {
                match cell {
                    Cell::Empty => f.write_char('.')?,
                    Cell::Filled(index) => write!(f, "{}", index.get() % 10)?,
                }
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}
