use crate::core::{
    catalog::ColorIndex,
    playfield::{Playfield, Position},
    shape::Shape,
};

/// A piece with its shape, identity and position on the playfield.
///
/// The catalog index travels with the shape from the moment the piece is
/// drawn, so rotated variants keep their color without any lookup.
/// Movement and rotation return new pieces; validity is checked by the
/// caller against the playfield.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ColorIndex, Piece, Position, Shape};
///
/// let o = Shape::from_rows(&[&[true, true], &[true, true]]).unwrap();
/// let piece = Piece::spawned(o, ColorIndex::new(2).unwrap(), 10);
/// assert_eq!(piece.position(), Position::new(0, 4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    shape: Shape,
    color: ColorIndex,
    position: Position,
}

impl Piece {
    #[must_use]
    pub fn new(shape: Shape, color: ColorIndex, position: Position) -> Self {
        Self {
            shape,
            color,
            position,
        }
    }

    /// Places `shape` at the spawn position of a field `field_width` columns wide:
    /// row 0, horizontally centered (`width / 2 - shape_width / 2`).
    #[must_use]
    pub fn spawned(shape: Shape, color: ColorIndex, field_width: usize) -> Self {
        let half_field = i32::try_from(field_width / 2).unwrap_or(i32::MAX);
        let half_shape = i32::try_from(shape.width() / 2).unwrap_or(0);
        let col = half_field - half_shape;
        Self::new(shape, color, Position::new(0, col))
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn color(&self) -> ColorIndex {
        self.color
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Absolute `(row, col)` of every occupied cell.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape.occupied_cells().filter_map(|(y, x)| {
            let y = i32::try_from(y).ok()?;
            let x = i32::try_from(x).ok()?;
            Some((self.position.row + y, self.position.col + x))
        })
    }

    #[must_use]
    pub fn moved_to(&self, position: Position) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.moved_to(self.position.left())
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.moved_to(self.position.right())
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.moved_to(self.position.down())
    }

    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        Self {
            shape: self.shape.rotated_clockwise(),
            ..self.clone()
        }
    }

    /// Rotates the piece, applying the minimal wall kick.
    ///
    /// Tries the rotated shape in place, then one column right, then one
    /// column left. Returns `None` if all three collide.
    #[must_use]
    pub fn kicked_rotation(&self, field: &Playfield) -> Option<Self> {
        let rotated = self.rotated_clockwise();
        [rotated.clone(), rotated.right(), rotated.left()]
            .into_iter()
            .find(|piece| !piece.is_colliding(field))
    }

    /// Returns the lowest position reachable by moving straight down.
    #[must_use]
    pub fn simulate_drop_position(&self, field: &Playfield) -> Self {
        let mut dropped = self.clone();
        loop {
            let next = dropped.down();
            if next.is_colliding(field) {
                return dropped;
            }
            dropped = next;
        }
    }

    #[must_use]
    pub fn is_colliding(&self, field: &Playfield) -> bool {
        field.is_colliding(&self.shape, self.position)
    }
}
