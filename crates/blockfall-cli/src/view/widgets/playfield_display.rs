use std::iter;

use blockfall_engine::{Cell, ColorIndex, Piece, PieceCatalog, Playfield};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::{CellDisplay, cells_u16};

#[derive(Debug, Clone, Copy)]
enum Overlay {
    Ghost,
    Piece(ColorIndex),
}

/// The playfield with the falling piece and its landing preview on top.
#[derive(Debug)]
pub struct PlayfieldDisplay<'a> {
    playfield: &'a Playfield,
    catalog: &'a PieceCatalog,
    falling_piece: Option<&'a Piece>,
    ghost: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PlayfieldDisplay<'a> {
    pub fn new(playfield: &'a Playfield, catalog: &'a PieceCatalog) -> Self {
        Self {
            playfield,
            catalog,
            falling_piece: None,
            ghost: None,
            block: None,
        }
    }

    pub fn falling_piece(self, piece: &'a Piece) -> Self {
        Self {
            falling_piece: Some(piece),
            ..self
        }
    }

    pub fn ghost(self, piece: Piece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        cells_u16(self.playfield.width()) * CellDisplay::WIDTH
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        cells_u16(self.playfield.height()) * CellDisplay::HEIGHT
            + super::block_vertical_margin(self.block.as_ref())
    }

    fn overlays(&self) -> Vec<Option<Overlay>> {
        let width = self.playfield.width();
        let height = self.playfield.height();
        let mut overlays = vec![None; width * height];
        let mut paint = |piece: &Piece, overlay: Overlay| {
            for (row, col) in piece.occupied_positions() {
                if let (Ok(row), Ok(col)) = (usize::try_from(row), usize::try_from(col))
                    && row < height
                    && col < width
                {
                    overlays[row * width + col] = Some(overlay);
                }
            }
        };
        // The falling piece is painted last so it wins over its own ghost.
        if let Some(ghost) = &self.ghost {
            paint(ghost, Overlay::Ghost);
        }
        if let Some(piece) = self.falling_piece {
            paint(piece, Overlay::Piece(piece.color()));
        }
        overlays
    }
}

impl Widget for PlayfieldDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PlayfieldDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let background = self.catalog.background();
        let width = self.playfield.width();
        let overlays = self.overlays();

        let col_constraints = (0..width).map(|_| Constraint::Length(CellDisplay::WIDTH));
        let row_constraints =
            (0..self.playfield.height()).map(|_| Constraint::Length(CellDisplay::HEIGHT));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_rows = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (row_index, (grid_row, cells)) in
            iter::zip(grid_rows, self.playfield.rows()).enumerate()
        {
            for (col_index, (grid_cell, cell)) in iter::zip(grid_row, cells).enumerate() {
                let display = match overlays[row_index * width + col_index] {
                    Some(Overlay::Piece(color)) => CellDisplay::filled(self.catalog.color(color)),
                    Some(Overlay::Ghost) if cell.is_empty() => CellDisplay::ghost(background),
                    _ => match cell {
                        Cell::Empty => CellDisplay::empty(background, true),
                        Cell::Filled(color) => CellDisplay::filled(self.catalog.color(*color)),
                    },
                };
                display.render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Position, Rgb, Shape};
    use ratatui::style::Color;

    use super::*;

    #[test]
    fn test_renders_cells_piece_and_ghost() {
        let catalog = PieceCatalog::standard();
        let playfield = Playfield::from_values(&[[0u8, 0, 0], [0, 0, 0], [0, 0, 2]]).unwrap();
        let dot = Shape::from_rows(&[&[true]]).unwrap();
        let red = ColorIndex::new(1).unwrap();
        let piece = Piece::new(dot, red, Position::new(0, 0));
        let ghost = piece.simulate_drop_position(&playfield);

        let display = PlayfieldDisplay::new(&playfield, &catalog)
            .falling_piece(&piece)
            .ghost(ghost);
        assert_eq!((display.width(), display.height()), (6, 3));

        let area = Rect::new(0, 0, 6, 3);
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);

        let Rgb(r, g, b) = catalog.color(red);
        assert_eq!(buf[(0, 0)].bg, Color::Rgb(r, g, b));
        assert_eq!(buf[(0, 2)].symbol(), "[");
        assert_eq!(buf[(1, 2)].symbol(), "]");
        // One-character symbols are centered in the two-column cell.
        assert_eq!(buf[(2, 1)].symbol(), " ");
        assert_eq!(buf[(3, 1)].symbol(), ".");
        let Rgb(r, g, b) = catalog.color(ColorIndex::new(2).unwrap());
        assert_eq!(buf[(4, 2)].bg, Color::Rgb(r, g, b));
    }
}
