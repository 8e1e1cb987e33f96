use blockfall_engine::{Piece, PieceCatalog};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::{CellDisplay, cells_u16};

/// Preview of a single piece in its spawn orientation, centered in a box
/// large enough for every template of the catalog.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    catalog: &'a PieceCatalog,
    piece: Option<&'a Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new(catalog: &'a PieceCatalog) -> Self {
        Self {
            catalog,
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: &'a Piece) -> Self {
        Self {
            piece: Some(piece),
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
        let cols = self.catalog.templates().map(|(_, shape)| shape.width()).max();
        cells_u16(cols.unwrap_or(0)) * CellDisplay::WIDTH
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        let rows = self.catalog.templates().map(|(_, shape)| shape.height()).max();
        cells_u16(rows.unwrap_or(0)) * CellDisplay::HEIGHT
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let empty = CellDisplay::empty(self.catalog.background(), false);
        empty.render(area, buf);

        let Some(piece) = self.piece else {
            return;
        };
        let shape = piece.shape();
        let (cols, rows) = (cells_u16(shape.width()), cells_u16(shape.height()));
        let piece_area = area.centered(
            Constraint::Length(cols * CellDisplay::WIDTH),
            Constraint::Length(rows * CellDisplay::HEIGHT),
        );

        let horizontal = Layout::horizontal((0..cols).map(|_| Constraint::Length(CellDisplay::WIDTH)))
            .flex(Flex::Center);
        let vertical = Layout::vertical((0..rows).map(|_| Constraint::Length(CellDisplay::HEIGHT)));
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let occupied = CellDisplay::filled(self.catalog.color(piece.color()));
        for (y, grid_row) in grid_rows.enumerate() {
            for (x, grid_cell) in grid_row.into_iter().enumerate() {
                if shape.is_occupied(y, x) {
                    Widget::render(&occupied, grid_cell, buf);
                }
            }
        }
    }
}
