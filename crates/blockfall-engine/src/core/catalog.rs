use std::num::NonZeroU8;

use rand::Rng;

use super::shape::Shape;

/// An RGB color from the catalog's color table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// 1-based catalog index of a piece type.
///
/// Used both as the value written into locked playfield cells and as the
/// index into the color table (entry 0 of which is the background).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColorIndex(NonZeroU8);

impl ColorIndex {
    /// Returns the index for the 1-based value `value`, or `None` for zero.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        match NonZeroU8::new(value) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    fn as_usize(self) -> usize {
        usize::from(self.0.get())
    }
}

/// Invalid catalog definition, detected once when the catalog is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CatalogError {
    #[display("catalog has no piece templates")]
    Empty,
    #[display("catalog has more than {} piece templates", u8::MAX)]
    TooManyTemplates,
    #[display("color table has {colors} entries, {required} required")]
    ColorTableTooShort { colors: usize, required: usize },
}

/// Immutable, ordered set of piece templates plus their color table.
///
/// Template `i` (0-based) is identified by [`ColorIndex`] `i + 1`, and is
/// drawn with `colors[i + 1]`. `colors[0]` is the background.
///
/// # Example
///
/// ```
/// use blockfall_engine::PieceCatalog;
///
/// let catalog = PieceCatalog::standard();
/// assert_eq!(catalog.len(), 7);
///
/// let mut rng = rand::rng();
/// let (shape, index) = catalog.choose_random(&mut rng);
/// assert_eq!(catalog.template(index), Some(shape));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceCatalog {
    templates: Vec<(ColorIndex, Shape)>,
    colors: Vec<Rgb>,
}

impl PieceCatalog {
    /// Builds a catalog, checking that the color table covers every template.
    pub fn new(templates: Vec<Shape>, colors: Vec<Rgb>) -> Result<Self, CatalogError> {
        if templates.is_empty() {
            return Err(CatalogError::Empty);
        }
        if templates.len() > usize::from(u8::MAX) {
            return Err(CatalogError::TooManyTemplates);
        }
        let required = templates.len() + 1;
        if colors.len() < required {
            return Err(CatalogError::ColorTableTooShort {
                colors: colors.len(),
                required,
            });
        }
        Ok(Self {
            templates: indexed(templates),
            colors,
        })
    }

    /// The seven classic pieces, in the order I, O, S, Z, T, L, J.
    #[must_use]
    pub fn standard() -> Self {
        const C: bool = true;
        const E: bool = false;
        let rows: [&[&[bool]]; 7] = [
            &[&[C, C, C, C]],
            &[&[C, C], &[C, C]],
            &[&[C, C, E], &[E, C, C]],
            &[&[E, C, C], &[C, C, E]],
            &[&[C, C, C], &[E, C, E]],
            &[&[C, C, C], &[C, E, E]],
            &[&[C, C, C], &[E, E, C]],
        ];
        let templates = rows
            .into_iter()
            .filter_map(|rows| Shape::from_rows(rows).ok())
            .collect();
        let colors = vec![
            Rgb(0, 0, 0),
            Rgb(255, 0, 0),
            Rgb(0, 255, 0),
            Rgb(0, 0, 255),
            Rgb(255, 255, 0),
            Rgb(255, 0, 255),
            Rgb(0, 255, 255),
            Rgb(255, 165, 0),
        ];
        Self {
            templates: indexed(templates),
            colors,
        }
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Always `false`; an empty catalog cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Iterates over all templates with their indices.
    pub fn templates(&self) -> impl Iterator<Item = (ColorIndex, &Shape)> {
        self.templates.iter().map(|(index, shape)| (*index, shape))
    }

    /// Returns the template identified by `index`.
    #[must_use]
    pub fn template(&self, index: ColorIndex) -> Option<&Shape> {
        self.templates
            .get(index.as_usize() - 1)
            .map(|(_, shape)| shape)
    }

    /// Picks a template uniformly at random.
    pub fn choose_random<R>(&self, rng: &mut R) -> (&Shape, ColorIndex)
    where
        R: Rng + ?Sized,
    {
        let i = rng.random_range(0..self.templates.len());
        let (index, shape) = &self.templates[i];
        (shape, *index)
    }

    /// The background color (color table entry 0).
    #[must_use]
    pub fn background(&self) -> Rgb {
        self.colors[0]
    }

    /// Returns the color for `index`.
    ///
    /// An index past the end of the color table can only come from a cell
    /// written by a different catalog; it is drawn with the background color.
    #[must_use]
    pub fn color(&self, index: ColorIndex) -> Rgb {
        if let Some(color) = self.colors.get(index.as_usize()) {
            *color
        } else {
            tracing::warn!(index = index.get(), "color index out of range, using background");
            self.background()
        }
    }
}

/// Pairs each template with its 1-based index. At most `u8::MAX` templates are kept.
fn indexed(templates: Vec<Shape>) -> Vec<(ColorIndex, Shape)> {
    (1..=u8::MAX)
        .filter_map(ColorIndex::new)
        .zip(templates)
        .collect()
}

impl Default for PieceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn single_cell() -> Shape {
        Shape::from_rows(&[&[true]]).unwrap()
    }

    #[test]
    fn test_standard_catalog() {
        let catalog = PieceCatalog::standard();
        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog.colors.len(), 8);
        for (index, shape) in catalog.templates() {
            assert_eq!(shape.occupied_cells().count(), 4, "{index:?} is not a tetromino");
        }
        let o = catalog.template(ColorIndex::new(2).unwrap()).unwrap();
        assert_eq!((o.width(), o.height()), (2, 2));
    }

    #[test]
    fn test_new_rejects_empty_catalog() {
        assert_eq!(
            PieceCatalog::new(vec![], vec![Rgb(0, 0, 0)]),
            Err(CatalogError::Empty)
        );
    }

    #[test]
    fn test_new_rejects_short_color_table() {
        let result = PieceCatalog::new(vec![single_cell(), single_cell()], vec![Rgb(0, 0, 0); 2]);
        assert_eq!(
            result,
            Err(CatalogError::ColorTableTooShort {
                colors: 2,
                required: 3
            })
        );
    }

    #[test]
    fn test_color_lookup_and_fallback() {
        let catalog =
            PieceCatalog::new(vec![single_cell()], vec![Rgb(1, 2, 3), Rgb(9, 9, 9)]).unwrap();
        assert_eq!(catalog.color(ColorIndex::new(1).unwrap()), Rgb(9, 9, 9));
        assert_eq!(catalog.color(ColorIndex::new(5).unwrap()), Rgb(1, 2, 3));
    }

    #[test]
    fn test_choose_random_covers_every_template() {
        let catalog = PieceCatalog::standard();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; 7];
        for _ in 0..500 {
            let (shape, index) = catalog.choose_random(&mut rng);
            assert_eq!(catalog.template(index), Some(shape));
            seen[usize::from(index.get()) - 1] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_templates_are_indexed_in_order() {
        let bar = Shape::from_rows(&[&[true, true]]).unwrap();
        let catalog = PieceCatalog::new(vec![single_cell(), bar.clone()], vec![Rgb(0, 0, 0); 3])
            .unwrap();
        let indices: Vec<u8> = catalog.templates().map(|(index, _)| index.get()).collect();
        assert_eq!(indices, vec![1, 2]);
        assert_eq!(catalog.template(ColorIndex::new(2).unwrap()), Some(&bar));
        assert_eq!(catalog.template(ColorIndex::new(3).unwrap()), None);

        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..50 {
            let (shape, index) = catalog.choose_random(&mut rng);
            assert_eq!(catalog.template(index), Some(shape));
        }
    }

    #[test]
    fn test_color_index_rejects_zero() {
        assert_eq!(ColorIndex::new(0), None);
        assert_eq!(ColorIndex::new(3).map(ColorIndex::get), Some(3));
    }
}
