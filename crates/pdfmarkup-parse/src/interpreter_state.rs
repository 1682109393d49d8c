//! Graphics state stack for the content stream interpreter.

use pdfmarkup_core::Rgb;

use crate::matrix::Matrix;

/// Color space of a fill or stroke, reduced to what color conversion needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpaceKind {
    Gray,
    Rgb,
    Cmyk,
    /// Patterns and shadings; painted color is unknown.
    Pattern,
    /// Separation, DeviceN, Indexed and other spaces not converted.
    Unsupported,
}

impl ColorSpaceKind {
    /// Space implied by the component count of an ICC profile or a color array.
    pub fn from_components(n: usize) -> Self {
        match n {
            1 => ColorSpaceKind::Gray,
            3 => ColorSpaceKind::Rgb,
            4 => ColorSpaceKind::Cmyk,
            _ => ColorSpaceKind::Unsupported,
        }
    }

    /// Convert color operands in this space; `None` when not convertible.
    pub fn resolve(&self, components: &[f64]) -> Option<Rgb> {
        let expected = match self {
            ColorSpaceKind::Gray => 1,
            ColorSpaceKind::Rgb => 3,
            ColorSpaceKind::Cmyk => 4,
            ColorSpaceKind::Pattern | ColorSpaceKind::Unsupported => return None,
        };
        if components.len() != expected {
            return None;
        }
        Rgb::from_components(components)
    }
}

/// Painting parameters tracked by the interpreter.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    pub ctm: Matrix,
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    pub fill_space: ColorSpaceKind,
    pub stroke_space: ColorSpaceKind,
}

impl Default for GraphicsState {
    fn default() -> Self {
        let black = Some(Rgb::new(0.0, 0.0, 0.0));
        Self {
            ctm: Matrix::identity(),
            fill: black,
            stroke: black,
            fill_space: ColorSpaceKind::Gray,
            stroke_space: ColorSpaceKind::Gray,
        }
    }
}

impl GraphicsState {
    /// Select a fill color space; resets the fill to the space's initial color.
    pub fn set_fill_space(&mut self, space: ColorSpaceKind) {
        self.fill_space = space;
        self.fill = initial_color(space);
    }

    pub fn set_stroke_space(&mut self, space: ColorSpaceKind) {
        self.stroke_space = space;
        self.stroke = initial_color(space);
    }
}

fn initial_color(space: ColorSpaceKind) -> Option<Rgb> {
    match space {
        ColorSpaceKind::Gray | ColorSpaceKind::Rgb | ColorSpaceKind::Cmyk => {
            Some(Rgb::new(0.0, 0.0, 0.0))
        }
        ColorSpaceKind::Pattern | ColorSpaceKind::Unsupported => None,
    }
}

/// Current graphics state plus the `q`/`Q` save stack.
#[derive(Debug, Clone, Default)]
pub struct InterpreterState<T: Clone> {
    current: GraphicsState,
    text: T,
    stack: Vec<(GraphicsState, T)>,
}

impl<T: Clone> InterpreterState<T> {
    pub fn new(text: T) -> Self {
        Self {
            current: GraphicsState::default(),
            text,
            stack: Vec::new(),
        }
    }

    /// Start from an inherited graphics state (Form XObjects).
    pub fn with_graphics(graphics: GraphicsState, text: T) -> Self {
        Self {
            current: graphics,
            text,
            stack: Vec::new(),
        }
    }

    pub fn graphics(&self) -> &GraphicsState {
        &self.current
    }

    pub fn graphics_mut(&mut self) -> &mut GraphicsState {
        &mut self.current
    }

    pub fn text(&self) -> &T {
        &self.text
    }

    pub fn text_mut(&mut self) -> &mut T {
        &mut self.text
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// `q`
    pub fn save(&mut self) {
        self.stack.push((self.current.clone(), self.text.clone()));
    }

    /// `Q`; returns `false` on an unbalanced restore, which is ignored.
    pub fn restore(&mut self) -> bool {
        match self.stack.pop() {
            Some((graphics, text)) => {
                self.current = graphics;
                self.text = text;
                true
            }
            None => false,
        }
    }

    /// `cm`: pre-multiply the CTM.
    pub fn concat_matrix(&mut self, m: &Matrix) {
        self.current.ctm = m.multiply(&self.current.ctm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_colors_are_black() {
        let gs = GraphicsState::default();
        assert_eq!(gs.fill, Some(Rgb::new(0.0, 0.0, 0.0)));
        assert_eq!(gs.fill_space, ColorSpaceKind::Gray);
    }

    #[test]
    fn resolve_checks_component_count() {
        assert_eq!(ColorSpaceKind::Rgb.resolve(&[1.0, 0.0]), None);
        assert_eq!(
            ColorSpaceKind::Rgb.resolve(&[1.0, 0.0, 0.0]),
            Some(Rgb::new(1.0, 0.0, 0.0))
        );
        assert_eq!(ColorSpaceKind::Pattern.resolve(&[1.0]), None);
    }

    #[test]
    fn pattern_space_clears_fill() {
        let mut gs = GraphicsState::default();
        gs.set_fill_space(ColorSpaceKind::Pattern);
        assert_eq!(gs.fill, None);
    }

    #[test]
    fn save_restore_round_trip() {
        let mut state = InterpreterState::new(0u8);
        state.graphics_mut().fill = Some(Rgb::new(1.0, 0.0, 0.0));
        state.save();
        *state.text_mut() = 7;
        state.graphics_mut().fill = None;
        assert_eq!(state.stack_depth(), 1);
        assert!(state.restore());
        assert_eq!(state.graphics().fill, Some(Rgb::new(1.0, 0.0, 0.0)));
        assert_eq!(*state.text(), 0);
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let mut state = InterpreterState::new(());
        assert!(!state.restore());
    }

    #[test]
    fn concat_matrix_premultiplies() {
        let mut state = InterpreterState::new(());
        state.concat_matrix(&Matrix::translate(10.0, 0.0));
        state.concat_matrix(&Matrix::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0));
        // Scale applies in the translated frame.
        assert_eq!(state.graphics().ctm.transform(1.0, 1.0), (12.0, 2.0));
    }
}
