//=========================================================================
// Scene Data
//=========================================================================
//
// Per-frame snapshot built by a StateMachine in `render()` and consumed
// by the Renderer. The core never looks inside; it only hands the value
// from one side to the other.
//
//=========================================================================

//=== TextureId ===========================================================

/// Handle returned by [`crate::core::backend::Renderer::load_texture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

//=== Color ===============================================================

/// Linear RGBA color, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const GRAY: Self = Self::rgb(0.5, 0.5, 0.5);
    pub const RED: Self = Self::rgb(0.9, 0.1, 0.1);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

//=== Quad ================================================================

/// Axis-aligned rectangle in window pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Quad {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    pub texture: Option<TextureId>,

    /// Single character drawn centered on the quad (text renderers use
    /// only this).
    pub glyph: Option<char>,
}

impl Quad {
    pub fn new(x: f32, y: f32, width: f32, height: f32, color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            color,
            texture: None,
            glyph: None,
        }
    }

    pub fn with_glyph(mut self, glyph: char) -> Self {
        self.glyph = Some(glyph);
        self
    }

    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }
}

//=== Label ===============================================================

/// A line of text anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub color: Color,
}

//=== SceneData ===========================================================

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneData {
    pub clear_color: Color,
    pub quads: Vec<Quad>,
    pub labels: Vec<Label>,
}

impl SceneData {
    pub fn new(clear_color: Color) -> Self {
        Self {
            clear_color,
            quads: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn push_quad(&mut self, quad: Quad) {
        self.quads.push(quad);
    }

    pub fn push_label(&mut self, x: f32, y: f32, text: impl Into<String>, color: Color) {
        self.labels.push(Label {
            x,
            y,
            text: text.into(),
            color,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty() && self.labels.is_empty()
    }
}
