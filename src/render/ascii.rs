//=========================================================================
// ASCII Renderer
//=========================================================================
//
// Text-mode Renderer writing frames to any `io::Write`.
//
// Architecture:
//   submit(SceneData) → rows keyed by y → end_frame() → text frame
//                                                         ↓ (changed?)
//                                                      writer
//
// Glyph quads and labels are laid out by position: everything sharing a
// y coordinate forms one line, ordered by x. Quads without a glyph have
// no text form and are skipped. A frame is written only when its text
// differs from the previous one.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::io::Write;

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::backend::Renderer;
use crate::core::scene::{SceneData, TextureId};
use crate::error::RenderError;
use crate::loaders::ImageData;

//=== Constants ===========================================================

/// ANSI: clear screen, cursor home.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

//=== AsciiRenderer =======================================================

/// Renders glyph quads and labels as lines of text.
pub struct AsciiRenderer<W: Write> {
    writer: W,
    clear_screen: bool,

    //--- Frame State ------------------------------------------------------
    in_frame: bool,
    rows: BTreeMap<i64, Vec<(f32, String)>>,
    last_frame: Option<String>,
    frames_written: u64,
    textures: u32,
}

impl<W: Write> AsciiRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            clear_screen: false,
            in_frame: false,
            rows: BTreeMap::new(),
            last_frame: None,
            frames_written: 0,
            textures: 0,
        }
    }

    /// Prefixes every written frame with an ANSI clear-screen sequence.
    pub fn with_clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    /// Frames actually written (unchanged frames are skipped).
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Text of the last written frame.
    pub fn last_frame(&self) -> Option<&str> {
        self.last_frame.as_deref()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    //--- Layout -----------------------------------------------------------

    fn place(&mut self, x: f32, y: f32, text: String) {
        self.rows.entry(y.round() as i64).or_default().push((x, text));
    }

    fn compose(&mut self) -> String {
        let mut frame = String::new();
        for (_, mut items) in std::mem::take(&mut self.rows) {
            items.sort_by(|a, b| a.0.total_cmp(&b.0));
            let line: Vec<String> = items.into_iter().map(|(_, text)| text).collect();
            frame.push_str(&line.join(" "));
            frame.push('\n');
        }
        frame
    }
}

impl<W: Write> Renderer for AsciiRenderer<W> {
    fn begin_frame(&mut self) -> Result<(), RenderError> {
        if self.in_frame {
            return Err(RenderError::FrameInProgress);
        }
        self.in_frame = true;
        self.rows.clear();
        Ok(())
    }

    fn submit(&mut self, scene: &SceneData) -> Result<(), RenderError> {
        if !self.in_frame {
            return Err(RenderError::NoFrameInProgress("submit"));
        }
        for quad in &scene.quads {
            if let Some(glyph) = quad.glyph {
                self.place(quad.x, quad.y, glyph.to_string());
            }
        }
        for label in &scene.labels {
            self.place(label.x, label.y, label.text.clone());
        }
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        if !self.in_frame {
            return Err(RenderError::NoFrameInProgress("end_frame"));
        }
        self.in_frame = false;

        let frame = self.compose();
        if self.last_frame.as_deref() == Some(frame.as_str()) {
            return Ok(());
        }

        if self.clear_screen {
            self.writer.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        self.writer.write_all(frame.as_bytes())?;
        self.writer.flush()?;

        trace!(target: "render", "Wrote text frame ({} bytes)", frame.len());
        self.frames_written += 1;
        self.last_frame = Some(frame);
        Ok(())
    }

    /// Text output has no use for pixels; the image is only validated.
    fn load_texture(&mut self, image: &ImageData) -> Result<TextureId, RenderError> {
        if image.width == 0 || image.height == 0 {
            return Err(RenderError::Texture("empty image".into()));
        }
        let id = TextureId(self.textures);
        self.textures += 1;
        Ok(id)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::{Color, Quad};
    use std::io;

    fn cell(x: f32, y: f32, glyph: char) -> Quad {
        Quad::new(x, y, 10.0, 10.0, Color::GRAY).with_glyph(glyph)
    }

    fn draw(renderer: &mut AsciiRenderer<Vec<u8>>, scene: &SceneData) {
        renderer.begin_frame().unwrap();
        renderer.submit(scene).unwrap();
        renderer.end_frame().unwrap();
    }

    #[test]
    fn rows_ordered_by_y_then_x() {
        let mut scene = SceneData::default();
        scene.push_quad(cell(20.0, 10.0, 'c'));
        scene.push_quad(cell(0.0, 10.0, 'a'));
        scene.push_quad(cell(10.0, 0.0, 'b'));
        scene.push_label(0.0, 30.0, "status", Color::WHITE);

        let mut renderer = AsciiRenderer::new(Vec::new());
        draw(&mut renderer, &scene);

        assert_eq!(renderer.last_frame(), Some("b\na c\nstatus\n"));
    }

    #[test]
    fn quads_without_glyph_skipped() {
        let mut scene = SceneData::default();
        scene.push_quad(Quad::new(0.0, 0.0, 5.0, 5.0, Color::BLACK));
        scene.push_quad(cell(5.0, 0.0, '#'));

        let mut renderer = AsciiRenderer::new(Vec::new());
        draw(&mut renderer, &scene);

        assert_eq!(renderer.last_frame(), Some("#\n"));
    }

    #[test]
    fn unchanged_frame_not_rewritten() {
        let mut scene = SceneData::default();
        scene.push_quad(cell(0.0, 0.0, 'x'));

        let mut renderer = AsciiRenderer::new(Vec::new());
        draw(&mut renderer, &scene);
        draw(&mut renderer, &scene);
        assert_eq!(renderer.frames_written(), 1);

        scene.push_quad(cell(10.0, 0.0, 'y'));
        draw(&mut renderer, &scene);
        assert_eq!(renderer.frames_written(), 2);

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(output, "x\nx y\n");
    }

    #[test]
    fn clear_screen_prefixes_frames() {
        let mut scene = SceneData::default();
        scene.push_label(0.0, 0.0, "hi", Color::WHITE);

        let mut renderer = AsciiRenderer::new(Vec::new()).with_clear_screen(true);
        draw(&mut renderer, &scene);

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(output, format!("{}hi\n", CLEAR_SCREEN));
    }

    #[test]
    fn frame_protocol_enforced() {
        let mut renderer = AsciiRenderer::new(Vec::new());
        assert!(matches!(
            renderer.submit(&SceneData::default()),
            Err(RenderError::NoFrameInProgress("submit"))
        ));
        renderer.begin_frame().unwrap();
        assert!(matches!(renderer.begin_frame(), Err(RenderError::FrameInProgress)));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_present_error() {
        let mut scene = SceneData::default();
        scene.push_label(0.0, 0.0, "x", Color::WHITE);

        let mut renderer = AsciiRenderer::new(FailingWriter);
        renderer.begin_frame().unwrap();
        renderer.submit(&scene).unwrap();

        assert!(matches!(renderer.end_frame(), Err(RenderError::Present(_))));
    }
}
