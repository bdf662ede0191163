//! # Snapshots
//!
//! A PNG of the whole surface at one moment, ready to hand to whoever wants to look at the drawing.

use crate::surface::Surface;

#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("failed to encode png: {0}")]
    Encode(#[from] png::EncodingError),
}

/// An encoded, immutable image of a [`Surface`].
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    /// Shared, so handing a snapshot to several listeners doesn't copy the image.
    png: std::sync::Arc<[u8]>,
}
impl Snapshot {
    pub const MIME_TYPE: &'static str = "image/png";

    /// Encode the surface as 8 bit straight-alpha RGBA PNG.
    pub fn capture(surface: &Surface) -> Result<Self, SnapshotError> {
        let (width, height) = (surface.width(), surface.height());
        // Surface pixels are premultiplied, PNG wants straight alpha.
        let straight: Vec<crate::color::Color> = surface.pixels().collect();

        let mut png = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png, width, height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(bytemuck::cast_slice(&straight))?;
            writer.finish()?;
        }
        log::trace!("encoded {width}x{height} snapshot, {} bytes", png.len());

        Ok(Self {
            width,
            height,
            png: png.into(),
        })
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }
    /// The encoded PNG file.
    #[must_use]
    pub fn png(&self) -> &[u8] {
        &self.png
    }
    /// `data:image/png;base64,...`, as a browser canvas would produce.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        use base64::Engine;
        let mut url = format!("data:{};base64,", Self::MIME_TYPE);
        base64::engine::general_purpose::STANDARD.encode_string(self.png(), &mut url);
        url
    }
}
impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.png.len())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::Snapshot;
    use crate::{
        brush::{BrushConfig, Pen, Tool},
        color::Color,
        surface::Surface,
    };

    fn decode(snapshot: &Snapshot) -> (png::OutputInfo, Vec<u8>) {
        let decoder = png::Decoder::new(snapshot.png());
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info, buf)
    }

    #[test]
    fn blank_surface_is_white_png() {
        let surface = Surface::new(8, 4, 1.0).unwrap();
        let snapshot = Snapshot::capture(&surface).unwrap();
        assert_eq!((snapshot.width(), snapshot.height()), (8, 4));
        assert!(snapshot.png().starts_with(b"\x89PNG\r\n\x1a\n"));

        let (info, data) = decode(&snapshot);
        assert_eq!((info.width, info.height), (8, 4));
        assert_eq!(info.color_type, png::ColorType::Rgba);
        assert!(data.iter().all(|&byte| byte == 255));
    }
    #[test]
    fn erased_pixels_export_transparent() {
        let mut surface = Surface::new(16, 16, 1.0).unwrap();
        let mut pb = tiny_skia::PathBuilder::new();
        pb.move_to(0.0, 8.0);
        pb.line_to(16.0, 8.0);
        let eraser = Pen::from_brush(&BrushConfig::new(Tool::Eraser, Color::BLACK, 4), 1.0);
        surface.stroke_path(&pb.finish().unwrap(), &eraser);

        let (_, data) = decode(&Snapshot::capture(&surface).unwrap());
        let row = 8 * 16 * 4;
        assert_eq!(data[row + 3], 0, "erased alpha");
        assert_eq!(data[3], 255, "untouched alpha");
    }
    #[test]
    fn data_url() {
        let surface = Surface::new(2, 2, 1.0).unwrap();
        let snapshot = Snapshot::capture(&surface).unwrap();
        let url = snapshot.to_data_url();
        // Base64 of the PNG signature.
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }
    #[test]
    fn snapshot_is_immutable_copy() {
        let mut surface = Surface::new(8, 8, 1.0).unwrap();
        let before = Snapshot::capture(&surface).unwrap();
        let mut pb = tiny_skia::PathBuilder::new();
        pb.move_to(0.0, 0.0);
        pb.line_to(8.0, 8.0);
        let pen = Pen::from_brush(&BrushConfig::default(), 1.0);
        surface.stroke_path(&pb.finish().unwrap(), &pen);

        let after = Snapshot::capture(&surface).unwrap();
        assert_ne!(before, after);
        assert_eq!(before, Snapshot::capture(&Surface::new(8, 8, 1.0).unwrap()).unwrap());
    }
}
