//! Console display sink.
//!
//! Writes one summary line per presented frame, optionally followed by a
//! small ASCII rendition of the pixels. The writer is injectable so tests
//! can capture output.

use std::io::Write;

use parking_lot::Mutex;
use tracing::debug;

use crate::domain::entities::RenderFrame;
use crate::domain::ports::DisplayPort;

/// Characters from dark to bright used for the ASCII preview.
const RAMP: &[u8] = b" .:-=+*#%@";

/// Display adapter that prints frames to a writer, stdout by default.
pub struct ConsoleDisplay {
    out: Mutex<Box<dyn Write + Send>>,
    preview_cols: Option<u32>,
}

impl ConsoleDisplay {
    /// Creates a display over stdout.
    ///
    /// `preview_cols` enables the ASCII preview at the given width;
    /// `None` prints summary lines only.
    #[must_use]
    pub fn stdout(preview_cols: Option<u32>) -> Self {
        Self::with_writer(Box::new(std::io::stdout()), preview_cols)
    }

    /// Creates a display over an arbitrary writer.
    #[must_use]
    pub fn with_writer(out: Box<dyn Write + Send>, preview_cols: Option<u32>) -> Self {
        Self {
            out: Mutex::new(out),
            preview_cols,
        }
    }
}

impl DisplayPort for ConsoleDisplay {
    fn present(&self, frame: &RenderFrame) {
        let mut rendered = format_frame(frame);
        if let Some(cols) = self.preview_cols {
            rendered.push('\n');
            rendered.push_str(&ascii_preview(&frame.image, cols));
        }

        let mut out = self.out.lock();
        let _ = writeln!(out, "{rendered}");
        let _ = out.flush();
        debug!(id = %frame.id, source = %frame.source, "Presented frame");
    }
}

/// One human-readable summary line for a frame.
fn format_frame(frame: &RenderFrame) -> String {
    let short_checksum = frame.checksum.get(..8).unwrap_or(&frame.checksum);
    format!(
        "Displaying {}: {}x{} px from {} [{}]",
        frame.id,
        frame.width(),
        frame.height(),
        frame.source,
        short_checksum
    )
}

/// Scales the image down and maps luminance onto the character ramp.
#[allow(clippy::cast_possible_truncation)]
fn ascii_preview(image: &image::DynamicImage, cols: u32) -> String {
    let width = cols.clamp(1, image.width().max(1));
    // A terminal cell is roughly twice as tall as it is wide.
    let height = (u64::from(image.height()) * u64::from(width)
        / u64::from(image.width().max(1))
        / 2)
    .max(1) as u32;

    let gray = image.thumbnail_exact(width, height).to_luma8();

    let mut out = String::with_capacity((width as usize + 1) * height as usize);
    for y in 0..height {
        if y > 0 {
            out.push('\n');
        }
        for x in 0..width {
            out.push(ramp_char(gray.get_pixel(x, y)[0]));
        }
    }
    out
}

fn ramp_char(luma: u8) -> char {
    let step = usize::from(luma) * (RAMP.len() - 1) / 255;
    RAMP[step] as char
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use test_case::test_case;

    use super::*;
    use crate::domain::entities::{ImageId, ImageSource, LoadedImage};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn frame_of(id: &str, pixels: image::DynamicImage) -> RenderFrame {
        let loaded = LoadedImage::new(
            ImageId::new(id),
            Arc::new(pixels),
            ImageSource::DiskStore,
            b"encoded bytes",
        );
        RenderFrame::from_loaded(&loaded)
    }

    fn white(width: u32, height: u32) -> image::DynamicImage {
        image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            width,
            height,
            image::Rgb([255, 255, 255]),
        ))
    }

    #[test]
    fn test_summary_line_names_image_and_source() {
        let frame = frame_of("car.png", image::DynamicImage::new_rgb8(8, 4));

        let line = format_frame(&frame);
        assert!(line.contains("car.png"));
        assert!(line.contains("8x4 px"));
        assert!(line.contains("from disk"));
    }

    #[test]
    fn test_present_writes_summary_without_preview() {
        let buf = SharedBuf::default();
        let display = ConsoleDisplay::with_writer(Box::new(buf.clone()), None);

        display.present(&frame_of("car.png", white(4, 4)));

        let output = buf.contents();
        assert!(output.contains("Displaying car.png"));
        assert!(!output.contains('@'));
    }

    #[test]
    fn test_present_appends_ascii_preview() {
        let buf = SharedBuf::default();
        let display = ConsoleDisplay::with_writer(Box::new(buf.clone()), Some(4));

        display.present(&frame_of("car.png", white(4, 4)));

        assert!(buf.contents().contains('@'));
    }

    #[test]
    fn test_preview_halves_rows_for_cell_aspect() {
        let preview = ascii_preview(&white(8, 8), 8);

        let rows: Vec<&str> = preview.lines().collect();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|row| row.chars().count() == 8));
        assert!(rows.iter().all(|row| row.chars().all(|c| c == '@')));
    }

    #[test]
    fn test_preview_never_collapses_to_zero() {
        let preview = ascii_preview(&white(100, 1), 10);
        assert_eq!(preview.lines().count(), 1);
    }

    #[test_case(0, ' ')]
    #[test_case(255, '@')]
    #[test_case(40, '.')]
    fn test_ramp_endpoints(luma: u8, expected: char) {
        assert_eq!(ramp_char(luma), expected);
    }
}
