//! QR payload to PNG rendering for ticket emails.

use crate::error::{NotificationError, NotificationResult};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::{Color, QrCode};
use std::io::Cursor;

/// Pixels per QR module. Version-3 codes (29 modules) come out at ~296px,
/// comfortably above what phone scanners need.
const MODULE_SCALE: u32 = 8;

/// Quiet-zone border in modules, per the QR specification.
const QUIET_ZONE: u32 = 4;

/// Render a QR payload into PNG bytes.
///
/// Failures here are per-recipient: the batcher records them against the
/// recipient and keeps going.
pub fn render_qr_png(payload: &str) -> NotificationResult<Vec<u8>> {
    let code = QrCode::new(payload.as_bytes())
        .map_err(|e| NotificationError::QrRender(format!("encoding failed: {}", e)))?;

    let modules = code.width() as u32;
    let colors = code.to_colors();
    let dim = (modules + 2 * QUIET_ZONE) * MODULE_SCALE;

    let mut image = GrayImage::from_pixel(dim, dim, Luma([0xff]));
    for (index, color) in colors.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let module_x = (index as u32 % modules + QUIET_ZONE) * MODULE_SCALE;
        let module_y = (index as u32 / modules + QUIET_ZONE) * MODULE_SCALE;
        for dy in 0..MODULE_SCALE {
            for dx in 0..MODULE_SCALE {
                image.put_pixel(module_x + dx, module_y + dy, Luma([0x00]));
            }
        }
    }

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| NotificationError::QrRender(format!("PNG encoding failed: {}", e)))?;

    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_produces_png() {
        let png = render_qr_png("ABC123xyz").unwrap();
        // PNG magic bytes
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn test_render_long_payload() {
        let payload = "x".repeat(512);
        assert!(render_qr_png(&payload).is_ok());
    }

    #[test]
    fn test_render_rejects_oversized_payload() {
        // Version-40 codes top out below 3kB of data
        let payload = "x".repeat(8192);
        assert!(matches!(
            render_qr_png(&payload),
            Err(NotificationError::QrRender(_))
        ));
    }
}
