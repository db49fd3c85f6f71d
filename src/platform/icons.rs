//! Icon generation for the menu bar.
//!
//! Draws a headphones glyph as RGBA data. The glyph is black on transparent
//! so macOS can render it as a template image in light and dark menu bars.

/// Icon size in pixels.
pub const ICON_SIZE: u32 = 32;

/// Generate the menu bar icon.
#[cfg(target_os = "macos")]
pub fn create_tray_icon() -> Result<tray_icon::Icon, String> {
    let rgba = generate_headphones_icon();
    tray_icon::Icon::from_rgba(rgba, ICON_SIZE, ICON_SIZE).map_err(|e| e.to_string())
}

/// Generate a headphones icon as RGBA data.
pub fn generate_headphones_icon() -> Vec<u8> {
    let size = ICON_SIZE as usize;
    let mut rgba = vec![0u8; size * size * 4];

    let center = size as f32 / 2.0;
    let outer = size as f32 / 2.0 - 4.0;
    let inner = outer - 2.5;

    // Headband: upper half of a ring
    for y in 0..=size / 2 {
        for x in 0..size {
            let dx = x as f32 + 0.5 - center;
            let dy = y as f32 + 0.5 - center;
            let dist = (dx * dx + dy * dy).sqrt();

            if dist >= inner && dist < outer {
                set_pixel(&mut rgba, size, x, y, 255);
            } else if dist >= outer && dist < outer + 1.0 {
                // Anti-aliased edge
                let alpha = ((outer + 1.0 - dist) * 255.0) as u8;
                set_pixel(&mut rgba, size, x, y, alpha);
            }
        }
    }

    // Ear cups
    let cup_width = size / 6;
    let cup_top = size / 2 - 1;
    let cup_bottom = size - size / 6;
    let left = 4;
    let right = size - 4 - cup_width;

    for y in cup_top..cup_bottom {
        for x in (left..left + cup_width).chain(right..right + cup_width) {
            set_pixel(&mut rgba, size, x, y, 255);
        }
    }

    rgba
}

fn set_pixel(rgba: &mut [u8], size: usize, x: usize, y: usize, alpha: u8) {
    if x >= size || y >= size {
        return;
    }
    let idx = (y * size + x) * 4;
    rgba[idx] = 0;
    rgba[idx + 1] = 0;
    rgba[idx + 2] = 0;
    rgba[idx + 3] = rgba[idx + 3].max(alpha);
}
