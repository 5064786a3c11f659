//! Preset swatches and egui color conversions.

use egui::Color32;
use softlight_core::Color;

/// Swatch grid: one column per hue, darkest shade first.
pub const SWATCHES: [[u32; 5]; 19] = [
    [0xB71C1C, 0xD32F2F, 0xF44336, 0xE57373, 0xFFCDD2],
    [0x880E4F, 0xC2185B, 0xE91E63, 0xF06292, 0xF8BBD0],
    [0x4A148C, 0x7B1FA2, 0x9C27B0, 0xBA68C8, 0xE1BEE7],
    [0x311B92, 0x512DA8, 0x673AB7, 0x9575CD, 0xD1C4E9],
    [0x1A237E, 0x303F9F, 0x3F51B5, 0x7986CB, 0xC5CAE9],
    [0x0D47A1, 0x1976D2, 0x2196F3, 0x64B5F6, 0xBBDEFB],
    [0x01579B, 0x0288D1, 0x03A9F4, 0x4FC3F7, 0xB3E5FC],
    [0x006064, 0x0097A7, 0x00BCD4, 0x4DD0E1, 0xB2EBF2],
    [0x004D40, 0x00796B, 0x009688, 0x4DB6AC, 0xB2DFDB],
    [0x194D33, 0x388E3C, 0x4CAF50, 0x81C784, 0xC8E6C9],
    [0x33691E, 0x689F38, 0x8BC34A, 0xAED581, 0xDCEDC8],
    [0x827717, 0xAFB42B, 0xCDDC39, 0xDCE775, 0xF0F4C3],
    [0xF57F17, 0xFBC02D, 0xFFEB3B, 0xFFF176, 0xFFF9C4],
    [0xFF6F00, 0xFFA000, 0xFFC107, 0xFFD54F, 0xFFECB3],
    [0xE65100, 0xF57C00, 0xFF9800, 0xFFB74D, 0xFFE0B2],
    [0xBF360C, 0xE64A19, 0xFF5722, 0xFF8A65, 0xFFCCBC],
    [0x3E2723, 0x5D4037, 0x795548, 0xA1887F, 0xD7CCC8],
    [0x263238, 0x455A64, 0x607D8B, 0x90A4AE, 0xCFD8DC],
    [0x000000, 0x525252, 0x969696, 0xD9D9D9, 0xFFFFFF],
];

const SWATCH_SIZE: egui::Vec2 = egui::vec2(24.0, 18.0);

/// Opaque color from a packed `0xRRGGBB` value.
pub const fn swatch(packed: u32) -> Color {
    Color::rgb((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
}

/// Unmultiplied conversion for painting.
pub fn to_color32(color: Color) -> Color32 {
    let [r, g, b, a] = color.to_rgba8();
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Inverse of [`to_color32`].
pub fn from_color32(color: Color32) -> Color {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Color::rgba(r, g, b, f32::from(a) / 255.0)
}

/// Draws the swatch grid. Returns the clicked swatch, if any.
pub fn swatch_grid(ui: &mut egui::Ui, current: Color) -> Option<Color> {
    let mut picked = None;
    ui.horizontal_top(|ui| {
        ui.spacing_mut().item_spacing = egui::vec2(4.0, 2.0);
        for column in &SWATCHES {
            ui.vertical(|ui| {
                for &packed in column {
                    let color = swatch(packed);
                    let (rect, response) = ui.allocate_exact_size(SWATCH_SIZE, egui::Sense::click());
                    ui.painter().rect_filled(rect, 2.0, to_color32(color));
                    if color.to_hex() == current.to_hex() {
                        ui.painter()
                            .rect_stroke(rect, 2.0, egui::Stroke::new(2.0, Color32::WHITE));
                    }
                    if response.on_hover_text(color.to_hex()).clicked() {
                        picked = Some(color);
                    }
                }
            });
        }
    });
    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swatch_unpacks_channels() {
        assert_eq!(swatch(0xF44336), Color::rgb(0xF4, 0x43, 0x36));
        assert_eq!(swatch(0xF44336).to_hex(), "#f44336");
    }

    #[test]
    fn swatches_are_opaque_and_distinct() {
        let mut hexes: Vec<_> = SWATCHES.iter().flatten().map(|&p| swatch(p).to_hex()).collect();
        assert!(SWATCHES.iter().flatten().all(|&p| swatch(p).alpha() == 1.0));
        let total = hexes.len();
        hexes.sort();
        hexes.dedup();
        assert_eq!(hexes.len(), total);
    }

    #[test]
    fn color32_keeps_alpha() {
        let opaque = Color::rgb(255, 128, 0);
        assert_eq!(from_color32(to_color32(opaque)), opaque);

        let half = from_color32(to_color32(Color::rgba(255, 128, 0, 0.5)));
        assert!((half.alpha() - 0.5).abs() < 0.01);
    }

    #[test]
    fn transparent_black_paints_clear() {
        assert_eq!(to_color32(Color::TRANSPARENT_BLACK), Color32::TRANSPARENT);
    }
}
