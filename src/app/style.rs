use eframe::egui::Color32;

pub const GRID_PADDING: f32 = 24.0;
pub const LABEL_GAP: f32 = 6.0;
pub const ENTRY_SLIDE: f32 = 48.0;
pub const DROP_SHADOW: f32 = 8.0;

#[derive(Clone, Copy)]
pub struct DeckTheme {
    pub title_color: Color32,
    pub label_color: Color32,
    pub tile_border: Color32,
    pub tile_hover: Color32,
    pub add_tile: Color32,
    pub drop_hint: Color32,
    pub dragged_tint: Color32,
    pub toast_bg: Color32,
    pub toast_text: Color32,
}

impl Default for DeckTheme {
    fn default() -> Self {
        Self {
            title_color: Color32::from_rgb(242, 248, 255),
            label_color: Color32::from_rgb(205, 221, 238),
            tile_border: Color32::from_rgba_premultiplied(147, 169, 194, 78),
            tile_hover: Color32::from_rgba_premultiplied(255, 255, 255, 24),
            add_tile: Color32::from_rgba_premultiplied(35, 53, 74, 184),
            drop_hint: Color32::from_rgba_premultiplied(93, 214, 189, 186),
            dragged_tint: Color32::from_rgba_premultiplied(0, 0, 0, 120),
            toast_bg: Color32::from_rgba_premultiplied(8, 12, 18, 236),
            toast_text: Color32::from_rgb(245, 250, 255),
        }
    }
}

const PALETTE: [Color32; 6] = [
    Color32::from_rgb(45, 104, 114),
    Color32::from_rgb(70, 90, 160),
    Color32::from_rgb(150, 80, 110),
    Color32::from_rgb(180, 120, 50),
    Color32::from_rgb(60, 130, 80),
    Color32::from_rgb(110, 80, 150),
];

/// `#rrggbb` hint if it parses, otherwise a stable palette colour picked from the id.
pub fn tile_color(color_hint: Option<&str>, id: &str) -> Color32 {
    if let Some(color) = color_hint.and_then(parse_hex_color) {
        return color;
    }
    let hash = id
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
    PALETTE[hash as usize % PALETTE.len()]
}

pub fn parse_hex_color(hint: &str) -> Option<Color32> {
    let hex = hint.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Up to two leading characters of the title, standing in for an icon.
pub fn monogram(title: &str) -> String {
    let mut words = title.split_whitespace();
    let first = words.next().and_then(|w| w.chars().next());
    let second = words.next().and_then(|w| w.chars().next());
    match (first, second) {
        (Some(a), Some(b)) => format!("{}{}", a, b).to_uppercase(),
        (Some(a), None) => a.to_uppercase().collect(),
        _ => "?".to_string(),
    }
}

pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_hints_parse_or_fall_back() {
        assert_eq!(
            parse_hex_color("#2d6872"),
            Some(Color32::from_rgb(0x2d, 0x68, 0x72))
        );
        assert_eq!(parse_hex_color("2d6872"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(tile_color(Some("bogus"), "mail"), tile_color(None, "mail"));
    }

    #[test]
    fn monogram_takes_word_initials() {
        assert_eq!(monogram("Hacker News"), "HN");
        assert_eq!(monogram("docs.rs"), "D");
        assert_eq!(monogram("   "), "?");
    }
}
