use image::Rgba;
use indexmap::IndexMap;
use std::sync::OnceLock;

/// Palette the widget colour option is looked up in. Names follow the usual
/// terminal colour scheme keys.
fn palette() -> &'static IndexMap<&'static str, Rgba<u8>> {
    static PALETTE: OnceLock<IndexMap<&'static str, Rgba<u8>>> = OnceLock::new();
    PALETTE.get_or_init(|| {
        IndexMap::from([
            ("black", Rgba([0, 0, 0, 255])),
            ("red", Rgba([197, 30, 20, 255])),
            ("green", Rgba([29, 193, 33, 255])),
            ("yellow", Rgba([199, 195, 41, 255])),
            ("blue", Rgba([10, 47, 196, 255])),
            ("magenta", Rgba([200, 57, 197, 255])),
            ("cyan", Rgba([32, 197, 198, 255])),
            ("white", Rgba([199, 199, 199, 255])),
            ("lightBlack", Rgba([104, 104, 104, 255])),
            ("lightRed", Rgba([253, 111, 107, 255])),
            ("lightGreen", Rgba([103, 248, 111, 255])),
            ("lightYellow", Rgba([255, 250, 114, 255])),
            ("lightBlue", Rgba([106, 118, 251, 255])),
            ("lightMagenta", Rgba([253, 124, 252, 255])),
            ("lightCyan", Rgba([104, 253, 254, 255])),
            ("lightWhite", Rgba([255, 255, 255, 255])),
            ("limeGreen", Rgba([50, 205, 50, 255])),
            ("lightCoral", Rgba([240, 128, 128, 255])),
        ])
    })
}

pub fn colour(name: &str) -> Option<Rgba<u8>> {
    palette().get(name).copied()
}

pub fn colour_exists(name: &str) -> bool {
    palette().contains_key(name)
}

pub fn colour_names() -> impl Iterator<Item = &'static str> {
    palette().keys().copied()
}

/// Colours used by the rasteriser for everything that is not tinted by the
/// configured colour.
pub(crate) struct Colours {
    pub background: Rgba<u8>,
    pub text: Rgba<u8>,
}

impl Default for Colours {
    fn default() -> Self {
        Self {
            background: Rgba([0, 0, 0, 255]),  // Black
            text: Rgba([238, 238, 236, 255]),  // Off-white
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_colour() {
        assert!(colour_exists("lightCyan"));
        assert_eq!(colour("lightCyan"), Some(Rgba([104, 253, 254, 255])));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(!colour_exists("lightcyan"));
        assert_eq!(colour("LightCyan"), None);
    }

    #[test]
    fn test_names_keep_palette_order() {
        let names: Vec<&str> = colour_names().collect();
        assert_eq!(names.first(), Some(&"black"));
        assert!(names.contains(&"lightCoral"));
        assert_eq!(names.len(), 18);
    }
}
