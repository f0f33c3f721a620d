use crate::models::DisplayState;
use image::Rgba;
use std::fmt;

/// Glyph standing in for the icon in plain-text output.
pub const ICON_GLYPH: &str = "⇅";

/// Visual tree produced by [`render`].
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Widget chrome: border and text colour for everything inside.
    Wrapper {
        colour: Option<Rgba<u8>>,
        children: Vec<Element>,
    },
    Icon {
        fill: Option<Rgba<u8>>,
    },
    Text(String),
}

impl Element {
    /// Colour of the outermost node, if it carries one.
    pub fn fill(&self) -> Option<Rgba<u8>> {
        match self {
            Element::Wrapper { colour, .. } => *colour,
            Element::Icon { fill } => *fill,
            Element::Text(_) => None,
        }
    }

    pub fn children(&self) -> &[Element] {
        match self {
            Element::Wrapper { children, .. } => children,
            _ => &[],
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Wrapper { children, .. } => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", child)?;
                }
                Ok(())
            }
            Element::Icon { .. } => f.write_str(ICON_GLYPH),
            Element::Text(text) => f.write_str(text),
        }
    }
}

pub fn speed_text(state: &DisplayState) -> String {
    format!("{}kB/s {}kB/s", state.download, state.upload)
}

/// Builds the widget: the icon tinted with `fill`, followed by the download
/// and upload speeds, all inside the chrome wrapper.
pub fn render(state: &DisplayState, fill: Option<Rgba<u8>>) -> Element {
    Element::Wrapper {
        colour: fill,
        children: vec![Element::Icon { fill }, Element::Text(speed_text(state))],
    }
}
