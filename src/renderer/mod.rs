use thiserror::Error;

pub(crate) mod colours;
pub(crate) mod drawing;
pub(crate) mod fonts;
pub(crate) mod icon;
pub(crate) mod widgets;

pub use colours::{colour, colour_exists, colour_names};
pub use fonts::FontConfig;
pub use widgets::{render, speed_text, Element};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read font {path}: {source}")]
    FontRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not a usable TrueType font")]
    InvalidFont(String),

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}
