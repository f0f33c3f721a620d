use crate::renderer::RenderError;
use rusttype::{Font, Scale};
use std::fs;
use std::path::Path;

pub const DEFAULT_FONT_SIZE: f32 = 20.0;

pub struct FontConfig {
    pub font: Font<'static>,
    pub scale: Scale,
}

impl FontConfig {
    pub fn from_file<P: AsRef<Path>>(path: P, size: f32) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| RenderError::FontRead {
            path: path.display().to_string(),
            source,
        })?;
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| RenderError::InvalidFont(path.display().to_string()))?;
        Ok(Self {
            font,
            scale: Scale::uniform(size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_font_file() {
        let err = FontConfig::from_file("/nonexistent/font.ttf", DEFAULT_FONT_SIZE).err().unwrap();
        assert!(matches!(err, RenderError::FontRead { .. }));
    }

    #[test]
    fn test_garbage_font_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a truetype font").unwrap();
        let err = FontConfig::from_file(file.path(), DEFAULT_FONT_SIZE).err().unwrap();
        assert!(matches!(err, RenderError::InvalidFont(_)));
    }
}
