use image::RgbaImage;
use log::debug;
use std::path::Path;

use crate::renderer::colours::Colours;
use crate::renderer::{drawing, icon, Element, FontConfig, RenderError};

const PADDING: u32 = 4;
const GAP: u32 = 6;

// Rasterise the widget tree onto a black canvas
pub fn create_image(element: &Element, font: Option<&FontConfig>, width: u32, height: u32) -> RgbaImage {
    let colours = Colours::default();
    let mut image = RgbaImage::new(width, height);
    drawing::fill(&mut image, colours.background);

    let mut x = PADDING;
    draw_element(element, &mut image, font, &mut x, colours.text);
    image
}

fn draw_element(
    element: &Element,
    image: &mut RgbaImage,
    font: Option<&FontConfig>,
    x: &mut u32,
    text_colour: image::Rgba<u8>,
) {
    let height = image.height();
    match element {
        Element::Wrapper { colour, children } => {
            let inner_colour = colour.unwrap_or(text_colour);
            if let Some(colour) = colour {
                drawing::border(image, *colour);
            }
            for child in children {
                draw_element(child, image, font, x, inner_colour);
                *x += GAP;
            }
        }
        Element::Icon { fill } => {
            let scale = icon::scale_for_height(height.saturating_sub(2 * PADDING));
            let y = height.saturating_sub(icon::ICON_SIZE * scale) / 2;
            *x += drawing::icon(image, *x as i32, y as i32, scale, fill.unwrap_or(text_colour));
        }
        Element::Text(text) => match font {
            Some(font) => {
                let y = height.saturating_sub(font.scale.y as u32) / 2;
                *x += drawing::text(image, text_colour, *x as i32, y as i32, font, text);
            }
            None => debug!("No font loaded, skipping text '{}'", text),
        },
    }
}

pub fn save_image<P: AsRef<Path>>(path: P, image: &RgbaImage) -> Result<(), RenderError> {
    let path = path.as_ref();
    image.save(path)?;
    debug!("Saved widget image to {}", path.display());
    Ok(())
}
