use crate::renderer::fonts::FontConfig;
use crate::renderer::icon::{ICON_CELLS, ICON_SIZE};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

pub fn fill(image: &mut RgbaImage, colour: Rgba<u8>) {
    for pixel in image.pixels_mut() {
        *pixel = colour;
    }
}

pub fn border(image: &mut RgbaImage, colour: Rgba<u8>) {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    draw_hollow_rect_mut(image, Rect::at(0, 0).of_size(width, height), colour);
}

/// Draws the network icon with its top-left corner at `(x, y)` and returns
/// the drawn width.
pub fn icon(image: &mut RgbaImage, x: i32, y: i32, scale: u32, colour: Rgba<u8>) -> u32 {
    for (cx, cy, w, h) in ICON_CELLS {
        draw_filled_rect_mut(
            image,
            Rect::at(x + (cx * scale) as i32, y + (cy * scale) as i32).of_size(w * scale, h * scale),
            colour,
        );
    }
    ICON_SIZE * scale
}

/// Draws `text` and returns its rendered width.
pub fn text(
    image: &mut RgbaImage,
    colour: Rgba<u8>,
    x: i32,
    y: i32,
    font_config: &FontConfig,
    text: &str,
) -> u32 {
    draw_text_mut(image, colour, x, y, font_config.scale, &font_config.font, text);
    let (width, _) = text_size(font_config.scale, &font_config.font, text);
    width.max(0) as u32
}
