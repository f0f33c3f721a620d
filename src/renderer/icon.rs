/// Side length of the icon's pixel grid.
pub const ICON_SIZE: u32 = 16;

/// The network icon as filled `(x, y, width, height)` cells on a 16x16 grid:
/// a download arrow on the left and an upload arrow on the right.
pub const ICON_CELLS: [(u32, u32, u32, u32); 10] = [
    // down arrow: head tapering to a point, then the shaft
    (1, 11, 7, 1),
    (2, 12, 5, 1),
    (3, 13, 3, 1),
    (4, 14, 1, 1),
    (3, 4, 3, 7),
    // up arrow
    (9, 3, 5, 1),
    (10, 2, 3, 1),
    (11, 1, 1, 1),
    (8, 4, 7, 1),
    (10, 5, 3, 7),
];

/// Largest whole scale at which the icon fits into `height` pixels.
pub fn scale_for_height(height: u32) -> u32 {
    (height / ICON_SIZE).max(1)
}
