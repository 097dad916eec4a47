use crate::shared::detection::Detection;
use crate::shared::frame::Frame;

/// Box color for the privileged identity.
pub const KNOWN_COLOR: [u8; 3] = [0, 255, 0];
/// Box color for everyone else.
pub const UNKNOWN_COLOR: [u8; 3] = [255, 0, 0];

const RECT_THICKNESS: i32 = 2;
const GLYPH_WIDTH: i32 = 5;

pub fn color_for(known: bool) -> [u8; 3] {
    if known {
        KNOWN_COLOR
    } else {
        UNKNOWN_COLOR
    }
}

/// Burns a detection's bounding box and label into the live frame.
pub fn draw_detection(frame: &mut Frame, detection: &Detection, known: bool) {
    let color = color_for(known);
    draw_rect(
        frame,
        detection.x,
        detection.y,
        detection.width,
        detection.height,
        color,
    );
    draw_text(
        frame,
        &detection.label,
        detection.x,
        detection.y - 10,
        color,
        1,
    );
}

/// Burns the evidence header onto a snapshot: `<label> @ <timestamp>` and
/// `Location: <location>` in the top-left corner.
pub fn annotate_evidence(frame: &mut Frame, label: &str, timestamp: &str, location: &str, color: [u8; 3]) {
    draw_text(frame, &format!("{label} @ {timestamp}"), 10, 25, color, 1);
    draw_text(frame, &format!("Location: {location}"), 10, 50, color, 1);
}

/// Axis-aligned rectangle outline. Coordinates may extend past the frame
/// edges; out-of-bounds pixels are dropped by `Frame::put_pixel`.
pub fn draw_rect(frame: &mut Frame, x: i32, y: i32, width: i32, height: i32, color: [u8; 3]) {
    for t in 0..RECT_THICKNESS {
        for dx in 0..width {
            frame.put_pixel(x + dx, y + t, color);
            frame.put_pixel(x + dx, y + height - 1 - t, color);
        }
        for dy in 0..height {
            frame.put_pixel(x + t, y + dy, color);
            frame.put_pixel(x + width - 1 - t, y + dy, color);
        }
    }
}

/// Renders text with a built-in 5x7 bitmap font.
///
/// Lowercase letters render as uppercase; characters without a glyph
/// advance the cursor without drawing.
pub fn draw_text(frame: &mut Frame, text: &str, x: i32, y: i32, color: [u8; 3], scale: i32) {
    let scale = scale.max(1);
    let advance = (GLYPH_WIDTH + 1) * scale;
    let mut cursor = x;
    for ch in text.chars() {
        if let Some(rows) = glyph(ch.to_ascii_uppercase()) {
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                        continue;
                    }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            frame.put_pixel(
                                cursor + col * scale + sx,
                                y + row as i32 * scale + sy,
                                color,
                            );
                        }
                    }
                }
            }
        }
        cursor += advance;
    }
}

/// 5x7 glyph rows, most significant of the low 5 bits on the left.
fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x0A, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x1B, 0x11],
        'X' => [0x11, 0x0A, 0x04, 0x04, 0x04, 0x0A, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        ':' => [0x00, 0x04, 0x04, 0x00, 0x04, 0x04, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x06, 0x06],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x06, 0x04, 0x08],
        '[' => [0x0E, 0x08, 0x08, 0x08, 0x08, 0x08, 0x0E],
        ']' => [0x0E, 0x02, 0x02, 0x02, 0x02, 0x02, 0x0E],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        '@' => [0x0E, 0x11, 0x17, 0x15, 0x17, 0x10, 0x0E],
        '%' => [0x19, 0x1A, 0x02, 0x04, 0x08, 0x0B, 0x13],
        '/' => [0x01, 0x02, 0x02, 0x04, 0x08, 0x08, 0x10],
        '?' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
        _ => return None,
    };
    Some(rows)
}
