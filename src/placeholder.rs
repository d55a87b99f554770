//! The generated stand-in for a thumbnail that could not be rendered: a
//! diagonal gradient with a picture glyph on top.

use egui::epaint::{Mesh, StrokeKind};
use egui::{Align2, Color32, FontId, Pos2, Rect, Shape, Stroke, pos2};

pub const GRADIENT_START: Color32 = Color32::from_rgb(0x66, 0x7e, 0xea);
pub const GRADIENT_END: Color32 = Color32::from_rgb(0x76, 0x4b, 0xa2);

const GLYPH_SIZE: f32 = 40.0;
const GLYPH_STROKE: f32 = 2.0;

fn lerp_channel(a: u8, b: u8, t: f32) -> u8 {
    (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8
}

/// Gradient color at `t` in `0..=1` from [`GRADIENT_START`] to [`GRADIENT_END`].
pub fn gradient_color(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    Color32::from_rgb(
        lerp_channel(GRADIENT_START.r(), GRADIENT_END.r(), t),
        lerp_channel(GRADIENT_START.g(), GRADIENT_END.g(), t),
        lerp_channel(GRADIENT_START.b(), GRADIENT_END.b(), t),
    )
}

/// A 135° gradient filling `rect`: start color top-left, end color bottom-right.
pub fn gradient_mesh(rect: Rect) -> Mesh {
    let mid = gradient_color(0.5);
    let mut mesh = Mesh::default();
    mesh.colored_vertex(rect.left_top(), GRADIENT_START);
    mesh.colored_vertex(rect.right_top(), mid);
    mesh.colored_vertex(rect.right_bottom(), GRADIENT_END);
    mesh.colored_vertex(rect.left_bottom(), mid);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    mesh
}

/// Outline of a framed picture (sun and mountain) centered at `center`.
pub fn glyph_shapes(center: Pos2, color: Color32) -> Vec<Shape> {
    let scale = GLYPH_SIZE / 24.0;
    let origin = center - egui::vec2(GLYPH_SIZE, GLYPH_SIZE) / 2.0;
    let at = |x: f32, y: f32| origin + egui::vec2(x, y) * scale;
    let stroke = Stroke::new(GLYPH_STROKE, color);

    vec![
        Shape::rect_stroke(
            Rect::from_min_max(at(3.0, 3.0), at(21.0, 21.0)),
            2.0 * scale,
            stroke,
            StrokeKind::Middle,
        ),
        Shape::circle_stroke(at(8.5, 8.5), 1.5 * scale, stroke),
        Shape::line(
            vec![at(21.0, 15.0), at(16.0, 10.0), at(5.0, 21.0)],
            stroke,
        ),
    ]
}

/// Paint the full placeholder into `rect`.
pub fn paint(painter: &egui::Painter, rect: Rect) {
    painter.add(Shape::mesh(gradient_mesh(rect)));
    let glyph_center = pos2(rect.center().x, rect.center().y - 8.0);
    painter.extend(glyph_shapes(glyph_center, Color32::WHITE));
    painter.text(
        pos2(rect.center().x, glyph_center.y + GLYPH_SIZE / 2.0 + 12.0),
        Align2::CENTER_CENTER,
        "Preview",
        FontId::proportional(12.0),
        Color32::WHITE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_endpoints() {
        assert_eq!(gradient_color(0.0), GRADIENT_START);
        assert_eq!(gradient_color(1.0), GRADIENT_END);
        assert_eq!(gradient_color(-3.0), GRADIENT_START);
        assert_eq!(gradient_color(2.0), GRADIENT_END);
    }

    #[test]
    fn mesh_runs_corner_to_corner() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 80.0));
        let mesh = gradient_mesh(rect);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);

        let top_left = mesh.vertices.iter().find(|v| v.pos == rect.left_top()).unwrap();
        let bottom_right = mesh
            .vertices
            .iter()
            .find(|v| v.pos == rect.right_bottom())
            .unwrap();
        assert_eq!(top_left.color, GRADIENT_START);
        assert_eq!(bottom_right.color, GRADIENT_END);
    }

    #[test]
    fn glyph_is_centered() {
        let center = pos2(50.0, 50.0);
        let shapes = glyph_shapes(center, Color32::WHITE);
        assert_eq!(shapes.len(), 3);
        let bounds = shapes
            .iter()
            .map(Shape::visual_bounding_rect)
            .reduce(|a, b| a.union(b))
            .unwrap();
        assert!(bounds.contains(center));
        assert!(bounds.width() <= GLYPH_SIZE + 2.0 * GLYPH_STROKE);
    }
}
