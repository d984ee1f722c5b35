//! Draw parameters handed to a rendering backend, and the egui backend.

use eframe::egui::{self, Color32, Mesh, Pos2, Shape, Stroke};

use crate::geometry::{HeartTransform, Point, STROKE_WIDTH, heart_center, heart_outline};
use crate::random::{Gradient, Rgb};

/// Everything needed to draw one heart: placement, rotation, size, alpha and colors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeartDraw {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, clockwise, about the heart's center.
    pub angle: f64,
    /// Alpha in `0.0..=1.0`.
    pub opacity: f64,
    pub fill: Gradient,
    pub stroke: Rgb,
}

impl HeartDraw {
    pub fn transform(&self) -> HeartTransform {
        HeartTransform::new(self.left, self.top, self.width, self.height, self.angle)
    }
}

/// Receives one draw call per live heart.
pub trait RenderSink {
    fn draw_heart(&mut self, heart: &HeartDraw);
}

/// Collects draw calls instead of rendering them.
impl RenderSink for Vec<HeartDraw> {
    fn draw_heart(&mut self, heart: &HeartDraw) {
        self.push(*heart);
    }
}

/// Paints hearts onto an egui layer.
pub struct PainterSink<'a> {
    painter: &'a egui::Painter,
}

impl<'a> PainterSink<'a> {
    pub fn new(painter: &'a egui::Painter) -> Self {
        Self { painter }
    }
}

impl RenderSink for PainterSink<'_> {
    fn draw_heart(&mut self, heart: &HeartDraw) {
        if heart.opacity <= 0.0 {
            return;
        }
        let transform = heart.transform();
        self.painter.add(Shape::mesh(heart_mesh(heart, &transform)));

        let outline = heart_outline()
            .iter()
            .map(|p| to_pos(transform.apply(*p)))
            .collect();
        let width = (STROKE_WIDTH * transform.stroke_scale()) as f32;
        let color = with_opacity(heart.stroke, heart.opacity);
        self.painter.add(Shape::closed_line(outline, Stroke::new(width, color)));
    }
}

/// Fan-triangulated fill with the gradient laid out as two rings around the center.
fn heart_mesh(heart: &HeartDraw, transform: &HeartTransform) -> Mesh {
    let [inner, middle, outer] = heart.fill.stops;
    let inner_color = with_opacity(inner.color, heart.opacity);
    let middle_color = with_opacity(middle.color, heart.opacity);
    let outer_color = with_opacity(outer.color, heart.opacity);

    let center = heart_center();
    let outline = heart_outline();
    let mut mesh = Mesh::default();
    mesh.colored_vertex(to_pos(transform.apply(center)), inner_color);
    for p in outline {
        let ring = lerp(center, *p, f64::from(middle.offset));
        mesh.colored_vertex(to_pos(transform.apply(ring)), middle_color);
        mesh.colored_vertex(to_pos(transform.apply(*p)), outer_color);
    }

    let count = outline.len() as u32;
    for i in 0..count {
        let j = (i + 1) % count;
        let (ring_i, edge_i) = (1 + 2 * i, 2 + 2 * i);
        let (ring_j, edge_j) = (1 + 2 * j, 2 + 2 * j);
        mesh.add_triangle(0, ring_i, ring_j);
        mesh.add_triangle(ring_i, edge_i, edge_j);
        mesh.add_triangle(ring_i, edge_j, ring_j);
    }
    mesh
}

fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

fn to_pos(p: Point) -> Pos2 {
    Pos2::new(p.x as f32, p.y as f32)
}

fn with_opacity(color: Rgb, opacity: f64) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b).gamma_multiply(opacity.clamp(0.0, 1.0) as f32)
}
