//! Shape generation for 2D primitives
//!
//! Everything comes out as a triangle list in field pixels (y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Filled disc whose color is interpolated between radial stops.
///
/// `stops` are `(t, color)` pairs with `t` running 0 (centre) to 1 (edge),
/// in ascending order.
pub fn radial_gradient(
    center: Vec2,
    radius: f32,
    stops: &[(f32, [f32; 4])],
    segments: u32,
) -> Vec<Vertex> {
    if stops.len() < 2 || radius <= 0.0 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity((segments * 6 * stops.len() as u32) as usize);

    for band in stops.windows(2) {
        let (t0, c0) = band[0];
        let (t1, c1) = band[1];
        let (r0, r1) = (radius * t0, radius * t1);

        for i in 0..segments {
            let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
            let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
            let (d1, d2) = (Vec2::from_angle(theta1), Vec2::from_angle(theta2));

            let inner1 = center + d1 * r0;
            let inner2 = center + d2 * r0;
            let outer1 = center + d1 * r1;
            let outer2 = center + d2 * r1;

            // Two triangles per segment
            vertices.push(Vertex::new(inner1.x, inner1.y, c0));
            vertices.push(Vertex::new(outer1.x, outer1.y, c1));
            vertices.push(Vertex::new(inner2.x, inner2.y, c0));

            vertices.push(Vertex::new(inner2.x, inner2.y, c0));
            vertices.push(Vertex::new(outer1.x, outer1.y, c1));
            vertices.push(Vertex::new(outer2.x, outer2.y, c1));
        }
    }

    vertices
}

/// Rectangle with a top-to-bottom color ramp through `stops`
pub fn gradient_rect(pos: Vec2, size: Vec2, stops: &[(f32, [f32; 4])]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(stops.len().saturating_sub(1) * 6);
    let (x0, x1) = (pos.x, pos.x + size.x);

    for band in stops.windows(2) {
        let (t0, c0) = band[0];
        let (t1, c1) = band[1];
        let y0 = pos.y + size.y * t0;
        let y1 = pos.y + size.y * t1;

        vertices.push(Vertex::new(x0, y0, c0));
        vertices.push(Vertex::new(x1, y0, c0));
        vertices.push(Vertex::new(x0, y1, c1));

        vertices.push(Vertex::new(x0, y1, c1));
        vertices.push(Vertex::new(x1, y0, c0));
        vertices.push(Vertex::new(x1, y1, c1));
    }

    vertices
}

/// Fill a polygon by fanning its outline around `pivot`.
///
/// Works for any outline that is star-shaped with respect to the pivot.
pub fn polygon_fan(outline: &[Vec2], pivot: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let n = outline.len();
    let mut vertices = Vec::with_capacity(n * 3);
    for i in 0..n {
        let a = outline[i];
        let b = outline[(i + 1) % n];
        vertices.push(Vertex::new(pivot.x, pivot.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }
    vertices
}

/// A straight stroke of the given width as a quad
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a1 = a + perp;
    let a2 = a - perp;
    let b1 = b + perp;
    let b2 = b - perp;

    vec![
        Vertex::new(a1.x, a1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b2.x, b2.y, color),
    ]
}

/// Connected strokes through `points`
pub fn polyline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    points
        .windows(2)
        .flat_map(|seg| line(seg[0], seg[1], width, color))
        .collect()
}

/// Outline of a rounded rectangle anchored at the origin, clockwise in
/// screen space. A radius of zero gives the plain four corners.
pub fn rounded_rect_outline(size: Vec2, radius: f32, corner_segments: u32) -> Vec<Vec2> {
    let r = radius.clamp(0.0, size.x.min(size.y) / 2.0);
    if r <= 0.0 || corner_segments == 0 {
        return vec![
            Vec2::ZERO,
            Vec2::new(size.x, 0.0),
            size,
            Vec2::new(0.0, size.y),
        ];
    }

    // Corner centres with the angle each quarter-arc starts at
    let corners = [
        (Vec2::new(size.x - r, r), -PI / 2.0),
        (Vec2::new(size.x - r, size.y - r), 0.0),
        (Vec2::new(r, size.y - r), PI / 2.0),
        (Vec2::new(r, r), PI),
    ];

    let mut points = Vec::with_capacity(corners.len() * (corner_segments as usize + 1));
    for (c, start) in corners {
        for i in 0..=corner_segments {
            let theta = start + (i as f32 / corner_segments as f32) * (PI / 2.0);
            points.push(c + Vec2::from_angle(theta) * r);
        }
    }
    points
}

/// Rotate `points` by `angle` around `pivot` and then shift by `offset`
pub fn transform(points: &mut [Vec2], pivot: Vec2, angle: f32, offset: Vec2) {
    let rot = Vec2::from_angle(angle);
    for p in points.iter_mut() {
        *p = pivot + rot.rotate(*p - pivot) + offset;
    }
}

/// Stroke segments for a capital letter inside a unit box (y down).
/// Unknown characters have no strokes.
pub fn glyph_strokes(ch: char) -> &'static [[Vec2; 2]] {
    const fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }
    const L: &[[Vec2; 2]] = &[[v(0.25, 0.1), v(0.25, 0.9)], [v(0.25, 0.9), v(0.8, 0.9)]];
    const S: &[[Vec2; 2]] = &[
        [v(0.8, 0.1), v(0.2, 0.1)],
        [v(0.2, 0.1), v(0.2, 0.5)],
        [v(0.2, 0.5), v(0.8, 0.5)],
        [v(0.8, 0.5), v(0.8, 0.9)],
        [v(0.8, 0.9), v(0.2, 0.9)],
    ];
    const P: &[[Vec2; 2]] = &[
        [v(0.25, 0.9), v(0.25, 0.1)],
        [v(0.25, 0.1), v(0.75, 0.1)],
        [v(0.75, 0.1), v(0.75, 0.5)],
        [v(0.75, 0.5), v(0.25, 0.5)],
    ];
    const R: &[[Vec2; 2]] = &[
        [v(0.25, 0.9), v(0.25, 0.1)],
        [v(0.25, 0.1), v(0.75, 0.1)],
        [v(0.75, 0.1), v(0.75, 0.5)],
        [v(0.75, 0.5), v(0.25, 0.5)],
        [v(0.45, 0.5), v(0.8, 0.9)],
    ];
    const N: &[[Vec2; 2]] = &[
        [v(0.2, 0.9), v(0.2, 0.1)],
        [v(0.2, 0.1), v(0.8, 0.9)],
        [v(0.8, 0.9), v(0.8, 0.1)],
    ];

    match ch {
        'L' => L,
        'S' => S,
        'P' => P,
        'R' => R,
        'N' => N,
        _ => &[],
    }
}
