use std::f32::consts::TAU;

/// Number of perimeter segments in the unit-circle fan.
pub(crate) const CIRCLE_SEGMENTS: u32 = 36;

/// Fixed fan approximating the unit circle: a center vertex plus
/// `segments + 1` perimeter samples, the first repeated to close the loop.
///
/// wgpu has no triangle-fan topology, so the fan is drawn as an indexed
/// triangle list over the same vertex set, every triangle anchored at the
/// center vertex.
pub(crate) struct UnitCircleMesh {
    pub vertices: Vec<[f32; 2]>,
    pub indices: Vec<u16>,
}

impl UnitCircleMesh {
    pub(crate) fn generate(segments: u32) -> Self {
        let mut vertices = Vec::with_capacity(segments as usize + 2);
        vertices.push([0.0, 0.0]);
        for i in 0..=segments {
            let angle = TAU * i as f32 / segments as f32;
            vertices.push([angle.cos(), angle.sin()]);
        }

        let mut indices = Vec::with_capacity(segments as usize * 3);
        for i in 0..segments as u16 {
            indices.extend_from_slice(&[0, i + 1, i + 2]);
        }

        Self { vertices, indices }
    }

    pub(crate) fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_has_center_plus_closed_perimeter() {
        let mesh = UnitCircleMesh::generate(CIRCLE_SEGMENTS);
        assert_eq!(mesh.vertices.len(), CIRCLE_SEGMENTS as usize + 2);
        assert_eq!(mesh.vertices[0], [0.0, 0.0]);
        // The perimeter loop closes on itself.
        let first = mesh.vertices[1];
        let last = *mesh.vertices.last().unwrap();
        assert!((first[0] - last[0]).abs() < 1e-5);
        assert!((first[1] - last[1]).abs() < 1e-5);
    }

    #[test]
    fn perimeter_points_lie_on_the_unit_circle() {
        let mesh = UnitCircleMesh::generate(CIRCLE_SEGMENTS);
        for vertex in &mesh.vertices[1..] {
            let radius = (vertex[0] * vertex[0] + vertex[1] * vertex[1]).sqrt();
            assert!((radius - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn triangulation_is_a_fan_around_the_center() {
        let mesh = UnitCircleMesh::generate(CIRCLE_SEGMENTS);
        assert_eq!(mesh.indices.len(), CIRCLE_SEGMENTS as usize * 3);
        for (i, triangle) in mesh.indices.chunks(3).enumerate() {
            assert_eq!(triangle[0], 0);
            assert_eq!(triangle[1], i as u16 + 1);
            assert_eq!(triangle[2], i as u16 + 2);
        }
    }
}
