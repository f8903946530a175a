use bytemuck::{Pod, Zeroable};

use crate::chain::Chain;
use crate::color::hsb_to_rgb;

/// Color law for the chain: hue sweeps 0→1 from head to tail.
const CHAIN_SATURATION: f32 = 0.8;
const CHAIN_BRIGHTNESS: f32 = 1.0;

/// Circle radius law: the head-most instance is the largest.
const HEAD_RADIUS: f32 = 20.0;
const TAIL_RADIUS: f32 = 5.0;

/// One line-strip vertex per chain point.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub(crate) struct LineVertex {
    position: [f32; 2],
    color: [f32; 3],
}

unsafe impl Zeroable for LineVertex {}
unsafe impl Pod for LineVertex {}

impl LineVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x3];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// One circle instance per chain point; attributes advance per instance.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub(crate) struct CircleInstance {
    position: [f32; 2],
    color: [f32; 3],
    radius: f32,
}

unsafe impl Zeroable for CircleInstance {}
unsafe impl Pod for CircleInstance {}

impl CircleInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![1 => Float32x2, 2 => Float32x3, 3 => Float32];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Vertex layout of the static unit-circle mesh (location 0 only).
pub(crate) fn circle_mesh_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 2]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

/// Builds the line-strip vertices for the current chain, hue swept along
/// the index fraction.
pub(crate) fn line_vertices(chain: &Chain) -> Vec<LineVertex> {
    let count = chain.len();
    chain
        .points()
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let hue = index as f32 / count as f32;
            LineVertex {
                position: point.to_array(),
                color: hsb_to_rgb(hue, CHAIN_SATURATION, CHAIN_BRIGHTNESS),
            }
        })
        .collect()
}

/// Builds the circle instances for the current chain: same hue sweep as the
/// line pass, radius interpolated from head to tail.
pub(crate) fn circle_instances(chain: &Chain) -> Vec<CircleInstance> {
    let count = chain.len();
    chain
        .points()
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let fraction = index as f32 / count as f32;
            CircleInstance {
                position: point.to_array(),
                color: hsb_to_rgb(fraction, CHAIN_SATURATION, CHAIN_BRIGHTNESS),
                radius: HEAD_RADIUS + (TAIL_RADIUS - HEAD_RADIUS) * fraction,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn chain_of(count: usize) -> Chain {
        let mut chain = Chain::new();
        for i in 0..count {
            chain.push(Vec2::new(i as f32 * 10.0, i as f32 * 5.0));
        }
        chain
    }

    #[test]
    fn one_vertex_and_instance_per_chain_point() {
        let chain = chain_of(7);
        assert_eq!(line_vertices(&chain).len(), 7);
        assert_eq!(circle_instances(&chain).len(), 7);
    }

    #[test]
    fn empty_chain_derives_nothing() {
        let chain = Chain::new();
        assert!(line_vertices(&chain).is_empty());
        assert!(circle_instances(&chain).is_empty());
    }

    #[test]
    fn radius_interpolates_from_head_to_tail() {
        let instances = circle_instances(&chain_of(4));
        assert_eq!(instances[0].radius, 20.0);
        assert_eq!(instances[1].radius, 16.25);
        assert_eq!(instances[2].radius, 12.5);
        assert_eq!(instances[3].radius, 8.75);
    }

    #[test]
    fn hue_sweeps_by_index_fraction() {
        let chain = chain_of(4);
        let vertices = line_vertices(&chain);
        for (index, vertex) in vertices.iter().enumerate() {
            let expected = hsb_to_rgb(index as f32 / 4.0, CHAIN_SATURATION, CHAIN_BRIGHTNESS);
            assert_eq!(vertex.color, expected);
        }
    }

    #[test]
    fn line_and_circle_passes_share_the_color_law() {
        let chain = chain_of(5);
        let vertices = line_vertices(&chain);
        let instances = circle_instances(&chain);
        for (vertex, instance) in vertices.iter().zip(&instances) {
            assert_eq!(vertex.color, instance.color);
            assert_eq!(vertex.position, instance.position);
        }
    }

    #[test]
    fn gpu_structs_have_tight_layout() {
        assert_eq!(std::mem::size_of::<LineVertex>(), 20);
        assert_eq!(std::mem::size_of::<CircleInstance>(), 24);
    }
}
