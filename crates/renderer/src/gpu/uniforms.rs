use bytemuck::{Pod, Zeroable};

/// CPU-side mirror of the `SceneParams` uniform block shared by both
/// pipelines. std140 rounds the block up to 16 bytes, hence the padding.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct SceneUniforms {
    resolution: [f32; 2],
    _padding: [f32; 2],
}

unsafe impl Zeroable for SceneUniforms {}
unsafe impl Pod for SceneUniforms {}

impl SceneUniforms {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            resolution: [width as f32, height as f32],
            _padding: [0.0; 2],
        }
    }

    pub(crate) fn set_resolution(&mut self, width: f32, height: f32) {
        self.resolution = [width, height];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_is_std140_sized() {
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 16);
    }
}
