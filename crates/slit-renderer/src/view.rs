//! Orthographic view of the 2D scene

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

/// View uniform for GPU
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct ViewUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Maps scene pixels (origin top-left, y down) onto the window,
/// letterboxed so the whole scene stays visible at its own aspect ratio
pub struct SceneView {
    pub scene_size: Vec2,
    pub viewport: Vec2,
}

impl SceneView {
    pub fn new(scene_width: u32, scene_height: u32, width: u32, height: u32) -> Self {
        Self {
            scene_size: Vec2::new(scene_width as f32, scene_height as f32),
            viewport: Vec2::new(width.max(1) as f32, height.max(1) as f32),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width.max(1) as f32, height.max(1) as f32);
    }

    /// Window pixels per scene pixel
    pub fn scale(&self) -> f32 {
        (self.viewport.x / self.scene_size.x).min(self.viewport.y / self.scene_size.y)
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        let visible = self.viewport / self.scale();
        let min = (self.scene_size - visible) * 0.5;
        let max = min + visible;
        // Swapped bottom/top flips y so that row 0 is at the top
        Mat4::orthographic_rh(min.x, max.x, max.y, min.y, -1.0, 1.0)
    }

    pub fn to_uniform(&self) -> ViewUniform {
        ViewUniform {
            view_proj: self.build_view_projection_matrix().to_cols_array_2d(),
        }
    }
}
