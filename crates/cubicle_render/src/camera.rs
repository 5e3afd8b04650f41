use glam::{Mat4, Vec2};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Orthographic camera over a y-down world: screen top is the smaller y.
pub struct Camera2D {
    pub position: Vec2,
    pub zoom: f32,
    pub viewport: (u32, u32),
}

impl Camera2D {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            viewport: (viewport_width, viewport_height),
        }
    }

    /// Camera whose top-left corner sits on the world origin. `scale` is the
    /// window's physical-to-logical factor, so one world unit is one logical
    /// pixel on any display.
    pub fn anchored_top_left(viewport_width: u32, viewport_height: u32, scale: f32) -> Self {
        let mut camera = Self::new(viewport_width, viewport_height);
        if scale > 0.0 {
            camera.zoom = scale;
        }
        camera.position = camera.half_extents();
        camera
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(
            self.viewport.0 as f32 / (2.0 * self.zoom),
            self.viewport.1 as f32 / (2.0 * self.zoom),
        )
    }

    pub fn projection(&self) -> Mat4 {
        let half = self.half_extents();
        Mat4::orthographic_rh(
            self.position.x - half.x,
            self.position.x + half.x,
            self.position.y + half.y,
            self.position.y - half.y,
            -1.0,
            1.0,
        )
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.projection().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn to_ndc(camera: &Camera2D, x: f32, y: f32) -> Vec2 {
        let clip = camera.projection() * Vec4::new(x, y, 0.0, 1.0);
        Vec2::new(clip.x / clip.w, clip.y / clip.w)
    }

    #[test]
    fn top_left_anchor_maps_world_origin_to_screen_top_left() {
        let camera = Camera2D::anchored_top_left(800, 600, 1.0);
        let ndc = to_ndc(&camera, 0.0, 0.0);
        assert!((ndc.x + 1.0).abs() < 1e-5);
        assert!((ndc.y - 1.0).abs() < 1e-5);

        let ndc = to_ndc(&camera, 800.0, 600.0);
        assert!((ndc.x - 1.0).abs() < 1e-5);
        assert!((ndc.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn hidpi_anchor_keeps_logical_view() {
        let camera = Camera2D::anchored_top_left(1600, 1200, 2.0);
        assert_eq!(camera.half_extents(), Vec2::new(400.0, 300.0));

        let ndc = to_ndc(&camera, 0.0, 0.0);
        assert!((ndc.x + 1.0).abs() < 1e-5);
        assert!((ndc.y - 1.0).abs() < 1e-5);

        let ndc = to_ndc(&camera, 800.0, 600.0);
        assert!((ndc.x - 1.0).abs() < 1e-5);
        assert!((ndc.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn non_positive_scale_falls_back_to_unit_zoom() {
        let camera = Camera2D::anchored_top_left(800, 600, 0.0);
        assert_eq!(camera.zoom, 1.0);
        assert_eq!(camera.position, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn zoom_shrinks_visible_extent() {
        let mut camera = Camera2D::new(800, 600);
        camera.zoom = 2.0;
        assert_eq!(camera.half_extents(), Vec2::new(200.0, 150.0));
    }
}
