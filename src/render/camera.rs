use glam::{Mat4, Vec3};

use crate::settings::CameraSettings;

/// Fixed perspective camera looking at the overlay.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    aspect: f32,
}

impl Camera {
    pub fn new(settings: &CameraSettings, width: u32, height: u32) -> Self {
        let mut camera = Self {
            position: Vec3::from(settings.eye),
            target: Vec3::from(settings.target),
            up: Vec3::Y,
            fov_y: settings.fov_degrees.to_radians(),
            near: settings.near_plane,
            far: settings.far_plane,
            aspect: 16.0 / 9.0,
        };
        camera.set_aspect(width as f32, height as f32);
        camera
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Ignored for zero-height (minimized) surfaces.
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_follows_surface_size() {
        let mut camera = Camera::new(&CameraSettings::default(), 800, 600);
        assert_eq!(camera.aspect(), 800.0 / 600.0);
        camera.set_aspect(1200.0, 900.0);
        assert_eq!(camera.aspect(), 1200.0 / 900.0);
        camera.set_aspect(1200.0, 0.0);
        assert_eq!(camera.aspect(), 1200.0 / 900.0);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let camera = Camera::new(&CameraSettings::default(), 1280, 720);
        let clip = camera.view_projection() * Vec3::ZERO.extend(1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn far_edge_of_grid_is_above_near_edge() {
        // Eye sits at -Z looking toward +Z, so the z = +0.5 edge is farther away
        // and lands higher on screen.
        let camera = Camera::new(&CameraSettings::default(), 1000, 1000);
        let vp = camera.view_projection();
        let project = |p: Vec3| {
            let c = vp * p.extend(1.0);
            c.y / c.w
        };
        assert!(project(Vec3::new(0.0, 0.0, 0.5)) > project(Vec3::new(0.0, 0.0, -0.25)));
    }
}
