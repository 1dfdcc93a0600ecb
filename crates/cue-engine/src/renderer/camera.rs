use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Quat, Vec3, Vec4};

/// Default eye offset from the orbit target.
pub const DEFAULT_OFFSET: Vec3 = Vec3::new(-3.0, 0.98, 0.0);

/// A world-space ray with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Intersection with the horizontal plane `y = height`, if it lies ahead of the origin.
    pub fn intersect_horizontal_plane(&self, height: f32) -> Option<Vec3> {
        if self.dir.y.abs() < 1e-6 {
            return None;
        }
        let t = (height - self.origin.y) / self.dir.y;
        if t < 0.0 {
            return None;
        }
        Some(self.at(t))
    }
}

/// Perspective camera orbiting a target (the active ball).
/// The eye sits at `target + offset`; mouse motion rotates the offset around `up`.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Vector from the target to the eye.
    pub offset: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Radians of orbit per pixel of horizontal mouse motion.
    pub sensitivity: f32,
    /// Smoothing factor for `follow` (0.0 = instant, 1.0 = never moves).
    pub smoothing: f32,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// View matrix without translation, for the skybox.
    pub skybox_view: [[f32; 4]; 4],
    /// Eye position (w = 1).
    pub eye: [f32; 4],
}

impl CameraUniform {
    pub const FLOATS: usize = 52;
}

impl OrbitCamera {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            target: Vec3::ZERO,
            offset: DEFAULT_OFFSET,
            up: Vec3::Y,
            fov_y: 45f32.to_radians(),
            near: 1.0,
            far: 10000.0,
            viewport_width,
            viewport_height,
            sensitivity: 0.005,
            smoothing: 0.0,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.target + self.offset
    }

    pub fn aspect(&self) -> f32 {
        if self.viewport_height > 0.0 {
            self.viewport_width / self.viewport_height
        } else {
            1.0
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, self.up)
    }

    /// OpenGL-style perspective (clip z in [-1, 1]).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect(), self.near, self.far)
    }

    /// The view matrix with its translation removed.
    pub fn skybox_view_matrix(&self) -> Mat4 {
        Mat4::from_mat3(Mat3::from_mat4(self.view_matrix()))
    }

    /// Orbit the eye around the target's vertical axis by a mouse delta in pixels.
    pub fn rotate_around_target(&mut self, x_offset: f32) {
        let angle = -x_offset * self.sensitivity;
        self.offset = Quat::from_axis_angle(self.up, angle) * self.offset;
    }

    /// Jump the orbit target, keeping the current eye offset.
    pub fn move_to(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Move the target toward `target`, smoothed when `smoothing > 0`.
    pub fn follow(&mut self, target: Vec3, dt: f32) {
        if self.smoothing <= 0.0 {
            self.move_to(target);
        } else {
            let lerp_factor = 1.0 - self.smoothing.powf(dt * 60.0);
            self.target += (target - self.target) * lerp_factor;
        }
    }

    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = smoothing.clamp(0.0, 0.99);
    }

    /// Update the viewport (e.g. on window resize). Zero sizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport_width = width;
            self.viewport_height = height;
        }
    }

    /// Ray from the eye through a pixel (origin top-left, y down).
    /// `None` when the viewport is empty or the view-projection is singular.
    pub fn screen_to_ray(&self, x: f32, y: f32) -> Option<Ray> {
        if self.viewport_width <= 0.0 || self.viewport_height <= 0.0 {
            return None;
        }
        let ndc_x = 2.0 * x / self.viewport_width - 1.0;
        let ndc_y = 1.0 - 2.0 * y / self.viewport_height;

        let view_proj = self.projection_matrix() * self.view_matrix();
        let det = view_proj.determinant();
        if det.abs() < f32::EPSILON || !det.is_finite() {
            return None;
        }
        let inv = view_proj.inverse();

        let near = unproject(inv, Vec4::new(ndc_x, ndc_y, -1.0, 1.0))?;
        let far = unproject(inv, Vec4::new(ndc_x, ndc_y, 1.0, 1.0))?;
        let dir = (far - near).try_normalize()?;
        Some(Ray { origin: near, dir })
    }

    pub fn uniform(&self) -> CameraUniform {
        let eye = self.eye();
        CameraUniform {
            view: self.view_matrix().to_cols_array_2d(),
            projection: self.projection_matrix().to_cols_array_2d(),
            skybox_view: self.skybox_view_matrix().to_cols_array_2d(),
            eye: [eye.x, eye.y, eye.z, 1.0],
        }
    }
}

fn unproject(inv_view_proj: Mat4, clip: Vec4) -> Option<Vec3> {
    let p = inv_view_proj * clip;
    if p.w.abs() < f32::EPSILON {
        return None;
    }
    Some(p.truncate() / p.w)
}
