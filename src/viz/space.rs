//! Math for the 3D view: vectors, a yaw/pitch fly camera, perspective
//! projection onto the canvas, node placement, and the fly-to animation.
//!
//! Conventions follow a right-handed space with `+y` up: a camera at rest
//! (yaw 0, pitch 0) looks down `-z`.

pub const SCENE_RADIUS: f64 = 30.0;
pub const CAMERA_START: Vec3 = Vec3 {
    x: 0.0,
    y: 10.0,
    z: 50.0,
};
pub const FOV_Y_RADIANS: f64 = 75.0 * std::f64::consts::PI / 180.0;
pub const NEAR_PLANE: f64 = 0.1;
pub const MOVE_SPEED: f64 = 0.5;
pub const FAST_MOVE_SPEED: f64 = 2.0;
pub const FLY_TO_DURATION_MS: f64 = 1000.0;
/// World-space offset from a selected node to the fly-to destination.
pub const FLY_TO_BACKOFF_Z: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3 { x, y, z }
    }

    pub fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(self, factor: f64) -> Vec3 {
        Vec3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len <= f64::EPSILON {
            Vec3::default()
        } else {
            self.scale(1.0 / len)
        }
    }

    pub fn lerp(self, target: Vec3, t: f64) -> Vec3 {
        self.add(target.sub(self).scale(t))
    }
}

/// A point on a sphere of `radius` around the origin. `theta` ranges over
/// `[0, 2pi)`, `phi` over `[0, pi)`; callers supply the random samples.
pub fn sphere_position(radius: f64, theta: f64, phi: f64) -> Vec3 {
    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    )
}

/// Sphere radius for a node, grown by extraction confidence.
pub fn node_radius(confidence: f64) -> f64 {
    let confidence = if confidence.is_finite() { confidence } else { 0.5 };
    0.5 + confidence * 1.5
}

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    /// Rotation around `+y`; zero faces `-z`.
    pub yaw: f64,
    /// Elevation; positive looks up.
    pub pitch: f64,
}

impl Camera {
    pub fn new() -> Self {
        Camera {
            position: CAMERA_START,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
    }

    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }

    fn up(&self) -> Vec3 {
        let f = self.forward();
        let r = self.right();
        // up = right x forward
        Vec3::new(
            r.y * f.z - r.z * f.y,
            r.z * f.x - r.x * f.z,
            r.x * f.y - r.y * f.x,
        )
    }

    /// Points the camera at `target` by solving yaw and pitch.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = target.sub(self.position).normalized();
        self.pitch = dir.y.clamp(-1.0, 1.0).asin();
        self.yaw = dir.x.atan2(-dir.z);
    }

    /// Projects a world point to canvas pixels. Returns `None` when the point
    /// is behind the near plane. The third component is the camera-space
    /// depth, used for size attenuation and painter's-order sorting.
    pub fn project(&self, point: Vec3, width: f64, height: f64) -> Option<(f64, f64, f64)> {
        let d = point.sub(self.position);
        let depth = d.dot(self.forward());
        if depth <= NEAR_PLANE {
            return None;
        }
        let x = d.dot(self.right());
        let y = d.dot(self.up());
        let focal = (height / 2.0) / (FOV_Y_RADIANS / 2.0).tan();
        Some((
            width / 2.0 + x * focal / depth,
            height / 2.0 - y * focal / depth,
            depth,
        ))
    }

    /// On-screen radius of a sphere of `world_radius` at camera depth `depth`.
    pub fn projected_radius(&self, world_radius: f64, depth: f64, height: f64) -> f64 {
        let focal = (height / 2.0) / (FOV_Y_RADIANS / 2.0).tan();
        world_radius * focal / depth
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Linear camera flight toward a selected node, keeping it centered in view.
#[derive(Debug, Clone, Copy)]
pub struct FlyTo {
    from: Vec3,
    to: Vec3,
    /// The node position the camera keeps looking at during the flight.
    pub focus: Vec3,
    started_ms: f64,
}

impl FlyTo {
    /// Starts a flight from `camera` to just in front of `node` along `+z`.
    pub fn toward(camera: &Camera, node: Vec3, now_ms: f64) -> Self {
        FlyTo {
            from: camera.position,
            to: node.add(Vec3::new(0.0, 0.0, FLY_TO_BACKOFF_Z)),
            focus: node,
            started_ms: now_ms,
        }
    }

    /// Camera position at `now_ms` and whether the flight has finished.
    pub fn sample(&self, now_ms: f64) -> (Vec3, bool) {
        let progress = ((now_ms - self.started_ms) / FLY_TO_DURATION_MS).clamp(0.0, 1.0);
        (self.from.lerp(self.to, progress), progress >= 1.0)
    }
}
