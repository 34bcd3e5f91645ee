//! First-person camera / aim model.
//!
//! Owned by the engine. Look deltas mutate yaw and pitch; the forward
//! vector is always derived from the pair, never stored.

use glam::DVec3;

use range_core::constants::*;
use range_core::state::CameraView;
use range_core::types::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Position,
    /// Yaw (radians). `-PI/2` faces downrange.
    pub yaw: f64,
    /// Pitch (radians), kept within `±PITCH_LIMIT`.
    pub pitch: f64,
}

impl Default for Camera {
    fn default() -> Self {
        let [x, y, z] = CAMERA_START;
        Self {
            position: Position::new(x, y, z),
            yaw: CAMERA_DEFAULT_YAW,
            pitch: 0.0,
        }
    }
}

/// Unit direction for a yaw/pitch pair.
pub fn direction(yaw: f64, pitch: f64) -> DVec3 {
    DVec3::new(
        pitch.cos() * yaw.cos(),
        pitch.cos() * yaw.sin(),
        -pitch.sin(),
    )
}

impl Camera {
    /// Apply a relative look motion. Moving the input up aims up.
    pub fn apply_look_delta(&mut self, dx: f64, dy: f64, sensitivity: f64) {
        self.yaw += dx * sensitivity;
        self.pitch += -dy * sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn forward_vector(&self) -> DVec3 {
        direction(self.yaw, self.pitch)
    }

    /// Forward vector perturbed by yaw/pitch offsets (shotgun spread).
    pub fn forward_vector_with_offset(&self, d_yaw: f64, d_pitch: f64) -> DVec3 {
        direction(self.yaw + d_yaw, self.pitch + d_pitch)
    }

    /// Face downrange, level.
    pub fn reset_orientation(&mut self) {
        self.yaw = CAMERA_DEFAULT_YAW;
        self.pitch = 0.0;
    }

    /// Walk along the yaw heading. Height is fixed.
    pub fn move_by(&mut self, forward: f64, strafe: f64) {
        let step = MOVE_SPEED * 0.01;
        let (sin, cos) = self.yaw.sin_cos();
        self.position.x += (forward * cos - strafe * sin) * step;
        self.position.y += (forward * sin + strafe * cos) * step;
    }

    pub fn view(&self) -> CameraView {
        CameraView {
            position: self.position,
            yaw: self.yaw,
            pitch: self.pitch,
            forward: self.forward_vector(),
        }
    }
}
