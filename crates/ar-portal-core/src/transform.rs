//! Poses and transforms used by the placement and occlusion logic.
//!
//! Everything here is plain `glam` data; the host engine owns the actual
//! scene nodes and copies these values onto them.

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A world-space position and orientation, e.g. a hit-test result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position in world space.
    pub position: Vec3,
    /// Orientation as a unit quaternion.
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    /// Creates a pose from a position and orientation.
    #[must_use]
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation: orientation.normalize(),
        }
    }

    /// Creates an unrotated pose at `position`.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Decomposes a rigid transformation matrix, discarding any scale.
    ///
    /// Hit-test services usually report their result this way.
    #[must_use]
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (_, orientation, position) = matrix.to_scale_rotation_translation();
        Self::new(position, orientation)
    }

    /// Rotation about the world Y axis, in radians.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        yaw_of(self.orientation)
    }

    /// Local +Z axis expressed in world space.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }

    /// Converts to a transform with unit scale.
    #[must_use]
    pub fn to_transform(&self) -> Transform {
        Transform {
            translation: self.position,
            rotation: self.orientation,
            scale: Vec3::ONE,
        }
    }
}

/// A transformation represented as separate components.
///
/// The reticle is edited one component at a time, so the decomposed form is
/// what the state machine mutates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Translation component.
    pub translation: Vec3,
    /// Rotation component as a quaternion.
    pub rotation: Quat,
    /// Scale component.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Creates a new identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Creates a transform from a translation.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Creates a transform from a rotation.
    #[must_use]
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    /// Creates a transform from a Mat4.
    ///
    /// This decomposition may not be exact for matrices with shear.
    #[must_use]
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Converts this transform to a Mat4.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Drops the scale, keeping position and orientation.
    #[must_use]
    pub fn pose(&self) -> Pose {
        Pose {
            position: self.translation,
            orientation: self.rotation,
        }
    }

    /// Rotation about the world Y axis, in radians.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        yaw_of(self.rotation)
    }

    /// Translates the transform in world space.
    pub fn translate(&mut self, delta: Vec3) {
        self.translation += delta;
    }

    /// Translates the transform along its own rotated axes.
    pub fn translate_local(&mut self, delta: Vec3) {
        self.translation += self.rotation * delta;
    }

    /// Rotates the transform (pre-multiplied, i.e. in world space).
    pub fn rotate(&mut self, delta: Quat) {
        self.rotation = (delta * self.rotation).normalize();
    }

    /// Rotates the transform about the world Y axis.
    pub fn rotate_yaw(&mut self, angle: f32) {
        self.rotate(Quat::from_rotation_y(angle));
    }

    /// Applies this transform to a point.
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * point)
    }

    /// Composes a child transform expressed in this transform's space.
    ///
    /// Exact as long as this transform's scale is uniform.
    #[must_use]
    pub fn compose(&self, child: &Transform) -> Transform {
        Transform {
            translation: self.transform_point(child.translation),
            rotation: (self.rotation * child.rotation).normalize(),
            scale: self.scale * child.scale,
        }
    }
}

/// A world coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    #[default]
    Z,
}

impl Axis {
    /// Returns the unit vector for this axis.
    #[must_use]
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    /// Picks this axis' component out of `v`.
    #[must_use]
    pub fn component(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

fn yaw_of(rotation: Quat) -> f32 {
    let (yaw, _, _) = rotation.to_euler(EulerRot::YXZ);
    yaw
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_transform_matrix_roundtrip() {
        let t = Transform {
            translation: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_y(0.3),
            scale: Vec3::new(2.0, 0.5, 1.0),
        };
        let back = Transform::from_matrix(t.to_matrix());
        assert!((back.translation - t.translation).length() < 1e-5);
        assert!((back.scale - t.scale).length() < 1e-5);
    }

    #[test]
    fn test_rotate_yaw_accumulates() {
        let mut t = Transform::identity();
        for _ in 0..10 {
            t.rotate_yaw(0.01);
        }
        assert!((t.yaw() - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_translate_local_follows_rotation() {
        let mut t = Transform::from_rotation(Quat::from_rotation_y(FRAC_PI_2));
        t.translate_local(Vec3::Z);
        assert!((t.translation - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_compose_matches_matrix_product() {
        let parent = Transform {
            translation: Vec3::new(0.0, 1.0, -2.0),
            rotation: Quat::from_rotation_y(0.7),
            scale: Vec3::ONE,
        };
        let child = Transform {
            translation: Vec3::new(3.5, -1.0, 0.25),
            rotation: Quat::from_rotation_z(FRAC_PI_2),
            scale: Vec3::ONE,
        };
        let composed = parent.compose(&child).to_matrix();
        let expected = parent.to_matrix() * child.to_matrix();
        assert!(composed.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_pose_from_matrix_drops_scale() {
        let m = Mat4::from_scale_rotation_translation(
            Vec3::splat(3.0),
            Quat::from_rotation_y(1.0),
            Vec3::new(1.0, 0.0, 2.0),
        );
        let pose = Pose::from_matrix(m);
        assert!((pose.position - Vec3::new(1.0, 0.0, 2.0)).length() < 1e-5);
        assert!((pose.yaw() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_axis_component() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Axis::X.component(v), 1.0);
        assert_eq!(Axis::Y.component(v), 2.0);
        assert_eq!(Axis::Z.component(v), 3.0);
        assert_eq!(Axis::default(), Axis::Z);
    }
}
