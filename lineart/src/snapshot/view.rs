use crate::scene::*;

use glam::{DMat4, DVec2, DVec3};

///
/// Projects world space positions onto the screen of a camera
///
/// View space has the camera at the origin looking down the negative Z axis. Screen space runs from -1 to 1 across
/// the computed area: when there's overscan, the camera frame itself is the smaller square from `-frame_extent()` to
/// `frame_extent()`.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewProjection {
    pub projection:         Projection,
    pub camera_to_world:    DMat4,
    pub world_to_view:      DMat4,
    pub clip_start:         f64,
    pub clip_end:           f64,
    pub overscan:           f64,
}

impl ViewProjection {
    ///
    /// Creates the projection for a camera with a world transform
    ///
    pub fn new(camera: &CameraData, camera_to_world: DMat4, overscan: f64) -> ViewProjection {
        ViewProjection {
            projection:         camera.projection,
            camera_to_world:    camera_to_world,
            world_to_view:      camera_to_world.inverse(),
            clip_start:         camera.clip_start,
            clip_end:           camera.clip_end,
            overscan:           overscan,
        }
    }

    ///
    /// True for perspective projections
    ///
    #[inline]
    pub fn is_perspective(&self) -> bool {
        matches!(self.projection, Projection::Perspective { .. })
    }

    ///
    /// Position of the camera in world space
    ///
    #[inline]
    pub fn position(&self) -> DVec3 {
        self.camera_to_world.transform_point3(DVec3::ZERO)
    }

    ///
    /// Direction the camera is looking in world space
    ///
    #[inline]
    pub fn forward(&self) -> DVec3 {
        self.camera_to_world.transform_vector3(DVec3::NEG_Z).normalize_or_zero()
    }

    ///
    /// Converts a world position into view space
    ///
    #[inline]
    pub fn to_view(&self, world: DVec3) -> DVec3 {
        self.world_to_view.transform_point3(world)
    }

    ///
    /// The distance in front of the camera of a view space position
    ///
    #[inline]
    pub fn depth(view: DVec3) -> f64 {
        -view.z
    }

    ///
    /// The half-width of the camera frame in screen space
    ///
    #[inline]
    pub fn frame_extent(&self) -> f64 {
        1.0 / (1.0 + self.overscan)
    }

    ///
    /// Projects a view space position onto the screen
    ///
    #[inline]
    pub fn project(&self, view: DVec3) -> DVec2 {
        let frame = self.frame_extent();

        match self.projection {
            Projection::Perspective { fov_y, aspect } => {
                let half_height = (fov_y * 0.5).tan();
                let half_width  = half_height * aspect;
                let depth       = -view.z;

                DVec2::new(view.x / (depth * half_width), view.y / (depth * half_height)) * frame
            }

            Projection::Orthographic { scale, aspect } => {
                let half_width  = scale * 0.5;
                let half_height = half_width / aspect;

                DVec2::new(view.x / half_width, view.y / half_height) * frame
            }
        }
    }

    ///
    /// Projects a world position onto the screen
    ///
    #[inline]
    pub fn screen_position(&self, world: DVec3) -> DVec2 {
        self.project(self.to_view(world))
    }

    ///
    /// A depth value that varies linearly across the screen, and is larger for positions nearer to the camera
    ///
    #[inline]
    pub fn depth_key(&self, view: DVec3) -> f64 {
        if self.is_perspective() {
            1.0 / (-view.z)
        } else {
            view.z
        }
    }

    ///
    /// A vector pointing from a world position towards the camera
    ///
    #[inline]
    pub fn view_vector(&self, world: DVec3) -> DVec3 {
        if self.is_perspective() {
            self.position() - world
        } else {
            -self.forward()
        }
    }

    ///
    /// Converts a parameter along the projection of a line on the screen into the parameter along the line in world space
    ///
    /// `depth_start` and `depth_end` are the depths of the two ends of the line
    ///
    #[inline]
    pub fn screen_to_world_param(&self, s: f64, depth_start: f64, depth_end: f64) -> f64 {
        if !self.is_perspective() || s <= 0.0 || s >= 1.0 {
            return s;
        }

        let denominator = (1.0 - s) * depth_end + s * depth_start;
        if denominator.abs() < 1e-300 {
            s
        } else {
            (s * depth_start / denominator).clamp(0.0, 1.0)
        }
    }
}
