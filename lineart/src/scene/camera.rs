use glam::{DMat4, DVec3};

///
/// How a camera projects the scene onto its frame
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    /// Perspective projection with a vertical field of view (in radians) and an aspect ratio (width / height)
    Perspective { fov_y: f64, aspect: f64 },

    /// Orthographic projection where the frame is `scale` units across, with an aspect ratio (width / height)
    Orthographic { scale: f64, aspect: f64 },
}

///
/// A camera in the scene
///
/// Cameras look down the negative Z axis of their transform, with the Y axis pointing up
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraData {
    pub projection: Projection,
    pub clip_start: f64,
    pub clip_end:   f64,
}

impl CameraData {
    ///
    /// A perspective camera with a vertical field of view in radians
    ///
    pub fn perspective(fov_y: f64, aspect: f64) -> CameraData {
        CameraData {
            projection: Projection::Perspective { fov_y, aspect },
            clip_start: 0.1,
            clip_end:   100.0,
        }
    }

    ///
    /// An orthographic camera whose frame is `scale` units across
    ///
    pub fn orthographic(scale: f64, aspect: f64) -> CameraData {
        CameraData {
            projection: Projection::Orthographic { scale, aspect },
            clip_start: 0.1,
            clip_end:   100.0,
        }
    }

    ///
    /// Returns a copy of this camera with different clipping distances
    ///
    pub fn with_clipping(self, clip_start: f64, clip_end: f64) -> CameraData {
        CameraData { clip_start, clip_end, ..self }
    }
}

///
/// Creates the world transform for an object at `eye` whose negative Z axis points at `target`
///
pub fn look_at_transform(eye: DVec3, target: DVec3, up: DVec3) -> DMat4 {
    DMat4::look_at_rh(eye, target, up).inverse()
}
