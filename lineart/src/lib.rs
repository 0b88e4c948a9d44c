//!
//! # flo_lineart
//!
//! `flo_lineart` computes feature lines for 3D scenes: the contours, creases, material borders, edge marks,
//! loose edges and intersection lines that an illustrator would draw when tracing a scene from a camera.
//!
//! A computation runs as a pipeline:
//!
//! * the `snapshot` module loads a `SceneDescription` into an immutable `SceneSnapshot` (triangles with
//!   world and view positions, clipped against the camera)
//! * the `classify` module finds the `FeatureEdge`s of the snapshot
//! * the `occlusion` module works out how many surface layers hide each part of each edge
//! * the `chain` module links the visible parts of the edges into polylines
//!
//! The result is stored as a `CacheEntry` in a `LineartCacheTable`, where it can be shared by every Line Art
//! modifier in a modifier stack. The `stroke` module turns the chains into strokes for a drawing layer,
//! and the `modifier` module coordinates all of this for a stack of modifiers.
//!
//! # Features
//!
//! * `multithreading` - (on by default) classification, occlusion solving and chaining are spread over
//!   several threads using rayon. The results are identical with or without this feature.
//!

#![warn(bare_trait_objects)]

#[macro_use]
extern crate serde_derive;

mod error;
mod compute;

/// Settings that control how feature lines are computed and how modifiers filter them
pub mod settings;

/// The scene description supplied by the host: objects, collections, meshes, cameras and lights
pub mod scene;

/// Immutable snapshot of a scene as seen from a camera, with triangles clipped and transformed into view space
pub mod snapshot;

/// Classification of the edges of a snapshot into feature edges
pub mod classify;

/// Determines which parts of each feature edge are hidden and by how many layers
pub mod occlusion;

/// Links visible edge segments into chains
pub mod chain;

/// Per-object storage for computed results that are shared by several modifiers
pub mod cache;

/// Conversion of chains into host strokes
pub mod stroke;

/// Coordination of several Line Art modifiers on the same object
pub mod modifier;

pub use self::error::*;
pub use self::compute::*;
