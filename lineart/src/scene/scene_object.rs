use super::ids::*;
use super::camera::*;
use super::light::*;
use super::source_mesh::*;

use glam::{DMat4};

use std::sync::*;

///
/// How an object or collection takes part in the Line Art computation
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineartUsage {
    /// Use the usage of the enclosing collection
    Inherit,

    /// Lines are generated for the object and it hides the lines behind it
    Include,

    /// The object hides lines but generates no lines of its own
    OcclusionOnly,

    /// The object is ignored
    Exclude,

    /// The object only generates intersection lines and does not hide anything
    IntersectionOnly,

    /// The object generates lines but never creates intersection lines
    NoIntersection,
}

///
/// The data attached to an object
///
#[derive(Clone, Debug)]
pub enum ObjectData {
    /// A mesh (several objects can share the same mesh)
    Mesh(Arc<SourceMesh>),

    /// Creates an instance of every object in a collection, using this object's transform
    CollectionInstance(CollectionId),

    Camera(CameraData),
    Light(LightData),

    /// Object with no geometry
    Empty,
}

///
/// An object in a scene
///
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub id:                 ObjectId,
    pub name:               String,

    /// Transformation from object space to world space
    pub transform:          DMat4,

    /// Hidden objects are not loaded
    pub visible:            bool,

    pub usage:              LineartUsage,

    /// Intersection lines created by this object's faces are tagged with these bits
    pub intersection_mask:  u8,

    pub data:               ObjectData,
}

impl SceneObject {
    ///
    /// Creates a visible object with a new ID
    ///
    pub fn new(name: &str, transform: DMat4, data: ObjectData) -> SceneObject {
        SceneObject {
            id:                 ObjectId::new(),
            name:               name.to_string(),
            transform:          transform,
            visible:            true,
            usage:              LineartUsage::Inherit,
            intersection_mask:  0,
            data:               data,
        }
    }

    ///
    /// Creates a mesh object
    ///
    pub fn mesh(name: &str, mesh: Arc<SourceMesh>, transform: DMat4) -> SceneObject {
        SceneObject::new(name, transform, ObjectData::Mesh(mesh))
    }

    ///
    /// Creates a camera object
    ///
    pub fn camera(name: &str, camera: CameraData, transform: DMat4) -> SceneObject {
        SceneObject::new(name, transform, ObjectData::Camera(camera))
    }

    ///
    /// Creates a light object
    ///
    pub fn light(name: &str, light: LightData, transform: DMat4) -> SceneObject {
        SceneObject::new(name, transform, ObjectData::Light(light))
    }

    ///
    /// Creates an object that instances a collection
    ///
    pub fn instance(name: &str, collection: CollectionId, transform: DMat4) -> SceneObject {
        SceneObject::new(name, transform, ObjectData::CollectionInstance(collection))
    }

    ///
    /// Returns a copy of this object with a different usage
    ///
    pub fn with_usage(mut self, usage: LineartUsage) -> SceneObject {
        self.usage = usage;
        self
    }

    ///
    /// Returns a copy of this object with a different intersection mask
    ///
    pub fn with_intersection_mask(mut self, mask: u8) -> SceneObject {
        self.intersection_mask = mask;
        self
    }
}
