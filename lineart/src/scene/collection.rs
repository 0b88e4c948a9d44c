use super::ids::*;
use super::scene_object::*;

///
/// A collection of objects and child collections
///
#[derive(Clone, Debug)]
pub struct Collection {
    pub id:                 CollectionId,
    pub name:               String,

    /// The objects and child collections of a hidden collection are not loaded
    pub visible:            bool,

    /// Usage for objects in this collection that inherit their usage
    pub usage:              LineartUsage,

    /// Intersection lines created by objects in this collection are tagged with these bits
    pub intersection_mask:  u8,

    pub objects:            Vec<ObjectId>,
    pub children:           Vec<CollectionId>,
}

impl Collection {
    ///
    /// Creates a new empty, visible collection
    ///
    pub fn new(name: &str) -> Collection {
        Collection {
            id:                 CollectionId::new(),
            name:               name.to_string(),
            visible:            true,
            usage:              LineartUsage::Inherit,
            intersection_mask:  0,
            objects:            vec![],
            children:           vec![],
        }
    }
}
