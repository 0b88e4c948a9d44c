use super::ids::*;
use super::scene_object::*;
use super::collection::*;

use std::collections::{HashMap};

///
/// A scene to compute feature lines for
///
/// Every scene has a master collection: objects are loaded by walking the collection tree from there.
///
#[derive(Clone, Debug)]
pub struct SceneDescription {
    objects:            HashMap<ObjectId, SceneObject>,
    collections:        HashMap<CollectionId, Collection>,
    master_collection:  CollectionId,
    active_camera:      Option<ObjectId>,
}

impl Default for SceneDescription {
    fn default() -> Self {
        SceneDescription::new()
    }
}

impl SceneDescription {
    ///
    /// Creates an empty scene
    ///
    pub fn new() -> SceneDescription {
        let master = Collection::new("Scene Collection");
        let master_id = master.id;

        SceneDescription {
            objects:            HashMap::new(),
            collections:        vec![(master_id, master)].into_iter().collect(),
            master_collection:  master_id,
            active_camera:      None,
        }
    }

    ///
    /// The ID of the collection at the root of the scene
    ///
    #[inline]
    pub fn master_collection(&self) -> CollectionId {
        self.master_collection
    }

    ///
    /// Adds an object to the master collection
    ///
    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        let master = self.master_collection;
        self.add_object_to(master, object)
    }

    ///
    /// Adds an object to a collection (the object is still added to the scene if the collection doesn't exist)
    ///
    pub fn add_object_to(&mut self, collection: CollectionId, object: SceneObject) -> ObjectId {
        let id = object.id;

        if let Some(collection) = self.collections.get_mut(&collection) {
            collection.objects.push(id);
        }
        self.objects.insert(id, object);

        id
    }

    ///
    /// Adds a collection to the scene
    ///
    /// With a parent, the collection is loaded as part of the parent. Collections without a parent are only loaded when
    /// something instances them.
    ///
    pub fn add_collection(&mut self, parent: Option<CollectionId>, collection: Collection) -> CollectionId {
        let id = collection.id;

        if let Some(parent) = parent.and_then(|parent| self.collections.get_mut(&parent)) {
            parent.children.push(id);
        }
        self.collections.insert(id, collection);

        id
    }

    ///
    /// Sets the camera that is used when the settings do not supply one
    ///
    pub fn set_active_camera(&mut self, camera: Option<ObjectId>) {
        self.active_camera = camera;
    }

    #[inline] pub fn active_camera(&self) -> Option<ObjectId>                               { self.active_camera }
    #[inline] pub fn object(&self, id: ObjectId) -> Option<&SceneObject>                    { self.objects.get(&id) }
    #[inline] pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject>        { self.objects.get_mut(&id) }
    #[inline] pub fn collection(&self, id: CollectionId) -> Option<&Collection>             { self.collections.get(&id) }
    #[inline] pub fn collection_mut(&mut self, id: CollectionId) -> Option<&mut Collection> { self.collections.get_mut(&id) }

    ///
    /// True if an object is in a collection or any of its child collections
    ///
    pub fn collection_contains(&self, collection: CollectionId, object: ObjectId) -> bool {
        let mut to_visit    = vec![collection];
        let mut visited     = vec![];

        while let Some(collection_id) = to_visit.pop() {
            if visited.contains(&collection_id) { continue; }
            visited.push(collection_id);

            if let Some(collection) = self.collections.get(&collection_id) {
                if collection.objects.contains(&object) {
                    return true;
                }

                to_visit.extend(collection.children.iter().copied());
            }
        }

        false
    }
}
