use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

///
/// Identifies an object in a scene
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

///
/// Identifies a collection in a scene
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CollectionId(pub u64);

impl ObjectId {
    ///
    /// Creates a new object ID (unique within this process)
    ///
    pub fn new() -> ObjectId {
        ObjectId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl CollectionId {
    ///
    /// Creates a new collection ID (unique within this process)
    ///
    pub fn new() -> CollectionId {
        CollectionId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}
