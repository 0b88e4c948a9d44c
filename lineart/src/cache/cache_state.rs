///
/// The state of the cached result for an object
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheState {
    /// Nothing has been computed for the object
    Empty,

    /// A computation is in progress
    Computing,

    /// The cached result matches the current scene and settings
    Valid,

    /// The scene or the settings have changed since the result was computed
    Stale,
}
