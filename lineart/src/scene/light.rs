///
/// The kinds of light that Line Art can use
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightKind {
    /// Parallel light shining down the negative Z axis of the light's transform
    Sun,

    /// Light shining in every direction from the position of the light
    Point,
}

///
/// A light in the scene
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightData {
    pub kind: LightKind,
}

impl LightData {
    pub fn sun() -> LightData { LightData { kind: LightKind::Sun } }
    pub fn point() -> LightData { LightData { kind: LightKind::Point } }
}
