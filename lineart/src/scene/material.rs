///
/// The Line Art properties of a material
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineartMaterial {
    pub name:       String,

    /// Mask bits that modifiers can use to select the lines on faces with this material
    pub mask_bits:  u8,

    /// How many occlusion levels a face with this material adds to the lines behind it (0 to not hide anything)
    pub occlusion:  u8,
}

impl Default for LineartMaterial {
    fn default() -> Self {
        LineartMaterial {
            name:       String::new(),
            mask_bits:  0,
            occlusion:  1,
        }
    }
}

impl LineartMaterial {
    ///
    /// Creates a material with a name and a set of mask bits
    ///
    pub fn with_mask(name: &str, mask_bits: u8) -> LineartMaterial {
        LineartMaterial {
            name:       name.to_string(),
            mask_bits:  mask_bits,
            occlusion:  1,
        }
    }
}
