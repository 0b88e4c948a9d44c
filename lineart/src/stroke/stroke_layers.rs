use super::generated_stroke::*;

///
/// The strokes of a layer at a single frame
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeFrame {
    pub frame_number:   i32,
    pub strokes:        Vec<GeneratedStroke>,
}

///
/// A named drawing layer that Line Art modifiers can write strokes into
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeLayer {
    pub name:   String,

    /// Frames, ordered by frame number
    pub frames: Vec<StrokeFrame>,
}

///
/// The stroke data for the drawing object that owns a modifier stack
///
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct StrokeLayers {
    pub layers: Vec<StrokeLayer>,
}

impl StrokeFrame {
    ///
    /// The strokes in this frame generated by a particular modifier
    ///
    pub fn strokes_from<'a>(&'a self, modifier_name: &'a str) -> impl 'a + Iterator<Item=&'a GeneratedStroke> {
        self.strokes.iter().filter(move |stroke| stroke.source_modifier == modifier_name)
    }
}

impl StrokeLayer {
    pub fn new(name: &str) -> StrokeLayer {
        StrokeLayer {
            name:   name.to_string(),
            frames: vec![],
        }
    }

    ///
    /// The strokes at a frame, if any have been written
    ///
    pub fn frame(&self, frame_number: i32) -> Option<&StrokeFrame> {
        self.frames.binary_search_by_key(&frame_number, |frame| frame.frame_number).ok()
            .map(|idx| &self.frames[idx])
    }

    ///
    /// Returns the frame with a number, creating it if it doesn't exist
    ///
    pub fn frame_mut(&mut self, frame_number: i32) -> &mut StrokeFrame {
        let idx = match self.frames.binary_search_by_key(&frame_number, |frame| frame.frame_number) {
            Ok(idx)     => idx,
            Err(idx)    => {
                self.frames.insert(idx, StrokeFrame { frame_number, strokes: vec![] });
                idx
            }
        };

        &mut self.frames[idx]
    }
}

impl StrokeLayers {
    pub fn new() -> StrokeLayers {
        StrokeLayers::default()
    }

    ///
    /// Adds a layer (or returns the existing layer with the same name)
    ///
    pub fn add_layer(&mut self, name: &str) -> &mut StrokeLayer {
        let idx = match self.layers.iter().position(|layer| layer.name == name) {
            Some(idx)   => idx,
            None        => {
                self.layers.push(StrokeLayer::new(name));
                self.layers.len() - 1
            }
        };

        &mut self.layers[idx]
    }

    pub fn layer(&self, name: &str) -> Option<&StrokeLayer> {
        self.layers.iter().find(|layer| layer.name == name)
    }

    pub fn layer_mut(&mut self, name: &str) -> Option<&mut StrokeLayer> {
        self.layers.iter_mut().find(|layer| layer.name == name)
    }

    ///
    /// The strokes in a layer at a frame
    ///
    pub fn frame(&self, layer_name: &str, frame_number: i32) -> Option<&StrokeFrame> {
        self.layer(layer_name)?.frame(frame_number)
    }

    ///
    /// Replaces the strokes that a modifier previously generated in a frame with a new set
    ///
    /// Baked strokes and strokes from other modifiers are left alone. Returns false if the layer doesn't exist.
    ///
    pub fn replace_generated(&mut self, layer_name: &str, frame_number: i32, modifier_name: &str, strokes: Vec<GeneratedStroke>) -> bool {
        let layer = if let Some(layer) = self.layer_mut(layer_name) { layer } else { return false; };
        let frame = layer.frame_mut(frame_number);

        frame.strokes.retain(|stroke| stroke.baked || stroke.source_modifier != modifier_name);
        frame.strokes.extend(strokes);

        true
    }

    ///
    /// Removes the baked strokes that a modifier created, from every layer and frame
    ///
    /// Returns the number of strokes that were removed.
    ///
    pub fn remove_baked_strokes(&mut self, modifier_name: &str) -> usize {
        let mut removed = 0;

        for frame in self.layers.iter_mut().flat_map(|layer| layer.frames.iter_mut()) {
            let original_len = frame.strokes.len();
            frame.strokes.retain(|stroke| !(stroke.baked && stroke.source_modifier == modifier_name));
            removed += original_len - frame.strokes.len();
        }

        removed
    }
}
