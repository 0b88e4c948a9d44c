use crate::scene::*;
use crate::settings::*;
use crate::stroke::*;

///
/// The Line Art modifiers attached to a drawing object, in evaluation order
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModifierStack {
    /// The object that owns the stack (results are cached against this object)
    pub object:     ObjectId,
    pub modifiers:  Vec<LineartModifier>,
}

impl ModifierStack {
    pub fn new(object: ObjectId) -> ModifierStack {
        ModifierStack {
            object:     object,
            modifiers:  vec![],
        }
    }

    ///
    /// Adds a modifier to the end of the stack, returning its index
    ///
    pub fn push(&mut self, modifier: LineartModifier) -> usize {
        self.modifiers.push(modifier);
        self.modifiers.len() - 1
    }

    ///
    /// The modifiers that share the cached result of this stack
    ///
    pub fn cache_users<'a>(&'a self, scene: &'a SceneDescription, layers: &'a StrokeLayers) -> impl 'a + Iterator<Item=&'a LineartModifier> {
        self.modifiers.iter().filter(move |modifier| modifier.use_cache && !is_modifier_disabled(scene, layers, modifier))
    }

    ///
    /// The index of the modifier that computes the shared result for this stack
    ///
    pub fn cache_owner(&self, scene: &SceneDescription, layers: &StrokeLayers) -> Option<usize> {
        self.modifiers.iter().position(|modifier| modifier.use_cache && !is_modifier_disabled(scene, layers, modifier))
    }

    ///
    /// The settings used for the shared computation of this stack
    ///
    /// These are the settings of the first modifier that uses the cache, widened so that every other modifier using the
    /// cache can filter its lines out of the result: the edge types of all the modifiers are combined, the level range
    /// covers all of their levels and a light pass is made if any of them needs one.
    ///
    pub fn stack_settings(&self, scene: &SceneDescription, layers: &StrokeLayers) -> Option<LineartSettings> {
        let mut users       = self.cache_users(scene, layers);
        let mut settings    = users.next()?.settings.clone();

        for other in users.map(|modifier| &modifier.settings) {
            settings.edge_types |= other.edge_types;

            let (levels, own_levels) = (other.levels(), settings.levels());
            let (start, end)            = (*levels.start(), *levels.end());
            let (own_start, own_end)    = (*own_levels.start(), *own_levels.end());

            if start != own_start || end != own_end {
                settings.use_multiple_levels    = true;
                settings.level_start            = own_start.min(start);
                settings.level_end              = own_end.max(end);
            }

            if other.needs_shadow_view() && !settings.needs_shadow_view() {
                settings.light_object           = other.light_object;
                settings.shadow_camera_size     = other.shadow_camera_size;
                settings.shadow_camera_near     = other.shadow_camera_near;
                settings.shadow_camera_far      = other.shadow_camera_far;
            } else if settings.light_object.is_none() {
                settings.light_object           = other.light_object;
            }

            if other.needs_light_pass() && !settings.needs_light_pass() {
                settings.shadow_selection       = other.shadow_selection;
            }

            if other.needs_silhouette_pass() && !settings.needs_silhouette_pass() {
                settings.silhouette_filtering   = other.silhouette_filtering;
            }
        }

        Some(settings)
    }
}

///
/// Describes why a modifier can't generate any strokes (ignoring whether or not it's baked)
///
pub (crate) fn unusable_reason(scene: &SceneDescription, layers: &StrokeLayers, modifier: &LineartModifier) -> Option<&'static str> {
    if !modifier.enabled {
        return Some("the modifier is not enabled");
    }

    match &modifier.target_layer {
        None                                            => { return Some("there is no target layer"); }
        Some(layer) if layers.layer(layer).is_none()    => { return Some("the target layer does not exist"); }
        Some(_)                                         => { }
    }

    if modifier.target_material.is_none() {
        return Some("there is no target material");
    }

    match modifier.source {
        LineartSource::Scene                                                    => None,
        LineartSource::Object(object) if scene.object(object).is_none()         => Some("the source object does not exist"),
        LineartSource::Collection(coll) if scene.collection(coll).is_none()     => Some("the source collection does not exist"),
        LineartSource::Object(_) | LineartSource::Collection(_)                 => None,
    }
}

///
/// True if a modifier generates nothing: it's switched off, has nowhere to put its strokes, has a missing source or has
/// been baked
///
/// Disabled modifiers never start a computation.
///
pub fn is_modifier_disabled(scene: &SceneDescription, layers: &StrokeLayers, modifier: &LineartModifier) -> bool {
    modifier.is_baked || unusable_reason(scene, layers, modifier).is_some()
}

///
/// True if the modifier at an index computes the shared result for its stack
///
pub fn is_first_lineart_in_stack(stack: &ModifierStack, modifier_idx: usize, scene: &SceneDescription, layers: &StrokeLayers) -> bool {
    stack.cache_owner(scene, layers) == Some(modifier_idx)
}
