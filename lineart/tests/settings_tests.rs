use flo_lineart::*;
use flo_lineart::modifier::*;
use flo_lineart::scene::*;
use flo_lineart::settings::*;

#[test]
pub fn default_settings_are_valid() {
    assert!(LineartSettings::default().validate().is_ok());
}

#[test]
pub fn invalid_settings() {
    let not_finite = LineartSettings { overscan: f64::INFINITY, ..LineartSettings::default() };
    assert!(matches!(not_finite.validate(), Err(LineartError::InvalidSettings(_))));

    let negative_overscan = LineartSettings { overscan: -0.5, ..LineartSettings::default() };
    assert!(matches!(negative_overscan.validate(), Err(LineartError::InvalidSettings(_))));

    let backwards_levels = LineartSettings { use_multiple_levels: true, level_start: 3, level_end: 1, ..LineartSettings::default() };
    assert!(matches!(backwards_levels.validate(), Err(LineartError::InvalidSettings(_))));

    let mut negative_threshold = LineartSettings::default();
    negative_threshold.chaining.image_threshold = -1.0;
    assert!(matches!(negative_threshold.validate(), Err(LineartError::InvalidSettings(_))));

    let bad_shadow_camera = LineartSettings {
        light_object:       Some(ObjectId::new()),
        shadow_selection:   ShadowSelection::Shaded,
        shadow_camera_near: 10.0,
        shadow_camera_far:  1.0,
        ..LineartSettings::default()
    };
    assert!(matches!(bad_shadow_camera.validate(), Err(LineartError::InvalidSettings(_))));
}

#[test]
pub fn single_level_ignores_level_end() {
    let settings = LineartSettings { level_start: 2, level_end: 5, ..LineartSettings::default() };
    assert!(settings.levels() == (2..=2), "{:?}", settings.levels());

    let settings = LineartSettings { use_multiple_levels: true, ..settings };
    assert!(settings.levels() == (2..=5), "{:?}", settings.levels());
}

#[test]
pub fn computation_key_follows_settings() {
    let settings    = LineartSettings::default();
    let key         = settings.computation_key();

    assert!(settings.clone().computation_key() == key);

    let changed = [
        LineartSettings { crease_threshold: 60.0, ..settings.clone() },
        LineartSettings { edge_types: EdgeTypes::CONTOUR, ..settings.clone() },
        LineartSettings { use_back_face_culling: true, ..settings.clone() },
        LineartSettings { overscan: 0.2, ..settings.clone() },
        LineartSettings { use_multiple_levels: true, level_end: 2, ..settings.clone() },
        LineartSettings { chaining: ChainingSettings { fuzzy_all: true, ..settings.chaining }, ..settings.clone() },
        LineartSettings { silhouette_filtering: SilhouetteFilter::Individual, ..settings.clone() },
        LineartSettings { light_object: Some(ObjectId::new()), edge_types: settings.edge_types | EdgeTypes::SHADOW, ..settings.clone() },
    ];

    for other in changed.iter() {
        assert!(other.computation_key() != key, "{:?}", other);
    }
}

#[test]
pub fn computation_key_ignores_unused_settings() {
    let settings = LineartSettings::default();
    let key      = settings.computation_key();

    // level_end only matters with multiple levels, the source camera only when it's used
    assert!(LineartSettings { level_end: 4, ..settings.clone() }.computation_key() == key);
    assert!(LineartSettings { source_camera: Some(ObjectId::new()), ..settings.clone() }.computation_key() == key);

    // The shadow camera is only used by the light pass
    assert!(LineartSettings { shadow_camera_size: 10.0, ..settings.clone() }.computation_key() == key);

    // Silhouettes are found the same way for every filter mode: the mode only changes which chains a modifier draws
    let group = LineartSettings { silhouette_filtering: SilhouetteFilter::Group, ..settings.clone() };
    assert!(LineartSettings { silhouette_filtering: SilhouetteFilter::Individual, ..group.clone() }.computation_key() == group.computation_key());
    assert!(LineartSettings { use_invert_silhouette: true, ..group.clone() }.computation_key() == group.computation_key());
    assert!(LineartSettings { edge_types: EdgeTypes::CREASE, ..group.clone() }.computation_key() == LineartSettings { edge_types: EdgeTypes::CREASE, ..settings.clone() }.computation_key());
}

#[test]
pub fn shadows_are_cast_from_light_contours() {
    let settings = LineartSettings { edge_types: EdgeTypes::CONTOUR | EdgeTypes::SHADOW, ..LineartSettings::default() };

    // Nothing is cast without a light
    assert!(!settings.casts_shadows());
    assert!(!settings.needs_shadow_view());
    assert!(settings.classified_types() == settings.edge_types);

    // The light contours are found even though they aren't drawn
    let with_light = LineartSettings { light_object: Some(ObjectId::new()), ..settings.clone() };
    assert!(with_light.casts_shadows());
    assert!(with_light.needs_shadow_view());
    assert!(!with_light.needs_light_pass());
    assert!(with_light.classified_types() == EdgeTypes::CONTOUR | EdgeTypes::SHADOW | EdgeTypes::LIGHT_CONTOUR);

    // Casting shadows needs a working shadow camera
    let bad_shadow_camera = LineartSettings { shadow_camera_near: 10.0, shadow_camera_far: 1.0, ..with_light.clone() };
    assert!(matches!(bad_shadow_camera.validate(), Err(LineartError::InvalidSettings(_))));
    assert!(LineartSettings { light_object: None, ..bad_shadow_camera }.validate().is_ok());
}

#[test]
pub fn edge_type_priority() {
    assert!((EdgeTypes::CREASE | EdgeTypes::CONTOUR).highest_priority() == EdgeTypes::CONTOUR);
    assert!((EdgeTypes::LOOSE | EdgeTypes::MATERIAL).highest_priority() == EdgeTypes::MATERIAL);
    assert!((EdgeTypes::LOOSE | EdgeTypes::INTERSECTION).highest_priority() == EdgeTypes::INTERSECTION);
    assert!(EdgeTypes::empty().highest_priority() == EdgeTypes::empty());
}

#[test]
pub fn mask_filters() {
    assert!(MaskFilter::default().matches(0));
    assert!(MaskFilter::default().matches(0xff));

    let any = MaskFilter::any_of(0b0110);
    assert!(any.matches(0b0010));
    assert!(any.matches(0b1100));
    assert!(!any.matches(0b1001));
    assert!(!any.matches(0));

    let exact = MaskFilter::exactly(0b0110);
    assert!(exact.matches(0b0110));
    assert!(!exact.matches(0b0010));
    assert!(!exact.matches(0b1110));
}

#[test]
pub fn modifier_serializes_to_json() {
    let mut modifier                        = LineartModifier::new("Outline", "Lines", 1);
    modifier.source                         = LineartSource::Collection(CollectionId(42));
    modifier.settings.edge_types            = EdgeTypes::CONTOUR | EdgeTypes::INTERSECTION;
    modifier.settings.use_multiple_levels   = true;
    modifier.settings.level_end             = 3;
    modifier.material_mask                  = MaskFilter::exactly(3);
    modifier.source_vertex_group            = "ink".to_string();

    let json        = serde_json::to_string(&modifier).unwrap();
    let restored    = serde_json::from_str::<LineartModifier>(&json).unwrap();

    assert!(restored == modifier, "{}", json);
    assert!(restored.settings.computation_key() == modifier.settings.computation_key());
}

#[test]
pub fn modifier_stack_serializes_to_json() {
    let mut stack = ModifierStack::new(ObjectId(7));
    stack.push(LineartModifier::new("First", "Lines", 0));
    stack.push(LineartModifier { use_cache: false, is_baked: true, ..LineartModifier::new("Second", "Lines", 1) });

    let json        = serde_json::to_string(&stack).unwrap();
    let restored    = serde_json::from_str::<ModifierStack>(&json).unwrap();

    assert!(restored == stack, "{}", json);
}
