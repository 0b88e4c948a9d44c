use flo_lineart::cache::*;
use flo_lineart::modifier::*;
use flo_lineart::scene::*;
use flo_lineart::settings::*;
use flo_lineart::stroke::*;

use glam::{DMat4, DVec3};

use std::sync::*;

fn cube_scene() -> SceneDescription {
    let mut scene   = SceneDescription::new();
    let camera      = scene.add_object(SceneObject::camera("Camera", CameraData::perspective(0.8, 1.0), look_at_transform(DVec3::new(3.0, 4.0, 5.0), DVec3::ZERO, DVec3::Y)));
    scene.set_active_camera(Some(camera));
    scene.add_object(SceneObject::mesh("Cube", Arc::new(SourceMesh::cuboid(DVec3::ZERO, DVec3::ONE)), DMat4::IDENTITY));

    scene
}

fn layers() -> StrokeLayers {
    let mut layers = StrokeLayers::new();
    layers.add_layer("Lines");
    layers.add_layer("Contours");

    layers
}

fn stroke_count(layers: &StrokeLayers, layer: &str, modifier: &str) -> usize {
    layers.frame(layer, 1).map(|frame| frame.strokes_from(modifier).count()).unwrap_or(0)
}

#[test]
pub fn disabled_modifiers() {
    let scene   = cube_scene();
    let layers  = layers();

    assert!(!is_modifier_disabled(&scene, &layers, &LineartModifier::new("Ok", "Lines", 0)));

    let no_layer = LineartModifier { target_layer: None, ..LineartModifier::new("A", "Lines", 0) };
    assert!(is_modifier_disabled(&scene, &layers, &no_layer));

    let missing_layer = LineartModifier::new("B", "Nowhere", 0);
    assert!(is_modifier_disabled(&scene, &layers, &missing_layer));

    let no_material = LineartModifier { target_material: None, ..LineartModifier::new("C", "Lines", 0) };
    assert!(is_modifier_disabled(&scene, &layers, &no_material));

    let missing_object = LineartModifier { source: LineartSource::Object(ObjectId::new()), ..LineartModifier::new("D", "Lines", 0) };
    assert!(is_modifier_disabled(&scene, &layers, &missing_object));

    let missing_collection = LineartModifier { source: LineartSource::Collection(CollectionId::new()), ..LineartModifier::new("E", "Lines", 0) };
    assert!(is_modifier_disabled(&scene, &layers, &missing_collection));

    let baked = LineartModifier { is_baked: true, ..LineartModifier::new("F", "Lines", 0) };
    assert!(is_modifier_disabled(&scene, &layers, &baked));

    let switched_off = LineartModifier { enabled: false, ..LineartModifier::new("G", "Lines", 0) };
    assert!(is_modifier_disabled(&scene, &layers, &switched_off));
}

#[test]
pub fn first_enabled_modifier_owns_cache() {
    let scene       = cube_scene();
    let layers      = layers();
    let mut stack   = ModifierStack::new(ObjectId::new());

    stack.push(LineartModifier { target_layer: None, ..LineartModifier::new("Disabled", "Lines", 0) });
    stack.push(LineartModifier { use_cache: false, ..LineartModifier::new("Private", "Lines", 0) });
    stack.push(LineartModifier::new("Owner", "Lines", 0));
    stack.push(LineartModifier::new("Sharer", "Contours", 0));

    assert!(!is_first_lineart_in_stack(&stack, 0, &scene, &layers));
    assert!(!is_first_lineart_in_stack(&stack, 1, &scene, &layers));
    assert!(is_first_lineart_in_stack(&stack, 2, &scene, &layers));
    assert!(!is_first_lineart_in_stack(&stack, 3, &scene, &layers));
}

#[test]
pub fn stack_settings_combine_modifiers() {
    let scene       = cube_scene();
    let layers      = layers();
    let mut stack   = ModifierStack::new(ObjectId::new());

    let mut first                   = LineartModifier::new("First", "Lines", 0);
    first.settings.edge_types       = EdgeTypes::CONTOUR;

    let mut second                  = LineartModifier::new("Second", "Contours", 0);
    second.settings.edge_types      = EdgeTypes::CREASE | EdgeTypes::CONTOUR;
    second.settings.silhouette_filtering = SilhouetteFilter::Group;
    second.settings.use_multiple_levels = true;
    second.settings.level_start     = 1;
    second.settings.level_end       = 3;

    let mut private                 = LineartModifier::new("Private", "Lines", 0);
    private.use_cache               = false;
    private.settings.edge_types     = EdgeTypes::LOOSE;

    stack.push(first);
    stack.push(second);
    stack.push(private);

    let settings = stack.stack_settings(&scene, &layers).unwrap();

    assert!(settings.edge_types == EdgeTypes::CONTOUR | EdgeTypes::CREASE, "{:?}", settings.edge_types);
    assert!(settings.levels() == (0..=3), "{:?}", settings.levels());
    assert!(settings.needs_silhouette_pass());
}

#[test]
pub fn modifiers_share_one_computation() {
    let scene       = cube_scene();
    let mut layers  = layers();
    let cache       = LineartCacheTable::new();
    let mut stack   = ModifierStack::new(ObjectId::new());

    let mut contours                = LineartModifier::new("Contours", "Contours", 0);
    contours.settings.edge_types    = EdgeTypes::CONTOUR;

    stack.push(LineartModifier::new("Everything", "Lines", 0));
    stack.push(contours);

    let report = evaluate_stack(&stack, &scene, &cache, &mut layers, 1);

    assert!(report.computed == 1, "{:?}", report);
    assert!(report.reused == 1, "{:?}", report);
    assert!(report.failed.is_empty(), "{:?}", report);
    assert!(cache.computation_count() == 1);

    let everything  = stroke_count(&layers, "Lines", "Everything");
    let contours    = stroke_count(&layers, "Contours", "Contours");
    assert!(everything > contours && contours > 0, "{} {}", everything, contours);

    // Evaluating again reuses the result and replaces the strokes
    let report = evaluate_stack(&stack, &scene, &cache, &mut layers, 1);
    assert!(report.computed == 0 && report.reused == 2, "{:?}", report);
    assert!(cache.computation_count() == 1);
    assert!(stroke_count(&layers, "Lines", "Everything") == everything);

    // Invalidating makes the owner compute again
    cache.invalidate(stack.object);
    let report = evaluate_stack(&stack, &scene, &cache, &mut layers, 1);
    assert!(report.computed == 1 && report.reused == 1, "{:?}", report);
    assert!(cache.computation_count() == 2);
}

#[test]
pub fn private_modifier_does_not_touch_cache() {
    let scene       = cube_scene();
    let mut layers  = layers();
    let cache       = LineartCacheTable::new();
    let mut stack   = ModifierStack::new(ObjectId::new());

    stack.push(LineartModifier { use_cache: false, ..LineartModifier::new("Private", "Lines", 0) });

    let report = evaluate_stack(&stack, &scene, &cache, &mut layers, 1);

    assert!(report.private == 1, "{:?}", report);
    assert!(cache.computation_count() == 0);
    assert!(cache.state(stack.object) == CacheState::Empty);
    assert!(stroke_count(&layers, "Lines", "Private") > 0);
}

#[test]
pub fn sharer_falls_back_without_shared_result() {
    let scene       = cube_scene();
    let mut layers  = layers();
    let cache       = LineartCacheTable::new();
    let mut stack   = ModifierStack::new(ObjectId::new());

    stack.push(LineartModifier::new("Owner", "Lines", 0));
    stack.push(LineartModifier::new("Sharer", "Contours", 0));

    // Evaluate the second modifier before the first has computed anything
    let outcome = evaluate_modifier(&stack, 1, &scene, &cache, &mut layers, 1).unwrap();

    assert!(outcome.source == ResultSource::Fallback, "{:?}", outcome);
    assert!(outcome.strokes > 0);
    assert!(cache.state(stack.object) == CacheState::Empty);
}

#[test]
pub fn skipped_modifiers_generate_nothing() {
    let scene       = cube_scene();
    let mut layers  = layers();
    let cache       = LineartCacheTable::new();
    let mut stack   = ModifierStack::new(ObjectId::new());

    stack.push(LineartModifier::new("Missing", "Nowhere", 0));

    let report = evaluate_stack(&stack, &scene, &cache, &mut layers, 1);

    assert!(report.skipped == 1, "{:?}", report);
    assert!(report.strokes == 0);
    assert!(cache.computation_count() == 0);
}

#[test]
pub fn failures_are_reported_and_evaluation_continues() {
    let scene       = cube_scene();
    let mut layers  = layers();
    let cache       = LineartCacheTable::new();
    let mut stack   = ModifierStack::new(ObjectId::new());

    let mut broken                  = LineartModifier::new("Broken", "Lines", 0);
    broken.use_cache                = false;
    broken.settings.crease_threshold = f64::NAN;

    stack.push(broken);
    stack.push(LineartModifier::new("Working", "Contours", 0));

    let report = evaluate_stack(&stack, &scene, &cache, &mut layers, 1);

    assert!(report.failed.len() == 1 && report.failed[0].0 == "Broken", "{:?}", report);
    assert!(report.computed == 1, "{:?}", report);
    assert!(stroke_count(&layers, "Contours", "Working") > 0);
}

#[test]
pub fn bake_and_clear() {
    let scene       = cube_scene();
    let mut layers  = layers();
    let cache       = LineartCacheTable::new();
    let mut stack   = ModifierStack::new(ObjectId::new());

    stack.push(LineartModifier::new("Baked", "Lines", 0));

    let baked = bake_modifier(&mut stack, 0, &scene, &mut layers, 1).unwrap();

    assert!(baked > 0);
    assert!(stack.modifiers[0].is_baked);
    assert!(cache.computation_count() == 0);
    assert!(layers.frame("Lines", 1).unwrap().strokes.iter().all(|stroke| stroke.baked));

    // A baked modifier doesn't compute or replace its strokes
    let report = evaluate_stack(&stack, &scene, &cache, &mut layers, 1);
    assert!(report.skipped == 1, "{:?}", report);
    assert!(cache.computation_count() == 0);
    assert!(stroke_count(&layers, "Lines", "Baked") == baked);

    // Clearing the bake removes the strokes, and the modifier generates lines again
    assert!(clear_bake(&mut stack, 0, &mut layers) == baked);
    assert!(!stack.modifiers[0].is_baked);
    assert!(stroke_count(&layers, "Lines", "Baked") == 0);

    let report = evaluate_stack(&stack, &scene, &cache, &mut layers, 1);
    assert!(report.computed == 1, "{:?}", report);
    assert!(stroke_count(&layers, "Lines", "Baked") == baked);
}
