use flo_lineart_canvas::*;
use flo_lineart_canvas::canvas::*;
use flo_lineart_canvas::lineart::chain::*;
use flo_lineart_canvas::lineart::settings::*;
use flo_lineart_canvas::lineart::stroke::*;

use glam::{DVec2, DVec3};

fn stroke(points: &[(f64, f64)], cyclic: bool) -> GeneratedStroke {
    GeneratedStroke {
        points:             points.iter().map(|(x, y)| StrokePoint {
            position:       DVec3::new(*x, *y, 0.0),
            screen:         DVec2::new(*x, *y),
            pressure:       0.5,
            strength:       0.5,
            vertex_color:   [1.0, 0.0, 0.0, 1.0],
            weight:         0.0,
        }).collect(),
        thickness:          4.0,
        material_index:     0,
        cyclic:             cyclic,
        chain:              ChainId(0),
        level:              0,
        types:              EdgeTypes::CONTOUR,
        source_modifier:    "Line Art".to_string(),
        vertex_group:       None,
        baked:              false,
    }
}

#[test]
pub fn draw_open_stroke() {
    let mut drawing = vec![];
    draw_generated_stroke(&mut drawing, &stroke(&[(0.0, 0.0), (0.5, 0.0), (0.5, 0.5)], false));

    assert!(drawing == vec![
        Draw::NewPath,
        Draw::Move(0.0, 0.0),
        Draw::Line(0.5, 0.0),
        Draw::Line(0.5, 0.5),
        Draw::LineWidthPixels(2.0),
        Draw::StrokeColor(Color::Rgba(1.0, 0.0, 0.0, 0.5)),
        Draw::Stroke,
    ], "{:?}", drawing);
}

#[test]
pub fn cyclic_stroke_closes_path() {
    let mut drawing = vec![];
    draw_generated_stroke(&mut drawing, &stroke(&[(0.0, 0.0), (0.5, 0.0), (0.5, 0.5)], true));

    assert!(drawing.iter().filter(|draw| **draw == Draw::ClosePath).count() == 1, "{:?}", drawing);
}

#[test]
pub fn single_point_stroke_draws_nothing() {
    let mut drawing = vec![];
    draw_generated_stroke(&mut drawing, &stroke(&[(0.0, 0.0)], false));

    assert!(drawing.is_empty(), "{:?}", drawing);
}

#[test]
pub fn one_canvas_layer_per_stroke_layer() {
    let mut layers = StrokeLayers::new();
    layers.add_layer("Lines").frame_mut(1).strokes = vec![stroke(&[(0.0, 0.0), (1.0, 1.0)], false), stroke(&[(0.0, 1.0), (1.0, 0.0)], false)];
    layers.add_layer("Shadows").frame_mut(1).strokes = vec![stroke(&[(-1.0, 0.0), (0.0, -1.0)], false)];
    layers.add_layer("Empty");

    let drawing = stroke_frame_drawing(&layers, 1);

    assert!(drawing[0] == Draw::CanvasHeight(2.0), "{:?}", drawing);
    assert!(drawing.iter().filter(|draw| matches!(draw, Draw::Layer(_))).count() == 3, "{:?}", drawing);
    assert!(drawing.iter().filter(|draw| **draw == Draw::ClearLayer).count() == 3, "{:?}", drawing);
    assert!(drawing.iter().filter(|draw| **draw == Draw::Stroke).count() == 3, "{:?}", drawing);

    // Nothing is drawn for other frames
    let drawing = stroke_frame_drawing(&layers, 2);
    assert!(drawing.iter().filter(|draw| **draw == Draw::Stroke).count() == 0, "{:?}", drawing);
}

#[test]
pub fn draw_cube_lines() {
    use flo_lineart_canvas::lineart::cache::*;
    use flo_lineart_canvas::lineart::modifier::*;
    use flo_lineart_canvas::lineart::scene::*;

    use glam::{DMat4};
    use std::sync::*;

    let mut scene   = SceneDescription::new();
    let camera      = scene.add_object(SceneObject::camera("Camera", CameraData::perspective(0.8, 1.0), look_at_transform(DVec3::new(3.0, 4.0, 5.0), DVec3::ZERO, DVec3::Y)));
    scene.set_active_camera(Some(camera));
    scene.add_object(SceneObject::mesh("Cube", Arc::new(SourceMesh::cuboid(DVec3::ZERO, DVec3::ONE)), DMat4::IDENTITY));

    let mut layers  = StrokeLayers::new();
    layers.add_layer("Lines");

    let mut stack   = ModifierStack::new(ObjectId::new());
    stack.push(LineartModifier::new("Line Art", "Lines", 0));

    let report      = evaluate_stack(&stack, &scene, &LineartCacheTable::new(), &mut layers, 1);
    let drawing     = stroke_frame_drawing(&layers, 1);
    let strokes     = drawing.iter().filter(|draw| **draw == Draw::Stroke).count();

    assert!(report.strokes > 0, "{:?}", report);
    assert!(strokes == report.strokes, "{} {:?}", strokes, report);
}
