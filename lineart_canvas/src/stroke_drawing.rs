use flo_canvas::*;
use flo_lineart::stroke::*;

///
/// Sets up a graphics context so that the camera frame of the line art fills the canvas
///
pub fn set_up_frame_coordinates(gc: &mut impl GraphicsContext) {
    gc.canvas_height(2.0);
    gc.center_region(-1.0, -1.0, 1.0, 1.0);
}

///
/// Draws a single generated stroke as a path
///
/// Canvas paths have a single width and colour, so the pressure and strength of the points are averaged.
///
pub fn draw_generated_stroke(gc: &mut impl GraphicsContext, stroke: &GeneratedStroke) {
    let (first, rest) = match stroke.points.split_first() {
        Some((first, rest)) if !rest.is_empty() => (first, rest),
        _                                       => { return; }
    };

    let num_points      = stroke.points.len() as f64;
    let pressure        = stroke.points.iter().map(|point| point.pressure).sum::<f64>() / num_points;
    let strength        = stroke.points.iter().map(|point| point.strength).sum::<f64>() / num_points;
    let [r, g, b, a]    = first.vertex_color;

    gc.new_path();
    gc.move_to(first.screen.x as f32, first.screen.y as f32);
    for point in rest {
        gc.line_to(point.screen.x as f32, point.screen.y as f32);
    }

    if stroke.cyclic {
        gc.close_path();
    }

    gc.line_width_pixels((stroke.thickness * pressure) as f32);
    gc.stroke_color(Color::Rgba(r, g, b, a * (strength as f32)));
    gc.stroke();
}

///
/// Draws the strokes of a frame on the current layer
///
pub fn draw_stroke_frame(gc: &mut impl GraphicsContext, frame: &StrokeFrame) {
    gc.line_join(LineJoin::Round);
    gc.line_cap(LineCap::Round);

    for stroke in frame.strokes.iter() {
        draw_generated_stroke(gc, stroke);
    }
}

///
/// Creates the drawing instructions for a frame of a set of stroke layers
///
/// Each stroke layer is drawn on its own canvas layer, in the order the layers were added. Layers with nothing at the
/// requested frame are cleared and left empty.
///
pub fn stroke_frame_drawing(layers: &StrokeLayers, frame_number: i32) -> Vec<Draw> {
    let mut drawing = vec![];

    set_up_frame_coordinates(&mut drawing);

    for (layer_idx, layer) in layers.layers.iter().enumerate() {
        drawing.layer(LayerId(layer_idx as u64));
        drawing.clear_layer();

        if let Some(frame) = layer.frame(frame_number) {
            draw_stroke_frame(&mut drawing, frame);
        }
    }

    drawing
}
