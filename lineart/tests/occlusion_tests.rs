use flo_lineart::*;
use flo_lineart::cache::*;
use flo_lineart::classify::*;
use flo_lineart::occlusion::*;
use flo_lineart::scene::*;
use flo_lineart::settings::*;
use flo_lineart::snapshot::*;

use glam::{DMat4, DVec3};

use std::sync::*;

fn scene_with_camera(eye: DVec3) -> SceneDescription {
    let mut scene   = SceneDescription::new();
    let camera      = scene.add_object(SceneObject::camera("Camera", CameraData::perspective(0.8, 1.0), look_at_transform(eye, DVec3::ZERO, DVec3::Y)));
    scene.set_active_camera(Some(camera));

    scene
}

fn add_cube(scene: &mut SceneDescription, name: &str, center: DVec3, size: f64) -> ObjectId {
    scene.add_object(SceneObject::mesh(name, Arc::new(SourceMesh::cuboid(center, DVec3::splat(size))), DMat4::IDENTITY))
}

fn object_edges<'a>(entry: &'a CacheEntry, object: ObjectId) -> impl 'a + Iterator<Item=(&'a FeatureEdge, &'a OcclusionRecord)> {
    entry.edges.iter().zip(entry.records.iter())
        .filter(move |(edge, _)| entry.snapshot.objects[edge.object as usize].id == object)
}

///
/// Two cubes along the view axis, with the far one partly behind the near one
///
fn two_cubes() -> (SceneDescription, ObjectId, ObjectId) {
    let mut scene   = scene_with_camera(DVec3::new(0.0, 0.0, 10.0));
    let near        = add_cube(&mut scene, "Near", DVec3::ZERO, 1.0);
    let far         = add_cube(&mut scene, "Far", DVec3::new(0.5, 0.0, -3.0), 1.0);

    (scene, near, far)
}

fn two_cube_settings() -> LineartSettings {
    LineartSettings {
        edge_types:             EdgeTypes::CONTOUR,
        use_back_face_culling:  true,
        use_multiple_levels:    true,
        level_start:            0,
        level_end:              4,
        ..LineartSettings::default()
    }
}

#[test]
pub fn near_cube_is_visible() {
    let (scene, near, _far) = two_cubes();
    let entry               = compute_feature_lines(&scene, &two_cube_settings(), &CancelToken::new()).unwrap();

    let near_edges = object_edges(&entry, near).collect::<Vec<_>>();
    assert!(near_edges.len() == 4, "{:?}", near_edges);

    for (edge, record) in near_edges {
        assert!(record.ranges().iter().all(|range| range.level == 0), "{:?} {:?}", edge, record);
    }
}

#[test]
pub fn far_cube_is_partly_hidden() {
    let (scene, _near, far) = two_cubes();
    let entry               = compute_feature_lines(&scene, &two_cube_settings(), &CancelToken::new()).unwrap();

    let far_edges = object_edges(&entry, far).collect::<Vec<_>>();
    assert!(far_edges.len() == 4, "{:?}", far_edges);

    // The left edge of the far cube is directly behind the near cube
    let left_edge = far_edges.iter()
        .find(|(edge, _)| edge.endpoints.iter().all(|point| point.world.x.abs() < 1e-9))
        .unwrap();
    assert!(left_edge.1.ranges().iter().all(|range| range.level == 1), "{:?}", left_edge);

    // The right edge is clear of it
    let right_edge = far_edges.iter()
        .find(|(edge, _)| edge.endpoints.iter().all(|point| (point.world.x - 1.0).abs() < 1e-9))
        .unwrap();
    assert!(right_edge.1.ranges().iter().all(|range| range.level == 0), "{:?}", right_edge);

    // The top and bottom edges go from hidden to visible
    let crossing_edges = far_edges.iter()
        .filter(|(edge, _)| (edge.endpoints[0].world.y - edge.endpoints[1].world.y).abs() < 1e-9)
        .collect::<Vec<_>>();
    assert!(crossing_edges.len() == 2, "{:?}", crossing_edges);

    for (edge, record) in crossing_edges {
        assert!(record.ranges().iter().any(|range| range.level == 0), "{:?} {:?}", edge, record);
        assert!(record.ranges().iter().any(|range| range.level == 1), "{:?} {:?}", edge, record);
        assert!(record.ranges().iter().all(|range| range.level <= 1), "{:?} {:?}", edge, record);
    }
}

#[test]
pub fn records_cover_every_edge() {
    let mut scene = scene_with_camera(DVec3::new(3.0, 4.0, 5.0));
    add_cube(&mut scene, "A", DVec3::ZERO, 1.0);
    add_cube(&mut scene, "B", DVec3::new(0.3, 0.2, -1.5), 1.5);
    add_cube(&mut scene, "C", DVec3::new(-0.8, 0.4, -0.2), 0.6);

    let settings    = LineartSettings { edge_types: EdgeTypes::all(), ..LineartSettings::default() };
    let entry       = compute_feature_lines(&scene, &settings, &CancelToken::new()).unwrap();

    assert!(!entry.edges.is_empty());
    assert!(entry.edges.len() == entry.records.len(), "{} edges, {} records", entry.edges.len(), entry.records.len());

    for record in entry.records.iter() {
        assert!(record.covers_edge(), "{:?}", record);
    }
}

#[test]
pub fn parallel_solve_matches_sequential_solve() {
    let mut scene = scene_with_camera(DVec3::new(3.0, 4.0, 5.0));
    add_cube(&mut scene, "A", DVec3::ZERO, 1.0);
    add_cube(&mut scene, "B", DVec3::new(0.3, 0.2, -1.5), 1.5);
    add_cube(&mut scene, "C", DVec3::new(-0.8, 0.4, -0.2), 0.6);

    let settings        = LineartSettings::default();
    let snapshot        = load_scene(&scene, &settings).unwrap();
    let view            = snapshot.view.unwrap();
    let (projected, _)  = project_triangles(&snapshot, &view);
    let area            = BoundingArea::build(&projected).unwrap();

    let mut diagnostics = Diagnostics::default();
    let edges           = classify_edges(&snapshot, &settings, &mut diagnostics);

    let solver          = OcclusionSolver::new(&snapshot, &view, &projected, &area);
    let sequential      = solver.solve_sequential(&edges);
    let parallel        = solver.solve(&edges);

    assert!(sequential == parallel, "{:?} != {:?}", sequential, parallel);
}

#[test]
pub fn bounding_area_finds_overlapping_triangles() {
    let mut scene = scene_with_camera(DVec3::new(0.0, 0.0, 10.0));
    add_cube(&mut scene, "Near", DVec3::ZERO, 1.0);

    let settings        = LineartSettings::default();
    let snapshot        = load_scene(&scene, &settings).unwrap();
    let view            = snapshot.view.unwrap();
    let (projected, _)  = project_triangles(&snapshot, &view);
    let area            = BoundingArea::build(&projected).unwrap();

    // Every triangle with some area is a candidate for its own bounds
    for (idx, triangle) in projected.iter().enumerate() {
        if let Some(triangle) = triangle {
            let candidates = area.candidates(&triangle.bounds);
            assert!(candidates.contains(&(idx as u32)), "{} not in {:?}", idx, candidates);
        }
    }
}

#[test]
pub fn occlusion_record_merges_intervals() {
    let intervals = vec![
        OccludedInterval { start: 0.2, end: 0.6, weight: 1 },
        OccludedInterval { start: 0.4, end: 0.8, weight: 1 },
    ];

    let record = OcclusionRecord::from_occluded_intervals(&intervals, |t| t);
    let levels = record.ranges().iter().map(|range| (range.start, range.end, range.level)).collect::<Vec<_>>();

    assert!(levels == vec![(0.0, 0.2, 0), (0.2, 0.4, 1), (0.4, 0.6, 2), (0.6, 0.8, 1), (0.8, 1.0, 0)], "{:?}", levels);
    assert!(record.covers_edge());
    assert!(record.min_level() == 0);
}

#[test]
pub fn light_pass_marks_shaded_lines() {
    let mut scene   = scene_with_camera(DVec3::new(6.0, 1.0, 2.0));
    let cube        = add_cube(&mut scene, "Cube", DVec3::ZERO, 1.0);
    let sun         = scene.add_object(SceneObject::light("Sun", LightData::sun(), look_at_transform(DVec3::new(0.0, 10.0, 0.0), DVec3::ZERO, DVec3::Z)));

    let settings = LineartSettings {
        light_object:       Some(sun),
        shadow_selection:   ShadowSelection::Illuminated,
        ..LineartSettings::default()
    };

    // Without anything in the way, some of the cube is lit
    let entry = compute_feature_lines(&scene, &settings, &CancelToken::new()).unwrap();
    assert!(entry.chains.iter().any(|chain| chain.object == cube && chain.illumination == Illumination::Lit), "{:?}", entry.chains);

    // A roof over the cube puts all of it in shadow
    let roof = SourceMesh::quad([DVec3::new(-2.0, 3.0, -2.0), DVec3::new(-2.0, 3.0, 2.0), DVec3::new(2.0, 3.0, 2.0), DVec3::new(2.0, 3.0, -2.0)]);
    scene.add_object(SceneObject::mesh("Roof", Arc::new(roof), DMat4::IDENTITY));

    let entry = compute_feature_lines(&scene, &settings, &CancelToken::new()).unwrap();
    let cube_chains = entry.chains.iter().filter(|chain| chain.object == cube).collect::<Vec<_>>();

    assert!(!cube_chains.is_empty());
    assert!(cube_chains.iter().all(|chain| chain.illumination == Illumination::Shaded), "{:?}", cube_chains);
}

#[test]
pub fn contours_know_what_is_behind_them() {
    let (scene, near, far)  = two_cubes();
    let settings            = LineartSettings { silhouette_filtering: SilhouetteFilter::Individual, ..two_cube_settings() };
    let entry               = compute_feature_lines(&scene, &settings, &CancelToken::new()).unwrap();

    // The right-hand side of the near cube is in front of the far cube, and the rest is against the background
    let near_edges = object_edges(&entry, near).collect::<Vec<_>>();
    assert!(near_edges.len() == 4, "{:?}", near_edges);

    for (edge, _) in near_edges {
        let is_right_edge = edge.endpoints.iter().all(|point| (point.world.x - 0.5).abs() < 1e-9);

        if is_right_edge {
            assert!(edge.backdrop == Backdrop::Object(far), "{:?}", edge);
        } else {
            assert!(edge.backdrop == Backdrop::Empty, "{:?}", edge);
        }
    }

    // Nothing is behind the far cube
    assert!(object_edges(&entry, far).all(|(edge, _)| edge.backdrop == Backdrop::Empty));

    // Backdrops are only found when they're needed
    let entry = compute_feature_lines(&scene, &two_cube_settings(), &CancelToken::new()).unwrap();
    assert!(entry.edges.iter().all(|edge| edge.backdrop == Backdrop::Unknown));
}

///
/// A cube floating over a ground plane, lit from above by a sun
///
fn cube_over_ground(with_ground: bool) -> (SceneDescription, ObjectId, Option<ObjectId>, LineartSettings) {
    let mut scene   = scene_with_camera(DVec3::new(6.0, 8.0, 7.0));
    let cube        = add_cube(&mut scene, "Cube", DVec3::ZERO, 1.0);
    let sun         = scene.add_object(SceneObject::light("Sun", LightData::sun(), look_at_transform(DVec3::new(-3.0, 10.0, -2.0), DVec3::ZERO, DVec3::Z)));

    let ground = if with_ground {
        let quad = SourceMesh::quad([DVec3::new(-5.0, -1.5, -5.0), DVec3::new(-5.0, -1.5, 5.0), DVec3::new(5.0, -1.5, 5.0), DVec3::new(5.0, -1.5, -5.0)]);
        Some(scene.add_object(SceneObject::mesh("Ground", Arc::new(quad), DMat4::IDENTITY)))
    } else {
        None
    };

    let settings = LineartSettings {
        edge_types:     EdgeTypes::CONTOUR | EdgeTypes::SHADOW,
        light_object:   Some(sun),
        ..LineartSettings::default()
    };

    (scene, cube, ground, settings)
}

#[test]
pub fn cube_casts_shadow_onto_ground() {
    let (scene, cube, ground, settings) = cube_over_ground(true);
    let ground                          = ground.unwrap();
    let entry                           = compute_feature_lines(&scene, &settings, &CancelToken::new()).unwrap();

    let shadow_edges = entry.edges.iter()
        .filter(|edge| edge.types.contains(EdgeTypes::SHADOW))
        .collect::<Vec<_>>();
    assert!(!shadow_edges.is_empty(), "{:?}", entry.edges);

    // Shadow lines belong to the surface they fall on
    for edge in shadow_edges.iter() {
        assert!(entry.snapshot.objects[edge.object as usize].id == ground, "{:?}", edge);
        assert!(edge.endpoints.iter().all(|point| (point.world.y + 1.5).abs() < 1e-9), "{:?}", edge);
    }

    // The light contours that cast the shadows aren't kept, as they weren't asked for
    assert!(entry.edges.iter().all(|edge| !edge.types.contains(EdgeTypes::LIGHT_CONTOUR)));

    // Some of the shadow is in view, and is chained on the ground
    assert!(entry.chains.iter().any(|chain| chain.object == ground && chain.types.contains(EdgeTypes::SHADOW)), "{:?}", entry.chains);
    assert!(entry.chains.iter().all(|chain| chain.object != cube || !chain.types.contains(EdgeTypes::SHADOW)));
}

#[test]
pub fn shadows_need_somewhere_to_fall() {
    let (scene, _cube, _ground, settings) = cube_over_ground(false);
    let entry                             = compute_feature_lines(&scene, &settings, &CancelToken::new()).unwrap();

    assert!(!entry.edges.is_empty());
    assert!(entry.edges.iter().all(|edge| !edge.types.contains(EdgeTypes::SHADOW)), "{:?}", entry.edges);

    // Without the shadow edge type, nothing is cast even with a ground to cast it on
    let (scene, _cube, _ground, settings) = cube_over_ground(true);
    let settings                          = LineartSettings { edge_types: EdgeTypes::CONTOUR, ..settings };
    let entry                             = compute_feature_lines(&scene, &settings, &CancelToken::new()).unwrap();

    assert!(entry.edges.iter().all(|edge| edge.types == EdgeTypes::CONTOUR), "{:?}", entry.edges);
}
