use super::filter::*;
use super::generated_stroke::*;
use crate::cache::*;
use crate::chain::*;
use crate::scene::*;
use crate::settings::*;
use crate::snapshot::*;

use glam::{DVec3};
use log::*;

///
/// Reads the source vertex group weights of the points in a chain
///
struct WeightSource<'a> {
    entry:          &'a CacheEntry,
    prefix:         &'a str,
    invert:         bool,
}

impl<'a> WeightSource<'a> {
    ///
    /// True if a source vertex group is used for weights
    ///
    fn matches_group(&self, group: &VertexGroup) -> bool {
        group.name.starts_with(self.prefix) != self.invert
    }

    ///
    /// The weight of a chain point, and the name of the group it came from
    ///
    fn weight(&self, point: &ChainPoint) -> Option<(f64, &'a str)> {
        let (edge, _)   = self.entry.edge(point.source.edge)?;
        let start       = edge.endpoints[0].vertex?;
        let end         = edge.endpoints[1].vertex?;
        let snapshot    = &*self.entry.snapshot;
        let mesh        = &snapshot.objects.get(edge.object as usize)?.mesh;

        let blend       = blend_sources(&snapshot.vertex(start).source, &snapshot.vertex(end).source, point.source.t);

        mesh.vertex_groups.iter()
            .filter(|group| self.matches_group(group))
            .map(|group| (blend.iter().map(|(vertex, weight)| group.weight(*vertex) * weight).sum::<f64>(), group.name.as_str()))
            .fold(None, |best: Option<(f64, &'a str)>, (weight, name)| match best {
                Some((best_weight, _)) if best_weight >= weight => best,
                _                                               => Some((weight, name)),
            })
    }
}

///
/// Generates the strokes that a modifier draws from a computed result
///
/// Chains rejected by the modifier's filters are skipped. Points are moved towards the camera by the modifier's depth
/// offset, and take their thickness, strength and colour from the modifier. The thickness and strength are scaled by the
/// modifier's level factors once for each occlusion level of the chain.
///
pub fn generate_strokes(entry: &CacheEntry, modifier: &LineartModifier, scene: &SceneDescription) -> Vec<GeneratedStroke> {
    let view = if let Some(view) = entry.view() { view } else { return vec![]; };

    let filter          = ChainFilter::new(modifier, scene);
    let material_index  = modifier.target_material.unwrap_or(0);

    // The position that points are moved towards
    let custom_camera   = if modifier.use_offset_towards_custom_camera { modifier.settings.camera_override() } else { None };
    let camera_position = custom_camera
        .and_then(|camera| scene.object(camera))
        .map(|camera| camera.transform.transform_point3(DVec3::ZERO))
        .unwrap_or_else(|| view.position());

    let weights = if modifier.source_vertex_group.is_empty() && !modifier.invert_source_vertex_group {
        None
    } else {
        Some(WeightSource { entry: entry, prefix: &modifier.source_vertex_group, invert: modifier.invert_source_vertex_group })
    };

    let strokes = entry.chains.iter()
        .enumerate()
        .filter(|(_, chain)| chain.points.len() >= 2 && filter.accepts(chain))
        .map(|(chain_idx, chain)| {
            let level       = chain.level.min(i32::MAX as u32) as i32;
            let thickness   = modifier.thickness * modifier.level_thickness_factor.powi(level);
            let strength    = (modifier.opacity * modifier.level_opacity_factor.powi(level)).clamp(0.0, 1.0);

            let point_weights = chain.points.iter()
                .map(|point| weights.as_ref().and_then(|weights| weights.weight(point)))
                .collect::<Vec<_>>();

            let vertex_group = if modifier.use_output_vertex_group_match_by_name {
                point_weights.iter().flatten().map(|(_, name)| name.to_string()).next()
            } else if weights.is_some() {
                modifier.vertex_group.clone()
            } else {
                None
            };

            let points = chain.points.iter().zip(point_weights.iter())
                .map(|(point, weight)| {
                    let towards_camera = (camera_position - point.world).normalize_or_zero();

                    StrokePoint {
                        position:       point.world + towards_camera * modifier.stroke_depth_offset,
                        screen:         point.screen,
                        pressure:       1.0,
                        strength:       strength,
                        vertex_color:   modifier.color,
                        weight:         if vertex_group.is_some() { weight.map(|(weight, _)| weight).unwrap_or(0.0) } else { 0.0 },
                    }
                })
                .collect();

            GeneratedStroke {
                points:             points,
                thickness:          thickness,
                material_index:     material_index,
                cyclic:             chain.closed,
                chain:              ChainId(chain_idx as u32),
                level:              chain.level,
                types:              chain.types,
                source_modifier:    modifier.name.clone(),
                vertex_group:       vertex_group,
                baked:              false,
            }
        })
        .collect::<Vec<_>>();

    trace!("Line art: modifier '{}' generated {} strokes from {} chains", modifier.name, strokes.len(), entry.chains.len());

    strokes
}
