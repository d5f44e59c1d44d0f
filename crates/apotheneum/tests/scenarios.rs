//! End-to-end lifecycle: fixture files in, topology swaps, frames out.

use std::sync::Arc;

use apotheneum::synth::{self, SynthOptions};
use apotheneum::transfer::{copy, copy_exterior};
use apotheneum::{
    BuildError, FaceId, FixtureNode, Geometry, Shape, Side, TopologyContext, BLACK,
};
use glam::Vec3;

fn installation(options: &SynthOptions) -> FixtureNode {
    synth::installation(&Geometry::default(), options)
}

fn through_json(model: &FixtureNode) -> FixtureNode {
    let json = serde_json::to_string(model).unwrap();
    FixtureNode::from_json_str(&json).unwrap()
}

#[test]
fn fixture_without_installation_signals_absence() {
    let ctx = TopologyContext::default();
    let model = FixtureNode::from_json_str(
        r#"{ "tags": ["lights"], "children": [ { "points": [ { "index": 0, "position": [0, 0, 0] } ] } ] }"#,
    )
    .unwrap();

    assert!(!ctx.rebuild(&model, model.point_count()).unwrap());
    assert!(!ctx.is_present());
    assert!(ctx.snapshot().is_none());

    let mut buf = vec![1, 2, 3];
    ctx.render(&mut buf, |_, _| unreachable!());
    assert_eq!(buf, vec![BLACK; 3]);
}

#[test]
fn single_shape_installation_is_rejected() {
    let ctx = TopologyContext::default();
    for options in [
        SynthOptions { cylinder: false, ..SynthOptions::default() },
        SynthOptions { cube: false, ..SynthOptions::default() },
    ] {
        let model = through_json(&installation(&options));
        let err = ctx.rebuild(&model, model.point_count()).unwrap_err();
        assert!(matches!(err, BuildError::MissingGroup { .. }), "{err}");
        assert!(!ctx.is_present());
    }
}

#[test]
fn installation_without_interior_copies_safely() {
    let ctx = TopologyContext::default();
    let model = through_json(&installation(&SynthOptions {
        interior: false,
        ..SynthOptions::default()
    }));
    assert!(ctx.rebuild(&model, model.point_count()).unwrap());

    let topo = ctx.topology();
    assert!(!topo.has_interior());
    assert!(topo.cube().interior().is_none());
    assert!(topo.cylinder().interior().is_none());

    let mut buf: Vec<u32> = (0..model.point_count() as u32).collect();
    let before = buf.clone();
    copy(&mut buf, Some(topo.cube().exterior()), topo.cube().interior());
    copy_exterior(&mut buf, &topo);
    assert_eq!(buf, before);
}

#[test]
fn shifted_reload_replaces_positions_and_keeps_addressing() {
    let ctx = TopologyContext::default();
    let original = through_json(&installation(&SynthOptions::default()));
    ctx.rebuild(&original, original.point_count()).unwrap();
    let first = ctx.topology();

    let mut shifted = original.clone();
    shifted.translate(Vec3::new(3.0, -1.0, 0.5));
    ctx.rebuild(&shifted, shifted.point_count()).unwrap();
    let second = ctx.topology();

    assert!(!Arc::ptr_eq(&first, &second));
    for shape in Shape::ALL {
        for side in Side::ALL {
            for (ring, pos) in [(0, 0), (12, -7), (40, 333)] {
                let a = first.resolve(shape, side, ring, pos).unwrap();
                let b = second.resolve(shape, side, ring, pos).unwrap();
                assert_eq!(a.index, b.index);
                assert!((b.position - a.position).abs_diff_eq(Vec3::new(3.0, -1.0, 0.5), 1e-4));
            }
        }
    }
}

#[test]
fn malformed_reload_leaves_inflight_frame_intact() {
    let ctx = TopologyContext::default();
    let good = installation(&SynthOptions::default());
    ctx.rebuild(&good, good.point_count()).unwrap();
    let inflight = ctx.snapshot().unwrap();

    let mut broken = good.clone();
    broken.find_mut("cubeLeftExterior").unwrap().children.truncate(49);
    let mut message = String::new();
    assert!(!ctx.rebuild_reporting(&broken, broken.point_count(), |m| message = m));

    assert!(!ctx.is_present());
    assert!(message.contains("cubeLeftExterior expects 50 columns, found 49"));
    let left = inflight.cube().face(Side::Exterior, FaceId::Left).unwrap();
    assert_eq!(left.width(), 50);
    assert_eq!(inflight.cube().exterior().width(), 200);
}

#[test]
fn cube_door_edges_on_every_face() {
    let ctx = TopologyContext::default();
    let model = installation(&SynthOptions::default());
    ctx.rebuild(&model, model.point_count()).unwrap();
    let topo = ctx.topology();
    let g = topo.geometry();

    for face in 0..4 {
        let first = (face * g.face_width + g.cube_door_start) as i64;
        for ring in (g.cube_height - g.door_height) as i64..g.cube_height as i64 {
            assert!(topo.is_door(Shape::Cube, ring, first));
            assert!(!topo.is_door(Shape::Cube, ring, first - 1));
            assert!(!topo.is_door(Shape::Cube, ring, first + g.door_width as i64));
        }
    }
}

#[test]
fn geometry_file_overrides_defaults() {
    let geometry = Geometry::from_json_str(r#"{ "door_height": 12 }"#).unwrap();
    assert_eq!(geometry.door_height, 12);
    assert_eq!(geometry.face_width, Geometry::default().face_width);

    let ctx = TopologyContext::new(geometry);
    let model = synth::installation(&geometry, &SynthOptions::default());
    ctx.rebuild(&model, model.point_count()).unwrap();
    assert!(ctx.topology().is_door(Shape::Cube, 33, 20));
}
