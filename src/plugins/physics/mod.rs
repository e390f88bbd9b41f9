//! Physics plugin: avian in pixel units on a gravity-free top-down plane.
//!
//! Avian runs in `FixedPostUpdate`; its collision messages are read in
//! `SimSet::Collisions` right after the step.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::tunables::Tunables;

pub fn plugin(app: &mut App) {
    let ppm = app.world().resource::<Tunables>().pixels_per_meter;
    app.add_plugins(PhysicsPlugins::default().with_length_unit(ppm))
        .insert_resource(Gravity(Vec2::ZERO));
}
