//! Collision layers.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug)]
pub enum Layer {
    #[default]
    Default,
    World,
    Player,
    Enemy,
    PlayerProjectile,
}

/// Membership kept, filters cleared: the entity stops producing collisions
/// without an archetype move.
#[inline]
pub fn inert(layer: Layer) -> CollisionLayers {
    CollisionLayers::new(layer, [] as [Layer; 0])
}

#[inline]
pub fn is_in_layer(layers: &CollisionLayers, layer: Layer) -> bool {
    layers.memberships.has_all(layer)
}
