//! # scene_app — scene-graph demo
//!
//! Builds a small entity tree, exercises the lifecycle API (attach, detach,
//! deep clone, destroy, clear), and logs what happens at each step.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use scene_graph::{Component, ComponentKind, EntityRegistry, Script, Sprite, UserData};
use scene_math::{Transform, Vec3};

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("scene_app=info".parse()?))
        .init();

    info!("scene demo starting");

    let mut registry = EntityRegistry::new();

    // Build a two-level tree: a ship with a turret.
    let ship = registry.create("ship");
    let turret = registry.create_child(ship, "turret")?;

    {
        let entity = registry.get_mut(ship).context("ship just created")?;
        entity.attach_component(Component::from(Transform::from_position(Vec3::new(
            10.0, 0.0, 0.0,
        ))))?;
        entity.attach_component(Component::from(Sprite::new(64, 64)?))?;
    }
    {
        let mut script = Script::new();
        script.set_user_data(UserData(0xBEEF));
        // Replacing a handle hands the old one back so we can release it.
        if let Some(displaced) = script.set_user_data(UserData(0xCAFE)) {
            info!(%displaced, "released displaced script handle");
        }
        let entity = registry.get_mut(turret).context("turret just created")?;
        entity.attach_component(Component::from(Transform::IDENTITY))?;
        entity.attach_component(Component::from(script))?;
    }

    info!(entities = registry.len(), "scene populated");

    // Deep-clone the ship: a second, fully independent tree.
    let fleet_ship = registry.clone_deep(ship)?;
    info!(clone = %fleet_ship, entities = registry.len(), "cloned ship subtree");

    // Tick everything for a few simulated frames.
    for _ in 0..3 {
        registry.update_all(1.0 / 60.0);
    }

    // Re-parent the original turret onto the cloned ship.
    registry.detach_child(ship, turret)?;
    registry.attach_child(fleet_ship, turret)?;
    info!(turret = %turret, new_parent = %fleet_ship, "re-parented turret");

    // Detach a component; ownership moves back to us.
    let sprite = registry
        .get_mut(ship)
        .context("ship is still alive")?
        .detach_component(ComponentKind::Sprite)?;
    info!(kind = %sprite.kind(), "detached component back to caller");

    // Destroy the cloned subtree, then clear the rest.
    let released = registry.destroy(fleet_ship)?;
    info!(released, "destroyed cloned subtree");

    let drained = registry.clear();
    info!(drained, "scene cleared");

    Ok(())
}
