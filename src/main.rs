use bevy::prelude::*;
use bevy_flycam::{MovementSettings, NoCameraPlayerPlugin};
use bevy_inspector_egui::quick::WorldInspectorPlugin;
use heightmap_painter::prelude::*;

fn main() -> Result<(), TerrainError> {
    let grid_config = GridConfig::default();
    let paint_config = PaintConfig::default();

    let mut terrain = TerrainSurface::new(&grid_config)?;
    let surface = PaintSurface::new(terrain.n(), &paint_config);

    // Catches a surface/grid mismatch before any frame is drawn.
    sync_from_surface(&surface, &mut terrain)?;

    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(NoCameraPlayerPlugin)
        .add_plugins(WorldInspectorPlugin::new())
        .insert_resource(MovementSettings {
            sensitivity: 0.00015,
            speed: 3.0,
        })
        .insert_resource(grid_config)
        .insert_resource(paint_config)
        .insert_resource(terrain)
        .insert_resource(surface)
        .add_plugins(HeightmapEditorPlugin)
        .run();

    Ok(())
}
