use std::time::Duration;

use bevy::{
    image::ImageSampler,
    input::mouse::{MouseScrollUnit, MouseWheel},
    prelude::*,
    render::{
        render_asset::RenderAssetUsages,
        render_resource::{Extent3d, TextureDimension, TextureFormat},
    },
    window::{CursorGrabMode, PrimaryWindow},
};
use bevy_flycam::FlyCam;
use itertools::Itertools;

use crate::{
    config::{PaintConfig, ShadingConfig},
    paint::PaintSurface,
    sync::sync_from_surface,
    terrain::TerrainSurface,
};

/// Wires the paint surface and terrain into a Bevy app. Expects
/// [`TerrainSurface`] and [`PaintSurface`] resources to be inserted up front.
pub struct HeightmapEditorPlugin;

impl Plugin for HeightmapEditorPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PaintConfig>()
            .register_type::<ShadingConfig>()
            .init_resource::<PaintConfig>()
            .init_resource::<ShadingConfig>()
            .insert_resource(ClearColor(Color::srgb_u8(0xDD, 0xF7, 0xFB)))
            .insert_resource(AmbientLight {
                color: Color::WHITE,
                brightness: 600.0,
            })
            .add_event::<RecalculateNormals>()
            .add_systems(Startup, (setup_scene, setup_paint_panel))
            .add_systems(PostStartup, release_cursor)
            .add_systems(
                Update,
                (
                    layout_paint_panel,
                    paint_input,
                    sync_terrain_heights,
                    upload_terrain_positions,
                    recalculate_terrain_normals,
                    refresh_paint_panel,
                )
                    .chain(),
            );
    }
}

#[derive(Debug, Component)]
pub struct TerrainMesh;

/// Root UI node of the paint panel.
#[derive(Debug, Component)]
pub struct PaintPanelNode;

#[derive(Debug, Resource)]
pub struct PaintPanel {
    image: Handle<Image>,
    revision: u64,
}

#[derive(Debug, Event, PartialEq, Eq, Hash, Deref)]
pub struct RecalculateNormals(Entity);

/// Screen rectangle of the paint panel, in logical window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelRect {
    origin: Vec2,
    scale: f32,
    side: f32,
}

impl PanelRect {
    pub fn new(config: &PaintConfig, side: usize) -> Self {
        Self {
            origin: Vec2::splat(config.panel_margin),
            scale: config.panel_scale.max(f32::EPSILON),
            side: side as f32,
        }
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.side * self.scale
    }

    /// Places `node` exactly over the area [`PanelRect::to_surface`] maps.
    pub fn layout(&self, node: &mut Node) {
        node.position_type = PositionType::Absolute;
        node.left = Val::Px(self.origin.x);
        node.top = Val::Px(self.origin.y);
        node.width = Val::Px(self.size());
        node.height = Val::Px(self.size());
    }

    /// Surface pixel coordinates under `cursor`, if it is over the panel.
    pub fn to_surface(&self, cursor: Vec2) -> Option<Vec2> {
        let local = (cursor - self.origin) / self.scale;
        let inside = local.cmpge(Vec2::ZERO).all() && local.cmplt(Vec2::splat(self.side)).all();

        inside.then_some(local)
    }
}

fn setup_scene(
    mut commands: Commands,
    terrain: Res<TerrainSurface>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Name::new("Camera"),
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 75.0_f32.to_radians(),
            near: 0.1,
            far: 100.0,
            ..default()
        }),
        Transform::from_xyz(0.0, 3.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
        FlyCam,
    ));

    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 2_000.0,
            color: Color::WHITE,
            ..default()
        },
        Transform::from_xyz(5.0, 5.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Name::new(format!("Terrain {0}x{0}", terrain.n())),
        TerrainMesh,
        Mesh3d(meshes.add(terrain.to_mesh())),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(0x88, 0xFF, 0x88),
            double_sided: true,
            cull_mode: None,
            ..default()
        })),
        Transform::default(),
    ));
}

fn setup_paint_panel(
    mut commands: Commands,
    surface: Res<PaintSurface>,
    config: Res<PaintConfig>,
    mut images: ResMut<Assets<Image>>,
) {
    let (width, height) = surface.image().dimensions();
    let mut image = Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        surface.image().as_raw().clone(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::all(),
    );
    image.sampler = ImageSampler::nearest();
    let handle = images.add(image);

    let mut node = Node::default();
    PanelRect::new(&config, surface.side()).layout(&mut node);

    commands
        .spawn((
            Name::new("Paint panel"),
            PaintPanelNode,
            node,
            BackgroundColor(Color::WHITE),
        ))
        .with_children(|parent| {
            parent.spawn((
                ImageNode::new(handle.clone()),
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
            ));
        });

    commands.insert_resource(PaintPanel {
        image: handle,
        revision: surface.revision(),
    });
}

/// Keeps the drawn panel in step with the rectangle `paint_input` maps through.
fn layout_paint_panel(
    config: Res<PaintConfig>,
    surface: Res<PaintSurface>,
    mut panels: Query<&mut Node, With<PaintPanelNode>>,
) {
    if !config.is_changed() {
        return;
    }

    let rect = PanelRect::new(&config, surface.side());
    for mut node in &mut panels {
        rect.layout(&mut node);
    }
}

fn release_cursor(mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = windows.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

fn paint_input(
    buttons: Res<ButtonInput<MouseButton>>,
    mut cursor_moved: EventReader<CursorMoved>,
    mut wheel: EventReader<MouseWheel>,
    windows: Query<&Window, With<PrimaryWindow>>,
    config: Res<PaintConfig>,
    mut surface: ResMut<PaintSurface>,
) {
    if config.is_changed() {
        surface.apply_config(&config);
    }

    let Ok(window) = windows.get_single() else {
        return;
    };

    // The fly camera owns the pointer while the cursor is grabbed.
    if window.cursor_options.grab_mode != CursorGrabMode::None {
        cursor_moved.clear();
        wheel.clear();
        if buttons.just_released(MouseButton::Left) {
            surface.end_stroke();
        }
        return;
    }

    let rect = PanelRect::new(&config, surface.side());
    let hovered = window
        .cursor_position()
        .and_then(|cursor| rect.to_surface(cursor));

    if buttons.just_pressed(MouseButton::Left) && hovered.is_some() {
        surface.begin_stroke();
    }

    let mut stamps = 0;
    for event in cursor_moved.read() {
        if let Some(point) = rect.to_surface(event.position) {
            stamps += surface.stroke_to(point.x, point.y) as usize;
        }
    }
    if stamps > 0 {
        debug!("Stamped {stamps} times, revision {}", surface.revision());
    }

    if buttons.just_released(MouseButton::Left) {
        surface.end_stroke();
    }

    for event in wheel.read() {
        if hovered.is_none() {
            continue;
        }

        let delta = match event.unit {
            MouseScrollUnit::Line => event.y * config.wheel_line_step,
            MouseScrollUnit::Pixel => event.y * config.wheel_pixel_scale,
        };
        let radius = surface.adjust_radius(delta);
        debug!("Pen radius: {radius}");
    }
}

fn sync_terrain_heights(
    surface: Res<PaintSurface>,
    mut terrain: ResMut<TerrainSurface>,
    mut synced_revision: Local<u64>,
) {
    if surface.revision() == *synced_revision {
        return;
    }

    match sync_from_surface(&surface, &mut terrain) {
        Ok(()) => *synced_revision = surface.revision(),
        Err(err) => error!("Height sync failed: {err}"),
    }
}

fn upload_terrain_positions(
    mut terrain: ResMut<TerrainSurface>,
    terrain_mesh: Query<(Entity, &Mesh3d), With<TerrainMesh>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut recalculate_normals: EventWriter<RecalculateNormals>,
) {
    if !terrain.is_dirty() {
        return;
    }

    for (entity, mesh_3d) in &terrain_mesh {
        let Some(mesh) = meshes.get_mut(&mesh_3d.0) else {
            continue;
        };

        if terrain.upload_positions(mesh) {
            recalculate_normals.send(RecalculateNormals(entity));
        }
    }
}

fn recalculate_terrain_normals(
    mut recalculate_normals: EventReader<RecalculateNormals>,
    mesh_3d: Query<&Mesh3d>,
    mut meshes: ResMut<Assets<Mesh>>,
    config: Res<ShadingConfig>,
    mut pending: Local<Vec<Entity>>,
    mut local_timer: Local<Timer>,
    time: Res<Time>,
) {
    if !config.relief_normals {
        recalculate_normals.clear();
        pending.clear();
        return;
    }

    pending.extend(recalculate_normals.read().map(std::ops::Deref::deref));

    let interval = Duration::from_secs_f32(config.interval_secs.max(0.001));
    if local_timer.duration() != interval {
        local_timer.set_duration(interval);
        local_timer.set_mode(TimerMode::Repeating);
    }

    if !local_timer.tick(time.delta()).just_finished() || pending.is_empty() {
        return;
    }

    for entity in pending.drain(..).unique() {
        let Ok(chunk) = mesh_3d.get(entity) else {
            continue;
        };
        if let Some(mesh) = meshes.get_mut(&chunk.0) {
            mesh.compute_normals();
        }
    }
}

fn refresh_paint_panel(
    surface: Res<PaintSurface>,
    mut panel: ResMut<PaintPanel>,
    mut images: ResMut<Assets<Image>>,
) {
    if panel.revision == surface.revision() {
        return;
    }

    let Some(image) = images.get_mut(&panel.image) else {
        return;
    };

    let pixels = surface.image().as_raw();
    if image.data.len() != pixels.len() {
        warn!("Paint panel texture does not match the surface size");
        return;
    }

    image.data.copy_from_slice(pixels);
    panel.revision = surface.revision();
}
