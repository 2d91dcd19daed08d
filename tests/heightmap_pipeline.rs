use heightmap_painter::prelude::*;

fn five_by_five() -> TerrainSurface {
    TerrainSurface::new(&GridConfig {
        step: 1.0,
        ..Default::default()
    })
    .unwrap()
}

fn heights(terrain: &TerrainSurface) -> Vec<f32> {
    terrain.positions().iter().map(|p| p[1]).collect()
}

#[test]
fn painting_the_center_raises_only_the_center_vertex() {
    let mut terrain = five_by_five();
    assert_eq!(terrain.n(), 5);

    let pen = PaintConfig {
        radius: 0.5,
        min_radius: 0.5,
        opacity: 255,
        ..Default::default()
    };
    let mut surface = PaintSurface::new(terrain.n(), &pen);

    sync_from_surface(&surface, &mut terrain).unwrap();
    assert!(heights(&terrain).iter().all(|&h| h == 0.0));

    surface.begin_stroke();
    assert!(surface.stroke_to(2.5, 2.5));
    surface.end_stroke();
    sync_from_surface(&surface, &mut terrain).unwrap();

    let center = linear_index(2, 2, 5);
    for (i, h) in heights(&terrain).into_iter().enumerate() {
        let expected = if i == center { 1.0 } else { 0.0 };
        assert_eq!(h, expected, "vertex {i}");
    }
    assert_eq!(terrain.positions().as_flattened()[3 * center + 1], 1.0);
    assert_eq!(terrain.indices().len(), 96);
    assert!(terrain.is_dirty());
}

#[test]
fn idle_pointer_moves_leave_terrain_flat() {
    let mut terrain = five_by_five();
    let mut surface = PaintSurface::new(terrain.n(), &PaintConfig::default());

    assert!(!surface.stroke_to(2.5, 2.5));
    sync_from_surface(&surface, &mut terrain).unwrap();

    assert!(heights(&terrain).iter().all(|&h| h == 0.0));
}

#[test]
fn overlapping_strokes_build_up_height() {
    let mut terrain = five_by_five();
    let mut surface = PaintSurface::new(terrain.n(), &PaintConfig::default());
    let center = linear_index(2, 2, 5);

    surface.begin_stroke();
    surface.stroke_to(2.5, 2.5);
    surface.end_stroke();
    sync_from_surface(&surface, &mut terrain).unwrap();
    let once = heights(&terrain)[center];

    surface.begin_stroke();
    surface.stroke_to(2.5, 2.5);
    surface.end_stroke();
    sync_from_surface(&surface, &mut terrain).unwrap();
    let twice = heights(&terrain)[center];

    assert!(once > 0.0);
    assert!(twice > once);
    assert!(twice < 1.0);
}

#[test]
fn surface_sized_for_another_grid_is_rejected() {
    let mut terrain = five_by_five();
    let surface = PaintSurface::new(7, &PaintConfig::default());

    assert_eq!(
        sync_from_surface(&surface, &mut terrain),
        Err(TerrainError::IntensityMismatch {
            expected: 5,
            side: 7,
            len: 49
        })
    );
    assert!(!terrain.is_dirty());
}

#[test]
fn topology_and_grid_agree_on_n() {
    for step in [1.0, 0.5, 0.25] {
        let terrain = TerrainSurface::new(&GridConfig {
            step,
            ..Default::default()
        })
        .unwrap();
        let n = terrain.n();

        assert_eq!(terrain.vertex_count(), n * n);
        assert_eq!(terrain.indices(), build_indices(n).as_slice());
        assert!(terrain.indices().iter().all(|&i| (i as usize) < n * n));
    }
}
