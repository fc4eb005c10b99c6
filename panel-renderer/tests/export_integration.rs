//! Integration tests for the export compositor and its agreement with the
//! preview surface.

use panel_core::{
    CoordinateTransform, LayoutStore, PanelGeometry, PanelSizeClass, Point, PointerEvent, Session,
    SessionCodec, WallWidth,
};
use panel_renderer::image::{create_solid_color, encode_png_rgba};
use panel_renderer::{
    ExportCompositor, ExportConfig, FilterType, PreviewSurface, RenderError, TextureCatalog,
};

const WALL: [u8; 3] = [0, 0, 255];
const PANEL: [u8; 3] = [255, 0, 0];

fn photo(width: u32, height: u32) -> Vec<u8> {
    encode_png_rgba(&create_solid_color(width, height, [0, 0, 255, 255])).expect("encode photo")
}

fn catalog() -> TextureCatalog {
    let mut catalog = TextureCatalog::new();
    catalog.insert(
        "Red",
        encode_png_rgba(&create_solid_color(16, 16, [255, 0, 0, 255])).expect("encode texture"),
    );
    catalog
}

fn compositor() -> ExportCompositor {
    ExportCompositor::new(ExportConfig {
        filter: FilterType::Nearest,
        ..ExportConfig::default()
    })
}

fn wall() -> WallWidth {
    WallWidth::new(400.0).expect("wall")
}

// ==========================================================================
// Reference scenario: 400 cm wall, 1600 px photo
// ==========================================================================

#[test]
fn m_panel_lands_at_scaled_position() {
    let mut store = LayoutStore::new();
    store.add(PanelSizeClass::M, "Red", Some(Point::new(100.0, 100.0)));

    let out = compositor()
        .compose(&photo(1600, 1200), wall(), &store, &catalog())
        .expect("compose");
    assert_eq!(out.image.dimensions(), (1600, 1200));

    // Export box: 190 x 380 at (200, 200).
    assert_eq!(out.image.get_pixel(200, 200).0, PANEL);
    assert_eq!(out.image.get_pixel(389, 579).0, PANEL);
    assert_eq!(out.image.get_pixel(199, 300).0, WALL);
    assert_eq!(out.image.get_pixel(390, 300).0, WALL);
    assert_eq!(out.image.get_pixel(300, 580).0, WALL);
}

#[test]
fn rotated_m_panel_pivots_on_center() {
    let mut store = LayoutStore::new();
    let id = store.add(PanelSizeClass::M, "Red", Some(Point::new(100.0, 100.0)));
    store.rotate_step(&id).expect("rotate");

    let out = compositor()
        .compose(&photo(1600, 1200), wall(), &store, &catalog())
        .expect("compose");

    // Center (295, 390); rotated box 380 x 190 at (105, 295).
    assert_eq!(out.image.get_pixel(105, 295).0, PANEL);
    assert_eq!(out.image.get_pixel(484, 484).0, PANEL);
    assert_eq!(out.image.get_pixel(104, 390).0, WALL);
    assert_eq!(out.image.get_pixel(295, 294).0, WALL);
    assert_eq!(out.image.get_pixel(295, 485).0, WALL);
}

#[test]
fn moon_corners_show_the_wall() {
    let mut store = LayoutStore::new();
    store.add(PanelSizeClass::Moon, "Red", Some(Point::new(0.0, 0.0)));

    let out = compositor()
        .compose(&photo(1600, 1200), wall(), &store, &catalog())
        .expect("compose");

    // 380 px disc centred at (190, 190).
    assert_eq!(out.image.get_pixel(190, 190).0, PANEL);
    assert_eq!(out.image.get_pixel(190, 2).0, PANEL);
    assert_eq!(out.image.get_pixel(2, 2).0, WALL);
    assert_eq!(out.image.get_pixel(377, 377).0, WALL);
}

#[test]
fn later_panels_draw_on_top() {
    let mut catalog = catalog();
    catalog.insert(
        "Green",
        encode_png_rgba(&create_solid_color(4, 4, [0, 255, 0, 255])).expect("encode"),
    );
    let mut store = LayoutStore::new();
    store.add(PanelSizeClass::L, "Red", Some(Point::new(0.0, 0.0)));
    store.add(PanelSizeClass::L, "Green", Some(Point::new(50.0, 50.0)));

    let out = compositor()
        .compose(&photo(1600, 1200), wall(), &store, &catalog)
        .expect("compose");
    assert_eq!(out.image.get_pixel(150, 150).0, [0, 255, 0]);
    assert_eq!(out.image.get_pixel(20, 20).0, PANEL);
}

// ==========================================================================
// Failure handling
// ==========================================================================

#[test]
fn undecodable_photo_is_rejected() {
    let result = compositor().compose(b"\x00\x01\x02", wall(), &LayoutStore::new(), &catalog());
    assert!(matches!(result, Err(RenderError::UnsupportedImageFormat(_))));
}

#[test]
fn broken_texture_skips_only_that_panel() {
    let mut catalog = catalog();
    catalog.insert("Broken", b"not an image".to_vec());
    let mut store = LayoutStore::new();
    let broken = store.add(PanelSizeClass::L, "Broken", Some(Point::new(0.0, 0.0)));
    let missing = store.add(PanelSizeClass::L, "Absent", Some(Point::new(200.0, 0.0)));
    store.add(PanelSizeClass::L, "Red", Some(Point::new(400.0, 0.0)));

    let out = compositor()
        .compose(&photo(1600, 1200), wall(), &store, &catalog)
        .expect("compose");
    assert_eq!(out.skipped, vec![broken, missing]);
    assert_eq!(out.image.get_pixel(100, 100).0, WALL);
    assert_eq!(out.image.get_pixel(900, 100).0, PANEL);
}

// ==========================================================================
// Preview / export agreement
// ==========================================================================

#[test]
fn preview_and_export_geometry_agree() {
    let transform = CoordinateTransform::new(wall(), 2400);
    let mut store = LayoutStore::new();
    for (i, size) in PanelSizeClass::ALL.into_iter().enumerate() {
        let id = store.add(size, "Red", None);
        for _ in 0..i {
            store.rotate_step(&id).expect("rotate");
        }
    }

    let surface = PreviewSurface::build(&store, transform);
    let scale = transform.export_scale();
    for (region, panel) in surface.regions().iter().zip(store.iter()) {
        let export = PanelGeometry::export(panel, &transform);
        let preview_center = region.geometry.center();
        assert!((export.center().x - preview_center.x * scale).abs() < 1e-9);
        assert!((export.center().y - preview_center.y * scale).abs() < 1e-9);
        assert!((export.size.width - region.geometry.size.width * scale).abs() < 1e-9);
        assert!((export.size.height - region.geometry.size.height * scale).abs() < 1e-9);
        assert_eq!(export.rotation_deg, region.geometry.rotation_deg);
    }
}

#[test]
fn raster_preview_matches_downscaled_export() {
    let mut store = LayoutStore::new();
    let id = store.add(PanelSizeClass::XL, "Red", Some(Point::new(120.0, 80.0)));
    store.rotate_step(&id).expect("rotate");
    let photo = photo(1600, 1200);

    let mut compositor = compositor();
    let export = compositor
        .compose(&photo, wall(), &store, &catalog())
        .expect("export");
    let preview = compositor
        .compose_preview(&photo, wall(), &store, &catalog())
        .expect("preview");

    // Sample preview pixel centres well inside or outside the panel; the
    // export at twice the scale must agree.
    for (x, y) in [(300, 175), (120, 130), (300, 300), (220, 20), (60, 175)] {
        let p = preview.image.get_pixel(x, y).0;
        let e = export.image.get_pixel(x * 2, y * 2).0;
        assert_eq!(p, e, "preview ({x}, {y})");
    }
}

// ==========================================================================
// Session-level flow
// ==========================================================================

#[test]
fn drag_then_export_uses_synchronized_layout() {
    let mut session = Session::new(wall());
    let id = session.add_panel(None, PanelSizeClass::L, "Red", Some(Point::new(0.0, 0.0)));
    let transform = session.transform(1600);
    let mut surface = PreviewSurface::build(session.layout(), transform);

    surface.handle_pointer(PointerEvent::press(10.0, 10.0));
    surface.handle_pointer(PointerEvent::moved(210.0, 110.0));
    surface.handle_pointer(PointerEvent::release(210.0, 110.0));

    let out = compositor()
        .compose_session(&photo(1600, 1200), &mut session, Some(&surface), &catalog())
        .expect("compose");
    assert_eq!(
        session.layout().get(&id).expect("panel").position,
        Point::new(200.0, 100.0)
    );
    // Moved panel covers (400..780, 200..580) in export space.
    assert_eq!(out.image.get_pixel(500, 300).0, PANEL);
    assert_eq!(out.image.get_pixel(100, 100).0, WALL);

    let first = session.to_json(Some(&surface)).expect("json");
    let second = session.to_json(Some(&surface)).expect("json");
    assert_eq!(first, second);
}

#[test]
fn session_rotation_reaches_export_with_a_live_surface() {
    let mut session = Session::new(wall());
    let id = session.add_panel(None, PanelSizeClass::M, "Red", Some(Point::new(100.0, 100.0)));
    let mut surface = PreviewSurface::build(session.layout(), session.transform(1600));

    assert_eq!(session.rotate_panel(Some(&mut surface), &id).expect("rotate"), 90);
    let out = compositor()
        .compose_session(&photo(1600, 1200), &mut session, Some(&surface), &catalog())
        .expect("compose");

    assert_eq!(session.layout().get(&id).expect("panel").rotation_deg, 90);
    // Same box as the rotated reference scenario.
    assert_eq!(out.image.get_pixel(105, 295).0, PANEL);
    assert_eq!(out.image.get_pixel(484, 484).0, PANEL);
    assert_eq!(out.image.get_pixel(295, 294).0, WALL);
}

#[test]
fn session_move_reaches_export_with_a_live_surface() {
    let mut session = Session::new(wall());
    let id = session.add_panel(None, PanelSizeClass::L, "Red", Some(Point::new(0.0, 0.0)));
    let mut surface = PreviewSurface::build(session.layout(), session.transform(1600));

    session
        .move_panel(Some(&mut surface), &id, Point::new(200.0, 100.0))
        .expect("move");
    let out = compositor()
        .compose_session(&photo(1600, 1200), &mut session, Some(&surface), &catalog())
        .expect("compose");

    assert_eq!(out.image.get_pixel(500, 300).0, PANEL);
    assert_eq!(out.image.get_pixel(100, 100).0, WALL);
}

// ==========================================================================
// Reusing a compositor
// ==========================================================================

#[test]
fn reused_compositor_follows_the_current_catalog() {
    let mut store = LayoutStore::new();
    let id = store.add(PanelSizeClass::L, "Red", Some(Point::new(0.0, 0.0)));
    let photo = photo(1600, 1200);
    let mut compositor = compositor();

    let first = compositor
        .compose(&photo, wall(), &store, &catalog())
        .expect("compose");
    assert_eq!(first.image.get_pixel(100, 100).0, PANEL);

    let empty = compositor
        .compose(&photo, wall(), &store, &TextureCatalog::new())
        .expect("compose");
    assert_eq!(empty.skipped, vec![id]);
    assert_eq!(empty.image.get_pixel(100, 100).0, WALL);

    let mut recoloured = TextureCatalog::new();
    recoloured.insert(
        "Red",
        encode_png_rgba(&create_solid_color(4, 4, [0, 255, 0, 255])).expect("encode"),
    );
    let changed = compositor
        .compose(&photo, wall(), &store, &recoloured)
        .expect("compose");
    assert_eq!(changed.image.get_pixel(100, 100).0, [0, 255, 0]);
}

#[test]
fn export_is_rederivable_from_session_record() {
    let mut session = Session::new(WallWidth::new(250.0).expect("wall"));
    session.add_panel(None, PanelSizeClass::XL, "Red", None);
    let moon = session.add_panel(None, PanelSizeClass::Moon, "Red", None);
    session.rotate_panel(None, &moon).expect("rotate");

    let json = session.to_json(None).expect("json");
    let (wall_width, restored) = SessionCodec::from_json(&json).expect("restore");
    let photo = photo(1000, 700);

    let mut compositor = compositor();
    let original = compositor
        .compose(&photo, session.wall_width(), session.layout(), &catalog())
        .expect("original");
    let replay = compositor
        .compose(&photo, wall_width, &restored, &catalog())
        .expect("replay");
    assert_eq!(original.image, replay.image);
}
