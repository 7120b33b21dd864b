#![forbid(unsafe_code)]

//! Images loaded from disk.

use ezgrid_layout::Place;
use ezgrid_widgets::{Gui, GuiConfig, HeadlessToolkit, ImageOptions, WidgetError};
use image::{Rgb, RgbImage};

fn gui() -> Gui<HeadlessToolkit> {
    Gui::new(HeadlessToolkit::new(), GuiConfig::default()).unwrap()
}

#[test]
fn canvas_loads_png_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.png");
    RgbImage::from_pixel(120, 60, Rgb([200, 10, 10]))
        .save(&path)
        .unwrap();

    let mut gui = gui();
    let root = gui.root();
    let canvas = gui
        .add_canvas(root, ImageOptions::default().source(path.clone()), Place::next_row())
        .unwrap();
    let thumb = gui
        .add_label_image(
            root,
            ImageOptions::default().thumbnail_of(canvas).thumbnail_width(30),
            Place::same_row(),
            1,
        )
        .unwrap();

    let state = gui.node(canvas).unwrap().image().unwrap();
    assert_eq!(state.shown, Some((120, 60)));
    let handle = gui.handle(thumb).unwrap();
    assert_eq!(gui.toolkit().widget(handle).unwrap().image_size, Some((30, 15)));
}

#[test]
fn corrupt_file_leaves_canvas_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.png");
    let bad = dir.path().join("bad.png");
    RgbImage::new(10, 10).save(&good).unwrap();
    std::fs::write(&bad, b"not a png").unwrap();

    let mut gui = gui();
    let root = gui.root();
    let canvas = gui
        .add_canvas(root, ImageOptions::default().source(good), Place::next_row())
        .unwrap();
    let err = gui.update_image(canvas, bad).unwrap_err();
    assert!(matches!(err, WidgetError::Image(_)));
    assert_eq!(gui.node(canvas).unwrap().image().unwrap().shown, Some((10, 10)));
}

#[test]
fn failed_initial_load_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.gif");

    let mut gui = gui();
    let root = gui.root();
    let live = gui.toolkit().live_count();
    let err = gui
        .add_canvas(root, ImageOptions::default().source(missing), Place::next_row())
        .unwrap_err();
    assert!(matches!(err, WidgetError::Image(_)));
    assert!(gui.node(root).unwrap().children().is_empty());
    assert_eq!(gui.toolkit().live_count(), live);
}
