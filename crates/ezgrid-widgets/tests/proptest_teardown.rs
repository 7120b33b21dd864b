#![forbid(unsafe_code)]

//! Property tests for widget teardown.
//!
//! Builds random widget trees, destroys random subtrees, and checks that:
//!
//! - the tree stays consistent (`validate`)
//! - every native handle a teardown reports is gone from the toolkit
//! - destroying everything under the root leaves only the root alive

use ezgrid_layout::Place;
use ezgrid_widgets::{Gui, GuiConfig, HeadlessToolkit, ImageOptions, WidgetId};
use image::RgbImage;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Frame(usize),
    Label(usize),
    Entry(usize),
    Listbox(usize),
    Canvas(usize),
    Thumbnail(usize, usize),
    Notebook(usize),
    Tab(usize),
    Destroy(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => any::<usize>().prop_map(Op::Frame),
        2 => any::<usize>().prop_map(Op::Label),
        1 => any::<usize>().prop_map(Op::Entry),
        1 => any::<usize>().prop_map(Op::Listbox),
        1 => any::<usize>().prop_map(Op::Canvas),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Thumbnail(a, b)),
        1 => any::<usize>().prop_map(Op::Notebook),
        2 => any::<usize>().prop_map(Op::Tab),
        2 => any::<usize>().prop_map(Op::Destroy),
    ]
}

fn pick(ids: &[WidgetId], n: usize) -> Option<WidgetId> {
    (!ids.is_empty()).then(|| ids[n % ids.len()])
}

/// Live nodes matching `keep`, in ID order.
fn live(gui: &Gui<HeadlessToolkit>, keep: impl Fn(&ezgrid_widgets::WidgetNode) -> bool) -> Vec<WidgetId> {
    gui.tree().iter().filter(|n| keep(n)).map(|n| n.id()).collect()
}

proptest! {
    #[test]
    fn teardown_releases_everything(ops in proptest::collection::vec(op(), 1..60)) {
        let mut gui = Gui::new(HeadlessToolkit::new(), GuiConfig::default()).unwrap();
        let root = gui.root();

        for op in ops {
            let hosts = live(&gui, |n| n.is_container());
            let images = live(&gui, |n| n.kind().shows_images());
            let notebooks = live(&gui, |n| n.tabs().is_some());
            let host = pick(&hosts, 0).unwrap_or(root);
            match op {
                Op::Frame(n) => {
                    let parent = pick(&hosts, n).unwrap_or(host);
                    gui.add_frame(parent, Place::next_row(), 1).unwrap();
                }
                Op::Label(n) => {
                    let parent = pick(&hosts, n).unwrap_or(host);
                    gui.add_label(parent, "l", Place::same_row()).unwrap();
                }
                Op::Entry(n) => {
                    let parent = pick(&hosts, n).unwrap_or(host);
                    gui.add_entry_field(parent, Some("E"), "", Place::next_row()).unwrap();
                }
                Op::Listbox(n) => {
                    let parent = pick(&hosts, n).unwrap_or(host);
                    gui.add_listbox(parent, None, vec!["a".into()], None, Place::next_row(), 2)
                        .unwrap();
                }
                Op::Canvas(n) => {
                    let parent = pick(&hosts, n).unwrap_or(host);
                    gui.add_canvas(
                        parent,
                        ImageOptions::default().source(RgbImage::new(8, 4)),
                        Place::next_row(),
                    )
                    .unwrap();
                }
                Op::Thumbnail(a, b) => {
                    if let Some(base) = pick(&images, a) {
                        let parent = pick(&hosts, b).unwrap_or(host);
                        gui.add_label_image(
                            parent,
                            ImageOptions::default().thumbnail_of(base).thumbnail_width(4),
                            Place::next_row(),
                            1,
                        )
                        .unwrap();
                    }
                }
                Op::Notebook(n) => {
                    let parent = pick(&hosts, n).unwrap_or(host);
                    gui.add_notebook(parent, Place::next_row(), 1).unwrap();
                }
                Op::Tab(n) => {
                    if let Some(nb) = pick(&notebooks, n) {
                        gui.add_tab(nb, None, None).unwrap();
                    }
                }
                Op::Destroy(n) => {
                    let victims: Vec<WidgetId> =
                        live(&gui, |node| node.id() != root);
                    if let Some(victim) = pick(&victims, n) {
                        let teardown = gui.destroy(victim).unwrap();
                        prop_assert!(teardown.destroyed.contains(&victim));
                        for handle in &teardown.released {
                            prop_assert!(!gui.toolkit().is_live(*handle));
                        }
                    }
                }
            }
            prop_assert!(gui.tree().validate().is_ok());
        }

        let children = gui.node(root).unwrap().children().to_vec();
        for child in children {
            gui.destroy(child).unwrap();
        }
        prop_assert_eq!(gui.tree().len(), 1);
        prop_assert_eq!(gui.toolkit().live_count(), 1);
    }
}
