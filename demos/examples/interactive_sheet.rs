// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless drag-to-dismiss walkthrough: a sheet with a scrolling list and an action button.
//!
//! This example shows how a host wires `understory_presentation` into its
//! own view tree:
//! - a `PresentationSurface` + `DragHost` implementation over plain handles,
//! - a `PresentationRegistry` answering "which presentation owns this view",
//! - a scripted pan that first scrolls the list, then hands off to the sheet.
//!
//! Run:
//! - `cargo run -p understory_presentation_demos --example interactive_sheet`

use kurbo::{Insets, Point, Rect, Size, Vec2};
use understory_presentation::{
    Action, ActionId, ActionRegions, ActionStyle, DragHost, DragResolution, LifecycleEvent,
    Orientation, PresentationController, PresentationRegistry, PresentationSurface, ScrollMetrics,
    Visuals,
};

const SCREEN: Rect = Rect::new(0.0, 0.0, 390.0, 844.0);
const ROOT_WINDOW: u32 = 0;
const SHEET_VIEW: u32 = 10;
const DIMMING_VIEW: u32 = 11;
const LIST_VIEW: u32 = 12;
const FRAME: f64 = 1.0 / 60.0;

/// A view tree with one root window and a sheet holding a list and a button row.
#[derive(Debug)]
struct HeadlessHost {
    attached_to: Option<u32>,
    frame: Rect,
    list: ScrollMetrics,
    buttons: ActionRegions,
    frames_rendered: usize,
}

impl HeadlessHost {
    fn new() -> Self {
        Self {
            attached_to: None,
            frame: Rect::ZERO,
            list: ScrollMetrics {
                offset_y: 120.0,
                top_inset: 0.0,
                is_scroll_enabled: true,
            },
            buttons: ActionRegions::new(),
            frames_rendered: 0,
        }
    }

    /// The list's own pan handling, which runs alongside the sheet's.
    fn scroll_list(&mut self, delta_y: f64) {
        if self.list.is_scroll_enabled {
            self.list.offset_y = (self.list.offset_y - delta_y).max(self.list.top_boundary());
        }
    }

    fn list_rect(&self) -> Rect {
        Rect::new(self.frame.x0, self.frame.y0 + 24.0, self.frame.x1, self.frame.y1 - 80.0)
    }
}

impl PresentationSurface for HeadlessHost {
    type View = u32;

    fn presented_view(&self) -> u32 {
        SHEET_VIEW
    }

    fn dimming_view(&self) -> u32 {
        DIMMING_VIEW
    }

    fn make_covering_window(&mut self) -> u32 {
        ROOT_WINDOW + 1
    }

    fn tear_down_window(&mut self, window: u32) {
        println!("  tear down window {window}");
    }

    fn attach(&mut self, container: u32) {
        self.attached_to = Some(container);
    }

    fn detach(&mut self) {
        self.attached_to = None;
    }

    fn container_bounds(&self) -> Option<Rect> {
        Some(SCREEN)
    }

    fn orientation(&self) -> Orientation {
        Orientation::Portrait
    }

    fn safe_area_insets(&self) -> Insets {
        Insets::new(0.0, 47.0, 0.0, 34.0)
    }

    fn measure(&self, proposal: Size) -> Size {
        Size::new(proposal.width, proposal.height.min(420.0))
    }

    fn apply_visuals(&mut self, visuals: &Visuals) {
        if visuals.frame != self.frame {
            self.frame = visuals.frame;
            // Button row along the bottom of the sheet.
            let row = Rect::new(self.frame.x0 + 16.0, self.frame.y1 - 72.0, self.frame.x1 - 16.0, self.frame.y1 - 28.0);
            self.buttons.set(ActionId(0), row, 12.0);
        }
        self.frames_rendered += 1;
    }

    fn will_show(&mut self) {
        println!("  [hook] will_show");
    }

    fn did_dismiss(&mut self) {
        println!("  [hook] did_dismiss");
    }
}

impl DragHost for HeadlessHost {
    fn action_at(&self, point: Point) -> Option<ActionId> {
        self.buttons.hit(point)
    }

    fn scroll_view_at(&self, point: Point) -> Option<u32> {
        self.list_rect().contains(point).then_some(LIST_VIEW)
    }

    fn scroll_metrics(&self, scroll: u32) -> Option<ScrollMetrics> {
        (scroll == LIST_VIEW).then_some(self.list)
    }

    fn set_scroll_offset(&mut self, scroll: u32, offset_y: f64) {
        if scroll == LIST_VIEW {
            self.list.offset_y = offset_y;
        }
    }

    fn set_scroll_enabled(&mut self, scroll: u32, enabled: bool) {
        if scroll == LIST_VIEW {
            self.list.is_scroll_enabled = enabled;
        }
    }
}

fn settle(sheet: &mut PresentationController<HeadlessHost>) {
    let mut frames = 0;
    while sheet.tick(FRAME) {
        frames += 1;
    }
    println!(
        "  settled after {frames} frames in {:?} (attached to {:?})",
        sheet.state(),
        sheet.surface().attached_to
    );
}

/// Feed a pan to both the sheet and the list, like a platform gesture system would.
fn pan(sheet: &mut PresentationController<HeadlessHost>, from: Point, ys: &[f64], velocity: f64) -> DragResolution {
    if !sheet.pan_began(from) {
        println!("  pan at {from:?} did not begin");
        return DragResolution::Ignored;
    }
    let mut last = 0.0;
    for &y in ys {
        let moved = sheet.pan_changed(Vec2::new(0.0, y));
        if !moved {
            sheet.surface_mut().scroll_list(y - last);
        }
        last = y;
        println!(
            "  pan {y:>6.1}: list offset {:>6.1}, sheet offset {:>6.1}, dimming {:.2}",
            sheet.surface().list.offset_y,
            sheet.visuals().translation_y(),
            sheet.visuals().dimming_alpha,
        );
    }
    let resolution = sheet.pan_ended(Vec2::new(0.0, last), Vec2::new(0.0, velocity));
    println!("  resolved: {resolution:?}");
    resolution
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let mut registry = PresentationRegistry::<u32, usize>::new();
    let mut sheet = PresentationController::sheet(HeadlessHost::new());
    sheet.add_listener(|event: LifecycleEvent| println!("  [listener] {event:?}"));
    sheet.add_action(
        Action::new("Done", ActionStyle::Default).with_handler(|| println!("  [action] Done")),
    );

    println!("show:");
    sheet.show(Some(ROOT_WINDOW));
    registry.register(0, ROOT_WINDOW, sheet.surface().presented_view());
    settle(&mut sheet);
    println!("  frame {:?}", sheet.frame());

    let list_point = sheet.surface().list_rect().center();
    println!("short drag over the list (scrolls first, then springs back):");
    pan(&mut sheet, list_point, &[40.0, 80.0, 120.0, 160.0, 200.0], 0.0);
    settle(&mut sheet);

    let button = sheet.frame().map(|f| Point::new(f.center().x, f.y1 - 50.0));
    if let Some(button) = button {
        println!("drag starting on the Done button:");
        pan(&mut sheet, button, &[150.0], 0.0);
        if let Some(owner) = registry.owner_of(SHEET_VIEW) {
            println!("  tap delivered to presentation {owner}");
            sheet.trigger_action(ActionId(0));
        }
    }
    settle(&mut sheet);
    registry.unregister(0);

    println!("show again and dismiss with a flick:");
    sheet.show(None);
    registry.register(0, ROOT_WINDOW + 1, SHEET_VIEW);
    settle(&mut sheet);
    sheet.surface_mut().list.offset_y = 0.0;
    let list_point = sheet.surface().list_rect().center();
    pan(&mut sheet, list_point, &[12.0, 30.0], 900.0);
    settle(&mut sheet);
    registry.unregister(0);

    println!(
        "rendered {} frames; {} presentations registered",
        sheet.surface().frames_rendered,
        registry.len()
    );
}
