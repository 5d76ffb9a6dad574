// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scrolls a 600-card grid through a simulated page and prints what gets realized.
//!
//! Run:
//! - `cargo run -p understory_virtual_grid --example grid_scroll`

use kurbo::Size;
use understory_virtual_grid::{
    GridConfig, ListenerOptions, PassiveProbe, ProbeError, ScrollSource, Viewport,
    WindowController,
};

const CARD_HEIGHT: f64 = 200.0;
const PAGE_WIDTH: f64 = 1280.0;
const VIEWPORT_HEIGHT: f64 = 800.0;

/// A stand-in for a browser window.
#[derive(Debug, Default)]
struct Page {
    listeners: Vec<(u32, ListenerOptions)>,
    next_id: u32,
}

impl ScrollSource for Page {
    type Token = u32;

    fn probe_options(&mut self, probe: &PassiveProbe) -> Result<(), ProbeError> {
        let _ = probe.passive();
        Ok(())
    }

    fn subscribe(&mut self, options: ListenerOptions) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, options));
        id
    }

    fn unsubscribe(&mut self, token: u32, _options: ListenerOptions) {
        self.listeners.retain(|(id, _)| *id != token);
    }
}

fn main() {
    let cards: Vec<String> = (0..600).map(|i| format!("card {i}")).collect();
    let mut grid = WindowController::new(GridConfig::default().with_class_name("cards"), cards.len());
    grid.set_on_scroll(|report| {
        println!(
            "  on screen: {:?}..{:?}",
            report.first_visible_index, report.last_visible_index
        );
    });

    let mut page = Page::default();
    let subscription = grid.mount(&mut page, 0.0, Viewport::new(0.0, VIEWPORT_HEIGHT));
    println!("listening with {:?}", subscription.options());

    // First pass: nothing measured yet, so the default window renders in flow.
    let first = grid.render(&cards, |card, style, is_reference| {
        format!("{card} [{style}]{}", if is_reference { " (measured)" } else { "" })
    });
    println!("unmeasured: {} cards, e.g. {}", first.len(), first[0]);

    // The host measures the container and the reference card.
    grid.observe_container(Size::new(PAGE_WIDTH, VIEWPORT_HEIGHT));
    grid.observe_item_height(CARD_HEIGHT);
    println!("container: {}", grid.container_style());

    for scroll_top in [0.0, 1000.0, 2000.0, 15_000.0, 29_200.0] {
        println!("scroll_top = {scroll_top}");
        grid.handle_scroll(Viewport::new(scroll_top, VIEWPORT_HEIGHT));
        let realized = grid.realize(&cards);
        if let (Some(head), Some(tail)) = (realized.first(), realized.last()) {
            println!(
                "  realized {} cards: {} [{}] .. {} [{}]",
                realized.len(),
                head.item,
                head.style,
                tail.item,
                tail.style
            );
        }
    }

    let stats = grid.cache_stats();
    println!("style cache: {} hits, {} misses", stats.hits, stats.misses);

    grid.unmount(subscription);
    assert!(page.listeners.is_empty());
}
