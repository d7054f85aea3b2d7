// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Three-level category flyout for the storefront sidebar.
//!
//! [`Sidebar`] ties together the category data, the hover-intent machine,
//! the subpanel layout and the page scroll lock.

pub mod clock;
pub mod layout;
pub mod machine;
pub mod menu;
pub mod scroll_lock;

pub use clock::{Clock, ManualClock, SystemClock};
pub use layout::{subpanel_layout, SubpanelLayout};
pub use machine::{
    FlyoutEvent, FlyoutMachine, FlyoutPhase, Rect, CLOSE_GRACE_DELAY, HOVER_INTENT_DELAY,
};
pub use menu::{CategoryMenu, NOT_FOUND_PLACEHOLDER};
pub use scroll_lock::{InlineStyles, PageElement, PageStyles, ScrollLock};

use crate::models::Category;
use crate::store::SellPointClient;

pub struct Sidebar<C, P> {
    menu: CategoryMenu,
    machine: FlyoutMachine<C>,
    page: P,
    scroll_lock: ScrollLock,
}

impl<C: Clock, P: PageStyles> Sidebar<C, P> {
    pub fn new(clock: C, page: P) -> Self {
        Self {
            menu: CategoryMenu::default(),
            machine: FlyoutMachine::new(clock),
            page,
            scroll_lock: ScrollLock::default(),
        }
    }

    /// Fetch the tree once. Failures leave the placeholder up.
    pub async fn load(&mut self, client: &SellPointClient) {
        self.menu = CategoryMenu::from_fetch(client.category_tree().await);
    }

    pub fn set_menu(&mut self, menu: CategoryMenu) {
        self.menu = menu;
    }

    pub fn menu(&self) -> &CategoryMenu {
        &self.menu
    }

    pub fn machine(&self) -> &FlyoutMachine<C> {
        &self.machine
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    /// Root whose subpanel is showing.
    pub fn open_category(&self) -> Option<&Category> {
        self.machine
            .open_category()
            .and_then(|id| self.menu.root(id))
    }

    /// Subpanel layout for the open category at the given viewport height.
    pub fn subpanel_layout(&self, viewport_height: f64) -> Option<SubpanelLayout> {
        self.open_category()
            .map(|c| subpanel_layout(c.children.len(), viewport_height))
    }

    pub fn enter_main(&mut self, container: Rect) -> Vec<FlyoutEvent> {
        let events = self.machine.enter_main(container);
        self.apply(events)
    }

    pub fn leave_main(&mut self) -> Vec<FlyoutEvent> {
        let events = self.machine.leave_main();
        self.apply(events)
    }

    pub fn enter_subpanel(&mut self) -> Vec<FlyoutEvent> {
        let events = self.machine.enter_subpanel();
        self.apply(events)
    }

    pub fn leave_subpanel(&mut self) -> Vec<FlyoutEvent> {
        let events = self.machine.leave_subpanel();
        self.apply(events)
    }

    pub fn enter_category(&mut self, id: &str) -> Vec<FlyoutEvent> {
        let has_children = self.menu.root(id).is_some_and(Category::has_children);
        let events = self.machine.enter_category(id, has_children);
        self.apply(events)
    }

    pub fn leave_category(&mut self) -> Vec<FlyoutEvent> {
        let events = self.machine.leave_category();
        self.apply(events)
    }

    pub fn click_overlay(&mut self) -> Vec<FlyoutEvent> {
        let events = self.machine.click_overlay();
        self.apply(events)
    }

    pub fn tick(&mut self) -> Vec<FlyoutEvent> {
        let events = self.machine.tick();
        self.apply(events)
    }

    fn apply(&mut self, events: Vec<FlyoutEvent>) -> Vec<FlyoutEvent> {
        for event in &events {
            match event {
                FlyoutEvent::Expanded => self.scroll_lock.lock(&mut self.page),
                FlyoutEvent::Collapsed => self.scroll_lock.unlock(&mut self.page),
                _ => {}
            }
        }
        events
    }
}
