// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hover-intent state machine for the category flyout.
//!
//! Pointer events move the machine between phases and arm deadlines;
//! [`FlyoutMachine::tick`] fires whichever deadline has passed. Nothing
//! here owns a timer, so the host decides how often to tick.

use super::clock::Clock;
use std::time::{Duration, Instant};

/// Hover time on a root category before its subpanel opens.
pub const HOVER_INTENT_DELAY: Duration = Duration::from_millis(500);
/// Grace period after the pointer leaves both panels.
pub const CLOSE_GRACE_DELAY: Duration = Duration::from_millis(120);

/// Container rectangle captured when the flyout expands.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlyoutPhase {
    Idle,
    /// Main panel shown; `open` is the category whose subpanel is visible.
    Expanded { open: Option<String> },
    /// Hover-intent armed for `next`.
    PendingOpen {
        open: Option<String>,
        next: String,
        due: Instant,
    },
    /// Pointer left both panels; collapses at `due`.
    PendingClose { open: Option<String>, due: Instant },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlyoutEvent {
    Expanded,
    SubpanelOpened(String),
    SubpanelClosed,
    Collapsed,
}

pub struct FlyoutMachine<C> {
    clock: C,
    phase: FlyoutPhase,
    anchor: Option<Rect>,
    in_main: bool,
    in_subpanel: bool,
}

impl<C: Clock> FlyoutMachine<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            phase: FlyoutPhase::Idle,
            anchor: None,
            in_main: false,
            in_subpanel: false,
        }
    }

    pub fn phase(&self) -> &FlyoutPhase {
        &self.phase
    }

    pub fn is_expanded(&self) -> bool {
        self.phase != FlyoutPhase::Idle
    }

    /// Category whose subpanel is currently visible.
    pub fn open_category(&self) -> Option<&str> {
        match &self.phase {
            FlyoutPhase::Idle => None,
            FlyoutPhase::Expanded { open }
            | FlyoutPhase::PendingOpen { open, .. }
            | FlyoutPhase::PendingClose { open, .. } => open.as_deref(),
        }
    }

    pub fn anchor(&self) -> Option<Rect> {
        self.anchor
    }

    fn take_open(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.phase, FlyoutPhase::Idle) {
            FlyoutPhase::Idle => None,
            FlyoutPhase::Expanded { open }
            | FlyoutPhase::PendingOpen { open, .. }
            | FlyoutPhase::PendingClose { open, .. } => open,
        }
    }

    /// Pointer entered the sidebar container (the main panel).
    pub fn enter_main(&mut self, container: Rect) -> Vec<FlyoutEvent> {
        self.in_main = true;
        match &self.phase {
            FlyoutPhase::Idle => {
                self.anchor = Some(container);
                self.phase = FlyoutPhase::Expanded { open: None };
                vec![FlyoutEvent::Expanded]
            }
            FlyoutPhase::PendingClose { .. } => {
                let open = self.take_open();
                self.phase = FlyoutPhase::Expanded { open };
                vec![]
            }
            _ => vec![],
        }
    }

    pub fn leave_main(&mut self) -> Vec<FlyoutEvent> {
        self.in_main = false;
        self.arm_close_if_outside();
        vec![]
    }

    pub fn enter_subpanel(&mut self) -> Vec<FlyoutEvent> {
        self.in_subpanel = true;
        if let FlyoutPhase::PendingClose { .. } = self.phase {
            let open = self.take_open();
            self.phase = FlyoutPhase::Expanded { open };
        }
        vec![]
    }

    pub fn leave_subpanel(&mut self) -> Vec<FlyoutEvent> {
        self.in_subpanel = false;
        self.arm_close_if_outside();
        vec![]
    }

    fn arm_close_if_outside(&mut self) {
        if self.in_main || self.in_subpanel || self.phase == FlyoutPhase::Idle {
            return;
        }
        let due = self.clock.now() + CLOSE_GRACE_DELAY;
        let open = self.take_open();
        self.phase = FlyoutPhase::PendingClose { open, due };
    }

    /// Pointer entered a root category row.
    pub fn enter_category(&mut self, id: &str, has_children: bool) -> Vec<FlyoutEvent> {
        if !self.is_expanded() {
            return vec![];
        }

        let open = self.take_open();
        if !has_children {
            self.phase = FlyoutPhase::Expanded { open: None };
            return match open {
                Some(_) => vec![FlyoutEvent::SubpanelClosed],
                None => vec![],
            };
        }

        if open.as_deref() == Some(id) {
            self.phase = FlyoutPhase::Expanded { open };
            return vec![];
        }

        self.phase = FlyoutPhase::PendingOpen {
            open,
            next: id.to_string(),
            due: self.clock.now() + HOVER_INTENT_DELAY,
        };
        vec![]
    }

    /// Pointer left a root row before the hover-intent fired.
    pub fn leave_category(&mut self) -> Vec<FlyoutEvent> {
        if let FlyoutPhase::PendingOpen { .. } = self.phase {
            let open = self.take_open();
            self.phase = FlyoutPhase::Expanded { open };
        }
        vec![]
    }

    /// Click on the dimming overlay.
    pub fn click_overlay(&mut self) -> Vec<FlyoutEvent> {
        self.collapse()
    }

    fn collapse(&mut self) -> Vec<FlyoutEvent> {
        if self.phase == FlyoutPhase::Idle {
            return vec![];
        }
        let open = self.take_open();
        self.anchor = None;
        self.in_main = false;
        self.in_subpanel = false;

        let mut events = Vec::new();
        if open.is_some() {
            events.push(FlyoutEvent::SubpanelClosed);
        }
        events.push(FlyoutEvent::Collapsed);
        events
    }

    /// Fire any deadline that has passed.
    pub fn tick(&mut self) -> Vec<FlyoutEvent> {
        let now = self.clock.now();
        match &self.phase {
            FlyoutPhase::PendingOpen { next, due, .. } if now >= *due => {
                let next = next.clone();
                self.phase = FlyoutPhase::Expanded {
                    open: Some(next.clone()),
                };
                vec![FlyoutEvent::SubpanelOpened(next)]
            }
            FlyoutPhase::PendingClose { due, .. } if now >= *due => self.collapse(),
            _ => vec![],
        }
    }

    /// Next deadline, for hosts that sleep until it.
    pub fn next_deadline(&self) -> Option<Instant> {
        match &self.phase {
            FlyoutPhase::PendingOpen { due, .. } | FlyoutPhase::PendingClose { due, .. } => {
                Some(*due)
            }
            _ => None,
        }
    }
}
