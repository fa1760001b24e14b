// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Guarding tab switches that would discard unsaved edits.


use log::debug;
use serde::{Deserialize, Serialize};

use crate::{constants::UNSAVED_CHANGES_PROMPT, tab::Tab};

/// Asks the user whether it's OK to go ahead.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Whether the active tab has edits that haven't been saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "tab")]
pub enum Guard {
    Clean,
    Dirty(Tab),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// The active tab changed. `discarded` says whether unsaved edits on the
    /// old tab were thrown away.
    Switched { from: Tab, to: Tab, discarded: bool },
    /// The user declined to discard their edits.
    Stayed,
    /// The requested tab is already active.
    AlreadyActive,
    /// The requested tab can't be used yet.
    Unavailable(Tab),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabNavigator {
    active_tab: Tab,
    guard: Guard,
}

impl Default for TabNavigator {
    fn default() -> Self {
        TabNavigator::new()
    }
}

impl TabNavigator {
    /// Start on the Telescope tab with nothing edited.
    pub fn new() -> TabNavigator {
        TabNavigator {
            active_tab: Tab::Telescope,
            guard: Guard::Clean,
        }
    }

    pub fn active(&self) -> Tab {
        self.active_tab
    }

    pub fn guard(&self) -> Guard {
        self.guard
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self.guard, Guard::Dirty(_))
    }

    /// A field of the active tab was edited.
    pub fn on_edit(&mut self) {
        self.guard = Guard::Dirty(self.active_tab);
    }

    /// The active tab was saved (or its edits reverted).
    pub fn on_clean(&mut self) {
        self.guard = Guard::Clean;
    }

    /// Try to switch to `target`. If the active tab has unsaved edits the
    /// user is asked first; the caller is responsible for reverting the old
    /// tab when the outcome says edits were discarded.
    pub fn request(
        &mut self,
        target: Tab,
        available: bool,
        confirm: &mut dyn Confirm,
    ) -> NavOutcome {
        if target == self.active_tab {
            return NavOutcome::AlreadyActive;
        }
        if !available {
            debug!("{target} isn't available yet");
            return NavOutcome::Unavailable(target);
        }

        let discarded = match self.guard {
            Guard::Clean => false,
            Guard::Dirty(_) => {
                if !confirm.confirm(UNSAVED_CHANGES_PROMPT) {
                    debug!("Staying on {}", self.active_tab);
                    return NavOutcome::Stayed;
                }
                true
            }
        };

        let from = self.active_tab;
        self.active_tab = target;
        self.guard = Guard::Clean;
        debug!("Switched from {from} to {target}");
        NavOutcome::Switched {
            from,
            to: target,
            discarded,
        }
    }
}
