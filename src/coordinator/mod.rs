// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Cross-tab bookkeeping.
//!
//! The coordinator owns every piece of state that spans tabs:
//!
//! * a sync flag per dependency edge `U -> D`, true when `D`'s last save is
//!   still consistent with `U`'s last save;
//! * a "saved but not submitted" flag per compute tab, set when an upstream
//!   tab is saved and cleared when the compute tab itself is submitted;
//! * a submission counter per compute tab (result panels refresh on it);
//! * a counter of Telescope and Source saves (the response-curve panel
//!   refreshes on it).
//!
//! Form controllers report successful saves with [`FormCoordinator::on_saved`];
//! the coordinator recomputes the flags and notifies its subscribers.


use std::collections::BTreeSet;

use indexmap::IndexMap;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::{
    store::{Store, StoreError},
    tab::{Edge, Tab},
    validation::parse_bool,
};

/// Something that happened to the cross-tab state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorEvent {
    /// A tab was successfully saved (or submitted).
    Saved(Tab),
    /// The sync flag of an edge changed.
    SyncChanged { edge: Edge, in_sync: bool },
    /// A compute tab's "saved but not submitted" flag changed.
    SavedAndUnsubmittedChanged { tab: Tab, value: bool },
    /// A compute tab's submission counter was incremented.
    Submitted { tab: Tab, count: u64 },
}

/// Handle for removing a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(usize);

/// What the coordinator needs to know about persisted forms when a tab is
/// saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveContext {
    /// Tabs with a persisted snapshot.
    pub saved_tabs: BTreeSet<Tab>,
    /// Does the saved Background form use the default sky background?
    pub background_uses_default_sky: bool,
}

impl SaveContext {
    /// Gather the context from the session store.
    pub fn from_store(store: &dyn Store) -> Result<SaveContext, StoreError> {
        use strum::IntoEnumIterator;

        let mut saved_tabs = BTreeSet::new();
        for tab in Tab::iter() {
            if store.contains(&tab.form_key())? {
                saved_tabs.insert(tab);
            }
        }
        let background_uses_default_sky = store
            .get(&Tab::Background.form_key())?
            .and_then(|form| form.get("useDefaultSkyBackground").and_then(parse_bool))
            .unwrap_or(true);
        Ok(SaveContext {
            saved_tabs,
            background_uses_default_sky,
        })
    }
}

/// The persisted part of the coordinator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatorState {
    /// Edges whose sync flag is false. Every other edge is in sync.
    #[serde(default)]
    out_of_sync: BTreeSet<Edge>,

    /// Compute tabs with saved-but-unsubmitted parameters.
    #[serde(default)]
    saved_and_unsubmitted: BTreeSet<Tab>,

    #[serde(default)]
    num_submit: IndexMap<Tab, u64>,

    #[serde(default)]
    num_telescope_or_source_saved: u64,
}

type Subscriber = Box<dyn FnMut(&CoordinatorEvent)>;

#[derive(Default)]
pub struct FormCoordinator {
    state: CoordinatorState,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: usize,
}

impl std::fmt::Debug for FormCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormCoordinator")
            .field("state", &self.state)
            .field("num_subscribers", &self.subscribers.len())
            .finish()
    }
}

impl FormCoordinator {
    /// A coordinator with every edge in sync and no submissions.
    pub fn new() -> FormCoordinator {
        FormCoordinator::default()
    }

    /// Resume from persisted state.
    pub fn from_state(state: CoordinatorState) -> FormCoordinator {
        FormCoordinator {
            state,
            ..Default::default()
        }
    }

    pub fn state(&self) -> &CoordinatorState {
        &self.state
    }

    /// Call `f` with every subsequent event.
    pub fn subscribe<F>(&mut self, f: F) -> SubscriptionId
    where
        F: FnMut(&CoordinatorEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(f)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(s, _)| *s != id);
    }

    fn publish(&mut self, event: CoordinatorEvent) {
        trace!("{event:?}");
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&event);
        }
    }

    pub fn is_in_sync(&self, edge: Edge) -> bool {
        !self.state.out_of_sync.contains(&edge)
    }

    /// Is `downstream`'s last save consistent with `upstream`'s last save?
    pub fn is_synced(&self, upstream: Tab, downstream: Tab) -> bool {
        self.is_in_sync(Edge {
            upstream,
            downstream,
        })
    }

    /// Are the upstream tabs a compute tab depends on in sync with each other?
    /// Compute tabs may only be submitted when Background and Source agree
    /// with Telescope.
    pub fn upstream_ready(&self, tab: Tab) -> bool {
        if !tab.is_compute() {
            return true;
        }
        self.is_synced(Tab::Telescope, Tab::Background) && self.is_synced(Tab::Telescope, Tab::Source)
    }

    pub fn is_saved_and_unsubmitted(&self, tab: Tab) -> bool {
        self.state.saved_and_unsubmitted.contains(&tab)
    }

    pub fn num_submit(&self, tab: Tab) -> u64 {
        self.state.num_submit.get(&tab).copied().unwrap_or(0)
    }

    pub fn num_telescope_or_source_saved(&self) -> u64 {
        self.state.num_telescope_or_source_saved
    }

    fn set_sync(&mut self, edge: Edge, in_sync: bool) {
        let changed = if in_sync {
            self.state.out_of_sync.remove(&edge)
        } else {
            self.state.out_of_sync.insert(edge)
        };
        if changed {
            debug!("{edge} is now {}", if in_sync { "in sync" } else { "out of sync" });
            self.publish(CoordinatorEvent::SyncChanged { edge, in_sync });
        }
    }

    fn set_saved_and_unsubmitted(&mut self, tab: Tab, value: bool) {
        let changed = if value {
            self.state.saved_and_unsubmitted.insert(tab)
        } else {
            self.state.saved_and_unsubmitted.remove(&tab)
        };
        if changed {
            self.publish(CoordinatorEvent::SavedAndUnsubmittedChanged { tab, value });
        }
    }

    /// Does saving `upstream` make `downstream`'s last save stale?
    fn desyncs(upstream: Tab, downstream: Tab, ctx: &SaveContext) -> bool {
        match (upstream, downstream) {
            // A source spectrum always depends on the telescope.
            (Tab::Telescope, Tab::Source) => true,
            // The default sky background doesn't depend on the telescope.
            (Tab::Telescope, Tab::Background) => {
                ctx.saved_tabs.contains(&Tab::Background) && !ctx.background_uses_default_sky
            }
            _ => ctx.saved_tabs.contains(&downstream),
        }
    }

    /// Record that `tab` was successfully saved (for compute tabs: that a
    /// calculation came back). `ctx` describes the persisted forms as they
    /// were just before this save was persisted.
    pub fn on_saved(&mut self, tab: Tab, ctx: &SaveContext) {
        debug!("{tab} saved");
        for &upstream in tab.upstream() {
            self.set_sync(
                Edge {
                    upstream,
                    downstream: tab,
                },
                true,
            );
        }
        for &downstream in tab.downstream() {
            if Self::desyncs(tab, downstream, ctx) {
                self.set_sync(
                    Edge {
                        upstream: tab,
                        downstream,
                    },
                    false,
                );
            }
        }

        if tab.is_compute() {
            self.set_saved_and_unsubmitted(tab, false);
            let count = {
                let count = self.state.num_submit.entry(tab).or_insert(0);
                *count += 1;
                *count
            };
            self.publish(CoordinatorEvent::Submitted { tab, count });
        } else {
            for &compute in Tab::compute_tabs() {
                self.set_saved_and_unsubmitted(compute, true);
            }
        }

        if matches!(tab, Tab::Telescope | Tab::Source) {
            self.state.num_telescope_or_source_saved += 1;
        }

        self.publish(CoordinatorEvent::Saved(tab));
    }
}
