// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The state of one tab's form.
//!
//! A [`FormController`] holds the values being edited and a snapshot of the
//! values last saved. `changed` is true whenever they differ. Saving is done
//! in two phases so that the request itself can happen anywhere:
//! [`FormController::begin_save`] validates and hands out a [`SaveTicket`],
//! and [`FormController::complete_save`] applies whatever the compute service
//! said. Only one ticket per controller may be outstanding.

mod error;

pub use error::{FormError, SaveError};

use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};
use serde_json::Value;

use crate::{
    coordinator::{FormCoordinator, SaveContext},
    defaults::{apply_derived, default_values, row_template},
    service::{ComputeService, ServiceError},
    store::{self, Store, StoreError, Stores},
    tab::Tab,
    validation::{validate, FieldErrors, ValidationError},
    values::{coerce_input, FormValues},
};

// Generations are unique across controllers, so a ticket can never be
// mistaken for one issued by a re-initialised controller.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Permission to complete exactly one save. Holds the payload to send.
#[derive(Debug)]
pub struct SaveTicket {
    tab: Tab,
    generation: u64,
    payload: FormValues,
}

impl SaveTicket {
    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// The values to send to the compute service.
    pub fn payload(&self) -> &FormValues {
        &self.payload
    }
}

#[derive(Debug, Clone)]
pub struct FormController {
    tab: Tab,
    values: FormValues,
    snapshot: FormValues,
    changed: bool,
    generation: u64,
    in_flight: bool,
}

impl FormController {
    /// Load `tab`'s last-saved values from the session store, or its defaults
    /// if it has never been saved, and fill in the values derived from other
    /// tabs. The result has no unsaved changes.
    pub fn initialize(tab: Tab, session: &dyn Store) -> Result<FormController, StoreError> {
        let values = load_values(tab, session)?;
        Ok(FormController {
            tab,
            snapshot: values.clone(),
            values,
            changed: false,
            generation: next_generation(),
            in_flight: false,
        })
    }

    /// As [`FormController::initialize`], then apply a draft of unsaved
    /// edits.
    pub fn initialize_with_draft(
        tab: Tab,
        session: &dyn Store,
        draft: FormValues,
    ) -> Result<FormController, StoreError> {
        let mut controller = FormController::initialize(tab, session)?;
        controller.values = draft;
        controller.recompute_changed();
        Ok(controller)
    }

    /// Throw away every unsaved edit and outstanding ticket and load the tab
    /// again.
    pub fn reinitialize(&mut self, session: &dyn Store) -> Result<(), StoreError> {
        let values = load_values(self.tab, session)?;
        self.snapshot = values.clone();
        self.values = values;
        self.changed = false;
        self.invalidate_tickets();
        Ok(())
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// The values being edited.
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// The values last saved.
    pub fn snapshot(&self) -> &FormValues {
        &self.snapshot
    }

    /// Do the current values differ from the last-saved values?
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Is a save waiting for its response?
    pub fn is_saving(&self) -> bool {
        self.in_flight
    }

    fn recompute_changed(&mut self) {
        self.changed = self.values != self.snapshot;
    }

    fn invalidate_tickets(&mut self) {
        self.generation = next_generation();
        self.in_flight = false;
    }

    /// Set the field at `path` (e.g. `geocoronalEmission.0.flux`).
    pub fn on_field_change(&mut self, path: &str, value: Value) -> Result<(), FormError> {
        self.values.set(path, value)?;
        self.recompute_changed();
        Ok(())
    }

    /// Set the field at `path` from text typed by a user. Text fields take the
    /// text verbatim; other fields parse it as JSON.
    pub fn on_field_input(&mut self, path: &str, raw: &str) -> Result<(), FormError> {
        let value = coerce_input(self.values.get(path), raw);
        self.on_field_change(path, value)
    }

    /// Overlay `values` onto the current values.
    pub fn merge(&mut self, values: &FormValues) {
        self.values.merge(values);
        self.recompute_changed();
    }

    /// Append a fresh row to the list at `path`, returning its index.
    pub fn add_row(&mut self, path: &str) -> Result<usize, FormError> {
        let row = row_template(self.tab, path).ok_or_else(|| FormError::NotAList {
            tab: self.tab,
            path: path.to_string(),
        })?;
        let index = self.values.push(path, row)?;
        self.recompute_changed();
        Ok(index)
    }

    /// Remove row `index` of the list at `path`.
    pub fn remove_row(&mut self, path: &str, index: usize) -> Result<(), FormError> {
        self.values.remove(path, index)?;
        self.recompute_changed();
        Ok(())
    }

    /// Restore the last-saved values. Any outstanding save ticket becomes
    /// stale.
    pub fn revert(&mut self) {
        self.values = self.snapshot.clone();
        self.changed = false;
        self.invalidate_tickets();
    }

    /// Per-field validation messages for the current values.
    pub fn validate(&self) -> FieldErrors {
        validate(self.tab, &self.values)
    }

    /// Validate the current values as an error.
    pub fn check(&self) -> Result<(), ValidationError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Invalid {
                tab: self.tab,
                errors,
            })
        }
    }

    /// Validate the current values and, if they may be sent, hand out a
    /// ticket for sending them.
    pub fn begin_save(&mut self, coordinator: &FormCoordinator) -> Result<SaveTicket, SaveError> {
        if self.in_flight {
            return Err(SaveError::InFlight(self.tab));
        }
        self.check()?;
        if !coordinator.upstream_ready(self.tab) {
            return Err(SaveError::UpstreamOutOfSync(self.tab));
        }
        self.in_flight = true;
        debug!("Saving {} (generation {})", self.tab, self.generation);
        Ok(SaveTicket {
            tab: self.tab,
            generation: self.generation,
            payload: self.values.clone(),
        })
    }

    /// Apply the outcome of the request made with `ticket`. On success the
    /// response and the sent values are persisted, the sent values become the
    /// snapshot and the coordinator is told. On failure nothing persisted
    /// changes.
    pub fn complete_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<Value, ServiceError>,
        stores: &mut Stores,
        coordinator: &mut FormCoordinator,
    ) -> Result<Value, SaveError> {
        if ticket.tab != self.tab || ticket.generation != self.generation || !self.in_flight {
            warn!("Discarding the response to a superseded {} request", ticket.tab);
            return Err(SaveError::Stale(ticket.tab));
        }
        self.in_flight = false;

        let response = result?;

        // The coordinator needs to know which forms were saved before this
        // one was.
        let ctx = SaveContext::from_store(stores.session.as_ref())?;
        let params_store = self.tab.params_store();
        let params_key = self.tab.params_key();
        let previous = stores.get(params_store).get(&params_key)?;
        stores
            .get_mut(params_store)
            .set(&params_key, response.clone())?;
        if let Err(e) = store::save(
            stores.session.as_mut(),
            &self.tab.form_key(),
            &ticket.payload,
        ) {
            // The params and the form are written together or not at all.
            let params = stores.get_mut(params_store);
            let restored = match previous {
                Some(value) => params.set(&params_key, value),
                None => params.remove(&params_key),
            };
            if let Err(restore_err) = restored {
                warn!("Couldn't restore {params_key} after a failed save: {restore_err}");
            }
            return Err(e.into());
        }

        self.snapshot = ticket.payload;
        self.recompute_changed();
        coordinator.on_saved(self.tab, &ctx);
        Ok(response)
    }

    /// Send the current values to `service` and apply the response.
    pub fn save(
        &mut self,
        service: &dyn ComputeService,
        stores: &mut Stores,
        coordinator: &mut FormCoordinator,
    ) -> Result<Value, SaveError> {
        let ticket = self.begin_save(coordinator)?;
        let result = service.submit(self.tab, ticket.payload());
        self.complete_save(ticket, result, stores, coordinator)
    }
}

/// Saved values over defaults, with derived values filled in.
fn load_values(tab: Tab, session: &dyn Store) -> Result<FormValues, StoreError> {
    let mut values = default_values(tab);
    let saved: Option<FormValues> = store::load(session, &tab.form_key())?;
    let had_saved_form = saved.is_some();
    if let Some(saved) = saved {
        values.merge(&saved);
    }
    let source_form: Option<FormValues> = match tab {
        Tab::Photometry | Tab::Transit => store::load(session, &Tab::Source.form_key())?,
        _ => None,
    };
    apply_derived(tab, &mut values, had_saved_form, source_form.as_ref());
    Ok(values)
}
