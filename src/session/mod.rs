// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A whole ETC session: the stores, the compute service, the coordinator, the
//! navigator and the controller of the active tab.
//!
//! Everything the session knows is persisted after every change, so a session
//! can be reopened from its stores (the command-line interface opens one per
//! invocation).

mod error;

pub use error::SessionError;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    constants::{COORDINATOR_KEY, NAVIGATION_KEY, SAVED_NOT_SUBMITTED_NOTICE},
    coordinator::{CoordinatorState, FormCoordinator},
    form::{FormController, SaveError},
    navigation::{Confirm, NavOutcome, TabNavigator},
    results::{PanelState, ResultPanel},
    service::ComputeService,
    store::{self, Store, StoreError, Stores},
    tab::Tab,
    validation::ValidationError,
    values::FormValues,
};

/// A message for the user that stays until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NavigationRecord {
    #[serde(flatten)]
    navigator: TabNavigator,

    /// Unsaved edits of the active tab.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    draft: Option<FormValues>,
}

pub struct EtcSession {
    stores: Stores,
    service: Box<dyn ComputeService>,
    coordinator: FormCoordinator,
    navigator: TabNavigator,
    controller: FormController,
    alerts: Vec<Alert>,
}

impl EtcSession {
    /// Resume the session persisted in `stores` (or start a new one).
    pub fn open(
        stores: Stores,
        service: Box<dyn ComputeService>,
    ) -> Result<EtcSession, SessionError> {
        let state: Option<CoordinatorState> = store::load(stores.session.as_ref(), COORDINATOR_KEY)?;
        let coordinator = state.map(FormCoordinator::from_state).unwrap_or_default();
        let NavigationRecord { navigator, draft } =
            store::load(stores.session.as_ref(), NAVIGATION_KEY)?.unwrap_or_default();

        let tab = navigator.active();
        let controller = match draft {
            Some(draft) => {
                debug!("Resuming unsaved {tab} edits");
                FormController::initialize_with_draft(tab, stores.session.as_ref(), draft)?
            }
            None => FormController::initialize(tab, stores.session.as_ref())?,
        };

        Ok(EtcSession {
            stores,
            service,
            coordinator,
            navigator,
            controller,
            alerts: vec![],
        })
    }

    /// Write the coordinator and navigator state to the session store.
    pub fn persist(&mut self) -> Result<(), StoreError> {
        store::save(
            self.stores.session.as_mut(),
            COORDINATOR_KEY,
            self.coordinator.state(),
        )?;
        let record = NavigationRecord {
            navigator: self.navigator.clone(),
            draft: self
                .controller
                .changed()
                .then(|| self.controller.values().clone()),
        };
        store::save(self.stores.session.as_mut(), NAVIGATION_KEY, &record)
    }

    pub fn active_tab(&self) -> Tab {
        self.navigator.active()
    }

    /// The controller of the active tab.
    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    pub fn coordinator(&self) -> &FormCoordinator {
        &self.coordinator
    }

    /// The coordinator, e.g. to subscribe to its events.
    pub fn coordinator_mut(&mut self) -> &mut FormCoordinator {
        &mut self.coordinator
    }

    pub fn navigator(&self) -> &TabNavigator {
        &self.navigator
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    /// The last-saved values of `tab`, if it has been saved.
    pub fn saved_form(&self, tab: Tab) -> Result<Option<FormValues>, StoreError> {
        store::load(self.stores.session.as_ref(), &tab.form_key())
    }

    /// The values `tab` would show if it were opened now.
    pub fn form(&self, tab: Tab) -> Result<FormValues, StoreError> {
        if tab == self.active_tab() {
            Ok(self.controller.values().clone())
        } else {
            Ok(FormController::initialize(tab, self.stores.session.as_ref())?
                .values()
                .clone())
        }
    }

    fn edited(&mut self) -> Result<(), SessionError> {
        self.navigator.on_edit();
        self.persist()?;
        Ok(())
    }

    /// Set a field of the active tab.
    pub fn edit(&mut self, path: &str, value: Value) -> Result<(), SessionError> {
        self.controller.on_field_change(path, value)?;
        self.edited()
    }

    /// Set a field of the active tab from text typed by a user.
    pub fn edit_input(&mut self, path: &str, raw: &str) -> Result<(), SessionError> {
        self.controller.on_field_input(path, raw)?;
        self.edited()
    }

    /// Overlay `values` onto the active tab's values.
    pub fn merge(&mut self, values: &FormValues) -> Result<(), SessionError> {
        self.controller.merge(values);
        self.edited()
    }

    pub fn add_row(&mut self, path: &str) -> Result<usize, SessionError> {
        let index = self.controller.add_row(path)?;
        self.edited()?;
        Ok(index)
    }

    pub fn remove_row(&mut self, path: &str, index: usize) -> Result<(), SessionError> {
        self.controller.remove_row(path, index)?;
        self.edited()
    }

    /// Discard the active tab's unsaved edits.
    pub fn revert(&mut self) -> Result<(), SessionError> {
        self.controller.revert();
        self.navigator.on_clean();
        self.persist()?;
        Ok(())
    }

    /// Validate the active tab without sending anything.
    pub fn check(&self) -> Result<(), ValidationError> {
        self.controller.check()
    }

    /// Send the active tab to the compute service. A service failure is also
    /// kept as an alert.
    pub fn save(&mut self) -> Result<Value, SessionError> {
        let tab = self.active_tab();
        let result = self
            .controller
            .save(self.service.as_ref(), &mut self.stores, &mut self.coordinator);
        match result {
            Ok(response) => {
                info!("Saved the {} parameters", tab.title());
                self.navigator.on_clean();
                self.persist()?;
                Ok(response)
            }
            Err(e) => {
                if let SaveError::Service(service_error) = &e {
                    self.alerts.push(Alert {
                        message: service_error.to_string(),
                    });
                }
                // The save's own error is the one worth reporting.
                if let Err(persist_err) = self.persist() {
                    warn!("Couldn't persist the session after a failed save: {persist_err}");
                }
                Err(e.into())
            }
        }
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn dismiss_alert(&mut self, index: usize) -> Option<Alert> {
        (index < self.alerts.len()).then(|| self.alerts.remove(index))
    }

    /// Can `tab` be opened?
    pub fn tab_available(&self, tab: Tab) -> Result<bool, StoreError> {
        if tab == Tab::Telescope {
            return Ok(true);
        }
        if !self
            .stores
            .session
            .contains(&Tab::Telescope.params_key())?
        {
            return Ok(false);
        }
        if !tab.is_compute() {
            return Ok(true);
        }
        if !self.coordinator.upstream_ready(tab) {
            return Ok(false);
        }
        if tab == Tab::Transit {
            let uses_gaia = self
                .saved_form(Tab::Source)?
                .map(|f| f.get_str("predefinedSpectrum") == Some("gaia"))
                .unwrap_or(false);
            return Ok(uses_gaia);
        }
        Ok(true)
    }

    /// Switch to `target`, asking `confirm` first if unsaved edits would be
    /// lost.
    pub fn navigate(
        &mut self,
        target: Tab,
        confirm: &mut dyn Confirm,
    ) -> Result<NavOutcome, SessionError> {
        let available = self.tab_available(target)?;
        let outcome = self.navigator.request(target, available, confirm);
        if let NavOutcome::Switched { from, discarded, .. } = outcome {
            if discarded {
                info!("Discarded unsaved {} edits", from.title());
                self.controller.revert();
            }
            self.controller = FormController::initialize(target, self.stores.session.as_ref())?;
            self.persist()?;
        }
        Ok(outcome)
    }

    /// Informational messages to show on `tab`.
    pub fn notices(&self, tab: Tab) -> Result<Vec<String>, StoreError> {
        let mut notices = vec![];
        if tab.is_compute() {
            if self.coordinator.is_saved_and_unsubmitted(tab) && self.coordinator.num_submit(tab) > 0
            {
                notices.push(format!(
                    "{SAVED_NOT_SUBMITTED_NOTICE} The {} calculations and the simulated images may not correspond to the parameters below. Please submit this form to update the results.",
                    tab.title()
                ));
            }
            return Ok(notices);
        }

        if matches!(tab, Tab::Background | Tab::Source)
            && self.stores.session.contains(&tab.form_key())?
            && !self.coordinator.is_synced(Tab::Telescope, tab)
        {
            let what = match tab {
                Tab::Background => "sky background magnitudes",
                _ => "source AB magnitudes",
            };
            notices.push(format!(
                "The Telescope parameters have been updated and the {what} in each passband may be incorrect. Please save the {} parameters again.",
                tab.title()
            ));
        }
        for &downstream in Tab::compute_tabs() {
            if !self.coordinator.is_synced(tab, downstream)
                && self.coordinator.num_submit(downstream) > 0
            {
                notices.push(format!(
                    "Parameters have been updated but a new {0} request has not been submitted. The {0} calculations and the simulated images may not correspond to the parameters shown.",
                    downstream.title()
                ));
            }
        }
        Ok(notices)
    }

    pub fn results(&self, panel: ResultPanel) -> Result<PanelState, StoreError> {
        panel.resolve(&self.stores, &self.coordinator)
    }

    /// Forget everything saved this session. With `durable`, also forget what
    /// outlives sessions.
    pub fn reset(&mut self, durable: bool) -> Result<(), SessionError> {
        self.stores.session.clear()?;
        if durable {
            self.stores.durable.clear()?;
        }
        self.coordinator = FormCoordinator::new();
        self.navigator = TabNavigator::new();
        self.controller = FormController::initialize(Tab::Telescope, self.stores.session.as_ref())?;
        self.alerts.clear();
        Ok(())
    }
}

impl std::fmt::Debug for EtcSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EtcSession")
            .field("coordinator", &self.coordinator)
            .field("navigator", &self.navigator)
            .field("controller", &self.controller)
            .field("alerts", &self.alerts)
            .finish_non_exhaustive()
    }
}
