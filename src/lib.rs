// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Client for the FORECASTOR exposure-time-calculator (ETC) web service.

The library holds the tab-form state machine of the ETC front end: per-tab
form values and validation, persisted snapshots of saved values and service
responses, and the coordinator that tracks which tabs are out of sync with
their upstream tabs. The `forecastor-etc` binary drives it from a shell.
 */

pub mod config;
pub mod constants;
pub mod coordinator;
pub mod defaults;
pub mod form;
pub mod navigation;
pub mod results;
pub mod service;
pub mod session;
pub mod store;
pub mod tab;
pub mod validation;
pub mod values;

mod cli;

// Re-exports.
pub use cli::{EtcError, ForecastorEtc};
pub use coordinator::{CoordinatorEvent, FormCoordinator};
pub use form::FormController;
pub use navigation::{Confirm, NavOutcome, TabNavigator};
pub use service::{ComputeService, HttpComputeService};
pub use session::EtcSession;
pub use store::{JsonFileStore, MemoryStore, Store};
pub use tab::Tab;

use crossbeam_utils::atomic::AtomicCell;

/// Should we display progress bars (spinners while waiting on the compute
/// service)?
pub(crate) static PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);
