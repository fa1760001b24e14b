// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.
 */

/// The compute service address used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/";

/// Environment variable that overrides the configured compute service address.
pub const API_URL_ENV_VAR: &str = "FORECASTOR_ETC_API_URL";

/// Placeholder in a configured address that is substituted with the configured
/// port.
pub const PORT_PLACEHOLDER: &str = "{port}";

/// Compute requests that take longer than this many seconds are abandoned.
/// Transit simulations can take minutes.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// The directory (relative to the working directory) holding the CLI's stores
/// when none is specified.
pub const DEFAULT_STORE_DIR: &str = ".forecastor_etc";

/// File name of the session store inside the store directory.
pub const SESSION_STORE_FILENAME: &str = "session.json";

/// File name of the durable store inside the store directory.
pub const DURABLE_STORE_FILENAME: &str = "durable.json";

/// File name of the optional runtime configuration inside the store directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Session-store key holding the coordinator's flags and counters.
pub const COORDINATOR_KEY: &str = "etcCoordinator";

/// Session-store key holding the navigator's active tab and unsaved draft.
pub const NAVIGATION_KEY: &str = "etcNavigation";

/// Shown when navigating away from a tab with unsaved edits.
pub const UNSAVED_CHANGES_PROMPT: &str =
    "You have unsaved changes. Are you sure you want to change tabs? Your changes will be lost.";

/// Shown on a compute tab after an upstream save but before resubmission.
pub const SAVED_NOT_SUBMITTED_NOTICE: &str = "Some parameters are saved but not submitted.";
