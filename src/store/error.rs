// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with the persisted stores.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store file '{file}' isn't valid JSON: {err}\nRemove it (or run 'forecastor-etc reset') to start a new session")]
    Corrupt { file: String, err: String },

    #[error("The value stored under '{key}' couldn't be decoded: {err}")]
    Decode { key: String, err: String },

    #[error("The value for '{key}' couldn't be encoded: {err}")]
    Encode { key: String, err: String },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
