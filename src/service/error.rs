// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors from talking to the compute service.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("'{address}' is not a usable compute service address: {err}")]
    InvalidAddress { address: String, err: String },

    #[error("Request to {url} failed with status code {status}{}", with_body(.body))]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("The response from {url} wasn't JSON: {err}")]
    NotJson { url: String, err: String },

    #[error("Couldn't read custom spectrum file '{file}': {err}")]
    CustomSpectrum { file: String, err: std::io::Error },

    /// Anything the service reports itself (used by in-process services).
    #[error("{0}")]
    Remote(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

fn with_body(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}
