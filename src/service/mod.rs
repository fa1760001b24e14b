// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The remote compute service.
//!
//! Every tab's payload is sent with an HTTP PUT to `<base address>/<tab>`; the
//! JSON response is handed back untouched.

mod error;
#[cfg(test)]
pub(crate) mod fake;

pub use error::ServiceError;

use std::time::Duration;

use log::{debug, trace};
use reqwest::blocking::{multipart, Client};
use serde_json::Value;
use url::Url;

use crate::{tab::Tab, values::FormValues};

/// Something that can run the calculation behind a tab.
pub trait ComputeService {
    /// Send `payload` for `tab` and return the service's response.
    fn submit(&self, tab: Tab, payload: &FormValues) -> Result<Value, ServiceError>;
}

/// The compute service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpComputeService {
    client: Client,
    base: Url,
}

impl HttpComputeService {
    pub fn new(base_address: &str, timeout: Duration) -> Result<HttpComputeService, ServiceError> {
        let base = parse_base_address(base_address)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("forecastor-etc/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpComputeService { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// The address `tab`'s payload is sent to.
    pub fn endpoint(&self, tab: Tab) -> Result<Url, ServiceError> {
        self.base
            .join(&tab.endpoint())
            .map_err(|e| ServiceError::InvalidAddress {
                address: self.base.to_string(),
                err: e.to_string(),
            })
    }
}

impl ComputeService for HttpComputeService {
    fn submit(&self, tab: Tab, payload: &FormValues) -> Result<Value, ServiceError> {
        let url = self.endpoint(tab)?;
        debug!("PUT {url}");
        trace!("{}", payload.to_value());

        let request = match custom_spectrum_file(tab, payload) {
            // A custom spectrum has to be uploaded, so everything goes as
            // multipart form data.
            Some(file) => {
                let mut form = multipart::Form::new();
                for (key, value) in payload.as_map() {
                    if key == "customSpectrum" {
                        form = form.file(key.clone(), file).map_err(|e| {
                            ServiceError::CustomSpectrum {
                                file: file.to_string(),
                                err: e,
                            }
                        })?;
                    } else {
                        form = form.text(key.clone(), value.to_string());
                    }
                }
                self.client.put(url.clone()).multipart(form)
            }
            None => self.client.put(url.clone()).json(&payload.to_value()),
        };

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ServiceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        let text = response.text()?;
        serde_json::from_str(&text).map_err(|e| ServiceError::NotJson {
            url: url.to_string(),
            err: e.to_string(),
        })
    }
}

fn custom_spectrum_file(tab: Tab, payload: &FormValues) -> Option<&str> {
    match tab {
        Tab::Source => payload
            .get_str("customSpectrum")
            .map(str::trim)
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// Parse a service base address. Joining endpoints onto it must keep its path,
/// so a trailing slash is added if missing.
pub fn parse_base_address(address: &str) -> Result<Url, ServiceError> {
    let with_slash = if address.ends_with('/') {
        address.to_string()
    } else {
        format!("{address}/")
    };
    let url = Url::parse(&with_slash).map_err(|e| ServiceError::InvalidAddress {
        address: address.to_string(),
        err: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ServiceError::InvalidAddress {
            address: address.to_string(),
            err: format!("unsupported scheme '{other}'"),
        }),
    }
}
