// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all forecastor-etc command-line errors. This should be the
//! *only* error enum that is publicly visible from the CLI.

use thiserror::Error;

use crate::{
    config::ConfigError,
    form::{FormError, SaveError},
    service::ServiceError,
    session::SessionError,
    store::StoreError,
    validation::ValidationError,
};

/// The *only* publicly visible error from forecastor-etc. Where there's
/// something the user can do about an error, its message says what.
#[derive(Error, Debug)]
pub enum EtcError {
    /// Form values that can't be saved.
    #[error("{0}\n\nChange the fields with 'forecastor-etc set PATH=VALUE' and save again.")]
    Validation(String),

    /// The compute service couldn't be reached or refused a request.
    #[error("{0}\n\nCheck that the compute service is running; its address is set with --api-url or FORECASTOR_ETC_API_URL.")]
    Service(String),

    /// A request that can't be made in the current state of the session.
    #[error("{0}")]
    Session(String),

    /// An error related to the persisted session.
    #[error("{0}")]
    Store(String),

    /// An error related to the config file.
    #[error("{0}")]
    Config(String),

    /// An error related to argument files.
    #[error("{0}")]
    ArgFile(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<ValidationError> for EtcError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<ServiceError> for EtcError {
    fn from(e: ServiceError) -> Self {
        Self::Service(e.to_string())
    }
}

impl From<StoreError> for EtcError {
    fn from(e: StoreError) -> Self {
        Self::Store(e.to_string())
    }
}

impl From<ConfigError> for EtcError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<FormError> for EtcError {
    fn from(e: FormError) -> Self {
        Self::Session(e.to_string())
    }
}

impl From<SaveError> for EtcError {
    fn from(e: SaveError) -> Self {
        match e {
            SaveError::Invalid(e) => Self::from(e),
            SaveError::Service(e) => Self::from(e),
            SaveError::Store(e) => Self::from(e),
            SaveError::InFlight(_) | SaveError::Stale(_) | SaveError::UpstreamOutOfSync(_) => {
                Self::Session(e.to_string())
            }
        }
    }
}

impl From<SessionError> for EtcError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Form(e) => Self::from(e),
            SessionError::Save(e) => Self::from(e),
            SessionError::Store(e) => Self::from(e),
        }
    }
}

impl From<std::io::Error> for EtcError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
