// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with editing and saving a tab's form.

use thiserror::Error;

use crate::{
    service::ServiceError, store::StoreError, tab::Tab, validation::ValidationError,
    values::ValuesError,
};

#[derive(Error, Debug)]
pub enum FormError {
    #[error("{0}")]
    Values(#[from] ValuesError),

    #[error("'{path}' is not a list on the {} tab", .tab.title())]
    NotAList { tab: Tab, path: String },
}

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("A {} request is already in progress", .0.title())]
    InFlight(Tab),

    #[error("The {} request was superseded; its response has been discarded", .0.title())]
    Stale(Tab),

    #[error("The Background and Source parameters must be saved again before a {} request can be submitted", .0.title())]
    UpstreamOutOfSync(Tab),

    #[error("{0}")]
    Invalid(#[from] ValidationError),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("{0}")]
    Store(#[from] StoreError),
}
