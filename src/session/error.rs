// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::{
    form::{FormError, SaveError},
    store::StoreError,
};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{0}")]
    Form(#[from] FormError),

    #[error("{0}")]
    Save(#[from] SaveError),

    #[error("{0}")]
    Store(#[from] StoreError),
}
