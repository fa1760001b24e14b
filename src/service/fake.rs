// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An in-process compute service for tests.

use std::{cell::RefCell, collections::HashMap};

use serde_json::{json, Value};

use super::{ComputeService, ServiceError};
use crate::{tab::Tab, values::FormValues};

/// Records every request and answers with canned responses.
#[derive(Debug, Default)]
pub(crate) struct FakeService {
    responses: RefCell<HashMap<Tab, Value>>,
    failure: RefCell<Option<String>>,
    calls: RefCell<Vec<(Tab, FormValues)>>,
}

impl FakeService {
    pub(crate) fn new() -> FakeService {
        FakeService::default()
    }

    /// Answer requests for `tab` with `response`.
    pub(crate) fn respond(&self, tab: Tab, response: Value) {
        self.responses.borrow_mut().insert(tab, response);
    }

    /// Fail every request with `message` (or stop failing with `None`).
    pub(crate) fn fail_with(&self, message: Option<&str>) {
        *self.failure.borrow_mut() = message.map(str::to_string);
    }

    pub(crate) fn num_calls(&self) -> usize {
        self.calls.borrow().len()
    }

    pub(crate) fn calls(&self) -> Vec<(Tab, FormValues)> {
        self.calls.borrow().clone()
    }
}

impl ComputeService for FakeService {
    fn submit(&self, tab: Tab, payload: &FormValues) -> Result<Value, ServiceError> {
        self.calls.borrow_mut().push((tab, payload.clone()));
        if let Some(message) = self.failure.borrow().as_ref() {
            return Err(ServiceError::Remote(message.clone()));
        }
        Ok(self
            .responses
            .borrow()
            .get(&tab)
            .cloned()
            .unwrap_or_else(|| json!({ "tab": tab.to_string() })))
    }
}

impl ComputeService for std::rc::Rc<FakeService> {
    fn submit(&self, tab: Tab, payload: &FormValues) -> Result<Value, ServiceError> {
        self.as_ref().submit(tab, payload)
    }
}
