// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The parameter tabs and the dependency graph between them.
//!
//! Telescope feeds Background and Source; Telescope, Background and Source
//! all feed the four compute tabs (Photometry, UVMOS, Grism, Transit).

#[cfg(test)]
mod tests;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

lazy_static::lazy_static! {
    pub static ref TABS_COMMA_SEPARATED: String = Tab::iter().join(", ");
}

/// A parameter tab. The declaration order is the order the tabs are displayed
/// in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Telescope,
    Background,
    Source,
    Photometry,
    Uvmos,
    Grism,
    Transit,
}

/// Which persisted store a tab's computed results live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Cleared when the session ends.
    Session,
    /// Survives across sessions.
    Durable,
}

const UPSTREAM_OF_SOURCE_AND_BACKGROUND: &[Tab] = &[Tab::Telescope];
const UPSTREAM_OF_COMPUTE: &[Tab] = &[Tab::Telescope, Tab::Background, Tab::Source];
const DOWNSTREAM_OF_TELESCOPE: &[Tab] = &[
    Tab::Background,
    Tab::Source,
    Tab::Photometry,
    Tab::Uvmos,
    Tab::Grism,
    Tab::Transit,
];
const COMPUTE_TABS: &[Tab] = &[Tab::Photometry, Tab::Uvmos, Tab::Grism, Tab::Transit];

impl Tab {
    /// The name shown to users.
    pub fn title(self) -> &'static str {
        match self {
            Tab::Telescope => "Telescope",
            Tab::Background => "Background",
            Tab::Source => "Source",
            Tab::Photometry => "Photometry",
            Tab::Uvmos => "UVMOS Spectroscopy",
            Tab::Grism => "Grism Spectroscopy",
            Tab::Transit => "Transit",
        }
    }

    /// The store key of the tab's last-saved form values.
    pub fn form_key(self) -> String {
        format!("{}Form", self)
    }

    /// The store key of the tab's last service response.
    pub fn params_key(self) -> String {
        format!("{}Params", self)
    }

    /// The store the tab's service response is persisted in. Transit
    /// responses are large and outlive the session.
    pub fn params_store(self) -> StoreKind {
        match self {
            Tab::Transit => StoreKind::Durable,
            _ => StoreKind::Session,
        }
    }

    /// The path (relative to the service base address) the tab's payload is
    /// sent to.
    pub fn endpoint(self) -> String {
        self.to_string()
    }

    /// Does saving this tab run a calculation whose results are displayed
    /// (and counted)?
    pub fn is_compute(self) -> bool {
        COMPUTE_TABS.contains(&self)
    }

    /// Tabs with an edge into this tab.
    pub fn upstream(self) -> &'static [Tab] {
        match self {
            Tab::Telescope => &[],
            Tab::Background | Tab::Source => UPSTREAM_OF_SOURCE_AND_BACKGROUND,
            Tab::Photometry | Tab::Uvmos | Tab::Grism | Tab::Transit => UPSTREAM_OF_COMPUTE,
        }
    }

    /// Tabs this tab has an edge into.
    pub fn downstream(self) -> &'static [Tab] {
        match self {
            Tab::Telescope => DOWNSTREAM_OF_TELESCOPE,
            Tab::Background | Tab::Source => COMPUTE_TABS,
            Tab::Photometry | Tab::Uvmos | Tab::Grism | Tab::Transit => &[],
        }
    }

    /// The compute tabs.
    pub fn compute_tabs() -> &'static [Tab] {
        COMPUTE_TABS
    }
}

/// A dependency edge `upstream -> downstream`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub upstream: Tab,
    pub downstream: Tab,
}

impl Edge {
    /// Every edge of the dependency graph.
    pub fn all() -> impl Iterator<Item = Edge> {
        Tab::iter().flat_map(|upstream| {
            upstream.downstream().iter().map(move |&downstream| Edge {
                upstream,
                downstream,
            })
        })
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{}", self.upstream, self.downstream)
    }
}
