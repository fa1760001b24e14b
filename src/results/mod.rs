// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Result panels.
//!
//! Each panel shows part of a compute service response. A panel reads fields
//! out of a tab's stored response and is redrawn whenever its refresh key
//! changes. Missing data is never an error; the panel shows a placeholder
//! asking for the calculation to be run.

#[cfg(test)]
mod tests;

use itertools::Itertools;
use serde_json::{Map, Value};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    coordinator::FormCoordinator,
    store::{StoreError, Stores},
    tab::Tab,
};

lazy_static::lazy_static! {
    pub static ref PANELS_COMMA_SEPARATED: String = ResultPanel::iter().join(", ");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ResultPanel {
    /// Passband response curves, overlaid with the source spectrum.
    ResponseCurve,
    SourceWeights,
    AperMask,
    /// Grism signal-to-noise per pixel.
    Show2dSnr,
    CastorSpectra,
    Slit,
    SourcePixelWeight,
    LightCurve,
    /// The simulated field of view around the transit target.
    SceneSimFov,
}

/// A field a panel reads out of a tab's stored response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelField {
    pub tab: Tab,
    pub field: &'static str,
    /// Without a required field, the panel shows its placeholder.
    pub required: bool,
}

const fn required(tab: Tab, field: &'static str) -> PanelField {
    PanelField {
        tab,
        field,
        required: true,
    }
}

const fn optional(tab: Tab, field: &'static str) -> PanelField {
    PanelField {
        tab,
        field,
        required: false,
    }
}

const RESPONSE_CURVE_FIELDS: &[PanelField] = &[
    required(Tab::Telescope, "fullPassbandCurves"),
    optional(Tab::Source, "wavelengths"),
    optional(Tab::Source, "spectrum"),
];
const SOURCE_WEIGHTS_FIELDS: &[PanelField] = &[required(Tab::Photometry, "sourceWeights")];
const APER_MASK_FIELDS: &[PanelField] = &[
    required(Tab::Photometry, "aperMask"),
    required(Tab::Photometry, "aperExtent"),
];
const SHOW_2D_SNR_FIELDS: &[PanelField] = &[required(Tab::Grism, "grism2d")];
const CASTOR_SPECTRA_FIELDS: &[PanelField] = &[required(Tab::Uvmos, "spectrum")];
const SLIT_FIELDS: &[PanelField] = &[required(Tab::Uvmos, "showSlit")];
const SOURCE_PIXEL_WEIGHT_FIELDS: &[PanelField] = &[required(Tab::Uvmos, "sourcePixelWeight")];
const LIGHT_CURVE_FIELDS: &[PanelField] = &[required(Tab::Transit, "light_curve")];
const SCENE_SIM_FOV_FIELDS: &[PanelField] = &[
    required(Tab::Transit, "gaia"),
    required(Tab::Transit, "ccd_dim"),
    required(Tab::Transit, "xout"),
    required(Tab::Transit, "yout"),
];

/// What a panel should display.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    /// The panel's fields, keyed by field name. The panel is redrawn when
    /// `refresh_key` changes.
    Ready { data: Value, refresh_key: u64 },
    Placeholder(&'static str),
}

impl ResultPanel {
    /// The tab whose calculation fills this panel.
    pub fn tab(self) -> Tab {
        match self {
            ResultPanel::ResponseCurve => Tab::Telescope,
            ResultPanel::SourceWeights | ResultPanel::AperMask => Tab::Photometry,
            ResultPanel::Show2dSnr => Tab::Grism,
            ResultPanel::CastorSpectra | ResultPanel::Slit | ResultPanel::SourcePixelWeight => {
                Tab::Uvmos
            }
            ResultPanel::LightCurve | ResultPanel::SceneSimFov => Tab::Transit,
        }
    }

    pub fn fields(self) -> &'static [PanelField] {
        match self {
            ResultPanel::ResponseCurve => RESPONSE_CURVE_FIELDS,
            ResultPanel::SourceWeights => SOURCE_WEIGHTS_FIELDS,
            ResultPanel::AperMask => APER_MASK_FIELDS,
            ResultPanel::Show2dSnr => SHOW_2D_SNR_FIELDS,
            ResultPanel::CastorSpectra => CASTOR_SPECTRA_FIELDS,
            ResultPanel::Slit => SLIT_FIELDS,
            ResultPanel::SourcePixelWeight => SOURCE_PIXEL_WEIGHT_FIELDS,
            ResultPanel::LightCurve => LIGHT_CURVE_FIELDS,
            ResultPanel::SceneSimFov => SCENE_SIM_FOV_FIELDS,
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            ResultPanel::ResponseCurve => "Please save Telescope or Source parameters first",
            ResultPanel::SourceWeights | ResultPanel::AperMask => {
                "Please submit a Photometry calculation first"
            }
            ResultPanel::Show2dSnr => "Please submit a Grism Spectroscopy calculation first",
            ResultPanel::CastorSpectra => "Please save UVMOS Spectroscopy parameters first",
            ResultPanel::Slit | ResultPanel::SourcePixelWeight => {
                "Please submit a UVMOS Spectroscopy calculation first"
            }
            ResultPanel::LightCurve => "Please save Transit parameters first",
            ResultPanel::SceneSimFov => "Please submit a Transit calculation first",
        }
    }

    /// The counter the panel redraws on.
    pub fn refresh_key(self, coordinator: &FormCoordinator) -> u64 {
        match self {
            ResultPanel::ResponseCurve => coordinator.num_telescope_or_source_saved(),
            _ => coordinator.num_submit(self.tab()),
        }
    }

    /// Read the panel's data out of the stores.
    pub fn resolve(
        self,
        stores: &Stores,
        coordinator: &FormCoordinator,
    ) -> Result<PanelState, StoreError> {
        let mut data = Map::new();
        for field in self.fields() {
            let params = stores
                .get(field.tab.params_store())
                .get(&field.tab.params_key())?;
            match params.as_ref().and_then(|p| p.get(field.field)) {
                Some(v) if !v.is_null() => {
                    data.insert(field.field.to_string(), v.clone());
                }
                _ if field.required => return Ok(PanelState::Placeholder(self.placeholder())),
                _ => (),
            }
        }
        Ok(PanelState::Ready {
            data: Value::Object(data),
            refresh_key: self.refresh_key(coordinator),
        })
    }
}
