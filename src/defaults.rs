// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Default form values, and the values some tabs derive from other tabs when
//! they are initialised.

use serde_json::{json, Value};

use crate::{
    tab::Tab,
    values::{new_row_id, FormValues},
};

/// The values a tab starts with when nothing has been saved.
pub fn default_values(tab: Tab) -> FormValues {
    let value = match tab {
        Tab::Telescope => json!({
            "fwhm": "0.15",
            "pxScale": "0.1",
            "mirrorDiameter": "100",
            "darkCurrent": "1e-4",
            "readNoise": "2.0",
            "redleakThresholds": {"uv": "3010", "u": "4160", "g": "5600"},
            "extinctionCoeffs": {"uv": 7.06, "u": 4.35, "g": 3.31},
        }),

        Tab::Background => json!({
            "useDefaultSkyBackground": "true",
            "customSkyBackground": {"uv": "", "u": "", "g": ""},
            "geocoronalEmission": [geocoronal_row()],
        }),

        Tab::Source => json!({
            "sourceType": "point",
            "redshift": "0",
            "predefinedSpectrum": "",
            "customSpectrum": "",
            "predefinedSpectrumParameters": {
                "gaia": {"ra": "", "dec": "", "srchGmax": "21"},
                "blackbody": {"temp": "", "radius": "1", "dist": "1"},
                "powerLaw": {"refWavelength": "", "exponent": ""},
                "uniform": {"spectrumValue": "", "unit": "flam"},
                "emissionLine": {"center": "", "fwhm": "", "peak": "", "shape": "gaussian"},
            },
            "physicalParameters": {
                "point": {},
                "extended": {
                    "angleA": "",
                    "angleB": "",
                    "rotation": "0",
                    "profile": "uniform",
                    "exponentialScaleLengthA": "",
                    "exponentialScaleLengthB": "",
                },
                "galaxy": {"sersic": "", "rEff": "", "axialRatio": "", "rotation": "0"},
            },
            "spectralLines": [spectral_line_row()],
            "normMethod": "passbandMag",
            "normParams": {
                "passbandMag": {"abMag": "", "passband": "uv"},
                "totalMag": "",
                "luminosityDist": {"luminosity": "", "dist": ""},
            },
            "isNormAfterSpectralLines": false,
        }),

        Tab::Photometry => json!({
            "reddening": "0",
            "aperShape": "optimal",
            "aperParams": {
                "optimal": {"factor": "1.4"},
                "elliptical": {"a": "", "b": "", "center": "[0, 0]", "rotation": "0"},
                "rectangular": {"width": "", "length": "", "center": "[0, 0]"},
            },
            "photInput": {"val": "", "val_type": "snr"},
        }),

        Tab::Uvmos => json!({
            "spectralRange": {"minwavelength": "150", "maxwavelength": "300"},
            "slit": {"width": "0.214", "length": "1"},
            "extractionBox": {
                "units": "pixel",
                "width": "1",
                "heightLowerLim": "0",
                "heightUpperLim": "",
            },
            "snrInput": {"val": "", "wavelength": "", "val_type": "snr"},
        }),

        Tab::Grism => json!({
            "grismChannel": "uv",
            "exposureTime": 1000,
        }),

        Tab::Transit => json!({
            "targetParameters": {"ra": "", "dec": "", "srch_Gmax": ""},
            "bandpass": {"bandpass_id": "uv"},
            "exposureParameters": {"exptime": "", "nstack": "", "tstart": "", "tend": ""},
            "planetModelParameters": {"rprs": "", "p": "", "t0": "", "b": "", "ars": ""},
        }),
    };
    match value {
        Value::Object(m) => FormValues::new(m),
        _ => unreachable!("default values are always objects"),
    }
}

/// A fresh, empty row for the list at `path` of `tab`'s form, if that path is
/// a list.
pub fn row_template(tab: Tab, path: &str) -> Option<Value> {
    match (tab, path) {
        (Tab::Background, "geocoronalEmission") => Some(geocoronal_row()),
        (Tab::Source, "spectralLines") => Some(spectral_line_row()),
        _ => None,
    }
}

fn geocoronal_row() -> Value {
    json!({"flux": "Average", "wavelength": "2471", "linewidth": "0.023", "id": new_row_id()})
}

fn spectral_line_row() -> Value {
    json!({
        "center": "",
        "fwhm": "",
        "peak": "",
        "shape": "gaussian",
        "type": "emission",
        "id": new_row_id(),
    })
}

/// Fill in the parts of `values` that are derived from other tabs' saved
/// forms. `had_saved_form` says whether `values` came from the store rather
/// than from [`default_values`].
pub fn apply_derived(
    tab: Tab,
    values: &mut FormValues,
    had_saved_form: bool,
    source_form: Option<&FormValues>,
) {
    match tab {
        // A file selection doesn't outlive the session that made it.
        Tab::Source => set_string(values, "customSpectrum", String::new()),

        // The optimal aperture is only offered for point sources.
        Tab::Photometry => {
            let is_point_source = source_form
                .and_then(|f| f.get_str("sourceType"))
                .map(|t| t == "point")
                .unwrap_or(false);
            let fallback = if is_point_source {
                "optimal"
            } else {
                "elliptical"
            };
            let current = values.get_str("aperShape");
            if !had_saved_form || (current == Some("optimal") && !is_point_source) {
                set_string(values, "aperShape", fallback.to_string());
            }
        }

        // The transit target is chosen on the Source tab.
        Tab::Transit => {
            for (target, gaia) in [("ra", "ra"), ("dec", "dec"), ("srch_Gmax", "srchGmax")] {
                let value = source_form
                    .and_then(|f| f.get(&format!("predefinedSpectrumParameters.gaia.{gaia}")))
                    .map(display_value)
                    .unwrap_or_default();
                set_string(values, &format!("targetParameters.{target}"), value);
            }
        }

        Tab::Telescope | Tab::Background | Tab::Uvmos | Tab::Grism => (),
    }
}

fn set_string(values: &mut FormValues, path: &str, value: String) {
    if let Err(e) = values.set(path, Value::String(value)) {
        log::debug!("Couldn't derive '{path}': {e}");
    }
}

fn display_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
