// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde_json::json;
use strum::IntoEnumIterator;

use super::*;
use crate::defaults::default_values;

fn with(tab: Tab, edits: &[(&str, Value)]) -> FormValues {
    let mut v = default_values(tab);
    for (path, value) in edits {
        v.set(path, value.clone()).unwrap();
    }
    v
}

#[test]
fn test_defaults_are_valid_where_expected() {
    // Source needs a spectrum to be chosen; everything else is ready to go.
    for tab in Tab::iter() {
        let errors = validate(tab, &default_values(tab));
        if tab == Tab::Source {
            assert_eq!(
                errors.keys().collect::<Vec<_>>(),
                vec!["predefinedSpectrum"],
                "{errors:?}"
            );
        } else {
            assert!(errors.is_empty(), "{tab}: {errors:?}");
        }
    }
}

#[test]
fn test_telescope_requires_positive_numbers() {
    let v = with(
        Tab::Telescope,
        &[
            ("fwhm", json!("")),
            ("pxScale", json!("-0.1")),
            ("mirrorDiameter", json!("big")),
            ("readNoise", json!("0")),
            ("extinctionCoeffs.g", json!(-3.31)),
        ],
    );
    let errors = validate(Tab::Telescope, &v);
    assert_eq!(errors["fwhm"], "FWHM is a required field");
    assert_eq!(errors["pxScale"], "Pixel scale must be a number > 0");
    assert_eq!(
        errors["mirrorDiameter"],
        "Mirror diameter must be a number > 0"
    );
    assert_eq!(errors["readNoise"], "Read noise must be a number > 0");
    assert_eq!(
        errors["extinctionCoeffs.g"],
        "Extinction coefficients must be a number > 0"
    );
    assert_eq!(errors.len(), 5);
}

#[test]
fn test_exponent_notation_and_whitespace_are_numbers() {
    let v = with(
        Tab::Telescope,
        &[("darkCurrent", json!("1e-4")), ("fwhm", json!(" 0.15 "))],
    );
    assert!(validate(Tab::Telescope, &v).is_empty());
    assert_eq!(parse_number(&json!("NaN")), None);
    assert_eq!(parse_number(&json!(true)), None);
    assert_eq!(parse_number(&json!("2.5e3")), Some(2500.0));
}

#[test]
fn test_infinite_values_are_not_numbers() {
    for text in ["inf", "infinity", "+Inf", "-inf", "1e999"] {
        assert_eq!(parse_number(&json!(text)), None, "{text}");
        let v = with(Tab::Telescope, &[("mirrorDiameter", json!(text))]);
        let errors = validate(Tab::Telescope, &v);
        assert_eq!(
            errors.get("mirrorDiameter").map(String::as_str),
            Some("Mirror diameter must be a number > 0"),
            "{text}"
        );
    }
}

#[test]
fn test_background_custom_sky_only_required_when_not_default() {
    let v = default_values(Tab::Background);
    assert!(validate(Tab::Background, &v).is_empty());

    let v = with(
        Tab::Background,
        &[("useDefaultSkyBackground", json!("false"))],
    );
    let errors = validate(Tab::Background, &v);
    assert_eq!(errors.len(), 3);
    assert_eq!(
        errors["customSkyBackground.uv"],
        "Sky background is a required field"
    );

    let v = with(
        Tab::Background,
        &[
            ("useDefaultSkyBackground", json!(false)),
            ("customSkyBackground.uv", json!("26")),
            ("customSkyBackground.u", json!("25.5")),
            ("customSkyBackground.g", json!("22")),
        ],
    );
    assert!(validate(Tab::Background, &v).is_empty());

    // Optional, but still a number if given.
    let v = with(Tab::Background, &[("customSkyBackground.u", json!("dark"))]);
    assert_eq!(
        validate(Tab::Background, &v)["customSkyBackground.u"],
        "Sky background must be a number"
    );
}

#[test]
fn test_background_mode_is_a_required_boolean() {
    let v = with(Tab::Background, &[("useDefaultSkyBackground", json!(""))]);
    assert_eq!(
        validate(Tab::Background, &v)["useDefaultSkyBackground"],
        "Either default or custom sky background must be selected"
    );
    let v = with(
        Tab::Background,
        &[("useDefaultSkyBackground", json!("maybe"))],
    );
    assert!(validate(Tab::Background, &v).contains_key("useDefaultSkyBackground"));
}

#[test]
fn test_geocoronal_flux_values() {
    let flux_ok = |flux: &str| {
        let v = with(
            Tab::Background,
            &[("geocoronalEmission.0.flux", json!(flux))],
        );
        validate(Tab::Background, &v).is_empty()
    };
    for good in ["High", "average", "LOW", "1.5e-15", "3", "0.5", "2.", "+7e3"] {
        assert!(flux_ok(good), "{good} should be accepted");
    }
    for bad in ["medium", "0", "-1", "1e", "abc"] {
        assert!(!flux_ok(bad), "{bad} should be rejected");
    }

    let mut v = default_values(Tab::Background);
    v.push(
        "geocoronalEmission",
        json!({"flux": "bright", "wavelength": "0", "linewidth": "0.1", "id": "2"}),
    )
    .unwrap();
    let errors = validate(Tab::Background, &v);
    assert_eq!(
        errors["geocoronalEmission.1.flux"],
        "Flux must be one of the predetermined values or a number > 0."
    );
    assert_eq!(
        errors["geocoronalEmission.1.wavelength"],
        "Wavelength must be a number > 0"
    );
    assert!(!errors.contains_key("geocoronalEmission.0.flux"));
}

#[test]
fn test_source_rules() {
    let v = with(
        Tab::Source,
        &[
            ("predefinedSpectrum", json!("blackbody")),
            ("redshift", json!("-0.5")),
        ],
    );
    let errors = validate(Tab::Source, &v);
    assert_eq!(errors["redshift"], "Redshift must be a non-negative number");
    assert_eq!(errors.len(), 1);

    // A custom spectrum lifts the predefined spectrum requirement.
    let v = with(Tab::Source, &[("customSpectrum", json!("spectrum.txt"))]);
    assert!(validate(Tab::Source, &v).is_empty());

    // Galaxies need a Sérsic index and an effective radius.
    let v = with(
        Tab::Source,
        &[
            ("predefinedSpectrum", json!("spiral")),
            ("sourceType", json!("galaxy")),
            ("physicalParameters.galaxy.axialRatio", json!("1.5")),
        ],
    );
    let errors = validate(Tab::Source, &v);
    assert!(errors.contains_key("physicalParameters.galaxy.sersic"));
    assert!(errors.contains_key("physicalParameters.galaxy.rEff"));
    assert_eq!(
        errors["physicalParameters.galaxy.axialRatio"],
        "Axial ratio must be a number between (0, 1]"
    );

    let v = with(
        Tab::Source,
        &[
            ("predefinedSpectrum", json!("spiral")),
            ("sourceType", json!("quasar")),
            ("spectralLines.0.type", json!("both")),
            ("predefinedSpectrumParameters.uniform.unit", json!("ABmag")),
        ],
    );
    let errors = validate(Tab::Source, &v);
    assert!(errors.contains_key("sourceType"));
    assert!(errors.contains_key("spectralLines.0.type"));
    assert!(!errors.contains_key("predefinedSpectrumParameters.uniform.unit"));
}

#[test]
fn test_photometry_requires_selected_aperture_only() {
    let v = with(
        Tab::Photometry,
        &[("aperShape", json!("elliptical"))],
    );
    let errors = validate(Tab::Photometry, &v);
    assert_eq!(
        errors.keys().collect::<Vec<_>>(),
        vec!["aperParams.elliptical.a", "aperParams.elliptical.b"]
    );

    let v = with(
        Tab::Photometry,
        &[
            ("aperShape", json!("rectangular")),
            ("aperParams.rectangular.width", json!("2")),
            ("aperParams.rectangular.length", json!("3")),
            ("aperParams.optimal.factor", json!("")),
        ],
    );
    assert!(validate(Tab::Photometry, &v).is_empty());

    let v = with(
        Tab::Photometry,
        &[("reddening", json!("-1")), ("photInput.val_type", json!("mag"))],
    );
    let errors = validate(Tab::Photometry, &v);
    assert_eq!(errors["reddening"], "Reddening must be a non-negative number");
    assert!(errors.contains_key("photInput.val_type"));
}

#[test]
fn test_uvmos_rules() {
    let v = with(
        Tab::Uvmos,
        &[
            ("extractionBox.heightLowerLim", json!("-1")),
            ("extractionBox.heightUpperLim", json!("0")),
            ("snrInput.val", json!("0")),
            ("slit.width", json!("")),
        ],
    );
    let errors = validate(Tab::Uvmos, &v);
    assert!(errors.contains_key("extractionBox.heightLowerLim"));
    assert!(errors.contains_key("extractionBox.heightUpperLim"));
    assert!(!errors.contains_key("snrInput.val"));
    assert_eq!(errors["slit.width"], "Slit width is a required field");
}

#[test]
fn test_grism_and_transit_rules() {
    let v = with(Tab::Grism, &[("grismChannel", json!("g"))]);
    assert!(validate(Tab::Grism, &v).contains_key("grismChannel"));

    let v = with(
        Tab::Transit,
        &[
            ("exposureParameters.nstack", json!("2.5")),
            ("exposureParameters.tstart", json!("0")),
            ("planetModelParameters.t0", json!("0")),
            ("planetModelParameters.b", json!("0")),
        ],
    );
    let errors = validate(Tab::Transit, &v);
    assert_eq!(
        errors["exposureParameters.nstack"],
        "Number of stacks must be a whole number > 0"
    );
    assert_eq!(errors["planetModelParameters.b"], "b must be a number > 0");
    assert_eq!(errors.len(), 2);
}

#[test]
fn test_error_display_lists_fields() {
    let v = with(Tab::Telescope, &[("fwhm", json!(""))]);
    let err = ValidationError::Invalid {
        tab: Tab::Telescope,
        errors: validate(Tab::Telescope, &v),
    };
    assert_eq!(
        err.to_string(),
        "The Telescope parameters are invalid:\n  fwhm: FWHM is a required field"
    );
}
