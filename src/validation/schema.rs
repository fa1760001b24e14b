// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The validation rules of each tab.

use regex::Regex;

use super::{Condition, Rule};
use crate::tab::Tab;

const SOURCE_TYPES: &[&str] = &["point", "extended", "galaxy"];
const PASSBANDS: &[&str] = &["uv", "u", "g"];
const GRISM_CHANNELS: &[&str] = &["uv", "u"];
const SPECTRUM_UNITS: &[&str] = &["flam", "fnu", "ABmag", "STmag"];
const LINE_SHAPES: &[&str] = &["gaussian", "lorentzian"];
const LINE_TYPES: &[&str] = &["emission", "absorption"];
const PROFILES: &[&str] = &["uniform", "exponential"];
const NORM_METHODS: &[&str] = &["passbandMag", "totalMag", "luminosityDist", ""];
const APERTURES: &[&str] = &["optimal", "elliptical", "rectangular"];
const BOX_UNITS: &[&str] = &["arcsec", "pixel"];
const TARGET_TYPES: &[&str] = &["snr", "t"];

lazy_static::lazy_static! {
    /// A positive number (possibly in exponent notation), or one of the
    /// predetermined geocoronal emission strengths.
    static ref GEOCORONAL_FLUX: Regex = Regex::new(
        r"(?i)(^[+]?([1-9][0-9]*(?:[.][0-9]*)?|0*\.0*[1-9][0-9]*)((?:[eE][+-]?[0-9]+[.]?[0-9]+)?|(?:[eE][+-]?[0-9]+)?)$)|(^(high|average|low)$)"
    ).expect("geocoronal flux pattern is valid");

    static ref TELESCOPE: Vec<Rule> = vec![
        Rule::positive("fwhm", "FWHM").required(),
        Rule::positive("pxScale", "Pixel scale").required(),
        Rule::positive("mirrorDiameter", "Mirror diameter").required(),
        Rule::positive("darkCurrent", "Dark current").required(),
        Rule::positive("readNoise", "Read noise").required(),
        Rule::positive("redleakThresholds.uv", "Redleak threshold").required(),
        Rule::positive("redleakThresholds.u", "Redleak threshold").required(),
        Rule::positive("redleakThresholds.g", "Redleak threshold").required(),
        Rule::positive("extinctionCoeffs.uv", "Extinction coefficients").required(),
        Rule::positive("extinctionCoeffs.u", "Extinction coefficients").required(),
        Rule::positive("extinctionCoeffs.g", "Extinction coefficients").required(),
    ];

    static ref BACKGROUND: Vec<Rule> = {
        let custom = Condition::Equals("useDefaultSkyBackground", "false");
        vec![
            Rule::boolean("useDefaultSkyBackground", "Sky background mode")
                .required()
                .missing_message("Either default or custom sky background must be selected"),
            Rule::number("customSkyBackground.uv", "Sky background").required_when(custom),
            Rule::number("customSkyBackground.u", "Sky background").required_when(custom),
            Rule::number("customSkyBackground.g", "Sky background").required_when(custom),
            Rule::matches("geocoronalEmission.*.flux", "Flux", &GEOCORONAL_FLUX)
                .required()
                .message("Flux must be one of the predetermined values or a number > 0."),
            Rule::positive("geocoronalEmission.*.wavelength", "Wavelength").required(),
            Rule::positive("geocoronalEmission.*.linewidth", "Linewidth").required(),
        ]
    };

    static ref SOURCE: Vec<Rule> = {
        let galaxy = Condition::Equals("sourceType", "galaxy");
        let no_custom_spectrum = Condition::Absent("customSpectrum");
        vec![
            Rule::one_of("sourceType", "Source type", SOURCE_TYPES)
                .required()
                .missing_message("A source type is required"),
            Rule::non_negative("redshift", "Redshift")
                .required()
                .message("Redshift must be a non-negative number"),
            Rule::text("predefinedSpectrum", "Predefined spectrum")
                .required_when(no_custom_spectrum)
                .missing_message("Predefined spectrum required when no custom spectrum is provided"),

            Rule::number("predefinedSpectrumParameters.gaia.ra", "Right Ascension"),
            Rule::number("predefinedSpectrumParameters.gaia.dec", "Declination"),
            Rule::positive("predefinedSpectrumParameters.gaia.srchGmax", "Threshold Gaia G magnitude"),
            Rule::positive("predefinedSpectrumParameters.blackbody.temp", "Temperature"),
            Rule::positive("predefinedSpectrumParameters.blackbody.radius", "Radius"),
            Rule::positive("predefinedSpectrumParameters.blackbody.dist", "Distance"),
            Rule::positive("predefinedSpectrumParameters.powerLaw.refWavelength", "Reference wavelength"),
            Rule::number("predefinedSpectrumParameters.powerLaw.exponent", "Exponent"),
            Rule::number("predefinedSpectrumParameters.uniform.spectrumValue", "Spectrum value"),
            Rule::one_of("predefinedSpectrumParameters.uniform.unit", "Unit", SPECTRUM_UNITS),
            Rule::positive("predefinedSpectrumParameters.emissionLine.center", "Central wavelength"),
            Rule::positive("predefinedSpectrumParameters.emissionLine.fwhm", "FWHM"),
            Rule::positive("predefinedSpectrumParameters.emissionLine.peak", "Flux density"),
            Rule::one_of("predefinedSpectrumParameters.emissionLine.shape", "Line shape", LINE_SHAPES),

            Rule::positive("physicalParameters.extended.angleA", "Semimajor axis"),
            Rule::positive("physicalParameters.extended.angleB", "Semiminor axis"),
            Rule::number("physicalParameters.extended.rotation", "Rotation angle"),
            Rule::one_of("physicalParameters.extended.profile", "Profile", PROFILES),
            Rule::positive("physicalParameters.extended.exponentialScaleLengthA", "Scale length"),
            Rule::positive("physicalParameters.extended.exponentialScaleLengthB", "Scale length"),
            Rule::positive("physicalParameters.galaxy.sersic", "Sérsic index").required_when(galaxy),
            Rule::positive("physicalParameters.galaxy.rEff", "Effective radius").required_when(galaxy),
            Rule::number("physicalParameters.galaxy.rotation", "Rotation angle"),
            Rule::positive("physicalParameters.galaxy.axialRatio", "Axial ratio")
                .at_most(1.0)
                .message("Axial ratio must be a number between (0, 1]"),

            Rule::positive("spectralLines.*.center", "Central wavelength"),
            Rule::positive("spectralLines.*.fwhm", "FWHM"),
            Rule::positive("spectralLines.*.peak", "Flux density"),
            Rule::one_of("spectralLines.*.shape", "Line shape", LINE_SHAPES),
            Rule::one_of("spectralLines.*.type", "Line type", LINE_TYPES),

            Rule::one_of("normMethod", "Normalisation method", NORM_METHODS),
            Rule::number("normParams.passbandMag.abMag", "Passband AB magnitude"),
            Rule::one_of("normParams.passbandMag.passband", "Passband", PASSBANDS),
            Rule::number("normParams.totalMag", "Bolometric AB magnitude"),
            Rule::positive("normParams.luminosityDist.luminosity", "Luminosity"),
            Rule::positive("normParams.luminosityDist.dist", "Distance"),
            Rule::boolean("isNormAfterSpectralLines", "Normalise after spectral lines").required(),
        ]
    };

    static ref PHOTOMETRY: Vec<Rule> = {
        let optimal = Condition::Equals("aperShape", "optimal");
        let elliptical = Condition::Equals("aperShape", "elliptical");
        let rectangular = Condition::Equals("aperShape", "rectangular");
        vec![
            Rule::one_of("aperShape", "Aperture shape", APERTURES).required(),
            Rule::non_negative("reddening", "Reddening")
                .required()
                .message("Reddening must be a non-negative number"),
            Rule::positive("aperParams.optimal.factor", "Radius").required_when(optimal),
            Rule::positive("aperParams.elliptical.a", "Semimajor axis").required_when(elliptical),
            Rule::positive("aperParams.elliptical.b", "Semiminor axis").required_when(elliptical),
            Rule::number("aperParams.elliptical.rotation", "Rotation angle").required_when(elliptical),
            Rule::positive("aperParams.rectangular.width", "Width").required_when(rectangular),
            Rule::positive("aperParams.rectangular.length", "Length").required_when(rectangular),
            Rule::positive("photInput.val", "Target value"),
            Rule::one_of("photInput.val_type", "Target type", TARGET_TYPES).required(),
        ]
    };

    static ref UVMOS: Vec<Rule> = vec![
        Rule::positive("spectralRange.minwavelength", "Minimum wavelength").required(),
        Rule::positive("spectralRange.maxwavelength", "Maximum wavelength").required(),
        Rule::positive("slit.width", "Slit width").required(),
        Rule::positive("slit.length", "Slit length").required(),
        Rule::one_of("extractionBox.units", "Extraction box units", BOX_UNITS),
        Rule::positive("extractionBox.width", "Extraction box width").required(),
        Rule::non_negative("extractionBox.heightLowerLim", "Extraction box height lower limit").required(),
        Rule::positive("extractionBox.heightUpperLim", "Extraction box height upper limit"),
        Rule::non_negative("snrInput.val", "Target value"),
        Rule::positive("snrInput.wavelength", "Wavelength"),
        Rule::one_of("snrInput.val_type", "Target type", TARGET_TYPES).required(),
    ];

    static ref GRISM: Vec<Rule> = vec![
        Rule::one_of("grismChannel", "Grism channel", GRISM_CHANNELS).required(),
        Rule::positive("exposureTime", "Exposure time"),
    ];

    static ref TRANSIT: Vec<Rule> = vec![
        Rule::one_of("bandpass.bandpass_id", "Bandpass", PASSBANDS).required(),
        Rule::positive("exposureParameters.exptime", "Exposure time"),
        Rule::positive("exposureParameters.nstack", "Number of stacks")
            .integer()
            .message("Number of stacks must be a whole number > 0"),
        Rule::non_negative("exposureParameters.tstart", "Light curve start time"),
        Rule::positive("exposureParameters.tend", "Light curve end time"),
        Rule::positive("planetModelParameters.rprs", "Planet-star radius ratio"),
        Rule::positive("planetModelParameters.p", "Orbital period"),
        Rule::non_negative("planetModelParameters.t0", "Zero epoch"),
        Rule::positive("planetModelParameters.b", "b"),
        Rule::positive("planetModelParameters.ars", "aRs"),
    ];
}

/// The validation rules of `tab`.
pub fn rules(tab: Tab) -> &'static [Rule] {
    match tab {
        Tab::Telescope => &TELESCOPE,
        Tab::Background => &BACKGROUND,
        Tab::Source => &SOURCE,
        Tab::Photometry => &PHOTOMETRY,
        Tab::Uvmos => &UVMOS,
        Tab::Grism => &GRISM,
        Tab::Transit => &TRANSIT,
    }
}
