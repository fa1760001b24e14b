// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Things shared by the `forecastor-etc` subcommands: arguments files,
//! printers, the confirmation prompt and the progress spinner.

mod printers;

pub(super) use printers::InfoPrinter;
pub(crate) use printers::{display_warnings, Warn};

use std::{borrow::Cow, path::Path, str::FromStr, time::Duration};

use console::Term;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use itertools::Itertools;
use log::{debug, trace};
use serde_json::Value;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::EtcError;
use crate::{navigation::Confirm, values::FormValues, PROGRESS_BARS};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("A file of form values to merge into the active tab before saving. Values in the file override the tab's current values. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

impl ArgFileTypes {
    /// The type of `file`, judging by its extension.
    pub(super) fn from_path(file: &Path) -> Option<ArgFileTypes> {
        file.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok())
    }
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        match ArgFileTypes::from_path(&$arg_file) {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(EtcError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(EtcError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(EtcError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

/// Read form values from a toml or json file.
pub(super) fn read_form_file(file: &Path) -> Result<FormValues, EtcError> {
    let values: FormValues = unpack_arg_file!(file);
    trace!("{}", values.to_value());
    Ok(values)
}

/// Write form values to a toml or json file, so that they can be given back
/// to `save`.
pub(super) fn write_form_file(file: &Path, values: &FormValues) -> Result<(), EtcError> {
    let contents = match ArgFileTypes::from_path(file) {
        Some(ArgFileTypes::Toml) => toml::to_string_pretty(&values.to_value())
            .map_err(|e| EtcError::ArgFile(format!("Couldn't encode values as toml: {e}")))?,
        Some(ArgFileTypes::Json) => serde_json::to_string_pretty(&values.to_value())
            .map_err(|e| EtcError::ArgFile(format!("Couldn't encode values as json: {e}")))?,
        None => {
            return Err(EtcError::ArgFile(format!(
                "Output file '{}' doesn't have a recognised file extension! Valid extensions are: {}",
                file.display(),
                *ARG_FILE_TYPES_COMMA_SEPARATED
            )))
        }
    };
    std::fs::write(file, contents)?;
    Ok(())
}

/// Parse `PATH=VALUE`.
pub(super) fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((path, value)) if !path.trim().is_empty() => {
            Ok((path.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("'{s}' isn't of the form PATH=VALUE")),
    }
}

/// Parse `PATH:INDEX`.
pub(super) fn parse_row(s: &str) -> Result<(String, usize), String> {
    let (path, index) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("'{s}' isn't of the form PATH:INDEX"))?;
    let index = index
        .parse()
        .map_err(|_| format!("'{index}' isn't a row index"))?;
    Ok((path.to_string(), index))
}

/// Render a form value for display.
pub(super) fn display_value(v: &Value) -> Cow<'_, str> {
    match v {
        Value::String(s) if s.is_empty() => "<empty>".into(),
        Value::String(s) => s.as_str().into(),
        other => other.to_string().into(),
    }
}

/// Every leaf of `value` as `(dotted path, value)`.
pub(super) fn leaves(value: &Value) -> Vec<(String, &Value)> {
    fn walk<'a>(prefix: String, value: &'a Value, out: &mut Vec<(String, &'a Value)>) {
        let join = |k: &dyn std::fmt::Display| {
            if prefix.is_empty() {
                k.to_string()
            } else {
                format!("{prefix}.{k}")
            }
        };
        match value {
            Value::Object(m) if !m.is_empty() => {
                for (k, v) in m {
                    walk(join(k), v, out);
                }
            }
            Value::Array(a) if !a.is_empty() => {
                for (i, v) in a.iter().enumerate() {
                    walk(join(&i), v, out);
                }
            }
            _ => out.push((prefix, value)),
        }
    }

    let mut out = vec![];
    walk(String::new(), value, &mut out);
    out
}

/// Asks on the terminal, unless the answer was given on the command line.
pub(super) struct TerminalConfirm {
    pub(super) answer: Option<bool>,
}

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        if let Some(answer) = self.answer {
            return answer;
        }
        if !console::user_attended() {
            format!("{message} Not asking, as there is no terminal; use --yes to discard changes")
                .warn();
            return false;
        }
        let term = Term::stderr();
        if term.write_str(&format!("{message} [y/N] ")).is_err() {
            return false;
        }
        match term.read_line() {
            Ok(line) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                debug!("Couldn't read an answer: {e}");
                false
            }
        }
    }
}

/// A spinner shown while waiting on the compute service.
pub(super) fn waiting_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner()
        .with_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.blue} {msg} ({elapsed_precise})")
                .unwrap(),
        )
        .with_message(message);
    pb.set_draw_target(if PROGRESS_BARS.load() {
        ProgressDrawTarget::stdout()
    } else {
        ProgressDrawTarget::hidden()
    });
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
