// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Subcommands that look at or change a tab's form.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info};

use super::{
    common::{
        display_value, leaves, parse_assignment, parse_row, read_form_file, waiting_spinner,
        write_form_file, InfoPrinter, ARG_FILE_HELP,
    },
    EtcError, Warn,
};
use crate::{session::EtcSession, tab::Tab, validation::FieldErrors};

#[derive(Parser, Debug, Default)]
pub(super) struct ShowArgs {
    /// The tab to show. Default: the active tab.
    #[clap(name = "TAB")]
    tab: Option<Tab>,

    /// Also write the values to this file (toml or json), ready to be given
    /// to `save`.
    #[clap(short, long)]
    output: Option<PathBuf>,
}

impl ShowArgs {
    pub(super) fn run(self, session: &EtcSession) -> Result<(), EtcError> {
        let tab = self.tab.unwrap_or_else(|| session.active_tab());
        let values = session.form(tab)?;

        let mut printer = InfoPrinter::new(format!("{} parameters", tab.title()).into());
        let changed = tab == session.active_tab() && session.controller().changed();
        if changed {
            printer.push_line("(unsaved changes)".into());
        }
        let block = leaves(&values.to_value())
            .into_iter()
            .map(|(path, v)| format!("{path} = {}", display_value(v)).into())
            .collect();
        printer.push_block(block);
        printer.display();

        let errors = crate::validation::validate(tab, &values);
        print_field_errors(&errors);

        if let Some(output) = self.output {
            write_form_file(&output, &values)?;
            info!("Wrote the {} parameters to {}", tab.title(), output.display());
        }
        Ok(())
    }
}

fn print_field_errors(errors: &FieldErrors) {
    if errors.is_empty() {
        return;
    }
    let mut printer = InfoPrinter::new("Invalid fields".into());
    for (path, message) in errors {
        printer.push_line(format!("{path}: {message}").into());
    }
    printer.display();
}

#[derive(Parser, Debug, Default)]
pub(super) struct SetArgs {
    /// Fields to change, e.g. `mirrorDiameter=120` or
    /// `geocoronalEmission.0.flux=High`.
    #[clap(name = "ASSIGNMENTS", value_name = "PATH=VALUE", parse(try_from_str = parse_assignment))]
    assignments: Vec<(String, String)>,

    /// Append a new row to a list, e.g. `spectralLines`.
    #[clap(long, multiple_occurrences(true), value_name = "PATH")]
    add_row: Vec<String>,

    /// Remove a row from a list, e.g. `spectralLines:1`.
    #[clap(long, multiple_occurrences(true), value_name = "PATH:INDEX", parse(try_from_str = parse_row))]
    remove_row: Vec<(String, usize)>,
}

impl SetArgs {
    pub(super) fn run(self, session: &mut EtcSession, dry_run: bool) -> Result<(), EtcError> {
        let tab = session.active_tab();
        if self.assignments.is_empty() && self.add_row.is_empty() && self.remove_row.is_empty() {
            "Nothing to change".warn();
            return Ok(());
        }

        // A dry run edits a copy of the form.
        let mut controller = session.controller().clone();
        for path in &self.add_row {
            let index = controller.add_row(path)?;
            debug!("Added row {index} to {path}");
        }
        for (path, index) in &self.remove_row {
            controller.remove_row(path, *index)?;
        }
        for (path, raw) in &self.assignments {
            controller.on_field_input(path, raw)?;
        }
        print_field_errors(&controller.validate());

        if dry_run {
            info!("Dry run; the {} parameters weren't changed", tab.title());
            return Ok(());
        }
        for path in &self.add_row {
            session.add_row(path)?;
        }
        for (path, index) in &self.remove_row {
            session.remove_row(path, *index)?;
        }
        for (path, raw) in &self.assignments {
            session.edit_input(path, raw)?;
        }
        info!(
            "Changed {} field(s) of the {} parameters; run 'save' to submit them",
            self.assignments.len() + self.add_row.len() + self.remove_row.len(),
            tab.title()
        );
        Ok(())
    }
}

#[derive(Parser, Debug, Default)]
pub(super) struct SaveArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    args_file: Option<PathBuf>,
}

impl SaveArgs {
    pub(super) fn run(self, session: &mut EtcSession, dry_run: bool) -> Result<(), EtcError> {
        let tab = session.active_tab();
        let file_values = match &self.args_file {
            Some(file) => Some(read_form_file(file)?),
            None => None,
        };

        if dry_run {
            let mut controller = session.controller().clone();
            if let Some(values) = &file_values {
                controller.merge(values);
            }
            controller.check()?;
            info!(
                "The {} parameters are valid; dry run, so nothing was sent",
                tab.title()
            );
            return Ok(());
        }

        if let Some(values) = &file_values {
            session.merge(values)?;
        }
        let spinner = waiting_spinner(format!("Waiting for the {} calculation", tab.title()));
        let result = session.save();
        spinner.finish_and_clear();
        let response = result?;

        let mut printer = InfoPrinter::new(format!("Saved the {} parameters", tab.title()).into());
        if let Some(map) = response.as_object() {
            let fields: Vec<String> = map.keys().cloned().collect();
            if !fields.is_empty() {
                printer.push_line(format!("Results: {}", fields.join(", ")).into());
            }
        }
        if tab.is_compute() {
            printer.push_line(
                format!(
                    "Calculations submitted: {}",
                    session.coordinator().num_submit(tab)
                )
                .into(),
            );
        }
        printer.display();

        for notice in session.notices(tab)? {
            notice.warn();
        }
        Ok(())
    }
}

pub(super) fn revert(session: &mut EtcSession, dry_run: bool) -> Result<(), EtcError> {
    let tab = session.active_tab();
    if !session.controller().changed() {
        info!("The {} parameters have no unsaved changes", tab.title());
        return Ok(());
    }
    if dry_run {
        info!("Dry run; the unsaved {} changes were kept", tab.title());
        return Ok(());
    }
    session.revert()?;
    info!("Reverted the {} parameters to their last save", tab.title());
    Ok(())
}
