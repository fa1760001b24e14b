// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Subcommands about tabs as a whole: which is active, which can be opened
//! and what their calculations produced.

use std::path::PathBuf;

use clap::Parser;
use log::info;
use strum::IntoEnumIterator;

use super::{
    common::{display_value, leaves, InfoPrinter, TerminalConfirm},
    EtcError, Warn,
};
use crate::{
    config::RuntimeConfig,
    navigation::NavOutcome,
    results::{PanelState, ResultPanel, PANELS_COMMA_SEPARATED},
    session::EtcSession,
    tab::{Tab, TABS_COMMA_SEPARATED},
};

lazy_static::lazy_static! {
    static ref OPEN_TAB_HELP: String =
        format!("The tab to open. Supported tabs: {}", *TABS_COMMA_SEPARATED);

    static ref RESULT_PANEL_HELP: String =
        format!("The result panel to show. Supported panels: {}", *PANELS_COMMA_SEPARATED);
}

#[derive(Parser, Debug, Default)]
pub(super) struct StatusArgs {}

impl StatusArgs {
    pub(super) fn run(self, session: &EtcSession, config: &RuntimeConfig) -> Result<(), EtcError> {
        let active = session.active_tab();
        let coordinator = session.coordinator();

        let mut printer = InfoPrinter::new("Session".into());
        printer.push_line(format!("Compute service: {}", config.api_address).into());
        let mut active_line = format!("Active tab: {}", active.title());
        if session.navigator().is_dirty() {
            active_line.push_str(" (unsaved changes)");
        }
        printer.push_line(active_line.into());
        printer.display();

        let mut printer = InfoPrinter::new("Tabs".into());
        for tab in Tab::iter() {
            let mut block = vec![];
            let mut heading = format!("{tab}: {}", tab.title());
            if !session.tab_available(tab)? {
                heading.push_str(" (unavailable)");
            }
            block.push(heading.into());
            let saved = session.saved_form(tab)?.is_some();
            block.push(format!("saved: {}", if saved { "yes" } else { "no" }).into());
            let stale: Vec<&str> = tab
                .upstream()
                .iter()
                .filter(|&&upstream| !coordinator.is_synced(upstream, tab))
                .map(|upstream| upstream.title())
                .collect();
            if !stale.is_empty() {
                block.push(format!("out of date with: {}", stale.join(", ")).into());
            }
            if tab.is_compute() {
                block.push(
                    format!("calculations submitted: {}", coordinator.num_submit(tab)).into(),
                );
                if coordinator.is_saved_and_unsubmitted(tab) {
                    block.push("upstream saved since the last submission".into());
                }
            }
            printer.push_block(block);
        }
        printer.display();

        for notice in session.notices(active)? {
            notice.warn();
        }
        for alert in session.alerts() {
            alert.to_string().warn();
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub(super) struct OpenArgs {
    #[clap(name = "TAB", help = OPEN_TAB_HELP.as_str())]
    tab: Tab,

    /// Discard unsaved changes without asking.
    #[clap(short, long, conflicts_with = "no")]
    yes: bool,

    /// Keep unsaved changes without asking (and so stay on the active tab).
    #[clap(short, long)]
    no: bool,
}

impl OpenArgs {
    pub(super) fn run(self, session: &mut EtcSession, dry_run: bool) -> Result<(), EtcError> {
        let target = self.tab;
        if dry_run {
            let available = session.tab_available(target)?;
            info!(
                "Dry run; {} {}",
                target.title(),
                if available {
                    "can be opened"
                } else {
                    "can't be opened yet"
                }
            );
            return Ok(());
        }

        let answer = match (self.yes, self.no) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        let mut confirm = TerminalConfirm { answer };
        match session.navigate(target, &mut confirm)? {
            NavOutcome::Switched {
                from, discarded, ..
            } => {
                if discarded {
                    format!("Discarded the unsaved {} changes", from.title()).warn();
                }
                info!("Opened {}", target.title());
                for notice in session.notices(target)? {
                    notice.warn();
                }
            }
            NavOutcome::AlreadyActive => info!("{} is already open", target.title()),
            NavOutcome::Stayed => {
                format!(
                    "Stayed on {} to keep its unsaved changes",
                    session.active_tab().title()
                )
                .warn();
            }
            NavOutcome::Unavailable(tab) => {
                let reason = match tab {
                    Tab::Transit => "save the Telescope parameters, then the Background and Source parameters with the 'gaia' predefined spectrum",
                    _ if tab.is_compute() => "save the Telescope parameters, then the Background and Source parameters",
                    _ => "save the Telescope parameters first",
                };
                return Err(EtcError::Session(format!(
                    "{} can't be opened yet; {reason}",
                    tab.title()
                )));
            }
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
pub(super) struct ResultsArgs {
    #[clap(name = "PANEL", help = RESULT_PANEL_HELP.as_str())]
    panel: ResultPanel,

    /// Write the panel's data to this json file.
    #[clap(short, long)]
    output: Option<PathBuf>,
}

impl ResultsArgs {
    pub(super) fn run(self, session: &EtcSession) -> Result<(), EtcError> {
        let data = match session.results(self.panel)? {
            PanelState::Placeholder(message) => {
                info!("{message}");
                return Ok(());
            }
            PanelState::Ready { data, refresh_key } => {
                log::debug!("{} refresh key: {refresh_key}", self.panel);
                data
            }
        };

        let mut printer = InfoPrinter::new(format!("{} ({})", self.panel, self.panel.tab()).into());
        let block = leaves(&data)
            .into_iter()
            .map(|(path, v)| {
                let mut shown = display_value(v).into_owned();
                if shown.chars().count() > 80 {
                    shown = shown.chars().take(77).collect();
                    shown.push_str("...");
                }
                format!("{path} = {shown}").into()
            })
            .collect();
        printer.push_block(block);
        printer.display();

        if let Some(output) = self.output {
            let contents = serde_json::to_string_pretty(&data)
                .map_err(|e| EtcError::Generic(e.to_string()))?;
            std::fs::write(&output, contents)?;
            info!("Wrote the {} data to {}", self.panel, output.display());
        }
        Ok(())
    }
}

#[derive(Parser, Debug, Default)]
pub(super) struct ResetArgs {
    /// Also forget results that outlive the session (e.g. transit
    /// simulations).
    #[clap(long)]
    all: bool,
}

impl ResetArgs {
    pub(super) fn run(self, session: &mut EtcSession, dry_run: bool) -> Result<(), EtcError> {
        if dry_run {
            info!("Dry run; the session was kept");
            return Ok(());
        }
        session.reset(self.all)?;
        info!(
            "Forgot the session{}",
            if self.all {
                " and all saved results"
            } else {
                ""
            }
        );
        Ok(())
    }
}
