// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Command-line interface code. Each invocation opens the session persisted
//! in the store directory, does one thing to it and persists it again.
//!
//! Only 3 things should be public in this module: `ForecastorEtc`,
//! `ForecastorEtc::run`, and `EtcError`.

#[macro_use]
mod common;
mod error;
mod forms;
mod tabs;

pub(crate) use common::Warn;
pub use error::EtcError;

use std::path::PathBuf;

use clap::{AppSettings, Args, Parser, Subcommand};
use log::{debug, info};

use crate::{
    config::RuntimeConfig,
    constants::{API_URL_ENV_VAR, DEFAULT_STORE_DIR},
    service::HttpComputeService,
    session::EtcSession,
    store::Stores,
    PROGRESS_BARS,
};

// Add build-time information from the "built" crate.
include!(concat!(env!("OUT_DIR"), "/built.rs"));

#[derive(Debug, Parser)]
#[clap(
    version,
    author,
    about = r#"Command-line client for the FORECASTOR exposure-time calculator (ETC)
Source: https://github.com/CASTOR-telescope/ETC_frontend"#
)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(disable_help_subcommand = true)]
#[clap(infer_subcommands = true)]
#[clap(propagate_version = true)]
#[clap(infer_long_args = true)]
pub struct ForecastorEtc {
    #[clap(flatten)]
    global_opts: GlobalArgs,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Don't draw progress bars.
    #[clap(long)]
    #[clap(global = true)]
    no_progress_bars: bool,

    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[clap(short, long, parse(from_occurrences))]
    #[clap(global = true)]
    verbosity: u8,

    /// Only validate; never send anything to the compute service or change
    /// the session.
    #[clap(long)]
    #[clap(global = true)]
    dry_run: bool,

    /// The address of the compute service. Default: http://localhost:5000/
    #[clap(long, env = API_URL_ENV_VAR)]
    #[clap(global = true)]
    api_url: Option<String>,

    /// The directory the session is kept in (and where config.toml is read
    /// from).
    #[clap(long, default_value = DEFAULT_STORE_DIR)]
    #[clap(global = true)]
    store_dir: PathBuf,

    /// How long to wait for the compute service [seconds]. Default: 300
    #[clap(long)]
    #[clap(global = true)]
    timeout: Option<u64>,
}

#[derive(Debug, Subcommand)]
#[clap(arg_required_else_help = true)]
enum Command {
    #[clap(about = "Show the active tab, which tabs can be used and which are out of date.")]
    Status(tabs::StatusArgs),

    #[clap(about = "Show a tab's current values and any problems with them.")]
    Show(forms::ShowArgs),

    #[clap(alias = "switch")]
    #[clap(about = "Make another tab the active tab.")]
    Open(tabs::OpenArgs),

    #[clap(about = "Change the values of the active tab.")]
    Set(forms::SetArgs),

    #[clap(alias = "submit")]
    #[clap(about = "Send the active tab's values to the compute service and keep the results.")]
    Save(forms::SaveArgs),

    #[clap(about = "Throw away the active tab's unsaved changes.")]
    Revert,

    #[clap(about = "Show the data behind a result panel.")]
    Results(tabs::ResultsArgs),

    #[clap(about = "Forget the session.")]
    Reset(tabs::ResetArgs),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Status(_) => "status",
            Command::Show(_) => "show",
            Command::Open(_) => "open",
            Command::Set(_) => "set",
            Command::Save(_) => "save",
            Command::Revert => "revert",
            Command::Results(_) => "results",
            Command::Reset(_) => "reset",
        }
    }
}

impl ForecastorEtc {
    pub fn run(self) -> Result<(), EtcError> {
        // Set up logging.
        let GlobalArgs {
            verbosity,
            dry_run,
            no_progress_bars,
            api_url,
            store_dir,
            timeout,
        } = self.global_opts;
        setup_logging(verbosity).expect("Failed to initialise logging.");
        // Enable progress bars if the user didn't say "no progress bars".
        if !no_progress_bars {
            PROGRESS_BARS.store(true);
        }

        let sub_command = self.command.name();
        info!("forecastor-etc {} {}", sub_command, env!("CARGO_PKG_VERSION"));
        display_build_info();

        let config = RuntimeConfig::load(&store_dir, api_url, timeout)?;
        debug!("Compute service: {}", config.api_address);
        let service = HttpComputeService::new(&config.api_address, config.timeout)?;
        let stores = Stores::open_dir(&store_dir)?;
        let mut session = EtcSession::open(stores, Box::new(service))?;

        let result = match self.command {
            Command::Status(args) => args.run(&session, &config),
            Command::Show(args) => args.run(&session),
            Command::Open(args) => args.run(&mut session, dry_run),
            Command::Set(args) => args.run(&mut session, dry_run),
            Command::Save(args) => args.run(&mut session, dry_run),
            Command::Revert => forms::revert(&mut session, dry_run),
            Command::Results(args) => args.run(&session),
            Command::Reset(args) => args.run(&mut session, dry_run),
        };
        common::display_warnings();
        result?;

        info!("forecastor-etc {} complete.", sub_command);
        Ok(())
    }
}

/// Activate a logger. All log messages are put onto `stdout`. `env_logger`
/// automatically only uses colours and fancy symbols if we're on a tty (e.g. a
/// terminal); piped output will be formatted sensibly. Source code lines are
/// displayed in log messages when verbosity >= 3.
fn setup_logging(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stdout);
    builder.format_target(false);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Info),
        1 => builder.filter_level(log::LevelFilter::Debug),
        2 => builder.filter_level(log::LevelFilter::Trace),
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
            builder.format(|buf, record| {
                use std::io::Write;

                let timestamp = buf.timestamp();
                let level = record.level();
                let target = record.target();
                let line = record.line().unwrap_or(0);
                let message = record.args();

                writeln!(buf, "[{timestamp} {level} {target}:{line}] {message}")
            })
        }
    };
    builder.try_init()
}

/// Write many debug-level log lines of how this executable was compiled.
fn display_build_info() {
    let dirty = match GIT_DIRTY {
        Some(true) => " (dirty)",
        _ => "",
    };
    match GIT_COMMIT_HASH_SHORT {
        Some(hash) => {
            debug!("Compiled on git commit hash: {hash}{dirty}");
        }
        None => debug!("Compiled on git commit hash: <no git info>"),
    }
    if let Some(hr) = GIT_HEAD_REF {
        debug!("            git head ref: {}", hr);
    }
    debug!("            {}", BUILT_TIME_UTC);
    debug!("         with compiler {}", RUSTC_VERSION);
    debug!("");
}
