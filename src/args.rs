//! These structs provide the CLI interface for the opstat CLI.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

const STATEMENT_CSV: &str = "operations.csv";

/// opstat: turn a bank-statement export into JSON reports.
///
/// The purpose of this program is to analyze a statement export (CSV) downloaded from your
/// bank's personal account. It produces a time-of-day dashboard (per-card spending, top-5
/// transactions of the month, currency rates, stock prices), spending-by-category reports over
/// a trailing three-month window, and free-text transaction search.
///
/// Currency rates and stock prices require provider API keys in the RATES_API_KEY and
/// STOCKS_API_KEY environment variables, plus a user_settings.json in the opstat home
/// directory listing user_currencies and user_stocks. Without them the dashboard is still
/// produced, with those sections empty.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build the dashboard JSON: greeting, card summary, top-5 transactions of the month,
    /// currency rates and stock prices.
    Dashboard(DashboardArgs),
    /// Spending by category over the three months trailing a reference date.
    Report(ReportArgs),
    /// Case-insensitive free-text search across transaction descriptions and categories.
    Search(SearchArgs),
    /// Run search, category report and dashboard in one pass and emit a combined document.
    Analyze(AnalyzeArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where opstat settings are held. Defaults to ~/opstat
    #[arg(long, env = "OPSTAT_HOME", default_value_t = default_opstat_home())]
    home: DisplayPath,

    /// The path to the statement export CSV. Defaults to operations.csv in the opstat home
    /// directory.
    #[arg(long, env = "OPSTAT_STATEMENT")]
    statement: Option<PathBuf>,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf, statement: Option<PathBuf>) -> Self {
        Self {
            log_level,
            home: home.into(),
            statement,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }

    /// The statement path: the explicit `--statement` flag, or `operations.csv` in the home
    /// directory.
    pub fn statement_path(&self) -> PathBuf {
        match &self.statement {
            Some(path) => path.clone(),
            None => self.home.join(STATEMENT_CSV),
        }
    }
}

/// Args for the `opstat dashboard` command.
#[derive(Debug, Parser, Clone)]
pub struct DashboardArgs {
    /// The reference timestamp in the format 'YYYY-MM-DD HH:MM:SS', e.g. '2021-12-26 14:30:00'.
    /// The top-transactions window runs from the first of that month through this moment.
    #[arg(long)]
    date: String,
}

impl DashboardArgs {
    pub fn new(date: impl Into<String>) -> Self {
        Self { date: date.into() }
    }

    pub fn date(&self) -> &str {
        &self.date
    }
}

/// Args for the `opstat report` command.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// The category to report on; matches any category containing this text, case-insensitively.
    #[arg(long)]
    category: String,

    /// The reference date in the format 'YYYY-MM-DD[ HH:MM:SS]'. The report covers the 90 days
    /// up to and including this date.
    #[arg(long)]
    date: String,

    /// Also write the report rows to this file as a JSON array.
    #[arg(long)]
    output: Option<PathBuf>,
}

impl ReportArgs {
    pub fn new(
        category: impl Into<String>,
        date: impl Into<String>,
        output: Option<PathBuf>,
    ) -> Self {
        Self {
            category: category.into(),
            date: date.into(),
            output,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}

/// Args for the `opstat search` command.
#[derive(Debug, Parser, Clone)]
pub struct SearchArgs {
    /// The text to look for in transaction descriptions and categories.
    #[arg(long)]
    query: String,
}

impl SearchArgs {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Args for the `opstat analyze` command.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// The reference timestamp in the format 'YYYY-MM-DD HH:MM:SS'.
    #[arg(long)]
    date: String,

    /// Optional search text; without it the combined document has an empty search section.
    #[arg(long)]
    query: Option<String>,

    /// Optional category filter; without it the combined document has an empty report section.
    #[arg(long)]
    category: Option<String>,
}

impl AnalyzeArgs {
    pub fn new(
        date: impl Into<String>,
        query: Option<String>,
        category: Option<String>,
    ) -> Self {
        Self {
            date: date.into(),
            query,
            category,
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

fn default_opstat_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("opstat"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or OPSTAT_HOME instead of relying on the default \
                opstat home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("opstat")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
