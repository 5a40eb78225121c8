use std::path::PathBuf;

/// Region drill-down CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "geodrill", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON configuration file
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Drill down to a region and report the synchronized state
    Drill(DrillArgs),

    /// Print the legend of a soil attribute
    Legend(LegendArgs),

    /// Click a point on the rendered layer and report the new selection
    Click(ClickArgs),
}

/// Region selection, applied top-down.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    #[arg(long)]
    pub state: Option<String>,

    #[arg(long, requires = "state")]
    pub district: Option<String>,

    #[arg(long, requires = "district")]
    pub subdistrict: Option<String>,
}

/// Where boundaries come from. Without either flag, the configured
/// boundary service (`service.base_url`) is used.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Directory with state/district/subdistrict .geojson files
    #[arg(short, long, value_hint = clap::ValueHint::DirPath, conflicts_with = "url")]
    pub source: Option<PathBuf>,

    /// Boundary service base URL, overriding the configured one
    #[arg(long, value_hint = clap::ValueHint::Url)]
    pub url: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DrillArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Attribute driving the fill, e.g. ph or N
    #[arg(short, long)]
    pub attribute: Option<String>,

    /// Write the rendered layer as SVG
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub svg: Option<PathBuf>,

    /// Print the rendered layer as GeoJSON instead of a summary
    #[arg(long)]
    pub geojson: bool,
}

#[derive(clap::Args, Debug)]
pub struct LegendArgs {
    /// Attribute key or short code; all attributes if omitted
    pub attribute: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ClickArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Longitude of the click
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Latitude of the click
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,
}
