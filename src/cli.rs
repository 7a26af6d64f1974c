use clap::Parser;

/// Retrieve CMORPH v1.0 netcdf files from the RDA server
/// (https://rda.ucar.edu/data/ds502.2/), one file per calendar day.
#[derive(Parser, Debug)]
#[command(name = "cmorph-sync", about = "Download and update a local CMORPH v1.0 mirror")]
pub struct Cli {
    /// Year to process (4 digits)
    #[arg(short = 'y', long)]
    pub year: String,

    /// Month(s) to process as two-digit tokens, e.g. -m 02 -m 03.
    /// All twelve months when omitted.
    #[arg(short = 'm', long = "month")]
    pub months: Vec<String>,

    /// Email address of the RDA account.
    /// The account password is read from the RDAPSWD environment variable.
    #[arg(short = 'u', long)]
    pub user: String,

    /// Print debug information
    #[arg(short = 'd', long)]
    pub debug: bool,
}
