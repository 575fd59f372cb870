use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use surgical_scope::data::aggregate::{
    distinct_hospital_count, ranked_surgeries, top_surgery_label, total_cases,
    year_by_surgery_pivot, RankDirection, FILTERED_TOTAL,
};
use surgical_scope::data::export::save_csv;
use surgical_scope::data::loader::title_case;
use surgical_scope::data::model::{thousands, Dataset, FilteredView, Selection};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./surgical-scope.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Surgery CSV, overriding the configured path
    #[arg(long, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// County boundaries GeoJSON, overriding the configured path
    #[arg(long, value_name = "FILE")]
    pub geojson: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive dashboard (default)
    Dashboard,
    /// Print summary statistics for a selection
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Write the filtered records as CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output file (defaults to the configured export file name)
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

/// Filter values; a dimension given no values selects everything.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    #[arg(long = "year", value_name = "YEAR")]
    pub years: Vec<i32>,
    #[arg(long = "surgery", value_name = "SURGERY")]
    pub surgeries: Vec<String>,
    #[arg(long = "region", value_name = "REGION")]
    pub regions: Vec<String>,
}

impl FilterArgs {
    pub fn selection(&self, dataset: &Dataset) -> Selection {
        let mut selection = Selection::everything(dataset);
        if !self.years.is_empty() {
            selection.years = self.years.iter().copied().collect();
        }
        if !self.surgeries.is_empty() {
            selection.surgeries = self.surgeries.iter().map(|s| title_case(s)).collect();
        }
        if !self.regions.is_empty() {
            selection.regions = self.regions.iter().map(|r| title_case(r)).collect();
        }
        selection
    }
}

pub fn print_summary(view: &FilteredView<'_>) {
    println!("Filtered records:      {}", view.len());
    println!("Total surgeries:       {}", thousands(total_cases(view)));
    println!("Top surgery type:      {}", top_surgery_label(view));
    println!("Hospitals represented: {}", distinct_hospital_count(view));

    let most = ranked_surgeries(view, 3, RankDirection::Most);
    if !most.is_empty() {
        println!("Most common:           {}", most.join(", "));
        println!(
            "Least common:          {}",
            ranked_surgeries(view, 3, RankDirection::Least).join(", ")
        );
    }

    let pivot = year_by_surgery_pivot(view, &[], true);
    if pivot.has_total() {
        println!();
        println!("{:<6} {:>12}", "Year", FILTERED_TOTAL);
        for (year, cases) in pivot.series(FILTERED_TOTAL) {
            println!("{year:<6} {:>12}", thousands(cases));
        }
    }
}

pub fn export(view: &FilteredView<'_>, out: &Path) -> Result<()> {
    save_csv(view, out)?;
    println!("Wrote {} records to {}", view.len(), out.display());
    Ok(())
}
