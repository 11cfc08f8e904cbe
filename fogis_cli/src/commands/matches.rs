use anyhow::Result;
use clap::Args;
use fogis_lib::{FogisClient, MatchListFilter};

use crate::output::{print_json, print_matches_table, OutputFormat};

#[derive(Args)]
pub struct MatchesArgs {
    /// First match date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Last match date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Only these statuses: avbruten, uppskjuten, installd, genomford, ej_startad (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub include_status: Vec<String>,

    /// Drop these statuses (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub exclude_status: Vec<String>,

    /// Only these age categories: 1-5 or undefined, children, youth, senior, veterans
    #[arg(long, value_delimiter = ',')]
    pub age: Vec<String>,

    /// Drop these age categories
    #[arg(long, value_delimiter = ',')]
    pub exclude_age: Vec<String>,

    /// Only these genders: 2 (male), 3 (female), 4 (mixed)
    #[arg(long, value_delimiter = ',')]
    pub gender: Vec<String>,

    /// Drop these genders
    #[arg(long, value_delimiter = ',')]
    pub exclude_gender: Vec<String>,

    /// Only these football types: 1 (football), 2 (futsal)
    #[arg(long, value_delimiter = ',')]
    pub football_type: Vec<String>,

    /// Drop these football types
    #[arg(long, value_delimiter = ',')]
    pub exclude_football_type: Vec<String>,
}

impl MatchesArgs {
    fn to_filter(&self) -> MatchListFilter {
        let mut filter = MatchListFilter::new();
        if let Some(ref from) = self.from {
            filter = filter.start_date(from);
        }
        if let Some(ref to) = self.to {
            filter = filter.end_date(to);
        }
        if !self.include_status.is_empty() {
            filter = filter.include_statuses(&self.include_status);
        }
        if !self.exclude_status.is_empty() {
            filter = filter.exclude_statuses(&self.exclude_status);
        }
        if !self.age.is_empty() {
            filter = filter.include_age_categories(&self.age);
        }
        if !self.exclude_age.is_empty() {
            filter = filter.exclude_age_categories(&self.exclude_age);
        }
        if !self.gender.is_empty() {
            filter = filter.include_genders(&self.gender);
        }
        if !self.exclude_gender.is_empty() {
            filter = filter.exclude_genders(&self.exclude_gender);
        }
        if !self.football_type.is_empty() {
            filter = filter.include_football_types(&self.football_type);
        }
        if !self.exclude_football_type.is_empty() {
            filter = filter.exclude_football_types(&self.exclude_football_type);
        }
        filter
    }
}

pub async fn run(args: &MatchesArgs, client: &FogisClient, format: &OutputFormat) -> Result<()> {
    let filter = args.to_filter().build()?;
    let matches = filter.fetch_filtered_matches(client).await?;

    eprintln!("{} matches ({})", matches.len(), filter);

    match format {
        OutputFormat::Table => print_matches_table(&matches),
        OutputFormat::Json => print_json(&matches),
    }

    Ok(())
}
