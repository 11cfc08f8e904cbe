use anyhow::Result;
use clap::Args;
use fogis_lib::{FogisClient, MatchResult};
use serde_json::Value;

use crate::output::{
    print_events_table, print_json, print_matches_table, print_people_table, print_results_table,
    OutputFormat,
};

#[derive(Args)]
pub struct MatchArgs {
    /// Match ID
    pub id: String,
}

pub async fn show_match(
    args: &MatchArgs,
    client: &FogisClient,
    format: &OutputFormat,
) -> Result<()> {
    let record = Value::Object(client.fetch_match(&args.id).await?);
    match format {
        OutputFormat::Table => print_matches_table(std::slice::from_ref(&record)),
        OutputFormat::Json => print_json(&record),
    }
    Ok(())
}

pub async fn players(args: &MatchArgs, client: &FogisClient, format: &OutputFormat) -> Result<()> {
    let players = Value::Object(client.fetch_match_players(&args.id).await?);
    match format {
        OutputFormat::Table => print_people_table(&players),
        OutputFormat::Json => print_json(&players),
    }
    Ok(())
}

pub async fn officials(
    args: &MatchArgs,
    client: &FogisClient,
    format: &OutputFormat,
) -> Result<()> {
    let officials = Value::Object(client.fetch_match_officials(&args.id).await?);
    match format {
        OutputFormat::Table => print_people_table(&officials),
        OutputFormat::Json => print_json(&officials),
    }
    Ok(())
}

pub async fn events(args: &MatchArgs, client: &FogisClient, format: &OutputFormat) -> Result<()> {
    let events = client.fetch_match_events(&args.id).await?;
    match format {
        OutputFormat::Table => print_events_table(&events),
        OutputFormat::Json => print_json(&events),
    }
    Ok(())
}

pub async fn result(args: &MatchArgs, client: &FogisClient, format: &OutputFormat) -> Result<()> {
    let results = match client.fetch_match_result(&args.id).await? {
        MatchResult::Single(record) => vec![Value::Object(record)],
        MatchResult::Many(items) => items,
    };
    match format {
        OutputFormat::Table => print_results_table(&results),
        OutputFormat::Json => print_json(&results),
    }
    Ok(())
}
