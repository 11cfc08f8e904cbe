use anyhow::{bail, Result};
use fogis_lib::FogisClient;

use crate::output::print_json;

/// Logs in and prints the session cookies, ready to be stored in `FOGIS_COOKIES`.
pub async fn login(client: &FogisClient) -> Result<()> {
    let token = client.login().await?;
    eprintln!("Logged in ({} cookies)", token.len());
    print_json(&token);
    Ok(())
}

pub async fn validate(client: &FogisClient) -> Result<()> {
    if !client.validate_session().await? {
        bail!("session is not valid, log in again");
    }
    println!("Session is valid");
    Ok(())
}
