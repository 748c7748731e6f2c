use anyhow::Result;
use fms_client::FmsClient;
use fms_core::config::Config;

use crate::output::print_json;

/// Log in once and report whether FMS issued usable credentials.
pub fn run(config: Config, json: bool) -> Result<()> {
    let base_url = config.base_url.clone();
    let user = config.account.user.clone();
    let client = FmsClient::new(config)?;

    let rt = tokio::runtime::Runtime::new()?;
    let creds = rt.block_on(client.acquire_credentials(true))?;

    if json {
        print_json(&serde_json::json!({
            "ok": true,
            "baseUrl": base_url,
            "user": user,
            "secondaryToken": creds.secondary_token.is_some(),
            "obtainedAt": creds.obtained_at,
        }))?;
    } else {
        println!("Logged in to {base_url} as {user}");
        if creds.secondary_token.is_none() {
            println!("note: FMS did not issue a third-party token; fms-token is used for Authorization");
        }
    }
    Ok(())
}
