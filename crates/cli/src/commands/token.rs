//! Token inspection command

use anyhow::Result;
use densify_client::Client;
use serde_json::json;

use crate::output::{print_success, print_warning, OutputFormat};

/// Print the current bearer token and its expiry state.
pub fn show_token(client: &Client, format: OutputFormat) -> Result<()> {
    let expired = client.is_token_expired();

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "apiToken": client.token(),
                    "expired": expired,
                }))?
            );
        }
        _ => {
            if expired {
                print_warning("Token has expired; reconnect to refresh it");
            } else {
                print_success("Token is valid");
            }
            println!("{}", client.token());
        }
    }

    Ok(())
}
