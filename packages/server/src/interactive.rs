//! Interactive server launcher.
//!
//! Asks which configuration file to use and where to listen, checks both
//! before anything is started, then hands over to [`super::run_server`].

use std::path::Path;

use dialoguer::{Confirm, Input};
use seizure_map_source::config::{CONFIG_ENV_VAR, DashboardConfig};

/// Prompts for the configuration file, bind address and port, then starts
/// the server.
///
/// An empty configuration path keeps the embedded default. A path that
/// does not parse is reported and the prompt is repeated.
///
/// # Errors
///
/// Returns an `std::io::Result` error if a prompt fails or the server
/// fails to start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("Seizure Dashboard Server");
    println!();

    let config_path = prompt_config_path()?;

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default("127.0.0.1".to_string())
        .interact_text()
        .map_err(std::io::Error::other)?;

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(8080)
        .validate_with(|port: &u16| {
            if *port == 0 {
                Err("port must be between 1 and 65535")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(std::io::Error::other)?;

    let source = config_path.as_deref().unwrap_or("embedded configuration");
    if !Confirm::new()
        .with_prompt(format!("Serve {source} on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .map_err(std::io::Error::other)?
    {
        println!("Cancelled.");
        return Ok(());
    }

    // SAFETY: no other threads exist yet; the server reads these once at
    // startup.
    unsafe {
        if let Some(path) = &config_path {
            std::env::set_var(CONFIG_ENV_VAR, path);
        }
        std::env::set_var("BIND_ADDR", &bind_addr);
        std::env::set_var("PORT", port.to_string());
    }

    super::run_server().await
}

/// Asks for a configuration file until one parses or the answer is blank.
fn prompt_config_path() -> std::io::Result<Option<String>> {
    let current = std::env::var(CONFIG_ENV_VAR).unwrap_or_default();

    loop {
        let path: String = Input::new()
            .with_prompt("Configuration file (blank for embedded)")
            .default(current.clone())
            .allow_empty(true)
            .interact_text()
            .map_err(std::io::Error::other)?;

        let path = path.trim();
        if path.is_empty() {
            return Ok(None);
        }

        match DashboardConfig::from_path(Path::new(path)) {
            Ok(config) => {
                println!("Records: {}", config.records.source.describe());
                return Ok(Some(path.to_string()));
            }
            Err(e) => println!("Cannot use {path}: {e}"),
        }
    }
}
