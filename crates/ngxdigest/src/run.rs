//! Digest run: load config, scan projects, print, deliver

use anyhow::Result;
use ngxdigest_core::{DigestConfig, Error, ReportDate};
use ngxdigest_logs::DigestEngine;
use ngxdigest_notify::{DeliveryManager, DigestMessage};
use tracing::debug;

use crate::cli::Cli;
use crate::output::{
    is_json_mode, print_banner, print_digest_json, print_info, print_skipped, print_success,
    print_summary_table,
};

pub async fn execute(cli: Cli) -> Result<()> {
    if !is_json_mode() {
        print_banner();
    }

    let cwd = std::env::current_dir()?;
    let (mut config, config_path) = DigestConfig::discover(cli.config.as_deref(), &cwd)?;
    debug!("Loaded config from {}", config_path.display());

    config.apply_env_overrides();
    config.validate()?;

    if !config.is_valid_server(&cli.server) {
        return Err(Error::InvalidServer(format!(
            "'{}' (expected one of: {})",
            cli.server,
            config.servers.join(", ")
        ))
        .into());
    }

    let date = if cli.all_dates {
        None
    } else {
        Some(cli.date.unwrap_or_else(ReportDate::yesterday))
    };
    let date_label = date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "all dates".to_string());

    let engine = DigestEngine::from_config(&config, date.as_ref())?;
    let digest = engine.assemble(&config.project_order());

    for (project, reason) in digest.skipped() {
        print_skipped(project, reason);
    }

    if is_json_mode() {
        print_digest_json(&cli.server, &date_label, &digest);
    } else {
        println!("{}", digest.text);
        if cli.summary {
            print_summary_table(&digest.outcomes);
        }
    }

    if digest.is_empty() {
        print_info(&format!("Nothing to report for {}", date_label));
        return Ok(());
    }

    if cli.dry_run {
        print_info("Dry run: digest not delivered");
        return Ok(());
    }

    let manager = DeliveryManager::from_config(&config.delivery)?;
    if !manager.is_configured() {
        print_info("No delivery channel configured");
        return Ok(());
    }

    let message = DigestMessage::new(cli.server.as_str(), date_label.as_str(), digest.text.as_str());
    let delivered = manager.deliver(&message).await?;
    print_success(&format!(
        "Digest delivered via {} of {} channel(s): {}",
        delivered,
        manager.channel_names().len(),
        manager.channel_names().join(", ")
    ));

    Ok(())
}
