mod cli;
mod commands;
mod config;
mod error;
mod output;

use crate::{
    cli::{Args, Commands},
    commands::CommandExecutor,
    config::AppConfig,
    error::Result,
};
use clap::Parser;
#[cfg(feature = "colored-output")]
use colored::*;
use std::{process, time::Duration};
use tracing::{Level, debug, error};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};
use ytinfo_parser::extractor::ProxyConfig;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        error!("Application error: {}", e);
        #[cfg(feature = "colored-output")]
        {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
        #[cfg(not(feature = "colored-output"))]
        {
            eprintln!("Error: {}", e);
        }
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    let config = AppConfig::load(args.config.as_deref())?;
    debug!("Starting ytinfo with config: {:?}", config);

    let timeout = Duration::from_secs(args.timeout.unwrap_or(config.default_timeout));
    let retries = args.retries.unwrap_or(config.default_retries);
    let proxy = args.proxy.map(|url| ProxyConfig {
        url,
        username: args.proxy_username,
        password: args.proxy_password,
    });

    match args.command {
        Commands::Extract {
            url,
            output,
            output_file,
            extension,
            resolution,
            auto_select,
            all,
            age_restricted,
        } => {
            let output = output.unwrap_or_else(|| config.default_output_format.clone());
            let auto_select = auto_select || (config.auto_select && !all);
            let age_restricted = age_restricted || config.age_restricted;
            let executor = CommandExecutor::new(config, proxy)?;
            executor
                .extract_single(
                    &url,
                    output_file.as_deref(),
                    extension.as_deref(),
                    resolution.as_deref(),
                    auto_select,
                    all,
                    age_restricted,
                    output,
                    timeout,
                    retries,
                )
                .await?;
        }

        Commands::Batch {
            input,
            output_dir,
            output_format,
            max_concurrent,
            continue_on_error,
        } => {
            let output_dir = output_dir.or_else(|| config.default_output_dir.clone());
            let max_concurrent = max_concurrent.unwrap_or(config.max_concurrent);
            let age_restricted = config.age_restricted;
            let executor = CommandExecutor::new(config, proxy)?;
            executor
                .batch_process(
                    &input,
                    output_dir.as_deref(),
                    max_concurrent,
                    continue_on_error,
                    age_restricted,
                    output_format,
                    timeout,
                    retries,
                )
                .await?;
        }

        Commands::Formats { output } => {
            CommandExecutor::new(config, proxy)?.list_formats(&output)?;
        }

        Commands::Completions { shell } => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Args::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
        }

        Commands::Config { show, reset } => {
            if reset {
                AppConfig::reset(args.config.as_deref())?;
                println!("✓ Configuration reset to defaults");
            } else if show {
                println!("{}", config.show()?);
            } else {
                println!(
                    "Use --show to display current configuration or --reset to reset to defaults"
                );
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(verbose),
        )
        .with(filter)
        .init();
}
