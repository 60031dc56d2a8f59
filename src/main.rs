use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use shortkeep::config::args::{Cli, Command, ConfigCommand};
use shortkeep::config::{StaticConfig, get_config, init_config_from};
use shortkeep::errors::ShortkeepError;
use shortkeep::runtime::modes::run_server;
use shortkeep::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config_from(cli.config.as_deref());

    match cli.command() {
        Command::Config(ConfigCommand::Generate { output }) => generate_config(output.as_deref()),
        Command::Serve => {
            let config = get_config();
            // guard 必须存活到进程退出
            let _guard = init_logging(&config.logging)?;
            run_server().await.inspect_err(report_startup_error)
        }
    }
}

fn report_startup_error(err: &anyhow::Error) {
    if let Some(e) = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<ShortkeepError>())
    {
        eprintln!("{}", e.format_colored());
    }
}

fn generate_config(output: Option<&str>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            StaticConfig::default()
                .save_to_file(path)
                .with_context(|| format!("Failed to write {}", path))?;
            println!("{} {}", "Sample configuration written to".green(), path.bold());
        }
        None => print!("{}", StaticConfig::generate_sample_config()),
    }
    Ok(())
}
