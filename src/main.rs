use clap::ArgMatches;
use tracing::info;

use v_chat::cli::{build_app, load_config, version_line};
use v_chat::comm::tracing::init_tracing;
use v_chat::server::ChatApp;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let matches: ArgMatches = build_app().get_matches();

    match matches.subcommand() {
        Some(("server", sub_matches)) => handle_server_command(sub_matches).await?,
        Some(("version", _)) => println!("{}", version_line()),
        // subcommand_required(true) 保证不会到达这里
        _ => unreachable!("subcommand_required(true) rejects other input"),
    }
    Ok(())
}

async fn handle_server_command(matches: &ArgMatches) -> anyhow::Result<()> {
    let (config_manager, config) = load_config(matches)?;
    init_tracing(&config.logging)?;

    config_manager.log_sources_info();
    info!("🚀 {}", version_line());
    info!("⚙️ {}", config.summary());

    ChatApp::new(config).run().await
}
