use clap::{Arg, ArgMatches, Command};

use crate::comm::config::ConfigError;
use crate::comm::{ConfigManager, ConfigSource};
use crate::conf::ChatConfig;

/// 构建命令行应用 / Build the command line
pub fn build_app() -> Command {
    Command::new("v-chat")
        .version(env!("CARGO_PKG_VERSION"))
        .about("最小化聊天室后端 / Minimal chat room backend")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("server")
                .about("启动聊天服务 / Start the chat server")
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("FILE")
                        .help("额外的配置文件，优先级高于 config/*.toml"),
                )
                .arg(
                    Arg::new("host")
                        .long("host")
                        .value_name("HOST")
                        .help("覆盖 server.host"),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .value_parser(clap::value_parser!(u16))
                        .help("覆盖 server.port"),
                ),
        )
        .subcommand(Command::new("version").about("显示版本信息"))
}

/// 按命令行参数加载配置 / Load configuration for the `server` subcommand
///
/// 命令行上的 `--host`/`--port` 优先于所有配置源
/// `--host`/`--port` on the command line win over every configuration source
pub fn load_config(matches: &ArgMatches) -> Result<(ConfigManager, ChatConfig), ConfigError> {
    let extra = matches
        .get_one::<String>("config")
        .map(|path| vec![ConfigSource::required_file(path.clone())])
        .unwrap_or_default();
    let cm = ConfigManager::with_sources(extra).map_err(|e| ConfigError::InitializationError {
        message: e.to_string(),
    })?;

    let mut config = ChatConfig::load(&cm)?;
    if let Some(host) = matches.get_one::<String>("host") {
        config.server.host = host.clone();
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }
    Ok((cm, config))
}

pub fn version_line() -> String {
    format!("v-chat {}", env!("CARGO_PKG_VERSION"))
}
