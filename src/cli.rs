use clap::Parser;
use std::path::PathBuf;

/// Schema-driven dynamic form engine with a demo REST server
#[derive(Parser, Debug, Clone)]
#[command(name = "proteus", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "PROTEUS_CONFIG", default_value = "proteus.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "PROTEUS_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "PROTEUS_PORT")]
    pub port: Option<u16>,
}
