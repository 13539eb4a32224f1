use clap::Parser;
use std::path::PathBuf;

use crate::service::ServiceAction;

#[derive(Parser, Debug)]
#[command(name = "mediaweb")]
#[command(version, about = "Web server for media files.")]
pub struct Cli {
    /// Which directory to serve (defaults to the current directory)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Where to serve, as host:port (defaults to 0.0.0.0:80)
    #[arg(long = "host-port", value_name = "HOST:PORT")]
    pub host_port: Option<String>,

    /// Which service action to perform; runs the server when omitted
    #[arg(long, value_enum)]
    pub action: Option<ServiceAction>,
}
