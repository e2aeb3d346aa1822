use std::time::Duration;

use clap::Parser;
use grpc_dial_client::DialOption;

#[derive(Parser, Debug)]
#[command(name = "grpc-dial-probe", version, about = "Dial a gRPC server and check its health")]
pub struct Args {
    /// unix:<path>, https://host[:port], http://host[:port] or host:port
    #[arg(env = "GRPC_DIAL_REMOTE")]
    pub remote: String,

    /// Sent as `access` metadata on every call
    #[arg(long, env = "GRPC_DIAL_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Service to check; empty means the whole server
    #[arg(long, default_value = "")]
    pub service: String,

    /// Seconds to wait for the connection
    #[arg(long, default_value_t = 5)]
    pub connect_timeout: u64,

    /// Per-request deadline in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[arg(long)]
    pub user_agent: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    pub fn extra_options(&self) -> Vec<DialOption> {
        let mut opts = vec![DialOption::ConnectTimeout(Duration::from_secs(
            self.connect_timeout,
        ))];
        if let Some(secs) = self.timeout {
            opts.push(DialOption::Timeout(Duration::from_secs(secs)));
        }
        if let Some(ua) = &self.user_agent {
            opts.push(DialOption::UserAgent(ua.clone()));
        }
        opts
    }
}
