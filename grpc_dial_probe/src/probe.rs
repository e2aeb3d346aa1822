use std::fmt;

use anyhow::{Context, Result};
use grpc_dial_client::{build_options, connect};
use grpc_dial_common::{resolve, DialTarget};
use serde::Serialize;
use tonic_health::pb::health_check_response::ServingStatus;
use tonic_health::pb::health_client::HealthClient;
use tonic_health::pb::HealthCheckRequest;
use tracing::info;

use crate::args::Args;

#[derive(Debug, Serialize)]
pub struct Report {
    pub target: DialTarget,
    pub service: String,
    pub status: String,
}

impl Report {
    pub fn is_serving(&self) -> bool {
        self.status == ServingStatus::Serving.as_str_name()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let service: &str = if self.service.is_empty() {
            "<server>"
        } else {
            &self.service
        };
        write!(f, "{} {}: {}", self.target, service, self.status)
    }
}

pub async fn run(args: &Args) -> Result<Report> {
    let target = resolve(&args.remote).context("Failed to resolve remote")?;
    info!(resolved = %target, "dialing");

    let options = build_options(&target, args.extra_options(), args.access_token.as_deref());
    let connection = connect(&target.address, options)
        .await
        .with_context(|| format!("Failed to connect to {}", target.address))?;

    let response = HealthClient::new(connection)
        .check(HealthCheckRequest {
            service: args.service.clone(),
        })
        .await
        .context("Health check failed")?;
    let status = response.into_inner().status();
    info!(status = status.as_str_name(), "health check answered");

    Ok(Report {
        target,
        service: args.service.clone(),
        status: status.as_str_name().to_string(),
    })
}
