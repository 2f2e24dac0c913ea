//! Event supervisor entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Wire observability**: JSON `tracing` output, plus OTLP export when
//!    `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
//! 2. **Load configuration**: validate the environment before touching AWS.
//! 3. **Construct infrastructure**: load the shared AWS config once and build
//!    the DynamoDB store and SQS queue adapters from it.
//! 4. **Run once**: call [`supervisor::run_job`], print the response as JSON,
//!    and exit with status 0 on 200 or 1 on 500.
//!
//! Scheduling is the invoker's job; each process start performs exactly one run.

mod config;
mod telemetry;

use std::process::ExitCode;

use anyhow::Context;
use aws_config::BehaviorVersion;
use queue_sqs::SqsNotificationQueue;
use store_dynamodb::DynamoEventStore;
use tracing::info;

use crate::config::SupervisorConfig;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _telemetry = telemetry::init("event-supervisor")?;

    let config = SupervisorConfig::from_env().context("Invalid supervisor configuration")?;

    let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let store = DynamoEventStore::from_shared_config(
        &shared,
        config.table_name.as_str(),
        config.dynamo_endpoint_url.as_deref(),
    );
    let queue = SqsNotificationQueue::from_shared_config(&shared, config.sqs_endpoint_url.as_deref());

    info!(
        table = %store.table_name(),
        queue = %config.queue_url,
        "Starting supervisor run"
    );

    let response = supervisor::run_job(&store, &queue, &config.queue_url).await;
    println!("{}", serde_json::to_string(&response)?);

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
