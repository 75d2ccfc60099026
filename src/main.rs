use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payout_batch_sample::application::sample::PayoutBatchSample;
use payout_batch_sample::config::{ClientConfig, PayPalEnvironment};
use payout_batch_sample::domain::ports::PayoutClientBox;
use payout_batch_sample::infrastructure::paypal::PayPalHttpClient;
use std::io;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Creates a sample payout batch, then a deliberately invalid one.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// REST app client id
    #[arg(long, env = "PAYPAL_CLIENT_ID")]
    client_id: String,

    /// REST app client secret
    #[arg(long, env = "PAYPAL_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    #[arg(long, env = "PAYPAL_ENVIRONMENT", value_enum, default_value_t = PayPalEnvironment::Sandbox)]
    environment: PayPalEnvironment,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout is reserved for the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,payout_batch_sample=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::new(cli.client_id, cli.client_secret, cli.environment)
        .into_diagnostic()?
        .with_timeout(Duration::from_secs(cli.timeout_secs));
    tracing::info!(base_url = %config.base_url, "Using PayPal environment");

    let client: PayoutClientBox = Box::new(PayPalHttpClient::new(config).into_diagnostic()?);
    let mut sample = PayoutBatchSample::new(client, io::stdout());

    sample.create_payouts(true).await.into_diagnostic()?;
    // Simulate a validation failure to show how the reasons are reported
    sample.create_payouts_failure(true).await.into_diagnostic()?;

    Ok(())
}
