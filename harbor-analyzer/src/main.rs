#![deny(warnings)]
#![deny(rust_2018_idioms)]

use harbor_analyzer::{
    error::{Result, error::SettingsSnafu},
    settings::Settings,
    startup::App,
};
use snafu::ResultExt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        error!("{e:?}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let settings = Settings::new().context(SettingsSnafu)?;
    info!(
        "analyzing '{}' in environment '{}'",
        settings.input_path.display(),
        settings.environment
    );

    let app = App::build(settings)?;

    let cancellation = app.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received interrupt, cancelling remaining pairs");
            cancellation.cancel();
        }
    });

    let report = app.run().await?;
    app.render(&report, std::io::stdout().lock())
}
