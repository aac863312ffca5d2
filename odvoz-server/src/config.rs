use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, ensure};
use clap::Parser;
use odvoz_core::{
    model::RetryPolicy,
    scheduler::DEFAULT_REFRESH_INTERVAL,
    scrape::{CategoryFallback, ScrapeSettings},
};
use odvoz_provider_simbio::ChromiumOptions;

/// Keeps the next waste collection dates for one Simbio address fresh and
/// serves them as a web page.
#[derive(Debug, Parser)]
#[command(name = "odvoz", version)]
pub(crate) struct Config {
    /// Address the HTTP server binds to.
    #[arg(long, env = "ODVOZ_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Directory served under /static (icons, stylesheets).
    #[arg(long, env = "ODVOZ_STATIC_DIR", default_value = "./static")]
    pub static_dir: PathBuf,

    /// Pause between the end of one refresh cycle and the start of the next.
    #[arg(
        long,
        env = "ODVOZ_REFRESH_INTERVAL_SECS",
        default_value_t = DEFAULT_REFRESH_INTERVAL.as_secs()
    )]
    pub refresh_interval_secs: u64,

    /// Attempts per scrape step before the cycle is abandoned.
    #[arg(long, env = "ODVOZ_RETRY_ATTEMPTS", default_value_t = 3)]
    pub retry_attempts: u32,

    /// Pause between two attempts of a scrape step.
    #[arg(long, env = "ODVOZ_RETRY_DELAY_SECS", default_value_t = 2)]
    pub retry_delay_secs: u64,

    /// Chrome/Chromium executable; auto-detected when omitted.
    #[arg(long, env = "ODVOZ_CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Show the browser window instead of running headless.
    #[arg(long)]
    pub headful: bool,

    /// Keep the last known dates for a category that cannot be read instead
    /// of blanking it.
    #[arg(long)]
    pub retain_on_extraction_failure: bool,

    /// Log debug output from the refresh pipeline.
    #[arg(long, short)]
    pub verbose: bool,
}

impl Config {
    /// Reject values the refresh pipeline cannot work with.
    pub(crate) fn validate(&self) -> Result<()> {
        ensure!(
            self.refresh_interval_secs > 0,
            "refresh interval must be at least one second"
        );
        ensure!(self.retry_attempts > 0, "retry attempts must be at least 1");
        Ok(())
    }

    pub(crate) fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub(crate) fn scrape_settings(&self) -> ScrapeSettings {
        let fallback = if self.retain_on_extraction_failure {
            CategoryFallback::RetainPrevious
        } else {
            CategoryFallback::Blank
        };

        ScrapeSettings {
            retry: RetryPolicy::new(
                self.retry_attempts,
                Duration::from_secs(self.retry_delay_secs),
            ),
            fallback,
            ..ScrapeSettings::default()
        }
    }

    pub(crate) fn chromium_options(&self) -> ChromiumOptions {
        ChromiumOptions {
            executable: self.chrome_path.clone(),
            headless: !self.headful,
        }
    }
}
