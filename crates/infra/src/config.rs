use chrono::Duration;
use chrono_tz::{Tz, UTC};
use tracing::{info, warn};

const DEFAULT_PORT: usize = 5000;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Timezone used to lay out recurring events when a query does not
    /// specify one. Recurring events keep their wall-clock time in it.
    pub default_timezone: Tz,
    /// Maximum allowed duration for querying event instances.
    /// Calendar views ask for a padded month at most, so a limit of a year
    /// keeps clients from asking for decades of instances at once.
    pub event_instances_query_duration_limit: Duration,
    /// Highest `COUNT` accepted when storing a recurrence rule
    pub max_recurrence_count: u32,
}

impl Config {
    pub fn new() -> Self {
        let port = parse_port(std::env::var("PORT").ok());
        let default_timezone = parse_timezone(std::env::var("DEFAULT_TIMEZONE").ok());
        info!(
            "Configured to listen on port: {} with default timezone: {}",
            port, default_timezone
        );
        Self {
            port,
            default_timezone,
            event_instances_query_duration_limit: Duration::days(366),
            max_recurrence_count: 100,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_port(port: Option<String>) -> usize {
    match port {
        Some(port) => match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, DEFAULT_PORT
                );
                DEFAULT_PORT
            }
        },
        None => DEFAULT_PORT,
    }
}

fn parse_timezone(timezone: Option<String>) -> Tz {
    match timezone {
        Some(timezone) => match timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                warn!(
                    "The given DEFAULT_TIMEZONE: {} is not a known timezone, falling back to UTC.",
                    timezone
                );
                UTC
            }
        },
        None => UTC,
    }
}
