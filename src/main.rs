use std::env;
use std::path::Path;
use std::time::Duration;

use tokio::time::Instant;

use srvq::batch::query_all;
use srvq::config::Config;
use srvq::error::ConfigError;
use srvq::query::QueryOptions;
use srvq::render::{render_table, status_row};

/// Overall time budget for the whole batch.
const QUERY_BUDGET: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> Result<(), ConfigError> {
    env_logger::init();

    let path = env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    let config = Config::load(Path::new(&path))?;

    let hosts: Vec<String> = config.servers.iter().map(|s| s.addr.clone()).collect();
    let options = QueryOptions::new(Instant::now() + QUERY_BUDGET);
    let results = query_all(&hosts, options).await;

    let rows: Vec<Vec<String>> = hosts
        .iter()
        .zip(&results)
        .map(|(addr, status)| status_row(addr, status))
        .collect();
    print!("{}", render_table(&rows));

    Ok(())
}
