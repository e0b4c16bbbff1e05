use std::process;

use masterblog::config::Config;
use masterblog::database::Database;
use masterblog::handlers::api_chain;

use iron::Iron;
use log::{error, info};
use logger::Logger;

// RUST_LOG=logger=info,masterblog=debug masterblog > logs 2>&1 &
fn main() {
    env_logger::init();
    let config = Config::from_env();
    let (logger_before, logger_after) = Logger::new(None);

    let database = Database::seeded();
    let mut chain = api_chain(database);
    chain.link_before(logger_before); // Should be first!
    chain.link_after(logger_after); // Should be last!

    match Iron::new(chain).http(config.api_addr.as_str()) {
        Ok(_) => info!("posts API listening on http://{}", config.api_addr),
        Err(e) => {
            error!("could not bind {}: {}", config.api_addr, e);
            process::exit(1);
        }
    }
}
