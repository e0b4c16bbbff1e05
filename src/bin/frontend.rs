//! Serves the single page that talks to the posts API from the browser.

use std::process;

use iron::headers::ContentType;
use iron::{status, Chain, Handler, Iron, IronResult, Request, Response};
use log::{error, info};
use logger::Logger;
use masterblog::config::Config;
use router::Router;

const INDEX_HTML: &str = include_str!("../../static/index.html");

struct IndexHandler;

impl Handler for IndexHandler {
    fn handle(&self, _: &mut Request) -> IronResult<Response> {
        let mut res = Response::with((status::Ok, INDEX_HTML));
        res.headers.set(ContentType::html());
        Ok(res)
    }
}

fn frontend_chain() -> Chain {
    let mut router = Router::new();
    router.get("/", IndexHandler, "index");
    Chain::new(router)
}

fn main() {
    env_logger::init();
    let addr = Config::from_env().frontend_addr;
    let (logger_before, logger_after) = Logger::new(None);

    let mut chain = frontend_chain();
    chain.link_before(logger_before);
    chain.link_after(logger_after);

    match Iron::new(chain).http(addr.as_str()) {
        Ok(_) => info!("frontend listening on http://{}", addr),
        Err(e) => {
            error!("could not bind {}: {}", addr, e);
            process::exit(1);
        }
    }
}
