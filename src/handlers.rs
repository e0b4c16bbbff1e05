use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::sync::{Arc, Mutex};

use iron::headers::{AccessControlAllowMethods, AccessControlAllowOrigin, ContentType};
use iron::method::Method;
use iron::status::{self, Status};
use iron::{AfterMiddleware, Chain, Handler, IronError, IronResult, Plugin, Request, Response, Set};
use log::debug;
use router::Router;
use rustc_serialize::json::{Json, ToJson};
use urlencoded::UrlEncodedQuery;

use crate::database::PostStore;
use crate::error::{Error, Result};
use crate::model::PostFields;

/// Match a `Result` into its inner value or
/// return `500 Internal Server Error`.
macro_rules! try_handler {
    ( $e:expr ) => {
        match $e {
            Ok(x) => x,
            Err(e) => return Ok(Response::with((status::InternalServerError, e.to_string())))
        }
    }
}

/// Lock a `Mutex`. This macro simply calls `m.lock().unwrap()`,
/// because the thread should panic if the lock can not be obtained:
/// we cannot recover from that.
macro_rules! lock {
    ( $e:expr ) => { $e.lock().unwrap() }
}

/// Get the value of a parameter in the URI.
/// If the parameter was absent, return `400 Bad Request`.
/// If we could not obtain the parameter list, return `500 Internal Server Error`.
macro_rules! get_http_param {
    ( $r:expr, $e:expr ) => {
        match $r.extensions.get::<Router>() {
            Some(router) => {
                match router.find($e) {
                    Some(val) => val,
                    None => return Ok(Response::with(status::BadRequest)),
                }
            }
            None => return Ok(Response::with(status::InternalServerError)),
        }
    }
}

/// Get the `:id` parameter as a post id.
/// Ids that are not numbers cannot name a post: `404 Not Found`.
macro_rules! get_post_id {
    ( $r:expr ) => {{
        let raw = get_http_param!($r, "id");
        match raw.parse::<u64>() {
            Ok(id) => id,
            Err(_) => return Ok(error_response(&Error::NotFound(raw.to_string()))),
        }
    }}
}

/// Parse the request body into post fields or answer `400 Bad Request`.
macro_rules! get_post_fields {
    ( $r:expr ) => {{
        let mut payload = String::new();
        try_handler!($r.body.read_to_string(&mut payload));
        match PostFields::from_json_str(&payload) {
            Ok(fields) => fields,
            Err(e) => return Ok(error_response(&e)),
        }
    }}
}

pub type SharedStore = Arc<Mutex<dyn PostStore>>;

fn json_response<T: ToJson + ?Sized>(status: Status, value: &T) -> Response {
    Response::with((status, value.to_json().to_string()))
}

fn error_response(error: &Error) -> Response {
    debug!("rejected request: {:?}", error);
    let status = if error.is_not_found() {
        status::NotFound
    } else {
        status::BadRequest
    };
    json_response(status, error)
}

fn respond<T: ToJson>(status: Status, result: Result<T>) -> IronResult<Response> {
    match result {
        Ok(value) => Ok(json_response(status, &value)),
        Err(e) => Ok(error_response(&e)),
    }
}

/// Decoded query string. A missing or undecodable query is treated as empty.
fn query_params(req: &mut Request) -> HashMap<String, Vec<String>> {
    req.get::<UrlEncodedQuery>().unwrap_or_default()
}

fn query_param<'a>(params: &'a HashMap<String, Vec<String>>, name: &str) -> Option<&'a str> {
    params.get(name).and_then(|values| values.first()).map(|value| value.as_str())
}

pub struct Handlers {
    pub list: ListPostsHandler,
    pub create: CreatePostHandler,
    pub update: UpdatePostHandler,
    pub delete: DeletePostHandler,
    pub search: SearchPostsHandler,
}

impl Handlers {
    pub fn new<S: PostStore + 'static>(store: S) -> Handlers {
        let store: SharedStore = Arc::new(Mutex::new(store));
        Handlers {
            list: ListPostsHandler::new(store.clone()),
            create: CreatePostHandler::new(store.clone()),
            update: UpdatePostHandler::new(store.clone()),
            delete: DeletePostHandler::new(store.clone()),
            search: SearchPostsHandler::new(store),
        }
    }
}

pub struct ListPostsHandler {
    store: SharedStore,
}

impl ListPostsHandler {
    fn new(store: SharedStore) -> ListPostsHandler {
        ListPostsHandler { store: store }
    }
}

impl Handler for ListPostsHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let params = query_params(req);
        let sort = query_param(&params, "sort");
        let direction = query_param(&params, "direction");

        respond(status::Ok, lock!(self.store).list(sort, direction))
    }
}

pub struct CreatePostHandler {
    store: SharedStore,
}

impl CreatePostHandler {
    fn new(store: SharedStore) -> CreatePostHandler {
        CreatePostHandler { store: store }
    }
}

impl Handler for CreatePostHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let fields = get_post_fields!(req);

        respond(status::Created, lock!(self.store).create(fields.title(), fields.content()))
    }
}

pub struct UpdatePostHandler {
    store: SharedStore,
}

impl UpdatePostHandler {
    fn new(store: SharedStore) -> UpdatePostHandler {
        UpdatePostHandler { store: store }
    }
}

impl Handler for UpdatePostHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let id = get_post_id!(req);
        let fields = get_post_fields!(req);

        respond(status::Ok, lock!(self.store).update(id, fields.title(), fields.content()))
    }
}

pub struct DeletePostHandler {
    store: SharedStore,
}

impl DeletePostHandler {
    fn new(store: SharedStore) -> DeletePostHandler {
        DeletePostHandler { store: store }
    }
}

impl Handler for DeletePostHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let id = get_post_id!(req);

        respond(status::Ok, lock!(self.store).delete(id))
    }
}

pub struct SearchPostsHandler {
    store: SharedStore,
}

impl SearchPostsHandler {
    fn new(store: SharedStore) -> SearchPostsHandler {
        SearchPostsHandler { store: store }
    }
}

impl Handler for SearchPostsHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let params = query_params(req);
        let title = query_param(&params, "title");
        let content = query_param(&params, "content");

        let posts = lock!(self.store).search(title, content);
        Ok(json_response(status::Ok, &posts))
    }
}

/// Answers CORS preflight requests; the headers come from `CorsAfterMiddleware`.
pub struct PreflightHandler;

impl Handler for PreflightHandler {
    fn handle(&self, _: &mut Request) -> IronResult<Response> {
        Ok(Response::with(status::Ok))
    }
}

/// Marks every response as JSON. Errors raised outside the handlers,
/// such as the router's `NoRoute`, get an `{"error": ...}` body too.
pub struct JsonAfterMiddleware;

impl AfterMiddleware for JsonAfterMiddleware {
    fn after(&self, _: &mut Request, mut res: Response) -> IronResult<Response> {
        res.headers.set(ContentType::json());
        Ok(res)
    }

    fn catch(&self, _: &mut Request, mut err: IronError) -> IronResult<Response> {
        if err.response.body.is_none() {
            let status = err.response.status.unwrap_or(status::InternalServerError);
            let message = status.canonical_reason().unwrap_or("Request failed.");
            err.response.set_mut(error_body(message));
        }
        err.response.headers.set(ContentType::json());
        Err(err)
    }
}

fn error_body(message: &str) -> String {
    let mut object = BTreeMap::new();
    object.insert("error".to_string(), message.to_json());
    Json::Object(object).to_string()
}

/// Lets the frontend, served from another origin, call the API.
pub struct CorsAfterMiddleware;

impl CorsAfterMiddleware {
    fn allow(res: &mut Response) {
        res.headers.set(AccessControlAllowOrigin::Any);
        res.headers.set(AccessControlAllowMethods(vec![
            Method::Get,
            Method::Post,
            Method::Put,
            Method::Delete,
            Method::Options,
        ]));
        res.headers.set_raw("Access-Control-Allow-Headers", vec![b"Content-Type".to_vec()]);
    }
}

impl AfterMiddleware for CorsAfterMiddleware {
    fn after(&self, _: &mut Request, mut res: Response) -> IronResult<Response> {
        CorsAfterMiddleware::allow(&mut res);
        Ok(res)
    }

    fn catch(&self, _: &mut Request, mut err: IronError) -> IronResult<Response> {
        CorsAfterMiddleware::allow(&mut err.response);
        Err(err)
    }
}

/// Routes and response middleware of the posts API, without request logging.
pub fn api_chain<S: PostStore + 'static>(store: S) -> Chain {
    let handlers = Handlers::new(store);

    let mut router = Router::new();
    router.get("/api/posts", handlers.list, "list_posts");
    router.post("/api/posts", handlers.create, "create_post");
    router.get("/api/posts/search", handlers.search, "search_posts");
    router.put("/api/posts/:id", handlers.update, "update_post");
    router.delete("/api/posts/:id", handlers.delete, "delete_post");
    router.options("/api/posts", PreflightHandler, "preflight_posts");
    router.options("/api/posts/:id", PreflightHandler, "preflight_post");

    let mut chain = Chain::new(router);
    chain.link_after(JsonAfterMiddleware);
    chain.link_after(CorsAfterMiddleware);
    chain
}
