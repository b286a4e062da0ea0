use std::io::Cursor;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use log::{debug, error};
use netdeck::NetworkId;

use crate::handlers;
use crate::state::SharedState;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn header(name: &str, value: &str) -> Option<Header> {
    let header = Header::from_bytes(name.as_bytes(), value.as_bytes()).ok();
    if header.is_none() {
        error!("invalid response header {name}: {value:?}");
    }
    header
}

fn response(status: u16, content_type: &str, body: Vec<u8>, extra: Vec<Header>) -> Response<Cursor<Vec<u8>>> {
    let len = body.len();
    let mut headers: Vec<Header> = header("Content-Type", content_type).into_iter().collect();
    headers.extend(extra);
    Response::new(StatusCode(status), headers, Cursor::new(body), Some(len), None)
}

pub fn html_response(body: String) -> Response<Cursor<Vec<u8>>> {
    response(200, "text/html; charset=utf-8", body.into_bytes(), Vec::new())
}

pub fn redirect(location: &str) -> Response<Cursor<Vec<u8>>> {
    response(303, "text/plain", Vec::new(), header("Location", location).into_iter().collect())
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    response(404, "text/plain", b"404 Not Found".to_vec(), Vec::new())
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// A studio route with its path parameters parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Route {
    List,
    Create,
    Delete(NetworkId),
    Details(NetworkId),
    Predict(NetworkId),
    NotFound,
}

fn route(method: &Method, path: &str) -> Route {
    let path = path.trim_end_matches('/');
    match (method, path) {
        (Method::Get, "") => return Route::List,
        (Method::Post, "/networks") => return Route::Create,
        _ => {}
    }

    let Some(rest) = path.strip_prefix("/networks/") else { return Route::NotFound };
    let mut segments = rest.splitn(2, '/');
    let Some(id) = segments.next().and_then(|s| s.parse::<NetworkId>().ok()) else {
        return Route::NotFound;
    };
    match (method, segments.next()) {
        (Method::Get, None)              => Route::Details(id),
        (Method::Post, Some("delete"))   => Route::Delete(id),
        (Method::Post, Some("predict"))  => Route::Predict(id),
        _ => Route::NotFound,
    }
}

/// Dispatches incoming requests to the appropriate handler.
pub fn dispatch(mut request: Request, state: SharedState) {
    let method = request.method().clone();
    let url    = request.url().to_owned();

    let (path, query) = match url.split_once('?') {
        Some((p, q)) => (p.to_owned(), q.to_owned()),
        None         => (url.clone(), String::new()),
    };
    debug!("{} {}", method, url);

    let response = match route(&method, &path) {
        Route::List        => handlers::networks::handle_list(&query, state),
        Route::Create      => handlers::networks::handle_create(&mut request, state),
        Route::Delete(id)  => handlers::networks::handle_delete(id, state),
        Route::Details(id) => handlers::details::handle_get(id, state),
        Route::Predict(id) => handlers::details::handle_predict(id, &mut request, state),
        Route::NotFound    => not_found(),
    };

    if let Err(e) = request.respond(response) {
        debug!("client went away before the response: {e}");
    }
}
