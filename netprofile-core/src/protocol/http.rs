//! HTTP request-line parser.
//!
//! Without TCP reassembly only the segment that starts a request can be
//! recognised. Responses and continuation segments decode to nothing.

use httparse::{Request, EMPTY_HEADER};

use crate::frame::HttpRequest;

/// Common HTTP ports.
pub const HTTP_PORTS: [u16; 4] = [80, 8080, 8000, 8888];

/// Maximum number of headers httparse may fill per request.
const MAX_HEADERS: usize = 64;

/// Check whether either port is a common HTTP port.
pub fn is_http_port(src_port: u16, dst_port: u16) -> bool {
    HTTP_PORTS.contains(&src_port) || HTTP_PORTS.contains(&dst_port)
}

/// Parse the request line at the start of a TCP payload.
///
/// Returns `None` when the payload does not start an HTTP request. A request
/// whose headers are cut off by the segment boundary still yields its method.
pub fn parse(data: &[u8]) -> Option<HttpRequest> {
    if data.is_empty() {
        return None;
    }

    let mut headers = [EMPTY_HEADER; MAX_HEADERS];
    let mut req = Request::new(&mut headers);

    match req.parse(data) {
        Ok(_) => {}
        // Header overflow still leaves the request line parsed.
        Err(httparse::Error::TooManyHeaders) => {}
        Err(_) => return None,
    }

    let method = req.method?;
    Some(HttpRequest {
        method: method.to_string(),
        path: req.path.map(str::to_string),
    })
}
