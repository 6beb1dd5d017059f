use snask_core::{Value, stringify};

use crate::errors::messages;

pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_JSON: &str = "application/json";

pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: String,
    pub body: String,
    pub location: Option<String>,
    /// One raw header line, written as given.
    pub extra_header: Option<String>,
    pub set_cookie: Option<String>,
}

impl Response {
    pub fn new(status: u16, content_type: &str, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: content_type.to_string(),
            body: body.into(),
            location: None,
            extra_header: None,
            set_cookie: None,
        }
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self::new(200, TEXT_PLAIN, body)
    }

    pub fn json(body: impl Into<String>) -> Self {
        Self::new(200, APPLICATION_JSON, body)
    }

    pub fn not_found() -> Self {
        Self::new(404, TEXT_PLAIN, messages::NOT_FOUND)
    }

    pub fn bad_request() -> Self {
        Self::new(400, TEXT_PLAIN, messages::BAD_REQUEST)
    }

    /// Turns a resolved route value into a response.
    ///
    /// Objects are inspected for `redirect`, then `body`, then `json`, and
    /// otherwise serialized whole; `status`, `content_type`, `header` and
    /// `cookie` apply to every branch. Strings are sent as plain text and
    /// anything else as compact JSON.
    pub fn from_route_value(value: &Value) -> Response {
        let obj = match value {
            Value::String(s) => return Response::text(s.as_str()),
            Value::Object(o) => o,
            other => return Response::json(stringify(other)),
        };

        let (redirect, body, json, status, content_type, header, cookie) = {
            let o = obj.read();
            (
                o.get("redirect").cloned(),
                o.get("body").cloned(),
                o.get("json").cloned(),
                o.get("status").and_then(Value::as_f64),
                o.get("content_type").and_then(|v| v.as_str().map(str::to_string)),
                o.get("header").and_then(|v| v.as_str().map(str::to_string)),
                o.get("cookie").and_then(|v| v.as_str().map(str::to_string)),
            )
        };

        let mut resp = if let Some(target) = redirect {
            let mut r = Response::new(302, TEXT_PLAIN, "");
            r.location = Some(target.to_string());
            r
        } else if let Some(body) = body {
            Response::text(body.to_string())
        } else if let Some(json) = json {
            Response::json(stringify(&json))
        } else {
            Response::json(stringify(value))
        };

        if let Some(code) = status.filter(|n| (100.0..1000.0).contains(n)) {
            resp.status = code as u16;
        }
        if let Some(ct) = content_type {
            resp.content_type = ct;
        }
        resp.extra_header = header.filter(|h| !h.is_empty());
        resp.set_cookie = cookie.filter(|c| !c.is_empty());
        resp
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut len = itoa::Buffer::new();
        let mut out = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n",
            self.status,
            reason_phrase(self.status),
            self.content_type,
            len.format(self.body.len()),
        );
        if let Some(loc) = &self.location {
            out.push_str("Location: ");
            out.push_str(loc);
            out.push_str("\r\n");
        }
        if let Some(h) = &self.extra_header {
            out.push_str(h.trim_end_matches(['\r', '\n']));
            out.push_str("\r\n");
        }
        if let Some(c) = &self.set_cookie {
            out.push_str("Set-Cookie: ");
            out.push_str(c);
            out.push_str("\r\n");
        }
        out.push_str("Connection: close\r\n\r\n");
        out.push_str(&self.body);
        out.into_bytes()
    }
}
