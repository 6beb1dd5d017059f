use std::fmt;
use std::io::{self, Read};

use smallvec::SmallVec;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    const ALL: [Method; 5] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Matches `"<METHOD> "` at the start of a request line.
    pub fn from_request_line(line: &[u8]) -> Option<Method> {
        Method::ALL.into_iter().find(|m| {
            let name = m.as_str().as_bytes();
            line.len() > name.len() && line.starts_with(name) && line[name.len()] == b' '
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("empty request")]
    Empty,
    #[error("unsupported method")]
    UnsupportedMethod,
    #[error("malformed request line")]
    MalformedRequestLine,
}

#[derive(Clone, Debug)]
pub struct Request {
    pub method: Method,
    /// Request target as sent, including any query string.
    pub target: String,
    pub path: String,
    /// Raw query string without the leading `?`; empty when absent.
    pub query: String,
    pub headers: SmallVec<[(String, String); 8]>,
    pub body: String,
}

impl Request {
    /// Parses a buffered request. Only the request line is mandatory; header
    /// parsing stops at the blank line or the end of the buffer.
    pub fn parse(buf: &[u8]) -> Result<Request, RequestError> {
        if buf.is_empty() {
            return Err(RequestError::Empty);
        }
        let line_end = buf
            .iter()
            .position(|&b| b == b'\n')
            .unwrap_or(buf.len());
        let line = buf[..line_end].strip_suffix(b"\r").unwrap_or(&buf[..line_end]);
        let method = Method::from_request_line(line).ok_or(RequestError::UnsupportedMethod)?;

        let first = method.as_str().len();
        let rest = &line[first + 1..];
        let second = rest
            .iter()
            .position(|&b| b == b' ')
            .ok_or(RequestError::MalformedRequestLine)?;
        if second == 0 {
            return Err(RequestError::MalformedRequestLine);
        }
        let target = String::from_utf8_lossy(&rest[..second]).into_owned();
        let (path, query) = match target.split_once('?') {
            Some((p, q)) => (p.to_string(), q.to_string()),
            None => (target.clone(), String::new()),
        };

        let header_end = find_header_end(buf);
        let head_stop = header_end.unwrap_or(buf.len());
        let mut headers = SmallVec::new();
        if line_end < head_stop {
            let head = String::from_utf8_lossy(&buf[line_end + 1..head_stop]);
            for line in head.split('\n') {
                let line = line.trim_end_matches('\r');
                if line.is_empty() {
                    break;
                }
                if let Some((k, v)) = line.split_once(':') {
                    headers.push((k.trim().to_string(), v.trim().to_string()));
                }
            }
        }

        let mut req = Request {
            method,
            target,
            path,
            query,
            headers,
            body: String::new(),
        };
        if let (Some(end), Some(len)) = (header_end, req.content_length()) {
            let start = end + 4;
            let stop = start.saturating_add(len).min(buf.len());
            if start < stop {
                req.body = String::from_utf8_lossy(&buf[start..stop]).into_owned();
            }
        }
        Ok(req)
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn cookie_header(&self) -> &str {
        self.header("Cookie").unwrap_or("")
    }

    pub fn content_length(&self) -> Option<usize> {
        self.header("Content-Length").and_then(|v| v.parse().ok())
    }
}

/// Offset of the `\r\n\r\n` that ends the header block.
pub fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn content_length_in(head: &[u8]) -> usize {
    let text = String::from_utf8_lossy(head);
    text.split("\r\n")
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse().ok())
        .unwrap_or(0)
}

/// Reads one request into a buffer of at most `limit` bytes: headers up to
/// the blank line (or EOF), then the body while `Content-Length` asks for
/// more than is already buffered.
pub fn read_request<R: Read>(stream: &mut R, limit: usize) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; limit];
    let mut len = 0;
    let mut scanned: usize = 0;
    while len < limit {
        let n = stream.read(&mut buf[len..])?;
        if n == 0 {
            break;
        }
        len += n;
        let from = scanned.saturating_sub(3);
        if let Some(pos) = find_header_end(&buf[from..len]) {
            let end = from + pos;
            let want = (end + 4).saturating_add(content_length_in(&buf[..end]));
            while len < want.min(limit) {
                let n = stream.read(&mut buf[len..])?;
                if n == 0 {
                    break;
                }
                len += n;
            }
            break;
        }
        scanned = len;
    }
    buf.truncate(len);
    Ok(buf)
}
