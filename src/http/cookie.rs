//! `Cookie` / `Set-Cookie` header parsing and serialization.
//!
//! Request-side, [`parse_cookie_header`] splits a `Cookie:` header into its
//! `key=value` pairs with no percent-decoding (per
//! [RFC 6265 §4.2](https://datatracker.ietf.org/doc/html/rfc6265#section-4.2), `+`
//! is a literal character here, unlike in a query string). Response-side, [`Cookie`]
//! is a small builder that writes a complete `Set-Cookie` value via [`WriteBuffer`].

use crate::WriteBuffer;
use memchr::memchr;
use std::time::SystemTime;

/// A `Set-Cookie` response header value.
///
/// Build with [`Cookie::new`] and the attribute setters, then pass it directly
/// to [`Response::header`](crate::Response::header):
///
/// ```
/// # ironhttpd::run_test(|_, resp| {
/// use ironhttpd::{Cookie, StatusCode};
/// use std::time::{SystemTime, Duration};
///
/// resp.status(StatusCode::Ok)
///     .header("set-cookie", Cookie::new("session", "abc123")
///         .path("/")
///         .http_only(true)
///         .secure(true))
///     .body("")
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct Cookie<'a> {
    key: &'a str,
    value: &'a str,
    expire: Option<SystemTime>,
    domain: Option<&'a str>,
    path: Option<&'a str>,
    http_only: bool,
    secure: bool,
}

impl<'a> Cookie<'a> {
    /// Creates a cookie with the given name and value, no attributes set.
    #[inline]
    pub const fn new(key: &'a str, value: &'a str) -> Self {
        Self {
            key,
            value,
            expire: None,
            domain: None,
            path: None,
            http_only: false,
            secure: false,
        }
    }

    /// Sets the `expires` attribute, serialized in RFC 1123 (IMF-fixdate) form.
    #[inline]
    pub fn expire(mut self, expire: SystemTime) -> Self {
        self.expire = Some(expire);
        self
    }

    /// Sets the `domain` attribute.
    #[inline]
    pub fn domain(mut self, domain: &'a str) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Sets the `path` attribute.
    #[inline]
    pub fn path(mut self, path: &'a str) -> Self {
        self.path = Some(path);
        self
    }

    /// Sets or clears the `HttpOnly` flag.
    #[inline]
    pub const fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Sets or clears the `secure` flag.
    #[inline]
    pub const fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }
}

impl WriteBuffer for Cookie<'_> {
    // Attribute order matches the historical Netscape cookie_spec layout:
    // key=value; expires=...; domain=...; path=...; HttpOnly; secure
    fn write_to(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(self.key.as_bytes());
        buffer.push(b'=');
        buffer.extend_from_slice(self.value.as_bytes());

        if let Some(expire) = self.expire {
            buffer.extend_from_slice(b"; expires=");
            buffer.extend_from_slice(httpdate::fmt_http_date(expire).as_bytes());
        }
        if let Some(domain) = self.domain {
            buffer.extend_from_slice(b"; domain=");
            buffer.extend_from_slice(domain.as_bytes());
        }
        if let Some(path) = self.path {
            buffer.extend_from_slice(b"; path=");
            buffer.extend_from_slice(path.as_bytes());
        }
        if self.http_only {
            buffer.extend_from_slice(b"; HttpOnly");
        }
        if self.secure {
            buffer.extend_from_slice(b"; secure");
        }
    }
}

/// Parses a request `Cookie` header into `(key, value)` pairs.
///
/// Pairs are split on `;`, surrounding whitespace is trimmed, and values are
/// returned exactly as sent: no percent-decoding, `+` stays `+`. A segment with
/// no `=` yields an empty value, matching [`Query::parse_into`](crate::query::Query).
///
/// # Examples
/// ```
/// use ironhttpd::cookie::parse_cookie_header;
///
/// let pairs: Vec<_> = parse_cookie_header(b"session=abc123; theme=dark").collect();
/// assert_eq!(pairs, vec![(&b"session"[..], &b"abc123"[..]), (b"theme", b"dark")]);
/// ```
#[inline]
pub fn parse_cookie_header(header: &[u8]) -> impl Iterator<Item = (&[u8], &[u8])> {
    header.split(|&b| b == b';').filter_map(|segment| {
        let segment = trim(segment);
        if segment.is_empty() {
            return None;
        }

        Some(match memchr(b'=', segment) {
            Some(pos) => (trim(&segment[..pos]), trim(&segment[pos + 1..])),
            None => (segment, &b""[..]),
        })
    })
}

/// A parsed `Set-Cookie` header, as found on a response (e.g. when relaying
/// cookies from an upstream service).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSetCookie<'a> {
    pub key: &'a [u8],
    pub value: &'a [u8],
    pub domain: Option<&'a [u8]>,
    pub path: Option<&'a [u8]>,
    pub http_only: bool,
    pub secure: bool,
}

/// Parses a raw `Set-Cookie` header value.
///
/// The first `;`-delimited segment is the `key=value` pair; every subsequent
/// segment is an attribute. Unknown attributes (including `expires`, which this
/// crate does not round-trip back into a [`SystemTime`]) are ignored rather than
/// rejected, since new attributes are added to the cookie spec over time.
///
/// # Examples
/// ```
/// use ironhttpd::cookie::parse_set_cookie;
///
/// let cookie = parse_set_cookie(b"session=abc123; Path=/; HttpOnly; Secure").unwrap();
/// assert_eq!(cookie.key, b"session");
/// assert_eq!(cookie.value, b"abc123");
/// assert_eq!(cookie.path, Some(&b"/"[..]));
/// assert!(cookie.http_only);
/// assert!(cookie.secure);
/// ```
pub fn parse_set_cookie(header: &[u8]) -> Option<ParsedSetCookie<'_>> {
    let mut segments = header.split(|&b| b == b';').map(trim);

    let first = segments.next()?;
    let (key, value) = match memchr(b'=', first) {
        Some(pos) => (trim(&first[..pos]), unquote(trim(&first[pos + 1..]))),
        None => return None,
    };
    if key.is_empty() {
        return None;
    }

    let mut cookie = ParsedSetCookie {
        key,
        value,
        domain: None,
        path: None,
        http_only: false,
        secure: false,
    };

    for segment in segments {
        if segment.is_empty() {
            continue;
        }

        match memchr(b'=', segment) {
            Some(pos) => {
                let name = trim(&segment[..pos]);
                let value = unquote(trim(&segment[pos + 1..]));

                if name.eq_ignore_ascii_case(b"domain") {
                    cookie.domain = Some(value);
                } else if name.eq_ignore_ascii_case(b"path") {
                    cookie.path = Some(value);
                }
            }
            None => {
                if segment.eq_ignore_ascii_case(b"httponly") {
                    cookie.http_only = true;
                } else if segment.eq_ignore_ascii_case(b"secure") {
                    cookie.secure = true;
                }
            }
        }
    }

    Some(cookie)
}

#[inline]
fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|&b| b != b' ' && b != b'\t')
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|&b| b != b' ' && b != b'\t')
        .map_or(start, |pos| pos + 1);

    &bytes[start..end]
}

#[inline]
fn unquote(bytes: &[u8]) -> &[u8] {
    match bytes {
        [b'"', middle @ .., b'"'] => middle,
        _ => bytes,
    }
}

#[cfg(test)]
mod write_tests {
    use super::*;
    use crate::tools::*;
    use std::time::Duration;

    #[test]
    fn minimal() {
        let mut buffer = Vec::new();
        Cookie::new("session", "abc123").write_to(&mut buffer);
        assert_eq!(str_op(&buffer), "session=abc123");
    }

    #[test]
    fn full() {
        let mut buffer = Vec::new();
        Cookie::new("session", "abc123")
            .expire(SystemTime::UNIX_EPOCH + Duration::from_secs(0))
            .domain("example.com")
            .path("/")
            .http_only(true)
            .secure(true)
            .write_to(&mut buffer);

        assert_eq!(
            str_op(&buffer),
            "session=abc123; expires=Thu, 01 Jan 1970 00:00:00 GMT; \
             domain=example.com; path=/; HttpOnly; secure"
        );
    }
}

#[cfg(test)]
mod parse_cookie_header_tests {
    use super::*;
    use crate::tools::*;

    #[test]
    fn basic() {
        let pairs: Vec<_> = parse_cookie_header(b"a=1; b=2")
            .map(str_2)
            .collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn no_value_and_plus_is_literal() {
        let pairs: Vec<_> = parse_cookie_header(b"flag; key=a+b")
            .map(str_2)
            .collect();
        assert_eq!(pairs, vec![("flag", ""), ("key", "a+b")]);
    }

    #[test]
    fn empty_segments_skipped() {
        let pairs: Vec<_> = parse_cookie_header(b"a=1;; b=2").map(str_2).collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "2")]);
    }
}

#[cfg(test)]
mod parse_set_cookie_tests {
    use super::*;
    use crate::tools::*;

    #[test]
    fn full() {
        let cookie = parse_set_cookie(b"session=abc123; Path=/; Domain=example.com; HttpOnly; Secure").unwrap();

        assert_eq!(str(Some(cookie.key)), Some("session"));
        assert_eq!(str(Some(cookie.value)), Some("abc123"));
        assert_eq!(str(cookie.path), Some("/"));
        assert_eq!(str(cookie.domain), Some("example.com"));
        assert!(cookie.http_only);
        assert!(cookie.secure);
    }

    #[test]
    fn quoted_value() {
        let cookie = parse_set_cookie(br#"key="quoted value""#).unwrap();
        assert_eq!(str(Some(cookie.value)), Some("quoted value"));
    }

    #[test]
    fn no_equals_is_invalid() {
        assert!(parse_set_cookie(b"not-a-cookie").is_none());
    }
}
