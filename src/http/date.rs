//! Cached `Date` header value (RFC 7231 `IMF-fixdate`), refreshed at most
//! once per second so the hot response-writing path doesn't pay for a fresh
//! `httpdate::fmt_http_date` call on every request.

use std::sync::Mutex;
use std::time::SystemTime;

const HTTP_DATE_LEN: usize = 29; // "Sun, 06 Nov 1994 08:49:37 GMT"

struct Cached {
    value: [u8; HTTP_DATE_LEN],
    unix_secs: u64,
}

static CACHE: Mutex<Option<Cached>> = Mutex::new(None);

/// Returns the current `Date` header value, recomputing it only when the
/// wall-clock second has advanced since the last call.
pub(crate) fn http_date_now() -> [u8; HTTP_DATE_LEN] {
    let now = SystemTime::now();
    let unix_secs = now
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut cache = CACHE.lock().unwrap();
    if let Some(cached) = cache.as_ref() {
        if cached.unix_secs == unix_secs {
            return cached.value;
        }
    }

    let formatted = httpdate::fmt_http_date(now);
    let mut value = [0u8; HTTP_DATE_LEN];
    value.copy_from_slice(formatted.as_bytes());
    *cache = Some(Cached { value, unix_secs });
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_well_formed_date() {
        let value = http_date_now();
        let text = std::str::from_utf8(&value).unwrap();
        assert!(text.ends_with(" GMT"));
        assert_eq!(text.len(), HTTP_DATE_LEN);
    }

    #[test]
    fn caches_within_the_same_second() {
        let a = http_date_now();
        let b = http_date_now();
        assert_eq!(a, b);
    }
}
