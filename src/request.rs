//! Request sources: values that describe where a payload lives.
//!
//! A [`RequestSource`] is configured once and then hands out the same
//! [`RequestDescriptor`] on every call. Doing the I/O for a descriptor is the
//! job of a [`Transfer`](crate::transfer::Transfer), not the source.

use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::error::{FetchError, FetchResult};

/// Where to get raw bytes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestDescriptor {
    /// HTTP GET against a fully-resolved URL.
    Get { url: Url },
    /// Read a local file.
    File { path: PathBuf },
}

impl fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestDescriptor::Get { url } => write!(f, "GET {url}"),
            RequestDescriptor::File { path } => write!(f, "file {}", path.display()),
        }
    }
}

/// Produces a [`RequestDescriptor`] from the instance's configuration.
///
/// Implementations must be pure: the same configuration yields the same
/// descriptor no matter how many times this is called.
pub trait RequestSource: Send + Sync {
    fn make_request(&self) -> RequestDescriptor;
}

// ---------------------------------------------------------------------------
// Remote
// ---------------------------------------------------------------------------

/// A `{host}/{resource}` endpoint.
#[derive(Debug, Clone)]
pub struct RemoteRequest {
    url: Url,
}

impl RemoteRequest {
    /// Build a source for `resource` under `host`.
    ///
    /// A trailing slash on `host` or a leading slash on `resource` is
    /// tolerated; the joined URL always has a single `/` between them.
    /// `host` must carry an `http` or `https` scheme.
    pub fn new(host: &str, resource: &str) -> FetchResult<Self> {
        let joined = format!(
            "{}/{}",
            host.trim_end_matches('/'),
            resource.trim_start_matches('/')
        );
        let url = Url::parse(&joined)
            .map_err(|e| FetchError::InvalidRequest(format!("{joined}: {e}")))?;

        // `localhost:8080` parses with `localhost` as the scheme.
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(FetchError::InvalidRequest(format!(
                "{joined}: expected an http:// or https:// host"
            )));
        }
        Ok(Self { url })
    }
}

impl RequestSource for RemoteRequest {
    fn make_request(&self) -> RequestDescriptor {
        RequestDescriptor::Get {
            url: self.url.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Local file
// ---------------------------------------------------------------------------

/// A named local file containing JSON text.
#[derive(Debug, Clone)]
pub struct FileRequest {
    path: PathBuf,
}

impl FileRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RequestSource for FileRequest {
    fn make_request(&self) -> RequestDescriptor {
        RequestDescriptor::File {
            path: self.path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_joins_host_and_resource() {
        let src = RemoteRequest::new("https://example.com", "dogs").unwrap();
        match src.make_request() {
            RequestDescriptor::Get { url } => assert_eq!(url.as_str(), "https://example.com/dogs"),
            other => panic!("expected GET, got {other:?}"),
        }
    }

    #[test]
    fn remote_collapses_slashes_at_the_join() {
        let a = RemoteRequest::new("https://example.com/", "/dogs").unwrap();
        let b = RemoteRequest::new("https://example.com", "dogs").unwrap();
        assert_eq!(a.make_request(), b.make_request());
    }

    #[test]
    fn remote_keeps_host_path_prefix() {
        let src = RemoteRequest::new("https://example.com/api/v1", "cats").unwrap();
        assert_eq!(src.make_request().to_string(), "GET https://example.com/api/v1/cats");
    }

    #[test]
    fn make_request_is_deterministic() {
        let src = RemoteRequest::new("https://example.com", "dogs").unwrap();
        let first = src.make_request();
        for _ in 0..5 {
            assert_eq!(src.make_request(), first);
        }

        let file = FileRequest::new("animals.json");
        assert_eq!(file.make_request(), file.make_request());
    }

    #[test]
    fn malformed_host_is_rejected_at_construction() {
        let err = RemoteRequest::new("not a host", "dogs").unwrap_err();
        assert!(matches!(err, FetchError::InvalidRequest(_)));
    }

    #[test]
    fn host_without_scheme_is_rejected() {
        for host in ["localhost:8080", "example.com:443", "ftp://example.com"] {
            let err = RemoteRequest::new(host, "dogs").unwrap_err();
            assert!(
                matches!(err, FetchError::InvalidRequest(_)),
                "{host} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn plain_http_host_is_accepted() {
        let src = RemoteRequest::new("http://localhost:8080", "dogs").unwrap();
        assert_eq!(src.make_request().to_string(), "GET http://localhost:8080/dogs");
    }

    #[test]
    fn file_request_describes_its_path() {
        let src = FileRequest::new("data/cats.json");
        assert_eq!(
            src.make_request(),
            RequestDescriptor::File {
                path: PathBuf::from("data/cats.json")
            }
        );
        assert_eq!(src.make_request().to_string(), "file data/cats.json");
    }
}
