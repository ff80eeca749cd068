//! Request-URL composition and the HTTP call to the descriptor endpoint.

use gloo_net::http::Request;

/// How a fetch-render cycle can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Server was reachable but answered with a non-success status.
    /// Only the reason phrase is shown to the user; the body is ignored.
    Rejected { status: u16, status_text: String },
    /// The request never completed (offline, DNS, CORS).
    Transport(String),
}

impl LoadError {
    /// Human-readable reason embedded in the inline error fragment.
    pub fn reason(&self) -> &str {
        match self {
            LoadError::Rejected { status_text, .. } => status_text,
            LoadError::Transport(reason) => reason,
        }
    }
}

/// Build the parameter-definition request URL.
///
/// `job` and `context` are percent-encoded as query values; an empty job
/// name is legal and yields `job=`. The base URL is used verbatim, the
/// caller is responsible for it pointing at the descriptor endpoint.
pub fn parameters_url(descriptor_url: &str, job: &str, context: &str) -> String {
    format!(
        "{}/parameters?job={}&context={}",
        descriptor_url,
        urlencoding::encode(job),
        urlencoding::encode(context)
    )
}

/// GET the rendered parameter-definition fragment.
///
/// A 2xx response yields the body as an HTML fragment; anything else is a
/// [`LoadError`].
pub async fn fetch_parameters(url: &str) -> Result<String, LoadError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| LoadError::Transport(e.to_string()))?;

    if !response.ok() {
        return Err(LoadError::Rejected {
            status: response.status(),
            status_text: response.status_text(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| LoadError::Transport(e.to_string()))
}
