// API client module: a small blocking HTTP client for the Exercism API
// plus the multipart packaging of solution files.
//
// The client is synchronous on purpose. A submission is one request and
// nothing else runs while it is in flight.

use reqwest::blocking::{multipart, Client};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::fs;
use tracing::{debug, info};

use crate::error::{ApiError, CliError};
use crate::workspace::Document;

/// Form field shared by every file part; the API reads it as an array.
pub const FILES_FIELD: &str = "files[]";

/// Multipart body ready to send, together with its Content-Type.
pub struct UploadPackage {
    form: multipart::Form,
    content_type: String,
    filenames: Vec<String>,
}

impl UploadPackage {
    /// `multipart/form-data; boundary=...` for the finished form.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Declared filename of each part, in order.
    pub fn filenames(&self) -> &[String] {
        &self.filenames
    }

    pub fn into_form(self) -> multipart::Form {
        self.form
    }
}

/// Encode `docs` as a multipart form, one `files[]` part per document.
///
/// Each file is opened, copied into its part and closed before the next one
/// is touched. The first I/O error aborts packaging.
pub fn package_documents(docs: &[Document]) -> Result<UploadPackage, CliError> {
    let mut form = multipart::Form::new();
    let mut filenames = Vec::with_capacity(docs.len());
    for doc in docs {
        let contents = fs::read(doc.filepath()).map_err(|source| CliError::Io {
            path: doc.filepath().to_path_buf(),
            source,
        })?;
        debug!(file = doc.path(), bytes = contents.len(), "adding part");
        let part = multipart::Part::bytes(contents).file_name(doc.path().to_string());
        form = form.part(FILES_FIELD, part);
        filenames.push(doc.path().to_string());
    }
    // The boundary is fixed once the form is complete.
    let content_type = format!("multipart/form-data; boundary={}", form.boundary());
    Ok(UploadPackage {
        form,
        content_type,
        filenames,
    })
}

/// Simple API client that holds a reqwest blocking client, the API base
/// URL and the user's token.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(token: &str, base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("exercism-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint for one solution.
    pub fn solution_url(&self, solution_id: &str) -> String {
        format!("{}/solutions/{}", self.base_url, solution_id)
    }

    fn auth_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        let mut val = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| ApiError::InvalidToken)?;
        val.set_sensitive(true);
        headers.insert(AUTHORIZATION, val);
        Ok(headers)
    }

    /// PATCH the packaged files to `/solutions/{id}`.
    ///
    /// The response body is drained and discarded. A non-success status is
    /// an error carrying the response text; nothing is retried.
    pub fn submit_solution(&self, solution_id: &str, package: UploadPackage) -> Result<(), ApiError> {
        let url = self.solution_url(solution_id);
        info!(%url, files = package.filenames().len(), "submitting solution");
        debug!(content_type = package.content_type(), "multipart body");

        let res = self
            .client
            .patch(&url)
            .headers(self.auth_headers()?)
            .multipart(package.into_form())
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = res.status();
        let body = res.text().map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;
        debug!(%status, bytes = body.len(), "response received");
        if !status.is_success() {
            return Err(ApiError::Status { url, status, body });
        }
        Ok(())
    }
}
