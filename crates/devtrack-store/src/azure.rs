//! Azure Blob Storage transport over the Blob REST API.
//!
//! Addressing comes from a standard Azure connection string plus a container
//! and object name. Two credential modes:
//!
//! - **Shared Key**: requests carry an `Authorization: SharedKey` header whose
//!   signature is an HMAC-SHA256 over the canonical request form, keyed by
//!   the account key.
//! - **SAS**: the shared-access-signature query string is appended to every
//!   request URL and no Authorization header is sent.
//!
//! `UseDevelopmentStorage=true` targets a local Azurite emulator with its
//! well-known account.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::blob::BlobClient;
use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Blob service API version sent with every request.
const API_VERSION: &str = "2021-08-06";

/// Azurite's well-known development account.
const DEV_ACCOUNT: &str = "devstoreaccount1";
const DEV_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
const DEV_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

/// Credential material parsed out of a connection string.
#[derive(Clone)]
enum Credentials {
    SharedKey { account: String, key: String },
    Sas(String),
}

// Secrets never reach log output through Debug.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::SharedKey { account, .. } => f
                .debug_struct("SharedKey")
                .field("account", account)
                .field("key", &"<redacted>")
                .finish(),
            Credentials::Sas(_) => f.debug_tuple("Sas").field(&"<redacted>").finish(),
        }
    }
}

/// A parsed storage account: blob endpoint plus credentials.
#[derive(Clone, Debug)]
pub struct StorageAccount {
    endpoint: String,
    credentials: Credentials,
}

impl StorageAccount {
    /// Parses an Azure storage connection string.
    ///
    /// Recognized keys: `AccountName`, `AccountKey`, `DefaultEndpointsProtocol`,
    /// `EndpointSuffix`, `BlobEndpoint`, `SharedAccessSignature`, and the
    /// `UseDevelopmentStorage=true` shorthand.
    pub fn from_connection_string(connection_string: &str) -> Result<Self> {
        let mut pairs = std::collections::HashMap::new();
        for part in connection_string.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Some((key, value)) = part.split_once('=') {
                pairs.insert(key.to_string(), value.to_string());
            }
        }

        if pairs.get("UseDevelopmentStorage").map(String::as_str) == Some("true") {
            return Ok(Self {
                endpoint: DEV_ENDPOINT.to_string(),
                credentials: Credentials::SharedKey {
                    account: DEV_ACCOUNT.to_string(),
                    key: DEV_KEY.to_string(),
                },
            });
        }

        let endpoint = match pairs.get("BlobEndpoint") {
            Some(e) => e.trim_end_matches('/').to_string(),
            None => {
                let name = pairs.get("AccountName").ok_or_else(|| {
                    Error::unavailable("connection string has neither BlobEndpoint nor AccountName")
                })?;
                let protocol = pairs
                    .get("DefaultEndpointsProtocol")
                    .map(String::as_str)
                    .unwrap_or("https");
                let suffix = pairs
                    .get("EndpointSuffix")
                    .map(String::as_str)
                    .unwrap_or("core.windows.net");
                format!("{protocol}://{name}.blob.{suffix}")
            }
        };

        let credentials = if let Some(sas) = pairs.get("SharedAccessSignature") {
            Credentials::Sas(sas.trim_start_matches('?').to_string())
        } else {
            match (pairs.get("AccountName"), pairs.get("AccountKey")) {
                (Some(account), Some(key)) => Credentials::SharedKey {
                    account: account.clone(),
                    key: key.clone(),
                },
                _ => {
                    return Err(Error::unavailable(
                        "connection string has neither AccountKey nor SharedAccessSignature",
                    ));
                }
            }
        };

        Ok(Self {
            endpoint,
            credentials,
        })
    }

    /// The blob service endpoint (no trailing slash).
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// [`BlobClient`] implementation for one object in Azure Blob Storage.
#[derive(Clone)]
pub struct AzureBlobClient {
    http: reqwest::Client,
    account: StorageAccount,
    container: String,
    blob: String,
}

impl AzureBlobClient {
    /// Creates a client for `container`/`blob` on the given account.
    pub fn new(
        account: StorageAccount,
        container: impl Into<String>,
        blob: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            account,
            container: container.into(),
            blob: blob.into(),
        }
    }

    fn blob_path(&self) -> String {
        format!("/{}/{}", self.container, self.blob)
    }

    fn container_path(&self) -> String {
        format!("/{}", self.container)
    }

    /// Builds the request URL, appending the SAS query in SAS mode.
    fn url(&self, path: &str, query: &[(&str, &str)]) -> String {
        let mut url = format!("{}{}", self.account.endpoint, path);
        let mut sep = '?';
        for (key, value) in query {
            url.push(sep);
            url.push_str(key);
            url.push('=');
            url.push_str(value);
            sep = '&';
        }
        if let Credentials::Sas(sas) = &self.account.credentials {
            url.push(sep);
            url.push_str(sas);
        }
        url
    }

    /// Applies auth headers to a request. In Shared Key mode this signs the
    /// canonical request form; in SAS mode the URL already carries auth.
    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
        verb: &str,
        path: &str,
        query: &[(&str, &str)],
        content_length: usize,
        extra_ms_headers: &[(&str, &str)],
    ) -> Result<reqwest::RequestBuilder> {
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();

        let mut ms_headers: Vec<(String, String)> = vec![
            ("x-ms-date".to_string(), date),
            ("x-ms-version".to_string(), API_VERSION.to_string()),
        ];
        for (name, value) in extra_ms_headers {
            ms_headers.push((name.to_string(), value.to_string()));
        }
        ms_headers.sort();

        let mut request = request;
        for (name, value) in &ms_headers {
            request = request.header(name, value);
        }

        if let Credentials::SharedKey { account, key } = &self.account.credentials {
            let to_sign = string_to_sign(verb, content_length, &ms_headers, account, path, query);
            let key_bytes = BASE64
                .decode(key)
                .map_err(|e| Error::Unavailable {
                    message: "account key is not valid base64".to_string(),
                    source: Some(Box::new(e)),
                })?;
            let mut mac = HmacSha256::new_from_slice(&key_bytes)
                .map_err(|_| Error::unavailable("account key has invalid length"))?;
            mac.update(to_sign.as_bytes());
            let signature = BASE64.encode(mac.finalize().into_bytes());
            request = request.header("authorization", format!("SharedKey {account}:{signature}"));
        }

        Ok(request)
    }
}

/// The canonical string the Shared Key signature covers.
///
/// Twelve standard-header slots (only Content-Length is ever non-empty
/// here), then the sorted `x-ms-*` headers, then the canonicalized resource.
fn string_to_sign(
    verb: &str,
    content_length: usize,
    ms_headers: &[(String, String)],
    account: &str,
    path: &str,
    query: &[(&str, &str)],
) -> String {
    let length = if content_length == 0 {
        String::new()
    } else {
        content_length.to_string()
    };

    let canonical_headers: String = ms_headers
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect();

    let mut canonical_resource = format!("/{account}{path}");
    let mut sorted_query: Vec<_> = query.to_vec();
    sorted_query.sort();
    for (key, value) in sorted_query {
        canonical_resource.push_str(&format!("\n{key}:{value}"));
    }

    format!(
        "{verb}\n\n\n{length}\n\n\n\n\n\n\n\n\n{canonical_headers}{canonical_resource}"
    )
}

#[async_trait::async_trait]
impl BlobClient for AzureBlobClient {
    async fn download(&self) -> Result<Vec<u8>> {
        let path = self.blob_path();
        let request = self.http.get(self.url(&path, &[]));
        let request = self.authorize(request, "GET", &path, &[], 0, &[])?;

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::read_failed(format!(
                "blob download returned {status}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::read_failed_with("reading blob body", e))?;
        Ok(bytes.to_vec())
    }

    async fn upload(&self, bytes: Vec<u8>) -> Result<()> {
        let path = self.blob_path();
        let request = self.http.put(self.url(&path, &[]));
        let request = self.authorize(
            request,
            "PUT",
            &path,
            &[],
            bytes.len(),
            &[("x-ms-blob-type", "BlockBlob")],
        )?;

        let response = request.body(bytes).send().await.map_err(|e| {
            if is_transport(&e) {
                transport_error(e)
            } else {
                Error::write_failed_with("uploading blob", e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::write_failed(format!(
                "blob upload returned {status}"
            )));
        }
        Ok(())
    }

    async fn ensure_container(&self) -> Result<()> {
        let path = self.container_path();
        let query = [("restype", "container")];
        let request = self.http.put(self.url(&path, &query));
        let request = self.authorize(request, "PUT", &path, &query, 0, &[])?;

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        // 409 means the container already exists, which is fine.
        if status.is_success() || status.as_u16() == 409 {
            Ok(())
        } else {
            Err(Error::write_failed(format!(
                "container create returned {status}"
            )))
        }
    }
}

fn is_transport(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout()
}

fn transport_error(error: reqwest::Error) -> Error {
    if is_transport(&error) {
        Error::Unavailable {
            message: "storage endpoint unreachable".to_string(),
            source: Some(Box::new(error)),
        }
    } else {
        Error::read_failed_with("storage request failed", error)
    }
}
