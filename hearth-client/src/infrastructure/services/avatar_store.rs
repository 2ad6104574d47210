//! Object storage for avatar images
//!
//! Uploads run as resumable transfers: a session is opened, the bytes go up
//! in fixed-size chunks, and each acknowledged chunk yields a progress event.
//! The transfer terminates with either the object's retrievable URL or a
//! single failure event; no retry is attempted.

use log::{error, info};
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Chunk size sent per request; also the progress reporting granularity.
const CHUNK_SIZE: usize = 256 * 1024;

/// One event in the lifetime of a single avatar transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    /// Percent of bytes acknowledged so far, in `[0, 100]`.
    Progress(u8),
    /// Transfer failed; the message is logged, only a flag reaches the view.
    Failed(String),
    /// Transfer finished; carries the retrievable URL for the object.
    Completed(String),
}

/// Failure modes of a resumable transfer.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Opening the upload session failed
    #[error("Failed to open upload session: {0}")]
    SessionOpen(String),
    /// The session response carried no `Location` header
    #[error("Upload session returned no location")]
    MissingLocation,
    /// A chunk request failed at the transport level
    #[error("Chunk transfer failed: {0}")]
    Chunk(String),
    /// The storage service answered a chunk with an unexpected status
    #[error("Unexpected status {0} from storage")]
    UnexpectedStatus(StatusCode),
    /// The object's retrievable URL could not be resolved after completion
    #[error("Failed to resolve download URL: {0}")]
    ResolveUrl(String),
}

/// Handle to one in-flight avatar transfer.
///
/// Exactly one transfer is tracked per file selection. Selecting a new file
/// must abort the previous handle; a stale subscription would otherwise race
/// the new transfer for the pending avatar slot.
#[derive(Debug)]
pub struct UploadHandle {
    events: mpsc::UnboundedReceiver<UploadEvent>,
    task: Option<JoinHandle<()>>,
}

impl UploadHandle {
    /// Assemble a handle from an event receiver and the transfer task.
    pub fn from_parts(events: mpsc::UnboundedReceiver<UploadEvent>, task: JoinHandle<()>) -> Self {
        Self {
            events,
            task: Some(task),
        }
    }

    /// Next event in the transfer's sequence; `None` once it has terminated.
    pub async fn next_event(&mut self) -> Option<UploadEvent> {
        self.events.recv().await
    }

    /// Cancel the transfer. Safe to call after completion.
    pub fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.events.close();
    }
}

impl Drop for UploadHandle {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Object storage used for avatar images.
pub trait AvatarStore: Send + Sync {
    /// Begin uploading `bytes` under a unique object name derived from
    /// `file_name`, returning the handle tracking the transfer.
    fn upload(&self, file_name: &str, bytes: Vec<u8>) -> UploadHandle;
}

/// Resumable-upload client against the object-storage HTTP surface.
#[derive(Clone, Debug)]
pub struct ObjectStoreClient {
    client: Client,
    base_url: String,
    bucket: String,
}

#[derive(Debug, Deserialize)]
struct ObjectMetadata {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ObjectLink {
    #[serde(rename = "mediaLink")]
    media_link: String,
}

impl ObjectStoreClient {
    /// Create a client for one bucket of the storage service.
    pub fn new(base_url: String, bucket: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            // 308 is the protocol's "resume incomplete", not a redirect.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket,
        }
    }

    /// Create a client for the configured storage service and bucket.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.storage_url.clone(), config.storage_bucket.clone())
    }

    /// Unique object name: upload start time in millis concatenated with the
    /// original file name, so re-uploads never collide.
    fn object_name(file_name: &str) -> String {
        format!("{}{}", chrono::Utc::now().timestamp_millis(), file_name)
    }
}

impl AvatarStore for ObjectStoreClient {
    fn upload(&self, file_name: &str, bytes: Vec<u8>) -> UploadHandle {
        let object = Self::object_name(file_name);
        info!(
            "Starting avatar upload of {} bytes as {object:?}",
            bytes.len()
        );

        let (tx, rx) = mpsc::unbounded_channel();
        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let bucket = self.bucket.clone();

        let task = tokio::spawn(async move {
            if let Err(e) = transfer(&client, &base_url, &bucket, &object, &bytes, &tx).await {
                error!("Avatar upload failed: {e}");
                let _ = tx.send(UploadEvent::Failed(e.to_string()));
            }
        });

        UploadHandle::from_parts(rx, task)
    }
}

/// Run one resumable transfer to completion, emitting progress along the way.
async fn transfer(
    client: &Client,
    base_url: &str,
    bucket: &str,
    object: &str,
    bytes: &[u8],
    tx: &mpsc::UnboundedSender<UploadEvent>,
) -> Result<(), UploadError> {
    let session_url = format!(
        "{base_url}/upload/b/{bucket}/o?uploadType=resumable&name={}",
        urlencoding::encode(object)
    );
    let response = client
        .post(&session_url)
        .header("X-Upload-Content-Type", "application/octet-stream")
        .send()
        .await
        .map_err(|e| UploadError::SessionOpen(e.to_string()))?;
    if !response.status().is_success() {
        return Err(UploadError::SessionOpen(format!(
            "status {}",
            response.status()
        )));
    }
    let session_uri = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .ok_or(UploadError::MissingLocation)?;

    let total = bytes.len();
    let mut sent = 0usize;
    let metadata = loop {
        let end = (sent + CHUNK_SIZE).min(total);
        let range = if total == 0 {
            "bytes */0".to_string()
        } else {
            format!("bytes {sent}-{}/{total}", end - 1)
        };
        let response = client
            .put(&session_uri)
            .header(header::CONTENT_RANGE, range)
            .body(bytes[sent..end].to_vec())
            .send()
            .await
            .map_err(|e| UploadError::Chunk(e.to_string()))?;
        sent = end;

        match response.status() {
            // 308 Resume Incomplete: the chunk was stored, keep going.
            StatusCode::PERMANENT_REDIRECT if sent < total => {
                let _ = tx.send(UploadEvent::Progress(percent(sent, total)));
            }
            status if status.is_success() => {
                let _ = tx.send(UploadEvent::Progress(percent(sent, total)));
                break response
                    .json::<ObjectMetadata>()
                    .await
                    .map_err(|e| UploadError::Chunk(e.to_string()))?;
            }
            status => return Err(UploadError::UnexpectedStatus(status)),
        }
    };

    // The final chunk response only confirms the object; the retrievable URL
    // is resolved with a follow-up metadata read.
    let link_url = format!(
        "{base_url}/b/{bucket}/o/{}?fields=mediaLink",
        urlencoding::encode(&metadata.name)
    );
    let link = client
        .get(&link_url)
        .send()
        .await
        .map_err(|e| UploadError::ResolveUrl(e.to_string()))?
        .error_for_status()
        .map_err(|e| UploadError::ResolveUrl(e.to_string()))?
        .json::<ObjectLink>()
        .await
        .map_err(|e| UploadError::ResolveUrl(e.to_string()))?;

    info!("Avatar upload complete: {}", link.media_link);
    let _ = tx.send(UploadEvent::Completed(link.media_link));
    Ok(())
}

/// Percent of a transfer acknowledged, rounded to the nearest whole point.
fn percent(sent: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((sent as f64 / total as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_to_nearest_point() {
        assert_eq!(percent(0, 200), 0);
        assert_eq!(percent(1, 200), 1); // 0.5% rounds up
        assert_eq!(percent(100, 200), 50);
        assert_eq!(percent(199, 200), 100); // 99.5% rounds up
        assert_eq!(percent(200, 200), 100);
    }

    #[test]
    fn percent_of_empty_transfer_is_complete() {
        assert_eq!(percent(0, 0), 100);
    }

    #[test]
    fn from_config_points_at_the_configured_bucket() {
        let config = crate::config::Config {
            storage_url: "https://storage.example/".to_string(),
            storage_bucket: "avatars".to_string(),
            ..crate::config::Config::default()
        };
        let store = ObjectStoreClient::from_config(&config);
        assert_eq!(store.base_url, "https://storage.example");
        assert_eq!(store.bucket, "avatars");
    }

    #[test]
    fn object_names_carry_the_original_file_name() {
        let name = ObjectStoreClient::object_name("me.png");
        assert!(name.ends_with("me.png"));
        assert!(name.len() > "me.png".len());
        assert!(name.chars().next().is_some_and(|c| c.is_ascii_digit()));
    }
}
