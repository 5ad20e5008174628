//! Streaming download of the source CSV.

use std::io;

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::Client;
use tracing::{info, instrument};

use crate::config::IngestConfig;
use crate::error::{IngestionError, Result};

/// Response body as a stream of chunks.
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

/// Issues the GET against the configured source. No retries.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    url: String,
}

impl Fetcher {
    pub fn new(config: &IngestConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .tcp_nodelay(true)
            .build()
            .map_err(|e| IngestionError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: config.source_url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Start the download and hand back the body as it arrives.
    ///
    /// Fails with [`IngestionError::Transfer`] on connection errors and on any
    /// non-success status. Errors while reading the body surface later as
    /// `io::Error`s from the stream.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch(&self) -> Result<ByteStream> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| IngestionError::transfer(&self.url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestionError::Transfer {
                url: self.url.clone(),
                status: Some(status.as_u16()),
                message: format!("HTTP error: {}", status),
            });
        }

        info!(
            status = status.as_u16(),
            content_length = ?response.content_length(),
            "Download started"
        );

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| io::Error::new(io::ErrorKind::Other, e)));

        Ok(stream.boxed())
    }
}
