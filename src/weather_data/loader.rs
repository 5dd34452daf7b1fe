use crate::weather_data::cache::{CachedResponse, ResponseCache};
use crate::weather_data::error::WeatherDataError;
use crate::weather_data::request::ArchiveRequest;
use crate::weather_data::response::error_reason;
use chrono::Utc;
use log::{info, warn};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

pub struct ArchiveLoader {
    cache: ResponseCache,
    download_client: Client,
    archive_url: String,
}

impl ArchiveLoader {
    pub fn new(
        cache_dir: &Path,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<ArchiveLoader, WeatherDataError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let download_client = builder.build().map_err(WeatherDataError::ClientBuild)?;
        Ok(ArchiveLoader {
            cache: ResponseCache::new(cache_dir),
            download_client,
            archive_url: format!("{}/archive", base_url.trim_end_matches('/')),
        })
    }

    /// Returns the raw response body for `request`, from the cache when an
    /// identical request was made before, otherwise from the archive.
    pub async fn get_body(&self, request: &ArchiveRequest) -> Result<Vec<u8>, WeatherDataError> {
        let key = request.cache_key(&self.archive_url);

        if let Some(cached) = self.cache.get(&key).await? {
            info!(
                "Cache hit for archive request {} (fetched {})",
                key, cached.fetched_at
            );
            return Ok(cached.body);
        }

        warn!("Cache miss for archive request {}. Downloading.", key);
        let response = self.download(request).await?;
        let body = response.body.clone();
        self.cache.put(&key, response).await?;
        info!("Cached archive response for {}", key);
        Ok(body)
    }

    pub async fn clear_cache(&self) -> Result<usize, WeatherDataError> {
        self.cache.clear().await
    }

    async fn download(&self, request: &ArchiveRequest) -> Result<CachedResponse, WeatherDataError> {
        let http_request = self
            .download_client
            .get(&self.archive_url)
            .query(&request.query_params())
            .build()
            .map_err(|e| WeatherDataError::NetworkRequest(self.archive_url.clone(), e))?;
        let url = http_request.url().to_string();
        info!("Downloading data from {}", url);

        let response = self
            .download_client
            .execute(http_request)
            .await
            .map_err(|e| WeatherDataError::NetworkRequest(url.clone(), e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| WeatherDataError::NetworkRequest(url.clone(), e))?;

        if !status.is_success() {
            let reason = error_reason(&body).unwrap_or_else(|| "no reason given".to_string());
            warn!("HTTP error for {}: {} ({})", url, status, reason);
            return Err(WeatherDataError::HttpStatus {
                url,
                status,
                reason,
            });
        }

        info!("Successfully downloaded {} bytes from {}", body.len(), url);
        Ok(CachedResponse {
            url,
            status: status.as_u16(),
            body: body.to_vec(),
            fetched_at: Utc::now(),
        })
    }
}
