// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image settling — load every image the preview references before any page is
// rasterized. One future per image, joined; a failed image is logged and left
// blank, never failing the join.

use std::collections::HashMap;
use std::future::Future;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use futures::future::join_all;
use image::RgbImage;
use reqwest::header::{HeaderValue, USER_AGENT};
use tracing::{debug, info, instrument, warn};

use gost_report_core::error::{ReportError, Result};

const USER_AGENT_VALUE: &str = concat!("gost-report/", env!("CARGO_PKG_VERSION"));

/// Fetches remote (`http`/`https`) image references.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Fetches over HTTP with `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let load_error = |reason: String| ReportError::ImageLoad {
            src: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE))
            .send()
            .await
            .map_err(|e| load_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(load_error(format!("HTTP {status}")));
        }

        let bytes = response.bytes().await.map_err(|e| load_error(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Refuses every remote reference; remote images stay blank.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetcher;

impl ImageFetcher for OfflineFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        Err(ReportError::ImageLoad {
            src: url.to_string(),
            reason: "remote images disabled".into(),
        })
    }
}

/// Decoded images by reference. `None` marks a reference that failed to load.
#[derive(Debug, Default)]
pub struct LoadedImages {
    images: HashMap<String, Option<RgbImage>>,
}

impl LoadedImages {
    pub fn get(&self, src: &str) -> Option<&RgbImage> {
        self.images.get(src).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn failed(&self) -> usize {
        self.images.values().filter(|image| image.is_none()).count()
    }
}

/// Load and decode every reference. Completes only once every image has
/// settled, successfully or not.
#[instrument(skip_all, fields(images = sources.len()))]
pub async fn settle_images<F: ImageFetcher>(sources: &[String], fetcher: &F) -> LoadedImages {
    let settled = join_all(sources.iter().map(|src| async move {
        let outcome = load_image(src, fetcher).await;
        (src, outcome)
    }))
    .await;

    let mut images = HashMap::with_capacity(settled.len());
    for (src, outcome) in settled {
        let image = match outcome {
            Ok(image) => {
                debug!(src = short(src), width = image.width(), height = image.height(), "image loaded");
                Some(image)
            }
            Err(err) => {
                warn!(src = short(src), error = %err, "image failed to load; leaving it blank");
                None
            }
        };
        images.insert(src.clone(), image);
    }

    let loaded = LoadedImages { images };
    info!(total = loaded.len(), failed = loaded.failed(), "images settled");
    loaded
}

async fn load_image<F: ImageFetcher>(src: &str, fetcher: &F) -> Result<RgbImage> {
    let bytes = if let Some(data) = src.strip_prefix("data:") {
        decode_data_uri(src, data)?
    } else if src.starts_with("http://") || src.starts_with("https://") {
        fetcher.fetch(src).await?
    } else {
        let path = src.strip_prefix("file://").unwrap_or(src);
        tokio::fs::read(path).await.map_err(|err| ReportError::ImageLoad {
            src: src.to_string(),
            reason: err.to_string(),
        })?
    };

    let decoded = image::load_from_memory(&bytes).map_err(|err| ReportError::ImageLoad {
        src: src.to_string(),
        reason: format!("decode failed: {err}"),
    })?;
    Ok(decoded.to_rgb8())
}

/// `data:[<mime>][;base64],<payload>`
fn decode_data_uri(src: &str, data: &str) -> Result<Vec<u8>> {
    let (meta, payload) = data.split_once(',').ok_or_else(|| ReportError::ImageLoad {
        src: short(src).to_string(),
        reason: "data URI without payload".into(),
    })?;

    if meta.ends_with(";base64") {
        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        STANDARD.decode(compact).map_err(|err| ReportError::ImageLoad {
            src: short(src).to_string(),
            reason: format!("bad base64: {err}"),
        })
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

/// Data URIs are long; keep log lines readable.
fn short(src: &str) -> &str {
    match src.char_indices().nth(64) {
        Some((end, _)) => &src[..end],
        None => src,
    }
}
