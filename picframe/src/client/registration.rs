//! Registration handshake with the image server.

use super::config::ClientConfig;
use super::error::ClientError;
use super::http::HttpClient;
use tracing::{info, warn};

/// A registered session with the image server.
///
/// Holds the server-assigned client id and the URL images are fetched
/// from. The configuration steps (target size, QR overlay) are best
/// effort: the server falls back to defaults if they fail, so only the
/// registration itself is fatal.
#[derive(Debug, Clone)]
pub struct ServerSession {
    client_id: String,
    image_url: String,
}

impl ServerSession {
    /// Register with the image server and configure the session.
    ///
    /// # Errors
    ///
    /// Fails only when the server does not hand out a client id; the
    /// follow-up configuration requests log a warning and continue.
    pub fn register<C: HttpClient>(
        http: &C,
        config: &ClientConfig,
    ) -> Result<Self, ClientError> {
        let base = config.server_url.trim_end_matches('/');

        let body = http
            .get(&format!("{}/client_register", base))
            .map_err(|e| ClientError::Registration(e.to_string()))?;
        let client_id = String::from_utf8_lossy(&body).trim().to_string();
        if client_id.is_empty() {
            return Err(ClientError::InvalidResponse(
                "server returned an empty client id".to_string(),
            ));
        }

        info!(client_id = %client_id, "registered with image server");

        let size_url = format!(
            "{}/client_cfg/{}/target_size/{}x{}",
            base, client_id, config.screen_width, config.screen_height
        );
        match http.get(&size_url) {
            Ok(_) => info!(
                width = config.screen_width,
                height = config.screen_height,
                "configured server target size"
            ),
            Err(e) => warn!(error = %e, "failed to set server target size"),
        }

        let qr_url = format!(
            "{}/client_cfg/{}/embed_info_qr_code/{}",
            base, client_id, config.embed_info_qr
        );
        match http.get(&qr_url) {
            Ok(_) => info!(embed = config.embed_info_qr, "configured QR code overlay"),
            Err(e) => warn!(error = %e, "failed to configure QR code overlay"),
        }

        let image_url = format!("{}/get_next_img/{}", base, client_id);
        info!(url = %image_url, "session ready, will fetch images");

        Ok(Self {
            client_id,
            image_url,
        })
    }

    /// The server-assigned client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The URL the next image is fetched from.
    pub fn image_url(&self) -> &str {
        &self.image_url
    }
}
