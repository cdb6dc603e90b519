//! Configuration for the image server client.

/// Configuration for registering with an image server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the image server, without a trailing slash.
    pub server_url: String,
    /// Width the server should render images at, in pixels.
    pub screen_width: u32,
    /// Height the server should render images at, in pixels.
    pub screen_height: u32,
    /// Whether the server should overlay an info QR code on each image.
    pub embed_info_qr: bool,
    /// Request timeout in seconds for the HTTP client.
    pub http_timeout_secs: u64,
}

impl ClientConfig {
    /// Create a configuration for the given server and screen geometry.
    pub fn new(server_url: impl Into<String>, screen_width: u32, screen_height: u32) -> Self {
        let mut server_url = server_url.into();
        while server_url.ends_with('/') {
            server_url.pop();
        }
        Self {
            server_url,
            screen_width,
            screen_height,
            embed_info_qr: false,
            http_timeout_secs: 30,
        }
    }

    /// Enable or disable the server-side info QR code overlay.
    pub fn with_embed_info_qr(mut self, embed: bool) -> Self {
        self.embed_info_qr = embed;
        self
    }

    /// Set the HTTP request timeout.
    pub fn with_http_timeout_secs(mut self, secs: u64) -> Self {
        self.http_timeout_secs = secs;
        self
    }
}
