//! Image server client.
//!
//! Handles the registration handshake with the image server and implements
//! the prefetcher's [`FetchSource`] over plain HTTP GET. The server
//! protocol is line-oriented and stateless:
//!
//! - `GET {base}/client_register` returns a client id
//! - `GET {base}/client_cfg/{id}/target_size/{w}x{h}` configures the
//!   rendered image size
//! - `GET {base}/client_cfg/{id}/embed_info_qr_code/{bool}` toggles the
//!   overlayed info QR code
//! - `GET {base}/get_next_img/{id}` returns the next encoded image
//!
//! [`FetchSource`]: crate::prefetch::FetchSource

mod config;
mod downloader;
mod error;
mod http;
mod registration;

pub use config::ClientConfig;
pub use downloader::ImageDownloader;
pub use error::ClientError;
pub use http::{HttpClient, ReqwestClient};
pub use registration::ServerSession;
