//! TLS client configuration shared by the REST client and the feed.
//!
//! Trusts the Mozilla root set from `webpki-roots`, optionally extended
//! with extra CA certificates from a PEM bundle (for TLS-intercepting
//! proxies and the like).

use std::path::Path;

use rustls::ClientConfig;
use tracing::info;

use crate::Result;

/// Builds a [`ClientConfig`] trusting the webpki roots plus any
/// certificates found in `extra_ca_pem`.
///
/// # Errors
///
/// Returns [`BtcBarError::Tls`](crate::BtcBarError::Tls) if the bundle
/// cannot be read or parsed, or contains no usable certificate.
pub fn build_tls_config(extra_ca_pem: Option<&Path>) -> Result<ClientConfig> {
    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    if let Some(path) = extra_ca_pem {
        let pem = std::fs::read(path).map_err(|e| {
            crate::BtcBarError::Tls(format!("failed to read CA bundle {}: {e}", path.display()))
        })?;

        let certs: Vec<_> = rustls_pemfile::certs(&mut pem.as_slice())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| crate::BtcBarError::Tls(format!("failed to parse CA PEM: {e}")))?;

        let (added, ignored) = root_store.add_parsable_certificates(certs);
        if added == 0 {
            return Err(crate::BtcBarError::Tls(format!(
                "no usable certificates in {}",
                path.display()
            )));
        }
        info!(added, ignored, path = %path.display(), "Loaded extra CA certificates");
    }

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Ok(config)
}
