//! Extra TLS trust anchors.
//!
//! The transport never turns certificate or hostname verification off. A
//! custom CA file or CA directory only adds roots next to the built-in ones.

use std::fs;
use std::path::Path;

use centrifuge_core::{CentrifugeError, CentrifugeResult, TransportConfig};
use reqwest::Certificate;
use tracing::debug;

/// Collect every extra root certificate named by `config`.
pub(crate) fn load_trust_anchors(config: &TransportConfig) -> CentrifugeResult<Vec<Certificate>> {
    let mut anchors = Vec::new();

    if let Some(file) = &config.trusted_cert_file {
        let certs = read_pem_file(file)?;
        if certs.is_empty() {
            return Err(CentrifugeError::Config(format!(
                "no certificates found in {}",
                file.display()
            )));
        }
        debug!(path = %file.display(), count = certs.len(), "loaded trusted certificate file");
        anchors.extend(certs);
    }

    if let Some(dir) = &config.trusted_ca_path {
        let certs = read_ca_dir(dir)?;
        debug!(path = %dir.display(), count = certs.len(), "loaded trusted CA directory");
        anchors.extend(certs);
    }

    Ok(anchors)
}

fn read_pem_file(path: &Path) -> CentrifugeResult<Vec<Certificate>> {
    let pem = fs::read(path).map_err(|e| {
        CentrifugeError::Config(format!("cannot read certificate file {}: {e}", path.display()))
    })?;
    Certificate::from_pem_bundle(&pem).map_err(|e| {
        CentrifugeError::Config(format!("invalid certificate file {}: {e}", path.display()))
    })
}

/// Read every regular file in `dir` that holds PEM certificates.
///
/// Files that do not parse are skipped (CA directories often carry hash
/// links, READMEs and CRLs); an empty result is an error.
fn read_ca_dir(dir: &Path) -> CentrifugeResult<Vec<Certificate>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        CentrifugeError::Config(format!("cannot read CA directory {}: {e}", dir.display()))
    })?;

    let mut paths: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut certs = Vec::new();
    for path in &paths {
        match read_pem_file(path) {
            Ok(found) => certs.extend(found),
            Err(e) => debug!(error = %e, "skipping CA directory entry"),
        }
    }

    if certs.is_empty() {
        return Err(CentrifugeError::Config(format!(
            "no certificates found in CA directory {}",
            dir.display()
        )));
    }
    Ok(certs)
}

#[cfg(test)]
mod tests {
    use std::io::{self, Read, Write};
    use std::net::{SocketAddr, TcpListener};
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::thread;

    use centrifuge_core::SignedRequest;
    use rcgen::{BasicConstraints, CertificateParams, DnType, IsCa, KeyPair};
    use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};

    use super::*;
    use crate::http::HttpTransport;
    use crate::transport::Transport;

    const TEST_CA: &str = include_str!("../tests/fixtures/ca.pem");

    const OK_RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 15\r\nconnection: close\r\n\r\n{\"result\":\"ok\"}";

    struct TestCa {
        cert: rcgen::Certificate,
        key: KeyPair,
    }

    fn test_ca(name: &str) -> TestCa {
        let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
        params.distinguished_name.push(DnType::CommonName, name);
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        let key = KeyPair::generate().unwrap();
        let cert = params.self_signed(&key).unwrap();
        TestCa { cert, key }
    }

    /// HTTPS server on 127.0.0.1 presenting a leaf issued by `issuer`.
    fn serve_https(issuer: &TestCa) -> SocketAddr {
        let params =
            CertificateParams::new(vec!["127.0.0.1".to_owned(), "localhost".to_owned()]).unwrap();
        let key = KeyPair::generate().unwrap();
        let leaf = params.signed_by(&key, &issuer.cert, &issuer.key).unwrap();
        let private_key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key.serialize_der()));

        let config = rustls::ServerConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(vec![leaf.der().clone()], private_key)
        .unwrap();
        let config = Arc::new(config);

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let Ok(conn) = rustls::ServerConnection::new(Arc::clone(&config)) else {
                    continue;
                };
                let mut tls = rustls::StreamOwned::new(conn, stream);
                let _ = answer(&mut tls);
            }
        });
        addr
    }

    fn answer(stream: &mut (impl Read + Write)) -> io::Result<()> {
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf)?;
            if n == 0 {
                return Ok(());
            }
            request.extend_from_slice(&buf[..n]);
            if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= end + 4 + length {
                    break;
                }
            }
        }
        stream.write_all(OK_RESPONSE)?;
        stream.flush()
    }

    fn transport_trusting(ca: &TestCa) -> HttpTransport {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ca.pem");
        fs::write(&file, ca.cert.pem()).unwrap();
        HttpTransport::new(TransportConfig::builder().trusted_cert_file(Some(file)).build())
            .unwrap()
    }

    fn signed() -> SignedRequest {
        SignedRequest::new(r#"{"method":"stats","params":{}}"#, "deadbeef")
    }

    #[test]
    fn test_should_load_nothing_by_default() {
        let anchors = load_trust_anchors(&TransportConfig::default()).unwrap();
        assert!(anchors.is_empty());
    }

    #[test]
    fn test_should_load_cert_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ca.pem");
        fs::write(&file, TEST_CA).unwrap();

        let config = TransportConfig::builder().trusted_cert_file(Some(file)).build();
        let anchors = load_trust_anchors(&config).unwrap();

        assert_eq!(anchors.len(), 1);
    }

    #[test]
    fn test_should_load_ca_directory_and_skip_other_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.pem"), TEST_CA).unwrap();
        fs::write(dir.path().join("two.crt"), format!("{TEST_CA}{TEST_CA}")).unwrap();
        fs::write(dir.path().join("README"), "not a certificate").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let config = TransportConfig::builder()
            .trusted_ca_path(Some(dir.path().to_path_buf()))
            .build();
        let anchors = load_trust_anchors(&config).unwrap();

        assert_eq!(anchors.len(), 3);
    }

    #[test]
    fn test_should_reject_missing_cert_file() {
        let config = TransportConfig::builder()
            .trusted_cert_file(Some(PathBuf::from("/nonexistent/ca.pem")))
            .build();
        assert!(matches!(
            load_trust_anchors(&config),
            Err(CentrifugeError::Config(_))
        ));
    }

    #[test]
    fn test_should_reject_cert_file_without_certificates() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("empty.pem");
        fs::write(&file, "").unwrap();

        let config = TransportConfig::builder().trusted_cert_file(Some(file)).build();
        assert!(matches!(
            load_trust_anchors(&config),
            Err(CentrifugeError::Config(_))
        ));
    }

    #[test]
    fn test_should_reject_empty_ca_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = TransportConfig::builder()
            .trusted_ca_path(Some(dir.path().to_path_buf()))
            .build();
        assert!(matches!(
            load_trust_anchors(&config),
            Err(CentrifugeError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_should_trust_server_issued_by_extra_anchor() {
        let ca = test_ca("centrifuge test ca");
        let addr = serve_https(&ca);

        let value = transport_trusting(&ca)
            .communicate(&format!("https://{addr}"), &signed())
            .await
            .unwrap();

        assert_eq!(value["result"], "ok");
    }

    #[tokio::test]
    async fn test_should_still_reject_untrusted_server_with_extra_anchors() {
        let trusted = test_ca("centrifuge test ca");
        let other = test_ca("unrelated ca");
        let addr = serve_https(&other);

        let err = transport_trusting(&trusted)
            .communicate(&format!("https://{addr}"), &signed())
            .await
            .unwrap_err();

        assert!(matches!(err, CentrifugeError::Transport { status: None, .. }));
    }
}
