use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{CryptoProvider, verify_tls12_signature, verify_tls13_signature};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, ClientConnection, DigitallySignedStruct, SignatureScheme, StreamOwned};
use std::net::TcpStream;
use std::sync::Arc;
use tracing::{debug, error};

const SECONDS_PER_DAY: i64 = 86_400;

/// TLS certificate expiry check: handshake with `<host>:<port>` and report the
/// whole days left before the leaf certificate's `notAfter`.
///
/// The peer certificate is read, not trusted. Expired, self-signed and
/// mismatched certificates still yield a day count.
#[derive(Debug, Clone)]
pub struct CertCheck {
    port: u16,
    tls: Arc<ClientConfig>,
}

impl CertCheck {
    pub fn new(port: u16) -> Result<Self> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());

        let tls = ClientConfig::builder_with_provider(Arc::clone(&provider))
            .with_safe_default_protocol_versions()
            .context("failed to configure TLS protocol versions")?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AnyCertificate { provider }))
            .with_no_client_auth();

        Ok(Self {
            port,
            tls: Arc::new(tls),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Fetch the leaf certificate's expiry time
    pub fn expiry(&self, host: &str) -> Result<DateTime<Utc>> {
        let server_name = ServerName::try_from(host)
            .map_err(|err| anyhow!("invalid server name {host}: {err}"))?
            .to_owned();
        let session = ClientConnection::new(Arc::clone(&self.tls), server_name)
            .context("failed to create TLS session")?;
        let socket = TcpStream::connect((host, self.port))
            .with_context(|| format!("failed to connect to {host}:{}", self.port))?;

        let mut stream = StreamOwned::new(session, socket);
        while stream.conn.is_handshaking() {
            stream
                .conn
                .complete_io(&mut stream.sock)
                .with_context(|| format!("TLS handshake with {host} failed"))?;
        }

        let leaf = stream
            .conn
            .peer_certificates()
            .and_then(|chain| chain.first())
            .ok_or_else(|| anyhow!("{host} presented no certificate"))?;

        not_after(leaf.as_ref())
    }

    pub fn days_to_expiry(&self, host: &str) -> Result<i64> {
        Ok(days_until(self.expiry(host)?, Utc::now()))
    }

    pub fn check(&self, host: &str) {
        match self.days_to_expiry(host) {
            Ok(days) => debug!("{host}: days until certificate expiry: {days}"),
            Err(err) => error!("{host}: certificate check error ({err:#})"),
        }
    }
}

/// Accepts whatever chain the server presents; handshake signatures are
/// still checked so the certificate read is the one the server holds a key for.
#[derive(Debug)]
struct AnyCertificate {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

/// Expiry (`notAfter`) of a DER-encoded X.509 certificate
pub fn not_after(der: &[u8]) -> Result<DateTime<Utc>> {
    let (_, certificate) = x509_parser::parse_x509_certificate(der)
        .map_err(|err| anyhow!("failed to parse certificate: {err}"))?;
    let timestamp = certificate.validity().not_after.timestamp();
    DateTime::from_timestamp(timestamp, 0)
        .ok_or_else(|| anyhow!("certificate expiry {timestamp} is out of range"))
}

/// Whole days from `now` until `expiry`, rounded toward negative infinity
pub fn days_until(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expiry - now).num_seconds().div_euclid(SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rcgen::{CertificateParams, KeyPair, date_time_ymd};
    use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
    use rustls::{ServerConfig, ServerConnection};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serve one TLS handshake on 127.0.0.1 with a self-signed certificate
    /// for `name`, valid for the given (year, month, day) range.
    fn serve_certificate(
        name: &str,
        not_before: (i32, u8, u8),
        not_after: (i32, u8, u8),
    ) -> (u16, JoinHandle<()>) {
        let mut params = CertificateParams::new(vec![name.to_string()]).unwrap();
        params.not_before = date_time_ymd(not_before.0, not_before.1, not_before.2);
        params.not_after = date_time_ymd(not_after.0, not_after.1, not_after.2);
        let key = KeyPair::generate().unwrap();
        let certificate = params.self_signed(&key).unwrap();

        let config = ServerConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(
            vec![certificate.der().clone()],
            PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key.serialize_der())),
        )
        .unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            let mut session = ServerConnection::new(Arc::new(config)).unwrap();
            while session.is_handshaking() {
                if session.complete_io(&mut socket).is_err() {
                    break;
                }
            }
        });

        (port, server)
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_days_until_counts_whole_days() {
        let now = at(2025, 1, 1, 12);
        assert_eq!(days_until(at(2025, 1, 31, 12), now), 30);
        assert_eq!(days_until(at(2025, 1, 31, 11), now), 29);
        assert_eq!(days_until(now + Duration::hours(23), now), 0);
    }

    #[test]
    fn test_days_until_floors_expired_certificates() {
        let now = at(2025, 1, 1, 12);
        assert_eq!(days_until(now - Duration::hours(1), now), -1);
        assert_eq!(days_until(at(2024, 12, 30, 12), now), -2);
    }

    #[test]
    fn test_not_after_rejects_garbage() {
        assert!(not_after(b"definitely not DER").is_err());
    }

    #[test]
    fn test_invalid_server_name_fails_before_connecting() {
        let check = CertCheck::new(443).unwrap();
        let err = check.days_to_expiry("not a host").unwrap_err();
        assert!(format!("{err:#}").contains("invalid server name"));
        check.check("not a host");
    }

    #[test]
    fn test_expired_certificate_reports_negative_days() {
        let (port, server) = serve_certificate("localhost", (2019, 1, 1), (2020, 1, 1));

        let days = CertCheck::new(port)
            .unwrap()
            .days_to_expiry("127.0.0.1")
            .expect("expired certificate must still be read");
        server.join().unwrap();

        assert!(days < 0, "expected negative days, got {days}");
    }

    #[test]
    fn test_untrusted_certificate_for_other_name_is_read() {
        let (port, server) = serve_certificate("example.invalid", (2024, 1, 1), (2099, 1, 1));

        let days = CertCheck::new(port)
            .unwrap()
            .days_to_expiry("127.0.0.1")
            .expect("self-signed certificate must still be read");
        server.join().unwrap();

        assert!(days > 0, "expected positive days, got {days}");
    }
}
