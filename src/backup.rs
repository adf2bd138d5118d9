//! Remote backup client
//!
//! Severe records are copied to a remote endpoint over a plain TCP stream:
//! connect, write the record bytes verbatim, close. There is no framing
//! beyond the connection itself. Shipping runs on the backup thread pool,
//! never on a producer thread; failures are reported to stderr and the
//! record is dropped remotely, the local copy is unaffected.

use std::io::Write;
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::time::Duration;

/// Connect attempts before a record is given up on.
pub const CONNECT_ATTEMPTS: u32 = 5;

const WRITE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackupConfig {
    pub addr: Ipv4Addr,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct BackupClient {
    endpoint: SocketAddr,
}

impl BackupClient {
    pub fn new(config: BackupConfig) -> Self {
        Self {
            endpoint: SocketAddr::from((config.addr, config.port)),
        }
    }

    pub fn endpoint(&self) -> SocketAddr {
        self.endpoint
    }

    /// Ship one record. Returns normally on success and on exhausted
    /// retries; the caller has nothing to recover.
    pub fn ship(&self, record: &[u8]) {
        let mut stream = None;
        for attempt in 1..=CONNECT_ATTEMPTS {
            match TcpStream::connect(self.endpoint) {
                Ok(connected) => {
                    stream = Some(connected);
                    break;
                }
                Err(e) => {
                    eprintln!(
                        "[fanlog] backup connect to {} failed (attempt {}/{}): {}",
                        self.endpoint, attempt, CONNECT_ATTEMPTS, e
                    );
                }
            }
        }
        let Some(mut stream) = stream else {
            eprintln!(
                "[fanlog] backup endpoint {} unreachable, record dropped remotely",
                self.endpoint
            );
            return;
        };

        let _ = stream.set_write_timeout(Some(WRITE_TIMEOUT));
        let _ = stream.set_nodelay(true);
        if let Err(e) = stream.write_all(record) {
            eprintln!("[fanlog] backup write to {} failed: {}", self.endpoint, e);
        }
        // Dropping the stream closes the connection; that is the framing.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_ship_delivers_record_verbatim() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            let mut received = Vec::new();
            conn.read_to_end(&mut received).unwrap();
            received
        });

        let client = BackupClient::new(BackupConfig {
            addr: Ipv4Addr::LOCALHOST,
            port,
        });
        client.ship(b"[12:00:00][ThreadId(1)][FATAL][L1][f.c:1]\tboom\n");

        let received = server.join().unwrap();
        assert_eq!(
            received,
            b"[12:00:00][ThreadId(1)][FATAL][L1][f.c:1]\tboom\n"
        );
    }

    #[test]
    fn test_unreachable_endpoint_returns_after_retries() {
        // Nothing listens here; ship must come back instead of hanging.
        let client = BackupClient::new(BackupConfig {
            addr: Ipv4Addr::LOCALHOST,
            port: 1,
        });
        client.ship(b"dropped\n");
    }

    #[test]
    fn test_one_connection_per_record() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let mut payloads = Vec::new();
            for _ in 0..2 {
                let (mut conn, _) = listener.accept().unwrap();
                let mut buf = Vec::new();
                conn.read_to_end(&mut buf).unwrap();
                payloads.push(buf);
            }
            payloads
        });

        let client = BackupClient::new(BackupConfig {
            addr: Ipv4Addr::LOCALHOST,
            port,
        });
        client.ship(b"first\n");
        client.ship(b"second\n");

        let payloads = server.join().unwrap();
        assert_eq!(payloads, vec![b"first\n".to_vec(), b"second\n".to_vec()]);
    }
}
