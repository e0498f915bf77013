//! Listener and accept loop.

use std::{
    io,
    net::SocketAddr,
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering},
};

use tokio::{
    io::{BufReader, BufWriter},
    net::{TcpListener, TcpStream},
};
use tracing::{Instrument, info, info_span, warn};

use robot_core::{ByteCursor, Session};

use crate::{
    sink::FsBlobStore,
    supervisor::{Outcome, SupervisorConfig, supervise},
};

/// Port used when none is given on the command line.
pub const DEFAULT_PORT: u16 = 3000;

/// Server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP port to listen on.
    pub port: u16,
    /// Directory receiving transferred photos.
    pub photo_dir: PathBuf,
    /// Watchdog limits applied to every connection.
    pub supervisor: SupervisorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            photo_dir: PathBuf::from("."),
            supervisor: SupervisorConfig::default(),
        }
    }
}

/// Listening server, accepting one supervised session per connection.
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    listener: TcpListener,
    sessions: AtomicU64,
}

impl Server {
    /// Bind the listening socket.
    pub async fn bind(config: ServerConfig) -> io::Result<Self> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "listening");
        Ok(Self { config, listener, sessions: AtomicU64::new(0) })
    }

    /// Address actually bound; differs from the configured one when the
    /// port was 0.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections forever, one handler task each.
    ///
    /// Accept failures are logged and do not stop the loop; only losing
    /// the listening socket itself would end it, by never returning
    /// otherwise.
    pub async fn run(self) -> io::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let id = self.sessions.fetch_add(1, Ordering::Relaxed) + 1;
                    info!(session = id, %peer, "connection accepted");
                    let config = self.config.clone();
                    tokio::spawn(
                        async move {
                            handle_connection(id, stream, &config).await;
                        }
                        .instrument(info_span!("session", id)),
                    );
                },
                Err(error) => warn!(%error, "accept failed"),
            }
        }
    }
}

/// Serve one accepted connection to completion, timeout, or failure.
async fn handle_connection(id: u64, stream: TcpStream, config: &ServerConfig) {
    let (reader, writer) = stream.into_split();
    let mut cursor = ByteCursor::new(BufReader::new(reader));
    let mut writer = BufWriter::new(writer);

    let store = FsBlobStore::new(&config.photo_dir, id);
    let mut session = Session::new(id, store);

    match supervise(&config.supervisor, &mut session, &mut cursor, &mut writer).await {
        Outcome::Completed(Ok(())) => info!(session = id, "session closed"),
        Outcome::Completed(Err(error)) => warn!(session = id, %error, "session aborted"),
        Outcome::TimedOut => {},
    }
    // Dropping the halves closes the socket.
}
