//! Basalt: a minimal Minecraft server entry layer.
//!
//! Accepts TCP connections and drives each one through the protocol's
//! handshake into the status or login phase. Everything protocol-shaped
//! lives in `basalt-mc`; this binary is transport and configuration glue.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{Instrument, debug, error, info, info_span};

use basalt_mc::frame::FrameBuffer;
use basalt_mc::{Connection, StatusPayload};

mod config;
mod utils;

use config::Config;

/// Transport read buffer size.
const READ_BUF_SIZE: usize = 4096;

/// Session counter for logging.
static SESSION_COUNTER: AtomicUsize = AtomicUsize::new(0);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let config = Config::from_env()?;
    let status = Arc::new(config.status);

    let listener = TcpListener::bind(&config.listen_addr).await?;
    info!("Listening on {}", config.listen_addr);

    loop {
        match listener.accept().await {
            Ok((client, client_addr)) => {
                let status = Arc::clone(&status);
                tokio::spawn(async move {
                    handle_connection(client, client_addr, status).await;
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {e}");
            }
        }
    }
}

/// Drive one client connection until it closes or errors.
///
/// Bytes are accumulated until a whole frame is available, then dispatched
/// against the connection's active stage. Any protocol error tears the
/// connection down without a reply.
async fn handle_connection(
    mut client: TcpStream,
    client_addr: SocketAddr,
    status: Arc<StatusPayload>,
) {
    let session_id = SESSION_COUNTER.fetch_add(1, Ordering::SeqCst);

    async {
        let mut conn = Connection::new(status);
        let mut frames = FrameBuffer::new();
        let mut chunk = [0u8; READ_BUF_SIZE];

        loop {
            let n = match client.read(&mut chunk).await {
                Ok(0) => {
                    debug!("Client closed connection");
                    return;
                }
                Ok(n) => n,
                Err(e) => {
                    debug!("Read error: {e}");
                    return;
                }
            };

            frames.extend(&chunk[..n]);

            loop {
                let frame = match frames.next_frame() {
                    Ok(Some(frame)) => frame,
                    Ok(None) => break,
                    Err(e) => {
                        debug!("Closing connection: {e}");
                        return;
                    }
                };

                let responses = match conn.feed(&frame) {
                    Ok(responses) => responses,
                    Err(e) => {
                        debug!("Closing connection: {e}");
                        return;
                    }
                };

                for response in responses {
                    if let Err(e) = client.write_all(&response).await {
                        debug!("Write error: {e}");
                        return;
                    }
                }
            }
        }
    }
    .instrument(info_span!(
        "conn",
        sid = session_id,
        ip = %client_addr.ip(),
        port = client_addr.port()
    ))
    .await;
}
