use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::wire::Envelope;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Accepts inbound flooding connections and routes each newline-delimited
/// envelope to the dispatcher. One task per connection; a connection stays
/// open for as many messages as the sending peer cares to push down it
/// (the broadcaster opens a fresh connection per message on the sending
/// side, but nothing here requires that).
pub async fn serve(address: &str, dispatcher: Arc<Dispatcher>) -> Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| crate::error::NetworkError::Io(e.to_string()))?;
    info!(%address, "gossip listener bound");

    loop {
        let (socket, peer_addr) = match listener.accept().await {
            Ok(pair) => pair,
            Err(err) => {
                warn!(error = %err, "failed to accept inbound connection");
                continue;
            }
        };
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            if let Err(err) = handle_connection(socket, dispatcher).await {
                warn!(peer = %peer_addr, error = %err, "inbound connection ended with an error");
            }
        });
    }
}

async fn handle_connection(
    socket: tokio::net::TcpStream,
    dispatcher: Arc<Dispatcher>,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(socket);
    let mut line = String::new();
    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            return Ok(());
        }
        let envelope = match Envelope::from_line(&line) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(error = %err, "dropping malformed inbound envelope");
                continue;
            }
        };
        if let Err(err) = dispatcher.dispatch_envelope(&envelope.endpoint, envelope.payload).await {
            warn!(endpoint = %envelope.endpoint, error = %err, "inbound message rejected");
        }
    }
}
