pub mod handler;

use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crate::prober::prelude::*;

/// Accept loop for the probe endpoint. One tokio task per connection; the
/// prober is shared read-only behind an Arc, so calls never interfere.
pub async fn serve(listen_addr: &str, prober: Prober) -> std::io::Result<()> {
    let listener = TcpListener::bind(listen_addr).await?;
    log::info!("Listening on {listen_addr}");

    let prober = Arc::new(prober);

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                log::warn!("Accept failed: {err}");
                continue;
            }
        };

        let io = TokioIo::new(stream);
        let prober = prober.clone();

        tokio::spawn(async move {
            let service = service_fn(move |req| handler::handle(req, prober.clone()));
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                log::debug!("Connection from {peer} ended: {err}");
            }
        });
    }
}
