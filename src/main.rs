use bytes::Bytes;
use tokio::io::AsyncReadExt;

use framecast::config::Config;
use framecast::sink::WebsocketServerSink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let mut sink = WebsocketServerSink::new(cfg);
    sink.start().await?;

    tokio::select! {
        res = forward_stdin(&sink) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    sink.stop().await;
    Ok(())
}

/// Feeds the sink from stdin: each chunk read is forwarded as one frame, so
/// the upstream stage is expected to write one encoded frame per chunk.
async fn forward_stdin(sink: &WebsocketServerSink) -> anyhow::Result<()> {
    let mut stdin = tokio::io::stdin();
    let mut buf = vec![0u8; 64 * 1024];

    loop {
        let n = stdin.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        sink.render(Bytes::copy_from_slice(&buf[..n])).await;
    }

    // Upstream is done; keep serving the viewer page until interrupted.
    tracing::info!("stdin closed, no more frames");
    std::future::pending::<()>().await;
    Ok(())
}
