/*!
 * I/O Kernel - Loopback Demo
 *
 * Starts a local echo peer, stages a few messages in a buffered channel and
 * drives it with a minimal readiness loop until every byte comes back.
 */

use anyhow::{anyhow, bail, Context, Result};
use io_kernel::{
    init_tracing, span_channel, BufferedTcpClient, ChannelConfig, NetworkHost, ReadProbe,
};
use std::io;
use std::net::TcpListener;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

const MESSAGES: [&str; 3] = ["hello ", "through a ", "buffered channel"];

fn main() -> Result<()> {
    init_tracing();

    let config = ChannelConfig::from_env();

    let listener = TcpListener::bind("127.0.0.1:0").context("Failed to bind echo listener")?;
    let addr = listener.local_addr()?;
    let echo = thread::spawn(move || -> io::Result<u64> {
        let (stream, _) = listener.accept()?;
        let mut reader = stream.try_clone()?;
        let mut writer = stream;
        io::copy(&mut reader, &mut writer)
    });

    let channel = BufferedTcpClient::connect(&NetworkHost::from(addr), &config)
        .with_context(|| format!("Failed to connect to echo peer at {}", addr))?
        .with_read_closed_hook(|_| info!("Echo peer closed its side"));
    let _span = span_channel(channel.peer_addr()).entered();

    let mut expected = 0;
    for message in MESSAGES {
        expected += channel.queue_write_str(message)?;
    }
    info!(pending = channel.pending_outbound(), "Messages staged");

    // Stand-in for a real readiness notifier
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut echoed = Vec::with_capacity(expected);
    while echoed.len() < expected {
        if Instant::now() > deadline {
            bail!("Timed out with {}/{} bytes echoed", echoed.len(), expected);
        }
        if channel.pending_outbound() > 0 {
            channel.on_writable();
        }
        match channel.probe_read_side() {
            ReadProbe::Pending(_) | ReadProbe::PeerClosed => channel.on_readable(),
            _ => thread::sleep(Duration::from_millis(1)),
        }
        echoed.extend_from_slice(&channel.queue_read_bytes(usize::MAX));
        if !channel.is_connected() {
            bail!("Channel closed after {}/{} bytes", echoed.len(), expected);
        }
    }

    info!(echoed = %String::from_utf8_lossy(&echoed), "Echo complete");
    channel.close();

    let copied = echo
        .join()
        .map_err(|_| anyhow!("Echo thread panicked"))?
        .context("Echo peer failed")?;
    info!(copied, "Echo peer finished");

    println!("{}", serde_json::to_string_pretty(&channel.stats())?);
    Ok(())
}
