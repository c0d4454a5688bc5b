/*!
 * TCP Client Tests
 * Per-direction liveness over a scripted socket
 */

mod support;

use io_kernel::{ChannelConfig, NetError, ReadProbe, TcpClient};
use pretty_assertions::assert_eq;
use std::io::ErrorKind;
use support::ScriptedSocket;

fn client(socket: ScriptedSocket) -> TcpClient<ScriptedSocket> {
    TcpClient::from_socket(socket, &ChannelConfig::default())
}

#[test]
fn test_new_client_is_live_both_ways() {
    let (socket, _script) = ScriptedSocket::new();
    let client = client(socket);

    assert!(client.is_open());
    assert!(client.is_read_connected());
    assert!(client.is_write_connected());
    assert!(client.can_write());
}

#[test]
fn test_partial_send_reports_accepted_bytes() {
    let (socket, script) = ScriptedSocket::new();
    script.lock().send_limit = Some(3);
    let mut client = client(socket);

    assert_eq!(client.send(b"abcdef").unwrap(), 3);
    assert_eq!(script.lock().sent, b"abc");
}

#[test]
fn test_send_would_block_is_zero() {
    let (socket, script) = ScriptedSocket::new();
    script.lock().send_would_block = true;
    let mut client = client(socket);

    assert_eq!(client.send(b"abc").unwrap(), 0);
    assert!(client.is_write_connected());
}

#[test]
fn test_send_error_clears_write_flag() {
    let (socket, script) = ScriptedSocket::new();
    script.lock().send_error = Some(ErrorKind::ConnectionReset);
    let mut client = client(socket);

    assert!(matches!(client.send(b"abc"), Err(NetError::Send(_))));
    assert!(!client.is_write_connected());
    assert!(client.is_read_connected());
    assert!(matches!(client.send(b"abc"), Err(NetError::NotConnected)));
}

#[test]
fn test_receive_zero_clears_read_flag() {
    let (socket, script) = ScriptedSocket::new();
    script.lock().peer_closed = true;
    let mut client = client(socket);

    let mut buf = [0u8; 8];
    assert_eq!(client.receive(&mut buf).unwrap(), 0);
    assert!(!client.is_read_connected());
    assert!(client.is_connected());
    assert!(matches!(client.receive(&mut buf), Err(NetError::NotConnected)));
}

#[test]
fn test_receive_would_block_keeps_read_flag() {
    let (socket, _script) = ScriptedSocket::new();
    let mut client = client(socket);

    let mut buf = [0u8; 8];
    assert!(matches!(client.receive(&mut buf), Err(NetError::WouldBlock)));
    assert!(client.is_read_connected());
}

#[test]
fn test_available_and_receive_available() {
    let (socket, script) = ScriptedSocket::with_inbound(b"pending bytes");
    let mut client = client(socket);

    assert_eq!(client.available(), 13);
    assert_eq!(client.receive_available().unwrap(), b"pending bytes");
    assert_eq!(client.available(), 0);
    assert!(client.receive_available().unwrap().is_empty());
    assert_eq!(script.lock().recv_calls, 1);
}

#[test]
fn test_available_capped_at_peek_window() {
    let (socket, _script) = ScriptedSocket::with_inbound(&[0u8; 100]);
    let config = ChannelConfig {
        max_read_chunk: 32,
        ..Default::default()
    };
    let client = TcpClient::from_socket(socket, &config);

    assert_eq!(client.available(), 32);
}

#[test]
fn test_probe_does_not_touch_flags() {
    let (socket, script) = ScriptedSocket::new();
    let mut client = client(socket);

    assert_eq!(client.probe_read_side(), ReadProbe::Idle);

    script.lock().inbound.extend(b"hi");
    assert_eq!(client.probe_read_side(), ReadProbe::Pending(2));

    script.lock().inbound.clear();
    script.lock().peer_closed = true;
    assert_eq!(client.probe_read_side(), ReadProbe::PeerClosed);
    assert!(client.is_read_connected());

    client.close();
    assert_eq!(client.probe_read_side(), ReadProbe::Closed);
}

#[test]
fn test_close_is_idempotent() {
    let (socket, script) = ScriptedSocket::new();
    let mut client = client(socket);

    assert!(client.close());
    assert!(!client.close());
    assert!(!client.is_open());
    assert!(!client.is_connected());
    assert_eq!(client.available(), 0);
    assert_eq!(script.lock().shutdowns, 1);
}

#[test]
fn test_drop_closes_socket() {
    let (socket, script) = ScriptedSocket::new();
    drop(client(socket));
    assert_eq!(script.lock().shutdowns, 1);
}

#[test]
fn test_mark_closed_reports_transition() {
    let (socket, _script) = ScriptedSocket::new();
    let mut client = client(socket);

    assert!(client.mark_read_closed());
    assert!(!client.mark_read_closed());
    assert!(client.is_connected());

    assert!(client.mark_write_closed());
    assert!(!client.is_connected());
    // Flags are cleared but the socket is still held until close
    assert!(client.is_open());
}
