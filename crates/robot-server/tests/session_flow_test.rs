//! End-to-end protocol flows over real sockets.
//!
//! Each test binds a server on an ephemeral port, connects as a robot
//! client, and asserts the exact status lines coming back, plus what the
//! photo directory holds afterwards.

use std::{net::SocketAddr, path::Path, time::Duration};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};

use robot_server::{Server, ServerConfig, SupervisorConfig};

async fn start_server(photo_dir: &Path, deadline: Duration) -> SocketAddr {
    let config = ServerConfig {
        port: 0,
        photo_dir: photo_dir.to_path_buf(),
        supervisor: SupervisorConfig { deadline },
    };
    let server = Server::bind(config).await.expect("bind ephemeral port");
    let addr = server.local_addr().expect("local addr");
    tokio::spawn(server.run());
    addr
}

async fn connect(addr: SocketAddr) -> TcpStream {
    TcpStream::connect(("127.0.0.1", addr.port())).await.expect("connect")
}

async fn expect_line(stream: &mut TcpStream, expected: &str) {
    let mut buffer = vec![0_u8; expected.len() + 2];
    stream.read_exact(&mut buffer).await.expect("status line");
    let mut wanted = expected.as_bytes().to_vec();
    wanted.extend_from_slice(b"\r\n");
    assert_eq!(buffer, wanted, "expected `{expected}`");
}

async fn expect_eof(stream: &mut TcpStream) {
    let mut buffer = [0_u8; 1];
    assert_eq!(stream.read(&mut buffer).await.expect("read"), 0, "expected close");
}

async fn login(stream: &mut TcpStream, identifier: &str, password: &str) {
    expect_line(stream, "200 LOGIN").await;
    stream.write_all(identifier.as_bytes()).await.expect("identifier");
    stream.write_all(b"\r\n").await.expect("crlf");
    expect_line(stream, "201 PASSWORD").await;
    stream.write_all(password.as_bytes()).await.expect("password");
    stream.write_all(b"\r\n").await.expect("crlf");
}

#[tokio::test]
async fn full_session_with_photo_transfers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = start_server(dir.path(), Duration::from_secs(45)).await;
    let mut stream = connect(addr).await;

    // "Robot99" sums to 632.
    login(&mut stream, "Robot99", "632").await;
    expect_line(&mut stream, "202 OK").await;

    stream.write_all(b"INFO hello robot\r\n").await.expect("info");
    expect_line(&mut stream, "202 OK").await;

    // 1 + 2 + 3 = 6, trailer 0006.
    stream.write_all(b"FOTO 3 ").await.expect("foto header");
    stream.write_all(&[0x01, 0x02, 0x03]).await.expect("payload");
    stream.write_all(b"0006").await.expect("trailer");
    expect_line(&mut stream, "202 OK").await;
    let stored = std::fs::read(dir.path().join("photo-1-1.jpg")).expect("stored photo");
    assert_eq!(stored, vec![0x01, 0x02, 0x03]);

    // Same payload, wrong trailer: rejected and deleted, session lives.
    stream.write_all(b"FOTO 3 ").await.expect("foto header");
    stream.write_all(&[0x01, 0x02, 0x03]).await.expect("payload");
    stream.write_all(b"9999").await.expect("trailer");
    expect_line(&mut stream, "300 BAD CHECKSUM").await;
    assert!(!dir.path().join("photo-1-2.jpg").exists());

    stream.write_all(b"INFO still alive\r\n").await.expect("info");
    expect_line(&mut stream, "202 OK").await;

    // Closing our half lands the token read on end-of-stream.
    stream.shutdown().await.expect("shutdown");
    expect_line(&mut stream, "501 SYNTAX ERROR").await;
    expect_eof(&mut stream).await;
}

#[tokio::test]
async fn failed_login_closes_the_connection() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = start_server(dir.path(), Duration::from_secs(45)).await;
    let mut stream = connect(addr).await;

    login(&mut stream, "Robot99", "631").await;
    expect_line(&mut stream, "500 LOGIN FAILED").await;
    expect_eof(&mut stream).await;
}

#[tokio::test]
async fn malformed_command_closes_the_connection() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = start_server(dir.path(), Duration::from_secs(45)).await;
    let mut stream = connect(addr).await;

    login(&mut stream, "Robot99", "632").await;
    expect_line(&mut stream, "202 OK").await;

    stream.write_all(b"XORO nope\r\n").await.expect("bad command");
    expect_line(&mut stream, "501 SYNTAX ERROR").await;
    expect_eof(&mut stream).await;
}

#[tokio::test]
async fn silent_connection_is_timed_out() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = start_server(dir.path(), Duration::from_millis(100)).await;
    let mut stream = connect(addr).await;

    expect_line(&mut stream, "200 LOGIN").await;
    // Say nothing; the watchdog speaks next.
    expect_line(&mut stream, "502 TIMEOUT").await;
    expect_eof(&mut stream).await;
}

#[tokio::test]
async fn concurrent_sessions_store_under_distinct_names() {
    let dir = tempfile::tempdir().expect("tempdir");
    let addr = start_server(dir.path(), Duration::from_secs(45)).await;

    // Read each greeting before connecting the next client so session
    // ids are assigned in a known order.
    let mut first = connect(addr).await;
    login(&mut first, "Robot99", "632").await;
    expect_line(&mut first, "202 OK").await;

    let mut second = connect(addr).await;
    login(&mut second, "Robot99", "632").await;
    expect_line(&mut second, "202 OK").await;

    for stream in [&mut first, &mut second] {
        stream.write_all(b"FOTO 2 ").await.expect("foto header");
        stream.write_all(&[0x10, 0x20]).await.expect("payload");
        stream.write_all(b"0030").await.expect("trailer");
        expect_line(stream, "202 OK").await;
    }

    assert_eq!(std::fs::read(dir.path().join("photo-1-1.jpg")).expect("first"), vec![0x10, 0x20]);
    assert_eq!(std::fs::read(dir.path().join("photo-2-1.jpg")).expect("second"), vec![0x10, 0x20]);
}
