#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use barrage_client::config::{HeartbeatSection, ReaderSection, ServerSection};
use barrage_client::session::{ConnState, Connection};
use barrage_client::slot::BarrageSlot;
use barrage_core::protocol::frame::MSG_TYPE_C2S;
use common::{fast_server, read_client_frame, write_frame};

#[tokio::test]
async fn login_join_logout_sequence() {
    let (client_io, mut server) = duplex(4096);
    let mut conn = Connection::from_stream(client_io, fast_server());
    assert_eq!(conn.state(), ConnState::Connected);

    let server_task = tokio::spawn(async move {
        let login = read_client_frame(&mut server).await;
        assert_eq!(login.body, "type@=loginreq/roomid@=12345/");
        assert_eq!(login.msg_type, MSG_TYPE_C2S);
        write_frame(&mut server, "type@=loginres/userid@=0/").await;

        let join = read_client_frame(&mut server).await;
        assert_eq!(join.body, "type@=joingroup/gid@=-9999/rid@=12345/");

        let logout = read_client_frame(&mut server).await;
        assert_eq!(logout.body, "type@=logout/");

        // transport closed after logout, nothing else follows
        let mut rest = Vec::new();
        server.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    });

    let resp = conn.login("12345").await.unwrap();
    assert!(resp.starts_with("type@=loginres/"));
    assert_eq!(conn.state(), ConnState::LoggedIn);

    conn.join_group("12345").await.unwrap();
    assert_eq!(conn.state(), ConnState::Joined);

    conn.shutdown().await.unwrap();
    assert_eq!(conn.state(), ConnState::Closed);

    // second shutdown is a no-op: no second logout on the wire
    conn.shutdown().await.unwrap();

    server_task.await.unwrap();
}

#[tokio::test]
async fn silent_server_fails_login() {
    let (client_io, mut server) = duplex(4096);
    let server_cfg = ServerSection {
        login_timeout_ms: 100,
        ..fast_server()
    };
    let mut conn = Connection::from_stream(client_io, server_cfg);

    let server_task = tokio::spawn(async move {
        let login = read_client_frame(&mut server).await;
        assert_eq!(login.body, "type@=loginreq/roomid@=1/");
        server
    });

    let err = conn.login("1").await.unwrap_err();
    assert_eq!(err.code().as_str(), "AUTH_FAILED");
    assert_eq!(conn.state(), ConnState::Connected);

    let _server = server_task.await.unwrap();
}

#[tokio::test]
async fn zero_length_login_response_fails_login() {
    let (client_io, mut server) = duplex(4096);
    let mut conn = Connection::from_stream(client_io, fast_server());

    let server_task = tokio::spawn(async move {
        read_client_frame(&mut server).await;
        server.write_all(&0u32.to_le_bytes()).await.unwrap();
        server
    });

    let err = conn.login("1").await.unwrap_err();
    assert_eq!(err.code().as_str(), "AUTH_FAILED");

    let _server = server_task.await.unwrap();
}

#[test]
fn states_advance_in_one_line() {
    let mut walked = vec![ConnState::default()];
    while let Some(next) = walked.last().and_then(|s| s.next()) {
        walked.push(next);
    }
    let names: Vec<_> = walked.iter().map(|s| s.as_str()).collect();
    assert_eq!(
        names,
        ["disconnected", "connected", "logged_in", "joined", "running", "closed"]
    );
}

#[tokio::test]
async fn new_connection_starts_after_disconnected() {
    let (client_io, _server) = duplex(64);
    let conn = Connection::from_stream(client_io, fast_server());
    assert_eq!(Some(conn.state()), ConnState::Disconnected.next());
}

#[tokio::test]
async fn out_of_order_calls_are_rejected() {
    let (client_io, _server) = duplex(4096);
    let mut conn = Connection::from_stream(client_io, fast_server());

    let err = conn.join_group("1").await.unwrap_err();
    assert_eq!(err.code().as_str(), "INVALID_STATE");

    let err = conn
        .enter_running(
            &HeartbeatSection::default(),
            &ReaderSection::default(),
            BarrageSlot::new(),
            CancellationToken::new(),
        )
        .err()
        .expect("running before join must fail");
    assert_eq!(err.code().as_str(), "INVALID_STATE");
    assert_eq!(conn.state(), ConnState::Connected);
}

#[tokio::test]
async fn no_transition_after_close() {
    let (client_io, _server) = duplex(4096);
    let mut conn = Connection::from_stream(client_io, fast_server());

    conn.shutdown().await.unwrap();
    let err = conn.login("1").await.unwrap_err();
    assert_eq!(err.code().as_str(), "INVALID_STATE");
}

#[tokio::test]
async fn dial_failure_is_connect_error() {
    // bind then drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let server_cfg = ServerSection {
        address: addr.to_string(),
        ..fast_server()
    };
    let err = Connection::dial(&server_cfg).await.err().expect("dial must fail");
    assert_eq!(err.code().as_str(), "CONNECT_FAILED");
}

#[tokio::test]
async fn dial_and_login_over_tcp() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server_task = tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let login = read_client_frame(&mut sock).await;
        assert_eq!(login.body, "type@=loginreq/roomid@=9/");
        write_frame(&mut sock, "type@=loginres/").await;
        let logout = read_client_frame(&mut sock).await;
        assert_eq!(logout.body, "type@=logout/");
    });

    let server_cfg = ServerSection {
        address: addr.to_string(),
        ..fast_server()
    };
    let mut conn = Connection::dial(&server_cfg).await.unwrap();
    assert_eq!(conn.state(), ConnState::Connected);
    conn.login("9").await.unwrap();
    conn.shutdown().await.unwrap();

    server_task.await.unwrap();
}
