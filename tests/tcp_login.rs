use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use tacacs_plus_auth::protocol::authentication::{Reply, ReplyFlags, Start, Status};
use tacacs_plus_auth::protocol::{HeaderInfo, Packet};
use tacacs_plus_auth::{AuthOutcome, Client, ClientConfig, FailureReason, SessionContext};

const SECRET: &[u8] = b"a shared secret of sufficient length";

/// Accepts one connection, checks the start packet and answers it with `status`.
///
/// Returns the decoded start packet from the join handle so tests can inspect it.
fn spawn_server(status: Status, message: &'static str) -> (u16, thread::JoinHandle<Packet<Start>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("couldn't bind test listener");
    let port = listener
        .local_addr()
        .expect("listener should have a local address")
        .port();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("client never connected");
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("couldn't set server read timeout");

        let mut header_bytes = [0; HeaderInfo::SIZE];
        stream
            .read_exact(&mut header_bytes)
            .expect("couldn't read start packet header");
        let header = HeaderInfo::decode(&header_bytes).expect("start packet header should decode");

        let mut packet_bytes = header_bytes.to_vec();
        packet_bytes.resize(HeaderInfo::SIZE + header.length as usize, 0);
        stream
            .read_exact(&mut packet_bytes[HeaderInfo::SIZE..])
            .expect("couldn't read start packet body");

        let start = Packet::<Start>::from_wire_bytes(&packet_bytes, SECRET)
            .expect("client sent an invalid start packet");

        let mut reply_header = *start.header();
        reply_header.sequence_number += 1;
        let reply = Packet::new(
            reply_header,
            Reply::new(status, ReplyFlags::empty(), message, Vec::new())
                .expect("reply body should be valid"),
            SECRET,
        )
        .expect("reply packet should be valid");

        stream
            .write_all(&reply.to_wire_bytes())
            .expect("couldn't write reply");

        start
    });

    (port, handle)
}

fn config(port: u16) -> ClientConfig {
    ClientConfig::builder()
        .server("127.0.0.1")
        .port(port)
        .secret(SECRET)
        .timeout(Duration::from_secs(5))
        .build()
        .expect("test configuration should be valid")
}

#[test]
fn ascii_login_success() {
    let (port, server) = spawn_server(Status::Pass, "welcome");
    let mut client = Client::new(config(port));

    let context = SessionContext::builder("someuser")
        .port("tty1")
        .remote_address("10.0.0.7")
        .build();
    let outcome = client.authenticate(&context, "hunter2");

    assert_eq!(
        outcome,
        AuthOutcome::Success {
            server_message: "welcome".to_owned(),
            data: Vec::new(),
        },
        "authentication failed, full outcome: {outcome:?}"
    );

    let start = server.join().expect("server thread panicked");
    let body = start.body();
    assert_eq!(body.user_information().user(), "someuser");
    assert_eq!(body.user_information().port(), "tty1");
    assert_eq!(body.user_information().remote_address(), "10.0.0.7");
    assert_eq!(body.data(), b"hunter2");
}

#[test]
fn ascii_login_rejected() {
    let (port, server) = spawn_server(Status::Fail, "Authentication failed");
    let mut client = Client::new(config(port));

    let outcome = client.authenticate(&SessionContext::builder("someuser").build(), "wrong");

    assert_eq!(outcome.reason(), Some(FailureReason::AuthenticationRejected));
    assert_eq!(outcome.server_message(), "Authentication failed");
    server.join().expect("server thread panicked");
}

#[test]
fn unreachable_server_is_transport_failure() {
    // grab a free port, then close it again so nothing is listening there
    let port = TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("couldn't reserve a port")
        .port();

    let mut client = Client::new(config(port));
    let outcome = client.authenticate(&SessionContext::builder("someuser").build(), "hunter2");

    assert_eq!(outcome.reason(), Some(FailureReason::Transport));
    assert_eq!(outcome.server_message(), "");
}
