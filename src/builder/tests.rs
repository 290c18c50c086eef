use super::*;
use crate::protocol::authentication::{ReplyFlags, Status};
use crate::protocol::{MinorVersion, Serialize};

#[test]
fn start_builder_alice() {
    let packet = StartPacketBuilder::new()
        .secret(b"secretkey")
        .username("alice")
        .password("wonderland")
        .session_id(0xaabbccdd)
        .build()
        .expect("start packet should build");

    let header = packet.header();
    assert_eq!(header.sequence_number, 1);
    assert_eq!(header.session_id, 0xaabbccdd);
    assert_eq!(header.flags, PacketFlags::empty());
    assert_eq!(header.version.minor(), MinorVersion::Default);
    assert_eq!(header.length, 23);

    let body = packet.body();
    assert_eq!(body.action(), Action::Login);
    assert_eq!(body.user_information().user(), "alice");
    assert_eq!(body.data(), b"wonderland");

    assert_eq!(
        packet.to_wire_bytes()[..12],
        [0xc0, 0x01, 1, 0, 0xaa, 0xbb, 0xcc, 0xdd, 0, 0, 0, 23]
    );
}

#[test]
fn start_builder_pap_uses_minor_version_one() {
    let packet = StartPacketBuilder::new()
        .secret(b"key")
        .username("bob")
        .password("hunter2")
        .port("tty1")
        .remote_address("192.0.2.1")
        .authentication_type(AuthenticationType::Pap)
        .privilege_level(PrivilegeLevel::of(15).expect("privilege level 15 should be valid"))
        .session_id(7)
        .build()
        .expect("PAP start packet should build");

    assert_eq!(packet.header().version.minor(), MinorVersion::V1);
    assert_eq!(
        packet.body().authentication().authentication_type,
        AuthenticationType::Pap
    );
    assert_eq!(packet.body().user_information().port(), "tty1");
}

#[test]
fn start_builder_requires_session_id() {
    let result = StartPacketBuilder::new()
        .secret(b"key")
        .username("nobody")
        .build();

    assert_eq!(result.err(), Some(BuildError::MissingSessionId));
}

#[test]
fn start_builder_rejects_later_sequence_numbers() {
    let result = StartPacketBuilder::new()
        .secret(b"key")
        .session_id(1)
        .sequence_number(3)
        .build();

    assert_eq!(result.err(), Some(BuildError::InvalidSequenceNumber(3)));
}

#[test]
fn start_builder_rejects_long_password() {
    let result = StartPacketBuilder::new()
        .secret(b"key")
        .session_id(1)
        .password(&"*".repeat(300))
        .build();

    assert_eq!(
        result.err(),
        Some(BuildError::InvalidField(InvalidField::TooLong("data")))
    );
}

#[test]
fn start_builder_without_secret_is_unencrypted() {
    let packet = StartPacketBuilder::new()
        .username("plain")
        .password("text")
        .session_id(99)
        .build()
        .expect("start packet should build");

    assert!(packet.header().flags.contains(PacketFlags::UNENCRYPTED));
    assert_eq!(packet.to_wire_bytes()[12..], packet.body().to_bytes());
}

#[test]
fn start_builder_empty_secret_is_unencrypted() {
    let packet = StartPacketBuilder::new()
        .secret(b"")
        .username("plain")
        .session_id(99)
        .build()
        .expect("start packet should build");

    assert!(packet.header().flags.contains(PacketFlags::UNENCRYPTED));
}

#[test]
fn reply_builder_parses_what_a_server_would_send() {
    let reply = Reply::new(Status::Fail, ReplyFlags::empty(), "bad password", Vec::new())
        .expect("reply construction should succeed");
    let header = HeaderInfo {
        version: Version::of(MajorVersion::RFC8907, MinorVersion::Default),
        packet_type: PacketType::Authentication,
        sequence_number: 2,
        flags: PacketFlags::empty(),
        session_id: 4321,
        length: 0,
    };
    let wire_bytes = Packet::new(header, reply.clone(), b"shared")
        .expect("reply packet construction should succeed")
        .to_wire_bytes();

    let pending = ReplyPacketBuilder::new()
        .secret(b"shared")
        .build()
        .expect("reply builder should always build");
    let parsed = pending
        .parse(&wire_bytes)
        .expect("reply should parse with the right secret");

    assert_eq!(parsed.body(), &reply);
    assert_eq!(parsed.header().session_id, 4321);

    // shortcut produces the same packet
    let shortcut = ReplyPacketBuilder::new()
        .secret(b"shared")
        .parse(&wire_bytes)
        .expect("reply should parse with the right secret");
    assert_eq!(shortcut, parsed);
}

#[test]
fn reply_builder_reports_truncation() {
    let result = ReplyPacketBuilder::new()
        .secret(b"shared")
        .parse(&[0xc0, 0x01, 2, 0, 0, 0, 0, 1, 0, 0, 0, 6, 0x01]);

    assert_eq!(result.err(), Some(DeserializeError::TruncatedPacket));
}
