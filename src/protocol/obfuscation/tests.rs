use super::*;

#[test]
fn first_pad_chunk_matches_known_value() {
    // MD5(0xaabbccdd || "secretkey" || 0xc0 || 0x01)
    let pad = pseudo_pad(0xaabbccdd, b"secretkey", 0xc0, 1, 16);

    assert_eq!(
        pad,
        [
            0xf0, 0x7c, 0x96, 0xbc, 0x65, 0xb6, 0x46, 0x33, 0x45, 0x75, 0xb1, 0x79, 0xdf, 0xe4,
            0xd7, 0x15
        ]
    );
}

#[test]
fn chained_pad_spans_multiple_chunks() {
    let pad = pseudo_pad(1, b"k", 0xc1, 3, 40);

    assert_eq!(
        pad,
        [
            0x02, 0xd3, 0xc6, 0x55, 0xce, 0xff, 0x73, 0x31, 0x58, 0x73, 0x57, 0xd5, 0x9d, 0x1e,
            0xdc, 0x28, 0x5b, 0xfb, 0x61, 0xa6, 0x73, 0x4b, 0xe6, 0xa0, 0x86, 0x4e, 0xe2, 0xed,
            0x29, 0xc4, 0xd8, 0x32, 0x6c, 0xee, 0xab, 0xf6, 0x67, 0xf3, 0x69, 0x06
        ]
    );
}

#[test]
fn pad_is_truncated_prefix_of_longer_pad() {
    let short = pseudo_pad(0x1234, b"key", 0xc0, 5, 21);
    let long = pseudo_pad(0x1234, b"key", 0xc0, 5, 64);

    assert_eq!(short.len(), 21);
    assert_eq!(short[..], long[..21]);
}

#[test]
fn empty_body_needs_no_pad() {
    assert!(pseudo_pad(42, b"key", 0xc0, 1, 0).is_empty());
    assert!(transform(&[], 42, b"key", 0xc0, 1).is_empty());
}

#[test]
fn transform_is_an_involution() {
    let cases: [(&[u8], u32, &[u8], u8, u8); 4] = [
        (b"short", 0xdeadbeef, b"secret", 0xc0, 1),
        (&[0x55; 16], 7, b"exactly one chunk", 0xc1, 2),
        (&[0xa5; 100], u32::MAX, b"", 0xc0, 255),
        (b"a body that is a bit longer than two md5 chunks", 0, b"k", 0xc1, 3),
    ];

    for (body, session_id, secret, version, sequence_number) in cases {
        let obfuscated = transform(body, session_id, secret, version, sequence_number);
        assert_eq!(obfuscated.len(), body.len());

        let restored = transform(&obfuscated, session_id, secret, version, sequence_number);
        assert_eq!(restored, body, "double transform should restore the body");
    }
}

#[test]
fn pad_depends_on_sequence_number() {
    let body = [0u8; 16];

    assert_ne!(
        transform(&body, 99, b"key", 0xc0, 1),
        transform(&body, 99, b"key", 0xc0, 2),
        "different sequence numbers should produce different pads"
    );
}
