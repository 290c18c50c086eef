use super::*;

#[test]
fn sequential_reads_track_position() {
    let mut reader = WireReader::new(&[0x07, 0x01, 0x02, b'h', b'i']);

    assert_eq!(reader.read_u8(), Ok(0x07));
    assert_eq!(reader.read_u16(), Ok(0x0102));
    assert_eq!(reader.take(2), Ok(b"hi".as_slice()));
    assert_eq!(reader.remaining(), 0);

    reader.finish().expect("entire buffer should have been consumed");
}

#[test]
fn read_past_end_is_malformed() {
    let mut reader = WireReader::new(&[0x00, 0x01, 0x02]);
    reader.read_u16().expect("two bytes should be available");

    assert_eq!(reader.read_u16(), Err(DeserializeError::MalformedBody));

    // failed reads don't consume anything
    assert_eq!(reader.remaining(), 1);
}

#[test]
fn huge_take_does_not_overflow() {
    let mut reader = WireReader::new(&[0xff; 4]);
    reader.read_u8().expect("first byte should be readable");

    assert_eq!(reader.take(usize::MAX), Err(DeserializeError::MalformedBody));
}

#[test]
fn leftover_bytes_fail_finish() {
    let mut reader = WireReader::new(&[1, 2, 3]);
    reader.take(2).expect("two bytes should be available");

    assert_eq!(reader.finish(), Err(DeserializeError::MalformedBody));
}
