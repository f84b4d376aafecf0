use corpoview_storage::domain::storage::{Decoded, StorageCodec, Ttl};
use corpoview_storage::domain::time::ManualTimeProvider;
use quickcheck_macros::quickcheck;
use serde_json::json;
use std::sync::Arc;

const START: u64 = 1_700_000_000_000;

fn codec() -> (Arc<ManualTimeProvider>, StorageCodec) {
    let clock = Arc::new(ManualTimeProvider::new(START));
    (clock.clone(), StorageCodec::new(clock))
}

type Payload = (Vec<(String, i64)>, Option<bool>);

#[quickcheck]
fn decode_inverts_encode(entries: Vec<(String, i64)>, flag: Option<bool>, ttl: u32) -> bool {
    let (_, codec) = codec();
    let ttl = Ttl::secs(u64::from(ttl % 86_400) + 1);
    let payload: Payload = (entries, flag);
    let raw = codec.encode(&payload, Some(ttl)).unwrap();
    codec.decode::<Payload>(&raw) == Decoded::Fresh(payload)
}

#[quickcheck]
fn envelopes_without_ttl_never_expire(value: String, elapsed: u32) -> bool {
    let (clock, codec) = codec();
    let raw = codec.encode(&value, None).unwrap();
    clock.advance_millis(u64::from(elapsed) * 1000);
    codec.decode::<String>(&raw) == Decoded::Fresh(value)
}

#[test]
fn envelope_wire_format() {
    let (_, codec) = codec();
    let raw = codec
        .encode(&json!({"a": 1, "tags": ["x"]}), Some(Ttl::minutes(1)))
        .unwrap();
    insta::assert_snapshot!(raw, @r#"{"value":{"a":1,"tags":["x"]},"expires":1700000060000}"#);

    let plain = codec.encode(&false, None).unwrap();
    insta::assert_snapshot!(plain, @r#"{"value":false}"#);
}

#[test]
fn hand_written_envelopes_are_accepted() {
    let (_, codec) = codec();
    let future = format!(r#"{{"expires":{},"value":[1,2]}}"#, START + 5);
    assert_eq!(codec.decode::<Vec<u8>>(&future), Decoded::Fresh(vec![1, 2]));
    assert_eq!(
        codec.decode::<Vec<u8>>(r#"{"value":[3],"expires":null}"#),
        Decoded::Fresh(vec![3])
    );
    let past = format!(r#"{{"value":[1],"expires":{}}}"#, START - 1);
    assert_eq!(codec.decode::<Vec<u8>>(&past), Decoded::Expired);
}

#[test]
fn malformed_expiry_is_a_miss() {
    let (_, codec) = codec();
    assert!(matches!(
        codec.decode::<u8>(r#"{"value":1,"expires":"tomorrow"}"#),
        Decoded::Malformed(_)
    ));
    assert!(matches!(codec.decode::<u8>(r#"{"value":1,"expires":-5}"#), Decoded::Malformed(_)));
    assert!(matches!(codec.decode::<u8>("42"), Decoded::Malformed(_)));
    assert!(matches!(codec.decode::<u8>(""), Decoded::Malformed(_)));
}
