#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use barrage_core::protocol::kv::{decode, KvBody, MessageRecord};

#[test]
fn decodes_known_keys() {
    let r = decode("type@=chatmsg/uid@=42/nn@=alice/txt@=hello/");
    assert_eq!(r.msg_type, "chatmsg");
    assert_eq!(r.uid, "42");
    assert_eq!(r.nickname, "alice");
    assert_eq!(r.text, "hello");
    assert!(r.level.is_empty());
    assert!(r.owner_nickname.is_empty());
    assert!(r.owner_level.is_empty());
    assert!(r.is_chat());
}

#[test]
fn skips_malformed_segment() {
    let r = decode("type@=chatmsg/bogus/txt@=hi/");
    assert_eq!(r.msg_type, "chatmsg");
    assert_eq!(r.text, "hi");
}

#[test]
fn skips_segment_with_two_separators() {
    let r = decode("type@=chatmsg/txt@=a@=b/nn@=bob/");
    assert!(r.text.is_empty());
    assert_eq!(r.nickname, "bob");
}

#[test]
fn ignores_unknown_keys_and_keeps_raw_values() {
    let r = decode("type@=chatmsg/rid@=12345/ct@=2/level@=17/bnn@=host/bl@=9/txt@=a@Sb/");
    assert_eq!(r.level, "17");
    assert_eq!(r.owner_nickname, "host");
    assert_eq!(r.owner_level, "9");
    assert_eq!(r.text, "a@Sb");
}

#[test]
fn empty_and_garbage_payloads_give_empty_record() {
    assert_eq!(decode(""), MessageRecord::default());
    assert_eq!(decode("///"), MessageRecord::default());
    assert_eq!(decode("no separators at all"), MessageRecord::default());
    assert!(!decode("type@=loginres/").is_chat());
}

#[test]
fn later_duplicate_key_wins() {
    let r = decode("txt@=first/txt@=second/");
    assert_eq!(r.text, "second");
}

#[test]
fn body_builder_terminates_every_pair() {
    let body = KvBody::new().pair("type", "joingroup").pair("gid", -9999).finish();
    assert_eq!(body, "type@=joingroup/gid@=-9999/");
    assert!(KvBody::new().finish().is_empty());
}
