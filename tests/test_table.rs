mod common;

use bytes::Bytes;
use common::{MockSocket, ReadStep, WriteStep, pattern};
use jukebox::catalog::{Catalog, Track, TrackSource};
use jukebox::protocol::connection::{Connection, Next, ServeContext};
use jukebox::server::table::{ConnectionTable, LISTENER};

#[test]
fn test_tokens_are_unique_and_never_reused() {
    let mut table: ConnectionTable<MockSocket> = ConnectionTable::new();

    let first = table.next_token();
    table.insert(first, Connection::new(MockSocket::new()));
    assert!(table.remove(first).is_some());

    let second = table.next_token();
    assert_ne!(first, second);
    assert_ne!(first, LISTENER);
    assert_ne!(second, LISTENER);
    assert!(!table.contains(first));
}

#[test]
fn test_remove_is_idempotent() {
    let mut table = ConnectionTable::new();
    let token = table.next_token();
    table.insert(token, Connection::new(MockSocket::new()));

    assert!(table.remove(token).is_some());
    assert!(table.remove(token).is_none());
    assert!(table.is_empty());
}

#[test]
fn test_closing_sender_leaves_receiver_untouched() {
    let catalog = Catalog::from_tracks(vec![Track::new(
        0,
        "song.mp3",
        TrackSource::Memory(Bytes::from(pattern(64))),
    )]);
    let ctx = ServeContext {
        catalog: &catalog,
        chunk_size: 8,
        max_request_size: 128,
    };
    let mut table = ConnectionTable::new();

    let sending = table.next_token();
    let socket = MockSocket::new()
        .with_reads([ReadStep::Data(b"PLAY 0\n".to_vec())])
        .with_writes([WriteStep::Accept(8), WriteStep::WouldBlock]);
    table.insert(sending, Connection::new(socket));

    let receiving = table.next_token();
    let socket = MockSocket::new().with_reads([ReadStep::Data(b"PLAY".to_vec())]);
    table.insert(receiving, Connection::new(socket));

    let conn = table.get_mut(sending).unwrap();
    assert_eq!(conn.handle_input(&ctx), Next::Write);
    assert_eq!(conn.handle_output(), Next::Write);

    assert_eq!(table.get_mut(receiving).unwrap().handle_input(&ctx), Next::Read);

    // Peer of the sending connection hangs up.
    let mut closed = table.remove(sending).unwrap();
    closed.close();
    assert!(closed.is_closing());

    assert_eq!(table.len(), 1);
    let other = table.get(receiving).unwrap();
    assert!(other.is_receiving());
    assert_eq!(other.buffered(), b"PLAY");

    let other = table.get_mut(receiving).unwrap();
    other.stream_mut().push_read(ReadStep::Data(b" 0\n".to_vec()));
    assert_eq!(other.handle_input(&ctx), Next::Write);
    assert_eq!(other.handle_output(), Next::Close);
    assert_eq!(other.stream().written, pattern(64));
}
