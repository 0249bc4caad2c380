//! Integration tests driving the hub end-to-end with scripted sinks.
//!
//! The hub event loop runs as a real task; connections are registered with
//! scripted `ConnectionSink` implementations that record every write, can
//! inject failures, and flag transport closure. No network is involved.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use irori_server::domain::RoomName;
use irori_server::hub::{
    ConnId, ConnectionHandle, ConnectionSink, DeliveryOutcome, Hub, SinkError, run_hub,
};

/// 書き込みをチャンネルへ記録し、失敗を注入できるテスト用 Sink
struct ScriptedSink {
    writes: mpsc::UnboundedSender<String>,
    fail_writes: bool,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl ConnectionSink for ScriptedSink {
    async fn send_text(&mut self, payload: &str) -> Result<(), SinkError> {
        if self.fail_writes {
            return Err(SinkError::Transport("injected write failure".to_string()));
        }
        self.writes
            .send(payload.to_string())
            .map_err(|_| SinkError::Closed)
    }

    async fn send_ping(&mut self) -> Result<(), SinkError> {
        if self.fail_writes {
            return Err(SinkError::Transport("injected ping failure".to_string()));
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SinkError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

struct TestConnection {
    conn: Arc<ConnectionHandle>,
    writes: mpsc::UnboundedReceiver<String>,
    closed: Arc<AtomicBool>,
}

impl TestConnection {
    /// Build a handle with a scripted sink and register it with the hub.
    fn register(hub: &Hub, room: &RoomName, fail_writes: bool) -> Self {
        let conn = Self::build(room, fail_writes);
        hub.register(conn.conn.clone());
        conn
    }

    fn build(room: &RoomName, fail_writes: bool) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));
        let conn = Arc::new(ConnectionHandle::new(
            ConnId::generate(),
            room.clone(),
            Box::new(ScriptedSink {
                writes: tx,
                fail_writes,
                closed: closed.clone(),
            }),
        ));
        Self {
            conn,
            writes: rx,
            closed,
        }
    }

    /// Wait for the next delivered payload, failing the test on timeout.
    async fn expect_payload(&mut self) -> String {
        tokio::time::timeout(Duration::from_secs(2), self.writes.recv())
            .await
            .expect("timed out waiting for payload")
            .expect("sink channel closed")
    }

    /// Assert that no payload arrives within a short window.
    async fn expect_no_payload(&mut self) {
        let received = tokio::time::timeout(Duration::from_millis(100), self.writes.recv()).await;
        assert!(
            received.is_err(),
            "unexpected payload: {:?}",
            received.unwrap()
        );
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

fn room(name: &str) -> RoomName {
    RoomName::new(name.to_string()).unwrap()
}

fn start_hub() -> (Hub, JoinHandle<()>) {
    let (hub, rx) = Hub::channel();
    let task = tokio::spawn(run_hub(rx, hub.clone()));
    (hub, task)
}

#[tokio::test]
async fn test_broadcast_is_room_scoped_and_delivered_exactly_once() {
    // テスト項目: ブロードキャストがルームのメンバー全員に 1 回ずつ届き、
    //             他のルームには届かない
    // given (前提条件):
    let (hub, _task) = start_hub();
    let general = room("general");
    let mut alice = TestConnection::register(&hub, &general, false);
    let mut bob = TestConnection::register(&hub, &general, false);
    let mut carol = TestConnection::register(&hub, &room("random"), false);

    // when (操作):
    hub.broadcast(general.clone(), "<div>payload</div>");

    // then (期待する結果):
    assert_eq!(alice.expect_payload().await, "<div>payload</div>");
    assert_eq!(bob.expect_payload().await, "<div>payload</div>");
    alice.expect_no_payload().await;
    bob.expect_no_payload().await;
    carol.expect_no_payload().await;
}

#[tokio::test]
async fn test_unregistered_connection_is_excluded_from_snapshot() {
    // テスト項目: ブロードキャストのスナップショット前に削除された接続には
    //             配信されない
    // given (前提条件):
    let (hub, _task) = start_hub();
    let general = room("general");
    let mut alice = TestConnection::register(&hub, &general, false);
    let mut bob = TestConnection::register(&hub, &general, false);

    // when (操作): bob を削除してからブロードキャスト
    hub.unregister(bob.conn.id());
    hub.broadcast(general.clone(), "after bob left");

    // then (期待する結果):
    assert_eq!(alice.expect_payload().await, "after bob left");
    bob.expect_no_payload().await;
}

#[tokio::test]
async fn test_unregister_is_idempotent() {
    // テスト項目: 同じ接続の多重 unregister や未登録 ID の unregister が
    //             他の接続への配信に影響しない
    // given (前提条件):
    let (hub, _task) = start_hub();
    let general = room("general");
    let mut alice = TestConnection::register(&hub, &general, false);
    let bob = TestConnection::register(&hub, &general, false);

    // when (操作):
    hub.unregister(bob.conn.id());
    hub.unregister(bob.conn.id());
    hub.unregister(ConnId::generate());
    hub.broadcast(general.clone(), "still works");

    // then (期待する結果):
    assert_eq!(alice.expect_payload().await, "still works");
}

#[tokio::test]
async fn test_write_failure_evicts_only_the_failing_connection() {
    // テスト項目: N≥3 のファンアウトで 1 接続の書き込みが失敗しても、
    //             他の接続への配信は完了し、失敗した接続だけが退場する
    // given (前提条件):
    let (hub, _task) = start_hub();
    let general = room("general");
    let mut alice = TestConnection::register(&hub, &general, false);
    let mut broken = TestConnection::register(&hub, &general, true);
    let mut carol = TestConnection::register(&hub, &general, false);

    // when (操作):
    hub.broadcast(general.clone(), "first");

    // then (期待する結果): 正常な 2 接続には届く
    assert_eq!(alice.expect_payload().await, "first");
    assert_eq!(carol.expect_payload().await, "first");
    broken.expect_no_payload().await;

    // 失敗した接続は closing になり、トランスポートが閉じられている
    assert!(broken.conn.is_closing());
    assert!(broken.is_closed());

    // 以降のブロードキャストも正常な接続にだけ届く
    hub.broadcast(general.clone(), "second");
    assert_eq!(alice.expect_payload().await, "second");
    assert_eq!(carol.expect_payload().await, "second");
    broken.expect_no_payload().await;
}

#[tokio::test]
async fn test_concurrent_registrations_then_broadcast_reach_all_exactly_once() {
    // テスト項目: N 接続の並行登録後のブロードキャストが全接続に
    //             ちょうど 1 回ずつ届く
    // given (前提条件):
    let (hub, _task) = start_hub();
    let general = room("general");

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let hub = hub.clone();
            let general = general.clone();
            tokio::spawn(async move {
                let conn = TestConnection::build(&general, false);
                hub.register(conn.conn.clone());
                conn
            })
        })
        .collect();

    let mut connections = Vec::new();
    for handle in handles {
        connections.push(handle.await.unwrap());
    }

    // when (操作):
    hub.broadcast(general.clone(), "hello everyone");

    // then (期待する結果):
    for conn in &mut connections {
        assert_eq!(conn.expect_payload().await, "hello everyone");
    }
    for conn in &mut connections {
        conn.expect_no_payload().await;
    }
}

#[tokio::test]
async fn test_sequential_deliveries_preserve_order() {
    // テスト項目: 同一接続への順次配信で書き込み順が保たれる
    // given (前提条件):
    let general = room("general");
    let mut conn = TestConnection::build(&general, false);

    // when (操作):
    assert_eq!(conn.conn.deliver("B1").await, DeliveryOutcome::Delivered);
    assert_eq!(conn.conn.deliver("B2").await, DeliveryOutcome::Delivered);

    // then (期待する結果):
    assert_eq!(conn.expect_payload().await, "B1");
    assert_eq!(conn.expect_payload().await, "B2");
}

#[tokio::test]
async fn test_concurrent_deliveries_to_one_connection_do_not_interleave() {
    // テスト項目: 同一接続への並行配信が write guard により直列化され、
    //             書き込みが交錯しない
    // given (前提条件): 書き込みの開始と終了を記録し、途中で yield する Sink
    struct YieldingSink {
        events: Arc<std::sync::Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ConnectionSink for YieldingSink {
        async fn send_text(&mut self, payload: &str) -> Result<(), SinkError> {
            self.events.lock().unwrap().push(format!("start:{payload}"));
            // 書き込みの途中でタスクを切り替えさせる
            for _ in 0..3 {
                tokio::task::yield_now().await;
            }
            self.events.lock().unwrap().push(format!("end:{payload}"));
            Ok(())
        }

        async fn send_ping(&mut self) -> Result<(), SinkError> {
            Ok(())
        }

        async fn close(&mut self) -> Result<(), SinkError> {
            Ok(())
        }
    }

    let events = Arc::new(std::sync::Mutex::new(Vec::new()));
    let conn = Arc::new(ConnectionHandle::new(
        ConnId::generate(),
        room("general"),
        Box::new(YieldingSink {
            events: events.clone(),
        }),
    ));

    // when (操作): 2 つの配信タスクを並行に走らせる
    let first = {
        let conn = conn.clone();
        tokio::spawn(async move { conn.deliver("one").await })
    };
    let second = {
        let conn = conn.clone();
        tokio::spawn(async move { conn.deliver("two").await })
    };
    assert_eq!(first.await.unwrap(), DeliveryOutcome::Delivered);
    assert_eq!(second.await.unwrap(), DeliveryOutcome::Delivered);

    // then (期待する結果): start と end が必ず対になっている（交錯なし）
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 4);
    for pair in events.chunks(2) {
        let payload = pair[0].strip_prefix("start:").expect("expected start marker");
        assert_eq!(pair[1], format!("end:{payload}"));
    }
}

#[tokio::test]
async fn test_shutdown_closes_remaining_connections() {
    // テスト項目: shutdown で残りの接続が閉じられ、イベントループが停止する
    // given (前提条件):
    let (hub, task) = start_hub();
    let general = room("general");
    let alice = TestConnection::register(&hub, &general, false);
    let bob = TestConnection::register(&hub, &general, false);

    // when (操作):
    hub.shutdown();
    tokio::time::timeout(Duration::from_secs(6), task)
        .await
        .expect("hub did not stop in time")
        .unwrap();

    // then (期待する結果):
    assert!(alice.is_closed());
    assert!(bob.is_closed());
    assert!(alice.conn.is_closing());
    assert!(bob.conn.is_closing());
}

#[tokio::test]
async fn test_events_after_shutdown_are_dropped() {
    // テスト項目: 停止後の Hub へのイベント投入がパニックせず無視される
    // given (前提条件):
    let (hub, task) = start_hub();
    hub.shutdown();
    task.await.unwrap();

    // when (操作):
    let conn = TestConnection::build(&room("general"), false);
    hub.register(conn.conn.clone());
    hub.broadcast(room("general"), "into the void");
    hub.unregister(conn.conn.id());

    // then (期待する結果): 何も起きない（パニックしない）
}
