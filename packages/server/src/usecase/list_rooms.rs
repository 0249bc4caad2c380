//! UseCase: ルーム一覧取得処理

use std::sync::Arc;

use crate::domain::{MessageStore, Room, StorageError};

/// ルーム一覧取得のユースケース
pub struct ListRoomsUseCase {
    /// Storage collaborator（データアクセスの抽象化）
    store: Arc<dyn MessageStore>,
}

impl ListRoomsUseCase {
    /// 新しい ListRoomsUseCase を作成
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// ルーム一覧を作成順で取得
    pub async fn execute(&self) -> Result<Vec<Room>, StorageError> {
        self.store.list_rooms().await
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{RoomName, Timestamp};
    use crate::infrastructure::storage::InMemoryMessageStore;

    use super::*;

    fn room_name(name: &str) -> RoomName {
        RoomName::new(name.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_list_rooms_empty() {
        // テスト項目: ルームが無い場合は空のリストが返される
        // given (前提条件):
        let usecase = ListRoomsUseCase::new(Arc::new(InMemoryMessageStore::new()));

        // when (操作):
        let result = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(result.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_list_rooms_in_creation_order() {
        // テスト項目: ルーム一覧が作成順で返される
        // given (前提条件):
        let store = Arc::new(InMemoryMessageStore::new());
        store
            .create_room(room_name("zeta"), Timestamp::new(1))
            .await
            .unwrap();
        store
            .create_room(room_name("alpha"), Timestamp::new(2))
            .await
            .unwrap();
        let usecase = ListRoomsUseCase::new(store);

        // when (操作):
        let rooms = usecase.execute().await.unwrap();

        // then (期待する結果): 名前順ではなく作成順
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].name.as_str(), "zeta");
        assert_eq!(rooms[1].name.as_str(), "alpha");
    }
}
