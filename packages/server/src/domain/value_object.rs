//! Value Object 定義
//!
//! 入力値の検証をコンストラクタで行い、不正な値がドメイン層に入り込まない
//! ようにします。検証済みの値のみが `RoomName` / `Author` / `MessageBody`
//! として存在できます。

use super::error::ValueObjectError;

/// ルーム名（1〜64 文字、制御文字不可）
///
/// ユーザーが選ぶ一意なキーで、永続化にもこの名前を使用します。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomName(String);

impl RoomName {
    pub const MAX_LENGTH: usize = 64;

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_text("room name", &value, Self::MAX_LENGTH)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for RoomName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// メッセージの投稿者名（1〜32 文字、制御文字不可）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Author(String);

impl Author {
    pub const MAX_LENGTH: usize = 32;

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_text("author", &value, Self::MAX_LENGTH)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Author {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// メッセージ本文（1〜2000 文字）
///
/// 改行は許可するため、制御文字の検証は行いません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBody(String);

impl MessageBody {
    pub const MAX_LENGTH: usize = 2000;

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::Empty("message body"));
        }
        if value.chars().count() > Self::MAX_LENGTH {
            return Err(ValueObjectError::TooLong("message body", Self::MAX_LENGTH));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageBody {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix タイムスタンプ（UTC、ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// ルームの識別子（Storage が採番する連番）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomId(u64);

impl RoomId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// メッセージの識別子（Storage が採番する連番、作成順に単調増加）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

fn validate_text(
    label: &'static str,
    value: &str,
    max_length: usize,
) -> Result<(), ValueObjectError> {
    if value.is_empty() {
        return Err(ValueObjectError::Empty(label));
    }
    if value.chars().count() > max_length {
        return Err(ValueObjectError::TooLong(label, max_length));
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(ValueObjectError::ControlCharacter(label));
    }
    Ok(())
}
