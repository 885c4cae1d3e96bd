//! 値オブジェクト
//!
//! 生成時にバリデーションを行い、不正な値を持つインスタンスが存在しないことを保証します。

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

const ROOM_NAME_MAX_LEN: usize = 64;
const USERNAME_MAX_LEN: usize = 64;
const MESSAGE_CONTENT_MAX_LEN: usize = 2000;

fn validate_text(
    value: &str,
    field: &'static str,
    max: usize,
) -> Result<(), ValueObjectError> {
    if value.trim().is_empty() {
        return Err(ValueObjectError::Empty(field));
    }
    let actual = value.chars().count();
    if actual > max {
        return Err(ValueObjectError::TooLong { field, max, actual });
    }
    Ok(())
}

/// Room の識別子（不透明な文字列）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::Empty("room id"));
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

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// RoomId の生成
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// UUID v4 を使って新しい RoomId を生成
    pub fn generate() -> RoomId {
        RoomId(Uuid::new_v4().to_string())
    }
}

/// Room の表示名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let value = value.trim().to_string();
        validate_text(&value, "room name", ROOM_NAME_MAX_LEN)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// ユーザー名（Connection Gate が認証時に束縛するアイデンティティ）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_text(&value, "username", USERNAME_MAX_LEN)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Username {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 接続（トランスポートハンドル）の識別子
///
/// メンバーシップはユーザー名ではなくこの ID をキーにする。
/// 同じユーザーが複数タブから接続しても、それぞれ独立したメンバーとして扱われる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// メッセージ本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_text(&value, "message content", MESSAGE_CONTENT_MAX_LEN)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Coordinator が受理時に割り当てる連番（1 始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SequenceNumber(u64);

impl SequenceNumber {
    pub const FIRST: SequenceNumber = SequenceNumber(1);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_rejects_blank() {
        // テスト項目: 空白のみの RoomId は生成できない
        // given (前提条件):
        let value = "   ".to_string();

        // when (操作):
        let result = RoomId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::Empty("room id")));
    }

    #[test]
    fn test_room_id_factory_generates_unique_ids() {
        // テスト項目: RoomIdFactory は毎回異なる ID を生成する
        // given (前提条件):

        // when (操作):
        let a = RoomIdFactory::generate();
        let b = RoomIdFactory::generate();

        // then (期待する結果):
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_room_name_is_trimmed() {
        // テスト項目: RoomName は前後の空白が取り除かれる
        // given (前提条件):
        let value = "  lobby \n".to_string();

        // when (操作):
        let name = RoomName::new(value).unwrap();

        // then (期待する結果):
        assert_eq!(name.as_str(), "lobby");
    }

    #[test]
    fn test_username_too_long() {
        // テスト項目: 上限を超えるユーザー名はエラーになる
        // given (前提条件):
        let value = "a".repeat(USERNAME_MAX_LEN + 1);

        // when (操作):
        let result = Username::new(value);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ValueObjectError::TooLong {
                field: "username",
                max: USERNAME_MAX_LEN,
                actual: USERNAME_MAX_LEN + 1,
            })
        );
    }

    #[test]
    fn test_message_content_counts_characters_not_bytes() {
        // テスト項目: 本文の長さはバイト数ではなく文字数で判定される
        // given (前提条件):
        let value = "あ".repeat(MESSAGE_CONTENT_MAX_LEN);

        // when (操作):
        let result = MessageContent::new(value);

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[test]
    fn test_message_content_rejects_empty() {
        // テスト項目: 空の本文は生成できない
        // given (前提条件):
        let value = String::new();

        // when (操作):
        let result = MessageContent::try_from(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::Empty("message content")));
    }

    #[test]
    fn test_sequence_number_next() {
        // テスト項目: 連番は 1 ずつ増加する
        // given (前提条件):
        let first = SequenceNumber::FIRST;

        // when (操作):
        let second = first.next();

        // then (期待する結果):
        assert_eq!(first.value(), 1);
        assert_eq!(second.value(), 2);
        assert!(second > first);
    }
}
