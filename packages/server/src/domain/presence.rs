//! Presence Tracker
//!
//! 現在のメンバー集合から導出される在室状況。状態を持たず、
//! メンバーシップが変わるたびに計算し直す。

use std::collections::BTreeSet;

use super::{entity::Member, value_object::Username};

/// 接続数とオンラインのユーザー名集合
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresenceSnapshot {
    /// 生きている接続（メンバー）の数。同一ユーザーの複数接続も個別に数える
    pub connection_count: usize,
    /// 1 つ以上の接続を持つユーザー名（重複なし、辞書順）
    pub online_users: BTreeSet<Username>,
}

impl PresenceSnapshot {
    pub fn from_members<'a, I>(members: I) -> Self
    where
        I: IntoIterator<Item = &'a Member>,
    {
        let mut connection_count = 0;
        let mut online_users = BTreeSet::new();
        for member in members {
            connection_count += 1;
            online_users.insert(member.username.clone());
        }
        Self {
            connection_count,
            online_users,
        }
    }
}
