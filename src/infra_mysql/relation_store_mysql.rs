use super::repo_tx_mysql::{MySqlTx, MySqlTxManager};
use super::util::{count_to_u64, is_dup_key};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

const INVITATION_COLUMNS: &str = "id, sender_id, receiver_id, status, created_at";

pub struct MySqlRelationStore {
    tx_manager: MySqlTxManager,
}

impl MySqlRelationStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            tx_manager: MySqlTxManager::new(pool),
        }
    }

    fn pool(&self) -> &MySqlPool {
        self.tx_manager.pool()
    }

    fn row_to_invitation(row: MySqlRow) -> Result<Invitation, RelationError> {
        let id: InvitationId = row
            .try_get("id")
            .map_err(|e| RelationError::Store(format!("decode id: {e}")))?;
        let sender: UserId = row
            .try_get("sender_id")
            .map_err(|e| RelationError::Store(format!("decode sender_id: {e}")))?;
        let receiver: UserId = row
            .try_get("receiver_id")
            .map_err(|e| RelationError::Store(format!("decode receiver_id: {e}")))?;
        let status = row
            .try_get::<&str, _>("status")
            .map_err(|e| RelationError::Store(format!("decode status: {e}")))?
            .parse::<InvitationStatus>()
            .map_err(RelationError::Store)?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| RelationError::Store(format!("decode created_at: {e}")))?;

        Ok(Invitation {
            id,
            sender,
            receiver,
            status,
            created_at,
        })
    }

    fn row_to_user(row: MySqlRow) -> Result<UserSummary, RelationError> {
        let decode = |e: sqlx::Error| RelationError::Store(format!("decode user: {e}"));
        Ok(UserSummary {
            user_id: row.try_get("user_id").map_err(decode)?,
            user_name: row.try_get("user_name").map_err(decode)?,
            nick_name: row.try_get("nick_name").map_err(decode)?,
            avatar: row.try_get("avatar").map_err(decode)?,
        })
    }

    async fn list_by_party(
        &self,
        party_column: &str,
        user: UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, RelationError> {
        let rows = match status {
            Some(status) => {
                let sql = format!(
                    "SELECT {INVITATION_COLUMNS} FROM invitation \
                     WHERE {party_column} = ? AND status = ? \
                     ORDER BY created_at DESC, id DESC"
                );
                sqlx::query(&sql)
                    .bind(user)
                    .bind(status.as_str())
                    .fetch_all(self.pool())
                    .await
            }
            None => {
                let sql = format!(
                    "SELECT {INVITATION_COLUMNS} FROM invitation \
                     WHERE {party_column} = ? \
                     ORDER BY created_at DESC, id DESC"
                );
                sqlx::query(&sql).bind(user).fetch_all(self.pool()).await
            }
        }
        .map_err(|e| RelationError::Store(format!("list invitations by {party_column}: {e}")))?;

        rows.into_iter().map(Self::row_to_invitation).collect()
    }
}

#[async_trait::async_trait]
impl RelationStore for MySqlRelationStore {
    async fn begin_relation_tx<'t>(
        &'t self,
    ) -> Result<Box<dyn RelationTx<'t> + 't>, RelationError> {
        let tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| RelationError::Store(format!("begin: {e}")))?;
        Ok(Box::new(tx))
    }

    async fn create_friendship(&self, a: UserId, b: UserId) -> Result<(), RelationError> {
        let pair = UserPair::new(a, b);

        let res = sqlx::query(
            r#"
INSERT INTO friendship (user_min, user_max, created_at)
VALUES (?, ?, ?)
"#,
        )
        .bind(pair.low())
        .bind(pair.high())
        .bind(Utc::now())
        .execute(self.pool())
        .await;

        match res {
            Ok(_) => Ok(()),
            Err(e) if is_dup_key(&e) => Err(RelationError::FriendshipExists),
            Err(e) => Err(RelationError::Store(format!("insert friendship: {e}"))),
        }
    }

    async fn delete_friendship(&self, a: UserId, b: UserId) -> Result<(), RelationError> {
        let pair = UserPair::new(a, b);

        sqlx::query("DELETE FROM friendship WHERE user_min = ? AND user_max = ?")
            .bind(pair.low())
            .bind(pair.high())
            .execute(self.pool())
            .await
            .map_err(|e| RelationError::Store(format!("delete friendship: {e}")))?;

        Ok(())
    }

    async fn are_friends(&self, a: UserId, b: UserId) -> Result<bool, RelationError> {
        let pair = UserPair::new(a, b);

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM friendship WHERE user_min = ? AND user_max = ?",
        )
        .bind(pair.low())
        .bind(pair.high())
        .fetch_one(self.pool())
        .await
        .map_err(|e| RelationError::Store(format!("check friendship: {e}")))?;

        Ok(count > 0)
    }

    async fn count_friends(&self, user: UserId) -> Result<u64, RelationError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM friendship WHERE user_min = ? OR user_max = ?",
        )
        .bind(user)
        .bind(user)
        .fetch_one(self.pool())
        .await
        .map_err(|e| RelationError::Store(format!("count friends: {e}")))?;

        count_to_u64(count).map_err(RelationError::Store)
    }

    async fn list_friends(&self, user: UserId) -> Result<Vec<UserSummary>, RelationError> {
        let rows = sqlx::query(
            r#"
SELECT u.user_id, u.user_name, u.nick_name, u.avatar
FROM friendship f
JOIN user u
  ON u.user_id = IF(f.user_min = ?, f.user_max, f.user_min)
WHERE f.user_min = ? OR f.user_max = ?
ORDER BY f.created_at DESC, u.user_id ASC
"#,
        )
        .bind(user)
        .bind(user)
        .bind(user)
        .fetch_all(self.pool())
        .await
        .map_err(|e| RelationError::Store(format!("list friends: {e}")))?;

        rows.into_iter().map(Self::row_to_user).collect()
    }

    async fn create_invitation(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<Invitation, RelationError> {
        let created_at = Utc::now();
        let status = InvitationStatus::Pending;

        let res = sqlx::query(
            r#"
INSERT INTO invitation (sender_id, receiver_id, status, created_at)
VALUES (?, ?, ?, ?)
"#,
        )
        .bind(sender)
        .bind(receiver)
        .bind(status.as_str())
        .bind(created_at)
        .execute(self.pool())
        .await
        .map_err(|e| RelationError::Store(format!("insert invitation: {e}")))?;

        Ok(Invitation {
            id: InvitationId(res.last_insert_id()),
            sender,
            receiver,
            status,
            created_at,
        })
    }

    async fn find_invitation(
        &self,
        sender: UserId,
        receiver: UserId,
    ) -> Result<Option<Invitation>, RelationError> {
        let sql = format!(
            "SELECT {INVITATION_COLUMNS} FROM invitation \
             WHERE sender_id = ? AND receiver_id = ? \
             ORDER BY created_at DESC, id DESC LIMIT 1"
        );
        let row = sqlx::query(&sql)
            .bind(sender)
            .bind(receiver)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| RelationError::Store(format!("find invitation: {e}")))?;

        row.map(Self::row_to_invitation).transpose()
    }

    async fn get_invitation_by_id(
        &self,
        id: InvitationId,
    ) -> Result<Option<Invitation>, RelationError> {
        let sql = format!("SELECT {INVITATION_COLUMNS} FROM invitation WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| RelationError::Store(format!("get invitation {id}: {e}")))?;

        row.map(Self::row_to_invitation).transpose()
    }

    async fn list_received(
        &self,
        user: UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, RelationError> {
        self.list_by_party("receiver_id", user, status).await
    }

    async fn list_sent(
        &self,
        user: UserId,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<Invitation>, RelationError> {
        self.list_by_party("sender_id", user, status).await
    }
}

#[async_trait::async_trait]
impl<'t> RelationTx<'t> for MySqlTx {
    async fn lock_invitation(
        &mut self,
        id: InvitationId,
    ) -> Result<Option<Invitation>, RelationError> {
        let sql = format!("SELECT {INVITATION_COLUMNS} FROM invitation WHERE id = ? FOR UPDATE");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.conn())
            .await
            .map_err(|e| RelationError::Store(format!("lock invitation {id}: {e}")))?;

        row.map(MySqlRelationStore::row_to_invitation).transpose()
    }

    async fn set_invitation_status(
        &mut self,
        id: InvitationId,
        status: InvitationStatus,
    ) -> Result<(), RelationError> {
        sqlx::query("UPDATE invitation SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(self.conn())
            .await
            .map_err(|e| RelationError::Store(format!("update invitation {id}: {e}")))?;

        Ok(())
    }

    async fn insert_friendship(&mut self, pair: UserPair) -> Result<(), RelationError> {
        let res = sqlx::query(
            r#"
INSERT INTO friendship (user_min, user_max, created_at)
VALUES (?, ?, ?)
"#,
        )
        .bind(pair.low())
        .bind(pair.high())
        .bind(Utc::now())
        .execute(self.conn())
        .await;

        match res {
            Ok(_) => Ok(()),
            Err(e) if is_dup_key(&e) => Err(RelationError::FriendshipExists),
            Err(e) => Err(RelationError::Store(format!("insert friendship in tx: {e}"))),
        }
    }
}
