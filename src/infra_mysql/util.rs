use sqlx::mysql::MySqlDatabaseError;

pub fn is_dup_key(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        if let Some(mysql_err) = db.try_downcast_ref::<MySqlDatabaseError>() {
            return mysql_err.number() == 1062; // ER_DUP_ENTRY
        }
    }

    false
}

/// COUNT(..) never goes negative; a negative value means a broken driver or row.
pub fn count_to_u64(count: i64) -> Result<u64, String> {
    u64::try_from(count).map_err(|_| format!("negative row count: {count}"))
}
