use sqlx::mysql::MySqlDatabaseError;

fn mysql_errno(err: &sqlx::Error) -> Option<u32> {
    if let sqlx::Error::Database(db) = err {
        if let Some(mysql_err) = db.try_downcast_ref::<MySqlDatabaseError>() {
            return Some(mysql_err.number().into());
        }
    }
    None
}

pub fn is_dup_key(err: &sqlx::Error) -> bool {
    mysql_errno(err) == Some(1062) // ER_DUP_ENTRY
}

pub fn is_fk_violation(err: &sqlx::Error) -> bool {
    mysql_errno(err) == Some(1452) // ER_NO_REFERENCED_ROW_2
}
