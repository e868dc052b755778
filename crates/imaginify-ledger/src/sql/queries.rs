//! SQL queries for different databases.

/// Account table name.
pub const TABLE: &str = "imaginify_users";

/// Column list shared by every SELECT.
const COLUMNS: &str = "id, subject_id, email, username, photo, first_name, last_name, \
                       plan_id, credit_balance, created_at, updated_at";

/// Schema (PostgreSQL).
pub const CREATE_TABLE_PG: &str = r#"
CREATE TABLE IF NOT EXISTS imaginify_users (
    id BIGSERIAL PRIMARY KEY,
    subject_id VARCHAR(255) NOT NULL UNIQUE,
    email VARCHAR(320) NOT NULL,
    username VARCHAR(255) NOT NULL,
    photo VARCHAR(2048) NOT NULL DEFAULT '',
    first_name VARCHAR(255) NOT NULL DEFAULT '',
    last_name VARCHAR(255) NOT NULL DEFAULT '',
    plan_id BIGINT NOT NULL DEFAULT 1,
    credit_balance BIGINT NOT NULL DEFAULT 10,
    created_at BIGINT NOT NULL,
    updated_at BIGINT NOT NULL
)
"#;

/// Schema (MySQL).
pub const CREATE_TABLE_MYSQL: &str = r#"
CREATE TABLE IF NOT EXISTS imaginify_users (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    subject_id VARCHAR(255) NOT NULL UNIQUE,
    email VARCHAR(320) NOT NULL,
    username VARCHAR(255) NOT NULL,
    photo VARCHAR(2048) NOT NULL DEFAULT '',
    first_name VARCHAR(255) NOT NULL DEFAULT '',
    last_name VARCHAR(255) NOT NULL DEFAULT '',
    plan_id BIGINT NOT NULL DEFAULT 1,
    credit_balance BIGINT NOT NULL DEFAULT 10,
    created_at BIGINT NOT NULL,
    updated_at BIGINT NOT NULL
)
"#;

/// Schema (SQLite).
pub const CREATE_TABLE_SQLITE: &str = r#"
CREATE TABLE IF NOT EXISTS imaginify_users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_id TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL,
    username TEXT NOT NULL,
    photo TEXT NOT NULL DEFAULT '',
    first_name TEXT NOT NULL DEFAULT '',
    last_name TEXT NOT NULL DEFAULT '',
    plan_id INTEGER NOT NULL DEFAULT 1,
    credit_balance INTEGER NOT NULL DEFAULT 10,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
)
"#;

/// Insert an account (PostgreSQL).
pub const INSERT_PG: &str = r#"
INSERT INTO imaginify_users
    (subject_id, email, username, photo, first_name, last_name, plan_id, credit_balance, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
"#;

/// Insert an account (MySQL/SQLite).
pub const INSERT_MYSQL: &str = r#"
INSERT INTO imaginify_users
    (subject_id, email, username, photo, first_name, last_name, plan_id, credit_balance, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

/// Atomic balance increment (PostgreSQL). Binds: delta, now, id.
pub const INCREMENT_PG: &str = r#"
UPDATE imaginify_users
SET credit_balance = credit_balance + $1, updated_at = $2
WHERE id = $3
"#;

/// Atomic balance increment (MySQL/SQLite). Binds: delta, now, id.
pub const INCREMENT_MYSQL: &str = r#"
UPDATE imaginify_users
SET credit_balance = credit_balance + ?, updated_at = ?
WHERE id = ?
"#;

/// Floor-checked increment (PostgreSQL). Binds: delta, now, id, delta, floor.
pub const INCREMENT_FLOOR_PG: &str = r#"
UPDATE imaginify_users
SET credit_balance = credit_balance + $1, updated_at = $2
WHERE id = $3 AND credit_balance + $4 >= $5
"#;

/// Floor-checked increment (MySQL/SQLite). Binds: delta, now, id, delta, floor.
pub const INCREMENT_FLOOR_MYSQL: &str = r#"
UPDATE imaginify_users
SET credit_balance = credit_balance + ?, updated_at = ?
WHERE id = ? AND credit_balance + ? >= ?
"#;

/// Delete by id (MySQL, which has no `RETURNING`).
pub const DELETE_BY_ID_MYSQL: &str = "DELETE FROM imaginify_users WHERE id = ?";

/// `SELECT ... WHERE subject_id = <param>`.
pub fn find_by_subject(pg: bool) -> String {
    format!(
        "SELECT {COLUMNS} FROM {TABLE} WHERE subject_id = {}",
        placeholder(pg, 1)
    )
}

/// `SELECT ... WHERE id = <param>`.
pub fn find_by_id(pg: bool) -> String {
    format!(
        "SELECT {COLUMNS} FROM {TABLE} WHERE id = {}",
        placeholder(pg, 1)
    )
}

/// `DELETE ... WHERE id = <param> RETURNING ...` (PostgreSQL/SQLite).
pub fn delete_by_id_returning(pg: bool) -> String {
    format!(
        "DELETE FROM {TABLE} WHERE id = {} RETURNING {COLUMNS}",
        placeholder(pg, 1)
    )
}

/// All accounts ordered by id.
pub fn list_all() -> String {
    format!("SELECT {COLUMNS} FROM {TABLE} ORDER BY id")
}

/// `UPDATE ... SET <columns>, updated_at = <param> WHERE subject_id = <param>`.
///
/// Bind order: one value per column in `columns`, then `updated_at`, then
/// the subject id.
pub fn update_by_subject(pg: bool, columns: &[&str]) -> String {
    let mut sets: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| format!("{col} = {}", placeholder(pg, i + 1)))
        .collect();
    sets.push(format!("updated_at = {}", placeholder(pg, columns.len() + 1)));
    format!(
        "UPDATE {TABLE} SET {} WHERE subject_id = {}",
        sets.join(", "),
        placeholder(pg, columns.len() + 2)
    )
}

fn placeholder(pg: bool, n: usize) -> String {
    if pg { format!("${n}") } else { "?".to_string() }
}
