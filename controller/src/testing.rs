//! 测试用数据库工具

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};

/// 内存 SQLite，只保留一个连接以保证所有语句落在同一个库上
pub async fn memory_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    Database::connect(options)
        .await
        .expect("failed to open in-memory sqlite")
}

/// 绕过种子逻辑直接插入一行模板（用于构造重复、脏数据等场景）
pub async fn insert_raw_template(
    db: &DatabaseConnection,
    game_key: &str,
    steam_app_id: Option<i64>,
    required_ports: &str,
    env_vars: &str,
    supported_os: &str,
) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO game_template (game_key, name, steam_app_id, required_ports, env_vars, supported_os) \
         VALUES (?, ?, ?, ?, ?, ?)",
        [
            game_key.into(),
            game_key.into(),
            steam_app_id.into(),
            required_ports.into(),
            env_vars.into(),
            supported_os.into(),
        ],
    ))
    .await
    .expect("failed to insert template row");
}
