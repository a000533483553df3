//! Tests against a running MySQL or MariaDB server.
//!
//! Ignored by default. Point them at a scratch schema and run:
//!
//! ```text
//! DBSHIM_MYSQL_HOST=127.0.0.1 DBSHIM_MYSQL_USER=root DBSHIM_MYSQL_PASSWORD=secret \
//! DBSHIM_MYSQL_DATABASE=dbshim_test cargo test --test mysql_live -- --ignored
//! ```

use dbshim::{ColumnMap, ConnectionConfig, DatabaseType, Db, DbConfig, DbError, Value};

fn live_config() -> DbConfig {
    let var = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());

    let mut config = DbConfig::mysql(
        var("DBSHIM_MYSQL_HOST", "127.0.0.1"),
        var("DBSHIM_MYSQL_USER", "root"),
        var("DBSHIM_MYSQL_PASSWORD", ""),
        var("DBSHIM_MYSQL_DATABASE", "dbshim_test"),
    );
    if let Some(port) = std::env::var("DBSHIM_MYSQL_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
    {
        config = config.with_port(port);
    }
    config
}

fn fresh_table(db: &mut Db, table: &str) {
    db.execute(&format!("DROP TABLE IF EXISTS {table}")).unwrap();
    db.execute(&format!(
        "CREATE TABLE {table} (\
            id INT AUTO_INCREMENT PRIMARY KEY, \
            title VARCHAR(64) NOT NULL UNIQUE, \
            price INT, \
            weight DOUBLE, \
            cost DECIMAL(8,2), \
            added DATE, \
            payload BLOB)"
    ))
    .unwrap();
}

#[test]
#[ignore = "needs a MySQL server"]
fn test_mysql_products_scenario() {
    let mut db = Db::connect(&live_config()).unwrap();
    assert_eq!(db.instance().unwrap().database_type(), DatabaseType::MySQL);
    fresh_table(&mut db, "scenario_products");

    let table = "scenario_products";
    assert!(db
        .insert(table, &ColumnMap::new().with("title", "A").with("price", 10))
        .unwrap());
    assert_eq!(db.last_insert_id(), Some(1));
    assert!(db
        .insert(table, &ColumnMap::new().with("title", "B").with("price", 20))
        .unwrap());

    let row = db
        .get(table, Some(&ColumnMap::new().with("title", "A")))
        .unwrap()
        .row()
        .unwrap();
    assert_eq!(row.get("price"), Some(&Value::Int(10)));

    assert!(db
        .update(
            table,
            &ColumnMap::new().with("title", "Z"),
            &ColumnMap::new().with("title", "A"),
        )
        .unwrap());
    assert!(!db
        .delete(table, &ColumnMap::new().with("title", "nonexistent"))
        .unwrap());
    assert_eq!(db.get(table, None).unwrap().result().len(), 2);

    db.execute(&format!("DROP TABLE {table}")).unwrap();
    db.close().unwrap();
}

#[test]
#[ignore = "needs a MySQL server"]
fn test_mysql_update_counts_matched_rows() {
    let mut db = Db::connect(&live_config()).unwrap();
    let table = "matched_products";
    fresh_table(&mut db, table);

    db.insert(table, &ColumnMap::new().with("title", "Z").with("price", 10))
        .unwrap();

    // Same values as stored: the row matches, so it counts
    let rewritten = db
        .update(
            table,
            &ColumnMap::new().with("title", "Z"),
            &ColumnMap::new().with("title", "Z"),
        )
        .unwrap();
    assert!(rewritten);

    let missed = db
        .update(
            table,
            &ColumnMap::new().with("title", "Y"),
            &ColumnMap::new().with("title", "nonexistent"),
        )
        .unwrap();
    assert!(!missed);

    db.execute(&format!("DROP TABLE {table}")).unwrap();
}

#[test]
#[ignore = "needs a MySQL server"]
fn test_mysql_typed_predicates() {
    let mut db = Db::connect(&live_config()).unwrap();
    let table = "typed_products";
    fresh_table(&mut db, table);

    db.insert(
        table,
        &ColumnMap::new()
            .with("title", "lamp")
            .with("price", 32)
            .with("weight", 1.5),
    )
    .unwrap();
    db.insert(
        table,
        &ColumnMap::new()
            .with("title", "desk")
            .with("price", 120)
            .with("weight", 20.25),
    )
    .unwrap();

    assert!(db
        .update(
            table,
            &ColumnMap::new().with("price", 35),
            &ColumnMap::new().with("price", 32),
        )
        .unwrap());
    assert!(db
        .update(
            table,
            &ColumnMap::new().with("title", "heavy desk"),
            &ColumnMap::new().with("weight", 20.25),
        )
        .unwrap());

    let lamp = db
        .get(table, Some(&ColumnMap::new().with("weight", 1.5)))
        .unwrap()
        .row()
        .unwrap();
    assert_eq!(lamp.get("price"), Some(&Value::Int(35)));

    assert!(!db.delete(table, &ColumnMap::new().with("price", 32)).unwrap());
    assert!(db.delete(table, &ColumnMap::new().with("price", 35)).unwrap());
    assert!(db.delete(table, &ColumnMap::new().with("weight", 20.25)).unwrap());
    assert!(db.get(table, None).unwrap().is_empty());

    db.execute(&format!("DROP TABLE {table}")).unwrap();
}

#[test]
#[ignore = "needs a MySQL server"]
fn test_mysql_no_auto_increment_has_no_insert_id() {
    let mut db = Db::connect(&live_config()).unwrap();
    let table = "plain_tags";
    db.execute(&format!("DROP TABLE IF EXISTS {table}")).unwrap();
    db.execute(&format!("CREATE TABLE {table} (name VARCHAR(32) PRIMARY KEY)"))
        .unwrap();

    assert!(db.insert(table, &ColumnMap::new().with("name", "sale")).unwrap());
    assert_eq!(db.last_insert_id(), None);

    db.execute(&format!("DROP TABLE {table}")).unwrap();
}

#[test]
#[ignore = "needs a MySQL server"]
fn test_mysql_value_decoding() {
    let mut db = Db::connect(&live_config()).unwrap();
    let table = "decoding_products";
    fresh_table(&mut db, table);

    db.execute(&format!(
        "INSERT INTO {table} (title, price, weight, cost, added, payload) \
         VALUES ('lamp', NULL, 1.5, 12.30, '2024-03-01', X'DEADBEEF')"
    ))
    .unwrap();

    let row = db.get(table, None).unwrap().row().unwrap();
    assert_eq!(row.get("price"), Some(&Value::Null));
    assert_eq!(row.get("weight"), Some(&Value::Float(1.5)));
    assert_eq!(row.get("cost"), Some(&Value::from("12.30")));
    assert_eq!(row.get("added"), Some(&Value::from("2024-03-01")));
    assert_eq!(
        row.get("payload"),
        Some(&Value::Bytes(vec![0xde, 0xad, 0xbe, 0xef]))
    );

    db.execute(&format!("DROP TABLE {table}")).unwrap();
}

#[test]
#[ignore = "needs a MySQL server"]
fn test_mysql_errors() {
    let mut db = Db::connect(&live_config()).unwrap();
    let table = "error_products";
    fresh_table(&mut db, table);

    let err = db.get("no_such_table", None).unwrap_err();
    assert!(matches!(err, DbError::Prepare { .. }));

    db.insert(table, &ColumnMap::new().with("title", "dup")).unwrap();
    let err = db
        .insert(table, &ColumnMap::new().with("title", "dup"))
        .unwrap_err();
    assert!(matches!(err, DbError::Exec { .. }));

    db.execute(&format!("DROP TABLE {table}")).unwrap();
}

#[test]
#[ignore = "needs a MySQL server"]
fn test_mysql_bad_credentials() {
    let mut config = live_config();
    config.password = "definitely-not-the-password".to_string();

    let connection = config.to_connection_config().unwrap();
    assert!(matches!(connection, ConnectionConfig { database_type: DatabaseType::MySQL, .. }));

    let err = Db::connect(&config).unwrap_err();
    assert!(matches!(err, DbError::Connection { .. }));
}
