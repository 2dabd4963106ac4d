use shelf_database::Database;
use shelf_query::{record, Record};

pub const FRUITS: &str = "fruits";
pub const PIZZAS: &str = "pizzas";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

pub fn fruits() -> Vec<Record> {
    vec![
        record! { "id" => "1", "name" => "Apple", "country" => "Belgium", "sprayed" => false },
        record! { "id" => "2", "name" => "Pear", "country" => "Netherlands", "sprayed" => true },
    ]
}

pub fn pizzas() -> Vec<Record> {
    vec![
        record! { "id" => "1", "name" => "Margherita", "size" => 15, "price" => 12.0, "folded" => false },
        record! { "id" => "2", "name" => "Calzone", "size" => 20, "price" => 11.0, "folded" => true },
        record! { "id" => "3", "name" => "Pepperoni", "size" => 18, "price" => 13.5, "folded" => false },
        record! { "id" => "4", "name" => "Vegetarian", "size" => 30, "price" => 8.5, "folded" => true },
        record! { "id" => "5", "name" => "Hawaii", "size" => 20, "price" => 10.0, "folded" => false },
    ]
}

/// Connected memory database holding every fixture
pub async fn database_with_everything() -> Database {
    init_tracing();

    let database = Database::default();
    database.connect().await.unwrap();

    for fruit in fruits() {
        database.create_record(FRUITS, fruit).await.unwrap();
    }
    for pizza in pizzas() {
        database.create_record(PIZZAS, pizza).await.unwrap();
    }

    database
}

/// Identities of the records, in result order
pub fn ids(records: &[Record]) -> Vec<&str> {
    records
        .iter()
        .map(|record| record["id"].as_str().unwrap())
        .collect()
}
