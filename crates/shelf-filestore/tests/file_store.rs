use bytes::Bytes;
use shelf_connection::ConnectionState;
use shelf_filestore::{FileStore, FileStoreError, MemoryFileDriver};
use std::sync::Arc;

const MENU: &str = "menu.txt";
const LOGO: &str = "images/logo.png";

async fn file_store_with_files() -> FileStore {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();

    let files = FileStore::new(Arc::new(MemoryFileDriver::new()));
    files.connect().await.unwrap();

    files.write_file(MENU, "Margherita, Calzone").await.unwrap();
    files
        .write_file(LOGO, vec![0x89, 0x50, 0x4e, 0x47])
        .await
        .unwrap();

    files
}

#[tokio::test]
async fn test_reads_written_files() {
    let files = file_store_with_files().await;

    assert!(files.has_file(MENU).await.unwrap());
    assert_eq!(files.read_file(MENU).await.unwrap(), "Margherita, Calzone");
    assert_eq!(
        files.read_file(LOGO).await.unwrap(),
        Bytes::from_static(&[0x89, 0x50, 0x4e, 0x47])
    );
    assert_eq!(files.state(), ConnectionState::Connected);

    files.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_overwrites_existing_file() {
    let files = file_store_with_files().await;

    files.write_file(MENU, "Hawaii").await.unwrap();
    assert_eq!(files.read_file(MENU).await.unwrap(), "Hawaii");

    files.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_deletes_files() {
    let files = file_store_with_files().await;

    files.delete_file(MENU).await.unwrap();
    assert!(!files.has_file(MENU).await.unwrap());
    assert!(files.has_file(LOGO).await.unwrap());

    files.clear().await.unwrap();
    assert!(!files.has_file(LOGO).await.unwrap());

    files.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_missing_files() {
    let files = file_store_with_files().await;

    assert!(!files.has_file("missing.txt").await.unwrap());
    assert!(matches!(
        files.read_file("missing.txt").await,
        Err(FileStoreError::FileNotFound(path)) if path == "missing.txt"
    ));
    assert!(matches!(
        files.delete_file("missing.txt").await,
        Err(FileStoreError::FileNotFound(_))
    ));

    files.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_not_connected() {
    let files = file_store_with_files().await;
    files.disconnect().await.unwrap();

    assert!(!files.is_connected());
    assert!(matches!(
        files.read_file(MENU).await,
        Err(FileStoreError::NotConnected)
    ));
    assert!(matches!(
        files.write_file(MENU, "Pepperoni").await,
        Err(FileStoreError::NotConnected)
    ));
}
