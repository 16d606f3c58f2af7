/*!
 * Local VFS Tests
 * Stat, listing, open modes and file helpers against a temp directory
 */

use futures::StreamExt;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::sync::Arc;
use tempfile::TempDir;
use vfs_io::{Dispatcher, LocalVfs, Vfs, VfsError, VfsFile, VfsOpenMode};

fn setup() -> (TempDir, VfsFile) {
    let temp = TempDir::new().unwrap();
    let vfs = LocalVfs::with_dispatcher(temp.path(), Dispatcher::new(4));
    let root = VfsFile::root(Arc::new(vfs));
    (temp, root)
}

async fn names(dir: &VfsFile) -> BTreeSet<String> {
    let mut listing = dir.list().await.unwrap();
    let mut out = BTreeSet::new();
    while let Some(file) = listing.next().await {
        out.insert(file.unwrap().basename().to_string());
    }
    out
}

#[tokio::test]
async fn test_stat_existing_and_missing() {
    let (temp, root) = setup();
    std::fs::write(temp.path().join("data.bin"), vec![7u8; 42]).unwrap();

    let stat = root.get("data.bin").unwrap().stat().await.unwrap();
    assert!(stat.exists);
    assert!(!stat.is_directory);
    assert_eq!(stat.size, 42);
    assert_eq!(stat.path, "/data.bin");

    let missing = root.get("nope/deeper").unwrap().stat().await.unwrap();
    assert!(!missing.exists);

    assert!(root.stat().await.unwrap().is_directory);
}

#[tokio::test]
async fn test_list_is_stable_and_non_recursive() {
    let (temp, root) = setup();
    for name in ["one.txt", "two.txt", "three.txt"] {
        std::fs::write(temp.path().join(name), name).unwrap();
    }
    std::fs::create_dir_all(temp.path().join("sub/nested")).unwrap();

    let first = names(&root).await;
    let second = names(&root).await;
    assert_eq!(first, second);

    let expected: BTreeSet<String> = ["one.txt", "sub", "three.txt", "two.txt"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(first, expected);
}

#[tokio::test]
async fn test_listed_files_carry_their_vfs() {
    let (temp, root) = setup();
    std::fs::create_dir(temp.path().join("dir")).unwrap();
    std::fs::write(temp.path().join("dir/inner.txt"), b"inside").unwrap();

    let mut listing = root.get("dir").unwrap().list().await.unwrap();
    let file = listing.next().await.unwrap().unwrap();
    assert_eq!(file.path(), "/dir/inner.txt");
    assert_eq!(file.read_string().await.unwrap(), "inside");
    assert!(listing.next().await.is_none());
}

#[tokio::test]
async fn test_open_modes_on_disk() {
    let (temp, root) = setup();
    let file = root.get("log.txt").unwrap();

    assert!(matches!(
        file.open(VfsOpenMode::Write).await,
        Err(VfsError::IoFault(_))
    ));

    let mut stream = file.open(VfsOpenMode::Create).await.unwrap();
    stream.write(b"abc").await.unwrap();
    stream.close().await.unwrap();

    // Create keeps existing contents
    let mut stream = file.open(VfsOpenMode::Create).await.unwrap();
    assert_eq!(stream.read_all().await.unwrap(), b"abc");
    stream.close().await.unwrap();

    let mut stream = file.open(VfsOpenMode::Append).await.unwrap();
    assert_eq!(stream.position(), 3);
    stream.write(b"def").await.unwrap();
    assert_eq!(stream.position(), 6);
    assert_eq!(stream.length().await.unwrap(), 6);
    stream.set_position(3);
    assert_eq!(stream.read_bytes(10).await.unwrap(), b"def");
    stream.close().await.unwrap();
    assert_eq!(std::fs::read(temp.path().join("log.txt")).unwrap(), b"abcdef");

    let stream = file.open(VfsOpenMode::CreateOrTruncate).await.unwrap();
    assert_eq!(stream.length().await.unwrap(), 0);
    stream.close().await.unwrap();
}

#[tokio::test]
async fn test_disk_stream_slices_and_codec() {
    let (_temp, root) = setup();
    let file = root.get("table.bin").unwrap();

    let mut stream = file.open(VfsOpenMode::CreateNew).await.unwrap();
    for i in 0..16u32 {
        stream.write_u32_be(i * 10).await.unwrap();
    }

    let mut window = stream.slice_with_size(8 * 4, 4 * 4).await.unwrap();
    assert_eq!(window.read_u32_be().await.unwrap(), 80);
    window.set_position(12);
    assert_eq!(window.read_u32_be().await.unwrap(), 110);
    assert!(window.read_u32_be().await.unwrap_err().is_end_of_data());

    stream.set_position(4);
    stream.truncate().await.unwrap();
    assert_eq!(file.size().await.unwrap(), 4);
    stream.close().await.unwrap();
}

#[tokio::test]
async fn test_set_size_and_boolean_failures() {
    let (_temp, root) = setup();
    let file = root.get("grow.bin").unwrap();
    file.write_bytes(b"12345").await.unwrap();

    file.set_size(100).await.unwrap();
    assert_eq!(file.size().await.unwrap(), 100);
    file.set_size(1).await.unwrap();
    assert_eq!(file.read_bytes().await.unwrap(), b"1");

    let dir = root.get("dir").unwrap();
    assert!(dir.mkdir().await.unwrap());
    assert!(!dir.mkdir().await.unwrap());
    assert!(!root.get("missing/child").unwrap().mkdir().await.unwrap());
    assert!(!root.get("missing").unwrap().delete().await.unwrap());
}

#[tokio::test]
async fn test_absolute_path_uses_host_root() {
    let (temp, root) = setup();
    let vfs = root.vfs().clone();
    assert_eq!(
        vfs.absolute_path("/x/y").unwrap(),
        temp.path().join("x").join("y").display().to_string()
    );
    assert_eq!(vfs.name(), "local");
}
