/*!
 * Jailed VFS Tests
 * Escape attempts through `..`, absolute overrides and renames
 */

use futures::StreamExt;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;
use vfs_io::{Dispatcher, JailedVfs, LocalVfs, Vfs, VfsFile};

fn setup() -> (TempDir, VfsFile) {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("a/b/inner")).unwrap();
    std::fs::create_dir_all(temp.path().join("etc")).unwrap();
    std::fs::write(temp.path().join("etc/passwd"), b"root:x:0:0").unwrap();
    std::fs::write(temp.path().join("a/b/inner/file.txt"), b"jailed").unwrap();

    let vfs = LocalVfs::with_dispatcher(temp.path(), Dispatcher::new(2));
    let jail = VfsFile::root(Arc::new(vfs)).get("/a/b").unwrap().jail().unwrap();
    (temp, jail)
}

#[tokio::test]
async fn test_parent_traversal_cannot_escape() {
    let (temp, jail) = setup();

    let target = jail.get("../../etc/passwd").unwrap();
    let host = target.absolute_path().unwrap();
    assert!(std::path::Path::new(&host).starts_with(temp.path().join("a/b")));

    assert!(!target.exists().await.unwrap());
    assert!(target.read_bytes().await.is_err());
}

#[tokio::test]
async fn test_raw_vfs_calls_are_revalidated() {
    let (temp, jail) = setup();
    let vfs = jail.vfs().clone();

    // Bypassing VfsFile navigation still cannot reach outside
    let stat = vfs.stat("/../../../etc/passwd").await.unwrap();
    assert!(!stat.exists);
    assert_eq!(stat.path, "/etc/passwd");

    assert!(vfs.rename("/inner/file.txt", "../../../stolen.txt").await.unwrap());
    assert!(temp.path().join("a/b/stolen.txt").exists());
    assert!(!temp.path().join("stolen.txt").exists());
}

#[tokio::test]
async fn test_jail_reads_and_lists_inside() {
    let (_temp, jail) = setup();

    let file = jail.get("inner/file.txt").unwrap();
    assert_eq!(file.read_string().await.unwrap(), "jailed");

    let mut listing = jail.get("inner").unwrap().list().await.unwrap();
    let child = listing.next().await.unwrap().unwrap();
    assert_eq!(child.path(), "/inner/file.txt");
    assert_eq!(child.read_string().await.unwrap(), "jailed");
}

#[tokio::test]
async fn test_nested_jail() {
    let (_temp, jail) = setup();
    let inner = jail.get("inner").unwrap().jail().unwrap();

    assert_eq!(inner.get("../..").unwrap().path(), "/");
    assert_eq!(inner.get("file.txt").unwrap().read_string().await.unwrap(), "jailed");
    assert_eq!(inner.vfs().name(), "jail");
}

#[test]
fn test_jail_rejects_malformed_root() {
    let temp = TempDir::new().unwrap();
    let vfs: Arc<dyn Vfs> = Arc::new(LocalVfs::with_dispatcher(temp.path(), Dispatcher::new(1)));
    assert!(JailedVfs::new(vfs, "bad\0root").is_err());
}
