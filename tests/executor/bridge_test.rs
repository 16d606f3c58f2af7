/*!
 * Execution Context Tests
 * Single event loop driving disk I/O through the dispatcher
 */

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use vfs_io::{
    await_completion, event_loop, Dispatcher, IoConfig, LocalVfs, VfsError, VfsFile, VfsOpenMode,
};

#[test]
fn test_event_loop_stays_responsive_during_blocking_jobs() {
    let config = IoConfig::default().with_workers(2);
    let runtime = event_loop(&config).unwrap();

    runtime.block_on(async {
        let dispatcher = Dispatcher::from_config(&config).unwrap();
        let slow = dispatcher.execute(|| {
            std::thread::sleep(Duration::from_millis(200));
            Ok(1)
        });

        // A timer on the single context fires while the job blocks a worker
        let ticker = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            2
        };

        let (slow, tick) = tokio::join!(slow, ticker);
        assert_eq!(slow.unwrap(), 1);
        assert_eq!(tick, 2);
    });
}

#[test]
fn test_many_tasks_share_one_context() {
    let config = IoConfig::default();
    let runtime = event_loop(&config).unwrap();
    let temp = TempDir::new().unwrap();

    runtime.block_on(async {
        let vfs = LocalVfs::with_dispatcher(temp.path(), Dispatcher::from_config(&config).unwrap());
        let root = VfsFile::root(Arc::new(vfs));

        let writers = (0..16).map(|i| {
            let file = root.get(&format!("file{}.txt", i)).unwrap();
            async move {
                file.write_string(&format!("payload {}", i)).await.unwrap();
                file.read_string().await.unwrap()
            }
        });
        let contents = futures::future::join_all(writers).await;
        for (i, content) in contents.iter().enumerate() {
            assert_eq!(content, &format!("payload {}", i));
        }

        let mut stream = root.get("file3.txt").unwrap().open(VfsOpenMode::Read).await.unwrap();
        assert_eq!(stream.read_bytes(7).await.unwrap(), b"payload");
    });
}

#[tokio::test]
async fn test_completion_bridge_with_native_style_callback() {
    // A callback-style API that reports from another thread
    fn native_read(fail: bool, callback: impl FnOnce(Result<Vec<u8>, String>) + Send + 'static) {
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(5));
            callback(if fail { Err("device gone".into()) } else { Ok(vec![1, 2, 3]) });
        });
    }

    let data = await_completion(|handler| {
        native_read(false, move |result| {
            handler.complete(result.map_err(VfsError::IoFault))
        })
    })
    .await
    .unwrap();
    assert_eq!(data, vec![1, 2, 3]);

    let err = await_completion::<Vec<u8>, _>(|handler| {
        native_read(true, move |result| {
            handler.complete(result.map_err(VfsError::IoFault))
        })
    })
    .await
    .unwrap_err();
    assert_eq!(err, VfsError::IoFault("device gone".into()));
}
