/*!
 * Process Execution Tests
 * Output streaming and final drain of subprocess pipes
 */

#![cfg(unix)]

use bytes::Bytes;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use vfs_io::{Dispatcher, LocalVfs, ProcessHandler, ProcessOutput, VfsError, VfsFile};

fn setup() -> (TempDir, VfsFile) {
    let temp = TempDir::new().unwrap();
    let vfs = LocalVfs::with_dispatcher(temp.path(), Dispatcher::new(2)).with_exec_chunk_size(16);
    (temp, VfsFile::root(Arc::new(vfs)))
}

fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}

/// Records which stream each chunk came from
#[derive(Default)]
struct Recorder {
    events: Vec<(char, Bytes)>,
}

impl ProcessHandler for Recorder {
    fn on_out(&mut self, chunk: Bytes) {
        self.events.push(('o', chunk));
    }

    fn on_err(&mut self, chunk: Bytes) {
        self.events.push(('e', chunk));
    }
}

#[tokio::test]
async fn test_alternating_streams_are_fully_drained() {
    let (_temp, root) = setup();
    let script = "i=0; while [ $i -lt 200 ]; do echo out$i; echo err$i 1>&2; i=$((i+1)); done";

    let mut output = ProcessOutput::new();
    let code = root.exec(&sh(script), &mut output).await.unwrap();
    assert_eq!(code, 0);

    let expected_out: String = (0..200).map(|i| format!("out{}\n", i)).collect();
    let expected_err: String = (0..200).map(|i| format!("err{}\n", i)).collect();
    assert_eq!(output.stdout_string(), expected_out);
    assert_eq!(output.stderr_string(), expected_err);
}

#[tokio::test]
async fn test_trailing_output_after_exit_is_kept() {
    let (_temp, root) = setup();
    // Large burst written right before exiting
    let script = "head -c 200000 /dev/zero | tr '\\0' 'x'; printf tail 1>&2";

    let mut output = ProcessOutput::new();
    assert_eq!(root.exec(&sh(script), &mut output).await.unwrap(), 0);
    assert_eq!(output.stdout().len(), 200_000);
    assert_eq!(output.stderr(), b"tail");
}

#[tokio::test]
async fn test_both_streams_reach_handler() {
    let (_temp, root) = setup();
    let mut recorder = Recorder::default();
    root.exec(&sh("echo a; echo b 1>&2"), &mut recorder)
        .await
        .unwrap();

    assert!(recorder.events.iter().any(|(kind, _)| *kind == 'o'));
    assert!(recorder.events.iter().any(|(kind, _)| *kind == 'e'));
    assert!(recorder.events.iter().all(|(_, chunk)| !chunk.is_empty()));
}

#[tokio::test]
async fn test_exit_code_and_working_directory() {
    let (temp, root) = setup();
    std::fs::create_dir(temp.path().join("work")).unwrap();

    let work = root.get("work").unwrap();
    let mut output = ProcessOutput::new();
    assert_eq!(work.exec(&sh("pwd; exit 7"), &mut output).await.unwrap(), 7);

    let reported = std::fs::canonicalize(output.stdout_string().trim()).unwrap();
    assert_eq!(reported, std::fs::canonicalize(temp.path().join("work")).unwrap());
}

#[tokio::test]
async fn test_spawn_failure_is_io_fault() {
    let (_temp, root) = setup();
    let mut output = ProcessOutput::new();
    let result = root
        .exec(&["./no-such-program".to_string()], &mut output)
        .await;
    assert!(matches!(result, Err(VfsError::IoFault(_))));
}

#[tokio::test]
async fn test_cancelled_exec_lets_process_finish() {
    let (temp, root) = setup();
    let marker = temp.path().join("done");

    let mut output = ProcessOutput::new();
    let cancelled = tokio::time::timeout(
        Duration::from_millis(100),
        root.exec(&sh("sleep 0.5; touch done; echo late"), &mut output),
    )
    .await;
    assert!(cancelled.is_err());
    assert!(!marker.exists());

    // The process keeps running after its waiter is gone
    for _ in 0..50 {
        if marker.exists() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(marker.exists());
    assert!(output.stdout().is_empty());
}
