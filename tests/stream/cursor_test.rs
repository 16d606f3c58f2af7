/*!
 * Stream Cursor Tests
 * Position accounting, bulk reads and alignment across backends
 */

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;
use vfs_io::core::limits::DEFAULT_SCAN_LIMIT;
use vfs_io::{FillStreamBase, MemoryStreamBase, Stream, StreamBase, VfsError};

#[tokio::test]
async fn test_memory_write_then_read_round_trip() {
    let base = Arc::new(MemoryStreamBase::new());
    let mut writer = Stream::new(base.clone());
    writer.write(b"The quick brown fox").await.unwrap();

    let mut reader = Stream::at(base, 4);
    assert_eq!(reader.read_bytes_exact(5).await.unwrap(), b"quick");
    assert_eq!(reader.position(), 9);
}

#[tokio::test]
async fn test_fill_backend_clamps() {
    let mut stream = Stream::fill(0xAA, 10);
    let mut buf = [0u8; 20];
    assert_eq!(stream.read(&mut buf).await.unwrap(), 10);
    assert!(buf[..10].iter().all(|&b| b == 0xAA));
    assert_eq!(stream.read(&mut buf).await.unwrap(), 0);
    assert_eq!(stream.position(), 10);
}

#[tokio::test]
async fn test_unbounded_fill_has_length() {
    let stream = Stream::new(Arc::new(FillStreamBase::unbounded(0)));
    assert!(stream.has_length().await);
    assert_eq!(stream.length().await.unwrap(), u64::MAX);
}

#[tokio::test]
async fn test_base_without_length() {
    #[derive(Debug)]
    struct Pipe;

    #[async_trait::async_trait]
    impl StreamBase for Pipe {
        async fn read(&self, position: u64, buf: &mut [u8]) -> vfs_io::VfsResult<usize> {
            if position >= 3 {
                return Ok(0);
            }
            buf[0] = b'a' + position as u8;
            Ok(1)
        }

        fn name(&self) -> &str {
            "pipe"
        }
    }

    let mut stream = Stream::new(Arc::new(Pipe));
    assert!(!stream.has_length().await);
    assert!(matches!(stream.available().await, Err(VfsError::NotSupported(_))));
    assert_eq!(stream.to_vec().await.unwrap(), b"abc");
    assert_eq!(stream.read_all().await.unwrap(), b"abc");
    assert!(matches!(stream.write(b"x").await, Err(VfsError::NotSupported(_))));
}

#[tokio::test]
async fn test_close_is_idempotent_on_all_backends() {
    let memory = Stream::memory(vec![1, 2, 3]);
    memory.close().await.unwrap();
    memory.close().await.unwrap();

    let slice = memory.slice_with_bounds(0, 2).await.unwrap();
    slice.close().await.unwrap();
    slice.close().await.unwrap();
}

#[tokio::test]
async fn test_line_protocol_consumer() {
    let mut stream = Stream::memory(b"HEAD /index.html HTTP/1.1\r\nAccept: */*\r\n\r\nbody".to_vec());

    let mut headers = Vec::new();
    loop {
        let line = stream.read_line(DEFAULT_SCAN_LIMIT).await.unwrap();
        if line.is_empty() {
            break;
        }
        headers.push(line);
    }

    assert_eq!(headers, vec!["HEAD /index.html HTTP/1.1", "Accept: */*"]);
    assert_eq!(stream.read_available().await.unwrap(), b"body");
}

#[tokio::test]
async fn test_write_to_align_then_skip_to_align() {
    let mut stream = Stream::memory(Vec::new());
    stream.write_u8(1).await.unwrap();
    stream.write_to_align(4, 0).await.unwrap();
    stream.write_u32_le(7).await.unwrap();
    assert_eq!(stream.length().await.unwrap(), 8);

    stream.set_position(1);
    stream.skip_to_align(4).await.unwrap();
    assert_eq!(stream.read_u32_le().await.unwrap(), 7);
}

proptest! {
    #[test]
    fn prop_skip_to_align_is_smallest_multiple(position in 0u64..1_000_000) {
        let mut stream = Stream::fill(0, u64::MAX);
        stream.set_position(position);
        tokio_test::block_on(stream.skip_to_align(8)).unwrap();
        let aligned = stream.position();

        prop_assert_eq!(aligned % 8, 0);
        prop_assert!(aligned >= position);
        prop_assert!(aligned < position + 8);
    }

    #[test]
    fn prop_memory_write_read(data in proptest::collection::vec(any::<u8>(), 1..256), offset in 0u64..64) {
        let stream = Stream::memory(vec![0u8; 64]);
        let readback = tokio_test::block_on(async {
            let mut writer = stream.clone();
            writer.set_position(offset);
            writer.write(&data).await.unwrap();

            let mut reader = stream.clone();
            reader.set_position(offset);
            reader.read_bytes_exact(data.len()).await.unwrap()
        });
        prop_assert_eq!(readback, data);
    }
}
