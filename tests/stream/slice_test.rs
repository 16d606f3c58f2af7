/*!
 * Slice View Tests
 * Window clamping and flattening over shared bases
 */

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;
use vfs_io::{MemoryStreamBase, SliceStreamBase, Stream, StreamBase};

fn numbered(len: u8) -> Stream {
    Stream::memory((0..len).collect::<Vec<u8>>())
}

#[tokio::test]
async fn test_nested_slices_flatten() {
    let stream = numbered(200);
    let mut level = stream.clone();
    for _ in 0..10 {
        level = level.slice_with_bounds(1, 150).await.unwrap();
    }

    let flat = level.base().as_slice().unwrap();
    assert_eq!(flat.start(), 10);
    assert!(flat.inner().as_slice().is_none());
    assert_eq!(level.read_bytes(3).await.unwrap(), vec![10, 11, 12]);
}

#[tokio::test]
async fn test_slice_writes_reach_base_but_not_beyond_window() {
    let base = Arc::new(MemoryStreamBase::from_vec(vec![0; 10]));
    let stream = Stream::new(base.clone());

    let mut window = stream.slice_with_size(2, 3).await.unwrap();
    window.write(&[7; 8]).await.unwrap();

    assert_eq!(base.to_vec(), vec![0, 0, 7, 7, 7, 0, 0, 0, 0, 0]);
    assert_eq!(window.position(), 8);
    assert!(window.set_length(1).await.is_err());
}

#[tokio::test]
async fn test_read_slice_header_then_body() {
    let mut stream = Stream::memory(Vec::new());
    stream.write_u16_be(5).await.unwrap();
    stream.write(b"hello world").await.unwrap();
    stream.set_position(0);

    let len = stream.read_u16_be().await.unwrap();
    let body = stream.read_slice(u64::from(len)).await.unwrap();
    assert_eq!(body.to_vec().await.unwrap(), b"hello");
    assert_eq!(stream.read_available().await.unwrap(), b" world");
}

#[tokio::test]
async fn test_slice_start_and_here() {
    let mut stream = numbered(10);
    let tail = stream.slice_start(7).await.unwrap();
    assert_eq!(tail.to_vec().await.unwrap(), vec![7, 8, 9]);

    stream.skip(4).unwrap();
    let here = stream.slice_here().await.unwrap();
    assert_eq!(here.length().await.unwrap(), 6);
}

proptest! {
    #[test]
    fn prop_out_of_window_access_is_inert(start in 0u64..16, size in 0u64..16, pos in 0u64..64) {
        let base = Arc::new(MemoryStreamBase::from_vec(vec![0xEE; 32]));
        let slice = SliceStreamBase::new(base.clone(), start, start + size);
        let pos = size + pos;

        let n = tokio_test::block_on(async {
            slice.write(pos, &[1, 2, 3]).await.unwrap();
            let mut buf = [0u8; 4];
            slice.read(pos, &mut buf).await.unwrap()
        });

        prop_assert_eq!(n, 0);
        prop_assert!(base.to_vec().iter().all(|&b| b == 0xEE));
    }
}
