//! Tests for the byte ring

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use crate::error::RingError;
    use crate::ringbuf::*;

    #[repr(C, align(16))]
    struct Region([u8; 96]);

    fn drain<S: RingStorage>(ring: &mut RingBuffer<S>) -> Vec<Vec<u8>> {
        let mut chunks = Vec::new();
        loop {
            let chunk = ring.next_chunk().to_vec();
            if chunk.is_empty() {
                break;
            }
            ring.mark_consumed(chunk.len());
            chunks.push(chunk);
        }
        chunks
    }

    #[test]
    fn test_ring_buffer_basic() {
        let mut ring = RingBuffer::new(16).unwrap();

        assert!(ring.is_empty());
        assert_eq!(ring.capacity(), 16);
        assert_eq!(ring.storage_kind(), StorageKind::Exclusive);

        ring.put(b"hello").unwrap();
        assert_eq!(ring.pending(), 5);
        assert_eq!(ring.free_space(), 11);
        assert_eq!(ring.shape(), RingShape::Contiguous);

        assert_eq!(ring.next_chunk(), b"hello");
        ring.mark_consumed(5);
        assert!(ring.is_empty());
        assert_eq!(ring.shape(), RingShape::Empty);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = RingBuffer::new(0).unwrap_err();
        assert!(matches!(err, RingError::InvalidParameter { .. }));
    }

    #[test]
    #[traced_test]
    fn test_allocation_failure_is_logged() {
        let err = RingBuffer::new(usize::MAX).unwrap_err();
        assert_eq!(err, RingError::OutOfMemory { requested: usize::MAX });
        assert!(logs_contain("out of memory allocating ring buffer storage"));
    }

    #[test]
    fn test_fresh_ring_has_nothing_to_read() {
        let ring = RingBuffer::new(10).unwrap();
        assert!(ring.next_chunk().is_empty());
        assert_eq!(ring.pending(), 0);
        assert_eq!(ring.free_space(), 10);
    }

    #[test]
    fn test_fill_through_writable() {
        let mut ring = RingBuffer::new(10).unwrap();

        let space = ring.writable();
        assert_eq!(space.len(), 10);
        space.copy_from_slice(b"abcdefghik");
        ring.wrote(10);

        assert!(ring.writable().is_empty());
        assert!(ring.is_full());
        assert_eq!(ring.shape(), RingShape::Full);

        assert_eq!(ring.next_chunk(), b"abcdefghik");
        ring.mark_consumed(10);
        assert!(ring.next_chunk().is_empty());
    }

    #[test]
    fn test_put_wraps_into_two_runs() {
        let mut ring = RingBuffer::new(10).unwrap();
        ring.put(b"0123456").unwrap();
        ring.mark_consumed(5);

        // write=7, read=5: free space is [7, 10) then [0, 5)
        ring.put(b"abcdefg").unwrap();
        assert_eq!(ring.shape(), RingShape::Wrapped);
        assert_eq!(ring.pending(), 9);

        assert_eq!(drain(&mut ring), vec![b"56abc".to_vec(), b"defg".to_vec()]);
    }

    #[test]
    fn test_put_into_contiguous_gap() {
        let mut ring = RingBuffer::new(8).unwrap();
        ring.put(b"abcdefgh").unwrap();
        ring.mark_consumed(6);
        ring.put(b"ij").unwrap();

        // write=2, read=6: the only free run is [2, 6)
        assert_eq!(ring.header().write_pos(), 2);
        assert_eq!(ring.header().read_pos(), 6);
        assert_eq!(ring.shape(), RingShape::Wrapped);
        assert_eq!(ring.writable().len(), 4);

        ring.put(b"klmn").unwrap();
        assert!(ring.is_full());
        assert_eq!(drain(&mut ring), vec![b"gh".to_vec(), b"ijklmn".to_vec()]);
    }

    #[test]
    fn test_put_fails_without_mutation() {
        let mut ring = RingBuffer::new(4).unwrap();
        ring.put(b"abc").unwrap();
        let before = *ring.header();

        let err = ring.put(b"de").unwrap_err();
        assert_eq!(
            err,
            RingError::InsufficientSpace {
                requested: 2,
                available: 1
            }
        );
        assert_eq!(*ring.header(), before);
    }

    #[test]
    fn test_full_ring_rejects_any_put() {
        let mut ring = RingBuffer::new(3).unwrap();
        ring.put(b"xyz").unwrap();
        assert!(ring.put(b"a").is_err());
        assert!(ring.put(b"").is_ok());
        assert!(ring.writable().is_empty());
    }

    #[test]
    fn test_writable_wrap_after_full_consume() {
        let mut ring = RingBuffer::new(10).unwrap();
        ring.put(b"hello, ed").unwrap();
        ring.mark_consumed(9);

        let space = ring.writable();
        assert_eq!(space.len(), 1);
        space.copy_from_slice(b"a");
        ring.wrote(1);

        let space = ring.writable();
        assert_eq!(space.len(), 9);
        space.copy_from_slice(b"bcdefghij");
        ring.wrote(9);

        assert_eq!(drain(&mut ring), vec![b"a".to_vec(), b"bcdefghij".to_vec()]);
    }

    #[test]
    fn test_clear_rewinds_everything() {
        let mut ring = RingBuffer::new(10).unwrap();
        ring.put(b"1234567").unwrap();
        ring.mark_consumed(4);
        ring.put(b"89ab").unwrap();

        ring.clear();
        assert_eq!(ring.pending(), 0);
        assert_eq!(ring.free_space(), 10);
        assert_eq!(ring.header().write_pos(), 0);
        assert_eq!(ring.header().read_pos(), 0);
        assert_eq!(ring.writable().len(), 10);
    }

    #[test]
    #[should_panic(expected = "writable run")]
    fn test_wrote_beyond_run_panics() {
        let mut ring = RingBuffer::new(10).unwrap();
        ring.put(b"hello, ed").unwrap();
        ring.mark_consumed(9);
        // Only one byte to the end of storage even though ten are free
        ring.wrote(2);
    }

    #[test]
    #[should_panic(expected = "writable run")]
    fn test_wrote_on_full_ring_panics() {
        let mut ring = RingBuffer::new(4).unwrap();
        ring.put(b"full").unwrap();
        ring.wrote(1);
    }

    #[test]
    #[should_panic(expected = "pending")]
    fn test_consume_beyond_pending_panics() {
        let mut ring = RingBuffer::new(4).unwrap();
        ring.put(b"ab").unwrap();
        ring.mark_consumed(3);
    }

    #[test]
    fn test_region_ring_basic() {
        let mut backing = Region([0; 96]);
        let mut ring = RingBuffer::from_region(&mut backing.0).unwrap();

        assert_eq!(ring.capacity(), 96 - METADATA_OVERHEAD);
        assert_eq!(ring.storage_kind(), StorageKind::Borrowed);

        ring.put(b"framed").unwrap();
        assert_eq!(ring.next_chunk(), b"framed");

        let region = ring.into_region();
        assert_eq!(&region[METADATA_OVERHEAD..METADATA_OVERHEAD + 6], b"framed");
    }

    #[test]
    fn test_region_too_small() {
        let mut backing = Region([0x5A; 96]);
        let err = RingBuffer::from_region(&mut backing.0[..METADATA_OVERHEAD])
            .unwrap_err();
        assert_eq!(
            err,
            RingError::RegionTooSmall {
                size: METADATA_OVERHEAD,
                minimum: MIN_REGION_SIZE
            }
        );
        assert!(backing.0.iter().all(|&b| b == 0x5A));

        let ring = RingBuffer::from_region(&mut backing.0[..MIN_REGION_SIZE]).unwrap();
        assert_eq!(ring.capacity(), 1);
    }

    #[test]
    fn test_reattach_keeps_pending_bytes() {
        let mut backing = Region([0; 96]);

        let mut ring = RingBuffer::from_region(&mut backing.0).unwrap();
        ring.put(b"survives").unwrap();
        ring.mark_consumed(3);
        let region = ring.into_region();

        let mut ring = RingBuffer::reattach(region).unwrap();
        assert_eq!(ring.pending(), 5);
        assert_eq!(ring.next_chunk(), b"vives");
        ring.mark_consumed(5);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_reattach_rejects_fresh_memory() {
        let mut backing = Region([0; 96]);
        let err = RingBuffer::reattach(&mut backing.0).unwrap_err();
        assert!(matches!(err, RingError::CorruptHeader { .. }));
    }

    #[test]
    fn test_named_ring_debug_output() {
        let config = RingBufferConfigBuilder::new("rx-frames")
            .capacity(32)
            .build()
            .unwrap();
        let ring = RingBuffer::with_config(config).unwrap();
        assert_eq!(ring.name(), "rx-frames");

        let debug = format!("{:?}", ring);
        assert!(debug.contains("rx-frames"));
        assert!(debug.contains("Exclusive"));
        assert!(debug.contains("Empty"));
    }

    #[test]
    fn test_release_owned_ring() {
        let mut ring = RingBuffer::new(8).unwrap();
        ring.put(b"bye").unwrap();
        ring.release();
    }
}
