use mapalloc::{Allocator, Block};
use proptest::prelude::*;
use std::num::NonZeroUsize;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn resize_preserves_prefix(
        old_size in 0usize..40_000,
        new_size in 1usize..40_000,
        seed in any::<u8>(),
    ) {
        let alloc = Allocator::new();
        let mut block = Block::new(&alloc, old_size).unwrap();

        for (i, b) in block.iter_mut().enumerate() {
            *b = seed.wrapping_add(i as u8);
        }

        block.resize(NonZeroUsize::new(new_size).unwrap()).unwrap();

        prop_assert_eq!(block.len(), new_size);
        for i in 0..old_size.min(new_size) {
            prop_assert_eq!(block[i], seed.wrapping_add(i as u8));
        }
    }

    #[test]
    fn zero_allocate_reads_zero(count in 0usize..512, element_size in 0usize..64) {
        let alloc = Allocator::new();
        let block = Block::zeroed(&alloc, count, element_size).unwrap();

        prop_assert_eq!(block.len(), count * element_size);
        prop_assert!(block.iter().all(|b| *b == 0));
    }

    #[test]
    fn aligned_payloads(size in 0usize..10_000, shift in 0u32..12) {
        let alloc = Allocator::new();
        let align = 1usize << shift;
        let ptr = alloc.allocate_aligned(size, align).unwrap();

        prop_assert_eq!(ptr.as_ptr() as usize % align, 0);

        unsafe {
            prop_assert_eq!(alloc.payload_size(ptr), size);
            alloc.release(ptr.as_ptr());
        }
    }
}
