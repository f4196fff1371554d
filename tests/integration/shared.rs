//! Concurrent readers against a single writer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::common::{generated_corpus, sample_index};
use fuzzdex::{SearchOptions, SharedIndex};

#[test]
fn readers_never_see_a_half_applied_update() {
    let shared = SharedIndex::new(sample_index());
    let batch = generated_corpus(500, 11);
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            let done = Arc::clone(&done);
            let needle = batch[499].clone();
            thread::spawn(move || {
                let mut checks = 0usize;
                while !done.load(Ordering::Acquire) || checks == 0 {
                    let index = shared.read();
                    let len = index.len();
                    let found = index
                        .search_uncached(&needle, 1, &SearchOptions::default())
                        .first()
                        .is_some_and(|r| r.display == needle);
                    // The last generated word is present exactly when the whole batch is
                    assert_eq!(found, len == 520, "len {}", len);
                    drop(index);
                    let top = shared.search("apple", 1, &SearchOptions::default());
                    assert_eq!(top[0].display, "apple");
                    checks += 1;
                }
                checks
            })
        })
        .collect();

    shared.update(batch.iter()).unwrap();
    done.store(true, Ordering::Release);
    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(shared.read().len(), 520);
}

#[test]
fn shared_handle_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SharedIndex>();
}
