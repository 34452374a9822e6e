//! Concurrency tests for the ticket sequencer.
//!
//! The one hard atomicity requirement in the system is that concurrent
//! callers never observe a duplicate ticket number.

use std::collections::HashSet;
use std::sync::Arc;

use vestibule_core::ManualClock;
use vestibule_store::{MemoryTicketStore, Sequencer, TicketStore};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_joins_never_share_a_ticket() {
    let clock = ManualClock::starting_now();
    let store: Arc<dyn TicketStore> = Arc::new(MemoryTicketStore::new(clock));
    let sequencer = Sequencer::new(store);

    let mut handles = Vec::new();
    for _ in 0..64 {
        let sequencer = sequencer.clone();
        handles.push(tokio::spawn(async move {
            let mut issued = Vec::new();
            for _ in 0..16 {
                issued.push(sequencer.next_ticket().await.unwrap());
            }
            issued
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        for ticket in handle.await.unwrap() {
            assert!(seen.insert(ticket), "duplicate ticket {ticket}");
        }
    }

    assert_eq!(seen.len(), 64 * 16);
    let max = seen.iter().map(|t| t.value()).max().unwrap();
    assert_eq!(max, 64 * 16, "sequence must be gap-free when no join fails");
}
