//! # Concurrent Transactions
//!
//! The contract's existence check in `generateTicket` is advisory. These
//! tests show the host ledger's commit-time validation resolving the
//! races the contract leaves open.

#[cfg(test)]
mod tests {
    use crate::Harness;
    use std::sync::Barrier;
    use std::thread;
    use tl_ticket_contract::prelude::*;

    fn invoke(
        h: &Harness,
        tx: &mut TransactionContext,
        function: &str,
        args: &[&str],
    ) -> ChaincodeResponse {
        h.contract
            .invoke(tx, &Invocation::new(function, args.iter().copied()))
    }

    // =============================================================================
    // INTERLEAVED TRANSACTIONS
    // =============================================================================

    #[test]
    fn test_concurrent_generate_loser_conflicts_at_commit() {
        let h = Harness::new();
        let mut first = h.ledger.begin();
        let mut second = h.ledger.begin();

        // Both pass the existence check.
        assert!(invoke(&h, &mut first, "generateTicket", &["t1", "100", "1", "a1"]).is_ok());
        assert!(invoke(&h, &mut second, "generateTicket", &["t1", "999", "2", "b2"]).is_ok());

        assert!(first.commit().is_ok());
        assert!(matches!(
            second.commit(),
            Err(LedgerError::MvccConflict { ref key }) if key == "t1"
        ));

        let ticket = h.ticket("t1").unwrap();
        assert_eq!(ticket.price, 100);
        assert_eq!(ticket.seat, "a1");
    }

    #[test]
    fn test_transfer_racing_lock() {
        let h = Harness::new();
        h.call("generateTicket", &["t1", "100", "1", "a1"]);
        h.call("transferTicket", &["t1", "alice"]);

        let mut lock = h.ledger.begin();
        let mut transfer = h.ledger.begin();
        assert!(invoke(&h, &mut lock, "lockTicket", &["t1"]).is_ok());
        assert!(invoke(&h, &mut transfer, "transferTicket", &["t1", "mallory"]).is_ok());

        lock.commit().unwrap();
        assert!(transfer.commit().is_err());

        let ticket = h.ticket("t1").unwrap();
        assert!(ticket.locked);
        assert_eq!(ticket.owner, "alice");
    }

    #[test]
    fn test_read_your_writes_within_transaction() {
        let h = Harness::new();
        let mut tx = h.ledger.begin();
        assert!(invoke(&h, &mut tx, "generateTicket", &["t1", "100", "1", "a1"]).is_ok());
        assert!(invoke(&h, &mut tx, "transferTicket", &["t1", "alice"]).is_ok());
        assert!(invoke(&h, &mut tx, "lockTicket", &["t1"]).is_ok());

        let response = invoke(&h, &mut tx, "queryAllTickets", &[]);
        let all: serde_json::Value = serde_json::from_slice(&response.payload).unwrap();
        assert_eq!(all[0]["record"]["locked"], true);

        // Not visible to others until commit.
        assert!(h.ticket("t1").is_none());
        tx.commit().unwrap();
        assert!(h.ticket("t1").unwrap().locked);
    }

    #[test]
    fn test_rolled_back_transaction_leaves_no_trace() {
        let h = Harness::new();
        let mut tx = h.ledger.begin();
        invoke(&h, &mut tx, "generateTicket", &["t1", "100", "1", "a1"]);
        tx.rollback();

        assert!(h.ticket("t1").is_none());
        assert_eq!(h.query_json("ticketHistory", &["t1"]), serde_json::json!([]));
    }

    // =============================================================================
    // THREADS
    // =============================================================================

    #[test]
    fn test_parallel_generate_single_winner() {
        const WRITERS: usize = 8;
        let h = Harness::new();
        let barrier = Barrier::new(WRITERS);

        let committed: usize = thread::scope(|scope| {
            let handles: Vec<_> = (0..WRITERS)
                .map(|i| {
                    let h = &h;
                    let barrier = &barrier;
                    scope.spawn(move || {
                        let price = (100 + i).to_string();
                        let mut tx = h.ledger.begin();
                        let response =
                            invoke(h, &mut tx, "generateTicket", &["t1", &price, "1", "a1"]);
                        barrier.wait();
                        usize::from(response.is_ok() && tx.commit().is_ok())
                    })
                })
                .collect();
            handles.into_iter().map(|handle| handle.join().unwrap()).sum()
        });

        assert_eq!(committed, 1);
        assert_eq!(h.ledger.height(), 1);
        assert_eq!(h.contract.metrics().successes, WRITERS as u64);
    }

    #[test]
    fn test_parallel_distinct_ids_all_commit() {
        const WRITERS: usize = 8;
        let h = Harness::new();

        thread::scope(|scope| {
            for i in 0..WRITERS {
                let h = &h;
                scope.spawn(move || {
                    let id = format!("t{i}");
                    let response = h.call("generateTicket", &[&id, "10", "1", "a1"]);
                    assert!(response.is_ok(), "{}", response.message);
                });
            }
        });

        let all = h.query_json("queryAllTickets", &[]);
        assert_eq!(all.as_array().unwrap().len(), WRITERS);
    }
}
