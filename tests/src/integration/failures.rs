//! # Ledger Failures
//!
//! Ledger errors reach the caller verbatim as `BackendFailure`, corrupt
//! records surface as `MalformedRecord`, and every iterator the contract
//! opens is released whether the call succeeds or fails.

#[cfg(test)]
mod tests {
    use crate::Harness;
    use tl_ticket_contract::prelude::*;

    fn seeded() -> Harness {
        let h = Harness::new();
        for (id, owner) in [("t1", "alice"), ("t2", "bob"), ("t3", "alice")] {
            h.call("generateTicket", &[id, "10", "1", "a1"]);
            h.call("transferTicket", &[id, owner]);
        }
        h
    }

    // =============================================================================
    // BACKEND FAILURES
    // =============================================================================

    #[test]
    fn test_backend_message_passed_through() {
        let h = seeded();
        h.ledger.fail_next(LedgerOp::GetState, "peer unreachable: connection reset");

        let response = h.call("queryTicket", &["t1"]);
        assert_eq!(response.status, ChaincodeResponse::ERROR);
        assert_eq!(response.error_kind, Some(ErrorKind::BackendFailure));
        assert_eq!(response.message, "peer unreachable: connection reset");
    }

    #[test]
    fn test_failed_write_leaves_state_unchanged() {
        let h = seeded();
        h.ledger.fail_next(LedgerOp::PutState, "disk full");

        let response = h.call("transferTicket", &["t1", "carol"]);
        assert_eq!(response.error_kind, Some(ErrorKind::BackendFailure));
        assert_eq!(h.ticket("t1").unwrap().owner, "alice");
    }

    #[test]
    fn test_each_query_surfaces_backend_failure() {
        let cases = [
            (LedgerOp::RangeScan, "queryAllTickets", vec![]),
            (LedgerOp::RichQuery, "queryTicketByOwner", vec!["alice"]),
            (LedgerOp::History, "ticketHistory", vec!["t1"]),
            (LedgerOp::DeleteState, "deleteTicket", vec!["t2"]),
        ];
        for (op, function, args) in cases {
            let h = seeded();
            h.ledger.fail_next(op, "ledger offline");
            let response = h.call(function, &args);
            assert_eq!(response.error_kind, Some(ErrorKind::BackendFailure), "{function}");
            assert_eq!(response.message, "ledger offline");
        }
    }

    // =============================================================================
    // ITERATOR RELEASE
    // =============================================================================

    #[test]
    fn test_iterators_released_on_success() {
        let h = seeded();
        h.query_json("queryAllTickets", &[]);
        h.query_json("queryTicketByOwner", &["alice"]);
        h.query_json("ticketHistory", &["t1"]);
        assert_eq!(h.ledger.open_iterators(), 0);
    }

    #[test]
    fn test_iterators_released_on_iteration_error() {
        let h = seeded();
        for (function, args) in [
            ("queryAllTickets", vec![]),
            ("queryTicketByOwner", vec!["alice"]),
            ("ticketHistory", vec!["t1"]),
        ] {
            h.ledger.fail_next(LedgerOp::IteratorNext, "iterator closed by peer");
            let response = h.call(function, &args);
            assert_eq!(response.error_kind, Some(ErrorKind::BackendFailure), "{function}");
            assert_eq!(h.ledger.open_iterators(), 0, "{function}");
        }
    }

    #[test]
    fn test_iterators_released_on_malformed_record() {
        let h = seeded();
        h.ledger.seed("t0", b"\x00\x01 not json".to_vec()).unwrap();

        let response = h.call("queryAllTickets", &[]);
        assert_eq!(response.error_kind, Some(ErrorKind::MalformedRecord));
        assert!(response.message.contains("t0"));
        assert_eq!(h.ledger.open_iterators(), 0);
    }

    // =============================================================================
    // CORRUPT RECORDS
    // =============================================================================

    #[test]
    fn test_corrupt_record_can_be_deleted() {
        let h = Harness::new();
        h.ledger
            .seed("t1", br#"{"docType":"ticket","id":"t1","locked":null}"#.to_vec())
            .unwrap();

        let response = h.call("transferTicket", &["t1", "alice"]);
        assert_eq!(response.error_kind, Some(ErrorKind::MalformedRecord));

        assert!(h.call("deleteTicket", &["t1"]).is_ok());
        assert_eq!(
            h.call("queryTicket", &["t1"]).error_kind,
            Some(ErrorKind::NotFound)
        );
    }

    #[test]
    fn test_metrics_count_each_failure_kind() {
        let h = seeded();
        h.call("queryTicket", &["missing"]);
        h.call("repriceTicket", &["t1", "5"]);
        h.call("unknownOperation", &[]);

        let snapshot = h.contract.metrics();
        assert_eq!(snapshot.failures_of(ErrorKind::NotFound), 1);
        assert_eq!(snapshot.failures_of(ErrorKind::AlreadySold), 1);
        assert_eq!(snapshot.failures_of(ErrorKind::FunctionNotFound), 1);

        let text = tl_telemetry::gather_metrics().unwrap();
        assert!(text.contains(r#"operation="repriceTicket",outcome="AlreadySold""#));
    }
}
