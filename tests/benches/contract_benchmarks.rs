//! # Ticket Contract Benchmarks
//!
//! | Scenario | What is measured |
//! |----------|------------------|
//! | generate | Validation, existence check, write and commit |
//! | sell_and_lock | Transfer plus lock of an existing ticket |
//! | query_all | Full keyspace scan with decoding and encoding |
//! | query_by_owner | Selector query over a populated ledger |
//! | history | History read of a heavily traded ticket |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use tl_ticket_contract::prelude::*;

const OWNERS: [&str; 4] = ["alice", "bob", "carol", "dave"];

fn call(
    contract: &TicketContract,
    ledger: &InMemoryLedger,
    function: &str,
    args: &[&str],
) -> ChaincodeResponse {
    let mut tx = ledger.begin();
    let response = contract.invoke(&mut tx, &Invocation::new(function, args.iter().copied()));
    if response.is_ok() {
        let _ = tx.commit();
    }
    response
}

fn populated(size: usize) -> (TicketContract, InMemoryLedger) {
    let contract = TicketContract::new(ContractConfig::default());
    let ledger = InMemoryLedger::new();
    let mut rng = rand::thread_rng();
    for i in 0..size {
        let id = format!("ticket-{i:06}");
        let price = rng.gen_range(10..500u64).to_string();
        call(&contract, &ledger, "generateTicket", &[&id, &price, "1", "a1"]);
        if rng.gen_bool(0.5) {
            let owner = OWNERS[rng.gen_range(0..OWNERS.len())];
            call(&contract, &ledger, "transferTicket", &[&id, owner]);
        }
    }
    (contract, ledger)
}

fn bench_mutations(c: &mut Criterion) {
    let mut group = c.benchmark_group("ticket-mutations");

    group.bench_function("generate", |b| {
        let contract = TicketContract::new(ContractConfig::default());
        let ledger = InMemoryLedger::new();
        let mut next = 0u64;
        b.iter(|| {
            next += 1;
            let id = next.to_string();
            black_box(call(&contract, &ledger, "generateTicket", &[&id, "100", "1", "a64"]))
        });
    });

    group.bench_function("sell_and_lock", |b| {
        let contract = TicketContract::new(ContractConfig::default());
        let ledger = InMemoryLedger::new();
        let mut next = 0u64;
        b.iter(|| {
            next += 1;
            let id = next.to_string();
            call(&contract, &ledger, "generateTicket", &[&id, "100", "1", "a64"]);
            call(&contract, &ledger, "transferTicket", &[&id, "alice"]);
            black_box(call(&contract, &ledger, "lockTicket", &[&id]))
        });
    });

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("ticket-queries");

    for size in [100usize, 1_000, 5_000] {
        let (contract, ledger) = populated(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("query_all", size), &size, |b, _| {
            b.iter(|| black_box(call(&contract, &ledger, "queryAllTickets", &[])));
        });

        group.bench_with_input(BenchmarkId::new("query_by_owner", size), &size, |b, _| {
            b.iter(|| black_box(call(&contract, &ledger, "queryTicketByOwner", &["alice"])));
        });
    }

    group.finish();
}

fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("ticket-history");

    for versions in [10usize, 100, 1_000] {
        let contract = TicketContract::new(ContractConfig::default());
        let ledger = InMemoryLedger::new();
        call(&contract, &ledger, "generateTicket", &["t1", "100", "1", "a64"]);
        for i in 0..versions {
            call(&contract, &ledger, "transferTicket", &["t1", OWNERS[i % OWNERS.len()]]);
        }

        group.bench_with_input(BenchmarkId::new("history", versions), &versions, |b, _| {
            b.iter(|| black_box(call(&contract, &ledger, "ticketHistory", &["t1"])));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_mutations, bench_queries, bench_history);
criterion_main!(benches);
