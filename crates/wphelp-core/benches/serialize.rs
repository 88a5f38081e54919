use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use std::hint::black_box;
use wphelp_core::{keyed_to_xml, parse, WriterConfig};

/// An export-sized order feed: 200 orders with attributes and line items.
fn order_feed() -> Value {
    let orders: Vec<Value> = (0..200)
        .map(|i| {
            json!({
                "@attributes": {"id": i.to_string(), "status": "completed"},
                "customer": {"name": format!("Customer {i}"), "country": "NL"},
                "note": "<p>Leave at the door</p>",
                "line": [
                    {"sku": "HD-01", "qty": 2, "total": 59.9},
                    {"sku": "CP-07", "qty": 1, "total": 12.5}
                ]
            })
        })
        .collect();
    json!({"orders": {"order": orders}})
}

fn bench_serialize(c: &mut Criterion) {
    let json = order_feed().to_string();
    let config = WriterConfig::default();
    let xml = keyed_to_xml(&json, &config).expect("feed serializes");

    c.bench_function("keyed_to_xml/200_orders", |b| {
        b.iter(|| keyed_to_xml(black_box(&json), &config).expect("feed serializes"))
    });
    c.bench_function("parse/200_orders", |b| {
        b.iter(|| parse(black_box(&xml)).expect("feed parses"))
    });
}

criterion_group!(benches, bench_serialize);
criterion_main!(benches);
