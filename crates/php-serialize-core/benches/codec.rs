//! Benchmarks for the PHP serialize decoder and encoder.

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use php_serialize_core::{encode, from_bytes, to_bytes, Array, Field, Object, Value};
use serde::Serialize;

const FORM_DATA: &[u8] = br#"a:3:{s:6:"fields";a:3:{i:0;a:3:{s:4:"type";s:4:"text";s:5:"label";s:4:"Name";s:8:"required";b:1;}i:1;a:3:{s:4:"type";s:5:"email";s:5:"label";s:5:"Email";s:8:"required";b:1;}i:2;a:3:{s:4:"type";s:8:"textarea";s:5:"label";s:7:"Message";s:8:"required";b:0;}}s:8:"settings";a:2:{s:11:"submit_text";s:6:"Submit";s:15:"success_message";s:10:"Thank you!";}s:11:"permissions";a:3:{i:0;s:4:"read";i:1;s:5:"write";i:2;s:6:"delete";}}"#;

fn decode_scalars(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_scalars");

    for (name, data) in [
        ("null", &b"N;"[..]),
        ("bool", b"b:1;"),
        ("int", b"i:1234567890;"),
        ("float", b"d:3.141592653589793;"),
        ("short_string", b"s:5:\"hello\";"),
    ] {
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_function(name, |b| b.iter(|| from_bytes(black_box(data))));
    }

    // Large string (1MB)
    let huge = format!("s:1000000:\"{}\";", "x".repeat(1_000_000));
    let huge = huge.as_bytes();
    group.throughput(Throughput::Bytes(huge.len() as u64));
    group.bench_function("huge_string_1mb", |b| {
        b.iter(|| from_bytes(black_box(huge)))
    });

    group.finish();
}

fn decode_containers(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_containers");

    // Indexed array (1000 elements)
    let large: String = {
        let items: String = (0..1000)
            .map(|i| format!("i:{};i:{};", i, i * 2))
            .collect();
        format!("a:1000:{{{}}}", items)
    };
    let large = large.as_bytes();
    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_function("indexed_1000", |b| {
        b.iter(|| from_bytes(black_box(large)))
    });

    // Associative array with string keys
    let assoc: String = {
        let items: String = (0..100)
            .map(|i| {
                let key = format!("key_{}", i);
                format!("s:{}:\"{}\";i:{};", key.len(), key, i)
            })
            .collect();
        format!("a:100:{{{}}}", items)
    };
    let assoc = assoc.as_bytes();
    group.throughput(Throughput::Bytes(assoc.len() as u64));
    group.bench_function("assoc_100", |b| {
        b.iter(|| from_bytes(black_box(assoc)))
    });

    // Nested array (depth 50)
    let nested: String = {
        let mut s = String::from("s:4:\"leaf\";");
        for i in 0..50 {
            let key = format!("k{}", i % 10);
            s = format!("a:1:{{s:{}:\"{}\";{}}}", key.len(), key, s);
        }
        s
    };
    let nested = nested.as_bytes();
    group.throughput(Throughput::Bytes(nested.len() as u64));
    group.bench_function("depth_50", |b| {
        b.iter(|| from_bytes(black_box(nested)))
    });

    // Object with every visibility
    let object = b"O:4:\"User\":3:{s:2:\"id\";i:7;s:6:\"*email\";s:5:\"a@b.c\";s:10:\"\x00User\x00hash\";s:3:\"xyz\";}";
    group.throughput(Throughput::Bytes(object.len() as u64));
    group.bench_function("object", |b| {
        b.iter(|| from_bytes(black_box(object)))
    });

    group.throughput(Throughput::Bytes(FORM_DATA.len() as u64));
    group.bench_function("form_data", |b| {
        b.iter(|| from_bytes(black_box(FORM_DATA)))
    });

    group.finish();
}

#[derive(Serialize)]
struct Account {
    #[serde(rename = "Id")]
    id: u64,
    #[serde(rename = "Email")]
    email: String,
    roles: Vec<String>,
    limits: BTreeMap<String, f64>,
}

fn encode_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_value");

    let form = from_bytes(FORM_DATA).unwrap();
    group.throughput(Throughput::Bytes(FORM_DATA.len() as u64));
    group.bench_function("form_data", |b| b.iter(|| encode(black_box(&form))));

    let list = Value::from((0..1000).map(Value::from).collect::<Array>());
    group.bench_function("indexed_1000", |b| b.iter(|| encode(black_box(&list))));

    let object = Value::from(
        Object::new("User")
            .with_field(Field::public("id", 7))
            .with_field(Field::protected("email", "a@b.c"))
            .with_field(Field::private("hash", "xyz")),
    );
    group.bench_function("object", |b| b.iter(|| encode(black_box(&object))));

    group.finish();
}

fn encode_serde(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_serde");

    let account = Account {
        id: 42,
        email: "alice@example.com".into(),
        roles: vec!["admin".into(), "editor".into()],
        limits: [("cpu".to_string(), 1.5), ("memory".to_string(), 512.0)]
            .into_iter()
            .collect(),
    };
    group.bench_function("struct", |b| b.iter(|| to_bytes(black_box(&account))));

    // Unsorted keys exercise the key ordering pass.
    let map: std::collections::HashMap<String, i64> =
        (0..100).map(|i| (format!("key_{}", i), i)).collect();
    group.bench_function("hashmap_100", |b| b.iter(|| to_bytes(black_box(&map))));

    let floats: Vec<f64> = (0..1000).map(|i| f64::from(i) * 1.1).collect();
    group.bench_function("floats_1000", |b| b.iter(|| to_bytes(black_box(&floats))));

    group.finish();
}

#[cfg(feature = "json")]
fn json_conversion(c: &mut Criterion) {
    use php_serialize_core::json::to_json_string;

    let mut group = c.benchmark_group("json");

    let data = br#"a:3:{s:4:"name";s:5:"Alice";s:3:"age";i:30;s:4:"tags";a:2:{i:0;s:5:"admin";i:1;s:6:"active";}}"#;

    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("parse_and_convert", |b| {
        b.iter(|| {
            let value = from_bytes(black_box(data)).unwrap();
            to_json_string(&value).unwrap()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    decode_scalars,
    decode_containers,
    encode_values,
    encode_serde,
);

#[cfg(feature = "json")]
criterion_group!(json_benches, json_conversion);

#[cfg(feature = "json")]
criterion_main!(benches, json_benches);

#[cfg(not(feature = "json"))]
criterion_main!(benches);
