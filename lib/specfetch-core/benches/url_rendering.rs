use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::{Map, Value, json};
use specfetch_core::{EndpointSpecification, HttpMethod, RequestBuilder};
use std::hint::black_box;

fn endpoint(url: &'static str) -> EndpointSpecification {
    EndpointSpecification::new(url, HttpMethod::Get, "Ok", "GenericNotOkResponse")
        .with_params_schema("Params")
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn benchmark_url_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("url_rendering");

    let test_cases = [
        ("/users/:id", json!({ "id": 123 })),
        (
            "/users/:userId/posts/:postId",
            json!({ "userId": 456, "postId": "hello-world" }),
        ),
        (
            "/api/:version/users/:id/posts/:id",
            json!({ "version": "v1", "id": 789 }),
        ),
        (
            "/search",
            json!({ "query": "hello world & special chars @#$%", "page": null, "tags": ["a", "b"] }),
        ),
        (
            "/messages/:contactId",
            json!({ "contactId": "a b", "limit": 20, "before": "2024-01-01T00:00:00Z" }),
        ),
    ];

    for (i, (url, params)) in test_cases.into_iter().enumerate() {
        let params = object(params);
        let builder = RequestBuilder::new(endpoint(url), params.keys().cloned());

        group.bench_function(format!("url_{i}"), |b| {
            b.iter(|| {
                let result = builder.url(black_box(&params));
                black_box(result);
            });
        });
    }

    group.finish();
}

fn benchmark_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");

    let builder = RequestBuilder::new(endpoint("/messages/:contactId"), ["contactId", "notify"]);
    let input = object(json!({
        "contactId": "bob",
        "notify": true,
        "message": "Hello!",
        "attachments": [{ "name": "cat.png", "size": 1024 }],
    }));

    group.bench_function("split", |b| {
        b.iter(|| {
            let result = builder.split(black_box(input.clone()));
            black_box(result);
        });
    });

    group.bench_function("build", |b| {
        b.iter(|| {
            let result = builder.build(black_box(input.clone()));
            black_box(result);
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_url_rendering, benchmark_split);
criterion_main!(benches);
