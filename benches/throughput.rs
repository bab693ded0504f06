use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use serde_json::json;
use std::hint::black_box;
use std::sync::Arc;
use switchyard::container::{Container, Injectable};
use switchyard::dispatcher::Dispatcher;
use switchyard::error::ContainerError;
use switchyard::handler::{Handler, HandlerResult};
use switchyard::message::{RequestView, Response};
use switchyard::middleware::{MetricsMiddleware, TracingMiddleware};
use switchyard::router::Router;

fn ok() -> Handler {
    Handler::func(|req| Ok(Response::ok(json!({ "params": req.params().len() }))))
}

fn zoo_router() -> Router {
    let mut router = Router::new();
    router.get("/", ok()).unwrap();
    router.get("/zoo/animals", ok()).unwrap();
    router.post("/zoo/animals", ok()).unwrap();
    router.get("/zoo/animals/{id}", ok()).unwrap();
    router.put("/zoo/animals/{id}", ok()).unwrap();
    router.patch("/zoo/animals/{id}", ok()).unwrap();
    router.delete("/zoo/animals/{id}", ok()).unwrap();
    router.get("/zoo/animals/{id}/toys/{toy_id}", ok()).unwrap();
    router
        .get(
            "/zoo/{category}/animals/{id}/habitats/{habitat_id}/sections/{section_id}",
            ok(),
        )
        .unwrap();
    router
        .post(
            "/inventory/{warehouse_id}/feeds/{feed_id}/items/{item_id}/batches/{batch_id}",
            ok(),
        )
        .unwrap();
    router
        .get("/complex/{a}/{b}/{c}/{d}/{e}/{f}/{g}/{h}/{i}", ok())
        .unwrap();
    router
}

fn test_paths() -> [(Method, &'static str); 5] {
    [
        (Method::GET, "/zoo/animals/123"),
        (Method::GET, "/zoo/animals/123/toys/456"),
        (Method::GET, "/zoo/cats/animals/123/habitats/88/sections/5"),
        (Method::POST, "/inventory/1/feeds/2/items/3/batches/4"),
        (Method::GET, "/complex/1/2/3/4/5/6/7/8/9"),
    ]
}

fn bench_route_throughput(c: &mut Criterion) {
    let router = zoo_router();
    let paths = test_paths();
    c.bench_function("route_match", |b| {
        b.iter(|| {
            for (method, path) in &paths {
                let res = router.route(method, path);
                black_box(&res);
            }
        })
    });
}

struct Zookeeper;

impl Injectable for Zookeeper {
    fn inject(_: &Container) -> Result<Self, ContainerError> {
        Ok(Zookeeper)
    }
}

impl Zookeeper {
    fn show(&self, req: &RequestView) -> HandlerResult {
        Ok(Response::ok(json!({ "id": req.param("id") })))
    }
}

fn bench_dispatch_throughput(c: &mut Criterion) {
    let mut router = zoo_router();
    router
        .get(
            "/keepers/{id}",
            Handler::action::<Zookeeper>("show", Zookeeper::show),
        )
        .unwrap();

    let mut dispatcher = Dispatcher::new(Arc::new(Container::new()), router);
    dispatcher
        .add_middleware(Arc::new(TracingMiddleware))
        .add_middleware(Arc::new(MetricsMiddleware::new()));
    let paths = test_paths();

    c.bench_function("dispatch_closure", |b| {
        b.iter(|| {
            for (method, path) in &paths {
                let resp = dispatcher.handle(RequestView::new(method.clone(), *path));
                black_box(&resp);
            }
        })
    });

    c.bench_function("dispatch_controller_action", |b| {
        b.iter(|| {
            let resp = dispatcher.handle(RequestView::new(Method::GET, "/keepers/7"));
            black_box(&resp);
        })
    });
}

criterion_group!(benches, bench_route_throughput, bench_dispatch_throughput);
criterion_main!(benches);
