use criterion::{black_box, criterion_group, criterion_main, Criterion};
use leafbind_runtime::Runtime;
use leafbind_sdk::{attach, HandlerDescriptor, JsValue, MemberTable, ScriptContext};

fn setup() -> Runtime {
    let rt = Runtime::new();
    let table = MemberTable::new("bench")
        .member(HandlerDescriptor::new("add", 2, |frame| {
            let a = frame.int32()?;
            let b = frame.int32_or(0)?;
            frame.set_return(a.wrapping_add(b));
            Ok(())
        }))
        .unwrap()
        .member(HandlerDescriptor::new("len", 1, |frame| {
            let s = frame.string()?;
            frame.set_return(s.len() as i32);
            Ok(())
        }))
        .unwrap();
    attach(&rt, rt.global(), &table).unwrap();
    rt
}

fn bench_int_args(c: &mut Criterion) {
    let rt = setup();
    let add = rt.resolve_path("bench.add").unwrap().as_object().unwrap();
    let args = [JsValue::int32(20), JsValue::int32(22)];

    c.bench_function("dispatch_int32_args", |b| {
        b.iter(|| rt.call(add, JsValue::undefined(), black_box(&args)).unwrap());
    });
}

fn bench_string_arg(c: &mut Criterion) {
    let rt = setup();
    let len = rt.resolve_path("bench.len").unwrap().as_object().unwrap();
    let s = rt.string_value("the quick brown fox");
    rt.root(s);
    let args = [s];

    c.bench_function("dispatch_string_arg", |b| {
        b.iter(|| rt.call(len, JsValue::undefined(), black_box(&args)).unwrap());
    });
}

fn bench_arity_failure(c: &mut Criterion) {
    let rt = setup();
    let add = rt.resolve_path("bench.add").unwrap().as_object().unwrap();
    let no_args: [JsValue; 0] = [];

    c.bench_function("dispatch_arity_failure", |b| {
        b.iter(|| rt.call(add, JsValue::undefined(), black_box(&no_args)).is_err());
    });
}

criterion_group!(benches, bench_int_args, bench_string_arg, bench_arity_failure);
criterion_main!(benches);
