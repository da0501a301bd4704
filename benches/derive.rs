use arrow::compute::kernels::cmp::gt;
use arrow_array::Int64Array;
use criterion::{criterion_group, criterion_main, Criterion};
use ecoframe::crs::{WEB_MERCATOR, WGS84};
use ecoframe::frame::{Column, FrameOptions};
use ecoframe::{EcoDataFrame, GeoFrame};
use geo::polygon;

fn create_data() -> EcoDataFrame {
    // An L shape
    let poly = polygon![
        (x: 0.0, y: 0.0),
        (x: 4.0, y: 0.0),
        (x: 4.0, y: 1.0),
        (x: 1.0, y: 1.0),
        (x: 1.0, y: 4.0),
        (x: 0.0, y: 4.0),
        (x: 0.0, y: 0.0),
    ];
    let ids = (0..1000_i64).collect::<Vec<_>>();
    let groups = ids.iter().map(|id| id % 10).collect::<Vec<_>>();
    EcoDataFrame::from_source(
        vec![
            ("id", Column::from(ids)),
            ("group", Column::from(groups)),
            ("geometry", Column::from(vec![poly; 1000])),
        ],
        FrameOptions::new().with_crs(WGS84),
    )
    .unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let data = create_data();
    let mask = gt(data.column("id").unwrap(), &Int64Array::new_scalar(500)).unwrap();

    c.bench_function("filter EcoDataFrame", |b| {
        b.iter(|| {
            let _ = data.filter(&mask).unwrap();
        })
    });

    c.bench_function("to_crs EcoDataFrame", |b| {
        b.iter(|| {
            let _ = data.to_crs(&WEB_MERCATOR).unwrap();
        })
    });

    c.bench_function("dissolve EcoDataFrame", |b| {
        b.iter(|| {
            let _ = data.dissolve(&["group"]).unwrap();
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
