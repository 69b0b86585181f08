use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use waterspy::{create_parameter_timeseries_from_rows, MeasurementRow, SampleKind};

fn measurement_rows() -> Vec<MeasurementRow> {
    let start = Utc.with_ymd_and_hms(2020, 1, 1, 9, 0, 0).unwrap();
    let parameters = ["pH", "EC", "Temperature", "O2"];
    (0..50)
        .flat_map(|station| {
            (0..100).flat_map(move |visit| {
                parameters.iter().enumerate().map(move |(i, parameter)| MeasurementRow {
                    station: format!("PZ{station:02}"),
                    timestamp: start + Duration::days(visit * 7) + Duration::minutes(i as i64 * 5),
                    institution: Some("Deltares".to_string()),
                    method: None,
                    parameter: parameter.to_string(),
                    value: (station + visit) as f64 * 0.1,
                    unit: "-".to_string(),
                    comment: None,
                })
            })
        })
        .collect()
}

fn bench_reshape(c: &mut Criterion) {
    let rows = measurement_rows();
    c.bench_function("create_parameter_timeseries", |b| {
        b.iter(|| create_parameter_timeseries_from_rows(black_box(&rows), SampleKind::Parameters))
    });

    let samples = create_parameter_timeseries_from_rows(&rows, SampleKind::Parameters);
    c.bench_function("wide_ts", |b| b.iter(|| black_box(&samples).wide_ts()));
    c.bench_function("statistics", |b| b.iter(|| black_box(&samples).statistics()));
}

criterion_group!(benches, bench_reshape);
criterion_main!(benches);
