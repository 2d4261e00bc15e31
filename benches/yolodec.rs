use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use yolodec::{suppress, DetectConfig, Detector, ModelLayout, OwnedTensor};

fn make_output(layout: &ModelLayout) -> OwnedTensor {
    let shape = layout.grid().tensor_shape();
    let len: usize = shape.iter().product();
    let data = (0..len)
        .map(|i| (((i * 37) % 101) as f32 / 101.0 - 0.5) * 8.0)
        .collect();
    OwnedTensor::new(data, shape).unwrap()
}

fn bench_detect(c: &mut Criterion) {
    let layout = ModelLayout::tiny_yolo_v2_voc().unwrap();
    let tensor = make_output(&layout);
    let cfg = DetectConfig {
        confidence_threshold: 0.3,
        class_score_threshold: 0.05,
        nms_threshold: 0.3,
        max_results: 20,
        parallel: false,
    };

    let detector = Detector::new(layout.clone()).with_config(cfg.clone());
    c.bench_function("decode_13x13x125", |b| {
        b.iter(|| black_box(detector.decode(tensor.view()).unwrap()));
    });
    c.bench_function("detect_13x13x125", |b| {
        b.iter(|| black_box(detector.detect(tensor.view()).unwrap()));
    });

    let candidates = detector.decode(tensor.view()).unwrap();
    c.bench_function("suppress_decoded", |b| {
        b.iter(|| black_box(suppress(candidates.clone(), 0.3, 20)));
    });

    #[cfg(feature = "rayon")]
    {
        let par = Detector::new(layout).with_config(DetectConfig {
            parallel: true,
            ..cfg
        });
        c.bench_function("detect_13x13x125_par", |b| {
            b.iter(|| black_box(par.detect(tensor.view()).unwrap()));
        });
    }
}

criterion_group!(benches, bench_detect);
criterion_main!(benches);
