use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use yolodec::activation::{argmax, sigmoid, softmax};

#[test]
fn sigmoid_stays_strictly_inside_unit_interval() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..10_000 {
        let x: f32 = rng.random_range(-15.0..15.0);
        let s = sigmoid(x);
        assert!(s > 0.0 && s < 1.0, "sigmoid({x}) = {s}");
    }
    assert_eq!(sigmoid(0.0), 0.5);
}

#[test]
fn sigmoid_is_monotonic_and_symmetric() {
    let mut prev = 0.0f32;
    for i in -100..=100 {
        let x = i as f32 * 0.1;
        let s = sigmoid(x);
        assert!(s >= prev);
        assert!((s + sigmoid(-x) - 1.0).abs() < 1e-6);
        prev = s;
    }
}

#[test]
fn softmax_normalizes_random_vectors() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..2_000 {
        let len = rng.random_range(1..=30);
        let values: Vec<f32> = (0..len).map(|_| rng.random_range(-50.0..50.0)).collect();
        let probs = softmax(&values);
        assert_eq!(probs.len(), values.len());
        let sum: f64 = probs.iter().map(|&p| f64::from(p)).sum();
        assert!((sum - 1.0).abs() < 1e-6, "sum = {sum}");
        assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }
}

#[test]
fn softmax_preserves_argmax() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..500 {
        let values: Vec<f32> = (0..20).map(|_| rng.random_range(-8.0..8.0)).collect();
        let probs = softmax(&values);
        assert_eq!(
            argmax(&values).map(|(i, _)| i),
            argmax(&probs).map(|(i, _)| i)
        );
    }
}

#[test]
fn softmax_is_shift_invariant() {
    let a = softmax(&[1.0, 2.0, 3.0]);
    let b = softmax(&[101.0, 102.0, 103.0]);
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() < 1e-6);
    }
}
