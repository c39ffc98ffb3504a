use cfft_q16::Q16Plan;
use sanity_check::{compare, generate, reference_spectrum, SignalKind};

#[test]
fn reference_of_impulse_is_flat() {
    let input = generate(SignalKind::Impulse, 64, 6400, 0, 0);
    let spectrum = reference_spectrum(&input, false);
    assert!(spectrum
        .iter()
        .all(|c| (c.re - 100.0).abs() < 1e-9 && c.im.abs() < 1e-9));
}

#[test]
fn fixed_point_tone_has_high_snr() {
    let n = 512;
    let plan = Q16Plan::new(n).unwrap();
    let input = generate(SignalKind::Tone, n, 16000, 21, 0);
    let reference = reference_spectrum(&input, false);
    let mut output = input.clone();
    plan.fft(&mut output).unwrap();
    let report = compare(&output, &reference);
    assert_eq!(report.peak_bin, 21);
    assert!(report.snr_db > 30.0, "{:?}", report);
}

#[test]
fn noise_is_seeded_and_bounded() {
    let a = generate(SignalKind::Noise, 32, 1000, 0, 42);
    let b = generate(SignalKind::Noise, 32, 1000, 0, 42);
    assert_eq!(a, b);
    assert!(a.iter().all(|&v| (-1000..1000).contains(&v)));
}

#[test]
fn exact_dc_output_matches_reference() {
    let input = generate(SignalKind::Dc, 16, 8192, 0, 0);
    let reference = reference_spectrum(&input, false);
    let plan = Q16Plan::new(16).unwrap();
    let mut output = input;
    plan.fft(&mut output).unwrap();
    let report = compare(&output, &reference);
    assert_eq!(report.peak_bin, 0);
    assert!(report.max_error < 1e-6, "{:?}", report);
    assert!(report.snr_db > 100.0);
}
