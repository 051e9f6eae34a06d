fn kahan_add(sum: &mut f64, correction: &mut f64, value: f64) {
    let corrected = value - *correction;
    let next = *sum + corrected;
    *correction = (next - *sum) - corrected;
    *sum = next;
}

/// Compensated sum; a pure function of the slice, so re-summing a prefix
/// reproduces the earlier total bit for bit.
pub fn stable_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut correction = 0.0;

    for &value in values {
        kahan_add(&mut sum, &mut correction, value);
    }

    sum
}

pub fn distance2(lhs: [f64; 2], rhs: [f64; 2]) -> f64 {
    let dx = lhs[0] - rhs[0];
    let dy = lhs[1] - rhs[1];
    (dx * dx + dy * dy).sqrt()
}

/// Angle between the two sides `adjacent_a` and `adjacent_b`, opposite `opposite`.
///
/// The cosine is clamped into `[-1, 1]` so rounding on degenerate triangles
/// cannot produce NaN.
pub fn law_of_cosines_angle(adjacent_a: f64, adjacent_b: f64, opposite: f64) -> f64 {
    let denominator = 2.0 * adjacent_a * adjacent_b;
    if denominator == 0.0 {
        return 0.0;
    }
    let cosine =
        (adjacent_a * adjacent_a + adjacent_b * adjacent_b - opposite * opposite) / denominator;
    cosine.clamp(-1.0, 1.0).acos()
}

/// Angle at the centre of a circle of `radius` subtended by a chord of `chord`.
pub fn chord_to_arc_angle(chord: f64, radius: f64) -> f64 {
    (1.0 - chord * chord / (2.0 * radius * radius))
        .clamp(-1.0, 1.0)
        .acos()
}

/// Chord length of a circle of `radius` spanning `angle`.
pub fn chord_length(radius: f64, angle: f64) -> f64 {
    radius * (2.0 * (1.0 - angle.cos())).max(0.0).sqrt()
}
