use std::f64::consts::E;

/// Logistic function `1 / (1 + e^-x)`.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x))
}

/// Applies [`sigmoid`] to every element in place.
pub fn sigmoid_in_place(v: &mut [f64]) {
    for x in v.iter_mut() {
        *x = sigmoid(*x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sigmoid_midpoint_and_symmetry() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert_relative_eq!(sigmoid(2.0) + sigmoid(-2.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn sigmoid_saturates() {
        assert!(sigmoid(40.0) > 0.999_999);
        assert!(sigmoid(-40.0) < 1e-6);
    }

    #[test]
    fn in_place_maps_every_element() {
        let mut v = vec![0.0, 0.0];
        sigmoid_in_place(&mut v);
        assert_eq!(v, vec![0.5, 0.5]);
    }
}
