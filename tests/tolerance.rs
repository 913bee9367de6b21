#[cfg(test)]
mod tests {
    use water_detect::Tolerance;

    #[test]
    fn test_exactly_one_relation_holds() {
        let tol = Tolerance::new(0.1);
        let values = [-3.5_f32, 0.0, 0.05, 0.1, 0.2, 4.9, 5.0, 5.05, 5.1, 5.2, 10.0, 1234.5];
        for &a in values.iter() {
            for &b in values.iter() {
                let n = [tol.equal(a, b), tol.more_than(a, b), tol.less_than(a, b)]
                    .iter()
                    .filter(|&&x| x)
                    .count();
                assert_eq!(n, 1, "a = {a}, b = {b}");
            }
        }
    }

    #[test]
    fn test_boundary_is_equal() {
        let tol = Tolerance::new(0.5);
        assert!(tol.equal(1.0, 1.5));
        assert!(tol.equal(1.5, 1.0));
        assert!(!tol.less_than(1.0, 1.5));
        assert!(!tol.more_than(1.5, 1.0));
    }

    #[test]
    fn test_strict_comparisons() {
        let tol = Tolerance::new(0.5);
        assert!(tol.less_than(1.0, 1.75));
        assert!(tol.more_than(1.75, 1.0));
        assert!(!tol.equal(1.0, 1.75));
        assert!(!tol.more_than(1.0, 1.75));
    }

    #[test]
    fn test_noise_within_tolerance() {
        let tol = Tolerance::new(0.1);
        assert!(tol.equal(5.0, 5.05));
        assert!(tol.equal(5.05, 5.0));
        assert!(tol.more_than(5.0, 4.0));
        assert!(tol.less_than(4.0, 5.0));
    }
}
