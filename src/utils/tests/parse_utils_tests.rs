use crate::sampler::SamplingError;
use crate::utils::parse_utils::{parse_dimensions, parse_factor};

#[test]
fn test_parse_dimensions() {
    assert_eq!(parse_dimensions("256x128", "size").unwrap(), (256, 128));
    assert_eq!(parse_dimensions(" 4X3 ", "grid").unwrap(), (4, 3));
}

#[test]
fn test_parse_dimensions_rejects_bad_input() {
    for bad in ["256", "0x10", "10x", "ax4", "1x2x3", "-1x4"] {
        assert!(matches!(parse_dimensions(bad, "size"), Err(SamplingError::InvalidRequest(_))), "{}", bad);
    }
}

#[test]
fn test_parse_factor() {
    assert_eq!(parse_factor("1.5", "brighten").unwrap(), 1.5);
    assert!(parse_factor("0", "brighten").is_err());
    assert!(parse_factor("-2", "brighten").is_err());
    assert!(parse_factor("inf", "brighten").is_err());
    assert!(parse_factor("bright", "brighten").is_err());
}
