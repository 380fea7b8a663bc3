use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ScrubError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ScrubError::asset("x").to_string().contains("asset error:"));
    assert!(
        ScrubError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(ScrubError::host("x").to_string().contains("host error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ScrubError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
