#[test]
fn mqf_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/context_pass.rs");
    t.pass("tests/ui/kind_pass.rs");
}
