#[test]
fn macros_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/decl_error_pass.rs");
    t.pass("tests/ui/holder_pass.rs");
}
