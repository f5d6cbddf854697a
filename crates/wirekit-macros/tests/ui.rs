//! Compile tests for the marker attributes

#[test]
fn markers___valid_declarations___compile() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/pass/*.rs");
}
