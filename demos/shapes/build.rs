fn main() -> Result<(), Box<dyn std::error::Error>> {
    wirekit_codegen::Config::new().compile(&["src/model.rs"])?;
    Ok(())
}
