fn main() -> anyhow::Result<()> {
    dreamframe::run()?;
    Ok(())
}
