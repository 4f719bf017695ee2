pub fn run() -> anyhow::Result<()> {
    println!("rapport {}", env!("CARGO_PKG_VERSION"));
    println!("Conversation context cache and capability router");
    Ok(())
}
