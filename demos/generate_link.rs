//! Build a QR reference for a link and save the rendered image
//!
//! Usage: cargo run --example generate_link -- https://example.com

use linkqr::{LinkqrConfig, SystemForm};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let link = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://example.com".to_string());

    let mut form = SystemForm::from_config(&LinkqrConfig::default())?;
    form.set_text(link.as_str());

    let Some(reference) = form.submit() else {
        anyhow::bail!("nothing to encode");
    };
    println!("✓ QR reference: {reference}");

    let info = form.verify().await?;
    println!("✓ Service returned {} {}x{}", info.format, info.width, info.height);

    let path = form.try_download().await?;
    println!("✓ Saved to {}", path.display());
    println!("  Content: {}", reference.payload()?);

    Ok(())
}
