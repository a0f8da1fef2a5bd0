//! Generate static files

use anyhow::Result;

use crate::client::ContentSource;
use crate::generator::Generator;
use crate::Spacetraveling;

/// Fetch every pre-built page from the content API and write the static site
pub async fn run(site: &Spacetraveling, source: &dyn ContentSource) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(site)?;
    let count = generator.generate(source).await?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} pages into {:?} in {:.2}s",
        count,
        site.public_dir,
        duration.as_secs_f64()
    );

    Ok(())
}
