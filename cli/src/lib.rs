//! drlatest CLI - latest image tags for YAML values files.

pub mod args;
pub mod output;
pub mod values;

use drlatest_core::error::Result;
use drlatest_runtime::{OciTagLister, Resolver};

pub use args::Cli;

/// Run a parsed command line: load values, resolve tags, print YAML.
pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve_config();
    config.validate()?;

    let values = values::load_files(&cli.files)?;
    let declarations = values::image_declarations(&values, &config);
    if declarations.is_empty() {
        tracing::info!(prefix = %config.key_prefix, "No image declarations found");
        return Ok(());
    }

    let lister = OciTagLister::with_insecure(config.insecure);
    let resolver = Resolver::new(config, lister);
    let resolution = resolver.resolve_all(&declarations).await?;

    output::write_tags(std::io::stdout().lock(), &resolution.tags)
}
