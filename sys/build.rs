use anyhow::Context;
use binder_ndk_build_support::{log, BuildConfig};

fn main() -> anyhow::Result<()> {
    let config = BuildConfig::from_env().context("invalid build environment")?;
    log::init(config.log_level);
    binder_ndk_build_support::run(&config)
        .with_context(|| format!("failed to generate Binder bindings for {}", config.target))
}
