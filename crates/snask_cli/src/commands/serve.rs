use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use snask_runtime::{Runtime, ServerConfig};

use super::common::parse_input;

pub(crate) struct ServeOptions<'a> {
    pub routes: &'a Path,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_requests: Option<usize>,
}

/// Flags override `SNASK_HOST` / `SNASK_PORT` / `SNASK_MAX_REQUESTS`.
pub(crate) fn config_for(opts: &ServeOptions<'_>, base: ServerConfig) -> ServerConfig {
    let mut config = base;
    if let Some(host) = &opts.host {
        config.host = host.clone();
    }
    if let Some(port) = opts.port {
        config.port = port;
    }
    if let Some(n) = opts.max_requests {
        config = config.with_max_requests(Some(n));
    }
    config
}

pub(crate) fn run(opts: ServeOptions<'_>) -> Result<ExitCode> {
    let routes = parse_input(opts.routes)?;
    if routes.type_name() != "object" {
        bail!(
            "{}: route table must be an object, got {}",
            opts.routes.display(),
            routes.type_name()
        );
    }
    snask_core::track::install();
    let config = config_for(&opts, ServerConfig::from_env());
    let rt = Runtime::with_config(config);
    let handled = rt
        .serve(routes)
        .with_context(|| format!("serving {}", opts.routes.display()))?;
    log::info!("served {handled} connections");
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_the_environment() {
        let opts = ServeOptions {
            routes: Path::new("r.json"),
            host: None,
            port: Some(9000),
            max_requests: Some(0),
        };
        let base = ServerConfig {
            host: "0.0.0.0".into(),
            max_requests: Some(5),
            ..ServerConfig::default()
        };
        let config = config_for(&opts, base);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_requests, None);
    }
}
