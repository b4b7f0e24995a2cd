use anyhow::{Result, anyhow};
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::Layered, layer::SubscriberExt, reload,
    util::SubscriberInitExt,
};

type Filtered = Layered<reload::Layer<EnvFilter, Registry>, Registry>;

pub struct LogConfig {
    pub filter: String,
    pub ansi: bool,
}

pub struct Logger {
    filter_handle: reload::Handle<EnvFilter, Registry>,
    fmt_handle: reload::Handle<fmt::Layer<Filtered>, Filtered>,
}

impl Logger {
    pub fn new_bootstrap() -> Self {
        let filter = EnvFilter::new("info");
        let (filter, filter_handle) = reload::Layer::new(filter);
        let (fmt_layer, fmt_handle) = reload::Layer::new(fmt::layer());

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();

        Self {
            filter_handle,
            fmt_handle,
        }
    }

    pub fn reload_from_config(&self, config: &LogConfig) -> Result<()> {
        let filter = EnvFilter::try_new(&config.filter).map_err(|e| anyhow!(e))?;
        self.filter_handle.reload(filter).map_err(|e| anyhow!(e))?;
        self.fmt_handle
            .modify(|layer| layer.set_ansi(config.ansi))
            .map_err(|e| anyhow!(e))?;
        Ok(())
    }
}
