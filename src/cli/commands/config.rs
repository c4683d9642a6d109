//! histopack config - Show the resolved configuration

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{self, OutputFormat};
use crate::config::Config;
use crate::error::{HpError, Result};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Dotted key to show (e.g. `packing.heuristic`); omit for everything
    pub key: Option<String>,
}

pub fn run(ctx: &AppContext, args: &ConfigArgs) -> Result<()> {
    let json = matches!(ctx.output_format, OutputFormat::Json | OutputFormat::Jsonl);

    let Some(key) = args.key.as_deref() else {
        if json {
            return output::emit_json(&output::robot_ok(&ctx.config));
        }
        println!("{}", render_config(&ctx.config)?);
        return Ok(());
    };

    let value = config_value_at(&ctx.config, key)?;
    if json {
        return output::emit_json(&output::robot_ok(&value));
    }
    println!("{}", format_value(&value));
    Ok(())
}

fn render_config(config: &Config) -> Result<String> {
    toml::to_string_pretty(config).map_err(|err| HpError::Config(format!("render config: {err}")))
}

fn config_value_at(config: &Config, key: &str) -> Result<toml::Value> {
    let doc = toml::Value::try_from(config)
        .map_err(|err| HpError::Config(format!("serialize config: {err}")))?;
    get_path(&doc, key)
}

fn get_path(doc: &toml::Value, key: &str) -> Result<toml::Value> {
    let mut current = doc;
    for part in key.split('.') {
        current = current
            .get(part)
            .ok_or_else(|| HpError::Config(format!("unknown key: {key}")))?;
    }
    Ok(current.clone())
}

fn format_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}
