// Quote a booking from a JSON document of form values
//
//   booking_quote <form.json> [--config <config.json>] [--submit]
//
// Reads `{"checkIn": "2025-06-10", "rooms": 2, ...}`, applies each value as a
// committed field change and prints the summary and field marks as JSON.
// With --submit the form is submitted and the outcome printed instead.

use anyhow::{bail, Context, Result};
use lodge_booking::{FormConfig, FormController};
use serde_json::{json, Map, Value};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

struct Args {
    form_path: String,
    config_path: Option<String>,
    submit: bool,
}

fn main() -> Result<()> {
    init_logger()?;

    let args = parse_args(std::env::args().skip(1))?;
    let config = match &args.config_path {
        Some(path) => FormConfig::from_path(path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => FormConfig::booking(),
    };

    let raw = std::fs::read_to_string(&args.form_path)
        .with_context(|| format!("failed to read {}", args.form_path))?;
    let values: Map<String, Value> =
        serde_json::from_str(&raw).context("form document must be a JSON object")?;

    let mut form = FormController::new(config)?;
    // Apply in form order so check-in is known before check-out is judged
    let names: Vec<String> = form
        .config()
        .fields
        .iter()
        .map(|binding| binding.name.clone())
        .collect();
    if let Some(unknown) = values.keys().find(|key| !names.contains(*key)) {
        bail!("form document has unknown field {}", unknown);
    }
    for name in names.iter().filter(|name| values.contains_key(*name)) {
        form.on_field_change(name, &field_text(&values[name]))?;
    }

    let output = if args.submit {
        let outcome = form.on_submit();
        info!(accepted = outcome.is_accepted(), "form submitted");
        serde_json::to_value(&outcome)?
    } else {
        let marks: Map<String, Value> = names
            .iter()
            .filter_map(|name| {
                let mark = form.mark(name)?;
                Some(serde_json::to_value(mark).map(|value| (name.clone(), value)))
            })
            .collect::<Result<_, _>>()?;
        json!({
            "summary": form.summary_display(),
            "marks": marks,
            "checkOutMin": form.checkout_min(),
        })
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut form_path = None;
    let mut config_path = None;
    let mut submit = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config_path = Some(args.next().context("--config needs a path")?);
            }
            "--submit" => submit = true,
            _ if form_path.is_none() => form_path = Some(arg),
            _ => bail!("unexpected argument {}", arg),
        }
    }

    Ok(Args {
        form_path: form_path
            .context("usage: booking_quote <form.json> [--config <config.json>] [--submit]")?,
        config_path,
        submit,
    })
}

// Select values may arrive as JSON numbers
fn field_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn init_logger() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let subscriber = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(subscriber)
        .with(env_filter)
        .try_init()?;

    Ok(())
}
