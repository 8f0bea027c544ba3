mod display;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use churnlens_ai::{classify, load_model};
use churnlens_core::CustomerForm;
use churnlens_web::AppState;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "churnlens", version, about = "Customer churn prediction")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web front end.
    Serve {
        #[command(flatten)]
        model: ModelArgs,

        /// Directory served under /static; images go in its visualizations/ folder.
        #[arg(long, env = "CHURNLENS_STATIC_DIR", default_value = "static")]
        static_dir: PathBuf,

        /// Address to listen on.
        #[arg(long, env = "CHURNLENS_ADDR", default_value = "127.0.0.1:5000")]
        addr: SocketAddr,
    },

    /// Score one customer given as form fields.
    Predict {
        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        input: FieldArgs,
    },

    /// Print the feature row a customer encodes to.
    Encode {
        #[command(flatten)]
        input: FieldArgs,

        /// Print one row with a column per feature instead of one line per feature.
        #[arg(long)]
        wide: bool,
    },
}

#[derive(Args)]
struct ModelArgs {
    /// Model artifact (.json logistic model, or .onnx with the `onnx` feature).
    #[arg(long, env = "CHURNLENS_MODEL", default_value = "models/churn_logistic.json")]
    model: PathBuf,
}

#[derive(Args)]
struct FieldArgs {
    /// Form field as key=value, e.g. -f tenure=15 -f "contract_type=One year".
    #[arg(short = 'f', long = "field", value_parser = parse_field)]
    fields: Vec<(String, String)>,
}

impl FieldArgs {
    fn form(&self) -> CustomerForm {
        CustomerForm::from_pairs(self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {s:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in {s:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("churnlens v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Serve {
            model,
            static_dir,
            addr,
        } => {
            // The server never starts without a model.
            let model = load_model(&model.model).context("loading churn model")?;
            if !static_dir.is_dir() {
                tracing::warn!(dir = %static_dir.display(), "static directory not found");
            }
            churnlens_web::serve(addr, AppState::new(model, static_dir)).await?;
        }

        Command::Predict { model, input } => {
            let model = load_model(&model.model).context("loading churn model")?;
            let features = churnlens_core::encode_form(&input.form())?;
            let prediction = classify(model.as_ref(), &features)?;
            println!("{}", display::prediction_line(&prediction, model.name()));
        }

        Command::Encode { input, wide } => {
            let features = churnlens_core::encode_form(&input.form())?;
            let table = if wide {
                display::wide_table(&features)?
            } else {
                display::feature_table(&features)?
            };
            println!("{table}");
        }
    }

    Ok(())
}
