use anyhow::{Context, Result};
use cardlist_core::{snapshot, Config, State};
use cardlist_dom::DomNode;
use cardlist_render_html::{render_page, PageOptions};
use clap::Parser;
use std::{fs, path::PathBuf};
use tracing_subscriber::EnvFilter;

const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";

#[derive(Parser, Debug)]
#[command(name = "cardlist-page", about = "Write the host page for the cardlist message list")]
struct Args {
    /// Output file (stdout when omitted)
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long, default_value = "Messages")]
    title: String,

    /// Stylesheet URL; repeatable
    #[arg(long = "style", default_values_t = [BOOTSTRAP_CSS.to_string()])]
    styles: Vec<String>,

    /// wasm-bindgen `--target web` loader to import; repeatable
    #[arg(long = "script", default_values_t = ["./pkg/cardlist_web.js".to_string()])]
    scripts: Vec<String>,

    /// JSON config to validate and embed in the page
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON array of strings pre-rendered into the output container
    #[arg(long)]
    seed: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let (config, config_json) = match &args.config {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("read failed: {}", path.display()))?;
            let config = Config::from_json(&data)
                .with_context(|| format!("invalid config: {}", path.display()))?;
            let json = serde_json::to_string(&config)?;
            (config, Some(json))
        }
        None => (Config::default(), None),
    };

    let seed: State = match &args.seed {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("read failed: {}", path.display()))?;
            serde_json::from_str(&data)
                .with_context(|| format!("seed must be a JSON array of strings: {}", path.display()))?
        }
        None => State::new(),
    };

    let mut opts = PageOptions::new(page_body(&config, &seed));
    opts.title = Some(args.title.clone());
    opts.styles = args.styles.clone();
    opts.wasm_modules = args.scripts.clone();
    opts.config_json = config_json;
    let html = render_page(&opts);

    match &args.out {
        Some(path) => {
            fs::write(path, &html).with_context(|| format!("write failed: {}", path.display()))?;
            tracing::info!(path = %path.display(), seeded = seed.len(), "page written");
        }
        None => print!("{}", html),
    }
    Ok(())
}

/// The elements the app mounts onto, with `seed` pre-rendered as first paint.
fn page_body(config: &Config, seed: &State) -> DomNode {
    let input = DomNode::element("input")
        .with_attr("id", &config.input_id)
        .with_attr("type", "text")
        .with_attr("class", "form-control")
        .with_attr("placeholder", "Type a message")
        .with_attr("autocomplete", "off");
    let button = DomNode::element("button")
        .with_attr("id", &config.button_id)
        .with_attr("type", "button")
        .with_attr("class", "btn btn-primary")
        .with_child(DomNode::text_node("Send"));
    let controls = DomNode::element("div")
        .with_attr("class", "input-group mb-3")
        .with_child(input)
        .with_child(button);

    let mut output = DomNode::element("div").with_attr("id", &config.output_id);
    if !seed.is_empty() {
        output = output.with_child(snapshot(&config.card, seed));
    }

    DomNode::element("body")
        .with_attr("class", "container py-4")
        .with_child(controls)
        .with_child(output)
}
