//! linkqr command-line entrypoint

use clap::Parser;
use linkqr::output::{RunReport, render_run};
use linkqr::{Dimensions, Error, HexColor, LinkqrConfig, Result, SystemForm, logging};
use std::io::BufRead;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "linkqr",
    version,
    about = "Turn a link into a QR code image"
)]
struct Cli {
    /// Link or text to encode. Read from the first line of stdin when omitted.
    url: Option<String>,

    /// Optional configuration file (toml/yaml). Defaults to linkqr.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Download the rendered image
    #[arg(short, long)]
    download: bool,

    /// Directory to save the downloaded image into
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Copy the link text to the clipboard
    #[arg(short, long)]
    copy: bool,

    /// Fetch the image and confirm the service really returned one
    #[arg(long)]
    verify: bool,

    /// Output results as formatted JSON instead of human-readable text
    #[arg(long)]
    json: bool,

    /// Image size in pixels, e.g. 300x300
    #[arg(long, value_name = "WxH")]
    size: Option<Dimensions>,

    /// Foreground color as six hex digits
    #[arg(long, value_name = "HEX")]
    color: Option<HexColor>,

    /// Background color as six hex digits
    #[arg(long, value_name = "HEX")]
    bgcolor: Option<HexColor>,

    /// Override the rendering service endpoint
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = LinkqrConfig::load(cli.config.as_deref())?;

    if let Some(dir) = cli.output_dir.clone() {
        config.export.output_dir = dir;
    }
    if let Some(size) = cli.size {
        config.service.size = size;
    }
    if let Some(color) = cli.color {
        config.service.color = color;
    }
    if let Some(bgcolor) = cli.bgcolor {
        config.service.bgcolor = bgcolor;
    }
    if let Some(ref endpoint) = cli.endpoint {
        config.service.endpoint = endpoint.clone();
    }

    logging::init(&config.logging)?;
    info!(endpoint = %config.service.endpoint, "Starting linkqr");

    let text = match cli.url.clone() {
        Some(text) => text,
        None => read_stdin_line()?,
    };

    let mut form = SystemForm::from_config(&config)?;
    form.set_text(text);

    let mut report = RunReport::default();
    if form.submit().is_none() {
        report.errors.push(Error::EmptyInput.to_string());
        emit(&report, cli.json)?;
        return Err(Error::EmptyInput);
    }

    if cli.copy {
        form.copy_current_text().await;
        if !form.copied() {
            report
                .errors
                .push("Could not copy link to clipboard (see log)".to_string());
        }
    }

    let verified = if cli.verify {
        match form.verify().await {
            Ok(info) => Some(info),
            Err(err) => {
                report.errors.push(err.to_string());
                None
            }
        }
    } else {
        None
    };

    let saved_to = if cli.download {
        match form.try_download().await {
            Ok(path) => Some(path),
            Err(err) => {
                report.errors.push(err.to_string());
                None
            }
        }
    } else {
        None
    };

    let snapshot = form.snapshot();
    report.snapshot = Some(&snapshot);
    report.verified = verified.as_ref();
    report.saved_to = saved_to.as_deref();
    emit(&report, cli.json)?;

    if snapshot.copied {
        // X11/Wayland clipboards empty out once the owning process exits
        tracing::debug!("Holding clipboard contents until the acknowledgement clears");
        form.copy_cleared().await;
    }

    match report.errors.len() {
        0 => Ok(()),
        _ => Err(Error::Other(report.errors.join("; "))),
    }
}

fn read_stdin_line() -> Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn emit(report: &RunReport<'_>, json: bool) -> Result<()> {
    let rendered = render_run(report);
    if json {
        println!("{}", serde_json::to_string_pretty(&rendered.json)?);
    } else {
        for line in &rendered.human {
            println!("{line}");
        }
    }
    Ok(())
}
