use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pdf_inspect::{PdfAnalysis, PdfSource};
use template_geometry::{
    BindingMethod, PackageScope, TemplateRequest, derive_cover_geometry,
    derive_interior_geometry,
};
use template_service::{
    ServiceConfig, TemplateAssets, TemplateCommand, TemplateUpdate, generate_package, worker_task,
};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "booktpl", about = "Book cover and interior template generator", version)]
struct Cli {
    /// Service configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a template package (ZIP)
    Generate {
        #[command(flatten)]
        request: RequestArgs,

        /// Directory the archive is written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Raster resolution for the layered cover
        #[arg(long)]
        dpi: Option<u32>,

        /// Store archive entries without compression
        #[arg(long)]
        no_compress: bool,

        /// Also write the effective request as JSON
        #[arg(long)]
        save_request: Option<PathBuf>,
    },

    /// Print the derived cover and interior geometry as JSON
    Geometry {
        #[command(flatten)]
        request: RequestArgs,
    },

    /// Report page count, page sizes and boxes of a PDF
    Inspect {
        /// Local path, http(s) URL, or data:application/pdf;base64 URL
        source: String,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,

        /// Fetch timeout in seconds for URLs
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Generate packages for several request files, one after another
    Batch {
        /// Request files (JSON)
        #[arg(required = true, num_args = 1..)]
        requests: Vec<PathBuf>,

        /// Directory the archives are written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
}

/// Book description, from a request file and/or flags (flags win)
#[derive(Args)]
struct RequestArgs {
    /// Request file (JSON, camelCase fields)
    #[arg(short, long)]
    request: Option<PathBuf>,

    /// Binding method
    #[arg(long, value_enum)]
    binding: Option<BindingArg>,

    /// Binding name as free text, for bindings without a preset
    #[arg(long, conflicts_with = "binding")]
    binding_name: Option<String>,

    /// Which files to produce
    #[arg(long, value_enum)]
    scope: Option<ScopeArg>,

    #[arg(long)]
    title: Option<String>,

    /// Trim width in inches
    #[arg(long)]
    trim_width: Option<f64>,

    /// Trim height in inches
    #[arg(long)]
    trim_height: Option<f64>,

    #[arg(long)]
    page_count: Option<u32>,

    #[arg(long)]
    paper_stock: Option<String>,

    /// Spine width in inches
    #[arg(long)]
    spine_width: Option<f64>,

    /// Bleed in inches
    #[arg(long)]
    bleed: Option<f64>,

    /// Case-bind or coil hardcover wrap in inches
    #[arg(long)]
    wrap: Option<f64>,

    /// Safety margin on every edge, in inches
    #[arg(long)]
    safety_margin: Option<f64>,

    /// Coil / Wire-O hardcover instead of softcover
    #[arg(long)]
    hardcover: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum BindingArg {
    PerfectBind,
    SaddleStitch,
    CaseBind,
    CoilSoftcover,
    CoilHardcover,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScopeArg {
    Cover,
    Interior,
    All,
}

impl From<BindingArg> for BindingMethod {
    fn from(arg: BindingArg) -> Self {
        match arg {
            BindingArg::PerfectBind => Self::PerfectBind,
            BindingArg::SaddleStitch => Self::SaddleStitch,
            BindingArg::CaseBind => Self::CaseBind,
            BindingArg::CoilSoftcover => Self::CoilWireOSoftcover,
            BindingArg::CoilHardcover => Self::CoilWireOHardcover,
        }
    }
}

impl From<ScopeArg> for PackageScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Cover => Self::Cover,
            ScopeArg::Interior => Self::Interior,
            ScopeArg::All => Self::All,
        }
    }
}

impl RequestArgs {
    async fn into_request(self) -> Result<TemplateRequest> {
        let mut request = match &self.request {
            Some(path) => TemplateRequest::load(path)
                .await
                .with_context(|| format!("Failed to load request {}", path.display()))?,
            None => TemplateRequest::default(),
        };

        if let Some(binding) = self.binding {
            let method = BindingMethod::from(binding);
            request.binding_name = method.display_name().to_string();
            if method == BindingMethod::CoilWireOHardcover {
                request.is_hardcover_coil_wire = Some(true);
            }
        }
        if let Some(name) = self.binding_name {
            request.binding_name = name;
        }
        if self.hardcover {
            request.is_hardcover_coil_wire = Some(true);
        }
        if let Some(scope) = self.scope {
            request.package_type = scope.into();
        }
        if self.title.is_some() {
            request.book_title = self.title;
        }
        if let Some(value) = self.trim_width {
            request.trim_width = value;
        }
        if let Some(value) = self.trim_height {
            request.trim_height = value;
        }
        if let Some(value) = self.page_count {
            request.page_count = value;
        }
        if let Some(value) = self.paper_stock {
            request.paper_stock = value;
        }
        if self.spine_width.is_some() {
            request.spine_width = self.spine_width;
        }
        if self.bleed.is_some() {
            request.bleed = self.bleed;
        }
        if self.wrap.is_some() {
            request.wrap_amount = self.wrap;
        }
        if self.safety_margin.is_some() {
            request.safety_margin = self.safety_margin;
        }

        Ok(request)
    }
}

async fn load_config(path: Option<&PathBuf>) -> Result<ServiceConfig> {
    match path {
        Some(path) => ServiceConfig::load(path)
            .await
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(ServiceConfig::default()),
    }
}

fn print_analysis(analysis: &PdfAnalysis) {
    println!("PDF Analysis:");
    if let Some(title) = &analysis.title {
        println!("  Title: {}", title);
    }
    println!("  Pages: {}", analysis.page_count);
    println!(
        "  First page: {:.3}\" x {:.3}\"",
        analysis.first_page_width_inches, analysis.first_page_height_inches
    );
    println!(
        "  Consistent size: {}",
        if analysis.consistent_size { "yes" } else { "no" }
    );
    if let Some(boxes) = &analysis.first_page_boxes {
        println!(
            "  Bleed box: {:.3}\" x {:.3}\"",
            boxes.bleed_box.width_inches, boxes.bleed_box.height_inches
        );
        println!(
            "  Trim box: {:.3}\" x {:.3}\"",
            boxes.trim_box.width_inches, boxes.trim_box.height_inches
        );
    }
    if !analysis.consistent_size {
        for (index, page) in analysis.page_dimensions.iter().enumerate() {
            println!(
                "    Page {}: {:.3}\" x {:.3}\"",
                index + 1,
                page.width_inches,
                page.height_inches
            );
        }
    }
}

async fn run_batch(config: ServiceConfig, requests: Vec<PathBuf>, out_dir: PathBuf) -> Result<()> {
    let assets = Arc::new(TemplateAssets::load(&config).await?);
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let worker = tokio::spawn(worker_task(config, assets, command_rx, update_tx));

    for path in &requests {
        let request = TemplateRequest::load(path)
            .await
            .with_context(|| format!("Failed to load request {}", path.display()))?;
        command_tx.send(TemplateCommand::Generate {
            request,
            output_dir: out_dir.clone(),
        })?;
    }
    drop(command_tx);

    let mut failures = 0;
    while let Some(update) = update_rx.recv().await {
        match update {
            TemplateUpdate::Progress {
                operation,
                current,
                total,
            } => {
                tracing::debug!("{} ({}/{})", operation, current, total);
            }
            TemplateUpdate::PackageWritten { path, entries, size } => {
                println!(
                    "Generated {} files ({} bytes) → {}",
                    entries.len(),
                    size,
                    path.display()
                );
            }
            TemplateUpdate::Error { message } => {
                failures += 1;
                eprintln!("Error: {}", message);
            }
            other => tracing::debug!("Ignoring update {:?}", other),
        }
    }
    worker.await?;

    if failures > 0 {
        bail!("{} of {} request(s) failed", failures, requests.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref()).await?;

    match cli.command {
        Commands::Generate {
            request,
            out_dir,
            dpi,
            no_compress,
            save_request,
        } => {
            if let Some(dpi) = dpi {
                config.raster_dpi = dpi;
            }
            if no_compress {
                config.compress_archive = false;
            }
            config.validate()?;

            let request = request.into_request().await?;
            if let Some(path) = save_request {
                request.save(&path).await?;
                println!("Saved request → {}", path.display());
            }

            let assets = TemplateAssets::load(&config).await?;
            let package = generate_package(&request, &assets, &config).await?;

            tokio::fs::create_dir_all(&out_dir).await?;
            let path = out_dir.join(&package.file_name);
            tokio::fs::write(&path, &package.bytes).await?;

            println!("Template Package:");
            for entry in &package.entries {
                println!("  {} ({} bytes)", entry.name, entry.size);
            }
            println!("Generated {} → {}", package.file_name, path.display());
        }

        Commands::Geometry { request } => {
            let request = request.into_request().await?;
            let cover = derive_cover_geometry(&request)?;
            let interior = derive_interior_geometry(&request)?;
            let json = serde_json::json!({
                "cover": cover,
                "interior": interior,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }

        Commands::Inspect {
            source,
            json,
            timeout,
        } => {
            if let Some(secs) = timeout {
                config.fetch_timeout_secs = secs;
            }
            let analysis =
                pdf_inspect::inspect_pdf(PdfSource::parse(&source), config.fetch_timeout()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_analysis(&analysis);
            }
        }

        Commands::Batch { requests, out_dir } => {
            run_batch(config, requests, out_dir).await?;
        }
    }

    Ok(())
}
