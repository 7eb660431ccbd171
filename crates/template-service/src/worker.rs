//! Command-driven worker for batch and interactive front ends
//!
//! Commands are handled one at a time in arrival order. Every command ends
//! with either its result update or [`TemplateUpdate::Error`].

use std::path::PathBuf;
use std::sync::Arc;

use pdf_inspect::{PdfAnalysis, PdfSource, inspect_pdf};
use template_geometry::{
    CoverGeometry, InteriorGeometry, TemplateRequest, derive_cover_geometry,
    derive_interior_geometry,
};
use tokio::sync::mpsc;

use crate::assets::TemplateAssets;
use crate::config::ServiceConfig;
use crate::package::{PackageEntry, generate_package};

/// Commands sent to the worker
#[derive(Debug)]
pub enum TemplateCommand {
    /// Build a package and write it into `output_dir` under its archive name
    Generate {
        request: TemplateRequest,
        output_dir: PathBuf,
    },
    Inspect {
        source: PdfSource,
    },
    Geometry {
        request: TemplateRequest,
    },
}

/// Updates sent back from the worker
#[derive(Debug, Clone)]
pub enum TemplateUpdate {
    Progress {
        operation: String,
        current: usize,
        total: usize,
    },
    PackageWritten {
        path: PathBuf,
        entries: Vec<PackageEntry>,
        size: usize,
    },
    Inspected {
        analysis: PdfAnalysis,
    },
    GeometryDerived {
        cover: Box<CoverGeometry>,
        interior: Option<InteriorGeometry>,
    },
    Error {
        message: String,
    },
}

/// Process commands until the command channel closes
pub async fn worker_task(
    config: ServiceConfig,
    assets: Arc<TemplateAssets>,
    mut command_rx: mpsc::UnboundedReceiver<TemplateCommand>,
    update_tx: mpsc::UnboundedSender<TemplateUpdate>,
) {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &config, &assets, &update_tx).await;
    }
    log::debug!("Template worker stopped");
}

async fn process_command(
    cmd: TemplateCommand,
    config: &ServiceConfig,
    assets: &TemplateAssets,
    update_tx: &mpsc::UnboundedSender<TemplateUpdate>,
) {
    match cmd {
        TemplateCommand::Generate {
            request,
            output_dir,
        } => {
            handle_generate(request, output_dir, config, assets, update_tx).await;
        }
        TemplateCommand::Inspect { source } => {
            match inspect_pdf(source, config.fetch_timeout()).await {
                Ok(analysis) => {
                    let _ = update_tx.send(TemplateUpdate::Inspected { analysis });
                }
                Err(e) => {
                    let _ = update_tx.send(TemplateUpdate::Error {
                        message: format!("Failed to inspect PDF: {e}"),
                    });
                }
            }
        }
        TemplateCommand::Geometry { request } => {
            let derived = derive_cover_geometry(&request).map(|cover| {
                // Interior margins are informative here; a trim too small for
                // them should not hide the cover layout
                let interior = derive_interior_geometry(&request).ok();
                (cover, interior)
            });
            match derived {
                Ok((cover, interior)) => {
                    let _ = update_tx.send(TemplateUpdate::GeometryDerived {
                        cover: Box::new(cover),
                        interior,
                    });
                }
                Err(e) => {
                    let _ = update_tx.send(TemplateUpdate::Error {
                        message: format!("Failed to derive geometry: {e}"),
                    });
                }
            }
        }
    }
}

async fn handle_generate(
    request: TemplateRequest,
    output_dir: PathBuf,
    config: &ServiceConfig,
    assets: &TemplateAssets,
    update_tx: &mpsc::UnboundedSender<TemplateUpdate>,
) {
    let operation = format!("Generating {}", request.archive_name());
    let progress = |current: usize| {
        let _ = update_tx.send(TemplateUpdate::Progress {
            operation: operation.clone(),
            current,
            total: 2,
        });
    };

    progress(0);
    let package = match generate_package(&request, assets, config).await {
        Ok(package) => package,
        Err(e) => {
            let _ = update_tx.send(TemplateUpdate::Error {
                message: format!("Failed to generate template package: {e}"),
            });
            return;
        }
    };
    progress(1);

    let path = output_dir.join(&package.file_name);
    let written = async {
        tokio::fs::create_dir_all(&output_dir).await?;
        tokio::fs::write(&path, &package.bytes).await
    };
    match written.await {
        Ok(()) => {
            progress(2);
            let _ = update_tx.send(TemplateUpdate::PackageWritten {
                path,
                entries: package.entries,
                size: package.bytes.len(),
            });
        }
        Err(e) => {
            let _ = update_tx.send(TemplateUpdate::Error {
                message: format!("Failed to write {}: {e}", path.display()),
            });
        }
    }
}
