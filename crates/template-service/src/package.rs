//! Request-level generation: geometry once, every format in parallel, one ZIP

use std::sync::Arc;

use chrono::{DateTime, Utc};
use template_geometry::{TemplateRequest, derive_cover_geometry, derive_interior_geometry};
use template_render::container::{Compression, ZipWriter};
use template_render::{
    CoverIdml, CoverPdf, CoverPsd, InteriorDocx, InteriorIdml, InteriorPdf, RenderContext,
    TemplateRenderer,
};
use tokio::task::JoinSet;

use crate::assets::TemplateAssets;
use crate::config::ServiceConfig;
use crate::summary::summary_text;
use crate::types::*;

pub const SUMMARY_ENTRY: &str = "summary.txt";

/// One file inside a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    pub name: String,
    pub size: usize,
}

/// Finished template archive
#[derive(Debug, Clone)]
pub struct TemplatePackage {
    /// Suggested download name, `Template_<binding>_<scope>.zip`
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Entries in archive order
    pub entries: Vec<PackageEntry>,
}

type RenderOutcome = (usize, &'static str, template_render::Result<Vec<u8>>);

/// Generate the template archive for a request.
///
/// The request is validated before anything is rendered. Each format renders
/// on the blocking pool; the first failure aborts the rest and no archive is
/// produced.
pub async fn generate_package(
    request: &TemplateRequest,
    assets: &TemplateAssets,
    config: &ServiceConfig,
) -> Result<TemplatePackage> {
    generate_package_at(request, assets, config, Utc::now()).await
}

/// [`generate_package`] with a fixed summary timestamp
pub async fn generate_package_at(
    request: &TemplateRequest,
    assets: &TemplateAssets,
    config: &ServiceConfig,
    generated_at: DateTime<Utc>,
) -> Result<TemplatePackage> {
    log::info!(
        "Received request for package type \"{}\" for binding \"{}\"",
        request.package_type.as_str(),
        request.binding_name
    );
    request.validate()?;
    config.validate()?;

    let scope = request.package_type;
    let cover = if scope.includes_cover() {
        Some(Arc::new(derive_cover_geometry(request)?))
    } else {
        None
    };
    let interior = if scope.includes_interior() {
        Some(Arc::new(derive_interior_geometry(request)?))
    } else {
        None
    };
    if let Some(cover) = cover.as_deref().filter(|c| !c.is_supported()) {
        log::warn!("No layout for binding \"{}\", writing placeholders", cover.binding);
    }

    let ctx = Arc::new(RenderContext {
        dpi: config.raster_dpi,
        logo: assets.logo.clone(),
    });

    let mut tasks = JoinSet::new();
    let mut index = 0;
    if let Some(geometry) = &cover {
        spawn_render(&mut tasks, &mut index, CoverPdf, geometry, &ctx);
        spawn_render(&mut tasks, &mut index, CoverPsd, geometry, &ctx);
        spawn_render(&mut tasks, &mut index, CoverIdml, geometry, &ctx);
    }
    if let Some(geometry) = &interior {
        spawn_render(&mut tasks, &mut index, InteriorDocx, geometry, &ctx);
        spawn_render(&mut tasks, &mut index, InteriorPdf, geometry, &ctx);
        spawn_render(&mut tasks, &mut index, InteriorIdml, geometry, &ctx);
    }

    let mut rendered: Vec<Option<(&'static str, Vec<u8>)>> = vec![None; index];
    while let Some(joined) = tasks.join_next().await {
        let (slot, entry, result) = joined?;
        match result {
            Ok(bytes) => {
                log::info!("Generated {} ({} bytes)", entry, bytes.len());
                rendered[slot] = Some((entry, bytes));
            }
            Err(source) => {
                tasks.abort_all();
                log::warn!("Generating {} failed: {}", entry, source);
                return Err(ServiceError::Render {
                    entry: entry.to_string(),
                    source,
                });
            }
        }
    }

    let summary = summary_text(request, cover.as_deref(), interior.as_deref(), generated_at);
    let compression = if config.compress_archive {
        Compression::Deflated
    } else {
        Compression::Stored
    };

    let mut zip = ZipWriter::new();
    let mut entries = Vec::new();
    let mut add = |name: &str, data: &[u8]| -> Result<()> {
        zip.add_file(name, data, compression)?;
        entries.push(PackageEntry {
            name: name.to_string(),
            size: data.len(),
        });
        Ok(())
    };

    add(SUMMARY_ENTRY, summary.as_bytes())?;
    for (entry, bytes) in rendered.into_iter().flatten() {
        add(entry, &bytes)?;
    }
    if let Some(guide) = &assets.guide {
        add(&format!("Guide/{}", guide.file_name), &guide.bytes)?;
    }

    let bytes = zip.finish()?;
    let file_name = request.archive_name();
    log::info!(
        "Packaged {} ({} files, {} bytes)",
        file_name,
        entries.len(),
        bytes.len()
    );

    Ok(TemplatePackage {
        file_name,
        bytes,
        entries,
    })
}

fn spawn_render<G, R>(
    tasks: &mut JoinSet<RenderOutcome>,
    index: &mut usize,
    renderer: R,
    geometry: &Arc<G>,
    ctx: &Arc<RenderContext>,
) where
    G: Send + Sync + 'static,
    R: TemplateRenderer<G> + 'static,
{
    let slot = *index;
    *index += 1;
    let geometry = Arc::clone(geometry);
    let ctx = Arc::clone(ctx);
    tasks.spawn_blocking(move || {
        let entry = renderer.entry_name();
        (slot, entry, renderer.render(&geometry, &ctx))
    });
}
