//! Presentation assembly.
//!
//! The [`Assembler`] turns a [`Presentation`] into a `.pptx` file by
//! instantiating template layouts and populating their placeholders.
//!
//! Only a missing template and failures reading the template or writing the
//! output abort a run. Everything else (a missing asset, a layout without a
//! matching placeholder, an unreadable workbook) skips that one asset and is
//! recorded in the returned [`AssemblyReport`].

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::charts::{ChartData, CHART_CONTENT_TYPE, REL_CHART};
use crate::detect::{ImageFormat, MediaFormat};
use crate::error::{Error, Result};
use crate::model::{AssetKind, Presentation, Slide};
use crate::pptx::{
    ChartFrame, MediaShape, NativeSlide, PictureShape, PlaceholderShape, Shape, TableFrame,
    DEFAULT_MEDIA_XFRM, REL_AUDIO, REL_IMAGE, REL_MEDIA, REL_VIDEO,
};
use crate::template::{PlaceholderRole, Template, Xfrm};
use crate::xlsx;

/// Why an asset was left off its slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The file does not exist.
    AssetNotFound,
    /// The slide's layout has no placeholder for this kind of asset.
    NoPlaceholder,
    /// The file exists but could not be read or embedded.
    InsertionFailed(String),
}

/// An asset that was not placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedAsset {
    /// Zero-based position of the slide in the deck
    pub slide_index: usize,
    pub kind: AssetKind,
    /// Path after resolution against the asset root
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// A slide whose layout id was outside the template's layout list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutFallback {
    pub slide_index: usize,
    pub requested: usize,
    /// Number of layouts the template provides
    pub available: usize,
}

/// Outcome of one assembly run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssemblyReport {
    pub slides_written: usize,
    pub output_path: PathBuf,
    pub skipped: Vec<SkippedAsset>,
    pub layout_fallbacks: Vec<LayoutFallback>,
}

impl AssemblyReport {
    /// Whether every asset was placed on a layout of the requested id.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.layout_fallbacks.is_empty()
    }

    /// Skipped assets of one slide.
    pub fn skipped_on(&self, slide_index: usize) -> impl Iterator<Item = &SkippedAsset> {
        self.skipped
            .iter()
            .filter(move |s| s.slide_index == slide_index)
    }

    fn skip(&mut self, slide_index: usize, kind: AssetKind, path: PathBuf, reason: SkipReason) {
        self.skipped.push(SkippedAsset {
            slide_index,
            kind,
            path,
            reason,
        });
    }
}

/// Writes presentations into templates.
///
/// # Example
///
/// ```no_run
/// use deckgen::{Assembler, LayoutMapping, SlideBuilder, Presentation};
///
/// let mapping = LayoutMapping::default();
/// let mut deck = Presentation::new("Quarterly Review");
///
/// let mut builder = SlideBuilder::new(&mapping);
/// builder.set_title("Results").add_bullet_point("Revenue up 12%");
/// builder.set_table("data/sales.xlsx");
/// deck.push(builder.finalize());
///
/// let report = Assembler::new()
///     .with_asset_root("assets")
///     .assemble(&deck, "templates/SimpleTemplate.pptx", "outputs/review.pptx")?;
/// println!("{} slides written", report.slides_written);
/// # Ok::<(), deckgen::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Assembler {
    asset_root: PathBuf,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    /// Create an assembler resolving relative asset paths against the
    /// current directory.
    pub fn new() -> Self {
        Self {
            asset_root: PathBuf::from("."),
        }
    }

    /// Resolve relative asset paths against `root` instead.
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    /// Write `presentation` to `output_path` using the layouts of the
    /// template at `template_path`.
    ///
    /// Slides already in the template are dropped; the output holds exactly
    /// one slide per input slide, in order.
    pub fn assemble(
        &self,
        presentation: &Presentation,
        template_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
    ) -> Result<AssemblyReport> {
        self.run(presentation, template_path.as_ref(), output_path.as_ref())
    }

    /// Run [`Assembler::assemble`] on Tokio's blocking pool.
    #[cfg(feature = "async")]
    pub async fn assemble_async(
        &self,
        presentation: Presentation,
        template_path: PathBuf,
        output_path: PathBuf,
    ) -> Result<AssemblyReport> {
        let assembler = self.clone();
        tokio::task::spawn_blocking(move || {
            assembler.run(&presentation, &template_path, &output_path)
        })
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?
    }

    #[instrument(skip(self, presentation), fields(title = %presentation.title, slides = presentation.len()))]
    fn run(
        &self,
        presentation: &Presentation,
        template_path: &Path,
        output_path: &Path,
    ) -> Result<AssemblyReport> {
        let mut template = Template::open(template_path)?;
        let removed = template.clear_slides()?;
        if removed > 0 {
            debug!(removed, "removed template slides");
        }
        template.set_title(&presentation.title);

        let mut report = AssemblyReport {
            output_path: output_path.to_path_buf(),
            ..Default::default()
        };

        for (index, slide) in presentation.slides.iter().enumerate() {
            let native = self.build_slide(&mut template, index, slide, &mut report)?;
            template.add_slide(&native)?;
            report.slides_written += 1;
        }

        template.save(output_path)?;
        info!(
            output = %output_path.display(),
            slides = report.slides_written,
            skipped = report.skipped.len(),
            "presentation saved"
        );
        Ok(report)
    }

    fn build_slide(
        &self,
        template: &mut Template,
        index: usize,
        slide: &Slide,
        report: &mut AssemblyReport,
    ) -> Result<NativeSlide> {
        let requested = slide.layout_id();
        let layout = match template.layout(requested) {
            Ok(layout) => layout,
            Err(_) => {
                let available = template.layouts().len();
                warn!(
                    slide = index,
                    requested,
                    available,
                    "layout id out of range, using layout 0"
                );
                report.layout_fallbacks.push(LayoutFallback {
                    slide_index: index,
                    requested,
                    available,
                });
                template.layout(0)?
            }
        };
        debug!(slide = index, layout = %layout.name, "creating slide");

        let mut native = NativeSlide::from_layout(layout);
        let content = slide.content();
        native.set_title(&content.title);
        if content.has_bullets() {
            native.set_body(&content.bullet_points);
        }

        for (kind, path) in content.assets() {
            let (resolved, position) = match self.locate(&native, kind, path) {
                Ok(found) => found,
                Err(Error::AssetNotFound(resolved)) => {
                    warn!(
                        slide = index,
                        asset = %kind,
                        path = %resolved.display(),
                        "asset not found, skipping"
                    );
                    report.skip(index, kind, resolved, SkipReason::AssetNotFound);
                    continue;
                }
                Err(err) => {
                    debug!(slide = index, asset = %kind, error = %err, "skipping asset");
                    report.skip(index, kind, self.resolve(path), SkipReason::NoPlaceholder);
                    continue;
                }
            };
            let Some(placeholder) = native.placeholder_at(position).cloned() else {
                continue;
            };

            let shape = match kind {
                AssetKind::Image => insert_image(template, &mut native, &placeholder, &resolved),
                AssetKind::Table => insert_table(template, &placeholder, &resolved),
                AssetKind::Chart => insert_chart(template, &mut native, &placeholder, &resolved, slide),
                AssetKind::Media => {
                    let poster = content
                        .media_poster_path
                        .as_ref()
                        .and_then(|p| self.load_poster(index, p));
                    insert_media(template, &mut native, &placeholder, &resolved, poster)
                }
            };

            match shape {
                Ok(shape) => {
                    debug!(slide = index, asset = %kind, path = %resolved.display(), "asset placed");
                    native.replace_shape(position, shape);
                }
                Err(err) => {
                    warn!(
                        slide = index,
                        asset = %kind,
                        path = %resolved.display(),
                        error = %err,
                        "failed to insert asset, skipping"
                    );
                    report.skip(index, kind, resolved, SkipReason::InsertionFailed(err.to_string()));
                }
            }
        }

        Ok(native)
    }

    /// Resolve an asset file and the slide placeholder it goes into.
    fn locate(&self, native: &NativeSlide, kind: AssetKind, path: &Path) -> Result<(PathBuf, usize)> {
        let resolved = self.resolve(path);
        if !resolved.is_file() {
            return Err(Error::AssetNotFound(resolved));
        }
        let position = native
            .find_placeholder(placeholder_role(kind))
            .ok_or_else(|| Error::PlaceholderNotFound(kind.to_string()))?;
        Ok((resolved, position))
    }

    /// Absolute location of an asset; relative roots are taken from the working directory.
    fn resolve(&self, path: &Path) -> PathBuf {
        let joined = self.asset_root.join(path);
        if joined.is_absolute() {
            return joined;
        }
        std::path::absolute(&joined).unwrap_or(joined)
    }

    /// Poster frames are optional; problems only drop the poster.
    fn load_poster(&self, index: usize, path: &Path) -> Option<(Vec<u8>, ImageFormat)> {
        let resolved = self.resolve(path);
        let data = match fs::read(&resolved) {
            Ok(data) => data,
            Err(err) => {
                warn!(slide = index, path = %resolved.display(), error = %err, "poster image unavailable");
                return None;
            }
        };
        match ImageFormat::detect(&data, &resolved) {
            Some(format) => Some((data, format)),
            None => {
                warn!(slide = index, path = %resolved.display(), "unrecognized poster image format");
                None
            }
        }
    }
}

fn placeholder_role(kind: AssetKind) -> PlaceholderRole {
    match kind {
        AssetKind::Image => PlaceholderRole::Picture,
        AssetKind::Table => PlaceholderRole::Table,
        AssetKind::Chart => PlaceholderRole::Chart,
        AssetKind::Media => PlaceholderRole::Media,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Frame used for tables and charts when neither the layout nor its master
/// positions the placeholder.
fn fallback_frame(slide_size: (i64, i64)) -> Xfrm {
    let (width, height) = slide_size;
    Xfrm::new(width / 10, height / 4, width * 8 / 10, height * 2 / 3)
}

fn insert_image(
    template: &mut Template,
    slide: &mut NativeSlide,
    placeholder: &PlaceholderShape,
    path: &Path,
) -> Result<Shape> {
    let data = fs::read(path)?;
    let format = ImageFormat::detect(&data, path)
        .ok_or_else(|| Error::UnsupportedFormat(format!("image {}", path.display())))?;

    let part = template.add_part("ppt/media/image", format.extension(), data, format.content_type());
    let rel_id = slide.add_relationship(REL_IMAGE, &part);

    Ok(Shape::Picture(PictureShape {
        id: placeholder.id,
        name: placeholder.name.clone(),
        descr: file_name(path),
        ph: placeholder.ph,
        rel_id,
    }))
}

fn insert_table(template: &Template, placeholder: &PlaceholderShape, path: &Path) -> Result<Shape> {
    let data = xlsx::read_table(path)?;
    if data.column_count() == 0 {
        return Err(Error::InvalidData("worksheet has no columns".to_string()));
    }

    Ok(Shape::Table(TableFrame {
        id: placeholder.id,
        name: placeholder.name.clone(),
        ph: placeholder.ph,
        xfrm: placeholder
            .xfrm
            .unwrap_or_else(|| fallback_frame(template.slide_size())),
        grid: data.grid(),
    }))
}

fn insert_chart(
    template: &mut Template,
    slide: &mut NativeSlide,
    placeholder: &PlaceholderShape,
    path: &Path,
    source: &Slide,
) -> Result<Shape> {
    let data = ChartData::from_tabular(&xlsx::read_table(path)?)?;
    let xml = data.to_xml(source.content().chart_kind);

    let part = template.add_part("ppt/charts/chart", "xml", xml.into_bytes(), CHART_CONTENT_TYPE);
    let rel_id = slide.add_relationship(REL_CHART, &part);

    Ok(Shape::Chart(ChartFrame {
        id: placeholder.id,
        name: placeholder.name.clone(),
        ph: placeholder.ph,
        xfrm: placeholder
            .xfrm
            .unwrap_or_else(|| fallback_frame(template.slide_size())),
        rel_id,
    }))
}

fn insert_media(
    template: &mut Template,
    slide: &mut NativeSlide,
    placeholder: &PlaceholderShape,
    path: &Path,
    poster: Option<(Vec<u8>, ImageFormat)>,
) -> Result<Shape> {
    let format = MediaFormat::from_path(path)
        .ok_or_else(|| Error::UnsupportedFormat(format!("media {}", path.display())))?;
    let data = fs::read(path)?;

    let part = template.add_part("ppt/media/media", format.extension(), data, format.content_type());
    let link_rel = if format.is_audio() { REL_AUDIO } else { REL_VIDEO };
    let link_rel_id = slide.add_relationship(link_rel, &part);
    let embed_rel_id = slide.add_relationship(REL_MEDIA, &part);

    let poster_rel_id = poster.map(|(data, format)| {
        let part = template.add_part("ppt/media/image", format.extension(), data, format.content_type());
        slide.add_relationship(REL_IMAGE, &part)
    });

    Ok(Shape::Media(MediaShape {
        id: placeholder.id,
        name: placeholder.name.clone(),
        xfrm: placeholder.xfrm.unwrap_or(DEFAULT_MEDIA_XFRM),
        is_audio: format.is_audio(),
        link_rel_id,
        embed_rel_id,
        poster_rel_id,
    }))
}
