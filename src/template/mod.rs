//! Presentation templates.
//!
//! A [`Template`] is an opened `.pptx`/`.potx` package whose slide layouts
//! are parsed up front. Slides are removed and appended through it, and
//! [`Template::save`] writes the result as a new presentation.

mod layout;
mod placeholder;
mod presentation;

pub use layout::SlideLayout;
pub use placeholder::{Placeholder, PlaceholderRole, PlaceholderType, Xfrm};

use crate::container::{OoxmlContainer, REL_CORE_PROPERTIES, REL_OFFICE_DOCUMENT};
use crate::detect::{detect_format, FormatType};
use crate::error::{Error, Result};
use crate::package::Package;
use crate::pptx::{NativeSlide, CT_CORE_PROPERTIES, CT_SLIDE, REL_SLIDE, REL_SLIDE_MASTER};
use std::path::{Path, PathBuf};
use tracing::debug;

/// An opened presentation template.
#[derive(Debug)]
pub struct Template {
    path: PathBuf,
    package: Package,
    presentation_part: String,
    layouts: Vec<SlideLayout>,
    slide_size: (i64, i64),
    /// `(slide id, relationship id)` of the slides in presentation order
    slide_ids: Vec<(u32, String)>,
    title: Option<String>,
}

impl Template {
    /// Open a template file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// let template = deckgen::Template::open("templates/SimpleTemplate.pptx")?;
    /// for (i, name) in template.layout_names().iter().enumerate() {
    ///     println!("{i}: {name}");
    /// }
    /// # Ok::<(), deckgen::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::TemplateNotFound(path.to_path_buf()));
        }

        let container = OoxmlContainer::open(path)?;
        if detect_format(&container)? != FormatType::Pptx {
            return Err(Error::UnsupportedFormat(format!(
                "{} is not a presentation",
                path.display()
            )));
        }
        let package = Package::from_container(&container)?;

        let presentation_part = package
            .relationships("")?
            .first_of_type(REL_OFFICE_DOCUMENT)
            .map(|rel| OoxmlContainer::resolve_path("", &rel.target))
            .unwrap_or_else(|| "ppt/presentation.xml".to_string());
        let presentation_xml = package.read_xml(&presentation_part)?;

        let slide_size = presentation::slide_size(&presentation_xml);
        let slide_ids = Self::existing_slide_ids(&package, &presentation_part, &presentation_xml)?;
        let layouts = Self::load_layouts(&package, &presentation_part, &presentation_xml)?;
        if layouts.is_empty() {
            return Err(Error::MissingComponent("slide layouts".to_string()));
        }

        debug!(
            template = %path.display(),
            layouts = layouts.len(),
            slides = slide_ids.len(),
            "opened template"
        );

        Ok(Self {
            path: path.to_path_buf(),
            package,
            presentation_part,
            layouts,
            slide_size,
            slide_ids,
            title: None,
        })
    }

    fn existing_slide_ids(
        package: &Package,
        presentation_part: &str,
        presentation_xml: &str,
    ) -> Result<Vec<(u32, String)>> {
        let rels = package.relationships(presentation_part)?;
        Ok(presentation::slide_entries(presentation_xml)?
            .into_iter()
            .filter(|(_, rel_id)| rels.get(rel_id).is_some())
            .collect())
    }

    /// Layouts of the first slide master, in master order.
    ///
    /// Falls back to every `slideLayoutN.xml` part sorted by N when the
    /// master or its layout list cannot be resolved.
    fn load_layouts(
        package: &Package,
        presentation_part: &str,
        presentation_xml: &str,
    ) -> Result<Vec<SlideLayout>> {
        let rels = package.relationships(presentation_part)?;
        let master_part = presentation::list_rel_ids(presentation_xml, b"sldMasterId")?
            .first()
            .and_then(|id| rels.get(id))
            .or_else(|| rels.first_of_type(REL_SLIDE_MASTER))
            .map(|rel| OoxmlContainer::resolve_path(presentation_part, &rel.target))
            .filter(|part| package.contains(part));

        let (master_placeholders, mut layout_parts) = match &master_part {
            Some(master_part) => {
                let master_xml = package.read_xml(master_part)?;
                let master_rels = package.relationships(master_part)?;
                let parts: Vec<String> = presentation::list_rel_ids(&master_xml, b"sldLayoutId")?
                    .iter()
                    .filter_map(|id| master_rels.get(id))
                    .map(|rel| OoxmlContainer::resolve_path(master_part, &rel.target))
                    .filter(|part| package.contains(part))
                    .collect();
                (layout::parse_master_placeholders(&master_xml)?, parts)
            }
            None => (Vec::new(), Vec::new()),
        };

        if layout_parts.is_empty() {
            let mut numbered: Vec<(u32, String)> = package
                .part_names()
                .filter_map(|name| {
                    let n = name
                        .strip_prefix("ppt/slideLayouts/slideLayout")?
                        .strip_suffix(".xml")?
                        .parse()
                        .ok()?;
                    Some((n, name.to_string()))
                })
                .collect();
            numbered.sort();
            layout_parts = numbered.into_iter().map(|(_, name)| name).collect();
        }

        layout_parts
            .iter()
            .map(|part| SlideLayout::parse(part, &package.read_xml(part)?, &master_placeholders))
            .collect()
    }

    /// Path the template was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn layouts(&self) -> &[SlideLayout] {
        &self.layouts
    }

    /// Layout at a zero-based index in master order.
    pub fn layout(&self, index: usize) -> Result<&SlideLayout> {
        self.layouts
            .get(index)
            .ok_or(Error::LayoutIndexOutOfRange {
                requested: index,
                available: self.layouts.len(),
            })
    }

    /// Layout names in master order.
    pub fn layout_names(&self) -> Vec<&str> {
        self.layouts.iter().map(|l| l.name.as_str()).collect()
    }

    /// Slide size in EMU.
    pub fn slide_size(&self) -> (i64, i64) {
        self.slide_size
    }

    /// Number of slides currently in the presentation.
    pub fn slide_count(&self) -> usize {
        self.slide_ids.len()
    }

    /// Remove every slide. Returns how many were removed.
    ///
    /// Slide parts are dropped right away; parts only they referenced
    /// (notes, media) disappear when the package is pruned on save.
    pub fn clear_slides(&mut self) -> Result<usize> {
        let mut rels = self.package.relationships(&self.presentation_part)?;
        let removed = rels.remove_where(|rel| rel.rel_type == REL_SLIDE);
        for rel in &removed {
            let part = OoxmlContainer::resolve_path(&self.presentation_part, &rel.target);
            self.package.remove_part(&part);
        }
        self.package.set_relationships(&self.presentation_part, &rels);
        self.slide_ids.clear();
        Ok(removed.len())
    }

    /// Set the document title written to the core properties on save.
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    /// Store a new binary or XML part under `{prefix}{N}.{ext}` and return its path.
    pub fn add_part(&mut self, prefix: &str, ext: &str, data: Vec<u8>, content_type: &str) -> String {
        let part = self.package.next_part_name(prefix, ext);
        self.package.put_part(&part, data, content_type);
        part
    }

    /// Append a finished slide and return its part path.
    pub fn add_slide(&mut self, slide: &NativeSlide) -> Result<String> {
        let part = self.package.next_part_name("ppt/slides/slide", "xml");
        self.package
            .put_part(&part, slide.to_xml().into_bytes(), CT_SLIDE);
        self.package.set_relationships(&part, slide.relationships());

        let mut rels = self.package.relationships(&self.presentation_part)?;
        let rel_id = rels.add(
            REL_SLIDE,
            &OoxmlContainer::relative_path(&self.presentation_part, &part),
        );
        self.package.set_relationships(&self.presentation_part, &rels);

        let id = self
            .slide_ids
            .iter()
            .map(|(id, _)| id + 1)
            .max()
            .unwrap_or(presentation::FIRST_SLIDE_ID);
        self.slide_ids.push((id, rel_id));
        Ok(part)
    }

    /// Write the presentation to `path`.
    ///
    /// Rewrites the slide list and core title, drops unreachable parts, and
    /// serializes the package.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let xml = self.package.read_xml(&self.presentation_part)?;
        let xml = presentation::rewrite_slide_list(&xml, &self.slide_ids)?;
        self.package.set_xml(&self.presentation_part, xml);

        if let Some(title) = self.title.clone() {
            self.write_core_title(&title)?;
        }

        let pruned = self.package.prune_unreachable()?;
        debug!(pruned, "pruned unreachable parts");

        self.package.save(path)
    }

    fn write_core_title(&mut self, title: &str) -> Result<()> {
        let mut rels = self.package.relationships("")?;
        let existing = rels
            .first_of_type(REL_CORE_PROPERTIES)
            .map(|rel| OoxmlContainer::resolve_path("", &rel.target))
            .filter(|part| self.package.contains(part));

        match existing {
            Some(part) => {
                let xml = presentation::set_core_title(&self.package.read_xml(&part)?, title)?;
                self.package.set_xml(&part, xml);
            }
            None => {
                rels.remove_where(|rel| rel.rel_type == REL_CORE_PROPERTIES);
                let part = "docProps/core.xml";
                self.package.put_part(
                    part,
                    presentation::new_core_xml(title).into_bytes(),
                    CT_CORE_PROPERTIES,
                );
                rels.add(REL_CORE_PROPERTIES, part);
                self.package.set_relationships("", &rels);
            }
        }
        Ok(())
    }

    /// The underlying package.
    pub fn package(&self) -> &Package {
        &self.package
    }
}
