//! Embedded video and audio shapes.

use std::fmt::Write as _;

use super::slide::write_xfrm;
use crate::container::escape_xml;
use crate::template::Xfrm;

/// Position used when the media placeholder carries no geometry:
/// 1 inch from the top-left corner, 6 x 4.5 inches.
pub const DEFAULT_MEDIA_XFRM: Xfrm = Xfrm {
    x: 914_400,
    y: 914_400,
    cx: 5_486_400,
    cy: 4_114_800,
};

const P14_MEDIA_EXT: &str = "{DAA4B4D4-6D71-4841-9C94-3DE7FCFB9230}";

/// A video or audio clip drawn as a picture with a play action.
#[derive(Debug, Clone)]
pub struct MediaShape {
    pub id: u32,
    pub name: String,
    pub xfrm: Xfrm,
    pub is_audio: bool,
    /// `a:videoFile`/`a:audioFile` link relationship
    pub link_rel_id: String,
    /// PowerPoint 2010 media relationship
    pub embed_rel_id: String,
    /// Poster frame image relationship
    pub poster_rel_id: Option<String>,
}

impl MediaShape {
    pub(crate) fn write(&self, xml: &mut String) {
        xml.push_str("<p:pic><p:nvPicPr>");
        let _ = write!(
            xml,
            r#"<p:cNvPr id="{}" name="{}"><a:hlinkClick r:id="" action="ppaction://media"/></p:cNvPr>"#,
            self.id,
            escape_xml(&self.name)
        );
        xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr>"#);

        let file_tag = if self.is_audio { "a:audioFile" } else { "a:videoFile" };
        let _ = write!(xml, r#"<{} r:link="{}"/>"#, file_tag, self.link_rel_id);
        let _ = write!(
            xml,
            r#"<p:extLst><p:ext uri="{}"><p14:media xmlns:p14="http://schemas.microsoft.com/office/powerpoint/2010/main" r:embed="{}"/></p:ext></p:extLst>"#,
            P14_MEDIA_EXT,
            self.embed_rel_id
        );
        xml.push_str("</p:nvPr></p:nvPicPr>");

        xml.push_str("<p:blipFill>");
        if let Some(poster) = &self.poster_rel_id {
            let _ = write!(xml, r#"<a:blip r:embed="{}"/>"#, poster);
        }
        xml.push_str("<a:stretch><a:fillRect/></a:stretch></p:blipFill>");

        xml.push_str("<p:spPr>");
        write_xfrm(xml, "a:xfrm", &self.xfrm);
        xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#);
    }
}
