use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::GpxError;
use crate::model::*;

type Result<T> = std::result::Result<T, GpxError>;

const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";

/// Serialize a document as GPX XML into any sink.
///
/// Total for structurally valid documents: only sink I/O can fail. Absent
/// optional fields produce no output at all, and sequences are emitted in
/// stored order. Element order follows the GPX 1.1 schema, independent of
/// how the document was populated.
pub fn write_gpx<W: Write>(gpx: &Gpx, sink: W) -> Result<()> {
    let mut writer = Writer::new_with_indent(sink, b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(GpxError::Io)?;

    let mut root = BytesStart::new("gpx");
    root.push_attribute(("version", gpx.version.as_str()));
    root.push_attribute(("creator", gpx.creator.as_str()));
    root.push_attribute(("xmlns", GPX_NAMESPACE));
    writer.write_event(Event::Start(root)).map_err(GpxError::Io)?;

    if let Some(ref metadata) = gpx.metadata {
        write_metadata(&mut writer, metadata)?;
    }
    for point in &gpx.waypoints {
        write_point(&mut writer, "wpt", point)?;
    }
    for route in &gpx.routes {
        write_route(&mut writer, route)?;
    }
    for track in &gpx.tracks {
        write_track(&mut writer, track)?;
    }

    write_tag_end(&mut writer, "gpx")
}

/// Serialize a document to a GPX string.
pub fn to_string(gpx: &Gpx) -> Result<String> {
    let mut buf = Vec::new();
    write_gpx(gpx, &mut buf)?;
    // the writer emits nothing but UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_tag_start<W: Write>(writer: &mut Writer<W>, tag: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(GpxError::Io)
}

fn write_tag_end<W: Write>(writer: &mut Writer<W>, tag: &str) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(GpxError::Io)
}

fn write_tag<W: Write>(writer: &mut Writer<W>, tag: &str, content: &str) -> Result<()> {
    write_tag_start(writer, tag)?;
    writer
        .write_event(Event::Text(BytesText::new(content)))
        .map_err(GpxError::Io)?;
    write_tag_end(writer, tag)
}

fn write_opt_tag<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    content: &Option<String>,
) -> Result<()> {
    if let Some(content) = content {
        write_tag(writer, tag, content)?;
    }
    Ok(())
}

/// Decimal fields use shortest float formatting that re-parses to the
/// same value, so a stored 1.5 is emitted as "1.5".
fn write_opt_f64<W: Write>(writer: &mut Writer<W>, tag: &str, value: Option<f64>) -> Result<()> {
    if let Some(value) = value {
        write_tag(writer, tag, &value.to_string())?;
    }
    Ok(())
}

fn write_opt_time<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: Option<OffsetDateTime>,
) -> Result<()> {
    if let Some(value) = value {
        write_tag(writer, tag, &value.format(&Rfc3339)?)?;
    }
    Ok(())
}

fn write_empty<W: Write>(writer: &mut Writer<W>, elem: BytesStart<'_>) -> Result<()> {
    writer.write_event(Event::Empty(elem)).map_err(GpxError::Io)
}

fn write_metadata<W: Write>(writer: &mut Writer<W>, metadata: &Metadata) -> Result<()> {
    write_tag_start(writer, "metadata")?;
    write_opt_tag(writer, "name", &metadata.name)?;
    write_opt_tag(writer, "desc", &metadata.desc)?;
    if let Some(ref author) = metadata.author {
        write_person(writer, author)?;
    }
    if let Some(ref copyright) = metadata.copyright {
        write_copyright(writer, copyright)?;
    }
    for link in &metadata.links {
        write_link(writer, link)?;
    }
    write_opt_time(writer, "time", metadata.time)?;
    write_opt_tag(writer, "keywords", &metadata.keywords)?;
    if let Some(ref bounds) = metadata.bounds {
        let mut elem = BytesStart::new("bounds");
        elem.push_attribute(("minlat", bounds.minlat.to_string().as_str()));
        elem.push_attribute(("minlon", bounds.minlon.to_string().as_str()));
        elem.push_attribute(("maxlat", bounds.maxlat.to_string().as_str()));
        elem.push_attribute(("maxlon", bounds.maxlon.to_string().as_str()));
        write_empty(writer, elem)?;
    }
    write_tag_end(writer, "metadata")
}

fn write_person<W: Write>(writer: &mut Writer<W>, person: &Person) -> Result<()> {
    write_tag_start(writer, "author")?;
    write_opt_tag(writer, "name", &person.name)?;
    if let Some(ref email) = person.email {
        let mut elem = BytesStart::new("email");
        elem.push_attribute(("id", email.id.as_str()));
        elem.push_attribute(("domain", email.domain.as_str()));
        write_empty(writer, elem)?;
    }
    if let Some(ref link) = person.link {
        write_link(writer, link)?;
    }
    write_tag_end(writer, "author")
}

fn write_copyright<W: Write>(writer: &mut Writer<W>, copyright: &Copyright) -> Result<()> {
    let mut elem = BytesStart::new("copyright");
    elem.push_attribute(("author", copyright.author.as_str()));
    if copyright.year.is_none() && copyright.license.is_none() {
        return write_empty(writer, elem);
    }
    writer.write_event(Event::Start(elem)).map_err(GpxError::Io)?;
    if let Some(year) = copyright.year {
        write_tag(writer, "year", &year.to_string())?;
    }
    write_opt_tag(writer, "license", &copyright.license)?;
    write_tag_end(writer, "copyright")
}

fn write_link<W: Write>(writer: &mut Writer<W>, link: &Link) -> Result<()> {
    let mut elem = BytesStart::new("link");
    elem.push_attribute(("href", link.href.as_str()));
    if link.text.is_none() && link.link_type.is_none() {
        return write_empty(writer, elem);
    }
    writer.write_event(Event::Start(elem)).map_err(GpxError::Io)?;
    write_opt_tag(writer, "text", &link.text)?;
    write_opt_tag(writer, "type", &link.link_type)?;
    write_tag_end(writer, "link")
}

fn write_point<W: Write>(writer: &mut Writer<W>, tag: &str, point: &Waypoint) -> Result<()> {
    let mut elem = BytesStart::new(tag);
    elem.push_attribute(("lat", point.lat.to_string().as_str()));
    elem.push_attribute(("lon", point.lon.to_string().as_str()));
    if point_is_bare(point) {
        return write_empty(writer, elem);
    }
    writer.write_event(Event::Start(elem)).map_err(GpxError::Io)?;

    write_opt_f64(writer, "ele", point.ele)?;
    write_opt_time(writer, "time", point.time)?;
    write_opt_f64(writer, "magvar", point.magvar)?;
    write_opt_f64(writer, "geoidheight", point.geoidheight)?;
    write_opt_tag(writer, "name", &point.name)?;
    write_opt_tag(writer, "cmt", &point.cmt)?;
    write_opt_tag(writer, "desc", &point.desc)?;
    write_opt_tag(writer, "src", &point.src)?;
    for link in &point.links {
        write_link(writer, link)?;
    }
    write_opt_tag(writer, "sym", &point.sym)?;
    write_opt_tag(writer, "type", &point.point_type)?;
    write_opt_tag(writer, "fix", &point.fix)?;
    if let Some(sat) = point.sat {
        write_tag(writer, "sat", &sat.to_string())?;
    }
    write_opt_f64(writer, "hdop", point.hdop)?;
    write_opt_f64(writer, "vdop", point.vdop)?;
    write_opt_f64(writer, "pdop", point.pdop)?;
    write_opt_f64(writer, "ageofdgpsdata", point.ageofdgpsdata)?;
    write_opt_tag(writer, "dgpsid", &point.dgpsid)?;

    write_tag_end(writer, tag)
}

fn point_is_bare(point: &Waypoint) -> bool {
    point.ele.is_none()
        && point.time.is_none()
        && point.magvar.is_none()
        && point.geoidheight.is_none()
        && point.name.is_none()
        && point.cmt.is_none()
        && point.desc.is_none()
        && point.src.is_none()
        && point.links.is_empty()
        && point.sym.is_none()
        && point.point_type.is_none()
        && point.fix.is_none()
        && point.sat.is_none()
        && point.hdop.is_none()
        && point.vdop.is_none()
        && point.pdop.is_none()
        && point.ageofdgpsdata.is_none()
        && point.dgpsid.is_none()
}

fn write_route<W: Write>(writer: &mut Writer<W>, route: &Route) -> Result<()> {
    write_tag_start(writer, "rte")?;
    write_opt_tag(writer, "name", &route.name)?;
    write_opt_tag(writer, "cmt", &route.cmt)?;
    write_opt_tag(writer, "desc", &route.desc)?;
    write_opt_tag(writer, "src", &route.src)?;
    for link in &route.links {
        write_link(writer, link)?;
    }
    if let Some(number) = route.number {
        write_tag(writer, "number", &number.to_string())?;
    }
    write_opt_tag(writer, "type", &route.route_type)?;
    for point in &route.points {
        write_point(writer, "rtept", point)?;
    }
    write_tag_end(writer, "rte")
}

fn write_track<W: Write>(writer: &mut Writer<W>, track: &Track) -> Result<()> {
    write_tag_start(writer, "trk")?;
    write_opt_tag(writer, "name", &track.name)?;
    write_opt_tag(writer, "cmt", &track.cmt)?;
    write_opt_tag(writer, "desc", &track.desc)?;
    write_opt_tag(writer, "src", &track.src)?;
    for link in &track.links {
        write_link(writer, link)?;
    }
    if let Some(number) = track.number {
        write_tag(writer, "number", &number.to_string())?;
    }
    write_opt_tag(writer, "type", &track.track_type)?;
    for segment in &track.segments {
        if segment.points.is_empty() {
            write_empty(writer, BytesStart::new("trkseg"))?;
        } else {
            write_tag_start(writer, "trkseg")?;
            for point in &segment.points {
                write_point(writer, "trkpt", point)?;
            }
            write_tag_end(writer, "trkseg")?;
        }
    }
    write_tag_end(writer, "trk")
}
