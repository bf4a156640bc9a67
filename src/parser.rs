use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::GpxError;
use crate::model::*;

type Result<T> = std::result::Result<T, GpxError>;

/// Parse a GPX XML string into a document tree.
///
/// Decoding is all-or-nothing: any missing required attribute, unparseable
/// scalar, or malformed timestamp fails the whole call. Unrecognized child
/// elements (extensions, vendor data) are skipped.
pub fn parse_gpx(xml: &str) -> Result<Gpx> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                return if e.local_name().as_ref() == b"gpx" {
                    parse_root(&e, &mut reader)
                } else {
                    Err(GpxError::UnexpectedRoot(element_name(&e)))
                };
            }
            Ok(Event::Empty(e)) => {
                return if e.local_name().as_ref() == b"gpx" {
                    let (version, creator) = root_attrs(&e)?;
                    Ok(Gpx::new(version, creator))
                } else {
                    Err(GpxError::UnexpectedRoot(element_name(&e)))
                };
            }
            Ok(Event::Eof) => return Err(GpxError::MissingRoot),
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {} // declaration, comments, whitespace
        }
    }
}

/// Read a GPX document to completion from any byte stream.
pub fn read_gpx<R: std::io::Read>(mut source: R) -> Result<Gpx> {
    let mut xml = String::new();
    source.read_to_string(&mut xml).map_err(GpxError::Io)?;
    parse_gpx(&xml)
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Look up one attribute by local name, unescaped.
fn attr_value(e: &BytesStart<'_>, name: &'static str) -> Result<Option<String>> {
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| GpxError::Xml(e.into()))?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|e| GpxError::Xml(e.into()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn require_attr(
    e: &BytesStart<'_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<String> {
    attr_value(e, attribute)?.ok_or(GpxError::MissingAttribute { element, attribute })
}

fn require_f64_attr(
    e: &BytesStart<'_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<f64> {
    let value = require_attr(e, element, attribute)?;
    value
        .trim()
        .parse()
        .map_err(|_| GpxError::InvalidAttribute {
            element,
            attribute,
            value,
        })
}

fn root_attrs(e: &BytesStart<'_>) -> Result<(String, String)> {
    let version = require_attr(e, "gpx", "version")?;
    let creator = require_attr(e, "gpx", "creator")?;
    Ok((version, creator))
}

/// Consume an element we do not recognize, including all of its children.
fn skip(reader: &mut Reader<&[u8]>, e: &BytesStart<'_>) -> Result<()> {
    reader.read_to_end(e.name()).map_err(GpxError::Xml)?;
    Ok(())
}

fn parse_root<'a>(start: &BytesStart<'a>, reader: &mut Reader<&'a [u8]>) -> Result<Gpx> {
    let (version, creator) = root_attrs(start)?;
    let mut gpx = Gpx::new(version, creator);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"metadata" => gpx.metadata = Some(parse_metadata(reader)?),
                b"wpt" => gpx.waypoints.push(parse_point(&e, "wpt", reader)?),
                b"rte" => gpx.routes.push(parse_route(reader)?),
                b"trk" => gpx.tracks.push(parse_track(reader)?),
                _ => skip(reader, &e)?,
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"metadata" => gpx.metadata = Some(Metadata::default()),
                b"wpt" => gpx.waypoints.push(point_attrs(&e, "wpt")?),
                b"rte" => gpx.routes.push(Route::default()),
                b"trk" => gpx.tracks.push(Track::default()),
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"gpx" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {}
        }
    }

    Ok(gpx)
}

fn parse_metadata(reader: &mut Reader<&[u8]>) -> Result<Metadata> {
    let mut metadata = Metadata::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => metadata.name = Some(read_text_owned(reader, &e)?),
                b"desc" => metadata.desc = Some(read_text_owned(reader, &e)?),
                b"author" => metadata.author = Some(parse_person(reader)?),
                b"copyright" => metadata.copyright = Some(parse_copyright(&e, reader)?),
                b"link" => metadata.links.push(parse_link(&e, reader)?),
                b"time" => metadata.time = Some(parse_time_text(reader, &e)?),
                b"keywords" => metadata.keywords = Some(read_text_owned(reader, &e)?),
                b"bounds" => {
                    metadata.bounds = Some(bounds_attrs(&e)?);
                    skip(reader, &e)?;
                }
                _ => skip(reader, &e)?,
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"author" => metadata.author = Some(Person::default()),
                b"copyright" => metadata.copyright = Some(copyright_attrs(&e)?),
                b"link" => metadata.links.push(link_attrs(&e)?),
                b"bounds" => metadata.bounds = Some(bounds_attrs(&e)?),
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"metadata" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {}
        }
    }

    Ok(metadata)
}

fn parse_person(reader: &mut Reader<&[u8]>) -> Result<Person> {
    let mut person = Person::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => person.name = Some(read_text_owned(reader, &e)?),
                b"email" => {
                    person.email = Some(email_attrs(&e)?);
                    skip(reader, &e)?;
                }
                b"link" => person.link = Some(parse_link(&e, reader)?),
                _ => skip(reader, &e)?,
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"email" => person.email = Some(email_attrs(&e)?),
                b"link" => person.link = Some(link_attrs(&e)?),
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"author" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {}
        }
    }

    Ok(person)
}

fn email_attrs(e: &BytesStart<'_>) -> Result<Email> {
    Ok(Email {
        id: require_attr(e, "email", "id")?,
        domain: require_attr(e, "email", "domain")?,
    })
}

fn copyright_attrs(e: &BytesStart<'_>) -> Result<Copyright> {
    Ok(Copyright {
        author: require_attr(e, "copyright", "author")?,
        year: None,
        license: None,
    })
}

fn parse_copyright<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<Copyright> {
    let mut copyright = copyright_attrs(start)?;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"year" => copyright.year = Some(parse_i32_text(reader, &e, "year")?),
                b"license" => copyright.license = Some(read_text_owned(reader, &e)?),
                _ => skip(reader, &e)?,
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"copyright" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {}
        }
    }

    Ok(copyright)
}

fn bounds_attrs(e: &BytesStart<'_>) -> Result<Bounds> {
    Ok(Bounds {
        minlat: require_f64_attr(e, "bounds", "minlat")?,
        minlon: require_f64_attr(e, "bounds", "minlon")?,
        maxlat: require_f64_attr(e, "bounds", "maxlat")?,
        maxlon: require_f64_attr(e, "bounds", "maxlon")?,
    })
}

fn link_attrs(e: &BytesStart<'_>) -> Result<Link> {
    Ok(Link {
        href: require_attr(e, "link", "href")?,
        text: None,
        link_type: None,
    })
}

fn parse_link<'a>(start: &BytesStart<'a>, reader: &mut Reader<&'a [u8]>) -> Result<Link> {
    let mut link = link_attrs(start)?;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"text" => link.text = Some(read_text_owned(reader, &e)?),
                b"type" => link.link_type = Some(read_text_owned(reader, &e)?),
                _ => skip(reader, &e)?,
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"link" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {}
        }
    }

    Ok(link)
}

/// Required lat/lon attributes of a wpt, rtept, or trkpt start tag.
fn point_attrs(e: &BytesStart<'_>, element: &'static str) -> Result<Waypoint> {
    let lat = require_f64_attr(e, element, "lat")?;
    let lon = require_f64_attr(e, element, "lon")?;
    Ok(Waypoint::new(lat, lon))
}

/// Parse a point element (wpt, rtept, trkpt) and its children.
/// Called after receiving Event::Start for the point element.
fn parse_point<'a>(
    start: &BytesStart<'a>,
    element: &'static str,
    reader: &mut Reader<&'a [u8]>,
) -> Result<Waypoint> {
    let mut point = point_attrs(start, element)?;
    let end_name = start.name().0.to_vec(); // own the end tag name for comparison

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"ele" => point.ele = Some(parse_f64_text(reader, &e, "ele")?),
                b"time" => point.time = Some(parse_time_text(reader, &e)?),
                b"magvar" => point.magvar = Some(parse_f64_text(reader, &e, "magvar")?),
                b"geoidheight" => {
                    point.geoidheight = Some(parse_f64_text(reader, &e, "geoidheight")?)
                }
                b"name" => point.name = Some(read_text_owned(reader, &e)?),
                b"cmt" => point.cmt = Some(read_text_owned(reader, &e)?),
                b"desc" => point.desc = Some(read_text_owned(reader, &e)?),
                b"src" => point.src = Some(read_text_owned(reader, &e)?),
                b"link" => point.links.push(parse_link(&e, reader)?),
                b"sym" => point.sym = Some(read_text_owned(reader, &e)?),
                b"type" => point.point_type = Some(read_text_owned(reader, &e)?),
                b"fix" => point.fix = Some(read_text_owned(reader, &e)?),
                b"sat" => point.sat = Some(parse_u32_text(reader, &e, "sat")?),
                b"hdop" => point.hdop = Some(parse_f64_text(reader, &e, "hdop")?),
                b"vdop" => point.vdop = Some(parse_f64_text(reader, &e, "vdop")?),
                b"pdop" => point.pdop = Some(parse_f64_text(reader, &e, "pdop")?),
                b"ageofdgpsdata" => {
                    point.ageofdgpsdata = Some(parse_f64_text(reader, &e, "ageofdgpsdata")?)
                }
                b"dgpsid" => point.dgpsid = Some(read_text_owned(reader, &e)?),
                _ => skip(reader, &e)?, // extensions and unknown children
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"link" => {
                point.links.push(link_attrs(&e)?);
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {}
        }
    }

    Ok(point)
}

fn parse_route<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Route> {
    let mut route = Route::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => route.name = Some(read_text_owned(reader, &e)?),
                b"cmt" => route.cmt = Some(read_text_owned(reader, &e)?),
                b"desc" => route.desc = Some(read_text_owned(reader, &e)?),
                b"src" => route.src = Some(read_text_owned(reader, &e)?),
                b"link" => route.links.push(parse_link(&e, reader)?),
                b"number" => route.number = Some(parse_u32_text(reader, &e, "number")?),
                b"type" => route.route_type = Some(read_text_owned(reader, &e)?),
                b"rtept" => route.points.push(parse_point(&e, "rtept", reader)?),
                _ => skip(reader, &e)?,
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"rtept" => route.points.push(point_attrs(&e, "rtept")?),
                b"link" => route.links.push(link_attrs(&e)?),
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"rte" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {}
        }
    }

    Ok(route)
}

fn parse_track<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Track> {
    let mut track = Track::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => track.name = Some(read_text_owned(reader, &e)?),
                b"cmt" => track.cmt = Some(read_text_owned(reader, &e)?),
                b"desc" => track.desc = Some(read_text_owned(reader, &e)?),
                b"src" => track.src = Some(read_text_owned(reader, &e)?),
                b"link" => track.links.push(parse_link(&e, reader)?),
                b"number" => track.number = Some(parse_u32_text(reader, &e, "number")?),
                b"type" => track.track_type = Some(read_text_owned(reader, &e)?),
                b"trkseg" => track.segments.push(parse_segment(reader)?),
                _ => skip(reader, &e)?,
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                // an empty segment is still a segment
                b"trkseg" => track.segments.push(TrackSegment::default()),
                b"link" => track.links.push(link_attrs(&e)?),
                _ => {}
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"trk" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {}
        }
    }

    Ok(track)
}

fn parse_segment<'a>(reader: &mut Reader<&'a [u8]>) -> Result<TrackSegment> {
    let mut segment = TrackSegment::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"trkpt" => segment.points.push(parse_point(&e, "trkpt", reader)?),
                _ => skip(reader, &e)?,
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"trkpt" => {
                segment.points.push(point_attrs(&e, "trkpt")?);
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"trkseg" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {}
        }
    }

    Ok(segment)
}

fn parse_f64_text(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    element: &'static str,
) -> Result<f64> {
    let value = read_text_owned(reader, e)?;
    value
        .trim()
        .parse()
        .map_err(|_| GpxError::InvalidElement { element, value })
}

fn parse_u32_text(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    element: &'static str,
) -> Result<u32> {
    let value = read_text_owned(reader, e)?;
    value
        .trim()
        .parse()
        .map_err(|_| GpxError::InvalidElement { element, value })
}

fn parse_i32_text(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    element: &'static str,
) -> Result<i32> {
    let value = read_text_owned(reader, e)?;
    value
        .trim()
        .parse()
        .map_err(|_| GpxError::InvalidElement { element, value })
}

fn parse_time_text(reader: &mut Reader<&[u8]>, e: &BytesStart<'_>) -> Result<OffsetDateTime> {
    let value = read_text_owned(reader, e)?;
    OffsetDateTime::parse(value.trim(), &Rfc3339)
        .map_err(|_| GpxError::InvalidTimestamp { value })
}

/// Read text content of an element as an owned String.
/// Handles regular text, CDATA sections, and entity references (Event::GeneralRef).
fn read_text_owned<'a>(
    reader: &mut Reader<&'a [u8]>,
    start: &BytesStart<'_>,
) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                let raw = std::str::from_utf8(e.as_ref()).unwrap_or_default();
                text.push_str(raw);
            }
            Ok(Event::CData(e)) => {
                let s = std::str::from_utf8(e.as_ref()).unwrap_or_default();
                text.push_str(s);
            }
            Ok(Event::GeneralRef(e)) => {
                // Character references (&#60; &#x3C;) and predefined entities
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    text.push(ch);
                } else {
                    let name = std::str::from_utf8(e.as_ref()).unwrap_or_default();
                    match name {
                        "amp" => text.push('&'),
                        "lt" => text.push('<'),
                        "gt" => text.push('>'),
                        "quot" => text.push('"'),
                        "apos" => text.push('\''),
                        _ => {} // unknown entity, skip
                    }
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxError::Xml(e)),
            _ => {}
        }
    }

    Ok(text)
}
