use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::GpxError;
use crate::gpx_types::*;

type Result<T> = std::result::Result<T, GpxError>;

/// Parse a GPX XML string into a GpxDocument.
///
/// Elements are matched by local name, so both namespaced GPX 1.1 and bare
/// GPX 1.0 files are accepted. Points without usable `lat`/`lon` are dropped,
/// unknown elements (including `<extensions>`) are skipped.
pub fn parse_gpx(xml: &str) -> Result<GpxDocument> {
    let mut reader = GpxReader::new(xml);
    let mut doc = GpxDocument::default();
    let mut has_root = false;

    loop {
        match reader.next()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"gpx" => has_root = true,
                b"wpt" => doc.waypoints.extend(reader.point(&e)?),
                b"rte" => doc.routes.push(reader.route()?),
                b"trk" => doc.tracks.push(reader.track()?),
                _ => reader.skip(&e)?,
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"gpx" => has_root = true,
                b"wpt" => doc.waypoints.extend(empty_point(&e)),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if has_root {
        Ok(doc)
    } else {
        Err(GpxError::NotGpx)
    }
}

struct GpxReader<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> GpxReader<'a> {
    fn new(xml: &'a str) -> Self {
        Self {
            reader: Reader::from_str(xml),
        }
    }

    fn next(&mut self) -> Result<Event<'a>> {
        Ok(self.reader.read_event()?)
    }

    /// Consume everything up to and including the matching end tag.
    fn skip(&mut self, start: &BytesStart<'a>) -> Result<()> {
        self.reader.read_to_end(start.name())?;
        Ok(())
    }

    /// Parse a point element opened with `start`. Returns `None` (and skips
    /// the element) when its coordinates are missing or unparsable.
    fn point(&mut self, start: &BytesStart<'a>) -> Result<Option<GpxPoint>> {
        let Some(mut point) = empty_point(start) else {
            self.skip(start)?;
            return Ok(None);
        };

        loop {
            match self.next()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"ele" => point.ele = finite(&self.text(&e)?),
                    b"time" => point.time = Some(self.text(&e)?),
                    b"name" => point.name = Some(self.text(&e)?),
                    _ => self.skip(&e)?,
                },
                Event::End(e) if e.name() == start.name() => break,
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Some(point))
    }

    fn route(&mut self) -> Result<GpxPath> {
        let mut route = GpxPath::default();

        loop {
            match self.next()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"rtept" => route.points.extend(self.point(&e)?),
                    _ => {
                        if !self.path_info(&mut route.info, &e)? {
                            self.skip(&e)?;
                        }
                    }
                },
                Event::Empty(e) if e.local_name().as_ref() == b"rtept" => {
                    route.points.extend(empty_point(&e));
                }
                Event::End(e) if e.local_name().as_ref() == b"rte" => break,
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(route)
    }

    fn track(&mut self) -> Result<GpxTrack> {
        let mut track = GpxTrack::default();

        loop {
            match self.next()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"trkseg" => {
                        let segment = self.segment()?;
                        if !segment.is_empty() {
                            track.segments.push(segment);
                        }
                    }
                    _ => {
                        if !self.path_info(&mut track.info, &e)? {
                            self.skip(&e)?;
                        }
                    }
                },
                Event::End(e) if e.local_name().as_ref() == b"trk" => break,
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(track)
    }

    fn segment(&mut self) -> Result<Vec<GpxPoint>> {
        let mut points = Vec::new();

        loop {
            match self.next()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"trkpt" => points.extend(self.point(&e)?),
                    _ => self.skip(&e)?,
                },
                Event::Empty(e) if e.local_name().as_ref() == b"trkpt" => {
                    points.extend(empty_point(&e));
                }
                Event::End(e) if e.local_name().as_ref() == b"trkseg" => break,
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(points)
    }

    /// Fill a name/desc/type field of a route or track. Returns false when
    /// `start` is not one of them, leaving the element unread.
    fn path_info(&mut self, info: &mut PathInfo, start: &BytesStart<'a>) -> Result<bool> {
        let slot = match start.local_name().as_ref() {
            b"name" => &mut info.name,
            b"desc" => &mut info.desc,
            b"type" => &mut info.kind,
            _ => return Ok(false),
        };
        *slot = Some(self.text(start)?);
        Ok(true)
    }

    /// Read the text content of an element, trimmed.
    /// Handles CDATA sections and character/entity references.
    fn text(&mut self, start: &BytesStart<'a>) -> Result<String> {
        let mut text = String::new();

        loop {
            match self.next()? {
                Event::Text(e) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
                Event::CData(e) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
                Event::GeneralRef(e) => {
                    if let Ok(Some(ch)) = e.resolve_char_ref() {
                        text.push(ch);
                    } else if let Some(ch) = predefined_entity(e.as_ref()) {
                        text.push(ch);
                    }
                }
                Event::Start(e) => self.skip(&e)?,
                Event::End(e) if e.name() == start.name() => break,
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(text.trim().to_string())
    }
}

/// Build a point from the `lat`/`lon` attributes alone.
fn empty_point(e: &BytesStart<'_>) -> Option<GpxPoint> {
    let lat = float_attribute(e, b"lat")?;
    let lon = float_attribute(e, b"lon")?;
    Some(GpxPoint::new(lat, lon))
}

fn float_attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<f64> {
    let attr = e.try_get_attribute(key).ok().flatten()?;
    finite(std::str::from_utf8(&attr.value).ok()?)
}

/// `NaN` and `inf` parse as floats but are never usable measurements.
fn finite(text: &str) -> Option<f64> {
    text.trim().parse().ok().filter(|v: &f64| v.is_finite())
}

fn predefined_entity(name: &[u8]) -> Option<char> {
    match name {
        b"amp" => Some('&'),
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        _ => None,
    }
}
