use time::OffsetDateTime;

/// A GPX document: a metadata header followed by waypoints, routes, and tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct Gpx {
    pub version: String,
    pub creator: String,
    pub metadata: Option<Metadata>,
    pub waypoints: Vec<Waypoint>,
    pub routes: Vec<Route>,
    pub tracks: Vec<Track>,
}

impl Gpx {
    /// Build the minimal valid document: required root attributes, nothing else.
    pub fn new(version: impl Into<String>, creator: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            creator: creator.into(),
            metadata: None,
            waypoints: Vec::new(),
            routes: Vec::new(),
            tracks: Vec::new(),
        }
    }
}

/// File-level information: name, author, copyright, time of creation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metadata {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub author: Option<Person>,
    pub copyright: Option<Copyright>,
    pub links: Vec<Link>,
    pub time: Option<OffsetDateTime>,
    pub keywords: Option<String>,
    pub bounds: Option<Bounds>,
}

/// A person or organization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Person {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub link: Option<Link>,
}

/// An email address, stored in two parts and never joined with "@".
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub id: String,
    pub domain: String,
}

/// A link to an external resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub href: String,
    pub text: Option<String>,
    pub link_type: Option<String>,
}

/// Copyright holder and license governing use of the file.
#[derive(Debug, Clone, PartialEq)]
pub struct Copyright {
    pub author: String,
    pub year: Option<i32>,
    pub license: Option<String>,
}

/// Two lat/lon pairs defining the extent of an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub minlat: f64,
    pub minlon: f64,
    pub maxlat: f64,
    pub maxlon: f64,
}

/// A single point, shared by wpt, rtept, and trkpt.
///
/// Every field past lat/lon is optional; `None` means the element was absent,
/// which is distinct from any present value (a missing `<ele>` is not
/// `<ele>0</ele>`).
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
    /// Elevation in meters.
    pub ele: Option<f64>,
    pub time: Option<OffsetDateTime>,
    /// Magnetic variation in degrees.
    pub magvar: Option<f64>,
    /// Height of geoid above the WGS84 ellipsoid, in meters.
    pub geoidheight: Option<f64>,
    pub name: Option<String>,
    pub cmt: Option<String>,
    pub desc: Option<String>,
    pub src: Option<String>,
    pub links: Vec<Link>,
    pub sym: Option<String>,
    pub point_type: Option<String>,
    /// Fix kind: none, 2d, 3d, dgps, or pps.
    pub fix: Option<String>,
    /// Number of satellites used to compute the fix.
    pub sat: Option<u32>,
    pub hdop: Option<f64>,
    pub vdop: Option<f64>,
    pub pdop: Option<f64>,
    /// Seconds since the last DGPS update.
    pub ageofdgpsdata: Option<f64>,
    /// Id of the DGPS station used in differential correction.
    pub dgpsid: Option<String>,
}

impl Waypoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ele: None,
            time: None,
            magvar: None,
            geoidheight: None,
            name: None,
            cmt: None,
            desc: None,
            src: None,
            links: Vec::new(),
            sym: None,
            point_type: None,
            fix: None,
            sat: None,
            hdop: None,
            vdop: None,
            pdop: None,
            ageofdgpsdata: None,
            dgpsid: None,
        }
    }
}

/// An ordered list of waypoints leading to a destination (rte).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Route {
    pub name: Option<String>,
    pub cmt: Option<String>,
    pub desc: Option<String>,
    pub src: Option<String>,
    pub links: Vec<Link>,
    pub number: Option<u32>,
    pub route_type: Option<String>,
    pub points: Vec<Waypoint>,
}

/// One logical trip (trk), an ordered list of segments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Track {
    pub name: Option<String>,
    pub cmt: Option<String>,
    pub desc: Option<String>,
    pub src: Option<String>,
    pub links: Vec<Link>,
    pub number: Option<u32>,
    pub track_type: Option<String>,
    pub segments: Vec<TrackSegment>,
}

/// A contiguous run of track points with no reception gap (trkseg).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackSegment {
    pub points: Vec<Waypoint>,
}
