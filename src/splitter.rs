//! Partition a document into derived documents that share its metadata.
//!
//! Each derived document owns its data: the source is never mutated and
//! no sub-tree is shared between siblings.

use crate::model::Gpx;

/// Derive a document that keeps only the waypoints: same root attributes and
/// metadata, routes and tracks cleared.
pub fn waypoints_only(gpx: &Gpx) -> Gpx {
    Gpx {
        version: gpx.version.clone(),
        creator: gpx.creator.clone(),
        metadata: gpx.metadata.clone(),
        waypoints: gpx.waypoints.clone(),
        routes: Vec::new(),
        tracks: Vec::new(),
    }
}

/// Derive one document per track, each holding exactly that track and
/// nothing else besides the shared metadata. Track order is preserved.
pub fn per_track(gpx: &Gpx) -> Vec<Gpx> {
    gpx.tracks
        .iter()
        .map(|track| Gpx {
            version: gpx.version.clone(),
            creator: gpx.creator.clone(),
            metadata: gpx.metadata.clone(),
            waypoints: Vec::new(),
            routes: Vec::new(),
            tracks: vec![track.clone()],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Metadata, Route, Track, TrackSegment, Waypoint};

    fn sample() -> Gpx {
        let mut gpx = Gpx::new("1.1", "test");
        gpx.metadata = Some(Metadata {
            name: Some("sample".to_string()),
            ..Default::default()
        });
        gpx.waypoints.push(Waypoint::new(1.0, 2.0));
        gpx.waypoints.push(Waypoint::new(3.0, 4.0));
        gpx.routes.push(Route {
            name: Some("a route".to_string()),
            ..Default::default()
        });
        for name in ["one", "two", "three"] {
            gpx.tracks.push(Track {
                name: Some(name.to_string()),
                segments: vec![TrackSegment {
                    points: vec![Waypoint::new(5.0, 6.0)],
                }],
                ..Default::default()
            });
        }
        gpx
    }

    #[test]
    fn test_partition() {
        let gpx = sample();
        let wpt_doc = waypoints_only(&gpx);
        let track_docs = per_track(&gpx);

        assert_eq!(track_docs.len(), 3);

        assert_eq!(wpt_doc.waypoints.len(), 2);
        assert!(wpt_doc.routes.is_empty());
        assert!(wpt_doc.tracks.is_empty());

        for (i, doc) in track_docs.iter().enumerate() {
            assert!(doc.waypoints.is_empty());
            assert!(doc.routes.is_empty());
            assert_eq!(doc.tracks.len(), 1);
            assert_eq!(doc.tracks[0], gpx.tracks[i]);
        }

        // metadata identical by value across all derived documents
        for doc in track_docs.iter().chain(std::iter::once(&wpt_doc)) {
            assert_eq!(doc.metadata, gpx.metadata);
            assert_eq!(doc.version, gpx.version);
            assert_eq!(doc.creator, gpx.creator);
        }
    }

    #[test]
    fn test_source_untouched() {
        let gpx = sample();
        let before = gpx.clone();
        let _ = waypoints_only(&gpx);
        let _ = per_track(&gpx);
        assert_eq!(gpx, before);
    }

    #[test]
    fn test_no_tracks_yields_no_documents() {
        let gpx = Gpx::new("1.1", "test");
        assert!(per_track(&gpx).is_empty());
    }
}
