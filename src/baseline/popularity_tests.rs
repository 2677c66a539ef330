// Popularity aggregation and snapshot indexes

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::catalog::{PlaylistTable, TrackTable};
    use crate::models::{PlaylistRow, Track, TrackSlot};

    fn slot(uri: &str, album: &str, artist: &str) -> Option<TrackSlot> {
        Some(TrackSlot {
            track_uri: uri.to_string(),
            album_uri: album.to_string(),
            artist_uri: artist.to_string(),
        })
    }

    fn playlist(pid: u64, slots: Vec<Option<TrackSlot>>) -> PlaylistRow {
        PlaylistRow {
            pid,
            name: "mix".to_string(),
            description: String::new(),
            modified_at: 0,
            num_artists: 0,
            num_albums: 0,
            num_tracks: slots.iter().flatten().count() as u32,
            num_followers: 0,
            num_edits: 0,
            duration_ms: 0,
            collaborative: false,
            slots,
        }
    }

    fn track(uri: &str, album: &str, artist: &str) -> Track {
        Track {
            uri: uri.to_string(),
            album_uri: album.to_string(),
            artist_uri: artist.to_string(),
            ..Default::default()
        }
    }

    fn sample_playlists() -> PlaylistTable {
        PlaylistTable::from_rows(vec![
            playlist(
                0,
                vec![
                    slot("t1", "al1", "ar1"),
                    slot("t2", "al1", "ar1"),
                    slot("t3", "al2", "ar2"),
                    None,
                ],
            ),
            playlist(1, vec![slot("t1", "al1", "ar1"), slot("t3", "al2", "ar2"), None, None]),
            playlist(2, vec![slot("t1", "al1", "ar1"), None, None, None]),
        ])
        .unwrap()
    }

    fn sample_tracks() -> TrackTable {
        let mut table = TrackTable::new();
        table.insert(track("t4", "al2", "ar2"));
        table.insert(track("t3", "al2", "ar2"));
        table.insert(track("t2", "al1", "ar1"));
        table.insert(track("t1", "al1", "ar1"));
        table
    }

    #[test]
    fn test_counts_track_uris_only() {
        let counts = PopularityCounts::from_playlists(&sample_playlists());

        assert_eq!(counts.get("t1"), 3);
        assert_eq!(counts.get("t2"), 1);
        assert_eq!(counts.get("t3"), 2);
        assert_eq!(counts.get("al1"), 0);
        assert_eq!(counts.get("ar2"), 0);
        assert_eq!(counts.get("0"), 0);
        assert_eq!(counts.len(), 3);
    }

    #[test]
    fn test_total_matches_populated_slots() {
        let playlists = sample_playlists();
        let counts = PopularityCounts::from_playlists(&playlists);

        let slots = playlists.len() * playlists.slot_width();
        assert_eq!(counts.total() as usize, slots - playlists.sentinel_count());
        assert_eq!(counts.iter().map(|(_, c)| c as usize).sum::<usize>(), 6);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let playlists = sample_playlists();
        assert_eq!(
            PopularityCounts::from_playlists(&playlists),
            PopularityCounts::from_playlists(&playlists)
        );
    }

    #[test]
    fn test_empty_playlist_table_counts_nothing() {
        let counts = PopularityCounts::from_playlists(&PlaylistTable::new(15));
        assert!(counts.is_empty());
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_tracks_missing_from_playlists_default_to_zero() {
        let snapshot = CatalogSnapshot::compute(&sample_tracks(), &sample_playlists());

        assert_eq!(snapshot.popularity("t4"), Some(0));
        assert_eq!(snapshot.popularity("t1"), Some(3));
        assert_eq!(snapshot.popularity("missing"), None);
    }

    #[test]
    fn test_ranked_order_breaks_ties_by_load_order() {
        let mut tracks = sample_tracks();
        tracks.insert(track("t5", "al3", "ar3"));
        let snapshot = CatalogSnapshot::compute(&tracks, &sample_playlists());

        let order: Vec<&str> = snapshot.ranked().map(|t| t.uri.as_str()).collect();
        assert_eq!(order, vec!["t1", "t3", "t2", "t4", "t5"]);
    }

    #[test]
    fn test_groups_are_ranked_by_popularity() {
        let snapshot = CatalogSnapshot::compute(&sample_tracks(), &sample_playlists());

        let album: Vec<&str> = snapshot
            .group(GroupBy::Album, "al2")
            .iter()
            .map(|t| t.uri.as_str())
            .collect();
        assert_eq!(album, vec!["t3", "t4"]);

        let artist: Vec<&str> = snapshot
            .group(GroupBy::Artist, "ar1")
            .iter()
            .map(|t| t.uri.as_str())
            .collect();
        assert_eq!(artist, vec!["t1", "t2"]);

        assert!(snapshot.group(GroupBy::Artist, "nobody").is_empty());
    }

    #[test]
    fn test_snapshot_does_not_touch_source_table() {
        let tracks = sample_tracks();
        let snapshot = CatalogSnapshot::compute(&tracks, &sample_playlists());

        assert_eq!(tracks.get("t1").unwrap().popularity, 0);
        assert_eq!(snapshot.tracks().get("t1").unwrap().popularity, 3);
    }

    #[test]
    fn test_feature_names_round_trip() {
        for feature in TrackFeature::ALL {
            assert_eq!(feature.as_str().parse::<TrackFeature>(), Ok(feature));
        }
        assert!("Track_Name".parse::<TrackFeature>().is_err());
    }

    #[test]
    fn test_parse_max_draws() {
        assert_eq!(RecommenderSettings::parse_max_draws("500"), Ok(Some(500)));
        assert_eq!(RecommenderSettings::parse_max_draws("Unlimited"), Ok(None));
        assert!(RecommenderSettings::parse_max_draws("lots").is_err());
    }
}
