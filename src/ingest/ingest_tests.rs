// Slice parsing, flattening and CSV output

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::catalog::{read_playlist_csv, read_track_csv};
    use crate::models::SLOT_SENTINEL;
    use std::fs;
    use std::path::Path;

    fn track_json(n: u32) -> String {
        format!(
            r#"{{
                "pos": {n},
                "artist_name": "Artist {n}",
                "track_uri": "spotify:track:{n}",
                "artist_uri": "spotify:artist:{n}",
                "track_name": "Track {n}",
                "album_uri": "spotify:album:{n}",
                "duration_ms": {duration},
                "album_name": "Album {n}"
            }}"#,
            duration = 180_000 + n
        )
    }

    fn playlist_json(pid: u64, track_count: u32, description: Option<&str>) -> String {
        let tracks: Vec<String> = (0..track_count).map(track_json).collect();
        let description = description
            .map(|d| format!(r#""description": "{d}","#))
            .unwrap_or_default();
        format!(
            r#"{{
                "name": "Playlist {pid}",
                "collaborative": "false",
                "pid": {pid},
                {description}
                "modified_at": 1493424000,
                "num_tracks": {track_count},
                "num_albums": {track_count},
                "num_followers": 1,
                "tracks": [{tracks}],
                "num_edits": 2,
                "duration_ms": 360000,
                "num_artists": {track_count}
            }}"#,
            tracks = tracks.join(",")
        )
    }

    fn slice_json(playlists: &[String]) -> String {
        format!(
            r#"{{"info": {{"generated_on": "2017-12-03 08:41:42.057563", "slice": "0-999"}}, "playlists": [{}]}}"#,
            playlists.join(",")
        )
    }

    #[test]
    fn test_parse_slice_defaults_missing_description() {
        let json = slice_json(&[playlist_json(7, 1, None), playlist_json(8, 1, Some("road trip"))]);
        let slice = parse_slice(&json).unwrap();

        assert_eq!(slice.playlists.len(), 2);
        assert_eq!(slice.playlists[0].description, "");
        assert_eq!(slice.playlists[1].description, "road trip");
        assert!(!slice.playlists[0].collaborative);
    }

    #[test]
    fn test_parse_slice_accepts_boolean_collaborative() {
        let json = slice_json(&[playlist_json(1, 1, None).replace(r#""false""#, "true")]);
        let slice = parse_slice(&json).unwrap();
        assert!(slice.playlists[0].collaborative);
    }

    #[test]
    fn test_missing_required_field_is_fatal() {
        let json = slice_json(&[playlist_json(3, 1, None).replace(r#""num_edits": 2,"#, "")]);
        let error = parse_slice(&json).unwrap_err();
        assert!(error.to_string().contains("num_edits"));
    }

    #[test]
    fn test_short_playlist_is_padded_with_sentinel() {
        let slice = parse_slice(&slice_json(&[playlist_json(42, 2, None)])).unwrap();
        let flattened = flatten_slice(&slice, 5);

        let row = &flattened.playlists[0];
        assert_eq!(row.slots.len(), 5);
        assert_eq!(row.slots[0].as_ref().unwrap().track_uri, "spotify:track:0");
        assert_eq!(row.slots[1].as_ref().unwrap().artist_uri, "spotify:artist:1");
        assert!(row.slots[2..].iter().all(Option::is_none));

        let mut out = Vec::new();
        write_playlists(&mut out, &flattened.playlists, "test").unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        let header: Vec<&str> = lines.next().unwrap().split(',').collect();
        let values: Vec<&str> = lines.next().unwrap().split(',').collect();

        let column = |name: &str| header.iter().position(|h| *h == name).unwrap();
        assert_eq!(values[column("track_1_uri")], "spotify:track:0");
        assert_eq!(values[column("track_2_album_uri")], "spotify:album:1");
        for k in 3..=5 {
            for name in crate::models::slot_columns(k) {
                assert_eq!(values[column(&name)], SLOT_SENTINEL);
            }
        }
    }

    #[test]
    fn test_tracks_past_slot_width_still_get_track_rows() {
        let slice = parse_slice(&slice_json(&[playlist_json(9, 4, None)])).unwrap();
        let flattened = flatten_slice(&slice, 2);

        assert_eq!(flattened.playlists[0].slots.len(), 2);
        assert!(flattened.playlists[0].slots.iter().all(Option::is_some));
        assert_eq!(flattened.tracks.len(), 4);
        assert!(flattened.tracks.iter().all(|t| t.pid == 9));
        assert_eq!(flattened.tracks[3].pos, 3);
        assert_eq!(flattened.tracks[3].duration_ms, 180_003);
    }

    #[test]
    fn test_written_tables_load_back() {
        let slice = parse_slice(&slice_json(&[
            playlist_json(0, 3, Some("with, comma")),
            playlist_json(1, 1, None),
        ]))
        .unwrap();
        let flattened = flatten_slice(&slice, 3);

        let mut playlists_csv = Vec::new();
        write_playlists(&mut playlists_csv, &flattened.playlists, "playlists").unwrap();
        let mut tracks_csv = Vec::new();
        write_tracks(&mut tracks_csv, &flattened.tracks, "tracks").unwrap();

        assert_eq!(read_playlist_csv(playlists_csv.as_slice()).unwrap(), flattened.playlists);
        assert_eq!(read_track_csv(tracks_csv.as_slice()).unwrap(), flattened.tracks);
    }

    #[test]
    fn test_empty_tables_are_not_written() {
        let mut out = Vec::new();
        assert!(matches!(
            write_playlists(&mut out, &[], "mpd_playlists_x.csv"),
            Err(IngestError::EmptyTable(label)) if label == "mpd_playlists_x.csv"
        ));
        assert!(matches!(write_tracks(&mut out, &[], "t"), Err(IngestError::EmptyTable(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_slice_suffix() {
        assert_eq!(slice_suffix(Path::new("data/mpd.slice.0-999.json")), Some("0-999".to_string()));
        assert_eq!(slice_suffix(Path::new("challenge.json")), Some("challenge".to_string()));
        assert_eq!(slice_suffix(Path::new("README")), None);
    }

    #[test]
    fn test_process_mpd_data_reports_each_slice() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        fs::write(
            input.path().join("mpd.slice.0-999.json"),
            slice_json(&[playlist_json(0, 2, None), playlist_json(1, 3, None)]),
        )
        .unwrap();
        fs::write(input.path().join("mpd.slice.1000-1999.json"), "{\"playlists\": [{\"pid\": 1}]}").unwrap();
        fs::write(input.path().join("mpd.slice.2000-2999.json"), slice_json(&[])).unwrap();
        fs::write(input.path().join("notes.txt"), "not a slice").unwrap();

        let layout = OutputLayout::new(output.path());
        let report = process_mpd_data(input.path(), &layout, 5).unwrap();

        assert!(!report.is_success());
        assert_eq!(report.written.len(), 1);
        assert_eq!(report.written[0].suffix, "0-999");
        assert_eq!(report.written[0].playlist_rows, 2);
        assert_eq!(report.written[0].track_rows, 5);
        assert!(layout.playlist_path("0-999").is_file());
        assert!(layout.track_path("0-999").is_file());

        assert_eq!(report.failed.len(), 2);
        assert!(matches!(report.failed[0].1, IngestError::MalformedSlice { .. }));
        assert!(matches!(report.failed[1].1, IngestError::EmptyTable(_)));
        assert!(!layout.playlist_path("2000-2999").exists());
    }

    #[test]
    fn test_failed_track_file_leaves_no_playlist_file() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let slice = input.path().join("mpd.slice.0-999.json");
        fs::write(&slice, slice_json(&[playlist_json(0, 2, None)])).unwrap();

        let layout = OutputLayout::new(output.path());
        layout.ensure_dirs().unwrap();
        // A directory where the track file should go makes its creation fail
        fs::create_dir(layout.track_path("0-999")).unwrap();

        let result = process_slice(&slice, &layout, 5);

        assert!(matches!(result, Err(IngestError::Io { .. })));
        assert!(!layout.playlist_path("0-999").exists());
        assert!(layout.track_path("0-999").is_dir());
    }

    #[test]
    fn test_clear_removes_previous_output() {
        let output = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(output.path());
        layout.ensure_dirs().unwrap();
        fs::write(layout.playlist_path("old"), "pid\n1\n").unwrap();
        fs::write(layout.track_path("old"), "pid\n1\n").unwrap();

        assert_eq!(layout.clear().unwrap(), 2);
        assert!(!layout.playlist_path("old").exists());
        assert_eq!(layout.clear().unwrap(), 0);
    }
}
