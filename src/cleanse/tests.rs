#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::path::Path;
    use csv::StringRecord;
    use crate::cleanse::cleaner::{CleanOutcome, RowCleaner};
    use crate::cleanse::config::{CleanseConfig, ConfigOverrides};
    use crate::cleanse::error::CleanseError;
    use crate::cleanse::merger::MergeAccumulator;
    use crate::cleanse::partition::plan_partitions;
    use crate::cleanse::record::{format_gender, CleanedRecord, SourceHeader, SourceRecord};

    const HEADER: [&str; 7] = [
        "id", "login_id", "mail_address", "password", "salt", "birthday_on", "gender",
    ];

    fn header() -> SourceHeader {
        SourceHeader::from_csv_record(&StringRecord::from(HEADER.to_vec()), Path::new("test.csv")).unwrap()
    }

    fn row(id: &str, login: &str, email: &str, password: &str, salt: &str, dob: &str, gender: &str) -> SourceRecord {
        SourceRecord::new(
            [id, login, email, password, salt, dob, gender]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    fn clean(rows: &[SourceRecord]) -> CleanOutcome {
        RowCleaner::new(header()).clean(rows)
    }

    fn cleaned(login: Option<&str>, email: Option<&str>) -> CleanedRecord {
        CleanedRecord {
            login: login.map(str::to_string),
            email: email.map(str::to_string),
            password: Some("pw".to_string()),
            salt: None,
            date_of_birth: None,
            gender: Some(1.0),
        }
    }

    #[test]
    fn test_partitions_cover_source_exactly_once() {
        for total in 0..60 {
            for count in 1..10 {
                let windows = plan_partitions(total, count);
                assert_eq!(windows.len(), count);

                let mut expected_start = 0;
                for (i, window) in windows.iter().enumerate() {
                    assert_eq!(window.index, i);
                    assert_eq!(window.start, expected_start, "gap or overlap at {}/{}", total, count);
                    expected_start = window.end();
                }
                assert_eq!(expected_start, total);
            }
        }
    }

    #[test]
    fn test_last_partition_absorbs_remainder() {
        let windows = plan_partitions(14, 6);
        assert!(windows[..5].iter().all(|w| w.len == 2));
        assert_eq!(windows[5].start, 10);
        assert_eq!(windows[5].len, 4);
    }

    #[test]
    fn test_fewer_rows_than_partitions() {
        let windows = plan_partitions(4, 6);
        assert!(windows[..5].iter().all(|w| w.is_empty() && w.start == 0));
        assert_eq!(windows[5].start, 0);
        assert_eq!(windows[5].len, 4);
    }

    #[test]
    fn test_zero_partitions_yields_nothing() {
        assert!(plan_partitions(10, 0).is_empty());
    }

    #[test]
    fn test_header_missing_column() {
        let record = StringRecord::from(vec!["login_id", "mail_address", "password", "salt", "gender"]);
        let err = SourceHeader::from_csv_record(&record, Path::new("broken.csv")).unwrap_err();
        match err {
            CleanseError::MissingColumn { column, .. } => assert_eq!(column, "birthday_on"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_header_tolerates_bom_and_padding() {
        let record = StringRecord::from(vec![
            "\u{feff}login_id", " mail_address ", "password", "salt", "birthday_on", "gender",
        ]);
        let header = SourceHeader::from_csv_record(&record, Path::new("bom.csv")).unwrap();
        assert_eq!(header.columns[0], "login_id");
        assert_eq!(header.columns[1], "mail_address");
        assert_eq!(header.raw[0], "\u{feff}login_id");
        assert_eq!(header.raw[1], " mail_address ");
    }

    #[test]
    fn test_projection_renames_and_types_fields() {
        let source = row("7", "bob", "bob@mail.com", "pw", "s", "1990-01-01", "2");
        let record = CleanedRecord::from(header().project(&source));

        assert_eq!(record.login.as_deref(), Some("bob"));
        assert_eq!(record.email.as_deref(), Some("bob@mail.com"));
        assert_eq!(record.date_of_birth.as_deref(), Some("1990-01-01"));
        assert_eq!(record.gender, Some(2.0));
        assert_eq!(record.to_csv_fields()[5], "2.0");
    }

    #[test]
    fn test_null_tokens_read_as_missing() {
        let source = row("1", "NULL", "", "NaN", "n/a", "None", "");
        let record = header().project(&source);
        assert!(record.login_id.is_none());
        assert!(record.mail_address.is_none());
        assert!(record.password.is_none());
        assert!(record.salt.is_none());
        assert!(record.birthday_on.is_none());
        assert!(record.gender.is_none());
        assert!(!record.gender_unparsed);
    }

    #[test]
    fn test_non_numeric_gender_is_counted_and_dropped() {
        let outcome = clean(&[row("1", "bob", "bob@mail.com", "pw", "s", "1990", "male")]);
        assert_eq!(outcome.unparsed_gender, 1);
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.accepted[0].gender, None);
    }

    #[test]
    fn test_gender_formatting() {
        assert_eq!(format_gender(1.0), "1.0");
        assert_eq!(format_gender(1.5), "1.5");
        assert_eq!(format_gender(1e16), "1e+16");
        assert_eq!(format_gender(2.5e20), "2.5e+20");
        assert_eq!(format_gender(1e-5), "1e-05");
        assert_eq!(format_gender(-3e-7), "-3e-07");
    }

    #[test]
    fn test_all_essential_missing_goes_to_garbage_once() {
        let outcome = clean(&[row("1", "", "", "", "x", "1990-01-01", "1.0")]);

        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.missing_data, 1);
        assert_eq!(outcome.invalid_emails, 1);
        assert_eq!(outcome.garbage.len(), 1);
        assert_eq!(outcome.garbage[0].salt.as_deref(), Some("x"));
    }

    #[test]
    fn test_login_only_row_is_garbage_through_email_rule() {
        let outcome = clean(&[row("1", "bob", "", "", "x", "1990-01-01", "1")]);

        assert_eq!(outcome.missing_data, 0);
        assert_eq!(outcome.invalid_emails, 1);
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.garbage.len(), 1);
        assert_eq!(outcome.garbage[0].login.as_deref(), Some("bob"));
    }

    #[test]
    fn test_accepted_email_keeps_original_form() {
        let outcome = clean(&[row("1", "bob", " Bob@Mail.COM ", "pw", "", "", "")]);
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.accepted[0].email.as_deref(), Some(" Bob@Mail.COM "));
    }

    #[test]
    fn test_duplicate_identity_keeps_first() {
        let outcome = clean(&[
            row("1", "bob", "bob@mail.com", "first", "", "", "1"),
            row("2", "bob", "bob@mail.com", "second", "", "", "2"),
            row("3", "alice", "bob@mail.com", "third", "", "", "1"),
        ]);

        assert_eq!(outcome.accepted.len(), 2);
        assert_eq!(outcome.duplicates_dropped, 1);
        assert_eq!(outcome.accepted[0].password.as_deref(), Some("first"));
        assert_eq!(outcome.accepted[1].login.as_deref(), Some("alice"));
    }

    #[test]
    fn test_identity_treats_missing_login_as_equal() {
        let outcome = clean(&[
            row("1", "", "bob@mail.com", "a", "", "", ""),
            row("2", "", "bob@mail.com", "b", "", "", ""),
        ]);
        assert_eq!(outcome.accepted.len(), 1);
    }

    #[test]
    fn test_malformed_rows_are_dropped_from_both_sets() {
        let outcome = clean(&[
            row("1", "bob", "bob@mail.com", "pw", ",,,,", "", ""),
            row("2", "", "", "", "broken,,,,row", "", ""),
            row("3", "eve", "eve@mail.com", "pw", "", "", ""),
        ]);

        assert_eq!(outcome.malformed_dropped, 2);
        assert_eq!(outcome.accepted.len(), 1);
        assert!(outcome.garbage.is_empty());
    }

    #[test]
    fn test_identical_garbage_rows_collapse() {
        let outcome = clean(&[
            row("1", "bob", "nope", "pw", "", "", ""),
            row("2", "bob", "nope", "pw", "", "", ""),
        ]);
        assert_eq!(outcome.invalid_emails, 2);
        assert_eq!(outcome.garbage.len(), 1);
    }

    #[test]
    fn test_every_row_lands_in_exactly_one_place() {
        let rows = vec![
            row("1", "bob", "bob@mail.com", "pw", "", "", "1"),
            row("2", "", "", "", "x", "", ""),
            row("3", "carl", "carl@mail", "pw", "", "", ""),
            row("4", "dan", "dan@mail.com", "pw", "a,,,,b", "", ""),
            row("5", "eve", "EVE@MAIL.ORG", "", "", "", "2"),
            row("6", "", "", "pw", "", "", ""),
        ];
        let outcome = clean(&rows);

        let accepted: HashSet<_> = outcome.accepted.iter().map(CleanedRecord::full_key).collect();
        let garbage: HashSet<_> = outcome.garbage.iter().map(CleanedRecord::full_key).collect();
        assert!(accepted.is_disjoint(&garbage));
        assert_eq!(
            outcome.malformed_dropped + outcome.accepted.len() + outcome.garbage.len(),
            rows.len()
        );
        assert_eq!(outcome.accepted.len(), 2);
        assert_eq!(outcome.garbage.len(), 3);
        assert_eq!(outcome.malformed_dropped, 1);
    }

    #[test]
    fn test_merge_dedups_across_partitions_only_at_finish() {
        let mut merged = MergeAccumulator::new();
        let first = CleanOutcome {
            accepted: vec![cleaned(Some("bob"), Some("bob@mail.com"))],
            garbage: vec![cleaned(Some("x"), None)],
            ..Default::default()
        };
        let second = CleanOutcome {
            accepted: vec![
                cleaned(Some("bob"), Some("bob@mail.com")),
                cleaned(Some("eve"), Some("eve@mail.com")),
            ],
            garbage: vec![cleaned(Some("x"), None)],
            ..Default::default()
        };

        merged.absorb(first);
        merged.absorb(second);
        assert_eq!(merged.cleaned_len(), 3);
        assert_eq!(merged.garbage_len(), 2);

        let sets = merged.finish();
        assert_eq!(sets.cleaned.len(), 2);
        assert_eq!(sets.garbage.len(), 1);
        assert_eq!(sets.cleaned_duplicates_removed, 1);
        assert_eq!(sets.garbage_duplicates_removed, 1);
        assert_eq!(sets.cleaned[1].login.as_deref(), Some("eve"));
    }

    #[test]
    fn test_merge_keeps_rows_differing_outside_identity() {
        let mut merged = MergeAccumulator::new();
        let mut other_password = cleaned(Some("bob"), Some("bob@mail.com"));
        other_password.password = Some("changed".to_string());

        merged.absorb(CleanOutcome {
            accepted: vec![cleaned(Some("bob"), Some("bob@mail.com"))],
            ..Default::default()
        });
        merged.absorb(CleanOutcome {
            accepted: vec![other_password],
            ..Default::default()
        });

        assert_eq!(merged.finish().cleaned.len(), 2);
    }

    #[test]
    fn test_overrides_apply_before_validation() {
        let mut from_file = CleanseConfig::default();
        from_file.partition_count = 0;
        assert!(from_file.clone().with_overrides(ConfigOverrides::default()).is_err());

        let overrides = ConfigOverrides {
            partition_count: Some(6),
            source_path: Some("export.csv".into()),
            verbose: true,
            ..ConfigOverrides::default()
        };
        let config = from_file.with_overrides(overrides).unwrap();
        assert_eq!(config.partition_count, 6);
        assert_eq!(config.source_path, Path::new("export.csv"));
        assert!(config.verbose);
        assert_eq!(config.logging.verbosity, "verbose");
    }

    #[test]
    fn test_config_validation() {
        let mut config = CleanseConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.partition_count, 6);

        config.partition_count = 0;
        assert!(config.validate().is_err());

        config.partition_count = 6;
        config.io_buffer_size_kb = 1;
        assert!(config.validate().is_err());

        config.io_buffer_size_kb = 64;
        config.input_delimiter = '"';
        assert!(config.validate().is_err());

        config.input_delimiter = '§';
        assert!(config.validate().is_err());

        config.input_delimiter = ';';
        config.merged_garbage_file = config.merged_cleaned_file.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trip_with_defaults_filled() {
        let partial = r#"{ "source_path": "export.csv", "partition_count": 3 }"#;
        let config: CleanseConfig = serde_json::from_str(partial).unwrap();

        assert_eq!(config.source_path, Path::new("export.csv"));
        assert_eq!(config.partition_count, 3);
        assert_eq!(config.input_delimiter, ';');
        assert_eq!(config.output_delimiter, ',');
        assert_eq!(config.logging.verbosity, "normal");
    }
}
