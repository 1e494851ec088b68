//! Query views
//!
//! Pure, read-only derivations over a freshly loaded collection; nothing is
//! cached across calls. Date logic is lexical comparison on ISO-8601 strings,
//! which matches chronological order only because the stored format is
//! zero-padded UTC - callers must preserve that format.

/// Default window for the upcoming view.
pub const DEFAULT_UPCOMING_LIMIT: usize = 10;

/// Items whose time field falls inside the inclusive `[from, to]` range.
pub fn in_range<'a, T>(
    items: &'a [T],
    from: Option<&str>,
    to: Option<&str>,
    time: impl Fn(&T) -> &str,
) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| {
            let t = time(item);
            from.map_or(true, |f| t >= f) && to.map_or(true, |u| t <= u)
        })
        .collect()
}

/// Items whose time field starts with the date portion of `now`.
///
/// `now` is UTC, so callers supplying local-zone timestamps will see
/// mismatches at day boundaries; that is a known limitation of the view.
pub fn today<'a, T>(items: &'a [T], now: &str, time: impl Fn(&T) -> &str) -> Vec<&'a T> {
    let date = now.get(..10).unwrap_or(now);
    items
        .iter()
        .filter(|item| time(item).starts_with(date))
        .collect()
}

/// Up to `limit` items at/after `now`, ascending by time field. The sort is
/// stable, so equal timestamps keep the collection's insertion order.
pub fn upcoming<'a, T>(
    items: &'a [T],
    now: &str,
    limit: usize,
    time: impl Fn(&T) -> &str,
) -> Vec<&'a T> {
    let mut hits: Vec<&T> = items.iter().filter(|item| time(item) >= now).collect();
    hits.sort_by(|a, b| time(a).cmp(time(b)));
    hits.truncate(limit);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Timed {
        name: &'static str,
        at: &'static str,
    }

    fn timed(name: &'static str, at: &'static str) -> Timed {
        Timed { name, at }
    }

    #[test]
    fn test_upcoming_sorts_and_truncates() {
        let items = vec![
            timed("t3", "2026-08-09T10:00:00.000Z"),
            timed("t1", "2026-08-07T10:00:00.000Z"),
            timed("t2", "2026-08-08T10:00:00.000Z"),
        ];

        let hits = upcoming(&items, "2026-08-07T00:00:00.000Z", 2, |t| t.at);
        let names: Vec<&str> = hits.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["t1", "t2"]);
    }

    #[test]
    fn test_upcoming_excludes_past_items() {
        let items = vec![
            timed("past", "2026-08-06T10:00:00.000Z"),
            timed("future", "2026-08-08T10:00:00.000Z"),
        ];

        let hits = upcoming(&items, "2026-08-07T00:00:00.000Z", 10, |t| t.at);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "future");
    }

    #[test]
    fn test_upcoming_ties_keep_insertion_order() {
        let items = vec![
            timed("first", "2026-08-08T10:00:00.000Z"),
            timed("second", "2026-08-08T10:00:00.000Z"),
        ];

        let hits = upcoming(&items, "2026-08-07T00:00:00.000Z", 10, |t| t.at);
        let names: Vec<&str> = hits.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let items = vec![
            timed("lo", "2026-08-07T00:00:00.000Z"),
            timed("mid", "2026-08-08T00:00:00.000Z"),
            timed("hi", "2026-08-09T00:00:00.000Z"),
        ];

        let hits = in_range(
            &items,
            Some("2026-08-07T00:00:00.000Z"),
            Some("2026-08-09T00:00:00.000Z"),
            |t| t.at,
        );
        assert_eq!(hits.len(), 3);

        let open_ended = in_range(&items, Some("2026-08-08T00:00:00.000Z"), None, |t| t.at);
        assert_eq!(open_ended.len(), 2);
    }

    #[test]
    fn test_today_is_a_date_prefix_match() {
        let items = vec![
            timed("yes", "2026-08-07T23:59:00.000Z"),
            timed("no", "2026-08-08T00:01:00.000Z"),
        ];

        let hits = today(&items, "2026-08-07T12:00:00.000Z", |t| t.at);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "yes");
    }
}
