//! Snapshot timestamps embedded in queue entry names
//!
//! AFL-style fuzzers name queue entries like
//! `id:000004,src:000001,time:1234,execs:5678,op:havoc,rep:2`, where the
//! `time` field is the number of milliseconds since the campaign started.

/// Marker preceding the millisecond timestamp in a snapshot name.
pub const TIME_MARKER: &str = ",time:";

/// Delimiter terminating the millisecond timestamp.
const TIME_TERMINATOR: char = ',';

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TimestampError {
    #[display("no `,time:` marker in snapshot name {name:?}")]
    Missing { name: String },
    #[display("malformed `,time:` token in snapshot name {name:?}")]
    Malformed { name: String },
}

/// Extracts the embedded timestamp from a snapshot name, in seconds.
///
/// The first `,time:<digits>,` token is used.
///
/// # Examples
///
/// ```
/// use fuzzstat_analysis::timestamp::parse_time;
///
/// let secs = parse_time("id:000001,src:000000,time:1234,execs:56").unwrap();
/// assert_eq!(secs, 1.234);
/// assert!(parse_time("id:000000,orig:seed").is_err());
/// ```
pub fn parse_time(name: &str) -> Result<f64, TimestampError> {
    if !name.contains(TIME_MARKER) {
        return Err(TimestampError::Missing {
            name: name.to_owned(),
        });
    }

    name.match_indices(TIME_MARKER)
        .find_map(|(pos, _)| parse_millis(&name[pos + TIME_MARKER.len()..]))
        .map(millis_to_secs)
        .ok_or_else(|| TimestampError::Malformed {
            name: name.to_owned(),
        })
}

/// Returns the snapshot timestamp in seconds, or `0.0` if the name carries no
/// timestamp marker.
///
/// Seed entries copied from the initial corpus carry no `time` field and are
/// treated as present from the start of the campaign. A name that has the
/// marker but no valid number after it is still an error.
pub fn snapshot_time(name: &str) -> Result<f64, TimestampError> {
    if name.contains(TIME_MARKER) {
        parse_time(name)
    } else {
        Ok(0.0)
    }
}

/// Parses `<digits>,` at the start of `rest`.
///
/// Digit runs of any length are accepted; values beyond `u64` lose precision
/// instead of failing.
fn parse_millis(rest: &str) -> Option<f64> {
    let (digits, _) = rest.split_once(TIME_TERMINATOR)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn millis_to_secs(millis: f64) -> f64 {
    millis / 1000.0
}
