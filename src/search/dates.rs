//! Publish-date bounds for search requests.

/// Suffix turning a calendar date into the timestamp the search API expects.
const MIDNIGHT_UTC: &str = "T00:00:00Z";

/// Turn a `YYYY-MM-DD` date into `YYYY-MM-DDT00:00:00Z`.
///
/// The input is not validated. A malformed date is passed through with the
/// suffix appended and the provider decides whether to reject it.
pub fn format_bound(date: Option<&str>) -> Option<String> {
    date.map(|d| format!("{d}{MIDNIGHT_UTC}"))
}
