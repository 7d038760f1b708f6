//! State-store key layout.
//!
//! Primary records live under printable prefixes; the per-round index uses a
//! NUL-delimited composite key so it sorts below every primary key and never
//! enters a primary range scan.

pub const ROUND_PREFIX: &str = "ROUND_";
pub const CONTRIBUTION_PREFIX: &str = "CONTRIBUTION_";

/// `~` sorts after every printable ASCII character, closing a prefix range.
const RANGE_SENTINEL: char = '~';

const COMPOSITE_DELIMITER: char = '\u{0}';
/// Successor of the delimiter; closes a composite-key prefix range.
const COMPOSITE_DELIMITER_END: char = '\u{1}';
const ROUND_CONTRIBUTION_INDEX: &str = "ROUND_CONTRIBUTION";

pub fn round_key(round_id: &str) -> String {
    format!("{}{}", ROUND_PREFIX, round_id)
}

pub fn contribution_key(contribution_id: &str) -> String {
    format!("{}{}", CONTRIBUTION_PREFIX, contribution_id)
}

/// Half-open scan range covering every round record.
pub fn round_range() -> (String, String) {
    prefix_range(ROUND_PREFIX)
}

/// Half-open scan range covering every contribution record:
/// `["CONTRIBUTION_", "CONTRIBUTION_~")`.
pub fn contribution_range() -> (String, String) {
    prefix_range(CONTRIBUTION_PREFIX)
}

fn prefix_range(prefix: &str) -> (String, String) {
    (prefix.to_string(), format!("{}{}", prefix, RANGE_SENTINEL))
}

/// Composite key from an object type and its attributes:
/// `\0type\0attr1\0attr2\0`.
pub fn composite_key(object_type: &str, attributes: &[&str]) -> String {
    let mut key = String::new();
    key.push(COMPOSITE_DELIMITER);
    key.push_str(object_type);
    key.push(COMPOSITE_DELIMITER);
    for attr in attributes {
        key.push_str(attr);
        key.push(COMPOSITE_DELIMITER);
    }
    key
}

/// Index entry binding a contribution to its round.
pub fn round_contribution_index_key(round_id: &str, contribution_id: &str) -> String {
    composite_key(ROUND_CONTRIBUTION_INDEX, &[round_id, contribution_id])
}

/// Range covering every index entry of one round.
///
/// The delimiter after `round_id` keeps round `R1` from matching `R10`.
pub fn round_contribution_index_range(round_id: &str) -> (String, String) {
    composite_prefix_range(composite_key(ROUND_CONTRIBUTION_INDEX, &[round_id]))
}

/// Range covering every index entry of every round.
pub fn round_contribution_index_all() -> (String, String) {
    composite_prefix_range(composite_key(ROUND_CONTRIBUTION_INDEX, &[]))
}

/// `[prefix, prefix with its trailing delimiter bumped)`: every key that
/// extends `prefix`, whatever characters follow.
fn composite_prefix_range(start: String) -> (String, String) {
    let mut end = start.clone();
    end.pop();
    end.push(COMPOSITE_DELIMITER_END);
    (start, end)
}
